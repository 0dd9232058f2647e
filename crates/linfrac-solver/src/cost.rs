use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::SolverError;
use crate::problem::AffineForm;
use crate::rational::Rational;

/// Identifies a tableau column or basis label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarId {
    /// The Charnes–Cooper scaling variable
    Y0,
    /// Transformed decision variable `y_i`, `i >= 1`
    Y(usize),
    /// Artificial variable seeding the denominator row
    Artificial,
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarId::Y0 => write!(f, "y0"),
            VarId::Y(i) => write!(f, "y{}", i),
            VarId::Artificial => write!(f, "a1"),
        }
    }
}

impl FromStr for VarId {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "y0" => Ok(VarId::Y0),
            "a1" => Ok(VarId::Artificial),
            _ => s
                .strip_prefix('y')
                .and_then(|index| index.parse::<usize>().ok())
                .filter(|&index| index >= 1)
                .map(VarId::Y)
                .ok_or_else(|| SolverError::MalformedInput(format!("unknown variable '{}'", s))),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VarId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VarId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Cost of a basis variable: an exact value or the symbolic Big-M penalty
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cost {
    Finite(Rational),
    BigM,
}

impl Cost {
    /// `cost * value`, kept symbolic in M.
    pub fn times(&self, value: &Rational) -> MValue {
        match self {
            Cost::Finite(c) => MValue::finite(c * value),
            Cost::BigM => MValue::big(value.clone()),
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(c) => write!(f, "{}", c),
            Cost::BigM => write!(f, "M"),
        }
    }
}

/// `big * M + finite` for an arbitrarily large M.
///
/// Ordering is lexicographic on `(big, finite)`, which is exactly the order
/// of the values for every sufficiently large M.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MValue {
    pub big: Rational,
    pub finite: Rational,
}

impl MValue {
    pub fn finite(value: Rational) -> Self {
        Self {
            big: Rational::zero(),
            finite: value,
        }
    }

    pub fn big(value: Rational) -> Self {
        Self {
            big: value,
            finite: Rational::zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.big.is_negative() || (self.big.is_zero() && self.finite.is_negative())
    }

    pub fn is_finite(&self) -> bool {
        self.big.is_zero()
    }
}

impl Add for MValue {
    type Output = MValue;

    fn add(self, other: MValue) -> MValue {
        MValue {
            big: self.big + other.big,
            finite: self.finite + other.finite,
        }
    }
}

impl Sub for MValue {
    type Output = MValue;

    fn sub(self, other: MValue) -> MValue {
        MValue {
            big: self.big - other.big,
            finite: self.finite - other.finite,
        }
    }
}

impl fmt::Display for MValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.big.is_zero() {
            return write!(f, "{}", self.finite);
        }
        let one = Rational::one();
        if self.big == one {
            write!(f, "M")?;
        } else if self.big == -&one {
            write!(f, "-M")?;
        } else {
            write!(f, "{}M", self.big)?;
        }
        if self.finite.is_positive() {
            write!(f, " + {}", self.finite)?;
        } else if self.finite.is_negative() {
            write!(f, " - {}", self.finite.abs())?;
        }
        Ok(())
    }
}

/// Assigns costs to basis variables and objective coefficients to columns.
///
/// The cost of a row always follows the variable seated in it and is looked
/// up again whenever a variable enters the basis.
pub trait Pricing {
    fn cost_of(&self, var: VarId) -> Cost;

    fn objective_coefficient(&self, var: VarId) -> Rational;
}

/// The transformed objective prices the real problem; the artificial variable
/// carries the Big-M penalty but no objective coefficient.
impl Pricing for AffineForm {
    fn cost_of(&self, var: VarId) -> Cost {
        match var {
            VarId::Artificial => Cost::BigM,
            _ => Cost::Finite(self.objective_coefficient(var)),
        }
    }

    fn objective_coefficient(&self, var: VarId) -> Rational {
        match var {
            VarId::Y0 => self.constant.clone(),
            VarId::Y(i) => self
                .coefficients
                .get(i.wrapping_sub(1))
                .cloned()
                .unwrap_or_default(),
            VarId::Artificial => Rational::zero(),
        }
    }
}

/// Auxiliary objective used while restoring feasibility: maximize `-a1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeasibilityPricing;

impl Pricing for FeasibilityPricing {
    fn cost_of(&self, var: VarId) -> Cost {
        Cost::Finite(self.objective_coefficient(var))
    }

    fn objective_coefficient(&self, var: VarId) -> Rational {
        match var {
            VarId::Artificial => Rational::from_integer(-1),
            _ => Rational::zero(),
        }
    }
}

/// Cost of `var` under the transformed objective.
pub fn cost_of(var: VarId, objective: &AffineForm) -> Cost {
    objective.cost_of(var)
}
