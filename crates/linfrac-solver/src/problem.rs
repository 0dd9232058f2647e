use crate::error::SolverError;
use crate::rational::Rational;
use crate::transform::{self, TransformedProblem};

/// `Σ cᵢ·xᵢ + constant`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffineForm {
    /// One coefficient per decision variable
    pub coefficients: Vec<Rational>,
    pub constant: Rational,
}

impl AffineForm {
    pub fn new(coefficients: Vec<Rational>, constant: Rational) -> Self {
        Self { coefficients, constant }
    }

    pub fn constant(n: usize, constant: Rational) -> Self {
        Self {
            coefficients: vec![Rational::zero(); n],
            constant,
        }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Value of the form at `x`; `x` must have one entry per coefficient.
    pub fn evaluate(&self, x: &[Rational]) -> Rational {
        self.coefficients
            .iter()
            .zip(x)
            .map(|(c, v)| c * v)
            .fold(self.constant.clone(), |acc, term| acc + term)
    }
}

/// Equality constraint `Σ aᵢ·xᵢ = rhs`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub coefficients: Vec<Rational>,
    pub rhs: Rational,
}

impl Constraint {
    pub fn new(coefficients: Vec<Rational>, rhs: Rational) -> Self {
        Self { coefficients, rhs }
    }
}

/// Maximize `numerator(x) / denominator(x)` subject to equality constraints, `x >= 0`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionalProblem {
    numerator: AffineForm,
    denominator: AffineForm,
    constraints: Vec<Constraint>,
    variable_count: usize,
}

impl FractionalProblem {
    /// Validates that every coefficient sequence has `variable_count` entries.
    pub fn new(
        numerator: AffineForm,
        denominator: AffineForm,
        constraints: Vec<Constraint>,
        variable_count: usize,
    ) -> Result<Self, SolverError> {
        transform::check_lengths(&numerator, &denominator, &constraints, variable_count)?;
        Ok(Self {
            numerator,
            denominator,
            constraints,
            variable_count,
        })
    }

    pub fn numerator(&self) -> &AffineForm {
        &self.numerator
    }

    pub fn denominator(&self) -> &AffineForm {
        &self.denominator
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variable_count
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective ratio at `x`, or `None` where the denominator vanishes.
    pub fn objective_at(&self, x: &[Rational]) -> Option<Rational> {
        self.numerator
            .evaluate(x)
            .checked_div(&self.denominator.evaluate(x))
            .ok()
    }

    /// Whether `x` is non-negative and satisfies every constraint exactly.
    pub fn is_feasible(&self, x: &[Rational]) -> bool {
        x.len() == self.variable_count
            && x.iter().all(|v| !v.is_negative())
            && self.constraints.iter().all(|c| {
                let lhs: Rational = c.coefficients.iter().zip(x).map(|(a, v)| a * v).sum();
                lhs == c.rhs
            })
    }

    pub fn transform(&self) -> TransformedProblem {
        transform::rewrite(&self.numerator, &self.denominator, &self.constraints, self.variable_count)
    }
}
