use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::SolverError;

/// Exact fraction, always in lowest terms with a positive denominator.
///
/// Every operation returns a new value. Comparisons are exact, so pivot
/// selection never depends on floating point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, SolverError> {
        Self::from_big(BigInt::from(numerator), BigInt::from(denominator))
    }

    pub fn from_big(numerator: BigInt, denominator: BigInt) -> Result<Self, SolverError> {
        if denominator.is_zero() {
            return Err(SolverError::DivisionByZero);
        }
        // `BigRational::new` reduces by the gcd and moves the sign to the numerator
        Ok(Self(BigRational::new(numerator, denominator)))
    }

    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn numerator(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denominator(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Exact division; fails when `divisor` is zero.
    pub fn checked_div(&self, divisor: &Rational) -> Result<Self, SolverError> {
        if divisor.is_zero() {
            return Err(SolverError::DivisionByZero);
        }
        Ok(Self(&self.0 / &divisor.0))
    }

    pub fn recip(&self) -> Result<Self, SolverError> {
        Self::one().checked_div(self)
    }

    /// Lossy conversion for display only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for Rational {
    type Err = SolverError;

    /// Accepts `7`, `-3/4` and decimals such as `2.75`, all converted exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || SolverError::InvalidNumber(s.to_string());

        if let Some((num, den)) = text.split_once('/') {
            let num: BigInt = num.trim().parse().map_err(|_| invalid())?;
            let den: BigInt = den.trim().parse().map_err(|_| invalid())?;
            return Self::from_big(num, den);
        }

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let mantissa: BigInt = format!("{int_part}{frac_part}").parse().map_err(|_| invalid())?;
        let scale = num_traits::pow(BigInt::from(10), frac_part.len());
        let value = Self::from_big(mantissa, scale)?;
        Ok(if negative { -value } else { value })
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: &Rational) -> Rational {
        Rational(&self.0 + &other.0)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, other: Rational) -> Rational {
        Rational(self.0 + other.0)
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, other: &Rational) -> Rational {
        Rational(&self.0 - &other.0)
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, other: Rational) -> Rational {
        Rational(self.0 - other.0)
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: &Rational) -> Rational {
        Rational(&self.0 * &other.0)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, other: Rational) -> Rational {
        Rational(self.0 * other.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rational {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rational {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_integer::Integer;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn assert_reduced(value: &Rational) {
        assert!(value.denominator() > &BigInt::zero(), "{} has a non-positive denominator", value);
        assert!(
            value.numerator().gcd(value.denominator()).is_one(),
            "{} is not in lowest terms",
            value
        );
    }

    #[test]
    fn test_add_matches_cross_multiplication() {
        let fractions = [(1, 2), (-3, 4), (5, 6), (7, -9), (0, 3), (12, 8)];
        for &(a, b) in &fractions {
            for &(c, d) in &fractions {
                let sum = &r(a, b) + &r(c, d);
                let expected = r(a * d + c * b, b * d);
                assert_eq!(sum, expected, "{}/{} + {}/{}", a, b, c, d);
                assert_reduced(&sum);
                assert_reduced(&(&r(a, b) - &r(c, d)));
                assert_reduced(&(&r(a, b) * &r(c, d)));
            }
        }
    }

    #[test]
    fn test_predicates() {
        assert!(r(0, 5).is_zero());
        assert!(r(-3, 4).is_negative());
        assert!(r(3, 4).is_positive());
        assert!(!r(0, 1).is_positive());
        assert!(!r(0, 1).is_negative());
    }

    #[test]
    fn test_sign_normalization() {
        let value = r(4, -6);
        assert_eq!(value.numerator(), &BigInt::from(-2));
        assert_eq!(value.denominator(), &BigInt::from(3));
        assert_eq!(value.to_string(), "-2/3");
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(SolverError::DivisionByZero));
        assert_eq!(r(1, 2).checked_div(&Rational::zero()), Err(SolverError::DivisionByZero));
        assert_eq!(Rational::zero().recip(), Err(SolverError::DivisionByZero));
    }

    #[test]
    fn test_divide() {
        let quotient = r(3, 4).checked_div(&r(-9, 8)).unwrap();
        assert_eq!(quotient, r(-2, 3));
        assert_reduced(&quotient);
    }

    #[test]
    fn test_exact_ordering() {
        // 1/3 and 333333333/1000000000 collapse in low-precision floats
        assert!(r(1, 3) > r(333_333_333, 1_000_000_000));
        assert!(r(-1, 2) < r(-1, 3));
        assert_eq!(r(2, 4).cmp(&r(1, 2)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_parse() {
        assert_eq!("7".parse::<Rational>().unwrap(), r(7, 1));
        assert_eq!("-3/4".parse::<Rational>().unwrap(), r(-3, 4));
        assert_eq!("2.75".parse::<Rational>().unwrap(), r(11, 4));
        assert_eq!("-0.5".parse::<Rational>().unwrap(), r(-1, 2));
        assert_eq!(" 6/-8 ".parse::<Rational>().unwrap(), r(-3, 4));
        assert_eq!("1/0".parse::<Rational>(), Err(SolverError::DivisionByZero));
        assert!(matches!("abc".parse::<Rational>(), Err(SolverError::InvalidNumber(_))));
        assert!(matches!(".".parse::<Rational>(), Err(SolverError::InvalidNumber(_))));
    }

    #[test]
    fn test_to_f64() {
        assert!((r(2, 3).to_f64() - 0.666_666_666).abs() < 1e-6);
    }
}
