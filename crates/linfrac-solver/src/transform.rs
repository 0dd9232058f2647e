//! Charnes–Cooper transformation.
//!
//! Substituting `yᵢ = t·xᵢ`, `y0 = t` with `t` chosen so that the denominator
//! equals one turns `max f(x)/g(x)` over `Ax = b` into the linear program
//! `max f(y)` over `Ay - b·y0 = 0`, `g(y) = 1`, `y >= 0`.

use std::fmt;

use crate::error::SolverError;
use crate::problem::{AffineForm, Constraint};
use crate::rational::Rational;

/// `Σ aᵢ·yᵢ + constant·y0 = rhs`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedConstraint {
    /// Coefficients of `y1..yn`
    pub coefficients: Vec<Rational>,
    /// Coefficient of `y0`
    pub constant: Rational,
    pub rhs: Rational,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedProblem {
    /// Coefficients over `y1..yn`; the constant is the coefficient of `y0`
    pub objective: AffineForm,
    /// One homogeneous row per original constraint, rhs always zero
    pub constraints: Vec<TransformedConstraint>,
    /// The normalization row `g(y) = 1`
    pub denominator_constraint: TransformedConstraint,
    /// `n + 1`, counting `y0`
    pub variable_count: usize,
}

impl TransformedProblem {
    /// Number of original decision variables `n`.
    pub fn num_original_variables(&self) -> usize {
        self.variable_count - 1
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Drops every constraint that is a linear combination of earlier ones.
    /// Returns the reduced problem and the indices of the dropped rows.
    pub fn without_dependent_constraints(&self) -> Result<(TransformedProblem, Vec<usize>), SolverError> {
        // Rows over (y0, y1..yn) in reduced form, each with its pivot index
        let mut echelon: Vec<(usize, Vec<Rational>)> = Vec::new();
        let mut kept = Vec::new();
        let mut dropped = Vec::new();

        for (i, constraint) in self.constraints.iter().enumerate() {
            let mut v: Vec<Rational> = std::iter::once(constraint.constant.clone())
                .chain(constraint.coefficients.iter().cloned())
                .collect();
            for (p, row) in &echelon {
                let factor = v[*p].clone();
                if factor.is_zero() {
                    continue;
                }
                for (x, y) in v.iter_mut().zip(row) {
                    *x = &*x - &(&factor * y);
                }
            }

            match v.iter().position(|x| !x.is_zero()) {
                Some(p) => {
                    let scale = v[p].recip()?;
                    echelon.push((p, v.iter().map(|x| x * &scale).collect()));
                    kept.push(constraint.clone());
                }
                None => dropped.push(i),
            }
        }

        let reduced = TransformedProblem {
            objective: self.objective.clone(),
            constraints: kept,
            denominator_constraint: self.denominator_constraint.clone(),
            variable_count: self.variable_count,
        };
        Ok((reduced, dropped))
    }
}

/// Rewrites a fractional program into its Charnes–Cooper linear form.
pub fn transform(
    numerator: &AffineForm,
    denominator: &AffineForm,
    constraints: &[Constraint],
    n: usize,
) -> Result<TransformedProblem, SolverError> {
    check_lengths(numerator, denominator, constraints, n)?;
    Ok(rewrite(numerator, denominator, constraints, n))
}

pub(crate) fn check_lengths(
    numerator: &AffineForm,
    denominator: &AffineForm,
    constraints: &[Constraint],
    n: usize,
) -> Result<(), SolverError> {
    let mismatch = |what: String, len: usize| {
        let message = format!("{} has {} coefficients, expected {}", what, len, n);
        tracing::warn!(%message, "rejecting malformed problem");
        Err(SolverError::MalformedInput(message))
    };

    if numerator.len() != n {
        return mismatch("numerator".to_string(), numerator.len());
    }
    if denominator.len() != n {
        return mismatch("denominator".to_string(), denominator.len());
    }
    for (i, c) in constraints.iter().enumerate() {
        if c.coefficients.len() != n {
            return mismatch(format!("constraint {}", i + 1), c.coefficients.len());
        }
    }
    Ok(())
}

pub(crate) fn rewrite(
    numerator: &AffineForm,
    denominator: &AffineForm,
    constraints: &[Constraint],
    n: usize,
) -> TransformedProblem {
    let constraints: Vec<TransformedConstraint> = constraints
        .iter()
        .map(|c| TransformedConstraint {
            coefficients: c.coefficients.clone(),
            constant: -&c.rhs,
            rhs: Rational::zero(),
        })
        .collect();

    let denominator_constraint = TransformedConstraint {
        coefficients: denominator.coefficients.clone(),
        constant: denominator.constant.clone(),
        rhs: Rational::one(),
    };

    tracing::debug!(n, m = constraints.len(), "applied Charnes-Cooper substitution");

    TransformedProblem {
        objective: numerator.clone(),
        constraints,
        denominator_constraint,
        variable_count: n + 1,
    }
}

/// Renders `Σ cᵢ·yᵢ + c0·y0` with unit coefficients elided, or `0`.
pub(crate) fn format_terms(coefficients: &[Rational], y0: &Rational) -> String {
    let terms = coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| (c, format!("y{}", i + 1)))
        .chain(std::iter::once((y0, "y0".to_string())))
        .filter(|(c, _)| !c.is_zero());

    let mut out = String::new();
    for (c, name) in terms {
        let magnitude = c.abs();
        let body = if magnitude == Rational::one() {
            name
        } else {
            format!("{}{}", magnitude, name)
        };
        match (out.is_empty(), c.is_negative()) {
            (true, false) => out.push_str(&body),
            (true, true) => out.push_str(&format!("-{}", body)),
            (false, false) => out.push_str(&format!(" + {}", body)),
            (false, true) => out.push_str(&format!(" - {}", body)),
        }
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

impl fmt::Display for TransformedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", format_terms(&self.coefficients, &self.constant), self.rhs)
    }
}

impl fmt::Display for TransformedProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Z = {} -> max",
            format_terms(&self.objective.coefficients, &self.objective.constant)
        )?;
        for c in &self.constraints {
            writeln!(f, "{}", c)?;
        }
        write!(f, "{}", self.denominator_constraint)
    }
}
