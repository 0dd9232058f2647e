//! Exact solver for linear-fractional programs.
//!
//! A problem `max f(x)/g(x)` subject to `Ax = b`, `x >= 0` is rewritten by the
//! Charnes–Cooper substitution into a linear program and solved with a
//! two-phase simplex method over arbitrary-precision rationals.

mod cost;
mod error;
mod problem;
mod rational;
mod simplex;
mod solution;
mod tableau;
mod trace;
mod transform;

pub use cost::{Cost, FeasibilityPricing, MValue, Pricing, VarId, cost_of};
pub use error::SolverError;
pub use problem::{AffineForm, Constraint, FractionalProblem};
pub use rational::Rational;
pub use simplex::{DEFAULT_MAX_ITERATIONS, Solver};
pub use solution::{Solution, SolutionStatus, SolveReport};
pub use tableau::{DeltaRow, Row, Tableau};
pub use trace::{PivotInfo, Stage, Step, Trace};
pub use transform::{TransformedConstraint, TransformedProblem, transform};
