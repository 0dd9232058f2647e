use thiserror::Error;

use crate::cost::VarId;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("No feasible pivot: {0}")]
    NoFeasiblePivot(String),
    #[error("Objective is unbounded: column {column} has no positive entry")]
    Unbounded { column: VarId },
    #[error("Iteration limit of {limit} reached without an optimal tableau")]
    IterationLimitExceeded { limit: usize },
    #[error("Invalid pivot at row {row}, column {column}")]
    InvalidPivot { row: usize, column: usize },
    #[error("Variable {0} occupies more than one basis row")]
    DuplicateBasis(VarId),
    #[error("Degenerate solution: y0 is zero, original variables are undefined")]
    DegenerateSolution,
}
