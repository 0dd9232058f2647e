use crate::cost::{Cost, VarId};
use crate::error::SolverError;
use crate::rational::Rational;
use crate::tableau::Tableau;
use crate::trace::Trace;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// Optimal in the transformed problem with `y0 = 0`; the original
    /// variables are undefined and the objective is a supremum
    Degenerate,
    /// The constraints admit no feasible point
    Infeasible,
    /// The objective grows without bound
    Unbounded,
    /// The pivot cap was reached first
    IterationLimit,
    /// Solver encountered an error
    Error,
}

impl From<&SolverError> for SolutionStatus {
    fn from(error: &SolverError) -> Self {
        match error {
            SolverError::NoFeasiblePivot(_) => SolutionStatus::Infeasible,
            SolverError::Unbounded { .. } => SolutionStatus::Unbounded,
            SolverError::IterationLimitExceeded { .. } => SolutionStatus::IterationLimit,
            _ => SolutionStatus::Error,
        }
    }
}

/// Values read off a terminal tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub status: SolutionStatus,
    pub final_tableau: Tableau,
    pub basis: Vec<VarId>,
    /// `Σ cost × B` over the basis rows
    pub objective_value: Rational,
    /// `y0, y1..yn`
    pub y_values: Vec<Rational>,
    /// `x_i = y_i / y0`; `None` when `y0 = 0`
    pub original_variables: Option<Vec<Rational>>,
}

impl Solution {
    /// Reads the solution of a tableau over `y0..yn`.
    ///
    /// Basic variables take their row's B, everything else is zero.
    pub fn extract(tableau: &Tableau, n: usize) -> Self {
        let mut y_values = vec![Rational::zero(); n + 1];
        let mut objective_value = Rational::zero();

        for row in tableau.rows() {
            let index = match row.basis {
                VarId::Y0 => Some(0),
                VarId::Y(i) if i <= n => Some(i),
                _ => None,
            };
            if let Some(i) = index {
                y_values[i] = row.b.clone();
            }
            if let Cost::Finite(cost) = &row.cost {
                objective_value = objective_value + cost * &row.b;
            }
        }

        let y0 = &y_values[0];
        let original_variables = if y0.is_zero() {
            None
        } else {
            y_values[1..].iter().map(|y| y.checked_div(y0)).collect::<Result<Vec<_>, _>>().ok()
        };
        let status = if original_variables.is_some() {
            SolutionStatus::Optimal
        } else {
            SolutionStatus::Degenerate
        };

        Self {
            status,
            final_tableau: tableau.clone(),
            basis: tableau.basis(),
            objective_value,
            y_values,
            original_variables,
        }
    }

    pub fn y0(&self) -> &Rational {
        &self.y_values[0]
    }

    pub fn is_degenerate(&self) -> bool {
        self.status == SolutionStatus::Degenerate
    }

    /// Original decision variables, or `DegenerateSolution` when `y0 = 0`.
    pub fn original_values(&self) -> Result<&[Rational], SolverError> {
        self.original_variables
            .as_deref()
            .ok_or(SolverError::DegenerateSolution)
    }

    /// Flips the sign of the objective value, for problems stated as minimization.
    pub fn negate_objective(&mut self) {
        self.objective_value = -&self.objective_value;
    }
}

/// Everything a solve produced: the step trace, which survives failures, and
/// the outcome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub trace: Trace,
    pub outcome: Result<Solution, SolverError>,
}

impl SolveReport {
    pub fn new(trace: Trace, outcome: Result<Solution, SolverError>) -> Self {
        Self { trace, outcome }
    }

    pub fn status(&self) -> SolutionStatus {
        match &self.outcome {
            Ok(solution) => solution.status,
            Err(error) => SolutionStatus::from(error),
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&SolverError> {
        self.outcome.as_ref().err()
    }

    /// The last recorded tableau, also available after a failure.
    pub fn last_tableau(&self) -> Option<&Tableau> {
        self.trace
            .steps()
            .iter()
            .rev()
            .find_map(|step| step.tableau.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tableau::Row;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn terminal(y0: Rational) -> Tableau {
        Tableau::new(
            vec![VarId::Y0, VarId::Y(1), VarId::Y(2)],
            vec![
                Row::new(VarId::Y(1), Cost::Finite(r(2, 1)), r(2, 3), vec![r(0, 1), r(1, 1), r(1, 2)]),
                Row::new(VarId::Y0, Cost::Finite(r(1, 1)), y0, vec![r(1, 1), r(0, 1), r(3, 1)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_extract_maps_back_to_original() {
        let solution = Solution::extract(&terminal(r(1, 3)), 2);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.y_values, vec![r(1, 3), r(2, 3), r(0, 1)]);
        assert_eq!(solution.objective_value, r(5, 3));
        assert_eq!(solution.original_values().unwrap(), &[r(2, 1), r(0, 1)]);
        assert_eq!(solution.basis, vec![VarId::Y(1), VarId::Y0]);
    }

    #[test]
    fn test_zero_y0_is_degenerate() {
        let solution = Solution::extract(&terminal(Rational::zero()), 2);

        assert!(solution.is_degenerate());
        assert_eq!(solution.original_variables, None);
        assert_eq!(solution.original_values(), Err(SolverError::DegenerateSolution));
        assert_eq!(solution.objective_value, r(4, 3));
    }

    #[test]
    fn test_status_from_error() {
        let report = SolveReport::new(Trace::new(), Err(SolverError::Unbounded { column: VarId::Y(1) }));
        assert_eq!(report.status(), SolutionStatus::Unbounded);
        assert!(report.solution().is_none());
        assert!(report.last_tableau().is_none());
        assert_eq!(
            SolutionStatus::from(&SolverError::IterationLimitExceeded { limit: 3 }),
            SolutionStatus::IterationLimit
        );
        assert_eq!(SolutionStatus::from(&SolverError::DivisionByZero), SolutionStatus::Error);
    }
}
