use tracing::{debug, info, warn};

use crate::cost::{FeasibilityPricing, MValue, Pricing, VarId};
use crate::error::SolverError;
use crate::problem::{AffineForm, FractionalProblem};
use crate::rational::Rational;
use crate::solution::{SolveReport, Solution};
use crate::tableau::{DeltaRow, Tableau};
use crate::trace::{PivotInfo, Stage, Step, Trace};
use crate::transform::TransformedProblem;

pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Exact two-phase simplex solver for the Charnes–Cooper linear program
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per simplex loop before giving up
    max_iterations: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Transform and solve a fractional program
    pub fn solve_problem(&self, problem: &FractionalProblem) -> SolveReport {
        self.solve(&problem.transform())
    }

    /// Solve a transformed problem, recording every step
    pub fn solve(&self, problem: &TransformedProblem) -> SolveReport {
        let mut trace = Trace::new();
        let outcome = self.run(problem, &mut trace);

        match &outcome {
            Ok(solution) => info!(
                status = ?solution.status,
                objective = %solution.objective_value,
                steps = trace.len(),
                "solve finished"
            ),
            Err(error) => warn!(%error, steps = trace.len(), "solve failed"),
        }

        SolveReport::new(trace, outcome)
    }

    fn run(&self, problem: &TransformedProblem, trace: &mut Trace) -> Result<Solution, SolverError> {
        trace.record(Step::new(
            Stage::Transform,
            "Charnes–Cooper transformation",
            problem.to_string(),
        ));

        let reduced;
        let problem = if problem.num_constraints() > problem.num_original_variables() {
            reduced = self.reduce(problem, trace)?;
            &reduced
        } else {
            problem
        };

        let mut tableau = Tableau::initial(problem)?;
        let seated: Vec<String> = tableau.basis().iter().map(|v| v.to_string()).collect();
        trace.record(
            Step::new(
                Stage::Initial,
                "Initial tableau",
                format!("Rows are labeled {}; a1 carries the penalty M.", seated.join(", ")),
            )
            .with_tableau(&tableau),
        );

        let objective = &problem.objective;
        self.phase_one(&mut tableau, objective, trace)?;
        self.phase_two(&mut tableau, objective, trace)?;

        let solution = Solution::extract(&tableau, problem.num_original_variables());
        let explanation = match &solution.original_variables {
            Some(x) => {
                let values: Vec<String> = x.iter().map(|v| v.to_string()).collect();
                format!("Z = {} at x = ({})", solution.objective_value, values.join(", "))
            }
            None => format!(
                "y0 = 0: the original variables are undefined, Z approaches {}",
                solution.objective_value
            ),
        };
        trace.record(Step::new(Stage::Terminal, "Solution", explanation).with_tableau(&tableau));
        Ok(solution)
    }

    /// Drops dependent constraints so that at most `n` rows need a label.
    fn reduce(&self, problem: &TransformedProblem, trace: &mut Trace) -> Result<TransformedProblem, SolverError> {
        let n = problem.num_original_variables();
        let (reduced, dropped) = problem.without_dependent_constraints()?;
        info!(dropped = dropped.len(), kept = reduced.num_constraints(), "dropped dependent constraints");

        let summary = if dropped.is_empty() {
            "No constraint is a combination of earlier ones.".to_string()
        } else {
            let rows: Vec<String> = dropped.iter().map(|i| (i + 1).to_string()).collect();
            format!("Constraints {} are combinations of earlier ones.", rows.join(", "))
        };
        trace.record(Step::new(
            Stage::Transform,
            "Drop dependent constraints",
            format!("{}\n{}", summary, reduced),
        ));

        if reduced.num_constraints() > n {
            warn!(kept = reduced.num_constraints(), n, "constraints only admit y = 0");
            let error = SolverError::NoFeasiblePivot(format!(
                "{} independent constraints over {} variables force y = 0",
                reduced.num_constraints(),
                n
            ));
            trace.record(Step::new(Stage::Terminal, "Stopped", error.to_string()));
            return Err(error);
        }
        Ok(reduced)
    }

    /// Seats `y0`, removes the artificial variable and leaves a canonical,
    /// feasible basis priced by `objective`.
    pub fn phase_one(
        &self,
        tableau: &mut Tableau,
        objective: &AffineForm,
        trace: &mut Trace,
    ) -> Result<(), SolverError> {
        info!("phase 1: seating y0");

        let column = tableau
            .column_of(VarId::Y0)
            .ok_or_else(|| SolverError::MalformedInput("tableau has no y0 column".to_string()))?;
        let Some(row) = ratio_test(tableau, column) else {
            warn!("no row admits y0");
            return Err(fail(
                trace,
                tableau,
                SolverError::NoFeasiblePivot("no row has a positive y0 entry".to_string()),
            ));
        };
        pivot_in(tableau, row, VarId::Y0, objective, trace, Stage::PhaseOne, "Seat y0")?;

        if let Some(row) = tableau.row_of(VarId::Artificial) {
            drive_out(tableau, row, objective, trace, Stage::PhaseOne)?;
        }
        tableau.remove_column(VarId::Artificial);
        tableau.update_delta(objective);
        trace.record(
            Step::new(
                Stage::PhaseOne,
                "Remove a1",
                "The artificial variable has left the basis and its column is dropped.",
            )
            .with_tableau(tableau),
        );

        repair_basis(tableau, objective, trace)?;
        self.restore_feasibility(tableau, objective, trace)
    }

    /// Iterates to optimality under `objective`. Returns the number of pivots.
    ///
    /// `tableau` must hold a canonical, feasible basis over `y0..yn`.
    pub fn phase_two(
        &self,
        tableau: &mut Tableau,
        objective: &AffineForm,
        trace: &mut Trace,
    ) -> Result<usize, SolverError> {
        info!(rows = tableau.num_rows(), limit = self.max_iterations, "phase 2");
        tableau.reprice(objective);
        let iterations = self.iterate(tableau, objective, trace, Stage::PhaseTwo)?;
        info!(iterations, "phase 2 reached optimality");
        Ok(iterations)
    }

    /// Clears negative right-hand sides by maximizing `-a1` over an
    /// auxiliary column.
    fn restore_feasibility(
        &self,
        tableau: &mut Tableau,
        objective: &AffineForm,
        trace: &mut Trace,
    ) -> Result<(), SolverError> {
        let Some(row) = most_negative_row(tableau) else {
            tableau.update_delta(objective);
            return Ok(());
        };
        info!(row, "restoring feasibility");

        let cells = tableau
            .rows()
            .iter()
            .map(|r| {
                if r.b.is_negative() {
                    Rational::from_integer(-1)
                } else {
                    Rational::zero()
                }
            })
            .collect();
        tableau.push_column(VarId::Artificial, cells)?;

        let pricing = FeasibilityPricing;
        tableau.reprice(&pricing);
        pivot_in(
            tableau,
            row,
            VarId::Artificial,
            &pricing,
            trace,
            Stage::Restoration,
            "Enter auxiliary a1",
        )?;
        self.iterate(tableau, &pricing, trace, Stage::Restoration)?;

        if let Some(row) = tableau.row_of(VarId::Artificial) {
            let residual = tableau.row(row).b.clone();
            if !residual.is_zero() {
                warn!(%residual, "constraints are infeasible");
                return Err(fail(
                    trace,
                    tableau,
                    SolverError::NoFeasiblePivot(format!(
                        "constraints cannot be satisfied, a1 stays at {}",
                        residual
                    )),
                ));
            }
            drive_out(tableau, row, objective, trace, Stage::Restoration)?;
        }

        tableau.remove_column(VarId::Artificial);
        tableau.reprice(objective);
        tableau.update_delta(objective);
        trace.record(
            Step::new(
                Stage::Restoration,
                "Feasible basis",
                "Every B is non-negative; the auxiliary column is dropped.",
            )
            .with_tableau(tableau),
        );
        Ok(())
    }

    /// Pivots on the most negative reduced cost until none is left.
    fn iterate(
        &self,
        tableau: &mut Tableau,
        pricing: &impl Pricing,
        trace: &mut Trace,
        stage: Stage,
    ) -> Result<usize, SolverError> {
        let mut iterations = 0;
        loop {
            let Some(column) = entering_column(tableau.update_delta(pricing)) else {
                debug!(?stage, iterations, "no negative reduced cost");
                return Ok(iterations);
            };

            if iterations == self.max_iterations {
                warn!(limit = self.max_iterations, ?stage, "iteration limit reached");
                return Err(fail(
                    trace,
                    tableau,
                    SolverError::IterationLimitExceeded {
                        limit: self.max_iterations,
                    },
                ));
            }

            let var = tableau.columns()[column];
            let Some(row) = ratio_test(tableau, column) else {
                warn!(column = %var, "objective is unbounded");
                return Err(fail(trace, tableau, SolverError::Unbounded { column: var }));
            };

            iterations += 1;
            pivot_in(tableau, row, var, pricing, trace, stage, format!("Iteration {}", iterations))?;
        }
    }
}

/// Records the tableau a solve stopped on and hands the error back.
fn fail(trace: &mut Trace, tableau: &Tableau, error: SolverError) -> SolverError {
    trace.record(Step::new(Stage::Terminal, "Stopped", error.to_string()).with_tableau(tableau));
    error
}

/// Pivots `var` into `row`, seats it with its cost and records the step.
fn pivot_in(
    tableau: &mut Tableau,
    row: usize,
    var: VarId,
    pricing: &impl Pricing,
    trace: &mut Trace,
    stage: Stage,
    title: impl Into<String>,
) -> Result<(), SolverError> {
    let column = tableau.column_of(var).ok_or(SolverError::InvalidPivot {
        row,
        column: tableau.num_columns(),
    })?;
    let leaving = tableau.row(row).basis;

    tableau.pivot(row, column)?;
    tableau.seat(row, var, pricing.cost_of(var))?;
    tableau.update_delta(pricing);
    debug!(?stage, row, entering = %var, %leaving, "pivot");

    let explanation = if leaving == var {
        format!("Row {} is normalized on its own column {}.", row + 1, var)
    } else {
        format!("{} enters the basis in row {}, {} leaves.", var, row + 1, leaving)
    };
    trace.record(
        Step::new(stage, title, explanation)
            .with_pivot(PivotInfo {
                row,
                entering: var,
                leaving,
            })
            .with_tableau(tableau),
    );
    Ok(())
}

/// Row with the minimum `B / cell` over strictly positive cells, first on ties.
fn ratio_test(tableau: &Tableau, column: usize) -> Option<usize> {
    let mut best: Option<(usize, Rational)> = None;
    for (i, row) in tableau.rows().iter().enumerate() {
        let cell = &row.cells[column];
        if !cell.is_positive() {
            continue;
        }
        let Ok(ratio) = row.b.checked_div(cell) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, lowest)| ratio < *lowest) {
            best = Some((i, ratio));
        }
    }
    best.map(|(i, _)| i)
}

/// Column with the most negative reduced cost, first on ties.
fn entering_column(delta: &DeltaRow) -> Option<usize> {
    let mut best: Option<(usize, &MValue)> = None;
    for (j, value) in delta.cells.iter().enumerate() {
        if value.is_negative() && best.is_none_or(|(_, lowest)| value < lowest) {
            best = Some((j, value));
        }
    }
    best.map(|(j, _)| j)
}

/// Row with the most negative B, first on ties.
fn most_negative_row(tableau: &Tableau) -> Option<usize> {
    tableau
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.b.is_negative())
        .min_by(|(_, a), (_, b)| a.b.cmp(&b.b))
        .map(|(i, _)| i)
}

/// First non-basic variable column with a nonzero entry in `row`.
fn replacement_for(tableau: &Tableau, row: usize) -> Option<VarId> {
    tableau
        .columns()
        .iter()
        .enumerate()
        .find(|&(j, &var)| {
            var != VarId::Artificial && !tableau.is_basic(var) && !tableau.cell(row, j).is_zero()
        })
        .map(|(_, &var)| var)
}

/// Replaces the label of `row` by a non-basic variable, or removes the row
/// when it is redundant.
fn drive_out(
    tableau: &mut Tableau,
    row: usize,
    pricing: &impl Pricing,
    trace: &mut Trace,
    stage: Stage,
) -> Result<(), SolverError> {
    let leaving = tableau.row(row).basis;
    if let Some(var) = replacement_for(tableau, row) {
        return pivot_in(tableau, row, var, pricing, trace, stage, format!("Drive out {}", leaving));
    }

    if tableau.row(row).b.is_zero() {
        remove_redundant_row(tableau, row, pricing, trace, stage);
        return Ok(());
    }

    warn!(row, basis = %leaving, "row cannot leave the basis");
    Err(fail(
        trace,
        tableau,
        SolverError::NoFeasiblePivot(format!("{} cannot be driven out of row {}", leaving, row + 1)),
    ))
}

/// Drops a row with `B = 0` and no entry outside the basis.
fn remove_redundant_row(tableau: &mut Tableau, row: usize, pricing: &impl Pricing, trace: &mut Trace, stage: Stage) {
    let removed = tableau.remove_row(row);
    tableau.update_delta(pricing);
    debug!(row, basis = %removed.basis, "removed redundant row");
    trace.record(
        Step::new(
            stage,
            "Remove redundant row",
            format!(
                "Row {} ({}) has no entry outside the basis and B = 0, so it is dropped.",
                row + 1,
                removed.basis
            ),
        )
        .with_tableau(tableau),
    );
}

/// First column with a nonzero entry in `row` whose variable labels a later
/// row that has not been repaired yet.
fn later_label_for(tableau: &Tableau, row: usize) -> Option<(VarId, usize)> {
    tableau.columns().iter().enumerate().find_map(|(j, &var)| {
        if var == VarId::Artificial || tableau.cell(row, j).is_zero() {
            return None;
        }
        tableau.row_of(var).filter(|&holder| holder > row).map(|holder| (var, holder))
    })
}

/// Makes every labeled column the unit vector of its row.
///
/// Gauss–Jordan keeps unit columns of earlier rows intact, so one pass
/// suffices. Rows that are entirely zero with `B = 0` are removed.
fn repair_basis(tableau: &mut Tableau, objective: &AffineForm, trace: &mut Trace) -> Result<(), SolverError> {
    let mut row = 0;
    while row < tableau.num_rows() {
        let var = tableau.row(row).basis;
        let column = tableau
            .column_of(var)
            .ok_or_else(|| SolverError::MalformedInput(format!("basis variable {} has no column", var)))?;
        if tableau.is_unit_column(row, column) {
            row += 1;
            continue;
        }

        let title = format!("Repair row {}", row + 1);
        if !tableau.cell(row, column).is_zero() {
            pivot_in(tableau, row, var, objective, trace, Stage::BasisRepair, title)?;
        } else if let Some(replacement) = replacement_for(tableau, row) {
            pivot_in(tableau, row, replacement, objective, trace, Stage::BasisRepair, title)?;
        } else if let Some((replacement, holder)) = later_label_for(tableau, row) {
            // The holder takes over this row's stale label and is repaired later
            debug!(row, holder, %replacement, "swapping basis labels");
            tableau.swap_basis(row, holder);
            pivot_in(tableau, row, replacement, objective, trace, Stage::BasisRepair, title)?;
        } else if tableau.row(row).b.is_zero() {
            remove_redundant_row(tableau, row, objective, trace, Stage::BasisRepair);
            continue;
        } else {
            warn!(row, basis = %var, "constraints are inconsistent");
            return Err(fail(
                trace,
                tableau,
                SolverError::NoFeasiblePivot(format!("row {} is inconsistent", row + 1)),
            ));
        }
        row += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Cost;
    use crate::problem::Constraint;
    use crate::solution::SolutionStatus;
    use crate::tableau::Row;
    use crate::transform::transform;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn ints(values: &[i64]) -> Vec<Rational> {
        values.iter().map(|&v| Rational::from_integer(v)).collect()
    }

    fn zero_cost() -> Cost {
        Cost::Finite(Rational::zero())
    }

    #[test]
    fn test_default_cap() {
        assert_eq!(Solver::new().max_iterations(), 20);
        assert_eq!(Solver::new().with_max_iterations(3).max_iterations(), 3);
    }

    #[test]
    fn test_ratio_test_takes_first_row_on_ties() {
        let tableau = Tableau::new(
            vec![VarId::Y0, VarId::Y(1)],
            vec![
                Row::new(VarId::Y0, zero_cost(), r(0, 1), ints(&[1, -1])),
                Row::new(VarId::Y(2), zero_cost(), r(2, 1), ints(&[0, 2])),
                Row::new(VarId::Y(3), zero_cost(), r(1, 1), ints(&[0, 1])),
            ],
        )
        .unwrap();

        // Row 0 is skipped (negative cell); rows 1 and 2 tie at ratio 1
        assert_eq!(ratio_test(&tableau, 1), Some(1));
        assert_eq!(ratio_test(&tableau, 0), Some(0));
    }

    #[test]
    fn test_entering_column_most_negative_first() {
        let delta = DeltaRow {
            b: MValue::default(),
            cells: vec![
                MValue::finite(r(-1, 1)),
                MValue::finite(r(-3, 1)),
                MValue::finite(r(-3, 1)),
                MValue::big(r(1, 1)),
            ],
        };
        assert_eq!(entering_column(&delta), Some(1));

        let with_penalty = DeltaRow {
            b: MValue::default(),
            cells: vec![MValue::finite(r(-100, 1)), MValue { big: r(-1, 1), finite: r(5, 1) }],
        };
        assert_eq!(entering_column(&with_penalty), Some(1));

        let optimal = DeltaRow {
            b: MValue::default(),
            cells: vec![MValue::default(), MValue::finite(r(2, 1))],
        };
        assert_eq!(entering_column(&optimal), None);
    }

    #[test]
    fn test_phase_one_leaves_canonical_basis() {
        // max x1 / (x1 + 1) subject to x1 = 2
        let problem = transform(
            &AffineForm::new(ints(&[1]), Rational::zero()),
            &AffineForm::new(ints(&[1]), Rational::one()),
            &[Constraint::new(ints(&[1]), Rational::from_integer(2))],
            1,
        )
        .unwrap();
        let mut tableau = Tableau::initial(&problem).unwrap();
        let mut trace = Trace::new();

        Solver::new()
            .phase_one(&mut tableau, &problem.objective, &mut trace)
            .unwrap();

        assert_eq!(tableau.columns(), &[VarId::Y0, VarId::Y(1)]);
        assert_eq!(tableau.basis(), vec![VarId::Y(1), VarId::Y0]);
        assert_eq!(tableau.row(0).b, r(2, 3));
        assert_eq!(tableau.row(1).b, r(1, 3));
        assert!(tableau.is_unit_column(0, 1));
        assert!(tableau.is_unit_column(1, 0));

        let first = trace.pivots().next().unwrap();
        assert_eq!(first.entering, VarId::Y0);
        assert_eq!(first.leaving, VarId::Artificial);
        assert_eq!(trace.count_stage(Stage::BasisRepair), 1);
    }

    #[test]
    fn test_phase_one_without_positive_y0_entry() {
        // The denominator is the constant 0
        let problem = transform(
            &AffineForm::new(ints(&[1]), Rational::zero()),
            &AffineForm::new(ints(&[1]), Rational::zero()),
            &[Constraint::new(ints(&[1]), Rational::from_integer(2))],
            1,
        )
        .unwrap();
        let mut tableau = Tableau::initial(&problem).unwrap();
        let mut trace = Trace::new();

        let result = Solver::new().phase_one(&mut tableau, &problem.objective, &mut trace);
        assert!(matches!(result, Err(SolverError::NoFeasiblePivot(_))));
        assert_eq!(trace.last().unwrap().stage, Stage::Terminal);
    }

    #[test]
    fn test_zero_artificial_row_is_dropped() {
        // After y0 enters row 0 the a1 row is zero outside the basis with B = 0
        let objective = AffineForm::new(ints(&[1]), Rational::from_integer(2));
        let mut tableau = Tableau::new(
            vec![VarId::Y0, VarId::Y(1), VarId::Artificial],
            vec![
                Row::new(VarId::Y(1), objective.cost_of(VarId::Y(1)), r(1, 1), ints(&[1, 1, 0])),
                Row::new(VarId::Artificial, Cost::BigM, r(1, 1), ints(&[1, 1, 1])),
            ],
        )
        .unwrap();
        let solver = Solver::new();
        let mut trace = Trace::new();

        solver.phase_one(&mut tableau, &objective, &mut trace).unwrap();

        assert_eq!(tableau.num_rows(), 1);
        assert_eq!(tableau.basis(), vec![VarId::Y0]);
        assert_eq!(tableau.columns(), &[VarId::Y0, VarId::Y(1)]);
        assert!(
            trace
                .steps()
                .iter()
                .any(|step| step.stage == Stage::PhaseOne && step.title == "Remove redundant row")
        );

        assert_eq!(solver.phase_two(&mut tableau, &objective, &mut trace), Ok(0));
        let solution = Solution::extract(&tableau, 1);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.objective_value, r(2, 1));
        assert_eq!(solution.original_values().unwrap(), &[r(0, 1)]);
    }

    #[test]
    fn test_repair_swaps_label_with_later_row() {
        // Row 0 is labeled y1 but only has an entry under y2, which labels row 1
        let objective = AffineForm::new(ints(&[0, 0]), Rational::zero());
        let mut tableau = Tableau::new(
            vec![VarId::Y0, VarId::Y(1), VarId::Y(2)],
            vec![
                Row::new(VarId::Y(1), zero_cost(), r(1, 1), ints(&[0, 0, 1])),
                Row::new(VarId::Y(2), zero_cost(), r(2, 1), ints(&[0, 1, 1])),
                Row::new(VarId::Y0, zero_cost(), r(1, 1), ints(&[1, 0, 0])),
            ],
        )
        .unwrap();
        let mut trace = Trace::new();

        repair_basis(&mut tableau, &objective, &mut trace).unwrap();

        assert_eq!(tableau.basis(), vec![VarId::Y(2), VarId::Y(1), VarId::Y0]);
        assert_eq!(tableau.row(0).b, r(1, 1));
        assert_eq!(tableau.row(1).b, r(1, 1));
        for row in 0..tableau.num_rows() {
            let column = tableau.column_of(tableau.row(row).basis).unwrap();
            assert!(tableau.is_unit_column(row, column));
        }
    }

    #[test]
    fn test_repair_rejects_inconsistent_row() {
        let objective = AffineForm::new(ints(&[0]), Rational::zero());
        let mut tableau = Tableau::new(
            vec![VarId::Y0, VarId::Y(1)],
            vec![
                Row::new(VarId::Y(1), zero_cost(), r(3, 1), ints(&[0, 0])),
                Row::new(VarId::Y0, zero_cost(), r(1, 1), ints(&[1, 0])),
            ],
        )
        .unwrap();
        let mut trace = Trace::new();

        let result = repair_basis(&mut tableau, &objective, &mut trace);

        assert!(matches!(result, Err(SolverError::NoFeasiblePivot(_))));
        assert_eq!(trace.last().unwrap().stage, Stage::Terminal);
    }

    /// Beale's example, which cycles under the most-negative rule with
    /// first-index tie-breaking.
    fn beale() -> (Tableau, AffineForm) {
        let columns: Vec<VarId> = std::iter::once(VarId::Y0).chain((1..=7).map(VarId::Y)).collect();
        let rows = vec![
            Row::new(
                VarId::Y(1),
                zero_cost(),
                r(0, 1),
                vec![r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(1, 4), r(-60, 1), r(-1, 25), r(9, 1)],
            ),
            Row::new(
                VarId::Y(2),
                zero_cost(),
                r(0, 1),
                vec![r(0, 1), r(0, 1), r(1, 1), r(0, 1), r(1, 2), r(-90, 1), r(-1, 50), r(3, 1)],
            ),
            Row::new(
                VarId::Y(3),
                zero_cost(),
                r(1, 1),
                vec![r(0, 1), r(0, 1), r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(1, 1), r(0, 1)],
            ),
        ];
        let objective = AffineForm::new(
            vec![r(0, 1), r(0, 1), r(0, 1), r(3, 4), r(-150, 1), r(1, 50), r(-6, 1)],
            Rational::zero(),
        );
        (Tableau::new(columns, rows).unwrap(), objective)
    }

    #[test]
    fn test_beale_cycles_with_period_six() {
        let (mut tableau, objective) = beale();
        let start = tableau.basis();
        let mut trace = Trace::new();

        let result = Solver::new()
            .with_max_iterations(6)
            .phase_two(&mut tableau, &objective, &mut trace);

        assert_eq!(result, Err(SolverError::IterationLimitExceeded { limit: 6 }));
        let pivots: Vec<(usize, VarId)> = trace.pivots().map(|p| (p.row, p.entering)).collect();
        assert_eq!(
            pivots,
            vec![
                (0, VarId::Y(4)),
                (1, VarId::Y(5)),
                (0, VarId::Y(6)),
                (1, VarId::Y(7)),
                (0, VarId::Y(1)),
                (1, VarId::Y(2)),
            ]
        );
        assert_eq!(tableau.basis(), start);
    }
}
