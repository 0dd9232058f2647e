use std::collections::HashSet;
use std::fmt;

use crate::cost::{Cost, MValue, Pricing, VarId};
use crate::error::SolverError;
use crate::rational::Rational;
use crate::transform::TransformedProblem;

/// One constraint row: the seated basis variable, its cost, the right-hand
/// side `B` and one cell per column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub basis: VarId,
    pub cost: Cost,
    pub b: Rational,
    pub cells: Vec<Rational>,
}

impl Row {
    pub fn new(basis: VarId, cost: Cost, b: Rational, cells: Vec<Rational>) -> Self {
        Self { basis, cost, b, cells }
    }
}

/// Reduced costs: `Σ cost(row)·cell − c(column)` per column, and the
/// current objective value `Σ cost(row)·B` under the B column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRow {
    pub b: MValue,
    pub cells: Vec<MValue>,
}

/// Simplex tableau over columns `y0, y1..yn` and, before Phase 1 completes, `a1`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tableau {
    columns: Vec<VarId>,
    rows: Vec<Row>,
    delta: Option<DeltaRow>,
}

impl Tableau {
    /// Builds a tableau from explicit rows; every row must have one cell per
    /// column and no variable may be seated twice.
    pub fn new(columns: Vec<VarId>, rows: Vec<Row>) -> Result<Self, SolverError> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.cells.len() != columns.len()) {
            return Err(SolverError::MalformedInput(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                row.cells.len(),
                columns.len()
            )));
        }
        let tableau = Self {
            columns,
            rows,
            delta: None,
        };
        tableau.check_basis()?;
        Ok(tableau)
    }

    /// Initial tableau: constraint rows seat `y_{n-m+1}..y_n`, the
    /// denominator row seats the artificial variable.
    pub fn initial(problem: &TransformedProblem) -> Result<Self, SolverError> {
        let n = problem.num_original_variables();
        let m = problem.num_constraints();
        if m > n {
            return Err(SolverError::MalformedInput(format!(
                "{} constraints need at least as many variables, found {}",
                m, n
            )));
        }

        let objective = &problem.objective;
        let mut columns = Vec::with_capacity(n + 2);
        columns.push(VarId::Y0);
        columns.extend((1..=n).map(VarId::Y));
        columns.push(VarId::Artificial);

        let mut rows = Vec::with_capacity(m + 1);
        for (i, constraint) in problem.constraints.iter().enumerate() {
            let basis = VarId::Y(n - m + i + 1);
            let mut cells = Vec::with_capacity(n + 2);
            cells.push(constraint.constant.clone());
            cells.extend(constraint.coefficients.iter().cloned());
            cells.push(Rational::zero());
            rows.push(Row::new(basis, objective.cost_of(basis), constraint.rhs.clone(), cells));
        }

        let denominator = &problem.denominator_constraint;
        let mut cells = Vec::with_capacity(n + 2);
        cells.push(denominator.constant.clone());
        cells.extend(denominator.coefficients.iter().cloned());
        cells.push(Rational::one());
        rows.push(Row::new(
            VarId::Artificial,
            objective.cost_of(VarId::Artificial),
            denominator.rhs.clone(),
            cells,
        ));

        let mut tableau = Self::new(columns, rows)?;
        tableau.update_delta(objective);
        Ok(tableau)
    }

    pub fn columns(&self) -> &[VarId] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> &Row {
        &self.rows[row]
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Rational {
        &self.rows[row].cells[column]
    }

    pub fn column_of(&self, var: VarId) -> Option<usize> {
        self.columns.iter().position(|&c| c == var)
    }

    pub fn row_of(&self, var: VarId) -> Option<usize> {
        self.rows.iter().position(|row| row.basis == var)
    }

    pub fn is_basic(&self, var: VarId) -> bool {
        self.row_of(var).is_some()
    }

    pub fn basis(&self) -> Vec<VarId> {
        self.rows.iter().map(|row| row.basis).collect()
    }

    pub fn basis_costs(&self) -> Vec<Cost> {
        self.rows.iter().map(|row| row.cost.clone()).collect()
    }

    pub fn delta(&self) -> Option<&DeltaRow> {
        self.delta.as_ref()
    }

    /// Column labels as displayed: `Basis, Cost, B, y0, y1, ...`
    pub fn header(&self) -> Vec<String> {
        ["Basis", "Cost", "B"]
            .into_iter()
            .map(String::from)
            .chain(self.columns.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Fails if a variable is seated in more than one row.
    pub fn check_basis(&self) -> Result<(), SolverError> {
        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(row.basis) {
                return Err(SolverError::DuplicateBasis(row.basis));
            }
        }
        Ok(())
    }

    /// Whether `column` is the unit vector selecting `row`.
    pub fn is_unit_column(&self, row: usize, column: usize) -> bool {
        self.rows.iter().enumerate().all(|(i, r)| {
            let cell = &r.cells[column];
            if i == row { *cell == Rational::one() } else { cell.is_zero() }
        })
    }

    /// Gauss–Jordan step on `(row, column)`.
    ///
    /// Row labels and costs are untouched; the caller seats the entering
    /// variable with [`Tableau::seat`]. Invalidates the delta row.
    pub fn pivot(&mut self, row: usize, column: usize) -> Result<(), SolverError> {
        let invalid = SolverError::InvalidPivot { row, column };
        let pivot = match self.rows.get(row).and_then(|r| r.cells.get(column)) {
            Some(p) if !p.is_zero() => p.clone(),
            _ => return Err(invalid),
        };

        let pivot_row = &mut self.rows[row];
        pivot_row.b = pivot_row.b.checked_div(&pivot)?;
        for cell in pivot_row.cells.iter_mut() {
            *cell = cell.checked_div(&pivot)?;
        }

        let normalized = self.rows[row].clone();
        for (i, target) in self.rows.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = target.cells[column].clone();
            if factor.is_zero() {
                continue;
            }
            target.b = &target.b - &(&factor * &normalized.b);
            for (cell, source) in target.cells.iter_mut().zip(&normalized.cells) {
                *cell = &*cell - &(&factor * source);
            }
        }

        self.delta = None;
        Ok(())
    }

    /// Seats `var` in `row` with `cost`, keeping the basis unique.
    pub fn seat(&mut self, row: usize, var: VarId, cost: Cost) -> Result<(), SolverError> {
        if let Some(existing) = self.row_of(var) {
            if existing != row {
                return Err(SolverError::DuplicateBasis(var));
            }
        }
        let target = &mut self.rows[row];
        target.basis = var;
        target.cost = cost;
        Ok(())
    }

    /// Exchanges the labels and costs of two rows; the cells stay put.
    pub fn swap_basis(&mut self, a: usize, b: usize) {
        let (basis, cost) = (self.rows[a].basis, self.rows[a].cost.clone());
        self.rows[a].basis = self.rows[b].basis;
        self.rows[a].cost = self.rows[b].cost.clone();
        self.rows[b].basis = basis;
        self.rows[b].cost = cost;
        self.delta = None;
    }

    /// Re-fetches every row's cost from `pricing`.
    pub fn reprice(&mut self, pricing: &impl Pricing) {
        for row in &mut self.rows {
            row.cost = pricing.cost_of(row.basis);
        }
        self.delta = None;
    }

    /// Appends a column, one cell per row.
    pub fn push_column(&mut self, var: VarId, cells: Vec<Rational>) -> Result<(), SolverError> {
        if self.column_of(var).is_some() || cells.len() != self.rows.len() {
            return Err(SolverError::MalformedInput(format!("cannot add column {}", var)));
        }
        self.columns.push(var);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.cells.push(cell);
        }
        self.delta = None;
        Ok(())
    }

    /// Drops `var`'s column from every row. Returns whether it existed.
    pub fn remove_column(&mut self, var: VarId) -> bool {
        let Some(column) = self.column_of(var) else {
            return false;
        };
        self.columns.remove(column);
        for row in &mut self.rows {
            row.cells.remove(column);
        }
        self.delta = None;
        true
    }

    pub fn remove_row(&mut self, row: usize) -> Row {
        self.delta = None;
        self.rows.remove(row)
    }

    pub fn compute_delta(&self, pricing: &impl Pricing) -> DeltaRow {
        let b = self
            .rows
            .iter()
            .fold(MValue::default(), |acc, row| acc + row.cost.times(&row.b));

        let cells = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, &var)| {
                let z = self
                    .rows
                    .iter()
                    .fold(MValue::default(), |acc, row| acc + row.cost.times(&row.cells[j]));
                z - MValue::finite(pricing.objective_coefficient(var))
            })
            .collect();

        DeltaRow { b, cells }
    }

    pub fn update_delta(&mut self, pricing: &impl Pricing) -> &DeltaRow {
        let delta = self.compute_delta(pricing);
        self.delta.insert(delta)
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<Vec<String>> = vec![self.header()];
        for row in &self.rows {
            let mut line = vec![row.basis.to_string(), row.cost.to_string(), row.b.to_string()];
            line.extend(row.cells.iter().map(|c| c.to_string()));
            lines.push(line);
        }
        if let Some(delta) = &self.delta {
            let mut line = vec!["Δ".to_string(), String::new(), delta.b.to_string()];
            line.extend(delta.cells.iter().map(|c| c.to_string()));
            lines.push(line);
        }

        let widths: Vec<usize> = (0..lines[0].len())
            .map(|j| lines.iter().map(|line| line[j].chars().count()).max().unwrap_or(0))
            .collect();

        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
                .collect();
            write!(f, "{}", cells.join(" | ").trim_end())?;
            if i + 1 < lines.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
