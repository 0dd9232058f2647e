//! Step-by-step record of a solve.

use crate::cost::{Cost, VarId};
use crate::tableau::{DeltaRow, Row, Tableau};

/// Which part of the method produced a step
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transform,
    Initial,
    PhaseOne,
    BasisRepair,
    Restoration,
    PhaseTwo,
    Terminal,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotInfo {
    pub row: usize,
    pub entering: VarId,
    /// Label of the row before the pivot
    pub leaving: VarId,
}

/// One recorded step; the tableau is a snapshot unaffected by later pivots.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub stage: Stage,
    pub title: String,
    pub explanation: String,
    pub pivot: Option<PivotInfo>,
    pub tableau: Option<Tableau>,
}

impl Step {
    pub fn new(stage: Stage, title: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            stage,
            title: title.into(),
            explanation: explanation.into(),
            pivot: None,
            tableau: None,
        }
    }

    pub fn with_tableau(mut self, tableau: &Tableau) -> Self {
        self.tableau = Some(tableau.clone());
        self
    }

    pub fn with_pivot(mut self, pivot: PivotInfo) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn rows(&self) -> &[Row] {
        self.tableau.as_ref().map(Tableau::rows).unwrap_or_default()
    }

    pub fn delta(&self) -> Option<&DeltaRow> {
        self.tableau.as_ref().and_then(Tableau::delta)
    }

    pub fn basis(&self) -> Vec<VarId> {
        self.tableau.as_ref().map(Tableau::basis).unwrap_or_default()
    }

    pub fn basis_costs(&self) -> Vec<Cost> {
        self.tableau.as_ref().map(Tableau::basis_costs).unwrap_or_default()
    }

    pub fn header(&self) -> Vec<String> {
        self.tableau.as_ref().map(Tableau::header).unwrap_or_default()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Steps that carried out a pivot, in order.
    pub fn pivots(&self) -> impl Iterator<Item = &PivotInfo> {
        self.steps.iter().filter_map(|step| step.pivot.as_ref())
    }

    pub fn count_stage(&self, stage: Stage) -> usize {
        self.steps
            .iter()
            .filter(|step| step.stage == stage && step.pivot.is_some())
            .count()
    }
}

impl IntoIterator for Trace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;

    fn tableau() -> Tableau {
        Tableau::new(
            vec![VarId::Y0, VarId::Y(1)],
            vec![Row::new(
                VarId::Y0,
                Cost::Finite(Rational::zero()),
                Rational::one(),
                vec![Rational::one(), Rational::from_integer(2)],
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let mut live = tableau();
        let mut trace = Trace::new();
        trace.record(Step::new(Stage::Initial, "Initial tableau", "").with_tableau(&live));

        live.pivot(0, 1).unwrap();

        let recorded = trace.last().unwrap();
        assert_eq!(recorded.rows()[0].b, Rational::one());
        assert_eq!(recorded.basis(), vec![VarId::Y0]);
        assert_eq!(recorded.header(), vec!["Basis", "Cost", "B", "y0", "y1"]);
    }

    #[test]
    fn test_counts_pivots_by_stage() {
        let mut trace = Trace::new();
        let pivot = PivotInfo {
            row: 0,
            entering: VarId::Y(1),
            leaving: VarId::Y0,
        };
        trace.record(Step::new(Stage::Transform, "Transform", ""));
        trace.record(Step::new(Stage::PhaseTwo, "Iteration 1", "").with_pivot(pivot.clone()));
        trace.record(Step::new(Stage::PhaseTwo, "Optimal", ""));

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.count_stage(Stage::PhaseTwo), 1);
        assert_eq!(trace.pivots().collect::<Vec<_>>(), vec![&pivot]);
        assert!(trace.steps()[0].rows().is_empty());
    }
}
