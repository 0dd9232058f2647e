//! Flat, name-aware view of a solve for JSON output.

use linfrac_solver::{Rational, SolutionStatus, SolveReport, Stage, Step};

use crate::ast::Sense;
use crate::compiler::CompiledProblem;

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: String,
    /// Exact value, e.g. `5/2`
    pub value: Rational,
    pub decimal: f64,
}

impl NamedValue {
    fn new(name: impl Into<String>, value: &Rational) -> Self {
        Self {
            name: name.into(),
            value: value.clone(),
            decimal: value.to_f64(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub stage: Stage,
    pub title: String,
    pub explanation: String,
    /// Rendered tableau, when the step carries one
    pub table: Option<String>,
}

impl From<&Step> for StepSummary {
    fn from(step: &Step) -> Self {
        Self {
            stage: step.stage,
            title: step.title.clone(),
            explanation: step.explanation.clone(),
            table: step.tableau.as_ref().map(|t| t.to_string()),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub status: SolutionStatus,
    pub sense: Sense,
    pub objective_value: Option<NamedValue>,
    /// Original variables; empty unless the optimum is attained
    pub variables: Vec<NamedValue>,
    /// `y0..yn` of the transformed problem
    pub transformed: Vec<NamedValue>,
    pub error: Option<String>,
    pub steps: Vec<StepSummary>,
}

impl Summary {
    pub fn new(compiled: &CompiledProblem, report: &SolveReport) -> Self {
        let solution = report.solution();

        let objective_value = solution.map(|s| NamedValue::new("Z", &s.objective_value));
        let variables = solution
            .and_then(|s| s.original_variables.as_ref())
            .map(|x| {
                compiled
                    .variables
                    .iter()
                    .zip(x)
                    .map(|(name, value)| NamedValue::new(name.as_str(), value))
                    .collect()
            })
            .unwrap_or_default();
        let transformed = solution
            .map(|s| {
                s.y_values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| NamedValue::new(format!("y{}", i), value))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            status: report.status(),
            sense: compiled.sense,
            objective_value,
            variables,
            transformed,
            error: report.error().map(|e| e.to_string()),
            steps: report.trace.steps().iter().map(StepSummary::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_source;
    use linfrac_solver::Solver;

    #[test]
    fn test_summary_names_values() {
        let compiled = compile_source("vars x1\nmaximize x1 / (x1 + 1)\nsubject to {\n x1 = 2\n}").unwrap();
        let report = compiled.solve(&Solver::new());

        let summary = Summary::new(&compiled, &report);

        assert_eq!(summary.status, SolutionStatus::Optimal);
        assert_eq!(summary.objective_value.as_ref().map(|v| v.value.to_string()), Some("2/3".to_string()));
        assert_eq!(summary.variables.len(), 1);
        assert_eq!(summary.variables[0].name, "x1");
        assert_eq!(summary.variables[0].value, Rational::from_integer(2));
        assert_eq!(summary.transformed[0].name, "y0");
        assert!(summary.error.is_none());
        assert_eq!(summary.steps.len(), report.trace.len());
        assert!(summary.steps.last().and_then(|s| s.table.as_ref()).is_some());
    }

    #[test]
    fn test_summary_of_failure() {
        let compiled = compile_source("vars x1, x2\nmaximize x1\nsubject to {\n x1 - x2 = 0\n}").unwrap();
        let report = compiled.solve(&Solver::new());

        let summary = Summary::new(&compiled, &report);

        assert_eq!(summary.status, SolutionStatus::Unbounded);
        assert!(summary.objective_value.is_none());
        assert!(summary.variables.is_empty());
        assert!(summary.error.unwrap().contains("y1"));
    }
}
