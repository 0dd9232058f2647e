use std::path::PathBuf;

use linfrac_lang::{Sense, SourceError, Summary, compile_source};
use linfrac_solver::{Rational, SolutionStatus, Solver, SolverError, VarId};

fn demo(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(name);
    std::fs::read_to_string(path).unwrap()
}

fn r(n: i64, d: i64) -> Rational {
    Rational::new(n, d).unwrap()
}

#[test]
fn test_blend_demo() {
    let compiled = compile_source(&demo("blend.lf")).unwrap();
    assert_eq!(compiled.constraint_names, vec!["supply", "balance"]);

    let report = compiled.solve(&Solver::new());
    let summary = Summary::new(&compiled, &report);

    assert_eq!(summary.status, SolutionStatus::Optimal);
    assert_eq!(summary.objective_value.map(|z| z.value), Some(r(10, 7)));
    let values: Vec<_> = summary.variables.iter().map(|v| (v.name.as_str(), v.value.clone())).collect();
    assert_eq!(values, vec![("x1", r(5, 2)), ("x2", r(0, 1)), ("x3", r(3, 2))]);
}

#[test]
fn test_minimize_demo() {
    let compiled = compile_source(&demo("minimize.lf")).unwrap();
    assert_eq!(compiled.sense, Sense::Minimize);

    let report = compiled.solve(&Solver::new());
    let solution = report.solution().unwrap();

    assert_eq!(solution.objective_value, r(1, 2));
    assert_eq!(solution.original_values().unwrap(), &[r(0, 1), r(3, 1)]);
}

#[test]
fn test_unbounded_demo() {
    let compiled = compile_source(&demo("unbounded.lf")).unwrap();

    let report = compiled.solve(&Solver::new());

    assert_eq!(report.status(), SolutionStatus::Unbounded);
    assert_eq!(report.error(), Some(&SolverError::Unbounded { column: VarId::Y(1) }));
    assert!(report.last_tableau().is_some());
}

#[test]
fn test_source_errors_carry_spans() {
    let error = compile_source("vars x\nmaximize x +").unwrap_err();
    assert!(matches!(error, SourceError::Parse(_)));

    let error = compile_source("vars x\nmaximize y").unwrap_err();
    assert!(matches!(error, SourceError::Compile(_)));
    let span = error.span().unwrap();
    assert_eq!((span.start, span.end), (16, 17));
}
