use std::collections::{HashMap, HashSet};

use linfrac_solver::{AffineForm, Constraint, FractionalProblem, Rational, SolveReport, Solver, SolverError};
use thiserror::Error;

use crate::ast::*;
use crate::lexer::Span;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String, span: Span },
    #[error("Variable declared twice: {name}")]
    DuplicateVariable { name: String, span: Span },
    #[error("Constraint name used twice: {name}")]
    DuplicateConstraint { name: String, span: Span },
    #[error("No variables declared")]
    NoVariables,
    #[error("Missing objective: add a maximize or minimize line")]
    MissingObjective,
    #[error("Only one objective is allowed")]
    MultipleObjectives { span: Span },
    #[error("Expression is not linear: {expr}")]
    Nonlinear { expr: String, span: Span },
    #[error("Division by zero in expression")]
    DivisionByZero { span: Span },
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl CompileError {
    /// Source range the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::UnknownVariable { span, .. }
            | CompileError::DuplicateVariable { span, .. }
            | CompileError::DuplicateConstraint { span, .. }
            | CompileError::MultipleObjectives { span }
            | CompileError::Nonlinear { span, .. }
            | CompileError::DivisionByZero { span } => Some(*span),
            CompileError::NoVariables | CompileError::MissingObjective | CompileError::Solver(_) => None,
        }
    }
}

/// A program lowered to a fractional problem, with the names needed to
/// report a solution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProblem {
    pub variables: Vec<String>,
    /// Declared names, `c{i}` for unnamed constraints
    pub constraint_names: Vec<String>,
    pub sense: Sense,
    /// Always stated as a maximization; a minimized numerator is negated
    pub problem: FractionalProblem,
}

impl CompiledProblem {
    /// Solves the problem and reports the objective in the declared sense.
    pub fn solve(&self, solver: &Solver) -> SolveReport {
        let mut report = solver.solve_problem(&self.problem);
        if self.sense == Sense::Minimize {
            if let Ok(solution) = &mut report.outcome {
                solution.negate_objective();
            }
        }
        report
    }
}

/// Lowers a parsed program to a [`FractionalProblem`]
pub struct Compiler {
    variables: Vec<String>,
    index: HashMap<String, usize>,
}

impl Compiler {
    pub fn compile(program: &Program) -> Result<CompiledProblem, CompileError> {
        let compiler = Self::declare(program)?;

        let mut objectives = program.objectives();
        let objective = objectives.next().ok_or(CompileError::MissingObjective)?;
        if let Some(extra) = objectives.next() {
            return Err(CompileError::MultipleObjectives { span: extra.span });
        }

        let (mut numerator, denominator) = compiler.ratio(&objective.expr, objective.span)?;
        if objective.sense == Sense::Minimize {
            numerator = negate(&numerator);
        }

        let mut constraints = Vec::new();
        let mut constraint_names = Vec::new();
        let mut seen = HashSet::new();
        for (i, decl) in program.constraints().enumerate() {
            let name = match &decl.name {
                Some(name) => {
                    if !seen.insert(name.clone()) {
                        return Err(CompileError::DuplicateConstraint {
                            name: name.clone(),
                            span: decl.span,
                        });
                    }
                    name.clone()
                }
                None => format!("c{}", i + 1),
            };
            constraint_names.push(name);
            constraints.push(compiler.constraint(decl)?);
        }

        let n = compiler.variables.len();
        let problem = FractionalProblem::new(numerator, denominator, constraints, n)?;

        Ok(CompiledProblem {
            variables: compiler.variables,
            constraint_names,
            sense: objective.sense,
            problem,
        })
    }

    fn declare(program: &Program) -> Result<Self, CompileError> {
        let mut variables = Vec::new();
        let mut index = HashMap::new();
        for ident in program.declarations().flat_map(|d| d.names.iter()) {
            if index.insert(ident.name.clone(), variables.len()).is_some() {
                return Err(CompileError::DuplicateVariable {
                    name: ident.name.clone(),
                    span: ident.span,
                });
            }
            variables.push(ident.name.clone());
        }
        if variables.is_empty() {
            return Err(CompileError::NoVariables);
        }
        Ok(Self { variables, index })
    }

    /// `lhs = rhs` becomes `Σ aᵢxᵢ = b` with everything constant moved right.
    fn constraint(&self, decl: &ConstraintDecl) -> Result<Constraint, CompileError> {
        let lhs = self.linear(&decl.lhs, decl.span)?;
        let rhs = self.linear(&decl.rhs, decl.span)?;
        let difference = subtract(&lhs, &rhs);
        Ok(Constraint::new(difference.coefficients, -difference.constant))
    }

    /// Splits an objective into numerator and denominator. A top-level
    /// division by a non-constant expression is the ratio; anything else is
    /// a linear objective over the constant denominator 1.
    fn ratio(&self, expr: &Expr, span: Span) -> Result<(AffineForm, AffineForm), CompileError> {
        match expr {
            Expr::Paren(inner) => self.ratio(inner, span),
            Expr::Neg(inner) => {
                let (numerator, denominator) = self.ratio(inner, span)?;
                Ok((negate(&numerator), denominator))
            }
            Expr::BinaryOp {
                left,
                op: BinaryOp::Div,
                right,
            } => {
                let divisor = self.linear(right, span)?;
                if !is_constant(&divisor) {
                    return Ok((self.linear(left, span)?, divisor));
                }
                let (numerator, denominator) = self.ratio(left, span)?;
                let factor = divisor
                    .constant
                    .recip()
                    .map_err(|_| CompileError::DivisionByZero { span })?;
                Ok((scale(&numerator, &factor), denominator))
            }
            _ => Ok((
                self.linear(expr, span)?,
                AffineForm::constant(self.variables.len(), Rational::one()),
            )),
        }
    }

    /// Lowers an expression to `Σ cᵢxᵢ + constant`.
    fn linear(&self, expr: &Expr, span: Span) -> Result<AffineForm, CompileError> {
        let n = self.variables.len();
        match expr {
            Expr::Number(value) => Ok(AffineForm::constant(n, value.clone())),
            Expr::Variable(ident) => {
                let idx = self
                    .index
                    .get(&ident.name)
                    .copied()
                    .ok_or_else(|| CompileError::UnknownVariable {
                        name: ident.name.clone(),
                        span: ident.span,
                    })?;
                let mut form = AffineForm::constant(n, Rational::zero());
                form.coefficients[idx] = Rational::one();
                Ok(form)
            }
            Expr::Neg(inner) => Ok(negate(&self.linear(inner, span)?)),
            Expr::Paren(inner) => self.linear(inner, span),
            Expr::BinaryOp { left, op, right } => {
                let l = self.linear(left, span)?;
                let r = self.linear(right, span)?;
                match op {
                    BinaryOp::Add => Ok(add(&l, &r)),
                    BinaryOp::Sub => Ok(subtract(&l, &r)),
                    BinaryOp::Mul => {
                        // One side must be a constant
                        if is_constant(&l) {
                            Ok(scale(&r, &l.constant))
                        } else if is_constant(&r) {
                            Ok(scale(&l, &r.constant))
                        } else {
                            Err(CompileError::Nonlinear {
                                expr: expr.to_string(),
                                span,
                            })
                        }
                    }
                    BinaryOp::Div => {
                        if !is_constant(&r) {
                            return Err(CompileError::Nonlinear {
                                expr: expr.to_string(),
                                span,
                            });
                        }
                        let factor = r
                            .constant
                            .recip()
                            .map_err(|_| CompileError::DivisionByZero { span })?;
                        Ok(scale(&l, &factor))
                    }
                }
            }
        }
    }
}

fn is_constant(form: &AffineForm) -> bool {
    form.coefficients.iter().all(Rational::is_zero)
}

fn add(a: &AffineForm, b: &AffineForm) -> AffineForm {
    AffineForm::new(
        a.coefficients.iter().zip(&b.coefficients).map(|(x, y)| x + y).collect(),
        &a.constant + &b.constant,
    )
}

fn subtract(a: &AffineForm, b: &AffineForm) -> AffineForm {
    add(a, &negate(b))
}

fn negate(form: &AffineForm) -> AffineForm {
    AffineForm::new(form.coefficients.iter().map(|c| -c).collect(), -&form.constant)
}

fn scale(form: &AffineForm, factor: &Rational) -> AffineForm {
    AffineForm::new(
        form.coefficients.iter().map(|c| c * factor).collect(),
        &form.constant * factor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use linfrac_solver::SolutionStatus;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn ints(values: &[i64]) -> Vec<Rational> {
        values.iter().map(|&v| Rational::from_integer(v)).collect()
    }

    fn compile(source: &str) -> Result<CompiledProblem, CompileError> {
        Compiler::compile(&Parser::parse(source).unwrap())
    }

    #[test]
    fn test_compile_ratio() {
        let compiled = compile(
            r#"
            vars x1, x2, x3
            maximize (2*x1 + x2) / (x1 + x2 + 1)
            subject to {
                supply: x1 + x2 + x3 = 4
                x1 = 1 + x3
            }
        "#,
        )
        .unwrap();

        assert_eq!(compiled.variables, vec!["x1", "x2", "x3"]);
        assert_eq!(compiled.constraint_names, vec!["supply", "c2"]);
        assert_eq!(compiled.sense, Sense::Maximize);

        let problem = &compiled.problem;
        assert_eq!(problem.numerator(), &AffineForm::new(ints(&[2, 1, 0]), Rational::zero()));
        assert_eq!(problem.denominator(), &AffineForm::new(ints(&[1, 1, 0]), Rational::one()));
        assert_eq!(problem.constraints()[0], Constraint::new(ints(&[1, 1, 1]), r(4, 1)));
        assert_eq!(problem.constraints()[1], Constraint::new(ints(&[1, 0, -1]), r(1, 1)));
    }

    #[test]
    fn test_linear_objective_has_unit_denominator() {
        let compiled = compile("vars x, y\nmaximize 3*x - y/2 + 1").unwrap();
        assert_eq!(compiled.problem.numerator(), &AffineForm::new(vec![r(3, 1), r(-1, 2)], r(1, 1)));
        assert_eq!(compiled.problem.denominator(), &AffineForm::constant(2, Rational::one()));
        assert_eq!(compiled.problem.num_constraints(), 0);
    }

    #[test]
    fn test_constant_divisor_scales_the_ratio() {
        let compiled = compile("vars x\nmaximize x / (x + 2) / 4").unwrap();
        assert_eq!(compiled.problem.numerator(), &AffineForm::new(vec![r(1, 4)], Rational::zero()));
        assert_eq!(compiled.problem.denominator(), &AffineForm::new(vec![r(1, 1)], r(2, 1)));
    }

    #[test]
    fn test_minimize_negates_numerator_and_result() {
        let compiled = compile(
            r#"
            vars x1, x2
            minimize (x1 + 1) / (x1 + 2)
            subject to {
                x1 + x2 = 3
            }
        "#,
        )
        .unwrap();
        assert_eq!(compiled.problem.numerator(), &AffineForm::new(ints(&[-1, 0]), r(-1, 1)));

        let report = compiled.solve(&Solver::new());
        let solution = report.solution().unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.objective_value, r(1, 2));
        assert_eq!(solution.original_values().unwrap(), &[r(0, 1), r(3, 1)]);
    }

    #[test]
    fn test_compile_and_solve() {
        let compiled = compile(
            r#"
            vars x1, x2, x3
            maximize (2*x1 + x2) / (x1 + x2 + 1)
            subject to {
                x1 + x2 + x3 = 4
                x1 - x3 = 1
            }
        "#,
        )
        .unwrap();

        let report = compiled.solve(&Solver::new());
        let solution = report.solution().unwrap();

        assert_eq!(solution.objective_value, r(10, 7));
        let x = solution.original_values().unwrap();
        assert_eq!(x, &[r(5, 2), r(0, 1), r(3, 2)]);
        assert!(compiled.problem.is_feasible(x));
    }

    #[test]
    fn test_unknown_variable() {
        let error = compile("vars x\nmaximize x + y").unwrap_err();
        assert_eq!(
            error,
            CompileError::UnknownVariable {
                name: "y".to_string(),
                span: Span::new(20, 21),
            }
        );
    }

    #[test]
    fn test_duplicate_names() {
        assert!(matches!(
            compile("vars x, x\nmaximize x"),
            Err(CompileError::DuplicateVariable { .. })
        ));
        assert!(matches!(
            compile("vars x\nmaximize x\nsubject to {\n a: x = 1\n a: x = 2\n}"),
            Err(CompileError::DuplicateConstraint { .. })
        ));
    }

    #[test]
    fn test_objective_count() {
        assert_eq!(compile("vars x\nsubject to {\n x = 1\n}"), Err(CompileError::MissingObjective));
        assert!(matches!(
            compile("vars x\nmaximize x\nminimize x"),
            Err(CompileError::MultipleObjectives { .. })
        ));
        assert_eq!(compile("maximize 1"), Err(CompileError::NoVariables));
    }

    #[test]
    fn test_nonlinear_terms() {
        assert!(matches!(
            compile("vars x, y\nmaximize x * y"),
            Err(CompileError::Nonlinear { .. })
        ));
        // A ratio is only allowed at the top of the objective
        assert!(matches!(
            compile("vars x\nmaximize x / (x + 1) + 1"),
            Err(CompileError::Nonlinear { .. })
        ));
        assert!(matches!(
            compile("vars x\nmaximize x / 0"),
            Err(CompileError::DivisionByZero { .. })
        ));
    }
}
