use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use linfrac_lang::{CompiledProblem, Summary};
use linfrac_solver::{SolutionStatus, Solver, DEFAULT_MAX_ITERATIONS};

#[derive(Parser)]
#[command(name = "linfrac")]
#[command(about = "Exact solver for linear-fractional programs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .lf file and output the AST
    Parse {
        /// The file to parse
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Check a .lf file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Solve a program and output the optimum
    Solve {
        /// The file containing the program
        file: PathBuf,
        /// Print every step with its tableau
        #[arg(short, long)]
        trace: bool,
        /// Simplex pivots allowed per loop before giving up
        #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn read_source(file: &Path) -> String {
    let source = std::fs::read_to_string(file).unwrap_or_else(|e| fail(format!("Error reading file: {}", e)));
    debug!(path = %file.display(), bytes = source.len(), "read source");
    source
}

fn compile(file: &Path) -> CompiledProblem {
    let source = read_source(file);
    let compiled = linfrac_lang::compile_source(&source).unwrap_or_else(|e| fail(e));
    info!(
        variables = compiled.problem.num_variables(),
        constraints = compiled.problem.num_constraints(),
        sense = %compiled.sense,
        "compiled program"
    );
    compiled
}

fn status_label(status: SolutionStatus) -> &'static str {
    match status {
        SolutionStatus::Optimal => "OPTIMAL",
        SolutionStatus::Degenerate => "DEGENERATE",
        SolutionStatus::Infeasible => "INFEASIBLE",
        SolutionStatus::Unbounded => "UNBOUNDED",
        SolutionStatus::IterationLimit => "ITERATION LIMIT",
        SolutionStatus::Error => "ERROR",
    }
}

fn print_summary(summary: &Summary, trace: bool) {
    if trace {
        for (i, step) in summary.steps.iter().enumerate() {
            println!("[{}] {:?}: {}", i, step.stage, step.title);
            if !step.explanation.is_empty() {
                println!("{}", step.explanation);
            }
            if let Some(ref table) = step.table {
                println!();
                println!("{}", table);
            }
            println!();
        }
    }

    println!("Status: {}", status_label(summary.status));
    if let Some(ref z) = summary.objective_value {
        println!("Objective ({}): {} ≈ {:.6}", summary.sense, z.value, z.decimal);
    }

    if !summary.variables.is_empty() {
        println!();
        println!("Variables:");
        for v in &summary.variables {
            println!("  {:20} {:>12}  ≈ {:.6}", v.name, v.value.to_string(), v.decimal);
        }
    }

    if !summary.transformed.is_empty() {
        println!();
        println!("Transformed:");
        for v in &summary.transformed {
            println!("  {:20} {:>12}", v.name, v.value.to_string());
        }
    }

    if let Some(ref error) = summary.error {
        println!();
        println!("Error: {}", error);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { file, format } => {
            let source = read_source(&file);
            let program = linfrac_lang::Parser::parse(&source).unwrap_or_else(|e| fail(format!("Parse error: {}", e)));

            match format {
                Format::Json => match serde_json::to_string_pretty(&program) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(format!("Error serializing AST: {}", e)),
                },
                Format::Pretty => println!("{:#?}", program),
            }
        }
        Commands::Check { file } => {
            let compiled = compile(&file);
            let problem = &compiled.problem;

            println!("OK: {} variables, {} constraints", problem.num_variables(), problem.num_constraints());
            println!("Variables: {}", compiled.variables.join(", "));
            println!("Constraints: {}", compiled.constraint_names.join(", "));
            println!("Sense: {}", compiled.sense);
        }
        Commands::Solve {
            file,
            trace,
            max_iterations,
            format,
        } => {
            let compiled = compile(&file);
            let solver = Solver::new().with_max_iterations(max_iterations);
            let report = compiled.solve(&solver);
            info!(path = %file.display(), status = ?report.status(), steps = report.trace.len(), "solved");
            let summary = Summary::new(&compiled, &report);

            match format {
                Format::Json => match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(format!("Error serializing report: {}", e)),
                },
                Format::Pretty => print_summary(&summary, trace),
            }

            if !matches!(report.status(), SolutionStatus::Optimal | SolutionStatus::Degenerate) {
                std::process::exit(1);
            }
        }
    }
}
