pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod report;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::*;
pub use compiler::{CompileError, CompiledProblem, Compiler};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use report::{NamedValue, StepSummary, Summary};

/// Either stage of turning source text into a problem
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
}

impl SourceError {
    pub fn span(&self) -> Option<Span> {
        match self {
            SourceError::Parse(e) => e.span(),
            SourceError::Compile(e) => e.span(),
        }
    }
}

/// Parses and compiles `source` in one step.
pub fn compile_source(source: &str) -> Result<CompiledProblem, SourceError> {
    let program = Parser::parse(source)?;
    Ok(Compiler::compile(&program)?)
}
