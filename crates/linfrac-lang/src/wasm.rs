//! WASM bindings for linfrac
//!
//! JavaScript-facing entry points for a browser front end: parsing,
//! highlighting, diagnostics and solving with the full step trace.

use wasm_bindgen::prelude::*;

use crate::compiler::Compiler;
use crate::lexer::{Lexer, Span, TokenKind};
use crate::parser::Parser;
use crate::report::Summary;
use linfrac_solver::Solver;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse source code and return the AST as JSON
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&program).map_err(js_error)
}

/// Tokenize source code for syntax highlighting
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsValue> {
    let tokens: Vec<TokenInfo> = Lexer::tokenize(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| TokenInfo {
            kind: format!("{:?}", t.kind),
            token_type: token_type(t.kind).to_string(),
            text: t.text,
            start: t.span.start,
            end: t.span.end,
        })
        .collect();
    serde_wasm_bindgen::to_value(&tokens).map_err(js_error)
}

#[derive(serde::Serialize)]
struct TokenInfo {
    kind: String,
    token_type: String,
    text: String,
    start: usize,
    end: usize,
}

fn token_type(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Vars | TokenKind::Maximize | TokenKind::Minimize | TokenKind::Subject | TokenKind::To => "keyword",
        TokenKind::Ident => "variable",
        TokenKind::Number => "number",
        TokenKind::Comment => "comment",
        TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Equals => "operator",
        TokenKind::Colon
        | TokenKind::Comma
        | TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::LParen
        | TokenKind::RParen => "delimiter",
        TokenKind::Newline => "whitespace",
        TokenKind::Error | TokenKind::Eof => "error",
    }
}

/// Validate source code and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    let diagnostics = diagnostics(source);
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize)]
struct Diagnostic {
    start: usize,
    end: usize,
    severity: String,
    message: String,
}

impl Diagnostic {
    fn error(span: Span, message: String) -> Self {
        Self {
            start: span.start,
            end: span.end,
            severity: "error".to_string(),
            message,
        }
    }
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let whole = Span::new(0, source.len());
    let program = match Parser::parse(source) {
        Ok(program) => program,
        Err(e) => {
            let span = e.span().unwrap_or(Span::new(source.len(), source.len()));
            return vec![Diagnostic::error(span, e.to_string())];
        }
    };

    match Compiler::compile(&program) {
        Ok(_) => Vec::new(),
        Err(e) => vec![Diagnostic::error(e.span().unwrap_or(whole), e.to_string())],
    }
}

/// Solve a program and return the status, values and step trace as JSON
#[wasm_bindgen]
pub fn solve(source: &str, max_iterations: Option<u32>) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(js_error)?;
    let compiled = Compiler::compile(&program).map_err(js_error)?;

    let mut solver = Solver::new();
    if let Some(limit) = max_iterations {
        solver = solver.with_max_iterations(limit as usize);
    }
    let report = compiled.solve(&solver);

    serde_wasm_bindgen::to_value(&Summary::new(&compiled, &report)).map_err(js_error)
}
