use std::path::Path;

use tracing::debug;

use crate::ast::Node;
use crate::runtime;

pub mod diagnostics;
pub mod js;
mod literals;
mod parser;
mod reserved;
mod scope;
pub mod source_map;
mod translator;

pub use js::{JsExpr, JsStmt, PropertyKey, render_program};
pub use source_map::{SourceFile, Span};
pub use translator::Translator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Source constructs that have no JavaScript rendering in the current context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    VarargOutsideVarargFunction,
    VarargSpreadOutsideVarargFunction,
}

impl std::fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedConstruct::VarargOutsideVarargFunction => {
                write!(f, "cannot use '...' outside a vararg function")
            }
            UnsupportedConstruct::VarargSpreadOutsideVarargFunction => write!(
                f,
                "cannot spread '...' into call arguments outside a vararg function"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    Unsupported(UnsupportedConstruct),
    /// A node kind showed up where the tree grammar does not allow it.
    UnexpectedNode {
        kind: &'static str,
        context: &'static str,
    },
    BreakOutsideLoop,
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Unsupported(construct) => {
                write!(f, "unsupported construct: {construct}")
            }
            TranslateError::UnexpectedNode { kind, context } => write!(
                f,
                "internal error: node kind '{kind}' is not valid in {context}"
            ),
            TranslateError::BreakOutsideLoop => write!(f, "'break' is only allowed inside loops"),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<UnsupportedConstruct> for TranslateError {
    fn from(value: UnsupportedConstruct) -> Self {
        TranslateError::Unsupported(value)
    }
}

#[derive(Debug)]
pub enum SourceError {
    Parse(ParseError),
    Translate(TranslateError),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Parse(err) => write!(f, "{err}"),
            SourceError::Translate(err) => write!(f, "translate error: {err}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<ParseError> for SourceError {
    fn from(value: ParseError) -> Self {
        SourceError::Parse(value)
    }
}

impl From<TranslateError> for SourceError {
    fn from(value: TranslateError) -> Self {
        SourceError::Translate(value)
    }
}

#[derive(Debug)]
pub enum SourcePathError {
    Io(std::io::Error),
    MissingExtension,
    UnsupportedExtension(String),
    Source(SourceError),
}

impl std::fmt::Display for SourcePathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourcePathError::Io(err) => write!(f, "{err}"),
            SourcePathError::MissingExtension => write!(f, "source file must have an extension"),
            SourcePathError::UnsupportedExtension(ext) => {
                write!(f, "unsupported source extension '.{ext}', expected .lua")
            }
            SourcePathError::Source(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SourcePathError {}

impl From<std::io::Error> for SourcePathError {
    fn from(value: std::io::Error) -> Self {
        SourcePathError::Io(value)
    }
}

impl From<SourceError> for SourcePathError {
    fn from(value: SourceError) -> Self {
        SourcePathError::Source(value)
    }
}

/// How the translated chunk is bound into its JavaScript host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Expression bound to `_G`.
    pub global_object: String,
    /// Global holding the runtime library namespace, bound to `__lua`.
    pub runtime_namespace: String,
    /// Prepend the runtime library source to the output.
    pub include_runtime: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            global_object: "globalThis".to_string(),
            runtime_namespace: runtime::DEFAULT_NAMESPACE.to_string(),
            include_runtime: false,
        }
    }
}

pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    parser::Parser::new(source)?.parse_chunk()
}

/// Translates statements as-is, without the top-level function wrapper.
pub fn translate_ast(nodes: &[Node]) -> Result<String, TranslateError> {
    let stmts = Translator::new().translate_program(nodes)?;
    Ok(render_program(&stmts))
}

/// Translates a parsed chunk into a self-contained script.
pub fn translate_chunk(nodes: &[Node], options: &TranslateOptions) -> Result<String, TranslateError> {
    let stmts = Translator::new().translate_bootstrapped(nodes, options)?;
    let mut out = String::new();
    if options.include_runtime {
        out.push_str(runtime::RUNTIME_JS);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(&render_program(&stmts));
    Ok(out)
}

pub fn translate_text(source: &str) -> Result<String, SourceError> {
    translate_text_with_options(source, &TranslateOptions::default())
}

pub fn translate_text_with_options(
    source: &str,
    options: &TranslateOptions,
) -> Result<String, SourceError> {
    let nodes = parse(source)?;
    debug!(statements = nodes.len(), "parsed lua chunk");
    Ok(translate_chunk(&nodes, options)?)
}

pub fn translate_source_file(path: impl AsRef<Path>) -> Result<String, SourcePathError> {
    translate_source_file_with_options(path, &TranslateOptions::default())
}

pub fn translate_source_file_with_options(
    path: impl AsRef<Path>,
    options: &TranslateOptions,
) -> Result<String, SourcePathError> {
    let path = path.as_ref();
    check_extension(path)?;
    let source = std::fs::read_to_string(path)?;
    Ok(translate_text_with_options(&source, options)?)
}

fn check_extension(path: &Path) -> Result<(), SourcePathError> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .ok_or(SourcePathError::MissingExtension)?;
    if ext.eq_ignore_ascii_case("lua") {
        Ok(())
    } else {
        Err(SourcePathError::UnsupportedExtension(ext.to_string()))
    }
}
