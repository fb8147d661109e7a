pub mod ast;
pub mod compiler;
pub mod runtime;

pub use ast::Node;
pub use compiler::diagnostics::render_source_error;
pub use compiler::{
    JsExpr, JsStmt, ParseError, PropertyKey, SourceError, SourceFile, SourcePathError, Span,
    TranslateError, TranslateOptions, Translator, UnsupportedConstruct, parse, render_program,
    translate_ast, translate_chunk, translate_source_file, translate_source_file_with_options,
    translate_text, translate_text_with_options,
};
pub use runtime::{RUNTIME_JS, RuntimeHelper};
