#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

pub use translator::{
    Node, ParseError, SourceError, SourceFile, SourcePathError, Span, TranslateError,
    RUNTIME_JS, TranslateOptions, Translator, UnsupportedConstruct, parse, render_program,
    render_source_error, translate_ast, translate_chunk, translate_source_file,
    translate_source_file_with_options, translate_text, translate_text_with_options,
};

/// Translates statements without the chunk wrapper.
pub fn js(nodes: &[Node]) -> String {
    translate_ast(nodes).expect("translation should succeed")
}

pub fn js_err(nodes: &[Node]) -> TranslateError {
    translate_ast(nodes).expect_err("translation should fail")
}

/// Parses and translates Lua source without the chunk wrapper.
pub fn lua_body(source: &str) -> String {
    let nodes = parse(source).expect("source should parse");
    js(&nodes)
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

pub fn if_stmt(cond: Node, body: Vec<Node>) -> Node {
    Node::If {
        cond: Box::new(cond),
        body,
        elifs: Vec::new(),
        else_body: Vec::new(),
    }
}

pub fn do_block(body: Vec<Node>) -> Node {
    Node::Do { body }
}

pub fn table(entries: Vec<Node>) -> Node {
    Node::Table { entries }
}

pub fn vars(names: &[&str]) -> Vec<Node> {
    names.iter().map(|name| Node::var(*name)).collect()
}

pub fn numbers(values: &[i64]) -> Vec<Node> {
    values
        .iter()
        .map(|value| Node::number(value.to_string()))
        .collect()
}
