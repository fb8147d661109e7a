//! Structured JavaScript output.
//!
//! The translator builds these trees instead of splicing strings, so statement
//! separators and indentation are decided in one place by the renderer.

use std::fmt::Write as _;

const INDENT: &str = "  ";

#[derive(Clone, Debug, PartialEq)]
pub enum JsExpr {
    Null,
    Bool(bool),
    /// Literal text emitted verbatim (numbers, pre-escaped strings).
    Raw(String),
    Ident(String),
    Member {
        object: Box<JsExpr>,
        property: String,
    },
    Index {
        object: Box<JsExpr>,
        key: Box<JsExpr>,
    },
    Binary {
        op: String,
        lhs: Box<JsExpr>,
        rhs: Box<JsExpr>,
    },
    Unary {
        op: String,
        expr: Box<JsExpr>,
    },
    Assign {
        target: Box<JsExpr>,
        value: Box<JsExpr>,
    },
    Conditional {
        condition: Box<JsExpr>,
        then_expr: Box<JsExpr>,
        else_expr: Box<JsExpr>,
    },
    Call {
        callee: Box<JsExpr>,
        args: Vec<JsExpr>,
    },
    New {
        callee: Box<JsExpr>,
        args: Vec<JsExpr>,
    },
    InstanceOf {
        value: Box<JsExpr>,
        class: Box<JsExpr>,
    },
    Function {
        params: Vec<String>,
        body: Vec<JsStmt>,
    },
    Array(Vec<JsExpr>),
    Object(Vec<(PropertyKey, JsExpr)>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKey {
    /// String or number literal text.
    Literal(String),
    Computed(JsExpr),
}

#[derive(Clone, Debug, PartialEq)]
pub enum JsStmt {
    Var {
        name: String,
        init: Option<JsExpr>,
    },
    Assign {
        target: JsExpr,
        value: JsExpr,
    },
    Expr(JsExpr),
    Return(JsExpr),
    If {
        condition: JsExpr,
        then_branch: Vec<JsStmt>,
        else_branch: Vec<JsStmt>,
    },
    While {
        condition: JsExpr,
        body: Vec<JsStmt>,
    },
    DoWhile {
        body: Vec<JsStmt>,
        condition: JsExpr,
    },
    Break,
}

impl JsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        JsExpr::Ident(name.into())
    }

    pub fn member(object: JsExpr, property: impl Into<String>) -> Self {
        JsExpr::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn index(object: JsExpr, key: JsExpr) -> Self {
        JsExpr::Index {
            object: Box::new(object),
            key: Box::new(key),
        }
    }

    pub fn binary(op: impl Into<String>, lhs: JsExpr, rhs: JsExpr) -> Self {
        JsExpr::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: impl Into<String>, expr: JsExpr) -> Self {
        JsExpr::Unary {
            op: op.into(),
            expr: Box::new(expr),
        }
    }

    pub fn call(callee: JsExpr, args: Vec<JsExpr>) -> Self {
        JsExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn new_instance(callee: JsExpr, args: Vec<JsExpr>) -> Self {
        JsExpr::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn instance_of(value: JsExpr, class: JsExpr) -> Self {
        JsExpr::InstanceOf {
            value: Box::new(value),
            class: Box::new(class),
        }
    }

    pub fn assign(target: JsExpr, value: JsExpr) -> Self {
        JsExpr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn conditional(condition: JsExpr, then_expr: JsExpr, else_expr: JsExpr) -> Self {
        JsExpr::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    /// `(function () { body })()`
    pub fn immediately_invoked(body: Vec<JsStmt>) -> Self {
        JsExpr::call(
            JsExpr::Function {
                params: Vec::new(),
                body,
            },
            Vec::new(),
        )
    }
}

/// Renders a statement list as JavaScript source, one statement per line.
pub fn render_program(stmts: &[JsStmt]) -> String {
    let mut out = String::new();
    for stmt in stmts {
        render_stmt(&mut out, stmt, 0);
    }
    out
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn render_block(out: &mut String, stmts: &[JsStmt], depth: usize) {
    for stmt in stmts {
        render_stmt(out, stmt, depth);
    }
}

fn render_stmt(out: &mut String, stmt: &JsStmt, depth: usize) {
    push_indent(out, depth);
    match stmt {
        JsStmt::Var { name, init } => {
            out.push_str("var ");
            out.push_str(name);
            if let Some(init) = init {
                out.push_str(" = ");
                render_expr(out, init, depth);
            }
            out.push_str(";\n");
        }
        JsStmt::Assign { target, value } if starts_with_object(target) => {
            out.push('(');
            render_expr(out, target, depth);
            out.push_str(" = ");
            render_expr(out, value, depth);
            out.push_str(");\n");
        }
        JsStmt::Assign { target, value } => {
            render_expr(out, target, depth);
            out.push_str(" = ");
            render_expr(out, value, depth);
            out.push_str(";\n");
        }
        JsStmt::Expr(expr) if starts_with_object(expr) => {
            // a leading `{` would parse as a block
            out.push('(');
            render_expr(out, expr, depth);
            out.push_str(");\n");
        }
        JsStmt::Expr(expr) => {
            render_expr(out, expr, depth);
            out.push_str(";\n");
        }
        JsStmt::Return(expr) => {
            out.push_str("return ");
            render_expr(out, expr, depth);
            out.push_str(";\n");
        }
        JsStmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            render_if_chain(out, condition, then_branch, else_branch, depth);
            out.push('\n');
        }
        JsStmt::While { condition, body } => {
            out.push_str("while (");
            render_expr(out, condition, depth);
            out.push_str(") {\n");
            render_block(out, body, depth + 1);
            push_indent(out, depth);
            out.push_str("}\n");
        }
        JsStmt::DoWhile { body, condition } => {
            out.push_str("do {\n");
            render_block(out, body, depth + 1);
            push_indent(out, depth);
            out.push_str("} while (");
            render_expr(out, condition, depth);
            out.push_str(");\n");
        }
        JsStmt::Break => out.push_str("break;\n"),
    }
}

fn starts_with_object(expr: &JsExpr) -> bool {
    match expr {
        JsExpr::Object(_) => true,
        JsExpr::Call { callee, .. } => starts_with_object(callee),
        JsExpr::Member { object, .. } | JsExpr::Index { object, .. } => starts_with_object(object),
        _ => false,
    }
}

fn render_if_chain(
    out: &mut String,
    condition: &JsExpr,
    then_branch: &[JsStmt],
    else_branch: &[JsStmt],
    depth: usize,
) {
    out.push_str("if (");
    render_expr(out, condition, depth);
    out.push_str(") {\n");
    render_block(out, then_branch, depth + 1);
    push_indent(out, depth);
    out.push('}');
    match else_branch {
        [] => {}
        [
            JsStmt::If {
                condition,
                then_branch,
                else_branch,
            },
        ] => {
            out.push_str(" else ");
            render_if_chain(out, condition, then_branch, else_branch, depth);
        }
        stmts => {
            out.push_str(" else {\n");
            render_block(out, stmts, depth + 1);
            push_indent(out, depth);
            out.push('}');
        }
    }
}

fn render_list(out: &mut String, exprs: &[JsExpr], depth: usize) {
    for (index, expr) in exprs.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        render_expr(out, expr, depth);
    }
}

fn render_expr(out: &mut String, expr: &JsExpr, depth: usize) {
    match expr {
        JsExpr::Null => out.push_str("null"),
        JsExpr::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        JsExpr::Raw(text) | JsExpr::Ident(text) => out.push_str(text),
        JsExpr::Member { object, property } => {
            render_expr(out, object, depth);
            out.push('.');
            out.push_str(property);
        }
        JsExpr::Index { object, key } => {
            render_expr(out, object, depth);
            out.push('[');
            render_expr(out, key, depth);
            out.push(']');
        }
        JsExpr::Binary { op, lhs, rhs } => {
            out.push('(');
            render_expr(out, lhs, depth);
            let _ = write!(out, " {op} ");
            render_expr(out, rhs, depth);
            out.push(')');
        }
        JsExpr::Unary { op, expr } => {
            out.push('(');
            out.push_str(op);
            if op.ends_with(|ch: char| ch.is_ascii_alphabetic()) {
                out.push(' ');
            }
            render_expr(out, expr, depth);
            out.push(')');
        }
        JsExpr::Assign { target, value } => {
            out.push('(');
            render_expr(out, target, depth);
            out.push_str(" = ");
            render_expr(out, value, depth);
            out.push(')');
        }
        JsExpr::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            out.push('(');
            render_expr(out, condition, depth);
            out.push_str(" ? ");
            render_expr(out, then_expr, depth);
            out.push_str(" : ");
            render_expr(out, else_expr, depth);
            out.push(')');
        }
        JsExpr::Call { callee, args } => {
            render_expr(out, callee, depth);
            out.push('(');
            render_list(out, args, depth);
            out.push(')');
        }
        JsExpr::New { callee, args } => {
            out.push_str("new ");
            render_expr(out, callee, depth);
            out.push('(');
            render_list(out, args, depth);
            out.push(')');
        }
        JsExpr::InstanceOf { value, class } => {
            out.push('(');
            render_expr(out, value, depth);
            out.push_str(" instanceof ");
            render_expr(out, class, depth);
            out.push(')');
        }
        JsExpr::Function { params, body } => {
            let _ = write!(out, "(function ({}) {{\n", params.join(", "));
            render_block(out, body, depth + 1);
            push_indent(out, depth);
            out.push_str("})");
        }
        JsExpr::Array(items) => {
            out.push('[');
            render_list(out, items, depth);
            out.push(']');
        }
        JsExpr::Object(entries) => {
            if entries.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (index, (key, value)) in entries.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                match key {
                    PropertyKey::Literal(text) => out.push_str(text),
                    PropertyKey::Computed(expr) => {
                        out.push('[');
                        render_expr(out, expr, depth);
                        out.push(']');
                    }
                }
                out.push_str(": ");
                render_expr(out, value, depth);
            }
            out.push_str(" }");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_expr_text(expr: &JsExpr) -> String {
        let mut out = String::new();
        render_expr(&mut out, expr, 0);
        out
    }

    #[test]
    fn renders_nested_function_with_indentation() {
        let program = vec![JsStmt::Expr(JsExpr::immediately_invoked(vec![
            JsStmt::Var {
                name: "a".to_string(),
                init: Some(JsExpr::Raw("1".to_string())),
            },
            JsStmt::Return(JsExpr::ident("a")),
        ]))];
        assert_eq!(
            render_program(&program),
            "(function () {\n  var a = 1;\n  return a;\n})();\n"
        );
    }

    #[test]
    fn renders_else_if_chain_flat() {
        let stmt = JsStmt::If {
            condition: JsExpr::ident("a"),
            then_branch: vec![JsStmt::Break],
            else_branch: vec![JsStmt::If {
                condition: JsExpr::ident("b"),
                then_branch: vec![JsStmt::Return(JsExpr::Null)],
                else_branch: vec![JsStmt::Return(JsExpr::Bool(true))],
            }],
        };
        assert_eq!(
            render_program(&[stmt]),
            "if (a) {\n  break;\n} else if (b) {\n  return null;\n} else {\n  return true;\n}\n"
        );
    }

    #[test]
    fn renders_word_unary_with_space() {
        let expr = JsExpr::unary("typeof", JsExpr::ident("x"));
        assert_eq!(render_expr_text(&expr), "(typeof x)");
        let expr = JsExpr::unary("-", JsExpr::Raw("1".to_string()));
        assert_eq!(render_expr_text(&expr), "(-1)");
    }

    #[test]
    fn renders_object_with_literal_and_computed_keys() {
        let expr = JsExpr::Object(vec![
            (PropertyKey::Literal("\"x\"".to_string()), JsExpr::Null),
            (
                PropertyKey::Computed(JsExpr::ident("k")),
                JsExpr::Bool(false),
            ),
        ]);
        assert_eq!(
            render_expr_text(&expr),
            "{ \"x\": null, [k]: false }"
        );
        assert_eq!(render_expr_text(&JsExpr::Object(Vec::new())), "{}");
    }

    #[test]
    fn statement_leading_with_object_is_parenthesised() {
        let stmt = JsStmt::Expr(JsExpr::call(JsExpr::Object(Vec::new()), Vec::new()));
        assert_eq!(render_program(&[stmt]), "({}());\n");
    }

    #[test]
    fn assignment_into_object_literal_is_parenthesised() {
        let stmt = JsStmt::Assign {
            target: JsExpr::index(JsExpr::Object(Vec::new()), JsExpr::Raw("1".to_string())),
            value: JsExpr::Raw("2".to_string()),
        };
        assert_eq!(render_program(&[stmt]), "({}[1] = 2);\n");
    }
}
