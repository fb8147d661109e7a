mod common;
use common::*;

#[test]
fn function_without_return_returns_null() {
    let function = Node::function(
        Vec::new(),
        vec![Node::call(Node::var("print"), Vec::new())],
    );
    assert_eq!(
        js(&[function]),
        "(function () {\n  print();\n  return null;\n});\n"
    );
}

#[test]
fn trailing_separators_do_not_hide_the_final_return() {
    let function = Node::function(
        Vec::new(),
        vec![Node::ret(Node::Nil), Node::Semicolon, Node::Newline],
    );
    assert_eq!(js(&[function]), "(function () {\n  return null;\n});\n");
}

#[test]
fn separators_in_parameter_and_argument_lists_are_skipped() {
    let function = Node::function(
        vec![Node::var("a"), Node::Newline, Node::var("b")],
        vec![Node::ret(Node::call(
            Node::var("f"),
            vec![Node::var("a"), Node::Newline, Node::var("b")],
        ))],
    );
    assert_eq!(
        js(&[function]),
        "(function (a, b) {\n  return f(a, b);\n});\n"
    );
}

#[test]
fn vararg_call_spreads_through_apply() {
    let function = Node::function(
        vec![Node::var("a"), Node::Ellipsis],
        vec![Node::ret(Node::call(
            Node::var("f"),
            vec![Node::var("a"), Node::Ellipsis],
        ))],
    );
    assert_eq!(
        js(&[function]),
        "(function (a) {\n  var __lvar0 = arguments;\n  return f.apply(null, __lua.spread(__lvar0, 1, [a], []));\n});\n"
    );
}

#[test]
fn vararg_in_the_middle_of_arguments_keeps_trailing_values() {
    let out = lua_body("local g = function(...) h(1, ..., 2) end");
    assert!(
        out.contains("h.apply(null, __lua.spread(__lvar0, 0, [1], [2]));"),
        "{out}"
    );
}

#[test]
fn bare_vararg_reads_first_extra_argument() {
    let function = Node::function(vec![Node::Ellipsis], vec![Node::ret(Node::Ellipsis)]);
    assert_eq!(
        js(&[function]),
        "(function () {\n  var __lvar0 = arguments;\n  return __lua.arg(__lvar0, 0);\n});\n"
    );
}

#[test]
fn vararg_assignment_expands_over_uncovered_targets() {
    let function = Node::function(
        vec![Node::Ellipsis],
        vec![
            Node::local_assign(vars(&["a", "b", "c"]), vec![Node::Ellipsis]),
            Node::ret(Node::var("b")),
        ],
    );
    assert_eq!(
        js(&[function]),
        "(function () {\n  var __lvar0 = arguments;\n  var __lvar1 = __lua.arg(__lvar0, 0);\n  var __lvar2 = __lua.arg(__lvar0, 1);\n  var __lvar3 = __lua.arg(__lvar0, 2);\n  var a = __lvar1;\n  var b = __lvar2;\n  var c = __lvar3;\n  return b;\n});\n"
    );
}

#[test]
fn vararg_slots_start_after_named_parameters() {
    let out = lua_body("local f = function(p, ...) local x, y, z = 1, ... return z end");
    assert!(out.contains("var __lvar2 = __lua.arg(__lvar0, 1);"), "{out}");
    assert!(out.contains("var __lvar3 = __lua.arg(__lvar0, 2);"), "{out}");
    assert!(out.contains("var z = __lvar3;"), "{out}");
}

#[test]
fn block_wrappers_use_the_arguments_alias() {
    let out = lua_body("local f = function(...) do print(...) end end");
    assert!(
        out.contains("    print.apply(null, __lua.spread(__lvar0, 0, [], []));\n"),
        "{out}"
    );
    assert_eq!(out.matches("arguments").count(), 1, "{out}");
}

#[test]
fn trailing_vararg_in_table_keeps_every_value() {
    let out = lua_body("local count = function(...) local t = {...} return #t end");
    assert_eq!(
        out,
        "var count = (function () {\n  var __lvar0 = arguments;\n  var t = __lua.pack({}, 1, __lvar0, 0);\n  return __lua.len(t);\n});\n"
    );
}

#[test]
fn trailing_vararg_in_table_continues_after_positional_entries() {
    let out = lua_body("local f = function(p, ...) return { p, k = 1, ... } end");
    assert!(
        out.contains("return __lua.pack({ 1: p, \"k\": 1 }, 2, __lvar0, 1);"),
        "{out}"
    );
}

#[test]
fn vararg_before_the_last_table_entry_keeps_one_value() {
    let out = lua_body("local f = function(...) return { ..., 0 } end");
    assert!(
        out.contains("return { 1: __lua.arg(__lvar0, 0), 2: 0 };"),
        "{out}"
    );
}

#[test]
fn table_vararg_outside_vararg_function_is_rejected() {
    let err = js_err(&[table(vec![Node::Ellipsis])]);
    assert_eq!(
        err,
        TranslateError::Unsupported(UnsupportedConstruct::VarargOutsideVarargFunction)
    );
}

#[test]
fn vararg_is_rejected_in_a_non_vararg_function() {
    let err = js_err(&[Node::function(
        vec![Node::Ellipsis],
        vec![Node::ret(Node::function(
            Vec::new(),
            vec![Node::ret(Node::Ellipsis)],
        ))],
    )]);
    assert_eq!(
        err,
        TranslateError::Unsupported(UnsupportedConstruct::VarargOutsideVarargFunction)
    );
}

#[test]
fn vararg_spread_outside_vararg_function_is_rejected() {
    let err = js_err(&[Node::call(Node::var("f"), vec![Node::Ellipsis])]);
    assert_eq!(
        err,
        TranslateError::Unsupported(UnsupportedConstruct::VarargSpreadOutsideVarargFunction)
    );
    assert_eq!(
        err.to_string(),
        "unsupported construct: cannot spread '...' into call arguments outside a vararg function"
    );
}

#[test]
fn ellipsis_must_be_the_last_parameter() {
    let err = js_err(&[Node::function(
        vec![Node::Ellipsis, Node::var("a")],
        Vec::new(),
    )]);
    assert_eq!(
        err,
        TranslateError::UnexpectedNode {
            kind: "Ellipsis",
            context: "parameter list",
        }
    );
}

#[test]
fn local_function_can_call_itself() {
    let out = lua_body("local function fact(n) if n <= 1 then return 1 end return n * fact(n - 1) end");
    assert!(out.starts_with("var fact = null;\nfact = (function (n) {\n"), "{out}");
    assert!(out.contains("return (n * fact((n - 1)));"), "{out}");
}
