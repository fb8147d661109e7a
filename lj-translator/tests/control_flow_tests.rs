mod common;
use common::*;

#[test]
fn do_block_runs_in_its_own_closure() {
    let out = js(&[do_block(vec![Node::local_assign(vars(&["x"]), numbers(&[1]))])]);
    assert_eq!(out, "(function () {\n  var x = 1;\n})();\n");
}

#[test]
fn return_from_do_block_unwraps_the_value() {
    let function = Node::function(Vec::new(), vec![do_block(vec![Node::ret(Node::number("1"))])]);
    assert_eq!(
        js(&[function]),
        "(function () {\n  var __lvar0 = (function () {\n    return new __lua.ReturnValue(1);\n  })();\n  if ((__lvar0 instanceof __lua.ReturnValue)) {\n    return __lvar0.value;\n  }\n  return null;\n});\n"
    );
}

#[test]
fn return_propagates_through_nested_wrappers() {
    let function = Node::function(
        Vec::new(),
        vec![Node::while_loop(
            Node::True,
            vec![do_block(vec![Node::ret(Node::var("x"))])],
        )],
    );
    assert_eq!(
        js(&[function]),
        "(function () {\n  var __lvar1 = (function () {\n    while (__lua.isTrue(true)) {\n      var __lvar0 = (function () {\n        return new __lua.ReturnValue(x);\n      })();\n      if ((__lvar0 instanceof __lua.ReturnValue)) {\n        return __lvar0;\n      }\n    }\n  })();\n  if ((__lvar1 instanceof __lua.ReturnValue)) {\n    return __lvar1.value;\n  }\n  return null;\n});\n"
    );
}

#[test]
fn break_in_loop_body_stays_native() {
    let out = js(&[Node::while_loop(Node::True, vec![Node::Break])]);
    assert_eq!(
        out,
        "(function () {\n  while (__lua.isTrue(true)) {\n    break;\n  }\n})();\n"
    );
}

#[test]
fn break_in_do_block_is_signalled_to_the_loop() {
    let out = js(&[Node::while_loop(Node::True, vec![do_block(vec![Node::Break])])]);
    assert_eq!(
        out,
        "(function () {\n  while (__lua.isTrue(true)) {\n    var __lvar0 = (function () {\n      return __lua.BREAK;\n    })();\n    if ((__lvar0 === __lua.BREAK)) {\n      break;\n    }\n  }\n})();\n"
    );
}

#[test]
fn break_crosses_several_plain_blocks() {
    let out = js(&[Node::while_loop(
        Node::True,
        vec![do_block(vec![do_block(vec![Node::Break])])],
    )]);
    assert!(
        out.contains("if ((__lvar0 === __lua.BREAK)) {\n        return __lvar0;\n      }"),
        "{out}"
    );
    assert!(
        out.contains("if ((__lvar1 === __lua.BREAK)) {\n      break;\n    }"),
        "{out}"
    );
}

#[test]
fn return_and_break_from_one_block_are_both_forwarded() {
    let out = lua_body(
        "local f = function() while true do if x then return 1 else break end end end",
    );
    let return_check = out
        .find("instanceof __lua.ReturnValue")
        .expect("return check should be emitted");
    let break_check = out
        .find("=== __lua.BREAK")
        .expect("break check should be emitted");
    assert!(return_check < break_check, "{out}");
}

#[test]
fn break_outside_loop_fails() {
    assert_eq!(js_err(&[Node::Break]), TranslateError::BreakOutsideLoop);
    assert_eq!(
        js_err(&[do_block(vec![Node::Break])]),
        TranslateError::BreakOutsideLoop
    );
    let in_function = Node::while_loop(
        Node::True,
        vec![Node::function(Vec::new(), vec![Node::Break])],
    );
    assert_eq!(js_err(&[in_function]), TranslateError::BreakOutsideLoop);
}

#[test]
fn repeat_checks_condition_after_body() {
    let out = js(&[Node::repeat(
        Node::var("done"),
        vec![Node::call(Node::var("step"), Vec::new())],
    )]);
    assert_eq!(
        out,
        "(function () {\n  do {\n    step();\n  } while (__lua.isFalse(done));\n})();\n"
    );
}

#[test]
fn repeat_condition_sees_body_locals() {
    let out = lua_body("repeat local x = f() until x");
    assert_eq!(
        out,
        "(function () {\n  do {\n    var x = f();\n  } while (__lua.isFalse(x));\n})();\n"
    );
}

#[test]
fn if_chain_renders_as_else_if() {
    let function = Node::function(
        Vec::new(),
        vec![Node::If {
            cond: Box::new(Node::var("a")),
            body: vec![Node::ret(Node::number("1"))],
            elifs: vec![(Node::var("b"), vec![Node::ret(Node::number("2"))])],
            else_body: vec![Node::ret(Node::number("3"))],
        }],
    );
    assert_eq!(
        js(&[function]),
        "(function () {\n  var __lvar0 = (function () {\n    if (__lua.isTrue(a)) {\n      return new __lua.ReturnValue(1);\n    } else if (__lua.isTrue(b)) {\n      return new __lua.ReturnValue(2);\n    } else {\n      return new __lua.ReturnValue(3);\n    }\n  })();\n  if ((__lvar0 instanceof __lua.ReturnValue)) {\n    return __lvar0.value;\n  }\n  return null;\n});\n"
    );
}

#[test]
fn if_without_return_is_a_plain_statement() {
    let out = lua_body("if a then f() elseif b then g() end");
    assert_eq!(
        out,
        "(function () {\n  if (__lua.isTrue(a)) {\n    f();\n  } else if (__lua.isTrue(b)) {\n    g();\n  }\n})();\n"
    );
}

#[test]
fn function_inside_loop_has_its_own_return() {
    let out = lua_body("while x do local f = function() return 1 end end");
    assert!(out.contains("var f = (function () {\n      return 1;\n    });"), "{out}");
    assert!(!out.contains("ReturnValue"), "{out}");
}

#[test]
fn numeric_for_counts_with_step() {
    let out = translate_text("for i = 10, 1, -2 do print(i) end").expect("translate should succeed");
    assert!(out.contains("var i = $for_i;"), "{out}");
    assert!(out.contains("$for_i = ($for_i + $for_step);"), "{out}");
    assert!(out.contains("print(i);"), "{out}");
    assert!(out.contains("(-2)"), "{out}");
}

#[test]
fn numeric_for_closures_capture_their_own_pass() {
    let out = lua_body("for i = 1, 3 do fs[i] = function() return i end end");
    assert!(
        out.contains(
            "      (function () {\n        var i = $for_i;\n        $for_i = ($for_i + $for_step);\n        fs[i] = (function () {\n          return i;\n        });\n      })();\n"
        ),
        "{out}"
    );
}

#[test]
fn break_in_numeric_for_leaves_the_native_loop() {
    let out = lua_body("for i = 1, 3 do if i == 2 then break end end");
    assert!(out.contains("return __lua.BREAK;"), "{out}");
    assert!(out.contains("break;\n"), "{out}");
}
