mod common;
use common::*;

#[test]
fn chunk_is_bootstrapped_with_aliases() {
    let out = translate_text("x = 1").expect("translate should succeed");
    assert_eq!(
        out,
        "var _G = globalThis;\nvar __lua = Lua;\n(function () {\n  x = 1;\n  return null;\n})();\n"
    );
}

#[test]
fn chunk_level_return_is_a_plain_return() {
    let out = translate_text("return 42").expect("translate should succeed");
    assert!(out.ends_with("(function () {\n  return 42;\n})();\n"), "{out}");
}

#[test]
fn options_rebind_global_object_and_runtime() {
    let options = TranslateOptions {
        global_object: "window".to_string(),
        runtime_namespace: "LuaRT".to_string(),
        include_runtime: false,
    };
    let out = translate_text_with_options("", &options).expect("translate should succeed");
    assert!(out.starts_with("var _G = window;\nvar __lua = LuaRT;\n"), "{out}");
}

#[test]
fn runtime_library_is_prepended_on_request() {
    let options = TranslateOptions {
        include_runtime: true,
        ..TranslateOptions::default()
    };
    let out = translate_text_with_options("print(1)", &options).expect("translate should succeed");
    assert!(out.starts_with("var Lua = (function () {"), "{out}");
    let runtime_end = out.find("var _G = globalThis;").expect("bootstrap should follow runtime");
    assert!(runtime_end > 0);
    assert!(out[..runtime_end].contains("ReturnValue: ReturnValue"));
}

#[test]
fn counter_fixture_translates() {
    let out = translate_source_file(fixture_path("counter.lua")).expect("fixture should translate");
    assert!(out.contains("var make_counter = null;"), "{out}");
    assert!(out.contains("count = (count + step);"), "{out}");
    assert!(out.contains("if ((__lvar"), "{out}");
    assert!(out.contains("=== __lua.BREAK)) {"), "{out}");
    assert!(out.contains("print(__lua.concat(\"total: \", total));"), "{out}");
    assert!(out.contains("  return total;\n})();\n"), "{out}");
}

#[test]
fn varargs_fixture_translates() {
    let out = translate_source_file(fixture_path("varargs.lua")).expect("fixture should translate");
    assert!(out.contains("__lua.arg("), "{out}");
    assert!(out.contains("sum.apply(null, __lua.spread("), "{out}");
    assert!(out.contains("\"label\": \"sum\""), "{out}");
    assert!(out.contains("[(1 + 1)]: sum()"), "{out}");
    assert!(out.contains("print(__lua.index(t, 1), __lua.index(t, \"label\"));"), "{out}");
}

#[test]
fn source_file_must_be_lua() {
    match translate_source_file(fixture_path("counter.txt")) {
        Err(SourcePathError::UnsupportedExtension(ext)) => assert_eq!(ext, "txt"),
        other => panic!("expected extension error, got {other:?}"),
    }
    match translate_source_file(fixture_path("counter")) {
        Err(SourcePathError::MissingExtension) => {}
        other => panic!("expected missing extension error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match translate_source_file(fixture_path("missing.lua")) {
        Err(SourcePathError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn parse_errors_surface_with_line() {
    match translate_source_file(fixture_path("bad_syntax.lua")) {
        Err(SourcePathError::Source(SourceError::Parse(err))) => {
            assert_eq!(err.line, 4);
            assert!(err.message.contains("'end' expected"), "{}", err.message);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn translate_errors_are_wrapped() {
    let err = translate_text("break").expect_err("break outside loop");
    assert!(matches!(
        err,
        SourceError::Translate(TranslateError::BreakOutsideLoop)
    ));
    assert_eq!(
        err.to_string(),
        "translate error: 'break' is only allowed inside loops"
    );
}

#[test]
fn diagnostics_render_caret_under_span() {
    let source = "x = 1\ny = 'open";
    let err = parse(source).expect_err("string is unfinished");
    let file = SourceFile::new("chunk.lua", source);
    assert_eq!(
        render_source_error(&file, &err),
        "error: unfinished string\n --> chunk.lua:2:5\n  |\n  2 | y = 'open\n  |     ^^^^^"
    );
}

#[test]
fn diagnostics_without_span_fall_back_to_line() {
    let file = SourceFile::new("chunk.lua", "x = 1\n");
    let err = ParseError::new(3, "boom");
    assert_eq!(render_source_error(&file, &err), "error: chunk.lua:3: boom");
}
