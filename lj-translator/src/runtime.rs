//! Contract between emitted code and the JavaScript runtime library.
//!
//! Emitted programs reach the library through the `__lua` alias that the
//! bootstrap binds to the runtime namespace object.

/// Source of the runtime library. Defines the global `Lua` namespace.
pub const RUNTIME_JS: &str = include_str!("../runtime/lua_runtime.js");

/// Namespace object declared by [`RUNTIME_JS`].
pub const DEFAULT_NAMESPACE: &str = "Lua";

/// Alias emitted code uses for the runtime namespace.
pub const NAMESPACE_ALIAS: &str = "__lua";

/// Alias emitted code uses for the global environment table.
pub const GLOBAL_ALIAS: &str = "_G";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuntimeHelper {
    IsTrue,
    IsFalse,
    Arg,
    Spread,
    ReturnValue,
    Break,
    Index,
    Concat,
    Len,
    IntegerDivide,
    Equal,
    Pack,
}

impl RuntimeHelper {
    pub fn js_name(self) -> &'static str {
        match self {
            RuntimeHelper::IsTrue => "isTrue",
            RuntimeHelper::IsFalse => "isFalse",
            RuntimeHelper::Arg => "arg",
            RuntimeHelper::Spread => "spread",
            RuntimeHelper::ReturnValue => "ReturnValue",
            RuntimeHelper::Break => "BREAK",
            RuntimeHelper::Index => "index",
            RuntimeHelper::Concat => "concat",
            RuntimeHelper::Len => "len",
            RuntimeHelper::IntegerDivide => "idiv",
            RuntimeHelper::Equal => "eq",
            RuntimeHelper::Pack => "pack",
        }
    }

    pub const ALL: [RuntimeHelper; 12] = [
        RuntimeHelper::IsTrue,
        RuntimeHelper::IsFalse,
        RuntimeHelper::Arg,
        RuntimeHelper::Spread,
        RuntimeHelper::ReturnValue,
        RuntimeHelper::Break,
        RuntimeHelper::Index,
        RuntimeHelper::Concat,
        RuntimeHelper::Len,
        RuntimeHelper::IntegerDivide,
        RuntimeHelper::Equal,
        RuntimeHelper::Pack,
    ];
}
