use std::collections::HashMap;
use std::sync::LazyLock;

use crate::runtime::NAMESPACE_ALIAS;

/// JavaScript keywords and host-sensitive names that are legal Lua
/// identifiers. `$` cannot appear in a Lua name, so the aliases never clash
/// with user identifiers.
const RESERVED_WORDS: &[&str] = &[
    "arguments",
    "await",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "enum",
    "eval",
    "export",
    "extends",
    "finally",
    "implements",
    "import",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "with",
    "yield",
];

static RESERVED_ALIASES: LazyLock<HashMap<&'static str, String>> = LazyLock::new(|| {
    RESERVED_WORDS
        .iter()
        .map(|word| (*word, format!("${word}")))
        .collect()
});

/// Prefixes of names the translator generates itself.
const GENERATED_PREFIXES: &[&str] = &["__lvar", "__for_"];

/// True for user identifiers that could be mistaken for a generated name.
pub fn looks_generated(name: &str) -> bool {
    name == NAMESPACE_ALIAS
        || GENERATED_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

pub fn alias_for(name: &str) -> Option<String> {
    if let Some(alias) = RESERVED_ALIASES.get(name) {
        return Some(alias.clone());
    }
    looks_generated(name).then(|| format!("${name}"))
}

pub fn reserved_words() -> impl Iterator<Item = &'static str> {
    RESERVED_WORDS.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_map_to_dollar_aliases() {
        assert_eq!(alias_for("var").as_deref(), Some("$var"));
        assert_eq!(alias_for("this").as_deref(), Some("$this"));
        assert_eq!(alias_for("arguments").as_deref(), Some("$arguments"));
        assert_eq!(alias_for("value"), None);
    }

    #[test]
    fn names_shaped_like_generated_ones_are_aliased() {
        assert_eq!(alias_for("__lvar0").as_deref(), Some("$__lvar0"));
        assert_eq!(alias_for("__for_step").as_deref(), Some("$__for_step"));
        assert_eq!(alias_for("__lua").as_deref(), Some("$__lua"));
        assert_eq!(alias_for("__luax"), None);
        assert_eq!(alias_for("_G"), None);
    }

    #[test]
    fn lua_keywords_are_not_in_the_table() {
        for word in ["local", "function", "end", "nil", "then", "elseif", "repeat"] {
            assert!(alias_for(word).is_none(), "{word} should not be aliased");
        }
    }
}
