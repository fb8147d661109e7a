use translator::TranslateOptions;

pub const GLOBAL_OBJECT_ENV: &str = "LJ_GLOBAL_OBJECT";
pub const RUNTIME_NAMESPACE_ENV: &str = "LJ_RUNTIME_NAMESPACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub source: Option<String>,
    pub output_path: Option<String>,
    pub emit_ast: bool,
    pub include_runtime: bool,
    pub repl: bool,
    pub help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            source: None,
            output_path: None,
            emit_ast: false,
            include_runtime: true,
            repl: false,
            help: false,
        }
    }
}

impl CliConfig {
    /// Options for the translator, with `LJ_GLOBAL_OBJECT` and
    /// `LJ_RUNTIME_NAMESPACE` overriding the defaults when set and non-blank.
    pub fn translate_options(&self, lookup: impl Fn(&str) -> Option<String>) -> TranslateOptions {
        let mut options = TranslateOptions {
            include_runtime: self.include_runtime,
            ..TranslateOptions::default()
        };
        if let Some(value) = non_blank(lookup(GLOBAL_OBJECT_ENV)) {
            options.global_object = value;
        }
        if let Some(value) = non_blank(lookup(RUNTIME_NAMESPACE_ENV)) {
            options.runtime_namespace = value;
        }
        options
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_cli_args(args: &[String]) -> Result<CliConfig, String> {
    let mut cfg = CliConfig::default();
    if args.is_empty() {
        cfg.repl = true;
        return Ok(cfg);
    }
    let mut index = 0usize;

    if let Some(first) = args.first()
        && first == "repl"
    {
        cfg.repl = true;
        index = 1;
    }

    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => {
                cfg.help = true;
                index += 1;
            }
            "--repl" => {
                cfg.repl = true;
                index += 1;
            }
            "--emit-ast" => {
                cfg.emit_ast = true;
                index += 1;
            }
            "--no-runtime" => {
                cfg.include_runtime = false;
                index += 1;
            }
            "-o" | "--output" => {
                let path = args
                    .get(index + 1)
                    .ok_or_else(|| format!("missing value for {}", args[index]))?;
                cfg.output_path = Some(path.clone());
                index += 2;
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown flag '{value}'"));
            }
            value => {
                if cfg.source.is_some() {
                    return Err("multiple source paths provided".to_string());
                }
                cfg.source = Some(value.to_string());
                index += 1;
            }
        }
    }

    if cfg.help {
        return Ok(cfg);
    }
    if cfg.repl {
        if cfg.source.is_some() || cfg.output_path.is_some() || cfg.emit_ast {
            return Err("repl mode does not accept a source path, --output or --emit-ast".to_string());
        }
    } else if cfg.source.is_none() {
        return Err("missing source path".to_string());
    }

    Ok(cfg)
}

pub fn print_usage() {
    println!("Usage:");
    println!("  lj                                  (defaults to REPL)");
    println!("  lj <source.lua>");
    println!("  lj <source.lua> -o <output.js>");
    println!("  lj <source.lua> --no-runtime");
    println!("  lj <source.lua> --emit-ast");
    println!("  lj --repl");
    println!("  lj repl");
    println!();
    println!("Environment:");
    println!("  {GLOBAL_OBJECT_ENV}      expression bound to _G (default globalThis)");
    println!("  {RUNTIME_NAMESPACE_ENV}  global holding the runtime library (default Lua)");
    println!("  RUST_LOG                 log filter (default info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> String {
        value.to_string()
    }

    #[test]
    fn parse_cli_defaults() {
        let cfg = parse_cli_args(&[]).expect("parse should succeed");
        assert!(cfg.repl);
        assert!(cfg.source.is_none());
        assert!(cfg.output_path.is_none());
        assert!(!cfg.emit_ast);
        assert!(cfg.include_runtime);
    }

    #[test]
    fn parse_cli_source_with_output() {
        let cfg = parse_cli_args(&[s("main.lua"), s("-o"), s("out/main.js")])
            .expect("parse should succeed");
        assert!(!cfg.repl);
        assert_eq!(cfg.source.as_deref(), Some("main.lua"));
        assert_eq!(cfg.output_path.as_deref(), Some("out/main.js"));
    }

    #[test]
    fn parse_cli_output_requires_path() {
        let err = parse_cli_args(&[s("main.lua"), s("--output")]).expect_err("parse should fail");
        assert!(err.contains("missing value for --output"));
    }

    #[test]
    fn parse_cli_rejects_multiple_sources() {
        let err = parse_cli_args(&[s("a.lua"), s("b.lua")]).expect_err("parse should fail");
        assert!(err.contains("multiple source paths"));
    }

    #[test]
    fn parse_cli_rejects_unknown_flag() {
        let err = parse_cli_args(&[s("--jit"), s("a.lua")]).expect_err("parse should fail");
        assert!(err.contains("unknown flag '--jit'"));
    }

    #[test]
    fn parse_cli_emit_ast_and_no_runtime() {
        let cfg = parse_cli_args(&[s("--emit-ast"), s("--no-runtime"), s("a.lua")])
            .expect("parse should succeed");
        assert!(cfg.emit_ast);
        assert!(!cfg.include_runtime);
    }

    #[test]
    fn parse_cli_repl_legacy_command() {
        let cfg = parse_cli_args(&[s("repl")]).expect("parse should succeed");
        assert!(cfg.repl);
        let cfg = parse_cli_args(&[s("--repl")]).expect("parse should succeed");
        assert!(cfg.repl);
    }

    #[test]
    fn parse_cli_repl_rejects_source() {
        let err = parse_cli_args(&[s("repl"), s("a.lua")]).expect_err("parse should fail");
        assert!(err.contains("repl mode"));
    }

    #[test]
    fn parse_cli_help_skips_validation() {
        let cfg = parse_cli_args(&[s("--help")]).expect("parse should succeed");
        assert!(cfg.help);
    }

    #[test]
    fn env_overrides_translate_options() {
        let cfg = parse_cli_args(&[s("--no-runtime"), s("a.lua")]).expect("parse should succeed");
        let options = cfg.translate_options(|key| match key {
            GLOBAL_OBJECT_ENV => Some(s(" window ")),
            RUNTIME_NAMESPACE_ENV => Some(s("")),
            _ => None,
        });
        assert_eq!(options.global_object, "window");
        assert_eq!(options.runtime_namespace, "Lua");
        assert!(!options.include_runtime);
    }
}
