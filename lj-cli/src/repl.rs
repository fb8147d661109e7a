use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;
use translator::{
    ParseError, RUNTIME_JS, SourceError, SourceFile, TranslateOptions, render_source_error,
    translate_text_with_options,
};

use crate::logging;

const PROMPT: &str = "lj> ";
const CONTINUATION_PROMPT: &str = "..> ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReplAction {
    Continue,
    Break,
}

/// Reads Lua chunks and prints their translation. Input that stops in the
/// middle of a statement keeps reading on a continuation prompt.
pub fn run_repl(options: &TranslateOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("lj REPL (Lua -> JavaScript)");
    println!("history: up/down arrows, commands: .help, .runtime, .quit");
    let options = TranslateOptions {
        include_runtime: false,
        ..options.clone()
    };
    let mut editor = DefaultEditor::new()?;
    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        match editor.readline(prompt) {
            Ok(line) => {
                if pending.is_empty() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(action) = handle_repl_command(trimmed) {
                        if action == ReplAction::Break {
                            break;
                        }
                        continue;
                    }
                }
                pending.push_str(&line);
                pending.push('\n');
                match translate_text_with_options(&pending, &options) {
                    Ok(js) => {
                        let _ = editor.add_history_entry(pending.trim_end());
                        print!("{js}");
                        pending.clear();
                    }
                    Err(SourceError::Parse(err)) if is_incomplete(&pending, &err) => {
                        debug!(bytes = pending.len(), "waiting for more input");
                    }
                    Err(err) => {
                        let _ = editor.add_history_entry(pending.trim_end());
                        println!("{}", render_repl_error(&pending, &err));
                        pending.clear();
                    }
                }
            }
            Err(ReadlineError::Interrupted) if !pending.is_empty() => {
                pending.clear();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("bye");
                break;
            }
            Err(err) => {
                return Err(Box::new(io::Error::other(err.to_string())));
            }
        }
    }
    Ok(())
}

fn handle_repl_command(line: &str) -> Option<ReplAction> {
    match line {
        ".quit" | ".exit" => Some(ReplAction::Break),
        ".help" => {
            println!("commands:");
            println!("  .help      show commands");
            println!("  .runtime   print the runtime library");
            println!("  .quit      quit repl");
            println!("  .exit      quit repl");
            Some(ReplAction::Continue)
        }
        ".runtime" => {
            print!("{RUNTIME_JS}");
            Some(ReplAction::Continue)
        }
        _ if line.starts_with('.') => {
            println!("unknown command: {line}");
            Some(ReplAction::Continue)
        }
        _ => None,
    }
}

/// The parser ran off the end of the buffer, so another line may finish it.
fn is_incomplete(source: &str, err: &ParseError) -> bool {
    err.span
        .is_some_and(|span| span.lo >= source.trim_end().len())
}

fn render_repl_error(source: &str, err: &SourceError) -> String {
    match err {
        SourceError::Parse(parse_err) => {
            let file = SourceFile::new("<repl>", source);
            format!(
                "{} {}",
                logging::category_parse(),
                render_source_error(&file, parse_err)
            )
        }
        SourceError::Translate(_) => format!("{} {err}", logging::category_translate()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use translator::parse;

    #[test]
    fn unfinished_block_waits_for_more_input() {
        let source = "while x do\n";
        let err = parse(source).expect_err("block is unfinished");
        assert!(is_incomplete(source, &err));
    }

    #[test]
    fn error_inside_the_buffer_is_reported() {
        let source = "x = = 1\n";
        let err = parse(source).expect_err("double equals is invalid");
        assert!(!is_incomplete(source, &err));
    }

    #[test]
    fn dot_commands_are_recognised() {
        assert_eq!(handle_repl_command(".quit"), Some(ReplAction::Break));
        assert_eq!(handle_repl_command(".exit"), Some(ReplAction::Break));
        assert_eq!(handle_repl_command(".nope"), Some(ReplAction::Continue));
        assert_eq!(handle_repl_command("x = 1"), None);
    }
}
