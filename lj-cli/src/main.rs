use std::io;
use std::path::Path;
use std::process::ExitCode;

use cli::logging::{self, category_error, category_output, category_parse, category_translate};
use cli::{parse_cli_args, print_usage, run_repl};
use tracing::{error, info};
use translator::{SourceError, SourceFile, SourcePathError, render_source_error};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli_args(&args).map_err(io::Error::other)?;
    if cli.help {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }
    logging::init()?;

    let options = cli.translate_options(|key| std::env::var(key).ok());
    if cli.repl {
        run_repl(&options)?;
        return Ok(ExitCode::SUCCESS);
    }

    let source_path = cli
        .source
        .as_deref()
        .ok_or_else(|| io::Error::other("missing source path"))?;

    if cli.emit_ast {
        let source = std::fs::read_to_string(source_path)?;
        let nodes = match translator::parse(&source) {
            Ok(nodes) => nodes,
            Err(err) => {
                let file = SourceFile::new(source_path, source);
                error!("{} {}", category_parse(), render_source_error(&file, &err));
                return Ok(ExitCode::FAILURE);
            }
        };
        let json = serde_json::to_string_pretty(&nodes)?;
        write_output(cli.output_path.as_deref(), &json)?;
        return Ok(ExitCode::SUCCESS);
    }

    info!("{} {}", category_translate(), source_path);
    let js = match translator::translate_source_file_with_options(source_path, &options) {
        Ok(js) => js,
        Err(SourcePathError::Source(SourceError::Parse(err))) => {
            let source = std::fs::read_to_string(source_path)?;
            let file = SourceFile::new(source_path, source);
            error!("{} {}", category_parse(), render_source_error(&file, &err));
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            error!("{} {err}", category_error());
            return Ok(ExitCode::FAILURE);
        }
    };
    write_output(cli.output_path.as_deref(), &js)?;
    Ok(ExitCode::SUCCESS)
}

fn write_output(path: Option<&str>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    info!("{} wrote {} bytes to {}", category_output(), text.len(), path);
    Ok(())
}
