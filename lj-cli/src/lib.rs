pub mod config;
pub mod logging;
pub mod repl;

pub use config::{CliConfig, parse_cli_args, print_usage};
pub use logging::init as init_logging;
pub use repl::run_repl;
