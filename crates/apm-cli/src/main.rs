//! apm-config - build and check APM agent configurations.
//!
//! Commands:
//! - `defaults`: print a fully defaulted configuration
//! - `check`: load, apply env overrides, validate, and report
//! - `paths`: show where configuration would be loaded from

use apm_cli::exit_codes::ExitCode;
use apm_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use apm_cli::report::{self, render, CheckOptions, OutputFormat};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Build and check APM agent configurations
#[derive(Parser)]
#[command(name = "apm-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Payload format on stdout
    #[arg(long, short = 'f', global = true, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a configuration with every default applied
    Defaults(DefaultsArgs),

    /// Validate a configuration file
    Check(CheckArgs),

    /// Show configuration file resolution
    Paths(PathsArgs),
}

#[derive(Args, Debug)]
struct DefaultsArgs {
    /// Application name (use ';' to separate rollup names)
    #[arg(long, default_value = "")]
    app_name: String,

    /// License key
    #[arg(long, default_value = "", env = "APM_LICENSE_KEY", hide_env_values = true)]
    license: String,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Config file (JSON, or TOML by extension); resolved when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Ignore APM_* environment overrides
    #[arg(long)]
    no_env: bool,

    /// Report every violation instead of stopping at the first
    #[arg(long)]
    all: bool,
}

#[derive(Args, Debug)]
struct PathsArgs {
    /// Candidate config file to try first
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct ErrorPayload {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u32,
    exit_code: &'static str,
    message: String,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                // --help / --version
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match cli.command {
        Commands::Defaults(args) => run_defaults(&cli.global, &args),
        Commands::Check(args) => run_check(&cli.global, &args),
        Commands::Paths(args) => run_paths(&cli.global, &args),
    };

    std::process::exit(exit_code.as_i32());
}

fn run_defaults(global: &GlobalOpts, args: &DefaultsArgs) -> ExitCode {
    let config = report::defaults(&args.app_name, &args.license);
    emit(&config, global.format)
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> ExitCode {
    let opts = CheckOptions {
        config: args.config.clone(),
        use_env: !args.no_env,
        all: args.all,
    };

    match report::check(&opts) {
        Ok(check) => {
            let code = check.exit_code();
            match emit(&check, global.format) {
                ExitCode::Clean => code,
                failed => failed,
            }
        }
        Err(err) => {
            let code = ExitCode::from(&err);
            tracing::error!(error = %err, "config check failed");
            let payload = ErrorPayload {
                error: ErrorBody {
                    code: err.code(),
                    exit_code: code.code_name(),
                    message: err.to_string(),
                },
            };
            emit(&payload, global.format);
            code
        }
    }
}

fn run_paths(global: &GlobalOpts, args: &PathsArgs) -> ExitCode {
    let paths = report::paths(args.config.as_deref());
    emit(&paths, global.format)
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> ExitCode {
    match render(value, format) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to render output");
            ExitCode::InternalError
        }
    }
}
