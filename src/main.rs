mod commands;
mod core;
mod mapping;
mod query;
mod ui;
mod utils;

use clap::Parser;
use crate::core::config::MappingPolicy;
use crate::core::env::Env;
use crate::core::error::{ResultExt, UpdaterError, UpdaterResult, print_error};
use crate::query::Bazel;
use std::path::PathBuf;

/// Add or update tests to TEST_MAPPING.
///
/// Uses Bazel to find the reverse dependencies of a crate and writes the
/// tests among them to the crate's TEST_MAPPING file. Run from a shell where
/// `build/envsetup.sh` has been sourced and a target selected.
#[derive(Parser)]
#[command(name = "update-crate-tests")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Crate directories to update (default: current directory)
  paths: Vec<PathBuf>,

  /// TOML file overriding the test option and exclusion tables
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Print the TEST_MAPPING that would be written instead of writing it
  #[arg(long)]
  dry_run: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> UpdaterResult<()> {
  let paths = if cli.paths.is_empty() {
    vec![std::env::current_dir().context("Failed to get current directory")?]
  } else {
    cli.paths
  };

  let env = Env::load()?;
  let policy = MappingPolicy::resolve(cli.config.as_deref())?;
  let bazel = Bazel::init(&env, &policy)?;

  commands::run_update(&env, &bazel, &policy, &paths, cli.dry_run)
}

fn handle_error(err: UpdaterError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
