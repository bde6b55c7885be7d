mod commands;
mod core;
mod index;
mod manifest;
mod release;
mod version;

use crate::core::error::{ForgeError, print_error};
use clap::{Parser, Subcommand};

/// Release addons from embedded upstream checkouts
#[derive(Parser)]
#[command(name = "addon-forge")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Release an addon: pull upstream, bump the version, rewrite the
  /// manifest, package, reindex
  Update {
    /// Addon directory name, `all` for every addon, or `xml` to rebuild
    /// the index only
    target: String,
    /// Release version, or `auto` to bump the minor component (default)
    version: Option<String>,
    /// Upstream commit to pin, or `head` for the tracked branch (default)
    commit: Option<String>,
  },

  /// Discard local changes to an addon and restore its pinned source
  Revert {
    /// Addon directory name
    addon: String,
  },

  /// Commit staged changes and force-push the repository to its remote
  Push,

  /// Initialise every embedded source checkout
  Init,
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
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let ctx = match crate::core::context::RepoContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Update { target, version, commit } => commands::run_update(&ctx, target, version, commit),
    Commands::Revert { addon } => commands::run_revert(&ctx, addon),
    Commands::Push => commands::run_push(&ctx),
    Commands::Init => commands::run_init(&ctx),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ForgeError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
