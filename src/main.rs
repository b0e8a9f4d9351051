mod aggregator;
mod prompt;
mod runner;
mod settings;
mod summary;

use crate::settings::Settings;
use env_logger::Env;
use log::debug;
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    // A missing .env is normal; the variables may come from the real environment.
    let _ = dotenv::dotenv();
    setup_logger();

    let settings = Settings::load();
    debug!("{settings:?}");

    runner::run(&settings, &mut io::stdout()).await?;
    Ok(())
}

fn setup_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("morning-digest {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "morning-digest - yesterday's and today's MLB, NFL and NBA games, summarized by Gemini

Usage:
  morning-digest
  morning-digest --help
  morning-digest --version

Environment (also read from ./.env):
  GEMINI_API_KEY            Gemini API key (required for a summary)
  GEMINI_MODEL              Model id (default gemini-2.5-flash-preview-04-17)
  GEMINI_API_URL            Gemini endpoint root
  GEMINI_TIMEOUT_SECS       Generation timeout in seconds (default 120)
  SCOREBOARD_API_URL        ESPN site/v2/sports root
  SCOREBOARD_TIMEOUT_SECS   Per-scoreboard timeout in seconds (default 10)
  RUST_LOG                  Log filter for stderr (default warn)"
}
