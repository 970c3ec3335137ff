//! steamgrid entry point.

mod app;
mod config;
mod library;
mod report;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Keep the console transcript readable unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting steamgrid");

    let config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => return fail(&e, true),
    };
    let pause = config.pause_on_exit;

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(app::run(config)));

    match result {
        Ok(()) => {
            if pause {
                wait_for_enter("Press enter to close.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e, pause),
    }
}

fn fail(error: &anyhow::Error, pause: bool) -> ExitCode {
    tracing::debug!(error = ?error, "run aborted");
    println!("{error:#}");
    if pause {
        wait_for_enter("");
    }
    ExitCode::FAILURE
}

fn wait_for_enter(prompt: &str) {
    if !prompt.is_empty() {
        print!("{prompt}");
        let _ = io::stdout().flush();
    }
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
