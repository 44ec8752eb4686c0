use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing::info;

use jiggl::clock::SystemClock;
use jiggl::config::{ConfigStore, FileConfigStore};
use jiggl::control::StopToken;
use jiggl::effector::TraceEffector;
use jiggl::session::SessionController;

/// human-paced activity simulator
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Simulates a plausible pattern of computer-use activity for a requested number of hours: 10-minute windows with scattered idle minutes, fatigue- and focus-aware pacing, weighted activity selection with anti-repetition, and a session summary at the end."
)]
pub struct Cli {
    /// how many hours to run the session (0 < hours <= 24)
    hours: f64,

    /// seed the behavioral rng for a reproducible session
    #[clap(long)]
    seed: Option<u64>,

    /// alternate config file (default: the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

/// Out-of-band stop source: typing `q` or `quit` on stdin clears the
/// running flag; the simulation honors it at its next checkpoint.
fn spawn_stdin_listener(stop: StopToken) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    let line = line.trim();
                    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                        stop.request_stop();
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

fn main() {
    let cli = Cli::parse();

    if !cli.hours.is_finite() || cli.hours <= 0.0 {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::ValueValidation,
            "duration must be a positive number of hours",
        )
        .exit();
    }
    if cli.hours > 24.0 {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, "sessions are capped at 24 hours")
            .exit();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jiggl=info".into()),
        )
        .init();

    let store = cli
        .config
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = store.load();
    info!(
        pattern = %config.active_pattern,
        kill_switch = %config.kill_switch_file,
        "stop with 'q' + Enter, or by creating the kill switch file"
    );

    let stop = StopToken::new();
    spawn_stdin_listener(stop.clone());

    let effector = TraceEffector::new(config.screen_width, config.screen_height);
    let mut controller =
        SessionController::new(config, effector, SystemClock::new(), stop, cli.seed);

    let summary = controller.run(Duration::from_secs_f64(cli.hours * 3600.0));
    if let Err(e) = summary.append_log() {
        tracing::warn!(error = %e, "could not append session log");
    }
    println!("{summary}");
}
