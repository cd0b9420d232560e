//! # Heartcalc Terminal Library
//!
//! Drives the calculator from standard input.
//!
//! ## Module Organization
//! ```text
//! heartcalc_terminal_lib/
//! ├── lib.rs          ◄─── You are here (startup & input loop)
//! ├── layout.rs       ◄─── Keypad grid and burst origins
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── calc.rs     ◄─── Expression engine behind a mutex
//! │   └── config.rs   ◄─── AppConfig (screen, easter egg, fx)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── tap.rs      ◄─── Keypad taps
//! └── error.rs        ◄─── AppError
//! ```
//!
//! ## Input
//! ```text
//! > 2 + 3 × 4 =        space-separated key labels
//! 14
//! > hearts             JSON snapshot of live particles
//! > state              JSON snapshot of the engine
//! > quit               exit
//! ```

pub mod commands;
pub mod error;
pub mod layout;
pub mod state;

use std::sync::Arc;

use heartcalc_fx::{FxDriver, FxHandle, ParticleScheduler, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::TapContext;
use error::AppResult;
use state::{AppConfig, CalcState};

/// Runs the terminal calculator until `quit` or end of input.
///
/// ## Startup Sequence
/// 1. Initialize logging (stderr, `RUST_LOG` honored)
/// 2. Load `AppConfig` from file and environment
/// 3. Start the fx driver task
/// 4. Read lines from stdin
pub async fn run() -> AppResult<()> {
    init_tracing();

    info!("Starting heartcalc");

    let config = Arc::new(AppConfig::load_default()?);
    let fx = start_fx(&config);
    let ctx = TapContext::new(CalcState::from_config(&config), fx, config);

    println!("{}", ctx.calc.snapshot().display);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "hearts" => {
                let particles = ctx.fx.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&particles)?);
            }
            "state" => {
                println!("{}", serde_json::to_string(&ctx.calc.snapshot())?);
            }
            input => match commands::tap_line(&ctx, input).await {
                Ok(Some(response)) => {
                    println!("{}    [{}]", response.display, response.clear_label)
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, code = ?err.code(), "Tap rejected");
                    eprintln!("{err}");
                }
            },
        }
    }

    ctx.fx.shutdown().await?;
    info!("heartcalc stopped");
    Ok(())
}

fn start_fx(config: &AppConfig) -> FxHandle {
    let scheduler = ParticleScheduler::new(config.fx.clone());
    FxDriver::new(scheduler, SystemClock, config.fx.timing.tick()).start()
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=heartcalc_fx=trace` - Show every timer
/// - Default: INFO, DEBUG for heartcalc crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,heartcalc=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
