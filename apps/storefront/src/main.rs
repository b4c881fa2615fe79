//! # FiftyOne Storefront Session Driver
//!
//! Headless entry point: one JSON action per line on stdin, rendered views
//! on stdout, logs on stderr.
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Loop                                     │
//! │                                                                         │
//! │   stdin lines ─────────┐                                               │
//! │                        ├──► tokio::select! ──► dispatch ──► stdout     │
//! │   finished orders ─────┘          ▲                                     │
//! │   (mpsc channel)                  │                                     │
//! │        ▲                          │                                     │
//! │        │        submit_order      │                                     │
//! │        └──── tokio::spawn ◄───────┘                                     │
//! │              (delay runs here; input stays responsive)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Load configuration (defaults, storefront.toml, environment)
//! 2. Initialize tracing (logging)
//! 3. Open storage and restore the cart
//! 4. Run the session loop until `quit` or end of input

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

use fiftyone_core::Order;
use fiftyone_storefront::error::ApiResult;
use fiftyone_storefront::session::{self, Outcome};
use fiftyone_storefront::state::AppConfig;
use fiftyone_storefront::{init_tracing, view, Storefront};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing();
    info!(store = %config.store_name, "Starting FiftyOne storefront");

    let app = match Storefront::open(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Session ended with an I/O error");
            ExitCode::FAILURE
        }
    }
}

async fn run(app: Storefront) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (done_tx, mut done_rx) = mpsc::channel::<ApiResult<Order>>(8);
    let mut pending = 0usize;
    let mut input_open = true;

    write(&mut stdout, &format!("Welcome to {}\n", app.config.store_name)).await?;
    write(&mut stdout, &session::flush(&app)).await?;

    while input_open || pending > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let action = match session::parse_action(&line) {
                    Ok(action) => action,
                    Err(e) => {
                        write(&mut stdout, &view::render_error(&e)).await?;
                        continue;
                    }
                };

                match session::dispatch(&app, action) {
                    Outcome::Render(out) => write(&mut stdout, &out).await?,
                    Outcome::Pending(customer) => {
                        pending += 1;
                        write(&mut stdout, &session::flush(&app)).await?;
                        let simulator = app.simulator.clone();
                        let tx = done_tx.clone();
                        tokio::spawn(async move {
                            let result = session::submit(simulator, customer).await;
                            let _ = tx.send(result).await;
                        });
                    }
                    Outcome::Quit => input_open = false,
                }
            }
            Some(result) = done_rx.recv() => {
                pending = pending.saturating_sub(1);
                write(&mut stdout, &session::render_submission(&app, result)).await?;
            }
        }
    }

    info!("Session closed");
    Ok(())
}

async fn write(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}
