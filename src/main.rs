//! radix-router
//!
//! An HTTP service whose routes come from a TOML file and are resolved by a
//! radix tree router.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                  RADIX ROUTER                 │
//!                        │                                               │
//!     Client Request     │  ┌──────────┐    ┌──────────┐    ┌─────────┐  │
//!     ───────────────────┼─▶│   http   │───▶│  route   │───▶│ routing │  │
//!                        │  │  server  │    │  table   │    │  tree   │  │
//!                        │  └──────────┘    └────┬─────┘    └─────────┘  │
//!                        │                       │ endpoint / 404 / 405  │
//!     Client Response    │                       ▼                       │
//!     ◀──────────────────┼─────────────────── response                   │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐  │
//!                        │  │           Cross-Cutting Concerns        │  │
//!                        │  │  config + watcher   observability       │  │
//!                        │  │  admin API          lifecycle           │  │
//!                        │  └─────────────────────────────────────────┘  │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "radix-router", version)]
#[command(about = "HTTP service routing requests through a radix tree", long_about = None)]
struct Args {
    /// Configuration file (TOML).
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    /// Do not reload routes when the configuration file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match radix_router::lifecycle::run(&args.config, !args.no_watch).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be initialized yet.
            eprintln!("radix-router: {e}");
            ExitCode::FAILURE
        }
    }
}
