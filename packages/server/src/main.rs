#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Auto watch API server binary.

use clap::Parser;

/// Auto watch API server.
#[derive(Parser)]
#[command(name = "auto_watch_server", about = "Auto watch theft map API server")]
struct Cli {
    /// Prompt for the bind address and port before starting.
    #[arg(long)]
    interactive: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    if cli.interactive {
        auto_watch_server::interactive::run().await
    } else {
        auto_watch_server::run_server().await
    }
}
