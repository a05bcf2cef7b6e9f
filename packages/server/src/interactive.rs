//! Interactive mode for the server.
//!
//! Prompts for the bind address, port and report store before starting
//! the server.

use dialoguer::{Confirm, Input, Select};

const STORES: &[&str] = &["sqlite", "firestore"];

/// Runs the server in interactive mode, prompting for configuration.
///
/// Sets `BIND_ADDR`, `PORT` and `REPORT_STORE` (plus
/// `FIRESTORE_PROJECT_ID` when needed) from the answers and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Auto Watch Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let store_idx = Select::new()
        .with_prompt("Report store")
        .items(STORES)
        .default(0)
        .interact()
        .unwrap_or(0);
    let store = STORES.get(store_idx).copied().unwrap_or("sqlite");

    let project_id = if store == "firestore" {
        Some(
            Input::<String>::new()
                .with_prompt("Firestore project id")
                .interact_text()
                .unwrap_or_default(),
        )
    } else {
        None
    };

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        std::env::set_var("REPORT_STORE", store);
        if let Some(project_id) = &project_id {
            std::env::set_var("FIRESTORE_PROJECT_ID", project_id);
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str} ({store})?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
