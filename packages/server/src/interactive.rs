//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use crash_map_source::CrashMapConfig;
use dialoguer::{Confirm, Input};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address and port, defaulting to the values already in
/// `config`, and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: CrashMapConfig) -> std::io::Result<()> {
    println!("Crash Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(config.server.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.server.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(config.server.port)
        .interact_text()
        .unwrap_or(config.server.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    config.server.bind_addr = bind_addr;
    config.server.port = port;

    super::run_server(config).await
}
