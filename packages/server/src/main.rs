#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the crash map API server.
//!
//! Reads the configuration file named by `CRASH_MAP_CONFIG` (or the
//! built-in defaults), applies the `BIND_ADDR`/`PORT` overrides and
//! starts serving.

use crash_map_source::CrashMapConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = CrashMapConfig::load(None).map_err(std::io::Error::other)?;

    crash_map_server::run_server(config).await
}
