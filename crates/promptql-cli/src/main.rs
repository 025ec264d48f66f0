// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::CredentialStore;
use promptql_app::Model;
use runtime::ServiceRuntime;
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_logging(env::var_os("PROMPTQL_LOG"))?;

    let store = CredentialStore::default_location();
    info!(path = ?store.path(), "credential store");
    let mut credentials = store.load()?;
    config::apply_env_overrides(&mut credentials, config::env_lookup);
    let endpoints = config::endpoint_options(config::env_lookup);
    info!(
        has_pat = credentials.has_pat(),
        has_api_key = !credentials.api_key.is_empty(),
        "credentials loaded"
    );

    let mut model = Model::new(credentials, endpoints).context(
        "invalid service endpoint; check PROMPTQL_BASE_URL, PROMPTQL_API_URL, PROMPTQL_AUTH_URL and PROMPTQL_CONTROL_PLANE_URL",
    )?;
    let mut runtime = ServiceRuntime::new(store);
    promptql_tui::run_app(&mut model, &mut runtime)
}

/// The terminal owns stdout, so logs only go to the file named by
/// `PROMPTQL_LOG`. Without it no subscriber is installed.
fn init_logging(target: Option<OsString>) -> Result<()> {
    let Some(path) = target.filter(|path| !path.is_empty()) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.to_string_lossy()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
