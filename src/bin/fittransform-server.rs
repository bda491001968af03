// ABOUTME: FitTransform API server binary
// ABOUTME: Loads configuration, opens the database, and serves the HTTP API until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # `FitTransform` API Server Binary
//!
//! Configuration comes from the environment; `--http-port` and
//! `--database-url` override the corresponding variables.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fittransform_server::auth::AuthManager;
use fittransform_server::config::{DatabaseUrl, ServerConfig};
use fittransform_server::database::Database;
use fittransform_server::logging;
use fittransform_server::resources::ServerResources;
use fittransform_server::server::run_server;
use tracing::{error, info};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "fittransform-server")]
#[command(about = "FitTransform API - onboarding, progress, and workout tracking backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override `DATABASE_URL`
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(database_url)?;
    }

    info!("Starting FitTransform API");
    info!("{}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database_url {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }
    }

    let database = Database::new(&config.database_url).await?;
    let auth_manager = AuthManager::from_config(&config.auth);
    info!("Authentication manager initialized");

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    if let Err(e) = run_server(resources).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
