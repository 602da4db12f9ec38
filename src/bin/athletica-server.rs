// ABOUTME: Production server binary for the Athletica training-plan API
// ABOUTME: Loads configuration, runs migrations, and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Athletica Server Binary
//!
//! Starts the HTTP API with JWT authentication, the SQLite store, and the
//! OpenRouter plan-generation provider.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use athletica::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    llm::OpenRouterProvider,
    logging,
    routes::{self, ServerResources},
};

#[derive(Parser)]
#[command(name = "athletica-server")]
#[command(about = "Athletica - AI-generated running training plans")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Athletica API server");

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized: {}", config.database_url);

    let auth_manager = AuthManager::new(config.jwt_secret.as_bytes(), config.jwt_expiry_hours);

    let plan_generator = Arc::new(OpenRouterProvider::from_env()?);

    let resources = Arc::new(ServerResources {
        database,
        auth_manager,
        plan_generator,
        config: config.clone(),
    });

    let app = routes::router(resources);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
