use crate::config::database::DatabaseTrait;
use crate::config::{database, parameter};
use crate::handler::health_handler;
use crate::repository::session_repository::{start_session_sweeper, SessionRepository};
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod dto;
mod entity;
mod error;
mod handler;
mod middleware;
mod repository;
mod response;
mod routes;
mod service;
mod state;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt::init();

    info!("Starting blogr authentication service...");

    parameter::init();
    info!("Configuration initialized");

    crate::config::logging::init();
    info!("Logging configuration initialized");

    health_handler::init_start_time();

    let connection = match database::Database::init().await {
        Ok(conn) => {
            info!("Database connection established successfully");
            conn
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };
    let db_conn = Arc::new(connection);

    let server_address = parameter::get("SERVER_ADDRESS");
    let server_port = parameter::get("SERVER_PORT");
    let host = format!("{}:{}", server_address, server_port);
    info!("Server will bind to: {}", host);

    // Expired session rows are swept in the background; refresh already
    // rejects them, the sweep only reclaims storage
    let sweep_interval_minutes = parameter::get_u64("SESSION_SWEEP_INTERVAL_MINUTES");
    info!("Session sweep interval: {} minutes", sweep_interval_minutes);

    let sweeper_shutdown_token = tokio_util::sync::CancellationToken::new();
    let sweeper_handle = start_session_sweeper(
        SessionRepository::new(&db_conn),
        sweep_interval_minutes,
        sweeper_shutdown_token.clone(),
    );
    info!("Session sweeper started");

    let listener = match tokio::net::TcpListener::bind(&host).await {
        Ok(listener) => {
            info!("Server successfully bound to {}", host);
            listener
        }
        Err(e) => {
            error!("Failed to bind to {}: {}", host, e);
            return Err(e.into());
        }
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, initiating graceful shutdown...");
                sweeper_shutdown_token.cancel();
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    // Route setup validates token secrets and the SMTP relay address up
    // front so a misconfigured deployment never accepts traffic
    let app = match routes::root::routes(db_conn) {
        Ok(router) => router,
        Err(e) => {
            error!("Failed to initialize routes: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    info!("Server starting...");
    match axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            if let Err(e) = sweeper_handle.await {
                error!("Error waiting for session sweeper to finish: {}", e);
            }
        })
        .await
    {
        Ok(_) => {
            info!("Server shutdown gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
