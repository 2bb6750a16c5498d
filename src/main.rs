//! PSP Sync server
//!
//! Mirrors customers and invoices from the payment provider into PostgreSQL
//! and serves the invoice reports.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use psp_sync::adapters::http::{app_router, ReportsAppState, WebhookAppState};
use psp_sync::adapters::{
    ensure_schema, FrisbiiClient, PostgresCustomerRepository, PostgresInvoiceRepository,
};
use psp_sync::application::{
    BackfillOrchestrator, SyncDispatcher, SyncResourceHandler, SyncWorkerPool,
};
use psp_sync::config::{AppConfig, SyncMode};
use psp_sync::ports::{BillingProvider, CustomerRepository, InvoiceRepository};

/// PSP billing sync service
#[derive(Parser, Debug)]
#[command(name = "psp-sync")]
#[command(version)]
#[command(about = "Synchronizes provider customers and invoices into PostgreSQL")]
struct Args {
    /// Run a full backfill at startup, regardless of configuration
    #[arg(long)]
    backfill: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;
    if config.database.ensure_schema {
        ensure_schema(&pool).await?;
    }

    let client_config = config
        .provider
        .client_config()
        .with_list_from(config.backfill.from_date()?);
    let provider: Arc<dyn BillingProvider> = Arc::new(FrisbiiClient::new(client_config)?);
    let customers: Arc<dyn CustomerRepository> =
        Arc::new(PostgresCustomerRepository::new(pool.clone()));
    let invoices: Arc<dyn InvoiceRepository> =
        Arc::new(PostgresInvoiceRepository::new(pool.clone()));

    let handler = Arc::new(SyncResourceHandler::new(
        provider.clone(),
        customers.clone(),
        invoices.clone(),
    ));
    let (dispatcher, workers) = match config.sync.mode {
        SyncMode::Inline => (SyncDispatcher::Inline(handler), None),
        SyncMode::Queued => {
            let (queue, workers) = SyncWorkerPool::start(handler, config.sync.worker_config());
            (SyncDispatcher::Queued(queue), Some(workers))
        }
    };

    if args.backfill || config.backfill.enabled {
        let orchestrator = BackfillOrchestrator::with_config(
            provider.clone(),
            customers.clone(),
            invoices.clone(),
            config.backfill.run_config(),
        );
        tokio::spawn(async move {
            orchestrator.run().await;
        });
    }

    let app = app_router(
        WebhookAppState::new(dispatcher, config.provider.webhook_secrets()),
        ReportsAppState::new(invoices),
        config.reporting.credentials(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, mode = ?config.sync.mode, "PSP sync listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last queue sender; workers drain and exit.
    if let Some(workers) = workers {
        workers.join().await;
    }
    tracing::info!("PSP sync stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
