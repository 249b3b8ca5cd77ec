//! MCP Server entry point for saas.tf
//!
//! Starts the MCP server with stdio transport. The session credential is kept
//! in the OS keychain, or in an encrypted file when no keychain is usable.

mod adapters;
mod config;
mod format;
mod resources;
mod schemas;
mod server;
mod tools;
mod validators;

use std::process::ExitCode;
use std::sync::Arc;

use adapters::KeyringBackend;
use anyhow::Context;
use config::ServerConfig;
use rmcp::ServiceExt;
use saastf_api::SaasTfClient;
use saastf_core::{EncryptedFileBackend, SecretBackend, SecureCredentialStore, TokenManager};
use server::SaasTfMcp;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Wire keyring, encrypted file, token cache and API client together.
async fn build_server(config: ServerConfig) -> anyhow::Result<SaasTfMcp> {
    let store_config = &config.store;

    let os_backend: Option<Arc<dyn SecretBackend>> = if config.disable_keyring {
        tracing::info!("OS keyring disabled, using the encrypted file only");
        None
    } else {
        Some(Arc::new(KeyringBackend::new(
            store_config.service_name.as_str(),
            store_config.account_name.as_str(),
        )))
    };
    let fallback = Arc::new(EncryptedFileBackend::new(
        store_config.fallback_path.clone(),
        &store_config.service_name,
    ));

    let store =
        SecureCredentialStore::new(os_backend, fallback, store_config.op_timeout).await;
    tracing::info!(
        "Credential store initialized ({} backend)",
        store.active_backend()
    );

    let tokens = Arc::new(TokenManager::new(Arc::new(store), store_config));
    let client = SaasTfClient::new(config.client, tokens).context("Failed to create API client")?;
    tracing::info!("API client targeting {}", client.base_url());

    Ok(SaasTfMcp::new(Arc::new(client)))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (MCP uses stdout for protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting saas.tf MCP Server");

    let mcp_server = match build_server(ServerConfig::from_env()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to initialize: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Starting MCP server on stdio transport");
    let service = match mcp_server.serve(rmcp::transport::stdio()).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start MCP server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = service.waiting().await {
        tracing::error!("MCP server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
