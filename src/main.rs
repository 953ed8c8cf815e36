mod core;
mod features;
mod modules;
mod shared;

use crate::core::app::build_router;
use crate::core::config::{AuthMode, Config};
use crate::features::auth::ClientCredentialsTokenManager;
use crate::modules::admin_api::{AdminApiConnector, CredentialSource, HttpAdminApiConnector};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");
    tracing::info!(
        "Users page size: {}, remove-override rule: {}",
        config.dashboard.users_page_size,
        config.dashboard.remove_override_rule.as_str()
    );

    // Shared HTTP client for the Admin API and the token endpoint
    let http_client = reqwest::Client::builder()
        .timeout(config.admin_api.timeout)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

    let credentials = match config.auth.mode {
        AuthMode::Session => {
            tracing::info!(
                "Forwarding operator sessions from cookie '{}'",
                config.auth.session_cookie
            );
            CredentialSource::Session
        }
        AuthMode::ClientCredentials => {
            let client_credentials = config
                .auth
                .client_credentials
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Client credentials are not configured"))?;
            tracing::info!(
                "Using client-credentials tokens from {} for data calls",
                client_credentials.token_url
            );
            CredentialSource::Shared(Arc::new(ClientCredentialsTokenManager::new(
                client_credentials,
                http_client.clone(),
            )))
        }
    };

    let connector: Arc<dyn AdminApiConnector> = Arc::new(HttpAdminApiConnector::new(
        http_client,
        config.admin_api.base_url.clone(),
        credentials,
    ));
    tracing::info!("Admin API client initialized: {}", config.admin_api.base_url);

    let app = build_router(connector, &config.auth, &config.dashboard);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
