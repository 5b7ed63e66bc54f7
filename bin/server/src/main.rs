use axum::Router;
use login_gate_access::{AccessPolicy, EmailAllowlist, Provider};
use login_gate_server::{
    auth::{GatewayState, IdpClient},
    config::ServerConfig,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from the optional file and environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    let provider = Provider::new(config.provider).expect("invalid provider configuration");
    let cookie_key = config
        .session
        .cookie_key()
        .expect("invalid session configuration");
    tracing::info!(
        callback_path = provider.callback_path(),
        login_path = provider.login_path(),
        logout_path = provider.logout_path(),
        "Loaded configuration"
    );

    // A missing allowlist locks everyone out of protected paths
    let allowlist = EmailAllowlist::load_or_empty(&config.allowlist_path);
    let policy = AccessPolicy::from_config(&config.policy, allowlist);

    let idp = IdpClient::new(&provider).expect("failed to create identity provider client");
    let state = Arc::new(GatewayState::new(
        provider,
        policy,
        Arc::new(idp),
        cookie_key,
        &config.session,
    ));

    let upstream = Router::new().fallback_service(ServeDir::new(&config.site_root));
    let app = login_gate_server::protect(upstream, state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!(
        site_root = %config.site_root.display(),
        "listening on http://{}",
        config.listen_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down");
}
