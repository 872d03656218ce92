//! Roman numeral gateway.
//!
//! - `GET /v1/romannumeral?query=N` and `?min=A&max=B`
//! - `GET /health`, `GET /metrics`
//! - `X-Request-ID` on every response
//!
//! Config path: first argument, else `ROMAN_CONFIG`, else `roman.yaml`.

use std::future::IntoFuture;
use std::process::ExitCode;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use roman_core::error::{Result, RomanError};
use roman_gateway::{app_state, config, obs, router};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // the subscriber may not be installed yet
            eprintln!("roman-gateway: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::resolve_path(std::env::args().nth(1));
    let (cfg, defaulted) = config::load_or_default(&path)?;
    obs::logging::init(&cfg.logging)?;
    if defaulted {
        tracing::warn!(path = %path, "config file not found, using defaults");
    }

    let listen = cfg.server.listen_addr()?;
    let grace = Duration::from_millis(cfg.server.shutdown_grace_ms);

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| RomanError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "roman-gateway starting");

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => {
            return res.map_err(|e| RomanError::Internal(format!("server failed: {e}")));
        }
        _ = signalled_rx => {}
    }

    // in-flight requests get `grace` to drain
    match tokio::time::timeout(grace, server).await {
        Ok(res) => res.map_err(|e| RomanError::Internal(format!("server failed: {e}")))?,
        Err(_) => tracing::warn!(
            grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX),
            "grace period elapsed, dropping open connections"
        ),
    }

    tracing::info!("roman-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
    tracing::info!("shutdown signal received, draining");
}
