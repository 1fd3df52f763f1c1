#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use push_relay::config::Config;
use push_relay::{AppBuilder, api, telemetry};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    let boot_span = tracing::info_span!("boot_server");
    let (listener, app_router, registry) = async {
        if config.auth.uses_default_key() {
            tracing::warn!("NOTIFICATION_API_KEY is not set, using the development default");
        }

        let app = AppBuilder::new(config.clone()).build()?;
        tracing::info!(expo_token_configured = config.expo.access_token.is_some(), "Push provider ready");

        let app_router = api::app_router(config.clone(), app.services);
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, "listening");

        Ok::<_, anyhow::Error>((listener, app_router, app.registry))
    }
    .instrument(boot_span)
    .await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    push_relay::spawn_signal_handler(shutdown_tx);

    let mut server_rx = shutdown_rx.clone();
    let server = axum::serve(listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = server_rx.wait_for(|&s| s).await;
        });
    let mut server_task = tokio::spawn(async move { server.await });

    let mut timeout_rx = shutdown_rx;
    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        res = &mut server_task => match res {
            Ok(Ok(())) => tracing::info!("Server stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
            Err(e) => tracing::error!(error = %e, "Server task failed"),
        },
        () = async {
            let _ = timeout_rx.wait_for(|&s| s).await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!("Timeout waiting for in-flight requests to finish");
            server_task.abort();
        }
    }

    tracing::info!(registered_devices = registry.device_count(), "Discarding in-memory device registry");
    drop(registry);

    telemetry_guard.shutdown();
    Ok(())
}
