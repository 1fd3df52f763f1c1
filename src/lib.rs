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

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

use crate::adapters::push::{ExpoPushProvider, PushProvider};
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::device_service::DeviceService;
use crate::services::notifier::Notifier;
use crate::storage::DeviceRegistry;
use std::sync::Arc;
use tokio::sync::watch;

/// Wired application components. The registry lives exactly as long as this value.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub registry: Arc<DeviceRegistry>,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    push_provider: Option<Arc<dyn PushProvider>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, push_provider: None }
    }

    #[must_use]
    pub fn with_push_provider(mut self, provider: Arc<dyn PushProvider>) -> Self {
        self.push_provider = Some(provider);
        self
    }

    /// Wires the registry, services and push provider together.
    /// Without an explicit provider, an Expo client is built from configuration.
    ///
    /// # Errors
    /// Returns an error if the default push provider cannot be constructed.
    pub fn build(self) -> anyhow::Result<App> {
        let provider = match self.push_provider {
            Some(provider) => provider,
            None => Arc::new(ExpoPushProvider::new(&self.config.expo)?),
        };

        let registry = Arc::new(DeviceRegistry::new());
        let services = ServiceContainer {
            device_service: DeviceService::new(Arc::clone(&registry)),
            notifier: Notifier::new(Arc::clone(&registry), provider),
        };

        Ok(App { services, registry })
    }
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
