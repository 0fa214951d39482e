//! Composition root: settings in, running server out.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;

use folio_authz::{AuthGuard, AuthzModule};
use folio_db::{DatabaseModule, Store};
use folio_kernel::{InitCtx, ModuleRegistry, Settings};
use folio_media::{Cloudinary, MediaHost, Unconfigured};

use crate::modules;
use crate::state::AppState;

pub struct App {
    settings: Settings,
    state: AppState,
    registry: ModuleRegistry,
}

impl App {
    /// Wire production services from settings. Nothing connects yet.
    pub fn new(settings: Settings) -> Self {
        let store = Store::from_settings(&settings.database, modules::indexes());
        let guard = AuthGuard::from_settings(&settings.auth);
        let media: Arc<dyn MediaHost> = match Cloudinary::from_settings(&settings.media) {
            Some(cloudinary) => Arc::new(cloudinary),
            None => Arc::new(Unconfigured),
        };

        Self::with_state(settings, AppState::new(store, guard, media))
    }

    /// Wire around pre-built services.
    pub fn with_state(settings: Settings, state: AppState) -> Self {
        let mut registry = ModuleRegistry::new();
        registry.register_core(Arc::new(DatabaseModule::new(state.store.clone())));
        registry.register_core(Arc::new(AuthzModule::new(state.guard.as_ref().clone())));
        modules::register_all(&mut registry, &state);

        Self {
            settings,
            state,
            registry,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Run every module's init and start hooks.
    pub async fn start(&self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;
        Ok(())
    }

    pub fn router(&self) -> Router {
        folio_http::build_router(&self.registry, &self.settings)
    }

    /// Start modules, serve until ctrl-c or SIGTERM, then stop modules.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.start().await.context("module startup failed")?;

        let served =
            folio_http::start_server(&self.registry, &self.settings, shutdown_signal()).await;

        self.registry.stop_all().await?;
        served
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
