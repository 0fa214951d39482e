use async_trait::async_trait;
use folio_kernel::settings::AuthMode;
use folio_kernel::{InitCtx, Module};

use crate::guard::AuthGuard;

/// Core module announcing which token check is in force.
pub struct AuthzModule {
    guard: AuthGuard,
}

impl AuthzModule {
    pub fn new(guard: AuthGuard) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Module for AuthzModule {
    fn name(&self) -> &'static str {
        "authz"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if !self.guard.is_configured() {
            tracing::warn!(
                module = self.name(),
                "no admin secret configured; admin login is disabled"
            );
        }

        match self.guard.mode() {
            AuthMode::Signed => {
                tracing::info!(module = self.name(), "admin tokens: signed, 8h expiry");
            }
            AuthMode::SharedSecret => {
                tracing::warn!(
                    module = self.name(),
                    environment = ?ctx.settings.environment,
                    "admin tokens: raw shared-secret comparison; local development only"
                );
            }
        }
        Ok(())
    }
}
