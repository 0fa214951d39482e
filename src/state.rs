use std::sync::Arc;

use axum::extract::FromRef;

use folio_authz::AuthGuard;
use folio_db::Store;
use folio_media::MediaHost;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub guard: Arc<AuthGuard>,
    pub media: Arc<dyn MediaHost>,
}

impl AppState {
    pub fn new(store: Store, guard: AuthGuard, media: Arc<dyn MediaHost>) -> Self {
        Self {
            store,
            guard: Arc::new(guard),
            media,
        }
    }
}

impl FromRef<AppState> for Arc<AuthGuard> {
    fn from_ref(state: &AppState) -> Self {
        state.guard.clone()
    }
}
