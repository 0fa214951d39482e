//! Admin authentication for Folio: one identity, one shared secret, bearer tokens.

pub mod bearer;
pub mod guard;
pub mod module;

pub use bearer::bearer_token;
pub use guard::{AdminClaims, AuthError, AuthGuard, TOKEN_TTL_SECS};
pub use module::AuthzModule;
