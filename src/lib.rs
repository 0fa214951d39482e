//! Folio application library
//!
//! Content modules (books, categories, carousel, feedback, settings, admin) and
//! the composition root that wires them onto the shared store, auth guard, and
//! media host.

pub mod app;
pub mod modules;
pub mod sample;
pub mod state;
pub mod utils;

pub use app::App;
pub use state::AppState;
