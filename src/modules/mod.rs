pub mod admin;
pub mod books;
pub mod carousel;
pub mod categories;
pub mod feedback;
pub mod settings;

use folio_db::{Entity, IndexSpec};
use folio_kernel::ModuleRegistry;

use crate::state::AppState;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState) {
    registry.register_custom(books::create_module(state.clone()));
    registry.register_custom(categories::create_module(state.clone()));
    registry.register_custom(carousel::create_module(state.clone()));
    registry.register_custom(feedback::create_module(state.clone()));
    registry.register_custom(settings::create_module(state.clone()));
    registry.register_custom(admin::create_module(state.clone()));
}

/// Indexes declared by every stored entity.
pub fn indexes() -> Vec<IndexSpec> {
    [
        books::models::Book::indexes(),
        categories::models::Category::indexes(),
        carousel::models::CarouselItem::indexes(),
        feedback::models::Feedback::indexes(),
        settings::models::Setting::indexes(),
    ]
    .concat()
}
