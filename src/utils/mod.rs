//! Helpers shared by the content modules.

use folio_db::{Collection, DocId, Entity, Store};
use folio_http::AppError;

/// Upper bound on documents returned by any list endpoint.
pub const LIST_LIMIT: usize = 1000;

/// Typed collection for a write path; an unconfigured store is a 500.
pub async fn collection<T: Entity>(store: &Store) -> Result<Collection<T>, AppError> {
    Ok(store.require().await?.collection::<T>())
}

/// Parse a path id. Anything that is not a well-formed id cannot exist, so it is a 404.
pub fn parse_id(raw: &str, entity: &str) -> Result<DocId, AppError> {
    DocId::parse(raw).ok_or_else(|| not_found(entity))
}

pub fn not_found(entity: &str) -> AppError {
    AppError::not_found(format!("{} not found", entity))
}

/// A required text field: present and non-blank. Returns the trimmed value.
pub fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::invalid_field(field, format!("{} is required", field))),
    }
}

/// Like [`required`], for a field that may be omitted from a partial update.
pub fn required_if_present(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, Some(v))).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required("title", None).is_err());
        assert!(required("title", Some("   ".into())).is_err());
        assert_eq!(required("title", Some(" Optics ".into())).unwrap(), "Optics");
    }

    #[test]
    fn omitted_fields_pass_partial_validation() {
        assert_eq!(required_if_present("title", None).unwrap(), None);
        assert!(required_if_present("title", Some("".into())).is_err());
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_id("1", "book"), Err(AppError::NotFound { .. })));
        assert!(parse_id("64b7f0c2a1b2c3d4e5f60718", "book").is_ok());
    }
}
