use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use folio_db::{Direction, Entity, Filter, Query};
use folio_http::AppError;

use crate::utils::{required, required_if_present, LIST_LIMIT};

/// A promotional slide on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarouselItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image_url: String,
    /// Position in the carousel, ascending
    #[serde(default)]
    pub order: i64,
    /// Inactive items are hidden from the public listing
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for CarouselItem {
    const COLLECTION: &'static str = "carousels";
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarouselInput {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl CarouselInput {
    pub fn into_item(self) -> Result<CarouselItem, AppError> {
        Ok(CarouselItem {
            title: self.title,
            image_url: required("imageUrl", self.image_url)?,
            order: self.order.unwrap_or(0),
            active: self.active.unwrap_or(true),
        })
    }

    pub fn into_patch(self) -> Result<CarouselPatch, AppError> {
        Ok(CarouselPatch {
            title: self.title,
            image_url: required_if_present("imageUrl", self.image_url)?,
            order: self.order,
            active: self.active,
        })
    }
}

/// `order` ascending, ties newest first.
pub fn list_query(filter: Filter) -> Query {
    Query::new(filter)
        .sort_by("order", Direction::Asc)
        .sort_by("createdAt", Direction::Desc)
        .limit(LIST_LIMIT)
}

pub fn active_only() -> Filter {
    Filter::eq("active", true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_applies_defaults() {
        let item = CarouselInput {
            image_url: Some("https://cdn.example/poster.jpg".into()),
            ..Default::default()
        }
        .into_item()
        .unwrap();

        assert_eq!(item.order, 0);
        assert!(item.active);
        assert_eq!(item.title, None);
    }

    #[test]
    fn image_url_is_required() {
        let err = CarouselInput {
            title: Some("Sale".into()),
            ..Default::default()
        }
        .into_item()
        .unwrap_err();
        assert!(err.to_string().contains("imageUrl"));
    }

    #[test]
    fn stored_documents_without_flags_read_as_active() {
        let item: CarouselItem =
            serde_json::from_value(serde_json::json!({"imageUrl": "/x.png"})).unwrap();
        assert!(item.active);
        assert_eq!(item.order, 0);
    }
}
