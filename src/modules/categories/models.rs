use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use folio_db::{Direction, Entity, IndexSpec, Query};
use folio_http::AppError;

use crate::utils::{required, required_if_present, LIST_LIMIT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Unique, compared exactly
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Entity for Category {
    const COLLECTION: &'static str = "categories";

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::unique(Self::COLLECTION, "name")]
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl CategoryInput {
    pub fn into_category(self) -> Result<Category, AppError> {
        Ok(Category {
            name: required("name", self.name)?,
            thumbnail: self.thumbnail,
        })
    }

    pub fn into_patch(self) -> Result<CategoryPatch, AppError> {
        Ok(CategoryPatch {
            name: required_if_present("name", self.name)?,
            thumbnail: self.thumbnail,
        })
    }
}

/// Alphabetical, capped.
pub fn list_query() -> Query {
    Query::all()
        .sort_by("name", Direction::Asc)
        .limit(LIST_LIMIT)
}

pub fn already_exists() -> AppError {
    AppError::invalid_field("name", "category already exists")
}
