use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use folio_db::{Direction, Entity, Filter};
use folio_http::AppError;

use crate::utils::{required, required_if_present, LIST_LIMIT};

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Category name as free text; not checked against the category list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Book {
    const COLLECTION: &'static str = "books";
}

/// Create or update request body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub front_cover: Option<String>,
    pub back_cover: Option<String>,
    pub description: Option<String>,
}

/// Fields to overwrite on update; `None` leaves the stored value alone.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookInput {
    pub fn into_book(self) -> Result<Book, AppError> {
        Ok(Book {
            title: required("title", self.title)?,
            author: required("author", self.author)?,
            isbn: self.isbn,
            category: self.category,
            front_cover: self.front_cover,
            back_cover: self.back_cover,
            description: self.description,
        })
    }

    /// Title and author may be omitted, but not blanked.
    pub fn into_patch(self) -> Result<BookPatch, AppError> {
        Ok(BookPatch {
            title: required_if_present("title", self.title)?,
            author: required_if_present("author", self.author)?,
            isbn: self.isbn,
            category: self.category,
            front_cover: self.front_cover,
            back_cover: self.back_cover,
            description: self.description,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Case-insensitive text matched against title, author and ISBN
    pub q: Option<String>,
    /// Exact category name
    pub category: Option<String>,
}

impl BookListQuery {
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::All;

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            filter = filter.and(Filter::eq("category", category));
        }

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            filter = filter.and(Filter::search(["title", "author", "isbn"], q));
        }

        filter
    }

    /// Newest first, capped.
    pub fn query(&self) -> folio_db::Query {
        folio_db::Query::new(self.filter())
            .sort_by("createdAt", Direction::Desc)
            .limit(LIST_LIMIT)
    }
}
