use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use folio_db::{Entity, Filter, IndexSpec};
use folio_http::AppError;

/// Key of the one settings document.
pub const HOME_KEY: &str = "home";

pub const DEFAULT_TITLE: &str = "WELCOME TO STUDY-HUB PUBLICATION";
pub const DEFAULT_DESCRIPTION: &str = "We have the biggest bestsellers to the hardest-to-find, \
out-of-print rarities brought to you by thousands of Booksellers around the world. \
So look around and let us help you find your next favorite book.";

/// Home page copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Setting {
    pub key: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl Setting {
    pub fn home_default() -> Self {
        Self {
            key: HOME_KEY.to_string(),
            title: default_title(),
            description: default_description(),
        }
    }
}

impl Entity for Setting {
    const COLLECTION: &'static str = "settings";

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::unique(Self::COLLECTION, "key")]
    }
}

pub fn home() -> Filter {
    Filter::eq("key", HOME_KEY)
}

/// Update body. Older clients send `homeTitle`/`homeDescription`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SettingsInput {
    #[serde(alias = "homeTitle")]
    pub title: Option<String>,
    #[serde(alias = "homeDescription")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsPatch {
    pub title: String,
    pub description: String,
}

impl SettingsInput {
    /// Both fields must be present; either may be blank.
    pub fn into_patch(self) -> Result<SettingsPatch, AppError> {
        Ok(SettingsPatch {
            title: present("title", self.title)?,
            description: present("description", self.description)?,
        })
    }
}

fn present(field: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .map(|value| value.trim().to_string())
        .ok_or_else(|| AppError::invalid_field(field, "title and description required"))
}
