use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use folio_db::{Direction, Entity, Filter, Query};
use folio_http::AppError;

use crate::utils::{required, LIST_LIMIT};

/// A message left through the public contact form. Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub read: bool,
}

impl Entity for Feedback {
    const COLLECTION: &'static str = "feedbacks";
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub book_name: Option<String>,
    pub message: Option<String>,
}

impl ContactInput {
    pub fn into_feedback(self) -> Result<Feedback, AppError> {
        Ok(Feedback {
            name: required("name", self.name)?,
            phone: required("phone", self.phone)?,
            email: self.email,
            book_name: self.book_name,
            message: self.message,
            read: false,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactAccepted {
    pub ok: bool,
    pub id: String,
}

/// Body of the read toggle. A missing flag marks the feedback unread.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReadFlag {
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedbackQuery {
    /// `true` limits the list to unread feedback
    pub unread: Option<String>,
    /// Target of a read toggle or single delete
    pub id: Option<String>,
}

impl FeedbackQuery {
    pub fn unread_only(&self) -> bool {
        self.unread.as_deref() == Some("true")
    }

    /// Newest first, capped.
    pub fn list_query(&self) -> Query {
        let filter = if self.unread_only() {
            Filter::ne("read", true)
        } else {
            Filter::All
        };
        Query::new(filter)
            .sort_by("createdAt", Direction::Desc)
            .limit(LIST_LIMIT)
    }

    /// The `id` parameter, ignoring an empty value.
    pub fn target(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_requires_name_and_phone() {
        let no_phone = ContactInput {
            name: Some("Ann".into()),
            ..Default::default()
        };
        assert!(no_phone.into_feedback().is_err());

        let feedback = ContactInput {
            name: Some("Ann".into()),
            phone: Some("555".into()),
            ..Default::default()
        }
        .into_feedback()
        .unwrap();
        assert!(!feedback.read);
    }

    #[test]
    fn only_literal_true_filters_unread() {
        let unread = FeedbackQuery {
            unread: Some("true".into()),
            id: None,
        };
        assert_eq!(unread.list_query().filter, Filter::ne("read", true));

        let other = FeedbackQuery {
            unread: Some("yes".into()),
            id: None,
        };
        assert_eq!(other.list_query().filter, Filter::All);
    }

    #[test]
    fn missing_read_flag_means_unread() {
        let flag: ReadFlag = serde_json::from_str("{}").unwrap();
        assert!(!flag.read);
    }
}
