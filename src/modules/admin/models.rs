use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use folio_authz::AdminClaims;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginInput {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginIssued {
    pub ok: bool,
    pub token: String,
}

/// Result of checking a bearer token.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<AdminClaims>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResult {
    /// Durable HTTPS URL of the stored image
    pub url: String,
    /// Media host response, passed through
    pub raw: serde_json::Value,
}

/// Multipart fields accepted as the uploaded image.
pub const FILE_FIELDS: [&str; 2] = ["file", "image"];
