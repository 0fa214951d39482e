use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use folio_kernel::settings::{MediaSettings, SignatureAlgorithm};

use crate::{MediaError, MediaHost, UploadFile, Uploaded};

#[derive(Clone)]
enum Credentials {
    /// API key and secret; requests carry a signature.
    Signed {
        api_key: String,
        api_secret: String,
        algorithm: SignatureAlgorithm,
    },
    /// Unsigned upload preset.
    Preset(String),
}

/// Cloudinary image upload API client.
#[derive(Clone)]
pub struct Cloudinary {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    folder: String,
}

impl Cloudinary {
    /// `None` unless a cloud name plus either API credentials or a preset are set.
    pub fn from_settings(settings: &MediaSettings) -> Option<Self> {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let cloud_name = non_empty(&settings.cloud_name)?;
        let credentials = match (
            non_empty(&settings.api_key),
            non_empty(&settings.api_secret),
            non_empty(&settings.upload_preset),
        ) {
            (Some(api_key), Some(api_secret), _) => Credentials::Signed {
                api_key,
                api_secret,
                algorithm: settings.signature_algorithm,
            },
            (_, _, Some(preset)) => Credentials::Preset(preset),
            _ => return None,
        };

        Some(Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/{}/image/upload",
                settings.api_base.trim_end_matches('/'),
                cloud_name
            ),
            credentials,
            folder: settings.folder.clone(),
        })
    }

    /// Form fields other than the file itself.
    fn fields(&self, timestamp: u64) -> Vec<(&'static str, String)> {
        match &self.credentials {
            Credentials::Signed {
                api_key,
                api_secret,
                algorithm,
            } => {
                // Alphabetical: the signature covers them in this order.
                let mut fields = vec![
                    ("folder", self.folder.clone()),
                    ("overwrite", "false".to_string()),
                    ("timestamp", timestamp.to_string()),
                    ("unique_filename", "true".to_string()),
                    ("use_filename", "true".to_string()),
                ];
                let signature = sign(&fields, api_secret, *algorithm);
                fields.push(("api_key", api_key.clone()));
                fields.push(("signature", signature));
                fields
            }
            Credentials::Preset(preset) => vec![
                ("upload_preset", preset.clone()),
                ("folder", self.folder.clone()),
            ],
        }
    }
}

/// Hex digest of `k1=v1&k2=v2...` followed by the API secret.
fn sign(fields: &[(&str, String)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let joined = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => digest::<Sha1>(&joined, api_secret),
        SignatureAlgorithm::Sha256 => digest::<Sha256>(&joined, api_secret),
    }
}

fn digest<D: Digest>(payload: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[async_trait]
impl MediaHost for Cloudinary {
    async fn upload(&self, file: UploadFile) -> Result<Uploaded, MediaError> {
        let size = file.bytes.len();
        let mut part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }

        let mut form = Form::new().part("file", part);
        for (key, value) in self.fields(now_secs()) {
            form = form.text(key, value);
        }

        tracing::info!(file = %file.file_name, size, "uploading image to media host");

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_else(|_| {
            serde_json::json!({ "error": { "message": status.canonical_reason().unwrap_or("upload failed") } })
        });

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .or_else(|| body.get("error"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("upload failed")
                .to_string();
            tracing::error!(status = status.as_u16(), %message, "media host rejected upload");
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let url = body
            .get("secure_url")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| MediaError::InvalidResponse("missing secure_url".into()))?
            .to_string();

        Ok(Uploaded { url, raw: body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(api_base: &str) -> MediaSettings {
        MediaSettings {
            cloud_name: Some("demo".into()),
            api_key: Some("key".into()),
            api_secret: Some("abcd".into()),
            api_base: api_base.to_string(),
            ..MediaSettings::default()
        }
    }

    fn file() -> UploadFile {
        UploadFile {
            file_name: "cover.png".into(),
            content_type: Some("image/png".into()),
            bytes: b"PNG".to_vec(),
        }
    }

    #[test]
    fn requires_cloud_name_and_credentials() {
        assert!(Cloudinary::from_settings(&MediaSettings::default()).is_none());

        let mut only_name = MediaSettings::default();
        only_name.cloud_name = Some("demo".into());
        assert!(Cloudinary::from_settings(&only_name).is_none());

        only_name.upload_preset = Some("unsigned".into());
        assert!(Cloudinary::from_settings(&only_name).is_some());
    }

    fn signature_with(algorithm: SignatureAlgorithm) -> Option<String> {
        let mut settings = settings("https://example.test");
        settings.signature_algorithm = algorithm;
        let host = Cloudinary::from_settings(&settings).unwrap();
        host.fields(1_700_000_000)
            .into_iter()
            .find(|(key, _)| *key == "signature")
            .map(|(_, value)| value)
    }

    #[test]
    fn sha1_signature_covers_sorted_fields_and_secret() {
        assert_eq!(
            signature_with(SignatureAlgorithm::Sha1).as_deref(),
            Some("cffd5892fb231592c26883ece386c1fb8eaae022")
        );
    }

    #[test]
    fn sha256_signature_when_configured() {
        assert_eq!(
            signature_with(SignatureAlgorithm::Sha256).as_deref(),
            Some("95719fbf4b70e9cbd71643cd322c5a55bb56324a8b9d5bfc29fc3785176cd24c")
        );
    }

    #[test]
    fn default_settings_sign_with_sha1() {
        let host = Cloudinary::from_settings(&settings("https://example.test")).unwrap();
        let signature = host
            .fields(1_700_000_000)
            .into_iter()
            .find(|(key, _)| *key == "signature")
            .map(|(_, value)| value)
            .unwrap();
        assert_eq!(signature.len(), 40);
    }

    #[tokio::test]
    async fn returns_secure_url_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .and(body_string_contains("studyhub_publication"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://res.example.test/demo/cover.png",
                "public_id": "studyhub_publication/cover"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = Cloudinary::from_settings(&settings(&server.uri())).unwrap();
        let uploaded = host.upload(file()).await.unwrap();

        assert_eq!(uploaded.url, "https://res.example.test/demo/cover.png");
        assert_eq!(uploaded.raw["public_id"], "studyhub_publication/cover");
    }

    #[tokio::test]
    async fn passes_provider_message_through_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid image file" }
            })))
            .mount(&server)
            .await;

        let host = Cloudinary::from_settings(&settings(&server.uri())).unwrap();
        let err = host.upload(file()).await.unwrap_err();

        match err {
            MediaError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid image file");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfigured_host_refuses() {
        let err = crate::Unconfigured.upload(file()).await.unwrap_err();
        assert!(matches!(err, MediaError::NotConfigured));
    }
}
