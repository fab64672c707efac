// API client module: a small blocking HTTP client that talks to the Gyazo
// upload endpoint. Every request it sends carries the bearer token.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use log::{debug, info};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use std::io::Read;

/// Upload URL. Be aware that it differs from the rest of the Gyazo API
/// (`https://api.gyazo.com`).
pub const UPLOAD_ENDPOINT: &str = "https://upload.gyazo.com/api/upload";

/// Form field carrying the image bytes.
const IMAGE_FIELD: &str = "imagedata";

/// Optional metadata attached to an upload. Empty strings count as absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Name of the file part. Falls back to a `YYYYMMDDHHMMSS` timestamp.
    pub filename: Option<String>,
}

/// Response of a successful upload.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    #[serde(rename = "image_id")]
    pub id: String,
    #[serde(default)]
    pub permalink_url: String,
    #[serde(rename = "thumb_url", default)]
    pub thumbnail_url: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub image_type: String,
    #[serde(rename = "star", default)]
    pub starred: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Client for the upload endpoint. The reqwest client is kept private so
/// callers only get `upload`.
pub struct GyazoClient {
    client: Client,
    endpoint: String,
}

impl GyazoClient {
    /// Create a client for the public upload endpoint.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_endpoint(token, UPLOAD_ENDPOINT)
    }

    /// Create a client that posts to `endpoint` instead of the public URL.
    pub fn with_endpoint(token: &str, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(auth_headers(token)?)
            .build()?;
        Ok(GyazoClient {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `content` as a multipart form and decode the JSON answer.
    ///
    /// Non-200 responses become [`Error::Upload`] with the raw body as the
    /// message; an unparsable 200 body becomes [`Error::Decode`].
    pub fn upload<R: Read>(&self, meta: UploadMetadata, mut content: R) -> Result<UploadedImage> {
        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes)?;
        drop(content);

        let file_name = upload_file_name(&meta, Local::now());
        debug!(
            "uploading {} bytes as {:?} to {}",
            bytes.len(),
            file_name,
            self.endpoint
        );

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let mut form = multipart::Form::new().part(IMAGE_FIELD, part);
        if let Some(title) = non_empty(meta.title) {
            form = form.text("title", title);
        }
        if let Some(desc) = non_empty(meta.description) {
            form = form.text("desc", desc);
        }

        let res = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = res.status();
        let body = res.text()?;
        if status != StatusCode::OK {
            debug!("upload rejected with {}", status);
            return Err(Error::Upload { status, body });
        }

        let image: UploadedImage = serde_json::from_str(&body)?;
        info!("uploaded image {}", image.id);
        Ok(image)
    }
}

/// Default headers for every request: the bearer token, hidden from debug
/// output.
fn auth_headers(token: &str) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| Error::Config("gyazo token contains invalid characters".into()))?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Name of the file part: the given file name, or the upload time.
pub fn upload_file_name(meta: &UploadMetadata, now: DateTime<Local>) -> String {
    match meta.filename.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => now.format("%Y%m%d%H%M%S").to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_prefers_given_name() {
        let meta = UploadMetadata {
            filename: Some("cat.png".into()),
            ..Default::default()
        };
        assert_eq!(upload_file_name(&meta, Local::now()), "cat.png");
    }

    #[test]
    fn file_name_falls_back_to_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        for filename in [None, Some(String::new())] {
            let meta = UploadMetadata {
                filename,
                ..Default::default()
            };
            assert_eq!(upload_file_name(&meta, now), "20240309070501");
        }
    }

    #[test]
    fn timestamp_name_is_fourteen_digits() {
        let name = upload_file_name(&UploadMetadata::default(), Local::now());
        assert_eq!(name.len(), 14);
        assert!(name.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn empty_strings_are_absent() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
    }

    #[test]
    fn decodes_full_response() {
        let json = r#"{
            "image_id": "8980c52421e452ac3355ca3e5cfe7a0c",
            "permalink_url": "http://gyazo.com/8980c52421e452ac3355ca3e5cfe7a0c",
            "thumb_url": "https://i.gyazo.com/thumb/180/_ebb000813faac4c0572cc2dd0c1cf5b5.png",
            "url": "https://i.gyazo.com/8980c52421e452ac3355ca3e5cfe7a0c.png",
            "type": "png",
            "star": true,
            "created_at": "2014-05-21 14:23:10+0900"
        }"#;
        let image: UploadedImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, "8980c52421e452ac3355ca3e5cfe7a0c");
        assert_eq!(
            image.thumbnail_url,
            "https://i.gyazo.com/thumb/180/_ebb000813faac4c0572cc2dd0c1cf5b5.png"
        );
        assert_eq!(image.image_type, "png");
        assert!(image.starred);
        assert_eq!(image.created_at, "2014-05-21 14:23:10+0900");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        assert!(matches!(auth_headers("abc\ndef"), Err(Error::Config(_))));
    }

    #[test]
    fn auth_header_is_bearer_and_sensitive() {
        let headers = auth_headers("secret").unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer secret");
        assert!(value.is_sensitive());
    }
}
