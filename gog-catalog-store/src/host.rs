//! HTTP client for the host framework's REST and upload endpoints.

use std::time::Duration;

use gog_catalog_core::{
    EntityFilter, EntityKind, EntityRecord, EntityStore, FindResult, ImageUpload, MediaUploader,
    NewEntity, Pagination, StoreError,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

/// Client for a Strapi-style host: `/api/{collection}` CRUD and `/api/upload/`.
#[derive(Clone)]
pub struct HostClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Envelope of a `find` response.
#[derive(Debug, Deserialize)]
struct FindEnvelope {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Pagination,
}

/// Envelope of a `create` response.
#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    data: Value,
}

impl HostClient {
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StoreError::config(format!(
                "host URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(StoreError::transport)?;

        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/api/{}", self.base_url, kind.collection())
    }

    fn upload_url(&self) -> String {
        format!("{}/api/upload/", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Turn a non-2xx response into a status error carrying the body text.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }
}

impl EntityStore for HostClient {
    async fn find(&self, kind: EntityKind, filter: &EntityFilter) -> Result<FindResult, StoreError> {
        let req = self
            .http
            .get(self.collection_url(kind))
            .query(&find_query(filter));
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(StoreError::transport)?;
        let text = Self::check(resp)
            .await?
            .text()
            .await
            .map_err(StoreError::transport)?;

        parse_find(&text)
    }

    async fn create(&self, kind: EntityKind, data: &NewEntity) -> Result<EntityRecord, StoreError> {
        let body = serde_json::json!({ "data": data.to_data() });

        let req = self.http.post(self.collection_url(kind)).json(&body);
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(StoreError::transport)?;
        let text = Self::check(resp)
            .await?
            .text()
            .await
            .map_err(StoreError::transport)?;

        let envelope: CreateEnvelope = serde_json::from_str(&text).map_err(|e| {
            StoreError::decode(format!("create {}: {e}. Response: {}", kind, snippet(&text)))
        })?;
        let record = parse_entry(&envelope.data)?;
        log::debug!("Created {} #{} '{}'", kind, record.id, record.name);
        Ok(record)
    }
}

impl MediaUploader for HostClient {
    async fn upload(&self, upload: ImageUpload) -> Result<(), StoreError> {
        let form = UploadForm::new(upload).into_form()?;

        let req = self.http.post(self.upload_url()).multipart(form);
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(StoreError::transport)?;
        Self::check(resp).await?;
        Ok(())
    }
}

/// Query pairs for a `find` request.
fn find_query(filter: &EntityFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(name) = &filter.name {
        query.push(("filters[name][$eq]", name.clone()));
    }
    query
}

/// Text fields and file part of an `/api/upload/` request.
#[derive(Debug)]
struct UploadForm {
    fields: Vec<(&'static str, String)>,
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadForm {
    const FILE_FIELD: &'static str = "files";
    const MIME: &'static str = "image/jpeg";

    fn new(upload: ImageUpload) -> Self {
        Self {
            fields: vec![
                ("refId", upload.ref_id.to_string()),
                ("ref", upload.ref_uid),
                ("field", upload.field.as_str().to_string()),
            ],
            file_name: upload.filename,
            bytes: upload.bytes,
        }
    }

    fn into_form(self) -> Result<Form, StoreError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(Self::MIME)
            .map_err(StoreError::transport)?;
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Ok(form.part(Self::FILE_FIELD, part))
    }
}

/// Parse a `find` response body into records plus pagination.
pub fn parse_find(text: &str) -> Result<FindResult, StoreError> {
    let envelope: FindEnvelope = serde_json::from_str(text)
        .map_err(|e| StoreError::decode(format!("find: {e}. Response: {}", snippet(text))))?;

    let results = envelope
        .data
        .iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;
    let pagination = envelope.meta.map(|m| m.pagination).unwrap_or_default();

    Ok(FindResult {
        results,
        pagination,
    })
}

/// Parse one entry. Accepts both the nested `{ id, attributes: {...} }` shape
/// and the flattened `{ id, name, slug }` shape.
pub fn parse_entry(entry: &Value) -> Result<EntityRecord, StoreError> {
    let id = entry
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| StoreError::decode(format!("entry without numeric id: {}", entry)))?;
    let fields = entry.get("attributes").unwrap_or(entry);
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(EntityRecord {
        id,
        name: text("name"),
        slug: text("slug"),
    })
}

/// Pull `error.message` out of a host error body, falling back to the raw text.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| snippet(text).to_string())
}

fn snippet(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use gog_catalog_core::ImageField;

    use super::*;

    #[test]
    fn test_parse_find_nested_attributes() {
        let body = r#"{
            "data": [{"id": 7, "attributes": {"name": "Action", "slug": "action"}}],
            "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1, "total": 1}}
        }"#;
        let found = parse_find(body).unwrap();
        assert_eq!(found.results.len(), 1);
        assert_eq!(found.results[0].id, 7);
        assert_eq!(found.results[0].name, "Action");
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.pagination.page_size, 25);
    }

    #[test]
    fn test_parse_find_flat_entries_and_empty() {
        let flat = r#"{"data": [{"id": 3, "name": "Linux", "slug": "linux"}]}"#;
        let found = parse_find(flat).unwrap();
        assert_eq!(found.results[0].slug, "linux");
        assert_eq!(found.pagination, Pagination::default());

        let empty = parse_find(r#"{"data": [], "meta": {"pagination": {"total": 0}}}"#).unwrap();
        assert!(empty.first().is_none());
    }

    #[test]
    fn test_parse_entry_requires_id() {
        let err = parse_entry(&serde_json::json!({"name": "No Id"})).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_error_message_prefers_host_error() {
        let body = r#"{"data":null,"error":{"status":400,"name":"ValidationError","message":"slug must be unique"}}"#;
        assert_eq!(error_message(body), "slug must be unique");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_urls_and_validation() {
        let client = HostClient::new("http://localhost:1337/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1337");
        assert_eq!(
            client.collection_url(EntityKind::Category),
            "http://localhost:1337/api/categories"
        );
        assert_eq!(client.upload_url(), "http://localhost:1337/api/upload/");

        assert!(matches!(
            HostClient::new("localhost:1337", None),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_find_query_filters_by_exact_name() {
        assert_eq!(
            find_query(&EntityFilter::name("CD PROJEKT RED")),
            vec![("filters[name][$eq]", "CD PROJEKT RED".to_string())]
        );
        assert!(find_query(&EntityFilter::default()).is_empty());
    }

    #[test]
    fn test_upload_form_fields() {
        let upload = ImageUpload {
            ref_id: 42,
            ref_uid: EntityKind::Game.uid(),
            field: ImageField::Gallery,
            filename: "foo-game.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        };
        let form = UploadForm::new(upload);
        assert_eq!(
            form.fields,
            vec![
                ("refId", "42".to_string()),
                ("ref", "api::game.game".to_string()),
                ("field", "gallery".to_string()),
            ]
        );
        assert_eq!(form.file_name, "foo-game.jpg");
        assert_eq!(form.bytes, vec![0xFF, 0xD8]);
        assert_eq!(UploadForm::FILE_FIELD, "files");
        assert!(form.into_form().is_ok());
    }
}
