//! Bucket REST API client.

use crate::dto::{MediaListResponse, ObjectListResponse};
use crate::{ContentStore, Download};
use coldcut_core::{ContentObject, MediaItem, Page, PageRequest};
use coldcut_error::{ColdcutResult, ContentError, ContentErrorKind};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, instrument};

/// Default endpoint of the content platform API.
pub const DEFAULT_CONTENT_API_URL: &str = "https://api.cosmicjs.com/v3";

const MEDIA_PROPS: &str = "id,name,url,imgix_url,size,created_at,folder,type";
const OBJECT_PROPS: &str = "id,slug,title,type,metadata";

/// Bucket identity and keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentCredentials {
    /// Bucket slug
    pub bucket_slug: String,
    /// Key for read endpoints
    pub read_key: String,
    /// Key for write endpoints
    pub write_key: String,
}

/// Content platform client.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: Client,
    api_url: String,
    credentials: ContentCredentials,
}

impl HttpContentStore {
    /// Creates a client for the default API endpoint.
    pub fn new(credentials: ContentCredentials) -> Self {
        Self::with_api_url(DEFAULT_CONTENT_API_URL, credentials)
    }

    /// Creates a client for a specific endpoint.
    #[instrument(skip(api_url, credentials), fields(bucket = %credentials.bucket_slug))]
    pub fn with_api_url(api_url: impl Into<String>, credentials: ContentCredentials) -> Self {
        debug!("Creating content store client");
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn bucket_url(&self, path: &str) -> String {
        format!(
            "{}/buckets/{}/{}",
            self.api_url, self.credentials.bucket_slug, path
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ColdcutResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ContentError::new(ContentErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentError::new(ContentErrorKind::NotFound(message)).into());
        }
        Err(ContentError::new(ContentErrorKind::Api {
            status: status.as_u16(),
            message,
        })
        .into())
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ColdcutResult<T> {
        response
            .json()
            .await
            .map_err(|e| ContentError::new(ContentErrorKind::Decode(e.to_string())).into())
    }
}

#[async_trait::async_trait]
impl ContentStore for HttpContentStore {
    #[instrument(skip(self), fields(limit = page.limit, skip = page.skip))]
    async fn list_media(&self, page: PageRequest) -> ColdcutResult<Page<MediaItem>> {
        let (limit, skip) = (page.limit.to_string(), page.skip.to_string());
        let request = self.client.get(self.bucket_url("media")).query(&[
            ("read_key", self.credentials.read_key.as_str()),
            ("limit", limit.as_str()),
            ("skip", skip.as_str()),
            ("sort", "-created_at"),
            ("props", MEDIA_PROPS),
        ]);

        let response = match self.send(request).await {
            Ok(response) => response,
            // An empty bucket answers 404 rather than an empty list
            Err(e) if is_not_found(&e) => return Ok(Page::empty()),
            Err(e) => return Err(e),
        };

        let body: MediaListResponse = Self::decode(response).await?;
        let items = body
            .media
            .into_iter()
            .map(MediaItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = items.len(), total = ?body.total, "Fetched media page");
        Ok(Page {
            items,
            total: body.total,
        })
    }

    #[instrument(skip(self), fields(limit = page.limit, skip = page.skip))]
    async fn list_objects(
        &self,
        object_type: &str,
        page: PageRequest,
    ) -> ColdcutResult<Page<ContentObject>> {
        let query = json!({ "type": object_type }).to_string();
        let (limit, skip) = (page.limit.to_string(), page.skip.to_string());
        let request = self.client.get(self.bucket_url("objects")).query(&[
            ("read_key", self.credentials.read_key.as_str()),
            ("query", query.as_str()),
            ("limit", limit.as_str()),
            ("skip", skip.as_str()),
            ("props", OBJECT_PROPS),
            ("depth", "0"),
        ]);

        let body: ObjectListResponse = Self::decode(self.send(request).await?).await?;
        let items = body
            .objects
            .into_iter()
            .map(|dto| dto.into_object(object_type))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = items.len(), total = ?body.total, "Fetched object page");
        Ok(Page {
            items,
            total: body.total,
        })
    }

    #[instrument(skip(self, value))]
    async fn update_metadata(
        &self,
        object_id: &str,
        field: &str,
        value: &str,
    ) -> ColdcutResult<()> {
        let request = self
            .client
            .patch(self.bucket_url(&format!("objects/{}", object_id)))
            .bearer_auth(&self.credentials.write_key)
            .json(&json!({ "metadata": { field: value } }));

        self.send(request).await?;
        debug!("Updated object metadata");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_media(&self, media_id: &str) -> ColdcutResult<()> {
        let request = self
            .client
            .delete(self.bucket_url(&format!("media/{}", media_id)))
            .bearer_auth(&self.credentials.write_key);

        self.send(request).await?;
        debug!("Deleted media record");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str) -> ColdcutResult<Download> {
        let download_error = |message: String| {
            ContentError::new(ContentErrorKind::Download {
                url: url.to_string(),
                message,
            })
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("status {}", response.status())).into());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| !value.is_empty());

        let data = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?
            .to_vec();

        debug!(size = data.len(), content_type = ?content_type, "Downloaded media");
        Ok(Download {
            url: url.to_string(),
            data,
            content_type,
        })
    }
}

fn is_not_found(err: &coldcut_error::ColdcutError) -> bool {
    matches!(err.kind(), coldcut_error::ColdcutErrorKind::Content(e) if e.is_not_found())
}
