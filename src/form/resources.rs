//! Resource retrieval for the template and fonts.
//!
//! Every generation fetches the template and both fonts afresh; nothing is
//! cached between calls. Locations are either HTTP(S) URLs, paths resolved
//! against a configured base URL, or local filesystem paths.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::ResourceFetchError;

/// Source of raw resource bytes.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ResourceFetchError>;
}

/// Fetches resources over HTTP, resolving relative locations against an
/// optional base URL.
pub struct HttpResourceSource {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpResourceSource {
    pub fn new(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    pub fn with_default_client(base_url: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("reservation-form-server/0.3")
            .build()?;
        Ok(Self::new(client, base_url))
    }

    pub fn resolve(&self, location: &str) -> String {
        if is_http(location) {
            return location.to_string();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base, location.trim_start_matches('/')),
            None => location.to_string(),
        }
    }
}

#[async_trait]
impl ResourceSource for HttpResourceSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ResourceFetchError> {
        let url = self.resolve(location);
        let request_error = |source| ResourceFetchError::Request {
            location: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResourceFetchError::Status {
                location: url,
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}

/// Reads resources from the local filesystem, relative to a root directory.
pub struct FileResourceSource {
    root: PathBuf,
}

impl FileResourceSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceSource for FileResourceSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ResourceFetchError> {
        let path = self.root.join(location);
        tokio::fs::read(&path)
            .await
            .map_err(|source| ResourceFetchError::Io {
                location: path.display().to_string(),
                source,
            })
    }
}

/// Routes HTTP(S) locations, and everything when a base URL is configured,
/// to HTTP; other locations to the filesystem.
pub struct DefaultResourceSource {
    http: HttpResourceSource,
    files: FileResourceSource,
    prefer_http: bool,
}

impl DefaultResourceSource {
    pub fn new(http: HttpResourceSource, files: FileResourceSource) -> Self {
        let prefer_http = http.base_url.is_some();
        Self {
            http,
            files,
            prefer_http,
        }
    }
}

#[async_trait]
impl ResourceSource for DefaultResourceSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ResourceFetchError> {
        if self.prefer_http || is_http(location) {
            self.http.fetch(location).await
        } else {
            self.files.fetch(location).await
        }
    }
}

fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Where the template and the two fonts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocations {
    pub template: String,
    pub body_font: String,
    pub symbol_font: String,
}

/// Raw bytes for one generation.
#[derive(Debug, Clone)]
pub struct TemplateResources {
    pub template: Vec<u8>,
    pub body_font: Vec<u8>,
    pub symbol_font: Vec<u8>,
}

/// Fetches the template and both fonts concurrently.
#[derive(Clone)]
pub struct ResourceLoader {
    source: Arc<dyn ResourceSource>,
    locations: ResourceLocations,
}

impl ResourceLoader {
    pub fn new(source: Arc<dyn ResourceSource>, locations: ResourceLocations) -> Self {
        Self { source, locations }
    }

    /// Fetch all three resources; the first failure aborts the load.
    pub async fn load(&self) -> Result<TemplateResources, ResourceFetchError> {
        log::debug!(
            "Fetching form resources: template={}, body_font={}, symbol_font={}",
            self.locations.template,
            self.locations.body_font,
            self.locations.symbol_font
        );
        let (template, body_font, symbol_font) = tokio::try_join!(
            self.source.fetch(&self.locations.template),
            self.source.fetch(&self.locations.body_font),
            self.source.fetch(&self.locations.symbol_font),
        )?;
        log::debug!(
            "Fetched form resources ({} + {} + {} bytes)",
            template.len(),
            body_font.len(),
            symbol_font.len()
        );
        Ok(TemplateResources {
            template,
            body_font,
            symbol_font,
        })
    }
}
