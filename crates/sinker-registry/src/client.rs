use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use sinker_core::Auth;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Host serving the Docker Hub registry API
pub const DOCKER_HUB_HOST: &str = "registry-1.docker.io";

/// Names that refer to Docker Hub in image references
const DOCKER_HUB_ALIASES: &[&str] = &["docker.io", "index.docker.io", "registry.hub.docker.com"];

/// Namespace of Docker Hub's official images
const DOCKER_HUB_PREFIX: &str = "library";

/// Page size requested from the tags endpoint
const TAGS_PAGE_SIZE: usize = 1000;

/// Client for the tag listing endpoint of registry v2 compatible registries
pub struct RegistryClient {
    client: reqwest::Client,
    /// Basic credentials per registry host
    credentials: HashMap<String, Auth>,
    scheme: &'static str,
}

impl RegistryClient {
    /// Create a new registry client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sinker/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            credentials: HashMap::new(),
            scheme: "https",
        })
    }

    /// Send basic credentials to `host`. Empty credentials are ignored.
    pub fn with_credentials(mut self, host: impl Into<String>, auth: Auth) -> Self {
        if !auth.is_empty() {
            self.credentials.insert(host.into(), auth);
        }
        self
    }

    /// Talk plain HTTP instead of HTTPS (local registries)
    pub fn with_plain_http(mut self) -> Self {
        self.scheme = "http";
        self
    }

    /// Map an image's host and repository to the registry API host and
    /// repository, applying the Docker Hub conventions: no host means
    /// Docker Hub, and official images live under `library/`.
    ///
    /// The client only sends basic credentials. Docker Hub answers every
    /// request without a bearer token with 401, so listing Hub images fails
    /// and stops the check.
    pub fn endpoint(host: &str, repository: &str) -> (String, String) {
        if !host.is_empty() && !DOCKER_HUB_ALIASES.contains(&host) {
            return (host.to_string(), repository.to_string());
        }

        let repository = if repository.contains('/') {
            repository.to_string()
        } else {
            format!("{}/{}", DOCKER_HUB_PREFIX, repository)
        };

        (DOCKER_HUB_HOST.to_string(), repository)
    }

    /// List all tags for a repository (handles pagination)
    pub async fn list_tags(&self, host: &str, repository: &str) -> Result<Vec<String>> {
        let (api_host, repository) = Self::endpoint(host, repository);
        let credentials = self.credentials.get(host).or_else(|| self.credentials.get(&api_host));

        let mut all_tags = Vec::new();
        let mut url = format!(
            "{}://{}/v2/{}/tags/list?n={}",
            self.scheme, api_host, repository, TAGS_PAGE_SIZE
        );

        loop {
            debug!("Listing tags from: {}", url);

            let mut request = self.client.get(&url);
            if let Some(auth) = credentials {
                request = request.basic_auth(&auth.username, Some(&auth.password));
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to connect to registry at {}", url))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "Registry returned {} for {}: {}",
                    status,
                    url,
                    if body.is_empty() {
                        "(no response body)".to_string()
                    } else {
                        body
                    }
                ));
            }

            let next_url = response
                .headers()
                .get("link")
                .and_then(|h| h.to_str().ok())
                .and_then(|link| parse_link_header(link, self.scheme, &api_host));

            let tags_response: TagsResponse = response
                .json()
                .await
                .context("Failed to parse tags response")?;

            all_tags.extend(tags_response.tags.unwrap_or_default());

            match next_url {
                Some(next) => url = next,
                None => break,
            }
        }

        trace!("Found {} tags total", all_tags.len());
        Ok(all_tags)
    }
}

/// Parse Link header for pagination
/// Format: `</v2/repo/tags/list?n=100&last=tag>; rel="next"`
fn parse_link_header(link: &str, scheme: &str, host: &str) -> Option<String> {
    link.split(',')
        .map(str::trim)
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')?;
            let end = part.find('>')?;
            let url = part.get(start + 1..end)?;
            if url.starts_with('/') {
                Some(format!("{}://{}{}", scheme, host, url))
            } else {
                Some(url.to_string())
            }
        })
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// Registries send `null` for a repository without tags
    #[serde(default)]
    tags: Option<Vec<String>>,
}
