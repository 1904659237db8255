//! Request routing for the metadata layer.
//!
//! Every request must match `/io/github/{owner}/{name}/{version}/{file}`.
//! A request for `{name}-{version}.module` is answered with synthesized
//! metadata when the release has a readable manifest; every other file, and
//! every metadata request whose manifest cannot be fetched, is redirected to
//! the release asset on GitHub.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::{FlixManifest, PackageCoordinate};
use crate::ops::synthesize;
use crate::sources::{GithubLayout, ManifestSource};

/// Path template served by the layer.
pub const ARTIFACT_TEMPLATE: &str = "/io/github/{owner}/{name}/{version}/{file}";

/// A path template with `{placeholder}` segments.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    regex: Regex,
    names: Vec<String>,
}

impl PathTemplate {
    /// Compile a template. Each placeholder matches one non-empty segment.
    pub fn new(template: &str) -> Result<Self> {
        let placeholder = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .with_context(|| "failed to compile placeholder pattern")?;

        let mut pattern = String::from("^");
        let mut names = Vec::new();
        let mut last = 0;
        for caps in placeholder.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            pattern.push_str(&regex::escape(&template[last..whole.start()]));
            pattern.push_str(&format!("(?P<{}>[^/]+)", name.as_str()));
            names.push(name.as_str().to_string());
            last = whole.end();
        }
        pattern.push_str(&regex::escape(&template[last..]));
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .with_context(|| format!("invalid path template: {}", template))?;

        Ok(PathTemplate { regex, names })
    }

    /// Placeholder names in order of appearance.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Match a path, returning the placeholder values.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        self.names
            .iter()
            .map(|name| caps.name(name).map(|m| (name.clone(), m.as_str().to_string())))
            .collect()
    }
}

/// A request that matched the artifact template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub coordinate: PackageCoordinate,
    pub file: String,
}

impl ArtifactRequest {
    /// Whether the requested file is the release's module metadata.
    pub fn is_metadata(&self) -> bool {
        self.file == self.coordinate.metadata_file_name()
    }
}

/// An HTTP answer, independent of the listener implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub location: Option<String>,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Reply {
    fn status(status: u16) -> Self {
        Reply {
            status,
            location: None,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn json(body: String) -> Self {
        Reply {
            content_type: Some("application/json"),
            body,
            ..Self::status(200)
        }
    }

    pub fn redirect(location: String) -> Self {
        Reply {
            location: Some(location),
            ..Self::status(302)
        }
    }

    pub fn not_found() -> Self {
        Self::status(404)
    }

    pub fn method_not_allowed() -> Self {
        Self::status(405)
    }

    pub fn server_error(message: String) -> Self {
        Reply {
            content_type: Some("text/plain; charset=utf-8"),
            body: message,
            ..Self::status(500)
        }
    }
}

/// Routes requests to metadata synthesis or release redirects.
pub struct Router {
    template: PathTemplate,
    layout: GithubLayout,
    source: Arc<dyn ManifestSource>,
}

impl Router {
    /// Create a router that reads manifests from `source` and redirects into
    /// `layout`.
    pub fn new(layout: GithubLayout, source: Arc<dyn ManifestSource>) -> Result<Self> {
        Ok(Router {
            template: PathTemplate::new(ARTIFACT_TEMPLATE)?,
            layout,
            source,
        })
    }

    /// Match a request path (query string ignored).
    pub fn route(&self, path: &str) -> Option<ArtifactRequest> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut params = self.template.matches(path)?;

        let mut take = |key: &str| params.remove(key).unwrap_or_default();
        let owner = take("owner");
        let name = take("name");
        let version = take("version");
        let file = take("file");

        Some(ArtifactRequest {
            coordinate: PackageCoordinate::new(owner, name, version),
            file,
        })
    }

    /// Answer one request.
    pub fn handle(&self, method: &str, path: &str) -> Reply {
        let reply = self.dispatch(method, path);
        tracing::debug!("{} {} -> {}", method, path, reply.status);
        reply
    }

    fn dispatch(&self, method: &str, path: &str) -> Reply {
        let Some(request) = self.route(path) else {
            return Reply::not_found();
        };

        let is_head = match method {
            "GET" => false,
            "HEAD" => true,
            _ => return Reply::method_not_allowed(),
        };

        if request.is_metadata() {
            let answered = if is_head {
                self.head_metadata(&request.coordinate)
            } else {
                self.get_metadata(&request.coordinate)
            };
            if let Some(reply) = answered {
                return reply;
            }
        }

        Reply::redirect(self.asset_url(&request))
    }

    /// Redirect target for a release file.
    pub fn asset_url(&self, request: &ArtifactRequest) -> String {
        let coord = &request.coordinate;
        self.layout
            .release_asset(coord.owner(), coord.name(), coord.version(), &request.file)
    }

    /// `None` means "not a metadata file after all": fall through to redirect.
    fn head_metadata(&self, coord: &PackageCoordinate) -> Option<Reply> {
        match self.source.exists(coord) {
            Ok(true) => Some(Reply::ok()),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(
                    "failed to check manifest for {} on {}: {:#}",
                    coord,
                    self.source.name(),
                    e
                );
                None
            }
        }
    }

    fn get_metadata(&self, coord: &PackageCoordinate) -> Option<Reply> {
        let manifest = match self
            .source
            .fetch(coord)
            .and_then(|text| FlixManifest::parse(&text))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(
                    "no usable manifest for {} on {}: {:#}",
                    coord,
                    self.source.name(),
                    e
                );
                return None;
            }
        };

        let reply = match synthesize::synthesize(coord, &manifest, &self.layout) {
            Ok(doc) => match doc.to_json_pretty() {
                Ok(body) => Reply::json(body),
                Err(e) => {
                    tracing::error!("failed to serialize metadata for {}: {}", coord, e);
                    Reply::server_error(format!("failed to serialize metadata: {}", e))
                }
            },
            Err(e) => {
                tracing::error!("failed to synthesize metadata for {}: {}", coord, e);
                Reply::server_error(e.to_string())
            }
        };
        Some(reply)
    }
}
