//! Static file serving module
//!
//! The origin behind the front door: serves the built front end from a
//! directory, with index files, content types and `ETag` revalidation.

use std::io;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, cache::CachePolicy, mime};
use crate::routing::Origin;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("not found")]
    NotFound,

    #[error("path escapes site root: {0}")]
    Traversal(String),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SiteError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// A loaded file
#[derive(Debug)]
pub struct StaticFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Directory-backed origin
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
    index_files: Vec<String>,
}

impl StaticSite {
    pub fn new(root: impl Into<PathBuf>, index_files: Vec<String>) -> Self {
        Self {
            root: root.into(),
            index_files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the file a URL path refers to
    pub async fn load(&self, path: &str) -> Result<StaticFile, SiteError> {
        let file_path = self.resolve(path).await?;
        let content = fs::read(&file_path)
            .await
            .map_err(|e| SiteError::from_io(&file_path, e))?;

        Ok(StaticFile {
            content,
            content_type: mime::content_type_for(&file_path),
        })
    }

    /// Map a URL path to a file inside the root
    async fn resolve(&self, path: &str) -> Result<PathBuf, SiteError> {
        let relative = path.trim_start_matches('/');
        let mut file_path = self.root.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            file_path.push(decode_segment(path, segment)?);
        }

        let is_dir = fs::metadata(&file_path)
            .await
            .is_ok_and(|m| m.is_dir());
        if is_dir || relative.is_empty() || relative.ends_with('/') {
            file_path = self.find_index(&file_path).await?;
        }

        let root = fs::canonicalize(&self.root).await.map_err(|e| {
            tracing::warn!(
                "Static directory not found or inaccessible '{}': {e}",
                self.root.display()
            );
            SiteError::from_io(&self.root, e)
        })?;
        let canonical = fs::canonicalize(&file_path)
            .await
            .map_err(|e| SiteError::from_io(&file_path, e))?;
        if !canonical.starts_with(&root) {
            return Err(SiteError::Traversal(path.to_string()));
        }

        let metadata = fs::metadata(&canonical)
            .await
            .map_err(|e| SiteError::from_io(&canonical, e))?;
        if !metadata.is_file() {
            return Err(SiteError::NotFound);
        }

        Ok(canonical)
    }

    async fn find_index(&self, dir: &Path) -> Result<PathBuf, SiteError> {
        for index_file in &self.index_files {
            let candidate = dir.join(index_file);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                return Ok(candidate);
            }
        }
        Err(SiteError::NotFound)
    }
}

/// Percent-decode one path segment
///
/// Decoding must not introduce a separator, a parent reference or a NUL.
fn decode_segment(path: &str, segment: &str) -> Result<String, SiteError> {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| SiteError::NotFound)?;
    if decoded == ".." || decoded.contains(['/', '\\']) {
        return Err(SiteError::Traversal(path.to_string()));
    }
    if decoded.contains('\0') {
        return Err(SiteError::NotFound);
    }
    Ok(decoded.into_owned())
}

impl Origin for StaticSite {
    async fn fetch(&self, ctx: &RequestContext<'_>, path: &str) -> Response<Full<Bytes>> {
        match self.load(path).await {
            Ok(file) => build_static_file_response(file, ctx.if_none_match.as_deref(), ctx.is_head),
            Err(SiteError::NotFound) => http::build_404_response(),
            Err(SiteError::Traversal(p)) => {
                tracing::warn!("Path traversal attempt blocked: {p}");
                http::build_404_response()
            }
            Err(e @ SiteError::Io { .. }) => {
                tracing::error!("{e}");
                http::build_500_response()
            }
        }
    }
}

/// Build static file response with `ETag` revalidation
fn build_static_file_response(
    file: StaticFile,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.content);
    let policy = CachePolicy::for_content_type(file.content_type);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    http::build_cached_response(
        Bytes::from(file.content),
        file.content_type,
        &etag,
        policy,
        is_head,
    )
}
