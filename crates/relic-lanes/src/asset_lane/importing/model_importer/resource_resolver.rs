// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resolution of the external resources a glTF document points to.

use base64::Engine;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while fetching a buffer or image referenced by a model.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The resource file could not be read.
    #[error("Failed to read external resource '{}': {source}", .path.display())]
    Io {
        /// The resolved path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The model was read from memory, so relative URIs have no base.
    #[error("External resource '{0}' cannot be resolved for a model read from memory")]
    NoBasePath(String),
    /// The `data:` URI is malformed or not base64 encoded.
    #[error("Unsupported data URI: {0}")]
    InvalidDataUri(String),
    /// The base64 payload of a `data:` URI is corrupt.
    #[error("Invalid base64 payload in data URI: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Fetches the external resources (buffers or images) a glTF document
/// references by URI.
pub trait GltfResourceResolver: Send + Sync {
    /// Resolves an external buffer URI to its binary data.
    fn resolve_buffer(&self, uri: &str) -> Result<Vec<u8>, ResolveError>;

    /// Resolves an external image URI to its binary data.
    fn resolve_image(&self, uri: &str) -> Result<Vec<u8>, ResolveError>;
}

/// Resolves resources from the local filesystem relative to a base path.
pub struct FileSystemResolver {
    base_path: PathBuf,
}

impl FileSystemResolver {
    /// Creates a new `FileSystemResolver` with a specified base path.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn read(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        let path = self.base_path.join(uri);
        std::fs::read(&path).map_err(|source| ResolveError::Io { path, source })
    }
}

impl GltfResourceResolver for FileSystemResolver {
    fn resolve_buffer(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        self.read(uri)
    }

    fn resolve_image(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        self.read(uri)
    }
}

/// Resolver for models read from memory: every external URI is an error.
pub struct EmbeddedOnlyResolver;

impl GltfResourceResolver for EmbeddedOnlyResolver {
    fn resolve_buffer(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        Err(ResolveError::NoBasePath(uri.to_owned()))
    }

    fn resolve_image(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        Err(ResolveError::NoBasePath(uri.to_owned()))
    }
}

/// Decodes a base64 `data:` URI into its bytes and media type.
///
/// The media type is `None` when the URI does not declare one.
pub fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, Option<String>), ResolveError> {
    let invalid = || ResolveError::InvalidDataUri(truncated(uri));
    let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let media_type = header.strip_suffix(";base64").ok_or_else(invalid)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    let media_type = (!media_type.is_empty()).then(|| media_type.to_owned());
    Ok((bytes, media_type))
}

fn truncated(uri: &str) -> String {
    const MAX: usize = 48;
    match uri.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &uri[..end]),
        None => uri.to_owned(),
    }
}
