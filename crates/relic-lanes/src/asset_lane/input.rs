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

//! The raw payloads importers consume.

use std::{
    borrow::Cow,
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// What an importer reads from: a file on disk or a buffer already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImporterInput {
    /// A file to read.
    File {
        /// Path of the file.
        file_path: PathBuf,
    },
    /// Bytes already loaded.
    Memory {
        /// The encoded (or raw) data.
        memory_data: Vec<u8>,
        /// A format name such as `"png"`, `"glb"` or `"ARGB8888"`.
        format_hint: Option<String>,
    },
}

impl ImporterInput {
    /// Builds a file input.
    pub fn file(file_path: impl Into<PathBuf>) -> Self {
        Self::File {
            file_path: file_path.into(),
        }
    }

    /// Builds a memory input.
    pub fn memory(memory_data: impl Into<Vec<u8>>, format_hint: Option<&str>) -> Self {
        Self::Memory {
            memory_data: memory_data.into(),
            format_hint: format_hint.map(str::to_owned),
        }
    }

    /// The file path, for file inputs.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File { file_path } => Some(file_path),
            Self::Memory { .. } => None,
        }
    }

    /// The format hint, for memory inputs.
    pub fn format_hint(&self) -> Option<&str> {
        match self {
            Self::File { .. } => None,
            Self::Memory { format_hint, .. } => format_hint.as_deref(),
        }
    }

    /// The lower-cased file extension, or the lower-cased format hint.
    pub fn extension(&self) -> Option<String> {
        match self {
            Self::File { file_path } => file_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase),
            Self::Memory { format_hint, .. } => {
                format_hint.as_deref().map(|hint| hint.trim_start_matches('.').to_ascii_lowercase())
            }
        }
    }

    /// Returns the input bytes, reading the file if needed.
    pub fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            Self::File { file_path } => fs::read(file_path).map(Cow::Owned),
            Self::Memory { memory_data, .. } => Ok(Cow::Borrowed(memory_data)),
        }
    }

    /// Reads at most `len` bytes from the start of the input.
    ///
    /// Used by probes that only need a file signature.
    pub fn read_header(&self, len: usize) -> io::Result<Cow<'_, [u8]>> {
        match self {
            Self::File { file_path } => {
                use io::Read;
                let mut header = Vec::with_capacity(len);
                fs::File::open(file_path)?
                    .take(len as u64)
                    .read_to_end(&mut header)?;
                Ok(Cow::Owned(header))
            }
            Self::Memory { memory_data, .. } => {
                Ok(Cow::Borrowed(&memory_data[..len.min(memory_data.len())]))
            }
        }
    }
}

impl fmt::Display for ImporterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { file_path } => write!(f, "file '{}'", file_path.display()),
            Self::Memory {
                memory_data,
                format_hint,
            } => write!(
                f,
                "{} bytes in memory ({})",
                memory_data.len(),
                format_hint.as_deref().unwrap_or("no format hint")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extension() {
        assert_eq!(
            ImporterInput::file("assets/Logo.PNG").extension().as_deref(),
            Some("png")
        );
        assert_eq!(ImporterInput::file("no_extension").extension(), None);
        assert_eq!(
            ImporterInput::memory(vec![], Some(".GLB")).extension().as_deref(),
            Some("glb")
        );
        assert_eq!(ImporterInput::memory(vec![], None).extension(), None);
    }

    #[test]
    fn test_read_bytes_and_header() -> io::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"0123456789")?;
        let input = ImporterInput::file(file.path());

        assert_eq!(&*input.read_bytes()?, b"0123456789");
        assert_eq!(&*input.read_header(4)?, b"0123");

        let memory = ImporterInput::memory(b"abc".to_vec(), None);
        assert_eq!(&*memory.read_header(16)?, b"abc");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let input = ImporterInput::file("/definitely/not/here.png");
        assert!(input.read_bytes().is_err());
    }

    #[test]
    fn test_display() {
        let input = ImporterInput::memory(vec![0; 3], Some("png"));
        assert_eq!(input.to_string(), "3 bytes in memory (png)");
    }
}
