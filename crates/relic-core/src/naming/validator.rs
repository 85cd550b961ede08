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

//! Validation rules applied to asset and pack names.

/// A set of rules deciding whether a string is an acceptable name.
///
/// Validators are stateless: they are only ever used as a type parameter of
/// [`ValidatedName`](super::ValidatedName), which calls [`NameValidator::validate`]
/// on construction and on every reassignment.
pub trait NameValidator {
    /// Returns `None` if `name` is valid, or a human readable reason otherwise.
    fn validate(name: &str) -> Option<&'static str>;
}

/// Names that are reserved device names on Windows and therefore can never be
/// used as a file name, whatever the extension.
pub const FORBIDDEN_KEYWORDS: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Maximum length, in bytes, of a validated name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Validates names so they are usable as file names on every supported OS.
///
/// A valid name:
/// - is not empty,
/// - is at most [`MAX_NAME_LENGTH`] characters long,
/// - only contains `0-9`, `a-z`, `A-Z`, `.`, `_` and `-`,
/// - is not one of the [`FORBIDDEN_KEYWORDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilenameValidator;

impl NameValidator for FilenameValidator {
    fn validate(name: &str) -> Option<&'static str> {
        if name.is_empty() {
            return Some("Cannot be empty.");
        }
        if name.len() > MAX_NAME_LENGTH {
            return Some("Cannot exceed 255 characters.");
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        {
            return Some("Allowed characters are 0-9, a-z, A-Z, '.', '_', and '-'.");
        }
        if FORBIDDEN_KEYWORDS.contains(&name) {
            return Some("Cannot be a reserved keyword.");
        }
        None
    }
}

/// Rules for asset pack names. Packs follow the file name rules so that a
/// pack can always be mirrored as a directory on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackNameValidator;

impl NameValidator for PackNameValidator {
    fn validate(name: &str) -> Option<&'static str> {
        FilenameValidator::validate(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_regular_names() {
        assert_eq!(FilenameValidator::validate("Hero"), None);
        assert_eq!(FilenameValidator::validate("hero_01.v2-final"), None);
        assert_eq!(FilenameValidator::validate(&"a".repeat(255)), None);
    }

    #[test]
    fn test_rejects_empty_and_too_long() {
        assert_eq!(
            FilenameValidator::validate(""),
            Some("Cannot be empty.")
        );
        assert_eq!(
            FilenameValidator::validate(&"a".repeat(256)),
            Some("Cannot exceed 255 characters.")
        );
    }

    #[test]
    fn test_rejects_illegal_characters() {
        for name in ["with space", "slash/name", "at@sign", "pack::name", "é"] {
            assert!(
                FilenameValidator::validate(name).is_some(),
                "'{name}' should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_reserved_keywords() {
        for keyword in FORBIDDEN_KEYWORDS {
            assert_eq!(
                FilenameValidator::validate(keyword),
                Some("Cannot be a reserved keyword.")
            );
        }
        // Keyword matching is case sensitive.
        assert_eq!(FilenameValidator::validate("con"), None);
    }
}
