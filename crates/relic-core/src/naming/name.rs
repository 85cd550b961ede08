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

use super::validator::{FilenameValidator, NameValidator, PackNameValidator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::Deref,
    str::FromStr,
};
use thiserror::Error;

/// Error returned when a name fails the rules of its validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid name '{name}': {reason}")]
pub struct InvalidName {
    /// The rejected name.
    pub name: String,
    /// Why the validator rejected it.
    pub reason: &'static str,
}

/// A string that is guaranteed to satisfy the rules of `V`.
///
/// The value is checked on construction and on every call to
/// [`ValidatedName::set`]. A failed reassignment leaves the previous value
/// untouched, so a `ValidatedName` can never hold an invalid string.
pub struct ValidatedName<V: NameValidator> {
    value: String,
    _validator: PhantomData<fn() -> V>,
}

/// The name part of an [`AssetLocation`](super::AssetLocation).
pub type AssetName = ValidatedName<FilenameValidator>;

/// The optional pack part of an [`AssetLocation`](super::AssetLocation).
pub type AssetPackName = ValidatedName<PackNameValidator>;

impl<V: NameValidator> ValidatedName<V> {
    /// Validates `name` and wraps it.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidName> {
        let value = name.into();
        Self::check(&value)?;
        Ok(Self {
            value,
            _validator: PhantomData,
        })
    }

    /// Wraps a compile-time constant that is known to be valid.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(V::validate(name).is_none(), "'{name}' is not a valid name");
        Self {
            value: name.to_owned(),
            _validator: PhantomData,
        }
    }

    /// Runs the validator without constructing anything.
    pub fn validate(name: &str) -> Option<&'static str> {
        V::validate(name)
    }

    /// Replaces the value, re-running validation first.
    ///
    /// On error the previous value is kept.
    pub fn set(&mut self, name: impl Into<String>) -> Result<(), InvalidName> {
        let value = name.into();
        Self::check(&value)?;
        self.value = value;
        Ok(())
    }

    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Unwraps into the underlying string.
    pub fn into_string(self) -> String {
        self.value
    }

    fn check(value: &str) -> Result<(), InvalidName> {
        match V::validate(value) {
            Some(reason) => Err(InvalidName {
                name: value.to_owned(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

// Manual impls: deriving would put bounds on `V`, which is only a marker.

impl<V: NameValidator> Clone for ValidatedName<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _validator: PhantomData,
        }
    }
}

impl<V: NameValidator> fmt::Debug for ValidatedName<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedName").field(&self.value).finish()
    }
}

impl<V: NameValidator> fmt::Display for ValidatedName<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<V: NameValidator> PartialEq for ValidatedName<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: NameValidator> Eq for ValidatedName<V> {}

impl<V: NameValidator> Hash for ValidatedName<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<V: NameValidator> PartialEq<str> for ValidatedName<V> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<V: NameValidator> PartialEq<&str> for ValidatedName<V> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl<V: NameValidator> Deref for ValidatedName<V> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V: NameValidator> AsRef<str> for ValidatedName<V> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<V: NameValidator> Borrow<str> for ValidatedName<V> {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl<V: NameValidator> FromStr for ValidatedName<V> {
    type Err = InvalidName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<V: NameValidator> TryFrom<&str> for ValidatedName<V> {
    type Error = InvalidName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<V: NameValidator> TryFrom<String> for ValidatedName<V> {
    type Error = InvalidName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<V: NameValidator> Serialize for ValidatedName<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, V: NameValidator> Deserialize<'de> for ValidatedName<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_name() {
        let name = AssetName::new("Hero").unwrap();
        assert_eq!(name.as_str(), "Hero");
        assert_eq!(name, "Hero");
        assert_eq!(name.to_string(), "Hero");
    }

    #[test]
    fn test_new_invalid_name_reports_reason() {
        let err = AssetName::new("bad name").unwrap_err();
        assert_eq!(err.name, "bad name");
        assert_eq!(
            err.to_string(),
            "Invalid name 'bad name': Allowed characters are 0-9, a-z, A-Z, '.', '_', and '-'."
        );
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let mut name = AssetName::new("Hero").unwrap();
        assert!(name.set("COM1").is_err());
        assert_eq!(name, "Hero");

        name.set("Villain").unwrap();
        assert_eq!(name, "Villain");
    }

    #[test]
    fn test_pack_name_uses_filename_rules() {
        assert!(AssetPackName::new("myPack").is_ok());
        assert!(AssetPackName::new("").is_err());
        assert!(AssetPackName::new("my pack").is_err());
    }

    #[test]
    fn test_serde_rejects_invalid_names() {
        let name: AssetName = serde_json::from_str("\"Hero\"").unwrap();
        assert_eq!(name, "Hero");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Hero\"");

        let bad: Result<AssetName, _> = serde_json::from_str("\"NUL\"");
        assert!(bad.is_err());
    }
}
