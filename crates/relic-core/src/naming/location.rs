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

//! The `pack::name@path` addressing scheme used for every asset.

use super::name::{AssetName, AssetPackName, InvalidName};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Separator between the pack name and the rest of a full location.
pub const PACK_SEPARATOR: &str = "::";

/// Separator between the asset name and its folder path.
pub const PATH_SEPARATOR: char = '@';

/// Name given to locations that were never explicitly assigned.
pub const DEFAULT_LOCATION_NAME: &str = "default";

/// Error returned when a full location string cannot be turned into an
/// [`AssetLocation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid asset location '{location}': {source}")]
pub struct InvalidAssetLocation {
    /// The full location string that was rejected.
    pub location: String,
    /// The name validation failure behind the rejection.
    #[source]
    pub source: InvalidName,
}

/// The structured address of an asset: `[packName::]name[@path]`.
///
/// - `name` and `pack_name` follow the file name rules of
///   [`FilenameValidator`](super::FilenameValidator).
/// - `path` is a `/` separated folder path. It is not validated, only
///   normalized (see [`normalize_path`]), and may be empty.
///
/// # Examples
///
/// ```
/// use relic_core::naming::AssetLocation;
///
/// let location: AssetLocation = "myPack::Hero@characters/npc".parse().unwrap();
/// assert_eq!(location.name(), "Hero");
/// assert_eq!(location.path(), "characters/npc");
/// assert_eq!(location.pack_name().map(|p| p.as_str()), Some("myPack"));
/// assert_eq!(location.full_location(), "myPack::Hero@characters/npc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetLocation {
    name: AssetName,
    path: String,
    pack_name: Option<AssetPackName>,
}

impl AssetLocation {
    /// Builds a location from already validated parts. `path` is normalized.
    pub fn new(name: AssetName, path: &str, pack_name: Option<AssetPackName>) -> Self {
        Self {
            name,
            path: normalize_path(path),
            pack_name,
        }
    }

    /// Parses a full location string.
    ///
    /// # Errors
    /// Returns [`InvalidAssetLocation`] if the extracted name, or a non-empty
    /// pack name, breaks the naming rules.
    pub fn parse(full_location: &str) -> Result<Self, InvalidAssetLocation> {
        let (pack_name, name, path) = split_full_location(full_location);
        let invalid = |source| InvalidAssetLocation {
            location: full_location.to_owned(),
            source,
        };

        let name = AssetName::new(name).map_err(invalid)?;
        let pack_name = match pack_name {
            Some(pack) if !pack.is_empty() => Some(AssetPackName::new(pack).map_err(invalid)?),
            _ => None,
        };

        Ok(Self::new(name, path, pack_name))
    }

    /// Replaces every part of this location by the ones parsed from `full_location`.
    ///
    /// On error the location is left unchanged.
    pub fn set_location(&mut self, full_location: &str) -> Result<&mut Self, InvalidAssetLocation> {
        *self = Self::parse(full_location)?;
        Ok(self)
    }

    /// The asset name.
    pub fn name(&self) -> &AssetName {
        &self.name
    }

    /// The normalized folder path, `""` for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The pack containing the asset, if any.
    pub fn pack_name(&self) -> Option<&AssetPackName> {
        self.pack_name.as_ref()
    }

    /// Renames the asset. Only the name is re-validated.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self, InvalidName> {
        self.name.set(name)?;
        Ok(self)
    }

    /// Replaces the name with an already validated one.
    pub fn with_name(mut self, name: AssetName) -> Self {
        self.name = name;
        self
    }

    /// Moves the asset to another folder.
    pub fn set_path(&mut self, path: &str) -> &mut Self {
        self.path = normalize_path(path);
        self
    }

    /// Moves the asset into `pack_name`. Only the pack name is validated.
    pub fn set_pack_name(&mut self, pack_name: impl Into<String>) -> Result<&mut Self, InvalidName> {
        self.pack_name = Some(AssetPackName::new(pack_name)?);
        Ok(self)
    }

    /// Removes the asset from its pack.
    pub fn clear_pack_name(&mut self) -> &mut Self {
        self.pack_name = None;
        self
    }

    /// Formats the location back into its `[packName::]name[@path]` form.
    pub fn full_location(&self) -> String {
        let mut full = String::new();
        if let Some(pack) = &self.pack_name {
            full.push_str(pack);
            full.push_str(PACK_SEPARATOR);
        }
        full.push_str(&self.name);
        if !self.path.is_empty() {
            full.push(PATH_SEPARATOR);
            full.push_str(&self.path);
        }
        full
    }

    /// Returns `true` if the asset lives in `folder` or any of its sub-folders.
    ///
    /// The root folder (`""`) contains every location.
    pub fn is_in_folder(&self, folder: &str) -> bool {
        let folder = normalize_path(folder);
        folder.is_empty()
            || self.path == folder
            || self
                .path
                .strip_prefix(folder.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Returns `true` for the placeholder location carried by freshly created assets.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for AssetLocation {
    fn default() -> Self {
        Self {
            name: AssetName::from_static(DEFAULT_LOCATION_NAME),
            path: String::new(),
            pack_name: None,
        }
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_location())
    }
}

impl FromStr for AssetLocation {
    type Err = InvalidAssetLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AssetLocation {
    type Error = InvalidAssetLocation;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl PartialEq<str> for AssetLocation {
    /// Parses `other` and compares structurally. Unparsable strings are never equal.
    fn eq(&self, other: &str) -> bool {
        Self::parse(other).is_ok_and(|other| *self == other)
    }
}

impl PartialEq<&str> for AssetLocation {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for AssetLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full_location())
    }
}

impl<'de> Deserialize<'de> for AssetLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let full = String::deserialize(deserializer)?;
        Self::parse(&full).map_err(serde::de::Error::custom)
    }
}

/// Splits a full location into its raw `(pack, name, path)` parts without
/// validating anything.
///
/// The path starts after the first `@`. The pack is whatever precedes `::` in
/// the part before the path, so paths may themselves contain `::`.
pub fn split_full_location(full_location: &str) -> (Option<&str>, &str, &str) {
    let (head, path) = full_location
        .split_once(PATH_SEPARATOR)
        .unwrap_or((full_location, ""));
    match head.split_once(PACK_SEPARATOR) {
        Some((pack, name)) => (Some(pack), name, path),
        None => (None, head, path),
    }
}

/// Normalizes a folder path.
///
/// `.` segments and empty segments are dropped, `..` removes the previous
/// segment (and is ignored at the root), and the result never has a leading
/// or trailing `/`. Empty and root paths normalize to `""`.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_pack_and_path() {
        let location = AssetLocation::parse("myPack::Hero@characters/npc").unwrap();
        assert_eq!(location.name(), "Hero");
        assert_eq!(location.path(), "characters/npc");
        assert_eq!(location.pack_name().unwrap(), "myPack");
    }

    #[test]
    fn test_parse_without_pack() {
        let location = AssetLocation::parse("Hero@characters/npc").unwrap();
        assert_eq!(location.name(), "Hero");
        assert_eq!(location.path(), "characters/npc");
        assert!(location.pack_name().is_none());
    }

    #[test]
    fn test_parse_without_path() {
        let location = AssetLocation::parse("myPack::Hero").unwrap();
        assert_eq!(location.name(), "Hero");
        assert_eq!(location.path(), "");
        assert_eq!(location.pack_name().unwrap(), "myPack");

        let bare = AssetLocation::parse("Hero").unwrap();
        assert_eq!(bare.full_location(), "Hero");
    }

    #[test]
    fn test_parse_empty_pack_is_no_pack() {
        let location = AssetLocation::parse("::Hero").unwrap();
        assert!(location.pack_name().is_none());
        assert_eq!(location.full_location(), "Hero");
    }

    #[test]
    fn test_parse_rejects_invalid_name() {
        assert!(AssetLocation::parse("").is_err());
        assert!(AssetLocation::parse("@some/path").is_err());
        assert!(AssetLocation::parse("bad name@path").is_err());

        let err = AssetLocation::parse("pack::CON@p").unwrap_err();
        assert_eq!(err.location, "pack::CON@p");
        assert_eq!(err.source.reason, "Cannot be a reserved keyword.");
    }

    #[test]
    fn test_parse_rejects_invalid_pack() {
        assert!(AssetLocation::parse("my pack::Hero").is_err());
    }

    #[test]
    fn test_path_is_normalized_not_validated() {
        let location = AssetLocation::parse("Hero@/characters//npc/./old/../").unwrap();
        assert_eq!(location.path(), "characters/npc");

        let weird = AssetLocation::parse("Hero@folder with spaces/é").unwrap();
        assert_eq!(weird.path(), "folder with spaces/é");

        let root = AssetLocation::parse("Hero@/").unwrap();
        assert_eq!(root.path(), "");
        assert_eq!(root.full_location(), "Hero");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("a/b/c"), "a/b/c");
        assert_eq!(normalize_path("//a///b//"), "a/b");
        assert_eq!(normalize_path("./a/./b"), "a/b");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
        assert_eq!(normalize_path("../../a"), "a");
    }

    #[test]
    fn test_setters_chain_and_revalidate_only_their_field() {
        let mut location = AssetLocation::parse("Hero@a").unwrap();
        location
            .set_name("Villain")
            .unwrap()
            .set_path("/b/c/")
            .set_pack_name("pack")
            .unwrap();
        assert_eq!(location.full_location(), "pack::Villain@b/c");

        assert!(location.set_name("in valid").is_err());
        assert_eq!(location.name(), "Villain");

        assert!(location.set_pack_name("").is_err());
        assert_eq!(location.pack_name().unwrap(), "pack");

        location.clear_pack_name();
        assert_eq!(location.full_location(), "Villain@b/c");
    }

    #[test]
    fn test_set_location_keeps_previous_value_on_error() {
        let mut location = AssetLocation::parse("Hero@a").unwrap();
        assert!(location.set_location("bad name").is_err());
        assert_eq!(location.full_location(), "Hero@a");

        location.set_location("p::Other@x/y").unwrap();
        assert_eq!(location.full_location(), "p::Other@x/y");
    }

    #[test]
    fn test_equality() {
        let a = AssetLocation::parse("p::Hero@a/b").unwrap();
        let b = AssetLocation::parse("p::Hero@/a/b/").unwrap();
        let c = AssetLocation::parse("Hero@a/b").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        assert!(a == "p::Hero@a//b");
        assert!(a != "Hero@a/b");
        assert!(a != "not valid");
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "myPack::Hero@characters/npc",
            "Hero@characters/npc",
            "myPack::Hero",
            "Hero",
            "a.b-c_d@x::y/z@w",
        ];
        for sample in samples {
            let location = AssetLocation::parse(sample).unwrap();
            let reparsed = AssetLocation::parse(&location.full_location()).unwrap();
            assert_eq!(location, reparsed, "round trip failed for '{sample}'");
        }
    }

    #[test]
    fn test_split_full_location() {
        assert_eq!(
            split_full_location("pack::name@some/path"),
            (Some("pack"), "name", "some/path")
        );
        assert_eq!(split_full_location("name"), (None, "name", ""));
        assert_eq!(split_full_location("name@p::q"), (None, "name", "p::q"));
    }

    #[test]
    fn test_pack_separator_after_path_belongs_to_path() {
        let location = AssetLocation::parse("a@b::c").unwrap();
        assert_eq!(location.name(), "a");
        assert_eq!(location.path(), "b::c");
        assert!(location.pack_name().is_none());
        assert_eq!(location.full_location(), "a@b::c");
    }

    #[test]
    fn test_is_in_folder() {
        let location = AssetLocation::parse("Hero@characters/npc").unwrap();
        assert!(location.is_in_folder(""));
        assert!(location.is_in_folder("characters"));
        assert!(location.is_in_folder("characters/npc/"));
        assert!(!location.is_in_folder("char"));
        assert!(!location.is_in_folder("characters/npc/deep"));
    }

    #[test]
    fn test_default_location() {
        let location = AssetLocation::default();
        assert_eq!(location.full_location(), "default");
        assert!(location.is_default());
        assert!(!AssetLocation::parse("default@x").unwrap().is_default());
    }

    #[test]
    fn test_serde_uses_full_location() {
        let location = AssetLocation::parse("p::Hero@a/b").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"p::Hero@a/b\"");
        let back: AssetLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, location);
    }
}
