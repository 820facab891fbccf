//! Declarative link manifests.
//!
//! A manifest is a JSON document listing links to create:
//!
//! ```json
//! {
//!   "links": [
//!     {
//!       "target": "~/dotfiles/vimrc",
//!       "link": "~/.vimrc",
//!       "platforms": ["linux", "darwin"],
//!       "platform_overrides": { "windows": { "link": "~/_vimrc" } }
//!     }
//!   ]
//! }
//! ```
//!
//! Loading validates every entry; past [`Manifest::from_json`] the platform
//! targeting is typed and cannot be inconsistent.
mod apply;
mod generate;
mod routing;
mod validation;

pub use apply::{ApplyReport, apply};
pub use generate::{SCHEMA_URL, example, generate};

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::platform::Os;

/// Platform identifier meaning "every supported platform".
pub const ALL_PLATFORMS: &str = "all";

/// Which platforms an entry's default link applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platforms {
    /// Every supported platform.
    All,
    /// Only the listed platforms; never empty.
    Only(BTreeSet<Os>),
}

impl Platforms {
    /// Whether `os` is targeted.
    #[must_use]
    pub fn includes(&self, os: Os) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&os),
        }
    }
}

/// One validated manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Raw path of the real file or directory.
    pub target: String,
    /// Raw default link path.
    pub link: String,
    /// Platforms the default link applies to.
    pub platforms: Platforms,
    /// Resolve this entry's paths in relative mode.
    pub relative: bool,
    /// Per-platform link paths that replace the default.
    pub overrides: BTreeMap<Os, String>,
}

/// A validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Entries in file order.
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Read and validate the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] if the file cannot be read, otherwise
    /// see [`Manifest::from_json`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate manifest JSON.
    ///
    /// Unknown keys, `$schema` included, are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for malformed JSON and
    /// [`ManifestError::Invalid`] for the first entry that breaks a rule.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = serde_json::from_str(text)?;
        let entries = raw
            .links
            .into_iter()
            .enumerate()
            .map(|(index, entry)| validation::validate(index, entry))
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }

    /// Pretty-printed JSON, with a `$schema` key when `schema` is given.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot happen for these types in
    /// practice.
    pub fn to_json(&self, schema: Option<&str>) -> Result<String, serde_json::Error> {
        let raw = RawManifest {
            schema: schema.map(String::from),
            links: self.entries.iter().map(RawEntry::from).collect(),
        };
        serde_json::to_string_pretty(&raw)
    }
}

/// Manifest as written on disk, before validation.
#[derive(Debug, Default, Deserialize, Serialize)]
struct RawManifest {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    #[serde(default)]
    links: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawEntry {
    #[serde(default)]
    target: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    platforms: Vec<String>,
    #[serde(default)]
    relative: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    platform_overrides: BTreeMap<String, RawOverride>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawOverride {
    #[serde(default)]
    link: String,
}

impl From<&ManifestEntry> for RawEntry {
    fn from(entry: &ManifestEntry) -> Self {
        let platforms = match &entry.platforms {
            Platforms::All => vec![ALL_PLATFORMS.to_string()],
            Platforms::Only(set) => set.iter().map(|os| os.as_str().to_string()).collect(),
        };
        Self {
            target: entry.target.clone(),
            link: entry.link.clone(),
            platforms,
            relative: entry.relative,
            platform_overrides: entry
                .overrides
                .iter()
                .map(|(os, link)| (os.as_str().to_string(), RawOverride { link: link.clone() }))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn minimal_entry_gets_defaults() {
        let m = Manifest::from_json(r#"{"links":[{"target":"a","link":"b"}]}"#).unwrap();
        assert_eq!(
            m.entries,
            vec![ManifestEntry {
                target: "a".into(),
                link: "b".into(),
                platforms: Platforms::All,
                relative: false,
                overrides: BTreeMap::new(),
            }]
        );
    }

    #[test]
    fn empty_platform_list_means_all() {
        let m =
            Manifest::from_json(r#"{"links":[{"target":"a","link":"b","platforms":[]}]}"#).unwrap();
        assert_eq!(m.entries[0].platforms, Platforms::All);
    }

    #[test]
    fn full_entry() {
        let m = Manifest::from_json(
            r#"{
              "$schema": "whatever",
              "links": [{
                "target": "t",
                "link": "l",
                "platforms": ["Linux", "darwin"],
                "relative": true,
                "platform_overrides": {"WINDOWS": {"link": "w"}},
                "comment": "ignored"
              }]
            }"#,
        )
        .unwrap();
        let entry = &m.entries[0];
        assert_eq!(
            entry.platforms,
            Platforms::Only(BTreeSet::from([Os::Linux, Os::Darwin]))
        );
        assert!(entry.relative);
        assert_eq!(entry.overrides.get(&Os::Windows).map(String::as_str), Some("w"));
    }

    #[test]
    fn no_links_is_empty() {
        assert!(Manifest::from_json("{}").unwrap().entries.is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Manifest::from_json("{\"links\": [").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
        assert!(err.to_string().starts_with("could not parse manifest: "));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let err = Manifest::from_json(r#"{"links": {"target": "a"}}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn to_json_is_loadable() {
        let m = Manifest::from_json(
            r#"{"links":[{"target":"t","link":"l","platforms":["windows","linux"],
                "platform_overrides":{"darwin":{"link":"d"}}}]}"#,
        )
        .unwrap();
        let json = m.to_json(None).unwrap();
        assert!(!json.contains("$schema"));
        assert_eq!(Manifest::from_json(&json).unwrap(), m);
    }
}
