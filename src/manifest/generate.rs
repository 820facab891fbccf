use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ManifestError;
use crate::platform::Os;

use super::{Manifest, ManifestEntry, Platforms};

/// JSON schema advertised in generated manifests.
pub const SCHEMA_URL: &str = "https://github.com/sneha-afk/trovl/raw/main/docs/trovl_schema.json";

/// A one-entry manifest showing every field.
#[must_use]
pub fn example() -> Manifest {
    Manifest {
        entries: vec![ManifestEntry {
            target: "example_target".to_string(),
            link: "example_symlink".to_string(),
            platforms: Platforms::All,
            relative: false,
            overrides: BTreeMap::from([(Os::Linux, "example_override".to_string())]),
        }],
    }
}

/// Write the [`example`] manifest to `path`, creating parent directories.
///
/// An existing file is replaced.
///
/// # Errors
///
/// Returns [`ManifestError::Write`] if the directory or file cannot be written.
pub fn generate(path: &Path) -> Result<(), ManifestError> {
    let json = example().to_json(Some(SCHEMA_URL))?;
    let write_err = |source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json + "\n").map_err(write_err)
}
