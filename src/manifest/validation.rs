use std::collections::{BTreeMap, BTreeSet};

use crate::error::ManifestError;
use crate::platform::Os;

use super::{ALL_PLATFORMS, ManifestEntry, Platforms, RawEntry};

/// Turn the raw entry at `index` into a [`ManifestEntry`], or explain why not.
///
/// Rules are checked in a fixed order so the reported problem is stable:
/// required fields, `"all"` exclusivity, supported identifiers, duplicates,
/// then overrides.
pub(super) fn validate(index: usize, raw: RawEntry) -> Result<ManifestEntry, ManifestError> {
    if raw.target.is_empty() {
        return Err(ManifestError::invalid(index, "missing target"));
    }
    if raw.link.is_empty() {
        return Err(ManifestError::invalid(index, "missing link"));
    }

    let platforms = platforms(index, &raw.platforms)?;

    let mut overrides = BTreeMap::new();
    for (name, over) in raw.platform_overrides {
        let os: Os = name.parse().map_err(|_| {
            ManifestError::invalid(index, format!("unsupported override platform {name:?}"))
        })?;
        if over.link.is_empty() {
            return Err(ManifestError::invalid(
                index,
                format!("override {name:?} missing link"),
            ));
        }
        if overrides.insert(os, over.link).is_some() {
            return Err(ManifestError::invalid(
                index,
                format!("duplicate override platform {:?}", os.as_str()),
            ));
        }
    }

    Ok(ManifestEntry {
        target: raw.target,
        link: raw.link,
        platforms,
        relative: raw.relative,
        overrides,
    })
}

fn platforms(index: usize, names: &[String]) -> Result<Platforms, ManifestError> {
    if names.is_empty() {
        return Ok(Platforms::All);
    }
    let has_all = names.iter().any(|n| n.eq_ignore_ascii_case(ALL_PLATFORMS));
    if has_all {
        if names.len() > 1 {
            return Err(ManifestError::invalid(
                index,
                "'all' cannot be combined with other platforms",
            ));
        }
        return Ok(Platforms::All);
    }

    let mut set = BTreeSet::new();
    for name in names {
        let os: Os = name
            .parse()
            .map_err(|e| ManifestError::invalid(index, format!("{e}")))?;
        if !set.insert(os) {
            return Err(ManifestError::invalid(
                index,
                format!("duplicate platform {name:?}"),
            ));
        }
    }
    Ok(Platforms::Only(set))
}
