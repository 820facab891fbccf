use crate::platform::Os;

use super::ManifestEntry;

impl ManifestEntry {
    /// The link path to use on `os`, or `None` if the entry does not apply.
    ///
    /// An override for `os` always wins, even when `os` is not among the
    /// entry's platforms.
    #[must_use]
    pub fn link_for(&self, os: Os) -> Option<&str> {
        if let Some(link) = self.overrides.get(&os) {
            return Some(link);
        }
        self.platforms.includes(os).then_some(self.link.as_str())
    }

    /// `link -> target` label for logs and the summary.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} -> {}", self.link, self.target)
    }
}
