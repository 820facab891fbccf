//! Path resolution: environment variables, `~`, Windows shell syntaxes.
//!
//! Raw paths come from the command line and from manifests, so they may be
//! written for any shell. [`PathResolver::resolve`] turns them into a clean
//! absolute path (or a clean relative one on request):
//!
//! 1. an empty input means the current directory;
//! 2. on Windows, `%VAR%`, `$env:VAR` and `${env:VAR}` become `${VAR}`, and a
//!    few PowerShell automatic variables are asked of PowerShell itself;
//! 3. `${VAR}` and `$VAR` are expanded, undefined variables to nothing;
//! 4. a leading `~` becomes the home directory;
//! 5. the result is cleaned lexically and, unless relative, made absolute.
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PathError;
use crate::exec;
use crate::platform::Os;

/// PowerShell automatic variables that have no environment counterpart.
pub const POWERSHELL_VARIABLES: [&str; 4] = ["PROFILE", "PSHOME", "PSScriptRoot", "PSCommandPath"];

/// Group 1: `%VAR%`, group 2: `${env:VAR}`, group 3: `$env:VAR`.
#[allow(clippy::expect_used)]
static WINDOWS_ENV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)%([A-Z_]\w*)%|\$\{env:([A-Z_]\w*)\}|\$env:([A-Z_]\w*)")
        .expect("literal pattern")
});

/// Resolves raw user paths for one operating system's conventions.
///
/// The environment, home directory and PowerShell lookups are plain function
/// pointers so the Windows rules can be exercised on any host.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    os: Os,
    env: fn(&str) -> Option<String>,
    home: fn() -> Option<PathBuf>,
    powershell: fn(&str) -> Option<String>,
}

impl PathResolver {
    /// Resolver for `os` backed by the process environment.
    #[must_use]
    pub fn new(os: Os) -> Self {
        Self {
            os,
            env: |key| std::env::var(key).ok(),
            home: dirs::home_dir,
            powershell: exec::powershell_variable,
        }
    }

    /// Replace the environment lookup.
    #[must_use]
    pub const fn with_env(mut self, env: fn(&str) -> Option<String>) -> Self {
        self.env = env;
        self
    }

    /// Replace the home directory lookup.
    #[must_use]
    pub const fn with_home(mut self, home: fn() -> Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Replace the PowerShell variable lookup.
    #[must_use]
    pub const fn with_powershell(mut self, powershell: fn(&str) -> Option<String>) -> Self {
        self.powershell = powershell;
        self
    }

    /// Resolve `raw` into a clean path, absolute unless `use_relative`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoHomeDir`] when `raw` starts with `~` and the home
    /// directory is unknown, or [`PathError::NoWorkingDir`] when an absolute
    /// path is requested and the working directory is unavailable.
    pub fn resolve(&self, raw: &str, use_relative: bool) -> Result<PathBuf, PathError> {
        if raw.is_empty() {
            return finish(Path::new("."), use_relative);
        }

        let mut preserved: Vec<&str> = Vec::new();
        let mut text = raw.to_string();
        if self.os == Os::Windows {
            text = normalize_windows_env_vars(&text);
            let (expanded, unresolved) = expand_powershell_vars(&text, self.powershell);
            text = expanded;
            preserved = unresolved;
        }

        let text = expand_env(&text, self.env, &preserved);
        let path = expand_tilde(&text, self.home)?;
        if path.as_os_str().is_empty() {
            return finish(Path::new("."), use_relative);
        }
        finish(&path, use_relative)
    }
}

fn finish(path: &Path, use_relative: bool) -> Result<PathBuf, PathError> {
    if use_relative {
        return Ok(clean(path));
    }
    let absolute = std::path::absolute(path).map_err(PathError::NoWorkingDir)?;
    Ok(clean(&absolute))
}

/// Rewrite `%VAR%`, `${env:VAR}` and `$env:VAR` into `${VAR}`.
///
/// Sequences that do not form a valid variable name are left untouched.
#[must_use]
pub fn normalize_windows_env_vars(s: &str) -> String {
    WINDOWS_ENV
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            format!("${{{name}}}")
        })
        .into_owned()
}

/// Substitute [`POWERSHELL_VARIABLES`] that appear as `$Name`.
///
/// Returns the rewritten text and the names that were present but could not
/// be resolved; those stay in the text verbatim.
fn expand_powershell_vars(
    s: &str,
    lookup: fn(&str) -> Option<String>,
) -> (String, Vec<&'static str>) {
    let mut result = s.to_string();
    let mut unresolved = Vec::new();
    if !result.contains('$') {
        return (result, unresolved);
    }
    for name in POWERSHELL_VARIABLES {
        let pattern = format!("${name}");
        if !result.contains(&pattern) {
            continue;
        }
        match lookup(name) {
            Some(value) => result = result.replace(&pattern, &value),
            None => unresolved.push(name),
        }
    }
    (result, unresolved)
}

/// Expand `${NAME}` and `$NAME` references.
///
/// Undefined variables expand to the empty string. A `$` that does not start
/// a valid reference, and any `$NAME` listed in `preserve`, is kept literally.
fn expand_env(s: &str, lookup: fn(&str) -> Option<String>, preserve: &[&str]) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{')
            && let Some(end) = braced.find('}')
            && is_var_name(&braced[..end])
        {
            out.push_str(&lookup(&braced[..end]).unwrap_or_default());
            rest = &braced[end + 1..];
            continue;
        }

        let len = var_name_len(after);
        if len == 0 {
            out.push('$');
            rest = after;
            continue;
        }
        let name = &after[..len];
        if preserve.contains(&name) {
            out.push('$');
            out.push_str(name);
        } else {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

/// Length in bytes of the variable name at the start of `s` (0 if none).
fn var_name_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|&(_, c)| c != '_' && !c.is_ascii_alphanumeric())
        .map_or(s.len(), |(i, _)| i)
}

fn is_var_name(s: &str) -> bool {
    !s.is_empty() && var_name_len(s) == s.len()
}

/// Expand a leading `~`, `~/` or `~\`. Any other `~` is literal.
fn expand_tilde(s: &str, home: fn() -> Option<PathBuf>) -> Result<PathBuf, PathError> {
    let rest = if s == "~" {
        Some("")
    } else {
        s.strip_prefix("~/").or_else(|| s.strip_prefix("~\\"))
    };
    match rest {
        Some(rest) => {
            let home = home().ok_or(PathError::NoHomeDir)?;
            Ok(if rest.is_empty() { home } else { home.join(rest) })
        }
        None => Ok(PathBuf::from(s)),
    }
}

/// Lexically clean a path: drop `.`, fold `name/..`, collapse separators.
///
/// `..` at the root is dropped; leading `..` of a relative path is kept.
/// The empty path cleans to `.`. The filesystem is never consulted.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => out.push(component),
            },
            _ => out.push(component),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.into_iter().collect()
}
