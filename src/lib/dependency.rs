//! Names of dependencies and the remote they are hosted under.

use crate::manifest::ManifestError;

/// The account hosting every dependency unless a manifest says otherwise.
pub const DEFAULT_REMOTE: &str = "https://github.com/ismawno";

/// The dependencies fetched by a root invocation when no manifest is given.
pub const DEFAULT_DEPENDENCIES: [&str; 3] = ["vec-2D", "debug-toolg", "ini-parser"];

/// The name of a remote repository. Also used as the name of the directory it is added at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct DependencyName(String);

/// Dependencies in the order they are fetched.
pub type DependencySet = Vec<DependencyName>;

impl DependencyName {
    /// Validate `name` as a single path component which `git` won't mistake for an option.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, ManifestError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("must not be empty")
        } else if name == "." || name == ".." {
            Some("must not be '.' or '..'")
        } else if name.contains(['/', '\\']) {
            Some("must not contain a path separator")
        } else if name.starts_with('-') {
            Some("must not start with '-'")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ManifestError::InvalidName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DependencyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DependencyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for DependencyName {
    fn as_ref(&self) -> &std::path::Path {
        self.0.as_ref()
    }
}

impl std::str::FromStr for DependencyName {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Parse a list of names into a [`DependencySet`], keeping their order.
pub fn try_parse_names<I, S>(names: I) -> Result<DependencySet, ManifestError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(DependencyName::new).collect()
}

/// The dependencies fetched by a root invocation: `vec-2D`, `debug-toolg` and `ini-parser`.
pub fn default_dependencies() -> DependencySet {
    DEFAULT_DEPENDENCIES
        .iter()
        .map(|name| DependencyName(name.to_string()))
        .collect()
}

/// The base URL of the account hosting all dependencies. Dependency `name` is cloned from
/// `<base>/<name>.git`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Remote {
    base: String,
}

impl Default for Remote {
    fn default() -> Self {
        Self {
            base: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl Remote {
    /// Parse the base URL of a hosting account, e.g. `https://github.com/ismawno`.
    pub fn parse<S: AsRef<str>>(base: S) -> Result<Self, ManifestError> {
        let base = base.as_ref().trim_end_matches('/');
        let parsed = url::Url::parse(base).map_err(|err| ManifestError::InvalidRemote {
            remote: base.to_string(),
            err,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ManifestError::RemoteNotBase {
                remote: base.to_string(),
            });
        }
        Ok(Self {
            base: base.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The URL `name` is cloned from.
    pub fn url_for(&self, name: &DependencyName) -> String {
        format!("{}/{name}.git", self.base)
    }
}

impl std::fmt::Display for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_dependencies_are_in_order() {
        let names: Vec<_> = default_dependencies()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(names, ["vec-2D", "debug-toolg", "ini-parser"]);
    }

    #[test]
    fn default_remote_url() {
        let name = DependencyName::new("vec-2D").unwrap();
        assert_eq!(
            Remote::default().url_for(&name),
            "https://github.com/ismawno/vec-2D.git"
        );
    }

    #[test]
    fn remote_trailing_slash_is_ignored() {
        let remote = Remote::parse("https://example.com/someone/").unwrap();
        let name = DependencyName::new("lib").unwrap();
        assert_eq!(remote.url_for(&name), "https://example.com/someone/lib.git");
    }

    #[test]
    fn remote_must_be_a_url() {
        assert!(matches!(
            Remote::parse("not a url"),
            Err(ManifestError::InvalidRemote { remote, .. }) if remote == "not a url"
        ));
    }

    #[test]
    fn remote_must_be_a_base() {
        assert!(matches!(
            Remote::parse("mailto:someone@example.com"),
            Err(ManifestError::RemoteNotBase { .. })
        ));
    }

    #[test]
    fn names_must_be_single_components() {
        for bad in ["", ".", "..", "a/b", "a\\b", "--force"] {
            assert!(
                matches!(DependencyName::new(bad), Err(ManifestError::InvalidName { ref name, .. }) if name == bad),
                "'{bad}' should be rejected"
            );
        }
        assert!(DependencyName::new("ini-parser").is_ok());
    }

    #[test]
    fn parse_names_keeps_order() {
        let set = try_parse_names(["c", "a", "b"]).unwrap();
        let names: Vec<&str> = set.iter().map(DependencyName::as_str).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn parse_names_stops_at_first_invalid() {
        assert!(matches!(
            try_parse_names(["ok", "not/ok", ".."]),
            Err(ManifestError::InvalidName { name, .. }) if name == "not/ok"
        ));
    }
}
