use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

/// A package identity such as `wasi:clocks` or `wasi:clocks@0.2.0`.
///
/// The canonical textual form is `namespace:name[@version]`; [`Display`](fmt::Display) and
/// [`FromStr`] are exact inverses of each other for every valid value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName {
    /// The namespace, such as `wasi` in `wasi:clocks`.
    pub namespace: String,
    /// The kebab-case name of the package.
    pub name: String,
    pub version: Option<Version>,
}

#[derive(Debug, Error)]
pub enum PackageNameError {
    #[error("missing package namespace")]
    MissingNamespace,
    #[error("missing package name")]
    MissingName,
    #[error("invalid character {character:?} in package {part}")]
    InvalidCharacter {
        part: &'static str,
        character: char,
    },
    #[error("invalid package version")]
    InvalidVersion(#[source] semver::Error),
}

impl PackageName {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: Option<Version>,
    ) -> Result<Self, PackageNameError> {
        let package_name = Self {
            namespace: namespace.into(),
            name: name.into(),
            version,
        };
        package_name.validate()?;
        Ok(package_name)
    }

    /// Checks the namespace and name. Parsing already does this; the check is exposed since the
    /// fields are public.
    pub fn validate(&self) -> Result<(), PackageNameError> {
        if self.namespace.is_empty() {
            return Err(PackageNameError::MissingNamespace);
        }
        if self.name.is_empty() {
            return Err(PackageNameError::MissingName);
        }
        check_characters("namespace", &self.namespace)?;
        check_characters("name", &self.name)
    }

    /// The name without its version, e.g. `wasi:clocks`.
    pub fn unversioned(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

fn check_characters(part: &'static str, value: &str) -> Result<(), PackageNameError> {
    match value
        .chars()
        .find(|c| matches!(c, ':' | '@' | '/') || c.is_whitespace())
    {
        Some(character) => Err(PackageNameError::InvalidCharacter { part, character }),
        None => Ok(()),
    }
}

impl FromStr for PackageName {
    type Err = PackageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A string without any ':' has an empty namespace
        let (namespace, rest) = s.split_once(':').unwrap_or(("", s));
        let (name, version) = match rest.split_once('@') {
            Some((name, version)) => {
                let version = Version::parse(version).map_err(PackageNameError::InvalidVersion)?;
                (name, Some(version))
            }
            None => (rest, None),
        };
        Self::new(namespace, name, version)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unversioned_name() {
        let name: PackageName = "wasi:clocks".parse().unwrap();
        assert_eq!(name.namespace, "wasi");
        assert_eq!(name.name, "clocks");
        assert_eq!(name.version, None);
        assert_eq!(name.to_string(), "wasi:clocks");
    }

    #[test]
    fn parses_versioned_name() {
        let name: PackageName = "wasi:clocks@1.0.0".parse().unwrap();
        assert_eq!(name.version, Some(Version::new(1, 0, 0)));
        assert_eq!(name.to_string(), "wasi:clocks@1.0.0");
    }

    #[test]
    fn rejects_empty_namespace() {
        assert!(matches!(
            ":clocks".parse::<PackageName>(),
            Err(PackageNameError::MissingNamespace)
        ));
        assert!(matches!(
            "clocks".parse::<PackageName>(),
            Err(PackageNameError::MissingNamespace)
        ));
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            "wasi:".parse::<PackageName>(),
            Err(PackageNameError::MissingName)
        ));
        assert!(matches!(
            "wasi:@1.0.0".parse::<PackageName>(),
            Err(PackageNameError::MissingName)
        ));
    }

    #[test]
    fn rejects_invalid_version() {
        for source in ["wasi:clocks@", "wasi:clocks@1", "wasi:clocks@1.0", "wasi:clocks@x.y.z"] {
            assert!(
                matches!(
                    source.parse::<PackageName>(),
                    Err(PackageNameError::InvalidVersion(_))
                ),
                "{source} should not parse"
            );
        }
    }

    #[test]
    fn rejects_separators_inside_parts() {
        assert!(matches!(
            "wasi:io:streams".parse::<PackageName>(),
            Err(PackageNameError::InvalidCharacter {
                part: "name",
                character: ':'
            })
        ));
        assert!(matches!(
            "wasi:io/streams".parse::<PackageName>(),
            Err(PackageNameError::InvalidCharacter {
                part: "name",
                character: '/'
            })
        ));
        assert!(PackageName::new("wa si", "io", None).is_err());
    }

    #[test]
    fn canonical_strings_round_trip() {
        for source in [
            "wasi:clocks",
            "wasi:clocks@0.2.0",
            "my-org:my-pkg@1.2.3-rc.1",
            "a:b@0.0.1+build.5",
        ] {
            let parsed: PackageName = source.parse().unwrap();
            assert_eq!(parsed.to_string(), source);
            assert_eq!(parsed.to_string().parse::<PackageName>().unwrap(), parsed);
        }
    }

    #[test]
    fn unversioned_drops_the_version() {
        let name: PackageName = "wasi:io@0.2.0".parse().unwrap();
        assert_eq!(name.unversioned(), "wasi:io");
    }
}
