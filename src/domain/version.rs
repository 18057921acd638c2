use crate::error::{DocsSyncError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Pre-release stage of an upstream release version
///
/// Upstream releases use compact suffixes: `2.16.0a1`, `2.16.0b2`, `2.16.0rc1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseKind {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl fmt::Display for PreReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseKind::Alpha => write!(f, "a"),
            PreReleaseKind::Beta => write!(f, "b"),
            PreReleaseKind::ReleaseCandidate => write!(f, "rc"),
        }
    }
}

/// Pre-release stage plus its iteration number (e.g. `rc1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreRelease {
    pub kind: PreReleaseKind,
    pub number: u32,
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}

/// Release version of the upstream project
///
/// Three numeric components with an optional pre-release suffix. Any final
/// release orders after every pre-release of the same triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub pre: Option<PreRelease>,
}

impl Version {
    /// Create a final (non pre-release) version
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Version {
            major,
            minor,
            micro,
            pre: None,
        }
    }

    /// Parse a version from a tag string (e.g. "v2.16.1" or "2.16.0rc1")
    pub fn parse(tag: &str) -> Result<Self> {
        let clean_tag = tag.trim_start_matches('v').trim_start_matches('V');

        let re = regex::Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:(a|b|rc)(\d+))?$")
            .map_err(|e| DocsSyncError::version(format!("Invalid version pattern: {}", e)))?;
        let caps = re.captures(clean_tag).ok_or_else(|| {
            DocsSyncError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z with optional a/b/rc suffix",
                tag
            ))
        })?;

        let component = |i: usize| -> Result<u32> {
            caps[i].parse::<u32>().map_err(|_| {
                DocsSyncError::version(format!("Version component out of range: {}", &caps[i]))
            })
        };

        let pre = match caps.get(4).map(|m| m.as_str()) {
            Some("a") => Some(PreReleaseKind::Alpha),
            Some("b") => Some(PreReleaseKind::Beta),
            Some("rc") => Some(PreReleaseKind::ReleaseCandidate),
            _ => None,
        };
        let pre = match pre {
            Some(kind) => Some(PreRelease {
                kind,
                number: component(5)?,
            }),
            None => None,
        };

        Ok(Version {
            major: component(1)?,
            minor: component(2)?,
            micro: component(3)?,
            pre,
        })
    }

    /// The `major.minor` series this version belongs to (e.g. "2.16")
    pub fn series(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Whether this is a pre-release (alpha, beta or release candidate)
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.micro)
            .cmp(&(other.major, other.minor, other.micro))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // A final release sorts after its own pre-releases
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if let Some(pre) = &self.pre {
            write!(f, "{}", pre)?;
        }
        Ok(())
    }
}
