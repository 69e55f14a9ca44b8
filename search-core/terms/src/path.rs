use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, Serializer};
use smol_str::SmolStr;
use thiserror::Error;

/// A dotted qualified name identifying a library entry, e.g. `Base.List.map`.
///
/// The first segment names the package; the last segment names the value or
/// constructor itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Arc<[SmolStr]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path: {0:?}")]
pub struct PathError(pub String);

impl Path {
    pub fn new<I, S>(segments: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let segments: Arc<[SmolStr]> = segments.into_iter().map(Into::into).collect();
        debug_assert!(!segments.is_empty());
        Path { segments }
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// The package a path belongs to, i.e. its first segment.
    pub fn package(&self) -> &SmolStr {
        &self.segments[0]
    }

    pub fn name(&self) -> &SmolStr {
        &self.segments[self.segments.len() - 1]
    }

    /// The `unit` constructor is folded into the empty tuple on import.
    pub fn is_unit(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == "unit"
    }

    /// Internal modules carry a `__` marker in at least one segment.
    pub fn is_internal(&self) -> bool {
        self.segments.iter().any(|segment| segment.contains("__"))
    }

    /// Case-insensitive ordering used to pick a readable representative among
    /// re-exports of the same entry; falls back to the raw order on ties.
    pub fn humanised_cmp(&self, other: &Path) -> Ordering {
        let this = self.segments.iter().map(|segment| segment.to_lowercase());
        let that = other.segments.iter().map(|segment| segment.to_lowercase());
        this.cmp(that).then_with(|| self.cmp(other))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            f.write_str(first)?;
        }
        for segment in segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(source: &str) -> Result<Path, PathError> {
        if source.is_empty() || source.split('.').any(str::is_empty) {
            return Err(PathError(source.to_string()));
        }
        Ok(Path::new(source.split('.')))
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Path, D::Error> {
        let source = SmolStr::deserialize(deserializer)?;
        source.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::Path;

    #[test]
    fn test_parse_display() {
        let path: Path = "Base.List.map".parse().unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.package(), "Base");
        assert_eq!(path.name(), "map");
        assert_eq!(path.to_string(), "Base.List.map");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!("".parse::<Path>().is_err());
        assert!("Base..map".parse::<Path>().is_err());
        assert!(".map".parse::<Path>().is_err());
    }

    #[test]
    fn test_internal() {
        let internal: Path = "Base.Base__List.map".parse().unwrap();
        let public: Path = "Base.List.map".parse().unwrap();
        assert!(internal.is_internal());
        assert!(!public.is_internal());
    }

    #[test]
    fn test_humanised_cmp() {
        let upper: Path = "Base.MAP".parse().unwrap();
        let lower: Path = "Base.map".parse().unwrap();
        assert_eq!(upper.humanised_cmp(&lower), Ordering::Less);
        assert_eq!(upper.humanised_cmp(&upper), Ordering::Equal);
    }
}
