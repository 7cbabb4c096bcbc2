use std::fmt;

use serde::{Deserialize, Serialize};

/// The path of element names from the document root to a node.
///
/// Segments are trimmed of surrounding whitespace when the path is built, so
/// two paths compare equal whenever their trimmed segments match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Location(Vec<String>);

impl Location {
    /// Builds a location from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            segments
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .collect(),
        )
    }

    /// The location of the document root element.
    #[must_use]
    pub fn root() -> Self {
        Self(vec![crate::domain::schema::ROOT.to_string()])
    }

    /// Returns a new location one level below this one.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.trim().to_string());
        Self(segments)
    }

    /// Returns the enclosing location, or `None` for an empty path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// The segments of this location, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The innermost segment.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns `true` if `prefix` is this location or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns every prefix of this location, from the first segment down to
    /// the full path.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.0.len()).map(|len| Self(self.0[..len].to_vec()))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<Vec<String>> for Location {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

impl From<Location> for Vec<String> {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl<const N: usize> From<[&str; N]> for Location {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for Location {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_trimmed() {
        let padded = Location::from([" stmd:SimulationTaskMetaData ", "stmd:DesignPhase\n"]);
        let plain = Location::from(["stmd:SimulationTaskMetaData", "stmd:DesignPhase"]);

        assert_eq!(padded, plain);
        assert_eq!(padded.to_string(), "stmd:SimulationTaskMetaData/stmd:DesignPhase");
    }

    #[test]
    fn child_and_parent_are_inverse() {
        let phase = Location::root().child("stmd:AnalysisPhase");
        let step = phase.child("stmd:VerifyAnalysis");

        assert_eq!(step.parent(), Some(phase.clone()));
        assert!(step.starts_with(&phase));
        assert!(!phase.starts_with(&step));
        assert_eq!(step.last(), Some("stmd:VerifyAnalysis"));
    }

    #[test]
    fn ancestors_run_from_root_to_self() {
        let step = Location::from([
            "stmd:SimulationTaskMetaData",
            "stmd:AnalysisPhase",
            "stmd:VerifyAnalysis",
        ]);

        let ancestors: Vec<_> = step.ancestors_and_self().collect();

        assert_eq!(ancestors.len(), 3);
        assert_eq!(ancestors[0], Location::root());
        assert_eq!(ancestors[2], step);
    }

    #[test]
    fn serializes_as_string_array() {
        let location = Location::from(["stmd:SimulationTaskMetaData", "stmd:ExecutionPhase"]);

        let json = serde_json::to_string(&location).unwrap();

        assert_eq!(
            json,
            r#"["stmd:SimulationTaskMetaData","stmd:ExecutionPhase"]"#
        );
        assert_eq!(serde_json::from_str::<Location>(&json).unwrap(), location);
    }
}
