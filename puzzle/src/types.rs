use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier shared by a build puzzle and its play copy.
///
/// Build documents carry either string or integer `_id` values; both are kept
/// as their string form so the two collections key on the same text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PuzzleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PuzzleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => PuzzleId(s),
            RawId::Signed(n) => PuzzleId(n.to_string()),
            RawId::Unsigned(n) => PuzzleId(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id() {
        let id: PuzzleId = serde_json::from_str(r#""yUM8F""#).unwrap();
        assert_eq!(id.as_str(), "yUM8F");
    }

    #[test]
    fn test_integer_id_becomes_text() {
        let id: PuzzleId = serde_json::from_str("42").unwrap();
        assert_eq!(id, PuzzleId::from("42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
    }

    #[test]
    fn test_rejects_object_id() {
        assert!(serde_json::from_str::<PuzzleId>(r#"{"$oid":"abc"}"#).is_err());
    }
}
