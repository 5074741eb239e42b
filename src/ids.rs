use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strongly typed endpoint identifier backed by ULID.
///
/// Assigned once when a definition is generated and never changed afterwards.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct MockId(pub ulid::Ulid);

impl MockId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for MockId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MockId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(MockId(id))
    }
}

impl Serialize for MockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<MockId>()
            .map_err(|_| serde::de::Error::custom("invalid mock id"))
    }
}
