use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{convert::Infallible, fmt, str::FromStr};

/// Marker appended to the identifiers of pinned copies of dashboard items.
pub const PINNED_SUFFIX: &str = "::pinned";

/// Identifier of a board, clip, tab or column on the dashboard.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the original item when this id refers to a pinned copy.
    ///
    /// Everything from the first [`PINNED_SUFFIX`] on is dropped; ids without
    /// the marker are returned unchanged.
    #[must_use]
    pub fn without_pinned(&self) -> Self {
        Self(active_id_from_pinned(&self.0).to_owned())
    }
}

/// Strip the pinned marker from a raw drag id.
#[must_use]
pub fn active_id_from_pinned(raw: &str) -> &str {
    raw.split(PINNED_SUFFIX).next().unwrap_or(raw)
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for ItemId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Hosts hand out both string and numeric identifiers.
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number identifier, got {other}"
            ))),
        }
    }
}
