//! Redacting wrapper for the upstream credential.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Placeholder printed wherever the credential would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// The server-held upstream API key.
///
/// `Debug`, `Display` and `Serialize` never print the key. Call sites that
/// need the value must go through [`ApiKey::expose`]. The buffer is zeroed
/// on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    pub fn new(inner: impl Into<String>) -> Self {
        Self { inner: inner.into() }
    }

    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&REDACTED).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
