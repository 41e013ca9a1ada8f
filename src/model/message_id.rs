//! Message identifiers bound to the capturing host.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Number of random bytes behind each identifier.
const ID_RANDOM_BYTES: usize = 32;

/// An opaque, globally unique message identifier: `<base64url>@<hostname>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generate an identifier for `hostname` using the operating system RNG.
    pub fn new(hostname: &str) -> Result<Self> {
        Self::generate(hostname, &mut rand::rngs::OsRng)
    }

    /// Generate an identifier for `hostname` from the given random source.
    ///
    /// The 32 random bytes are encoded with the padded URL-safe base64
    /// alphabet, so the random half is always 44 characters long.
    pub fn generate<R: RngCore + ?Sized>(hostname: &str, rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; ID_RANDOM_BYTES];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Self(format!("{}@{}", URL_SAFE.encode(bytes), hostname)))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the placeholder used when generation failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
