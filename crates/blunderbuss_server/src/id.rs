//! Game identifiers and the entropy they are drawn from.

use derive_more::Display;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Number of random bytes in a game id. The hex form is twice as long.
pub const GAME_ID_BYTES: usize = 8;

/// Opaque game identifier: 8 random bytes as 16 lowercase hex characters.
///
/// Ids arriving from clients are not validated; an unknown id is simply not
/// found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Hex-encodes raw id bytes.
    pub fn from_bytes(bytes: &[u8; GAME_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Source of random bytes for game ids.
///
/// Failures are reported, never retried.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), String>;
}

/// The operating system's random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        OsRng.try_fill_bytes(dest).map_err(|e| e.to_string())
    }
}
