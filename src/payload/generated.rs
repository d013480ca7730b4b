//! Pseudorandom payloads for `/gencheck`.

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::{PayloadStream, CHUNK_SIZE};

/// Why a requested byte count was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ByteCountError {
    #[error("Could not parse body size in request URL")]
    Unparseable,
    #[error("Cannot send negative amount of bytes")]
    Negative(i64),
}

impl ByteCountError {
    /// The length the caller asked for, when it was a number at all.
    pub fn attempted(&self) -> Option<i64> {
        match self {
            ByteCountError::Unparseable => None,
            ByteCountError::Negative(n) => Some(*n),
        }
    }
}

/// Parse the `{bytes}` path segment as a signed 64-bit count and reject negatives.
pub fn parse_byte_count(raw: &str) -> Result<u64, ByteCountError> {
    let n: i64 = raw.parse().map_err(|_| ByteCountError::Unparseable)?;
    u64::try_from(n).map_err(|_| ByteCountError::Negative(n))
}

/// Exactly `len` pseudorandom bytes from a generator seeded for this call only.
pub fn generate(len: u64) -> PayloadStream {
    let rng = StdRng::from_entropy();
    stream::unfold((rng, len), |(mut rng, remaining)| async move {
        if remaining == 0 {
            return None;
        }
        let n = remaining.min(CHUNK_SIZE as u64) as usize;
        let mut chunk = vec![0u8; n];
        rng.fill_bytes(&mut chunk);
        Some((
            Ok::<_, std::io::Error>(Bytes::from(chunk)),
            (rng, remaining - n as u64),
        ))
    })
    .boxed()
}
