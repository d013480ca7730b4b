//! Static payload shared by `/check` and `/pull`.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use super::{PayloadStream, CHUNK_SIZE};
use crate::config::PayloadConfig;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Could not open payload file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error stat-ing payload file {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("payload path {} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },
    #[error("could not read payload file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
enum Backing {
    File(Arc<PathBuf>),
    Memory(Bytes),
}

/// The fixed byte sequence replayed by `/check` and `/pull`.
///
/// Cloning is cheap. Each call to [`StaticPayload::stream`] starts a fresh
/// cursor at offset 0, so concurrent readers never observe each other.
#[derive(Debug, Clone)]
pub struct StaticPayload {
    backing: Backing,
    len: u64,
}

impl StaticPayload {
    /// Open and stat the payload file. Any failure here is fatal at startup.
    pub async fn open(config: &PayloadConfig) -> Result<Self, PayloadError> {
        let path = config.path.clone();
        let file = File::open(&path).await.map_err(|source| PayloadError::Open {
            path: path.clone(),
            source,
        })?;

        let metadata = file.metadata().await.map_err(|source| PayloadError::Stat {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(PayloadError::NotAFile { path });
        }
        let len = metadata.len();

        if config.preload {
            let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
            file.take(len)
                .read_to_end(&mut buffer)
                .await
                .map_err(|source| PayloadError::Read { path, source })?;
            return Ok(Self::from_bytes(buffer));
        }

        Ok(Self {
            backing: Backing::File(Arc::new(path)),
            len,
        })
    }

    /// Payload held entirely in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            len: bytes.len() as u64,
            backing: Backing::Memory(bytes),
        }
    }

    /// Length recorded when the payload was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_preloaded(&self) -> bool {
        matches!(self.backing, Backing::Memory(_))
    }

    /// Start an independent read of the payload from offset 0.
    ///
    /// Yields at most [`len`](Self::len) bytes even if the file grew after startup.
    pub async fn stream(&self) -> Result<PayloadStream, PayloadError> {
        match &self.backing {
            Backing::File(path) => {
                let file = File::open(path.as_path())
                    .await
                    .map_err(|source| PayloadError::Open {
                        path: (**path).clone(),
                        source,
                    })?;
                Ok(ReaderStream::with_capacity(file.take(self.len), CHUNK_SIZE).boxed())
            }
            Backing::Memory(bytes) => Ok(chunked(bytes.clone())),
        }
    }
}

fn chunked(bytes: Bytes) -> PayloadStream {
    let len = bytes.len();
    stream::iter(
        (0..len)
            .step_by(CHUNK_SIZE)
            .map(move |start| Ok(bytes.slice(start..(start + CHUNK_SIZE).min(len)))),
    )
    .boxed()
}
