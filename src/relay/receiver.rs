//! Receiving end of a check: drain whatever arrives.

use axum::body::Body;
use futures_util::StreamExt;

/// Read `body` to completion without inspecting it. Returns the byte count.
pub async fn drain(body: Body) -> Result<u64, axum::Error> {
    let mut stream = body.into_data_stream();
    let mut received = 0u64;
    while let Some(chunk) = stream.next().await {
        received += chunk?.len() as u64;
    }
    Ok(received)
}
