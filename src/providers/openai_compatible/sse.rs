//! Server-Sent Events line parsing for chat completion streams
//!
//! Buffers raw body bytes, splits on newlines (CRLF tolerant) and yields the
//! payload of each `data:` line. Comments, blank lines and the `[DONE]` marker
//! are skipped. A trailing line without a newline is flushed at end of body.

use crate::error::{LlmError, LlmResult};
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use tokio_stream::StreamExt;

/// Turn a response body byte stream into a stream of SSE `data:` payloads.
///
/// A body read error is yielded once as [`LlmError::StreamInterrupted`] and
/// ends the stream.
pub fn sse_data_stream<S, E>(byte_stream: S) -> impl Stream<Item = LlmResult<String>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    stream::unfold(
        (byte_stream, BytesMut::with_capacity(8192), false),
        |(mut body, mut buffer, done)| async move {
            if done {
                return None;
            }

            loop {
                if let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let mut line = buffer.split_to(newline_pos + 1);
                    line.truncate(line.len() - 1);
                    if line.last() == Some(&b'\r') {
                        line.truncate(line.len() - 1);
                    }

                    let data = std::str::from_utf8(&line).ok().and_then(extract_sse_data);
                    if let Some(data) = data {
                        return Some((Ok(data), (body, buffer, false)));
                    }
                    continue;
                }

                match body.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        let err = LlmError::stream_interrupted(e.to_string());
                        return Some((Err(err), (body, buffer, true)));
                    }
                    None => {
                        let data = std::str::from_utf8(&buffer).ok().and_then(extract_sse_data);
                        buffer.clear();
                        return data.map(|data| (Ok(data), (body, buffer, true)));
                    }
                }
            }
        },
    )
}

/// Payload of a `data:` line, or `None` for anything that carries no data.
pub fn extract_sse_data(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed
        .strip_prefix("data:")
        .map(str::trim)
        .filter(|d| !d.is_empty() && *d != "[DONE]")?;

    Some(data.to_string())
}
