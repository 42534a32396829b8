//! Server-sent events decoding for provider streams

use std::collections::VecDeque;
use std::pin::Pin;

use futures::{stream, Stream, StreamExt};

use super::http_client::ByteStream;
use crate::domain::DomainError;

/// Stream of event payloads, one item per SSE event
pub type DataStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

struct SseState {
    inner: ByteStream,
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    ready: VecDeque<String>,
    finished: bool,
}

impl SseState {
    fn drain_lines(&mut self) {
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.push_line(&line);
        }
    }

    fn push_line(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);

        if line.is_empty() {
            self.dispatch();
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            self.data_lines.push(data.to_string());
        }
    }

    /// End of event: its `data:` lines are joined with `\n`
    fn dispatch(&mut self) {
        if self.data_lines.is_empty() {
            return;
        }

        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        if !data.is_empty() {
            self.ready.push_back(data);
        }
    }
}

/// Split a byte stream into SSE event payloads.
///
/// Lines may span chunk boundaries, so bytes are buffered until a newline.
/// An event ends at a blank line or at the end of the stream. A transport
/// error is yielded once and ends the stream.
pub fn data_events(inner: ByteStream) -> DataStream {
    let state = SseState {
        inner,
        buffer: Vec::new(),
        data_lines: Vec::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(data) = state.ready.pop_front() {
                return Some((Ok(data), state));
            }

            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(bytes)) => {
                    state.buffer.extend_from_slice(&bytes);
                    state.drain_lines();
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.ready.clear();
                    return Some((Err(e), state));
                }
                None => {
                    state.finished = true;
                    let rest = std::mem::take(&mut state.buffer);
                    if !rest.is_empty() {
                        state.push_line(&rest);
                    }
                    state.dispatch();
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AiProvider;
    use bytes::Bytes;

    fn byte_stream(chunks: Vec<Result<&'static str, &'static str>>) -> ByteStream {
        Box::pin(stream::iter(chunks.into_iter().map(|c| {
            c.map(|s| Bytes::from_static(s.as_bytes()))
                .map_err(|e| DomainError::provider(AiProvider::OpenAi, e))
        })))
    }

    #[tokio::test]
    async fn test_events_split_across_chunks() {
        let events: Vec<_> = data_events(byte_stream(vec![
            Ok("data: {\"a\":"),
            Ok("1}\n\ndata: second\r\n\r\n"),
            Ok(": comment\nevent: ping\ndata: third"),
        ]))
        .collect()
        .await;

        let events: Vec<String> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(events, vec!["{\"a\":1}", "second", "third"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let events: Vec<_> = data_events(byte_stream(vec![
            Ok("data: one\n\n"),
            Err("connection reset"),
            Ok("data: never\n"),
        ]))
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap(), "one");
        assert!(events[1]
            .as_ref()
            .unwrap_err()
            .to_string()
            .contains("connection reset"));
    }

    #[tokio::test]
    async fn test_multiline_event_is_joined() {
        let events: Vec<_> = data_events(byte_stream(vec![
            Ok("data: first line\ndata:"),
            Ok(" second line\n\ndata: next\n\n"),
        ]))
        .collect()
        .await;

        let events: Vec<String> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(events, vec!["first line\nsecond line", "next"]);
    }

    #[tokio::test]
    async fn test_pending_event_is_dropped_on_error() {
        let events: Vec<_> = data_events(byte_stream(vec![
            Ok("data: half an event\n"),
            Err("connection reset"),
        ]))
        .collect()
        .await;

        assert_eq!(events.len(), 1);
        assert!(events[0].is_err());
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let events: Vec<_> = data_events(byte_stream(vec![])).collect().await;
        assert!(events.is_empty());
    }
}
