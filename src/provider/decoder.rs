//! Incremental decoding of the streamed response body.
//!
//! Raw bytes from the HTTP response are decoded as UTF-8 (carrying partial
//! characters across chunk boundaries), split into SSE frames, and reduced
//! to an ordered sequence of text fragments pushed to the caller's sink.

use super::error::Error;
use super::http::SseParser;
use super::stream::StreamChunk;
use super::types::StreamEvent;
use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};
use tokio::sync::mpsc;

/// Terminal event payload sent by the upstream before closing the stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental UTF-8 decoder.
///
/// A multi-byte character split across chunk boundaries is held back and
/// completed by the next chunk. Invalid sequences decode to U+FFFD, the
/// same as lossy text decoding in browsers.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, input: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(input);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        out.push_str(s);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push('\u{FFFD}');
                            rest = &after[len..];
                        }
                        // Incomplete trailing character: wait for more bytes.
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        out
    }
}

/// Decoder state for one send operation.
///
/// Created when the request succeeds, fed every body chunk, discarded when
/// the read loop exits.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8Decoder,
    parser: SseParser,
    text: String,
    terminated: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of raw bytes; returns the non-empty fragments it
    /// completed, in stream order.
    ///
    /// Once the `[DONE]` sentinel has been seen, everything else in the
    /// same batch (and any later chunk) is dropped unprocessed. A payload
    /// that is not valid JSON is fatal.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<String>, Error> {
        if self.terminated {
            return Ok(Vec::new());
        }

        let chunk_text = self.utf8.decode(bytes);
        let mut fragments = Vec::new();

        'frames: for frame in self.parser.feed(&chunk_text) {
            for payload in &frame.data {
                if payload == DONE_SENTINEL {
                    self.terminated = true;
                    break 'frames;
                }

                let chunk: StreamChunk = serde_json::from_str(payload)
                    .map_err(|e| Error::MalformedFrame(format!("{e}: {payload}")))?;

                if let Some(fragment) = chunk.fragment()
                    && !fragment.is_empty()
                {
                    self.text.push_str(fragment);
                    fragments.push(fragment.to_string());
                }
            }
        }

        Ok(fragments)
    }

    /// Whether the `[DONE]` sentinel has been observed.
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// All text accumulated so far, in emission order.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the decoder, returning the accumulated assistant text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Drive a response body stream through the decoder, pushing each fragment
/// to the sink. Returns the full accumulated text on clean completion.
///
/// End-of-data without a sentinel is a normal completion; some upstreams
/// omit the marker. Errors (transport or malformed frame) abort the read
/// and propagate; nothing is retried.
pub(crate) async fn drain_stream<S, E>(
    stream: S,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<String, Error>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    pin_mut!(stream);
    let mut decoder = StreamDecoder::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Transport(e.to_string()))?;
        for fragment in decoder.feed(&chunk)? {
            let _ = tx.send(StreamEvent::TextDelta(fragment)).await;
        }
        if decoder.terminated() {
            break;
        }
    }

    let _ = tx.send(StreamEvent::Done).await;
    Ok(decoder.into_text())
}
