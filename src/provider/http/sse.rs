//! Incremental Server-Sent Events parser.
//!
//! Buffers partial input across chunk boundaries and emits complete frames.
//! A frame is everything up to a blank line (`\n\n`); only `data:` lines
//! carry payload, and a frame may carry several of them.

/// A complete SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Payload of each `data:` line, in original order.
    ///
    /// Kept line-by-line rather than joined: every line is an independent
    /// payload for the decoder (each one is its own JSON document or the
    /// termination sentinel).
    pub data: Vec<String>,
}

/// Incremental SSE parser.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of decoded text and return any complete frames.
    ///
    /// Text after the last `\n\n` is not a complete frame and is retained
    /// for the next call.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseFrame> {
        self.buffer.push_str(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.find("\n\n") {
            let frame_text = self.buffer[..pos].to_string();
            self.buffer = self.buffer[pos + 2..].to_string();

            if let Some(frame) = Self::parse_frame(&frame_text) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Parse one frame's text into its `data:` payload lines.
    ///
    /// Lines not starting with `data:` (comments, `event:`, `id:`, …) are
    /// ignored. After the prefix, at most one space is stripped, then the
    /// payload is trimmed. Frames with no `data:` lines yield nothing.
    fn parse_frame(text: &str) -> Option<SseFrame> {
        let mut data = Vec::new();

        for line in text.lines() {
            if let Some(value) = line.strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                data.push(value.trim().to_string());
            }
        }

        if data.is_empty() {
            return None;
        }

        Some(SseFrame { data })
    }

    /// Whether undelivered text remains in the buffer.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_frame() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: hello world\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, vec!["hello world"]);
    }

    #[test]
    fn test_no_space_after_prefix() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data:hello\n\n");
        assert_eq!(frames[0].data, vec!["hello"]);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: first\n\ndata: second\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, vec!["first"]);
        assert_eq!(frames[1].data, vec!["second"]);
    }

    #[test]
    fn test_partial_frame_retained() {
        let mut parser = SseParser::new();

        let frames = parser.feed("data: partial");
        assert!(frames.is_empty());
        assert!(parser.has_pending());

        let frames = parser.feed(" message\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, vec!["partial message"]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_split_mid_delimiter() {
        let mut parser = SseParser::new();
        assert!(parser.feed("data: x\n").is_empty());
        let frames = parser.feed("\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, vec!["x"]);
    }

    #[test]
    fn test_multiple_data_lines_kept_separate() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: one\ndata: two\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, vec!["one", "two"]);
    }

    #[test]
    fn test_comment_and_other_fields_ignored() {
        let mut parser = SseParser::new();
        let frames = parser.feed(": keep-alive\nevent: message\nid: 7\ndata: real\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, vec!["real"]);
    }

    #[test]
    fn test_frame_without_data_skipped() {
        let mut parser = SseParser::new();
        assert!(parser.feed(": ping\n\n").is_empty());
        assert!(parser.feed("\n\n").is_empty());
    }

    #[test]
    fn test_crlf_payload_trimmed() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: hello\r\n\n");
        assert_eq!(frames[0].data, vec!["hello"]);
    }

    #[test]
    fn test_done_sentinel_passes_through() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: [DONE]\n\n");
        assert_eq!(frames[0].data, vec!["[DONE]"]);
    }

    #[test]
    fn test_json_payload() {
        let mut parser = SseParser::new();
        let frames = parser.feed("data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\n");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].data[0].contains("Hi"));
    }
}
