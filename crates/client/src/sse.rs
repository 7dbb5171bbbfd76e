//! Incremental parser for the `text/event-stream` wire format.
//!
//! Network reads hand the parser arbitrary chunks; it buffers partial
//! lines and emits a frame whenever a blank line completes one. Comment
//! lines (leading `:`, e.g. the server's heartbeats) are discarded, and
//! per the wire format a frame with no accumulated data is never
//! dispatched.

/// One parsed SSE frame: optional event name plus the joined data lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

/// Stateful frame parser fed by transport chunks.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return every frame it completes.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseFrame> {
        self.buffer.push_str(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line: dispatch if any data accumulated.
                if !self.data.is_empty() {
                    frames.push(SseFrame {
                        event: self.event.take(),
                        data: self.data.join("\n"),
                    });
                }
                self.event = None;
                self.data.clear();
                continue;
            }

            if line.starts_with(':') {
                // Comment (heartbeat); ignored.
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                // "id" and "retry" are not used by this protocol.
                _ => {}
            }
        }
        frames
    }
}
