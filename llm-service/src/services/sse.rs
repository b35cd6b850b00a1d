//! Minimal server-sent-events line framing over a byte stream.
//!
//! Both provider streaming endpoints speak SSE, and the services only need
//! the `data:` payload of each event. This keeps a rolling buffer and yields
//! complete payload lines as network chunks arrive, since events may split
//! across chunk boundaries.

/// Accumulates raw bytes and yields complete `data:` payload lines.
#[derive(Debug, Default)]
pub(crate) struct SseLineBuffer {
    buf: String,
}

impl SseLineBuffer {
    /// Feed one network chunk; returns the `data:` payloads it completed.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.push_str(&String::from_utf8_lossy(chunk));

        let mut out = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = line.strip_prefix("data:") {
                out.push(data.trim_start().to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_data_payloads_and_ignores_other_fields() {
        let mut buf = SseLineBuffer::default();
        let lines = buf.push(b"event: message\ndata: {\"a\":1}\n\ndata: [DONE]\n");
        assert_eq!(lines, vec!["{\"a\":1}".to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn reassembles_events_split_across_chunks() {
        let mut buf = SseLineBuffer::default();
        assert!(buf.push(b"data: {\"te").is_empty());
        let lines = buf.push(b"xt\":\"hi\"}\r\n");
        assert_eq!(lines, vec!["{\"text\":\"hi\"}".to_string()]);
    }
}
