//! Server-sent-events framing.

use crate::CodecError;
use bytes::Bytes;
use serde::Serialize;

/// Content type of an SSE response.
pub const SSE_CONTENT_TYPE: &str = "text/event-stream";

/// Frame one event as an SSE data chunk: `data: <json>\n\n`.
pub fn sse_frame<T: Serialize>(event: &T) -> Result<Bytes, CodecError> {
    let json = serde_json::to_string(event).map_err(CodecError::Encode)?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunEvent;

    #[test]
    fn frames_event_as_sse_data() {
        let frame = sse_frame(&RunEvent::run_started("t-1", "r-1")).unwrap();
        assert_eq!(
            frame,
            Bytes::from("data: {\"type\":\"runStarted\",\"threadId\":\"t-1\",\"runId\":\"r-1\"}\n\n")
        );
    }

    #[test]
    fn frame_ends_with_blank_line() {
        let frame = sse_frame(&RunEvent::text_delta("m", "x")).unwrap();
        assert!(frame.ends_with(b"\n\n"));
        assert!(frame.starts_with(b"data: "));
    }
}
