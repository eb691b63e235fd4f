//! Incremental UTF-8 decoding for streamed reply bodies.
//!
//! Chunk boundaries are wherever the network put them, so a multi-byte
//! character can straddle two chunks. The tail of an incomplete sequence is
//! held back and prefixed to the next chunk. Bytes that can never form valid
//! UTF-8 are a decode error.

use super::client::TransportError;

#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `pending + chunk` as forms complete characters.
    /// May return an empty string when the chunk only extends a held-back
    /// sequence.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, TransportError> {
        self.pending.extend_from_slice(chunk);

        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Ok(text)
            }
            Err(e) if e.error_len().is_none() => {
                // Incomplete sequence at the end: keep it for the next chunk.
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                Ok(text)
            }
            Err(e) => Err(TransportError::Decode(format!(
                "invalid UTF-8 in stream after {} bytes",
                e.valid_up_to()
            ))),
        }
    }

    /// Call once the stream has ended. Leftover bytes mean the body was
    /// cut off in the middle of a character.
    pub fn finish(self) -> Result<(), TransportError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(TransportError::Decode(format!(
                "stream ended inside a multi-byte character ({} dangling bytes)",
                self.pending.len()
            )))
        }
    }
}
