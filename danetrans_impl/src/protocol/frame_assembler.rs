use super::{SerializeConfig, SerializeHeader};
use crate::ParseError;
use std::collections::VecDeque;

// Largest possible encoded header size; enough look-ahead for a parse decision.
const MAX_HEADER_SIZE: usize = 16;

/// Reconstructs whole frames from an arbitrarily chunked byte stream.
///
/// Bytes go in through [`push_data`](FrameAssembler::push_data); whole frames
/// (header bytes plus body bytes) come out through
/// [`pop_frame`](FrameAssembler::pop_frame). The assembler holds at most one
/// frame in flight plus whatever tail bytes have not yet been consumed.
///
/// On a magic-number mismatch the assembler discards a single byte and
/// retries, so a stream resynchronizes at the next genuine frame boundary.
/// A header that declares an over-long body discredits the whole buffer:
/// the buffered bytes are dropped and the error is handed to the caller,
/// which typically tears the connection down.
#[derive(Debug)]
pub struct FrameAssembler {
    config: SerializeConfig,
    buffer: VecDeque<u8>,
    current_frame: Vec<u8>,
    current_header: Option<SerializeHeader>,
    remaining: usize,
}

impl FrameAssembler {
    pub fn new(config: SerializeConfig) -> Self {
        Self {
            config,
            buffer: VecDeque::new(),
            current_frame: Vec::new(),
            current_header: None,
            remaining: 0,
        }
    }

    /// Appends newly received bytes.
    pub fn push_data(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Number of bytes buffered but not yet part of a popped frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.current_frame.len()
    }

    /// Abandons the frame currently in flight, keeping the tail buffer.
    pub fn clear_current_frame(&mut self) {
        self.current_frame.clear();
        self.current_header = None;
        self.remaining = 0;
    }

    /// Returns the next whole frame, if the buffered bytes contain one.
    ///
    /// Non-blocking: `Ok(None)` means more bytes have to arrive. An `Err`
    /// means the stream is discredited; the internal state is cleared and the
    /// connection should be closed upstream.
    pub fn pop_frame(&mut self) -> Result<Option<Vec<u8>>, ParseError> {
        if self.current_header.is_none() && !self.try_parse_header()? {
            return Ok(None);
        }

        // collect body bytes
        let take = self.remaining.min(self.buffer.len());
        self.current_frame.extend(self.buffer.drain(..take));
        self.remaining -= take;
        if self.remaining > 0 {
            return Ok(None);
        }

        let frame = std::mem::take(&mut self.current_frame);
        self.current_header = None;
        trace!("FrameAssembler: assembled frame of {} bytes", frame.len());
        Ok(Some(frame))
    }

    // Attempts to decode a header from the buffer front, resynchronizing on
    // bad magic. Returns false if more bytes are needed.
    #[allow(clippy::cast_possible_truncation)]
    fn try_parse_header(&mut self) -> Result<bool, ParseError> {
        loop {
            if self.buffer.len() < SerializeHeader::min_serialized_byte_array_size() as usize {
                return Ok(false);
            }
            let scratch: Vec<u8> = self.buffer.iter().take(MAX_HEADER_SIZE).copied().collect();
            match SerializeHeader::parse(&scratch, &self.config) {
                Ok((header, consumed)) => {
                    // keep the header bytes, the frame is returned in full
                    self.current_frame.extend(self.buffer.drain(..consumed));
                    self.remaining = header.message_length as usize;
                    self.current_header = Some(header);
                    return Ok(true);
                }
                Err(ParseError::Short) => return Ok(false),
                Err(ParseError::BadMagic { found }) => {
                    trace!("FrameAssembler: resyncing, dropped one byte of {found:#010x}");
                    self.buffer.pop_front();
                }
                Err(e) => {
                    warn!("FrameAssembler: discarding {} buffered bytes: {e}", self.buffer.len());
                    self.buffer.clear();
                    self.clear_current_frame();
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameAssembler;
    use crate::protocol::{SerializeConfig, SerializeHeader};
    use crate::ParseError;

    fn frame(body: &[u8]) -> Vec<u8> {
        let header = SerializeHeader::for_body(body, false, 1);
        let mut bytes = Vec::new();
        header.emit(&mut bytes).unwrap();
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn whole_frame_in_one_push() {
        let mut assembler = FrameAssembler::new(SerializeConfig::default());
        let bytes = frame(b"hello");
        assembler.push_data(&bytes);
        assert_eq!(assembler.pop_frame().unwrap(), Some(bytes));
        assert_eq!(assembler.pop_frame().unwrap(), None);
    }

    #[test]
    fn partial_reads_three_chunks() {
        let mut assembler = FrameAssembler::new(SerializeConfig::default());
        let bytes = frame(b"partial read scenario");
        assembler.push_data(&bytes[..3]);
        assert_eq!(assembler.pop_frame().unwrap(), None);
        assembler.push_data(&bytes[3..10]);
        assert_eq!(assembler.pop_frame().unwrap(), None);
        assembler.push_data(&bytes[10..]);
        assert_eq!(assembler.pop_frame().unwrap(), Some(bytes));
    }

    #[test]
    fn resyncs_after_leading_garbage() {
        let mut assembler = FrameAssembler::new(SerializeConfig::default());
        let bytes = frame(b"still here");
        assembler.push_data(&[0x00, 0x00, 0x00, 0x00]);
        assembler.push_data(&bytes);
        assert_eq!(assembler.pop_frame().unwrap(), Some(bytes));
    }

    #[test]
    fn over_length_discards_buffer() {
        let config = SerializeConfig::default().with_max_message_length(40 * 1024 * 1024);
        let mut assembler = FrameAssembler::new(config);
        let header = SerializeHeader {
            version: 1,
            message_length: 100 * 1024 * 1024,
            flag: crate::protocol::SerializeFlag::NONE,
            checksum: 0,
            field_count: 0,
        };
        let mut bytes = Vec::new();
        header.emit(&mut bytes).unwrap();
        bytes.extend_from_slice(&[7; 32]);
        assembler.push_data(&bytes);
        assert!(matches!(
            assembler.pop_frame(),
            Err(ParseError::OverLength { .. })
        ));
        assert_eq!(assembler.buffered_len(), 0);
    }

    #[test]
    fn conservation_over_many_frames() {
        let mut assembler = FrameAssembler::new(SerializeConfig::default());
        let mut pushed = Vec::new();
        for i in 0..10_u8 {
            pushed.extend_from_slice(&frame(&vec![i; usize::from(i) * 3]));
        }
        // feed in uneven chunks
        for chunk in pushed.chunks(7) {
            assembler.push_data(chunk);
        }
        let mut popped = Vec::new();
        while let Some(f) = assembler.pop_frame().unwrap() {
            popped.extend_from_slice(&f);
        }
        popped.extend(assembler.buffer.iter());
        assert_eq!(popped, pushed);
    }
}
