use super::SerializeConfig;
use crate::ParseError;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// Identifies frames of this protocol on the wire.
pub const MAGIC_NUMBER: u32 = 0x6666_6666;

const FIXED_SIZE: u32 = 4 + 1 + 4 + 1 + 2;
const CHECKSUM_SIZE: u32 = 4;

/// Bit-set of per-frame options.
///
/// Currently a single option is defined: whether the header carries a CRC32
/// checksum over the message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeFlag(u8);

impl SerializeFlag {
    const HAS_CHECKSUM: u8 = 1;

    /// No options set.
    pub const NONE: SerializeFlag = SerializeFlag(0);

    /// Returns whether the checksum field is present in the encoded header.
    pub fn has_checksum(self) -> bool {
        self.0 & Self::HAS_CHECKSUM != 0
    }
    /// Builder-method for switching the checksum field on.
    #[must_use]
    pub fn with_checksum(self) -> Self {
        Self(self.0 | Self::HAS_CHECKSUM)
    }
    /// The raw bit pattern; unknown bits are preserved on decode.
    pub fn bits(self) -> u8 {
        self.0
    }
    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

/// The fixed-plus-variable message header that prefixes every frame.
///
/// Layout on the wire (network byte order):
/// magic (4), version (1), `message_length` (4), flag (1),
/// checksum (4, present iff the flag says so), `field_count` (2).
/// `message_length` counts the body only, the header is not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeHeader {
    /// Protocol version.
    pub version: u8,
    /// Number of body bytes following the header.
    pub message_length: u32,
    /// Per-frame options.
    pub flag: SerializeFlag,
    /// CRC32 (IEEE) over the body; 0 when the flag is clear.
    pub checksum: u32,
    /// Number of top-level fields in the body; not validated on decode.
    pub field_count: u16,
}

impl SerializeHeader {
    /// Describes the given body: length, field count, and, if requested,
    /// a CRC32 checksum.
    pub fn for_body(body: &[u8], with_checksum: bool, field_count: u16) -> Self {
        let flag = if with_checksum {
            SerializeFlag::NONE.with_checksum()
        } else {
            SerializeFlag::NONE
        };
        #[allow(clippy::cast_possible_truncation)]
        Self {
            version: crate::PROTOCOL_VERSION,
            message_length: body.len() as u32,
            flag,
            checksum: if with_checksum { crc32fast::hash(body) } else { 0 },
            field_count,
        }
    }

    /// The smallest number of bytes an encoded header can occupy
    /// (i.e. without the optional checksum field).
    pub fn min_serialized_byte_array_size() -> u32 {
        FIXED_SIZE
    }

    /// The number of bytes this header occupies when encoded,
    /// including the optional checksum field.
    pub fn serialized_size(&self) -> u32 {
        if self.flag.has_checksum() {
            FIXED_SIZE + CHECKSUM_SIZE
        } else {
            FIXED_SIZE
        }
    }

    pub fn emit(&self, w: &mut dyn std::io::Write) -> std::io::Result<()> {
        w.write_u32::<BigEndian>(MAGIC_NUMBER)?;
        w.write_u8(self.version)?;
        w.write_u32::<BigEndian>(self.message_length)?;
        w.write_u8(self.flag.bits())?;
        if self.flag.has_checksum() {
            w.write_u32::<BigEndian>(self.checksum)?;
        }
        w.write_u16::<BigEndian>(self.field_count)?;
        Ok(())
    }

    /// Decodes a header from the beginning of `data`.
    ///
    /// Returns the header and the number of bytes it occupied.
    /// `ParseError::Short` means more bytes have to arrive before a decision
    /// can be made; `BadMagic` and `OverLength` discredit the stream.
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse(data: &[u8], config: &SerializeConfig) -> Result<(Self, usize), ParseError> {
        if data.len() < FIXED_SIZE as usize {
            return Err(ParseError::Short);
        }
        let mut rdr = data;
        let magic = rdr.read_u32::<BigEndian>().map_err(|_| ParseError::Short)?;
        if magic != MAGIC_NUMBER {
            return Err(ParseError::BadMagic { found: magic });
        }
        let version = rdr.read_u8().map_err(|_| ParseError::Short)?;
        let message_length = rdr.read_u32::<BigEndian>().map_err(|_| ParseError::Short)?;
        let flag = SerializeFlag::from_bits(rdr.read_u8().map_err(|_| ParseError::Short)?);
        if message_length > config.max_message_length() {
            return Err(ParseError::OverLength {
                length: u64::from(message_length),
                max: u64::from(config.max_message_length()),
            });
        }
        let checksum = if flag.has_checksum() {
            rdr.read_u32::<BigEndian>().map_err(|_| ParseError::Short)?
        } else {
            0
        };
        let field_count = rdr.read_u16::<BigEndian>().map_err(|_| ParseError::Short)?;

        let header = Self {
            version,
            message_length,
            flag,
            checksum,
            field_count,
        };
        Ok((header, header.serialized_size() as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::{SerializeConfig, SerializeFlag, SerializeHeader};
    use crate::ParseError;

    fn encode(h: &SerializeHeader) -> Vec<u8> {
        let mut buf = Vec::new();
        h.emit(&mut buf).unwrap();
        buf
    }

    #[test]
    fn roundtrip_without_checksum() {
        let header = SerializeHeader {
            version: 1,
            message_length: 77,
            flag: SerializeFlag::NONE,
            checksum: 0,
            field_count: 6,
        };
        let bytes = encode(&header);
        assert_eq!(bytes.len(), 12);
        let (parsed, consumed) = SerializeHeader::parse(&bytes, &SerializeConfig::default()).unwrap();
        assert_eq!(consumed, 12);
        assert_eq!(parsed, header);
    }

    #[test]
    fn roundtrip_with_checksum() {
        let header = SerializeHeader::for_body(b"abc", true, 3);
        assert_eq!(header.serialized_size(), 16);
        let bytes = encode(&header);
        let (parsed, consumed) = SerializeHeader::parse(&bytes, &SerializeConfig::default()).unwrap();
        assert_eq!(consumed, 16);
        assert_eq!(parsed, header);
        assert_eq!(parsed.checksum, crc32fast::hash(b"abc"));
    }

    #[test]
    fn encode_of_parse_is_prefix() {
        let header = SerializeHeader::for_body(&[9; 20], false, 2);
        let mut bytes = encode(&header);
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        let (parsed, consumed) = SerializeHeader::parse(&bytes, &SerializeConfig::default()).unwrap();
        assert_eq!(encode(&parsed), bytes[..consumed].to_vec());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode(&SerializeHeader::for_body(b"xy", false, 1));
        bytes[0] = 0;
        assert_eq!(
            SerializeHeader::parse(&bytes, &SerializeConfig::default()),
            Err(ParseError::BadMagic { found: 0x0066_6666 })
        );
    }

    #[test]
    fn rejects_over_length() {
        let config = SerializeConfig::default().with_max_message_length(100);
        let header = SerializeHeader {
            version: 1,
            message_length: 101,
            flag: SerializeFlag::NONE,
            checksum: 0,
            field_count: 0,
        };
        assert!(matches!(
            SerializeHeader::parse(&encode(&header), &config),
            Err(ParseError::OverLength { length: 101, max: 100 })
        ));
    }

    #[test]
    fn short_input_asks_for_more() {
        let bytes = encode(&SerializeHeader::for_body(b"xy", true, 1));
        assert_eq!(
            SerializeHeader::parse(&bytes[..11], &SerializeConfig::default()),
            Err(ParseError::Short)
        );
        // the fixed prefix is there, but the checksum field is not yet
        assert_eq!(
            SerializeHeader::parse(&bytes[..13], &SerializeConfig::default()),
            Err(ParseError::Short)
        );
    }
}
