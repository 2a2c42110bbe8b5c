mod test_utils;

use danetrans::{ParseError, SerializeConfig, SerializeFlag, SerializeHeader, TransResult};
use log::*;
use rand::Rng;

#[test]
fn test_010_header() -> TransResult<()> {
    let mut _log_handle = test_utils::init_logger();
    parse_of_encode_is_identity()?;
    encode_of_parse_is_prefix()?;
    min_size_is_twelve();
    random_headers_roundtrip()?;
    over_length_is_rejected();
    info!("header tests passed");
    Ok(())
}

fn encode(header: &SerializeHeader) -> Vec<u8> {
    let mut bytes = Vec::new();
    header.emit(&mut bytes).unwrap();
    bytes
}

fn parse_of_encode_is_identity() -> TransResult<()> {
    let header = SerializeHeader {
        version: 1,
        message_length: 4711,
        flag: SerializeFlag::NONE.with_checksum(),
        checksum: 0xDEAD_BEEF,
        field_count: 6,
    };
    let (parsed, consumed) = SerializeHeader::parse(&encode(&header), &SerializeConfig::default())?;
    assert_eq!(parsed, header);
    assert_eq!(consumed as u32, header.serialized_size());
    Ok(())
}

fn encode_of_parse_is_prefix() -> TransResult<()> {
    let header = SerializeHeader::for_body(b"some body", false, 3);
    let mut bytes = encode(&header);
    bytes.extend_from_slice(b"some body");
    let (parsed, consumed) = SerializeHeader::parse(&bytes, &SerializeConfig::default())?;
    assert_eq!(encode(&parsed), bytes[..consumed].to_vec());
    Ok(())
}

fn min_size_is_twelve() {
    assert_eq!(SerializeHeader::min_serialized_byte_array_size(), 12);
    assert_eq!(SerializeHeader::for_body(b"x", false, 1).serialized_size(), 12);
    assert_eq!(SerializeHeader::for_body(b"x", true, 1).serialized_size(), 16);
}

fn random_headers_roundtrip() -> TransResult<()> {
    let config = SerializeConfig::default();
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let with_checksum: bool = rng.gen();
        let header = SerializeHeader {
            version: rng.gen(),
            message_length: rng.gen_range(0..=config.max_message_length()),
            flag: if with_checksum {
                SerializeFlag::NONE.with_checksum()
            } else {
                SerializeFlag::NONE
            },
            checksum: if with_checksum { rng.gen() } else { 0 },
            field_count: rng.gen(),
        };
        let (parsed, _) = SerializeHeader::parse(&encode(&header), &config)?;
        assert_eq!(parsed, header);
    }
    Ok(())
}

fn over_length_is_rejected() {
    let config = SerializeConfig::default().with_max_message_length(1024);
    let header = SerializeHeader {
        version: 1,
        message_length: 1025,
        flag: SerializeFlag::NONE,
        checksum: 0,
        field_count: 0,
    };
    assert!(matches!(
        SerializeHeader::parse(&encode(&header), &config),
        Err(ParseError::OverLength { length: 1025, max: 1024 })
    ));
}
