//! Tests for payload construction, equality and the buffer view

mod common;

use common::*;
use std::collections::HashSet;

#[test]
fn test_empty_payload_is_all_zero() {
    let zero_init = Payload::from_bytes([0; PAYLOAD_SIZE]);
    let empty = Payload::new();

    assert_eq!(empty, zero_init);
    assert_eq!(Payload::default(), zero_init);
    assert_eq!(empty.as_bytes(), &[0u8; PAYLOAD_SIZE]);
}

#[test]
fn test_empty_payload_decodes_to_range_minimums() {
    let payload = Payload::new();

    assert_eq!(payload.version_control(), 0);
    assert!(!payload.battery_ok());
    assert_eq!(payload.temperature(), -50.0);
    assert_eq!(payload.humidity(), 0.0);
    assert_eq!(payload.gas_level(), 0.0);
    assert_eq!(payload.gps_coordinates(), GpsCoords::new(-180.0, -180.0));
}

#[test]
fn test_copy_gives_same_payload() {
    let original = populated_payload();
    let copy = original;

    assert_eq!(copy, original);
}

#[test]
fn test_copies_are_independent() {
    let original = populated_payload();
    let mut copy = original;
    copy.set_version_control(9);

    assert_eq!(original.version_control(), 2);
    assert_eq!(copy.version_control(), 9);
    assert_ne!(copy, original);
}

#[test]
fn test_array_constructor_keeps_bytes() {
    let payload = Payload::from_bytes(TEST_ARRAY);

    assert_eq!(payload.size(), PAYLOAD_SIZE);
    assert_eq!(payload.as_bytes(), &TEST_ARRAY);
    assert_eq!(payload.as_ref(), &TEST_ARRAY[..]);
    assert_eq!(payload.into_bytes(), TEST_ARRAY);
    assert_eq!(<[u8; PAYLOAD_SIZE]>::from(Payload::from(TEST_ARRAY)), TEST_ARRAY);
}

#[test]
fn test_array_constructor_does_not_validate() {
    // Reserved bits set and every encoded value at its maximum
    let payload = Payload::from_bytes([0xFF; PAYLOAD_SIZE]);

    assert_eq!(payload.raw_field(Field::Reserved), 0b111);
    assert_eq!(payload.version_control(), 15);
    assert!(payload.battery_ok());
    assert_eq!(payload.raw_field(Field::Temperature), 1023);
    // Out-of-domain decodes are returned as they are
    assert!(payload.gps_coordinates().latitude > 180.0);
    assert!(payload.gps_coordinates().longitude > 180.0);
}

#[test]
fn test_equality_is_bytewise() {
    let first = Payload::from_bytes(TEST_ARRAY);
    let copy = first;
    assert!(copy == first);

    let mut different = TEST_ARRAY;
    different[0] = 1;
    assert!(Payload::from_bytes(different) != first);
}

#[test]
fn test_equality_sees_reserved_bits() {
    // Same decoded values, different reserved bits
    let plain = payload_with_byte(0, 0xA0);
    let with_reserved = payload_with_byte(0, 0xA5);

    assert_eq!(plain.reading(), with_reserved.reading());
    assert_ne!(plain, with_reserved);
}

#[test]
fn test_equality_is_sensitive_to_every_bit() {
    let base = Payload::from_bytes(TEST_ARRAY);
    for index in 0..PAYLOAD_SIZE {
        for bit in 0..8 {
            let mut bytes = TEST_ARRAY;
            bytes[index] ^= 1 << bit;
            let flipped = Payload::from_bytes(bytes);
            assert_ne!(flipped, base, "flipping byte {} bit {} went unnoticed", index, bit);
            assert_ne!(base, flipped);
        }
    }
}

#[test]
fn test_equality_is_an_equivalence() {
    let a = Payload::from_bytes(TEST_ARRAY);
    let b = Payload::from_bytes(TEST_ARRAY);
    let c = Payload::try_from(&TEST_ARRAY[..]).unwrap();

    assert_eq!(a, a);
    assert_eq!(a == b, b == a);
    assert!(a == b && b == c && a == c);
}

#[test]
fn test_hash_follows_bytes() {
    let mut set = HashSet::new();
    set.insert(Payload::from_bytes(TEST_ARRAY));
    set.insert(Payload::from_bytes(TEST_ARRAY));
    set.insert(Payload::new());

    assert_eq!(set.len(), 2);
}

#[test]
fn test_slice_constructor_checks_length() {
    let test_cases: Vec<(&[u8], &str)> = vec![
        (&[], "Empty slice"),
        (&TEST_ARRAY[..9], "9 byte slice"),
        (&[0u8; 11], "11 byte slice"),
    ];

    for (bytes, description) in test_cases {
        match Payload::try_from(bytes) {
            Err(PayloadError::InvalidLength { expected, actual }) => {
                assert_eq!(expected, PAYLOAD_SIZE, "{}", description);
                assert_eq!(actual, bytes.len(), "{}", description);
            }
            other => panic!("{}: expected InvalidLength, got {:?}", description, other),
        }
    }
}

#[test]
fn test_bytes_conversion() {
    let payload = Payload::try_from(Bytes::from_static(&TEST_ARRAY)).expect("10 bytes should parse");
    assert_eq!(payload.as_bytes(), &TEST_ARRAY);

    let bytes = Bytes::from(payload);
    assert_eq!(bytes.as_ref(), &TEST_ARRAY);

    assert!(matches!(
        Payload::try_from(Bytes::from_static(&[1, 2, 3])),
        Err(PayloadError::InvalidLength { actual: 3, .. })
    ));
}

#[test]
fn test_hex_conversion() {
    let payload = Payload::from_hex("a000006e33048c0c74dd").expect("valid hex");
    assert_eq!(payload.as_bytes(), &[160, 0, 0, 110, 51, 4, 140, 12, 116, 221]);
    assert_eq!(payload.to_hex(), "a000006e33048c0c74dd");
    assert_eq!(payload.to_string(), "a000006e33048c0c74dd");

    let spaced = Payload::from_hex("  0xA0 00 00 6E 33 04 8C 0C 74 DD\n").expect("spaced hex");
    assert_eq!(spaced, payload);
}

#[test]
fn test_hex_conversion_errors() {
    assert!(matches!(Payload::from_hex("zz"), Err(PayloadError::InvalidHex(_))));
    assert!(matches!(Payload::from_hex("abc"), Err(PayloadError::InvalidHex(_))));
    assert!(matches!(
        Payload::from_hex("a000"),
        Err(PayloadError::InvalidLength { expected: 10, actual: 2 })
    ));
}

#[test]
fn test_debug_shows_hex_bytes() {
    let payload = payload_with_byte(0, 0xA0);
    assert_eq!(
        format!("{:?}", payload),
        "Payload([a0, 00, 00, 00, 00, 00, 00, 00, 00, 00])"
    );
}
