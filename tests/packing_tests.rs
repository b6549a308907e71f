//! Tests for payload byte layout: varint ids, mask bytes and clipping.

use idmask::core::{base64url, encode_payload, varint};
use idmask::{decode_token, Catalog, CatalogSet, SelectionState, TOKEN_PREFIX};

fn catalog_with(ids: &[u32], components: usize) -> Catalog {
    Catalog::from_sets(
        ids.iter()
            .map(|&id| {
                CatalogSet::new(
                    id,
                    format!("Set {}", id),
                    (0..components).map(|i| format!("C{}", i)).collect(),
                    false,
                )
            })
            .collect(),
    )
}

#[test]
fn test_id_varint_widths() {
    struct TestCase {
        id: u32,
        expected_payload: Vec<u8>,
    }

    let test_cases = vec![
        TestCase { id: 0, expected_payload: vec![0x00, 0x01] },
        TestCase { id: 127, expected_payload: vec![0x7F, 0x01] },
        TestCase { id: 128, expected_payload: vec![0x80, 0x01, 0x01] },
        TestCase { id: 16_383, expected_payload: vec![0xFF, 0x7F, 0x01] },
        TestCase { id: 16_384, expected_payload: vec![0x80, 0x80, 0x01, 0x01] },
        TestCase { id: u32::MAX, expected_payload: vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 0x01] },
    ];

    for test_case in test_cases {
        let catalog = catalog_with(&[test_case.id], 4);
        let mut selection = SelectionState::new();
        selection.insert(test_case.id, 0x01);

        assert_eq!(
            encode_payload(&selection, &catalog, false),
            test_case.expected_payload,
            "Payload mismatch for id {}",
            test_case.id
        );
    }
}

#[test]
fn test_clipping_by_component_count() {
    let test_cases = vec![
        (0usize, 0xFFu8, None),
        (1, 0xFF, Some(0x01)),
        (3, 0b1111_1010, Some(0b010)),
        (3, 0b1111_1000, None),
        (7, 0xFF, Some(0x7F)),
        (8, 0xFF, Some(0xFF)),
        (12, 0xA5, Some(0xA5)),
    ];

    for (components, mask, expected) in test_cases {
        let catalog = catalog_with(&[5], components);
        let mut selection = SelectionState::new();
        selection.insert(5, mask);

        let payload = encode_payload(&selection, &catalog, false);
        match expected {
            Some(clipped) => assert_eq!(payload, vec![0x05, clipped], "{} components", components),
            None => assert!(payload.is_empty(), "{} components should drop the entry", components),
        }
    }
}

#[test]
fn test_payload_has_no_framing() {
    let catalog = catalog_with(&[1, 2, 3], 8);
    let mut selection = SelectionState::new();
    selection.insert(3, 0x30);
    selection.insert(1, 0x10);
    selection.insert(2, 0x20);

    let payload = encode_payload(&selection, &catalog, false);
    assert_eq!(payload, vec![0x01, 0x10, 0x02, 0x20, 0x03, 0x30]);
}

#[test]
fn test_overlong_varint_accepted_on_decode() {
    // id 1 written as a three-byte varint
    let payload = [0x81, 0x80, 0x00, 0x07];
    let token = format!("{}{}", TOKEN_PREFIX, base64url::encode(&payload));

    assert_eq!(decode_token(&token).mask(1), 0x07);
}

#[test]
fn test_varint_decode_sequence() {
    let mut bytes = Vec::new();
    for n in [0u64, 1, 300, 70_000, u32::MAX as u64] {
        varint::encode_into(n, &mut bytes);
    }

    let mut offset = 0;
    let mut values = Vec::new();
    while offset < bytes.len() {
        let (value, next) = varint::decode(&bytes, offset);
        values.push(value.unwrap());
        offset = next;
    }
    assert_eq!(values, vec![0, 1, 300, 70_000, u32::MAX as u64]);
}

#[test]
fn test_token_body_is_url_safe() {
    let catalog = catalog_with(&(0..64).collect::<Vec<_>>(), 8);
    let mut selection = SelectionState::new();
    for id in 0..64 {
        selection.insert(id, 0xFB);
    }

    let body = base64url::encode(&encode_payload(&selection, &catalog, false));
    assert!(body
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}
