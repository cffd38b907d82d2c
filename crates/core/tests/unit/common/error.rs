//! # Error Reporting Tests
//!
//! Display text and structured accessors of the crate's error types.

use std::path::Path;

use rvlift_core::common::{DecodeError, LoadError};
use rvlift_core::isa::try_decode;
use rvlift_core::loader::load_image;

#[test]
fn truncated_display() {
    let err = DecodeError::truncated(0x1000, 4, 2);
    assert_eq!(
        err.to_string(),
        "truncated instruction at 0x1000: need 4 bytes, have 2"
    );
    assert_eq!(err.address(), 0x1000);
    assert_eq!(err.word(), None);
}

#[test]
fn unknown_opcode_carries_word() {
    let err = try_decode(0xFFFF_FFFF, 0x20).unwrap_err();
    assert_eq!(err.address(), 0x20);
    assert_eq!(err.word(), Some(0xFFFF_FFFF));
    assert!(err.to_string().contains("unknown opcode"), "{err}");
    assert!(err.to_string().contains("0xffffffff"), "{err}");
}

#[test]
fn unknown_function_display_names_fields() {
    // bge-space funct3 0b010 under BRANCH
    let err = try_decode(0x0000_2063, 0x40).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("unknown function bits at 0x40"), "{text}");
    assert!(text.contains("funct3 0b010"), "{text}");
}

#[test]
fn decode_error_serializes_with_kind_tag() {
    let json = serde_json::to_value(DecodeError::truncated(8, 4, 1)).unwrap();
    assert_eq!(json["kind"], "truncated");
    assert_eq!(json["available"], 1);
}

#[test]
fn missing_image_is_io_error() {
    let err = load_image(Path::new("/nonexistent/image.bin"), 0).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/image.bin"), "{err}");
}
