//! # Address Arithmetic Tests
//!
//! `VirtAddr` offsets model the program counter: signed displacements and
//! forward advances both wrap modulo 2^64.

use rvlift_core::common::VirtAddr;

#[test]
fn offset_applies_signed_displacement() {
    assert_eq!(VirtAddr::new(0x1000).offset(8).val(), 0x1008);
    assert_eq!(VirtAddr::new(0x1000).offset(-8).val(), 0x0FF8);
}

#[test]
fn offset_wraps_at_both_ends() {
    assert_eq!(VirtAddr::new(0).offset(-4).val(), u64::MAX - 3);
    assert_eq!(VirtAddr::new(u64::MAX).offset(1).val(), 0);
}

#[test]
fn advance_wraps() {
    assert_eq!(VirtAddr::new(u64::MAX - 1).advance(4).val(), 2);
}

#[test]
fn alignment() {
    assert!(VirtAddr::new(0x1000).is_aligned(4));
    assert!(!VirtAddr::new(0x1002).is_aligned(4));
    assert!(VirtAddr::new(0x1002).is_aligned(2));
}

#[test]
fn conversions_and_display() {
    let addr = VirtAddr::from(0x8000_0000u64);
    assert_eq!(u64::from(addr), 0x8000_0000);
    assert_eq!(addr.to_string(), "0x80000000");
}
