//! # Image Loader Tests
//!
//! Raw images become one region at the base address; ELF images yield one
//! region per executable section. The ELF fixtures are assembled in memory.

use std::path::Path;

use pretty_assertions::assert_eq;

use rvlift_core::common::LoadError;
use rvlift_core::loader::{CodeRegion, load_image, parse_image};

use crate::common::builder::to_bytes;

const EM_RISCV: u16 = 243;
const EM_X86_64: u16 = 62;
const TEXT_ADDR: u64 = 0x1_0000;

/// Builds a minimal ELF64 little-endian executable with a single `.text` section.
fn elf_with_text(machine: u16, text: &[u8]) -> Vec<u8> {
    const EHDR_SIZE: usize = 64;
    const SHDR_SIZE: usize = 64;
    let shstrtab = b"\0.text\0.shstrtab\0";

    let text_off = EHDR_SIZE;
    let strtab_off = text_off + text.len();
    let shoff = (strtab_off + shstrtab.len()).next_multiple_of(8);

    let mut out = Vec::new();
    out.extend_from_slice(b"\x7fELF");
    out.extend_from_slice(&[2, 1, 1, 0]);
    out.resize(16, 0);
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&machine.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&TEXT_ADDR.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&(shoff as u64).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&56u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(SHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&3u16.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    assert_eq!(out.len(), EHDR_SIZE);

    out.extend_from_slice(text);
    out.extend_from_slice(shstrtab);
    out.resize(shoff, 0);

    let mut section = |name: u32,
                       kind: u32,
                       flags: u64,
                       addr: u64,
                       offset: usize,
                       size: usize,
                       align: u64| {
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&addr.to_le_bytes());
        out.extend_from_slice(&(offset as u64).to_le_bytes());
        out.extend_from_slice(&(size as u64).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&align.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes());
    };
    section(0, 0, 0, 0, 0, 0, 0);
    // PROGBITS, ALLOC | EXECINSTR
    section(1, 1, 0x6, TEXT_ADDR, text_off, text.len(), 4);
    // STRTAB
    section(7, 3, 0, 0, strtab_off, shstrtab.len(), 1);
    out
}

#[test]
fn raw_image_is_single_region_at_base() {
    let data = to_bytes(&[0x02A0_0293, 0x0000_0013]);
    let regions = parse_image(Path::new("dir/boot.bin"), &data, 0x8000_0000).unwrap();
    assert_eq!(
        regions,
        vec![CodeRegion {
            name: "boot.bin".to_string(),
            address: 0x8000_0000,
            bytes: data,
        }]
    );
}

#[test]
fn misaligned_raw_base_is_kept() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rvlift_core=warn")
        .with_test_writer()
        .try_init();

    let data = to_bytes(&[0x0000_0013]);
    let regions = parse_image(Path::new("odd.bin"), &data, 0x1002).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].address, 0x1002);
}

#[test]
fn raw_image_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &to_bytes(&[0x0000_0013])).unwrap();

    let regions = load_image(file.path(), 0x400).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].address, 0x400);
    assert_eq!(regions[0].bytes, vec![0x13, 0, 0, 0]);
}

#[test]
fn elf_text_section_is_loaded_at_link_address() {
    let text = to_bytes(&[0x02A0_0293, 0x0000_8067]);
    let elf = elf_with_text(EM_RISCV, &text);

    let regions = parse_image(Path::new("a.out"), &elf, 0).unwrap();
    assert_eq!(
        regions,
        vec![CodeRegion {
            name: ".text".to_string(),
            address: TEXT_ADDR,
            bytes: text,
        }]
    );
}

#[test]
fn foreign_elf_is_rejected() {
    let elf = elf_with_text(EM_X86_64, &[0x90; 4]);
    let err = parse_image(Path::new("x86.elf"), &elf, 0).unwrap_err();
    assert!(matches!(err, LoadError::WrongArchitecture { .. }), "{err}");
}

#[test]
fn malformed_elf_is_object_error() {
    let mut data = b"\x7fELF".to_vec();
    data.extend_from_slice(&[2, 1, 1, 0, 0, 0]);
    let err = parse_image(Path::new("broken"), &data, 0).unwrap_err();
    assert!(matches!(err, LoadError::Object { .. }), "{err}");
}
