//! Code Image Loader.
//!
//! This module reads a file from disk and splits it into code regions to sweep. It performs:
//! 1. **ELF detection:** Files starting with the ELF magic are parsed as 64-bit little-endian
//!    ELF; every executable section becomes a region at its link address.
//! 2. **Raw fallback:** Any other file is a single region at the configured base address.
//!
//! Regions that do not start on an instruction boundary are still returned, with a warning.

use std::fs;
use std::path::Path;

use object::read::elf::ElfFile64;
use object::{Architecture, LittleEndian, Object, ObjectSection, SectionKind};
use tracing::{debug, warn};

use crate::common::{INSTRUCTION_SIZE, LoadError, VirtAddr};

/// ELF identification magic.
const ELF_MAGIC: &[u8] = b"\x7fELF";

/// A contiguous run of code bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeRegion {
    /// Section name, or the file name for raw images.
    pub name: String,
    /// Address of the first byte.
    pub address: u64,
    /// Region contents.
    pub bytes: Vec<u8>,
}

/// Loads a code image from disk.
///
/// # Arguments
///
/// * `path` - Path to an ELF file or a raw binary.
/// * `base_address` - Load address used when the file is not ELF.
///
/// # Returns
///
/// The code regions of the image, in file order.
pub fn load_image(path: &Path, base_address: u64) -> Result<Vec<CodeRegion>, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_image(path, &data, base_address)
}

/// Splits an in-memory image into code regions.
///
/// `path` is used only for naming and error reports.
pub fn parse_image(
    path: &Path,
    data: &[u8],
    base_address: u64,
) -> Result<Vec<CodeRegion>, LoadError> {
    if !data.starts_with(ELF_MAGIC) {
        debug!(path = %path.display(), base_address, "loading raw image");
        let name = path
            .file_name()
            .map_or_else(|| "raw".to_string(), |n| n.to_string_lossy().into_owned());
        let region = CodeRegion {
            name,
            address: base_address,
            bytes: data.to_vec(),
        };
        warn_if_misaligned(&region);
        return Ok(vec![region]);
    }

    let object_err = |source| LoadError::Object {
        path: path.to_path_buf(),
        source,
    };
    let elf: ElfFile64<'_, LittleEndian> = ElfFile64::parse(data).map_err(object_err)?;
    if elf.architecture() != Architecture::Riscv64 {
        return Err(LoadError::WrongArchitecture {
            path: path.to_path_buf(),
            arch: format!("{:?}", elf.architecture()),
        });
    }

    let mut regions = Vec::new();
    for section in elf.sections() {
        if section.kind() != SectionKind::Text {
            continue;
        }
        let name = section.name().map_err(object_err)?.to_string();
        let bytes = section.data().map_err(object_err)?.to_vec();
        debug!(section = %name, address = section.address(), len = bytes.len(), "code section");
        let region = CodeRegion {
            name,
            address: section.address(),
            bytes,
        };
        warn_if_misaligned(&region);
        regions.push(region);
    }
    Ok(regions)
}

fn warn_if_misaligned(region: &CodeRegion) {
    let start = VirtAddr::new(region.address);
    if !start.is_aligned(INSTRUCTION_SIZE) {
        warn!(region = %region.name, address = %start, "code region is not 4-byte aligned");
    }
}
