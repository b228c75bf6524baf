use std::{fs::File, io::Write};

use log::info;

use crate::{
    config::DISK_SIGNATURE,
    disk::{
        image::{encode_mbr, DiskImage},
        mbr::MasterBootRecord,
        types::{SizeUnit, MBR_OFFSET, MBR_SIZE},
    },
    error::{DiskError, Result},
    utils::creation_timestamp,
};

/// Creates (or overwrites) the image at `disk`'s path: sentinel byte, a fresh
/// MBR and a sparse tail up to `size` units.
///
/// A failure part way through leaves whatever was written so far.
pub fn create_disk(disk: &DiskImage, size: i64, unit: SizeUnit) -> Result<MasterBootRecord> {
    if unit == SizeUnit::Bytes {
        return Err(DiskError::InvalidParameter(
            "disk size unit must be K or M".to_string(),
        ));
    }
    let size_in_bytes = unit.to_bytes(size)?;
    create_disk_with_size(disk, size_in_bytes)
}

/// The image must hold at least the sentinel byte and the MBR; smaller sizes
/// are rejected before the file is touched.
pub fn create_disk_with_size(disk: &DiskImage, size_in_bytes: i64) -> Result<MasterBootRecord> {
    let min_size = MBR_OFFSET as i64 + MBR_SIZE as i64;
    if size_in_bytes < min_size {
        return Err(DiskError::InvalidParameter(format!(
            "disk size must be at least {} bytes, got {}",
            min_size, size_in_bytes
        )));
    }

    let mbr = MasterBootRecord::new(size_in_bytes, &creation_timestamp(), DISK_SIGNATURE);

    let mut file = File::create(disk.path())?;
    file.write_all(&[0u8; MBR_OFFSET as usize])?;
    file.write_all(&encode_mbr(&mbr)?)?;

    // 逻辑长度设为磁盘大小（稀疏分配）
    file.set_len(size_in_bytes as u64)?;
    file.flush()?;

    info!(
        "created disk {} ({} bytes)",
        disk.path().display(),
        size_in_bytes
    );
    Ok(mbr)
}
