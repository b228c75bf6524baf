use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use bincode::Options;
use log::debug;

use crate::{
    disk::{
        device::MbrDevice,
        mbr::MasterBootRecord,
        types::{MBR_OFFSET, MBR_SIZE},
    },
    error::{DiskError, Result},
};

/// A disk image file identified by its path. Every operation opens the file,
/// does its I/O and closes it again; no handle is kept between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskImage {
    path: PathBuf,
}

/// 固定宽度整数 + 小端序，数组不带长度前缀
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

pub fn encode_mbr(mbr: &MasterBootRecord) -> Result<Vec<u8>> {
    let bytes = codec()
        .serialize(mbr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    debug_assert_eq!(bytes.len(), MBR_SIZE);
    Ok(bytes)
}

pub fn decode_mbr(bytes: &[u8]) -> Result<MasterBootRecord> {
    if bytes.len() < MBR_SIZE {
        return Err(DiskError::Decode(format!(
            "expected {} bytes, found {}",
            MBR_SIZE,
            bytes.len()
        )));
    }
    codec()
        .deserialize(&bytes[..MBR_SIZE])
        .map_err(|e| DiskError::Decode(e.to_string()))
}

impl DiskImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Logical length of the image file in bytes.
    pub fn file_len(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

impl MbrDevice for DiskImage {
    fn read_mbr(&self) -> Result<MasterBootRecord> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(MBR_OFFSET))?;

        let mut buf = [0u8; MBR_SIZE];
        if let Err(e) = file.read_exact(&mut buf) {
            return Err(match e.kind() {
                io::ErrorKind::UnexpectedEof => DiskError::Decode(format!(
                    "{} is shorter than the {}-byte MBR",
                    self.path.display(),
                    MBR_SIZE
                )),
                _ => DiskError::Io(e),
            });
        }

        debug!("read MBR from {}", self.path.display());
        decode_mbr(&buf)
    }

    fn write_mbr(&self, mbr: &MasterBootRecord) -> Result<()> {
        let bytes = encode_mbr(mbr)?;

        // 只覆盖 MBR 区域：不创建、不截断
        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        file.seek(SeekFrom::Start(MBR_OFFSET))?;
        file.write_all(&bytes)?;
        file.flush()?;

        debug!("wrote MBR to {}", self.path.display());
        Ok(())
    }
}
