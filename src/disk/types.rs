use std::{fmt, str::FromStr};

use crate::error::{DiskError, Result};

/// 镜像开头的保留字节（哨兵），MBR 紧随其后
pub const MBR_OFFSET: u64 = 1;

/// 分区表槽位数量
pub const PARTITION_SLOTS: usize = 4;

pub const TIMESTAMP_LEN: usize = 20;
pub const PARTITION_NAME_LEN: usize = 16;

/// status(1) + type(1) + fit(1) + start(8) + size(8) + name(16)
pub const PARTITION_ENTRY_SIZE: usize = 3 + 8 + 8 + PARTITION_NAME_LEN;

/// size(8) + timestamp(20) + signature(8) + 4 entries
pub const MBR_SIZE: usize = 8 + TIMESTAMP_LEN + 8 + PARTITION_SLOTS * PARTITION_ENTRY_SIZE;

pub const STATUS_FREE: u8 = 0;
pub const STATUS_OCCUPIED: u8 = 1;

pub const KIB: i64 = 1024;
pub const MIB: i64 = 1024 * 1024;

/// Unit suffix accepted by MKDISK/FDISK size parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
}

impl SizeUnit {
    pub fn multiplier(self) -> i64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => KIB,
            SizeUnit::Megabytes => MIB,
        }
    }

    /// Converts `size` units to bytes. Sizes must be positive and the product
    /// must fit in an `i64`.
    pub fn to_bytes(self, size: i64) -> Result<i64> {
        if size <= 0 {
            return Err(DiskError::InvalidParameter(format!(
                "size must be positive, got {}",
                size
            )));
        }
        size.checked_mul(self.multiplier()).ok_or_else(|| {
            DiskError::InvalidParameter(format!("size {}{} is too large", size, self))
        })
    }
}

impl FromStr for SizeUnit {
    type Err = DiskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" => Ok(SizeUnit::Bytes),
            "K" => Ok(SizeUnit::Kilobytes),
            "M" => Ok(SizeUnit::Megabytes),
            other => Err(DiskError::InvalidParameter(format!("unknown unit '{}'", other))),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kilobytes => "K",
            SizeUnit::Megabytes => "M",
        };
        f.write_str(suffix)
    }
}

/// Disk sizes only come in K or M; bytes are rejected.
pub fn calculate_disk_size(size: i64, unit: &str) -> Result<i64> {
    match unit.parse::<SizeUnit>()? {
        SizeUnit::Bytes => Err(DiskError::InvalidParameter(
            "disk size unit must be K or M".to_string(),
        )),
        unit => unit.to_bytes(size),
    }
}
