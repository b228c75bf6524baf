use serde::{Deserialize, Serialize};

use crate::disk::types::{
    PARTITION_NAME_LEN, PARTITION_SLOTS, STATUS_FREE, STATUS_OCCUPIED, TIMESTAMP_LEN,
};

/// One slot of the partition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    pub status: u8, // 0 = 空闲，非 0 = 已占用
    pub part_type: u8, // 保留
    pub fit: u8,    // 保留
    pub start: i64, // 数据区在镜像中的起始偏移（字节）
    pub size: i64,  // 数据区长度（字节）
    pub name: [u8; PARTITION_NAME_LEN],
}

impl PartitionEntry {
    /// Builds an occupied entry. `name` is truncated to the 16-byte field on a
    /// character boundary and zero padded.
    pub fn occupied(start: i64, size: i64, name: &str) -> Self {
        Self {
            status: STATUS_OCCUPIED,
            part_type: 0,
            fit: 0,
            start,
            size,
            name: encode_name(name),
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == STATUS_FREE
    }

    /// Name with the zero padding stripped.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(strip_padding(&self.name)).into_owned()
    }

    pub fn name_bytes(&self) -> &[u8] {
        strip_padding(&self.name)
    }
}

/// The master boot record stored right after the sentinel byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterBootRecord {
    pub total_size: i64,
    pub created_at: [u8; TIMESTAMP_LEN],
    pub disk_signature: i64,
    pub partitions: [PartitionEntry; PARTITION_SLOTS],
}

impl MasterBootRecord {
    /// A fresh record with every slot free.
    pub fn new(total_size: i64, created_at: &str, disk_signature: i64) -> Self {
        let mut stamp = [0u8; TIMESTAMP_LEN];
        let len = created_at.len().min(TIMESTAMP_LEN);
        stamp[..len].copy_from_slice(&created_at.as_bytes()[..len]);

        Self {
            total_size,
            created_at: stamp,
            disk_signature,
            partitions: [PartitionEntry::default(); PARTITION_SLOTS],
        }
    }

    pub fn created_at(&self) -> String {
        String::from_utf8_lossy(strip_padding(&self.created_at))
            .trim_end()
            .to_string()
    }

    /// Occupied slots in slot order, with their index.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &PartitionEntry)> {
        self.partitions
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_free())
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        self.partitions.iter().position(PartitionEntry::is_free)
    }

    /// Sum of the sizes of all occupied slots, recomputed on every call.
    ///
    /// `None` when a size read from the image is negative or the sum
    /// overflows, i.e. the table is corrupt.
    pub fn used_space(&self) -> Option<i64> {
        self.occupied().try_fold(0i64, |acc, (_, p)| {
            if p.size < 0 {
                None
            } else {
                acc.checked_add(p.size)
            }
        })
    }

    pub fn free_space(&self) -> Option<i64> {
        self.total_size.checked_sub(self.used_space()?)
    }
}

/// Truncates to at most 16 bytes without splitting a UTF-8 sequence, then pads
/// with zeros.
pub fn encode_name(name: &str) -> [u8; PARTITION_NAME_LEN] {
    let mut end = name.len().min(PARTITION_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }

    let mut buf = [0u8; PARTITION_NAME_LEN];
    buf[..end].copy_from_slice(&name.as_bytes()[..end]);
    buf
}

fn strip_padding(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}
