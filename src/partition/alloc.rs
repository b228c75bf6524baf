use log::debug;

use crate::{
    disk::{
        mbr::{encode_name, MasterBootRecord, PartitionEntry},
        types::SizeUnit,
    },
    error::{DiskError, Result},
};

/// A request to add one primary partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRequest {
    pub size: i64,
    pub unit: SizeUnit,
    /// Carried along but never used for addressing or placement.
    pub letter: char,
    pub name: String,
}

impl PartitionRequest {
    pub fn new(size: i64, unit: SizeUnit, letter: char, name: impl Into<String>) -> Self {
        Self {
            size,
            unit,
            letter,
            name: name.into(),
        }
    }
}

/// Adds a partition to `mbr` and returns the slot it was placed in.
///
/// The table is only touched once every check has passed:
/// 1. the first free slot is the target;
/// 2. an occupied slot with the same name fails with `DuplicateName`, even
///    when no slot is free;
/// 3. no free slot fails with `NoFreeSlot`;
/// 4. the sum of occupied sizes plus the request must not exceed
///    `total_size`, otherwise `InsufficientSpace`.
///
/// The new partition starts right after the data of all occupied partitions
/// (`used + 1`), regardless of which slot it lands in.
pub fn add_partition(mbr: &mut MasterBootRecord, request: &PartitionRequest) -> Result<usize> {
    let requested = request.unit.to_bytes(request.size)?;
    if request.name.is_empty() {
        return Err(DiskError::InvalidParameter(
            "partition name must not be empty".to_string(),
        ));
    }

    // 名字按落盘后的形式比较（截断到 16 字节）
    let stored_name = encode_name(&request.name);
    let wanted = &stored_name[..stored_name
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(stored_name.len())];

    let mut target = None;
    for (index, partition) in mbr.partitions.iter().enumerate() {
        if partition.is_free() {
            target.get_or_insert(index);
        } else if partition.name_bytes() == wanted {
            return Err(DiskError::DuplicateName(partition.name()));
        }
    }
    let target = target.ok_or(DiskError::NoFreeSlot)?;

    let used = mbr
        .used_space()
        .ok_or_else(|| DiskError::Decode("partition sizes are negative or overflow".to_string()))?;
    let fits = used
        .checked_add(requested)
        .map_or(false, |end| end <= mbr.total_size);
    if !fits {
        return Err(DiskError::InsufficientSpace {
            requested,
            used,
            total: mbr.total_size,
        });
    }

    let entry = PartitionEntry::occupied(used + 1, requested, &request.name);
    debug!(
        "placing partition '{}' (letter {}) in slot {} at {} for {} bytes",
        entry.name(),
        request.letter,
        target,
        entry.start,
        entry.size
    );
    mbr.partitions[target] = entry;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::types::STATUS_OCCUPIED;

    fn disk(total: i64) -> MasterBootRecord {
        MasterBootRecord::new(total, "2024-01-01T00:00:00", 1)
    }

    fn bytes(size: i64, name: &str) -> PartitionRequest {
        PartitionRequest::new(size, SizeUnit::Bytes, 'A', name)
    }

    #[test]
    fn packs_partitions_by_used_space() {
        let mut mbr = disk(1024);

        assert_eq!(add_partition(&mut mbr, &bytes(600, "first")).unwrap(), 0);
        assert_eq!(mbr.partitions[0].start, 1);
        assert_eq!(mbr.partitions[0].size, 600);
        assert_eq!(mbr.partitions[0].status, STATUS_OCCUPIED);

        let err = add_partition(&mut mbr, &bytes(500, "second")).unwrap_err();
        assert!(matches!(
            err,
            DiskError::InsufficientSpace {
                requested: 500,
                used: 600,
                total: 1024
            }
        ));

        assert_eq!(add_partition(&mut mbr, &bytes(400, "second")).unwrap(), 1);
        assert_eq!(mbr.partitions[1].start, 601);
    }

    #[test]
    fn exact_fit_is_allowed() {
        let mut mbr = disk(1024);
        add_partition(&mut mbr, &bytes(1024, "all")).unwrap();
        assert_eq!(mbr.free_space(), Some(0));
        assert!(matches!(
            add_partition(&mut mbr, &bytes(1, "more")),
            Err(DiskError::InsufficientSpace { .. })
        ));
    }

    #[test]
    fn fifth_partition_has_no_slot() {
        let mut mbr = disk(10 * 1024);
        for name in ["a", "b", "c", "d"] {
            add_partition(&mut mbr, &bytes(10, name)).unwrap();
        }
        let before = mbr.clone();

        assert!(matches!(
            add_partition(&mut mbr, &bytes(10, "e")),
            Err(DiskError::NoFreeSlot)
        ));
        assert_eq!(mbr, before);
    }

    #[test]
    fn duplicate_name_wins_over_missing_slot() {
        let mut mbr = disk(10 * 1024);
        for name in ["a", "b", "c", "d"] {
            add_partition(&mut mbr, &bytes(10, name)).unwrap();
        }
        assert!(matches!(
            add_partition(&mut mbr, &bytes(10, "c")),
            Err(DiskError::DuplicateName(name)) if name == "c"
        ));
    }

    #[test]
    fn duplicate_name_is_rejected_with_free_slots() {
        let mut mbr = disk(1024);
        add_partition(&mut mbr, &bytes(10, "home")).unwrap();
        let before = mbr.clone();

        assert!(matches!(
            add_partition(&mut mbr, &bytes(10, "home")),
            Err(DiskError::DuplicateName(_))
        ));
        assert_eq!(mbr, before);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut mbr = disk(1024);
        add_partition(&mut mbr, &bytes(10, "home")).unwrap();
        assert!(add_partition(&mut mbr, &bytes(10, "HOME")).is_ok());
    }

    #[test]
    fn names_collide_after_truncation() {
        let mut mbr = disk(1024);
        add_partition(&mut mbr, &bytes(10, "0123456789abcdef-one")).unwrap();
        assert!(matches!(
            add_partition(&mut mbr, &bytes(10, "0123456789abcdef-two")),
            Err(DiskError::DuplicateName(_))
        ));
    }

    #[test]
    fn fills_lowest_free_slot_but_places_after_used_data() {
        let mut mbr = disk(1024);
        mbr.partitions[1] = PartitionEntry::occupied(1, 100, "x");
        mbr.partitions[2] = PartitionEntry::occupied(101, 50, "y");

        let slot = add_partition(&mut mbr, &bytes(10, "z")).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(mbr.partitions[0].start, 151);
    }

    #[test]
    fn units_are_applied() {
        let mut mbr = disk(4 * 1024 * 1024);
        let req = PartitionRequest::new(2, SizeUnit::Kilobytes, 'B', "k");
        add_partition(&mut mbr, &req).unwrap();
        assert_eq!(mbr.partitions[0].size, 2048);

        let req = PartitionRequest::new(1, SizeUnit::Megabytes, 'C', "m");
        add_partition(&mut mbr, &req).unwrap();
        assert_eq!(mbr.partitions[1].size, 1024 * 1024);
        assert_eq!(mbr.partitions[1].start, 2049);
    }

    #[test]
    fn overflowing_sizes_are_a_decode_error() {
        let mut mbr = disk(1024);
        mbr.partitions[0] = PartitionEntry::occupied(1, i64::MAX, "a");
        mbr.partitions[1] = PartitionEntry::occupied(1, i64::MAX, "b");
        let before = mbr.clone();

        assert!(matches!(
            add_partition(&mut mbr, &bytes(1, "c")),
            Err(DiskError::Decode(_))
        ));
        assert_eq!(mbr, before);
    }

    #[test]
    fn negative_sizes_are_a_decode_error() {
        let mut mbr = disk(1024);
        mbr.partitions[0] = PartitionEntry::occupied(1, -600, "a");

        assert!(matches!(
            add_partition(&mut mbr, &bytes(100, "c")),
            Err(DiskError::Decode(_))
        ));
        assert!(mbr.partitions[1].is_free());
    }

    #[test]
    fn invalid_requests_leave_table_alone() {
        let mut mbr = disk(1024);
        let before = mbr.clone();
        assert!(matches!(
            add_partition(&mut mbr, &bytes(0, "zero")),
            Err(DiskError::InvalidParameter(_))
        ));
        assert!(matches!(
            add_partition(&mut mbr, &bytes(10, "")),
            Err(DiskError::InvalidParameter(_))
        ));
        assert_eq!(mbr, before);
    }
}
