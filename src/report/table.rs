use std::fmt::Write;

use crate::{disk::MasterBootRecord, utils::human_size};

/// Plain-text listing of the partition table, one row per slot.
pub fn format_table(mbr: &MasterBootRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Disk size: {} ({} bytes)  created: {}  signature: {}",
        human_size(mbr.total_size),
        mbr.total_size,
        mbr.created_at(),
        mbr.disk_signature
    );
    let _ = writeln!(
        out,
        "{:<6}{:<10}{:<18}{:>14}{:>14}",
        "Slot", "Status", "Name", "Start", "Size"
    );

    for (index, partition) in mbr.partitions.iter().enumerate() {
        if partition.is_free() {
            let _ = writeln!(out, "{:<6}{:<10}", index + 1, "free");
        } else {
            let _ = writeln!(
                out,
                "{:<6}{:<10}{:<18}{:>14}{:>14}",
                index + 1,
                "used",
                partition.name(),
                partition.start,
                partition.size
            );
        }
    }

    match (mbr.used_space(), mbr.free_space()) {
        (Some(used), Some(free)) => {
            let _ = writeln!(out, "Used: {}  Free: {}", human_size(used), human_size(free));
        }
        _ => {
            let _ = writeln!(out, "Used: invalid (partition sizes are corrupt)");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::PartitionEntry;

    #[test]
    fn lists_every_slot() {
        let mut mbr = MasterBootRecord::new(2048, "2024-01-01T00:00:00", 9);
        mbr.partitions[0] = PartitionEntry::occupied(1, 1024, "boot");

        let table = format_table(&mbr);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("2024-01-01T00:00:00"));
        assert!(lines[2].starts_with("1     used      boot"));
        assert!(lines[3].starts_with("2     free"));
        assert_eq!(lines[6], "Used: 1.0 KiB  Free: 1.0 KiB");
    }

    #[test]
    fn corrupt_sizes_are_reported() {
        let mut mbr = MasterBootRecord::new(2048, "", 0);
        mbr.partitions[0] = PartitionEntry::occupied(1, i64::MAX, "a");
        mbr.partitions[1] = PartitionEntry::occupied(1, i64::MAX, "b");

        let table = format_table(&mbr);
        assert_eq!(
            table.lines().last(),
            Some("Used: invalid (partition sizes are corrupt)")
        );
    }
}
