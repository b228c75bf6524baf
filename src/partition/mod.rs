pub mod alloc;

use log::info;

use crate::{
    disk::{MbrDevice, PartitionEntry},
    error::Result,
};

pub use self::alloc::{add_partition, PartitionRequest};

/// Read-modify-write of a single partition: reads the whole MBR, allocates in
/// memory and writes the record back only if the allocation succeeded.
pub fn fdisk<D: MbrDevice>(
    device: &D,
    request: &PartitionRequest,
) -> Result<(usize, PartitionEntry)> {
    let mut mbr = device.read_mbr()?;
    let slot = add_partition(&mut mbr, request)?;
    device.write_mbr(&mbr)?;

    let entry = mbr.partitions[slot];
    info!(
        "partition '{}' created in slot {} (start {}, {} bytes)",
        entry.name(),
        slot,
        entry.start,
        entry.size
    );
    Ok((slot, entry))
}
