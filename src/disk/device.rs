use crate::{disk::mbr::MasterBootRecord, error::Result};

/// Whole-record access to the MBR of a disk. Partial updates are done by
/// reading the record, changing it in memory and writing it back.
pub trait MbrDevice {
    fn read_mbr(&self) -> Result<MasterBootRecord>;
    fn write_mbr(&self, mbr: &MasterBootRecord) -> Result<()>;
}
