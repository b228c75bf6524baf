pub mod device;
pub mod image;
pub mod init;
pub mod mbr;
pub mod types;

pub use device::MbrDevice;
pub use image::DiskImage;
pub use init::create_disk;
pub use mbr::{MasterBootRecord, PartitionEntry};
pub use types::{calculate_disk_size, SizeUnit, MBR_SIZE, PARTITION_SLOTS};
