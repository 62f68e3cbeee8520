//! Volume drivers
//!
//! The capability interface and its object store implementation.

pub mod driver;
pub mod s3_volume;

pub use driver::Volume;
pub use s3_volume::{DRIVER_ID, S3Volume};
