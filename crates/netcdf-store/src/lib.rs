//! Storage seam for gridded wind archives.
//!
//! Archive adapters never touch the NetCDF library directly. They read through
//! [`GridSource`], which has two implementations:
//!
//! - [`NetcdfSource`]: one open NetCDF file, released on drop
//! - [`MemorySource`]: variables held in memory, used to exercise adapters
//!   without files on disk
//!
//! Numeric variables are always returned as decoded `f64` [`Field`]s: packed
//! short integers (`scale_factor`/`add_offset`) are unpacked and fill values
//! become NaN.

pub mod error;
pub mod field;
mod native;
pub mod source;

pub use error::{StoreError, StoreResult};
pub use field::Field;
pub use native::{silence_hdf5_errors, NetcdfSource};
pub use source::{GridSource, MemorySource, Packing};
