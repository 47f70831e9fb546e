//! Small, dependency-free helpers for reading and writing fixed-width
//! little-endian integers out of byte slices, shared by the `page` crate.

pub mod bin_error;
pub mod conversions;
pub mod le;
