//! Command implementations

pub mod start_django;
pub mod version;
