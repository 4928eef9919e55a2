//! Index listing and host-document region updates

pub mod generator;
pub mod region;

pub use generator::generate_index;
pub use region::{update_region, write_index, IndexUpdate, MarkerRegion};
