//! Door-to-door visit tracking: import addresses from CSV, geocode them one
//! at a time, and keep a status and note per address.

pub mod address;
pub mod config;
pub mod csv_import;
pub mod export;
pub mod geocode;
pub mod session;
pub mod status;
pub mod tracker;

pub use address::{AddressRecord, Coordinates};
pub use status::Status;
pub use tracker::{ImportSummary, Marker, StatusCount, Tracker};
