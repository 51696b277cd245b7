//! Domain models for the AgriStack Mock API

mod farmer;
mod parcel;
mod profile;
mod record;

pub use farmer::*;
pub use parcel::*;
pub use profile::*;
pub use record::*;
