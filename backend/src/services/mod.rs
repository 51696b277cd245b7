//! Business logic services for the AgriStack Mock API

pub mod farmer;

pub use farmer::FarmerAggregationService;
