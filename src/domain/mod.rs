//! Domain layer - pure entities independent of infrastructure

pub mod reading;

pub use reading::Reading;
