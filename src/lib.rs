//! Controller and panel sizing for building automation systems.
//!
//! Given mechanical systems with a complexity grade and quantity, works out
//! the I/O point demand, the controllers and expansion modules that cover it,
//! the enclosure panel and the supervisory device.

pub mod allocator;
pub mod calculator;
pub mod catalog;
pub mod db;
pub mod demand;
pub mod error;
pub mod models;
pub mod requests;
pub mod sizing;

pub use calculator::recommend;
pub use catalog::Catalog;
pub use error::{AdvisorError, AdvisorResult};
pub use models::{
    AggregatedDemand, AllocationEntry, AllocationResult, ComplexityGrade, ControllerCategory,
    ControllerSpec, NetworkDeviceTier, PanelTier, PointClass, PointCounts, Recommendation,
    SystemProfile, SystemRequest, SystemType,
};
