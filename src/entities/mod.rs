//! Record type definitions
//!
//! The dashboard manages five record types:
//!
//! - [`Aircraft`] - airframes moving through production
//! - [`Part`] - stocked components with reorder thresholds
//! - [`Employee`] - the staff directory
//! - [`ProductionStage`] - build steps of an aircraft
//! - [`Test`] - quality inspections of an aircraft
//!
//! Stages and tests reference an aircraft by id only.

pub mod aircraft;
pub mod employee;
pub mod part;
pub mod stage;
pub mod test;

pub use aircraft::Aircraft;
pub use employee::Employee;
pub use part::Part;
pub use stage::ProductionStage;
pub use test::Test;
