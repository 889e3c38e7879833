//! Aerocode: production dashboard for an aircraft manufacturer
//!
//! Keeps aircraft, parts, employees, production stages and tests in memory,
//! gated by a mock login with role-based access to each section.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
