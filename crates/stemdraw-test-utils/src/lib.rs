//! Testing utilities for Stemdraw.
//!
//! Stage mocks (planner, auditor, layout) and sample problem texts /
//! plans shared by the integration tests.

pub mod data_generators;
pub mod mocks;

pub use data_generators::{
    free_body_plan, molecule_plan, pathway_plan, sample_problem, series_circuit_plan,
    software_plan,
};
pub use mocks::{FailingPlanner, GridLayout, StaticAuditor, StaticPlanner};
