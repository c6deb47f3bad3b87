//! Simulation reporters backed by appendable `.npy` files.
//!
//! A host simulation loop asks each [`Reporter`] when it next wants a state
//! via [`Reporter::describe_next_report`], then hands it the state at that
//! step. Every report opens its file, appends one block and closes it, so a
//! run that is killed mid-way leaves every completed report on disk.
//!
//! | Reporter | Rows per report | Units |
//! |----------|-----------------|-------|
//! | [`ForceReporter`] | N×3 | kcal/(mol·Å) |
//! | [`PositionReporter`] | N×3 | Å |
//! | [`PotentialEnergyReporter`] | 1 | kcal/mol |

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod energy;
pub mod error;
pub mod force;
pub mod position;
pub mod reporter;
pub mod state;
pub mod units;

pub use config::ReporterConfig;
pub use energy::PotentialEnergyReporter;
pub use error::{ReportError, Result};
pub use force::ForceReporter;
pub use position::PositionReporter;
pub use reporter::{ReportRequest, Reporter};
pub use state::{Frame, SimulationState, Vec3};
