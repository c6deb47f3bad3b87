//! Particle position reporter

use crate::config::ReporterConfig;
use crate::reporter::{ReportRequest, Reporter, append_vectors};
use crate::state::SimulationState;
use crate::units::nm_to_angstrom;
use crate::{ReportError, Result};

/// Appends an N×3 block of positions in Å at every report
#[derive(Debug, Clone)]
pub struct PositionReporter {
    config: ReporterConfig,
}

impl PositionReporter {
    /// Create a reporter from its configuration
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub const fn config(&self) -> &ReporterConfig {
        &self.config
    }
}

impl Reporter for PositionReporter {
    fn describe_next_report(&self, current_step: u64) -> ReportRequest {
        ReportRequest {
            positions: true,
            ..ReportRequest::after(self.config.steps_until_next(current_step))
        }
    }

    fn report(&mut self, state: &dyn SimulationState) -> Result<()> {
        let positions = state
            .positions()
            .ok_or(ReportError::MissingQuantity("positions"))?;
        append_vectors(&self.config, positions, nm_to_angstrom)
    }
}
