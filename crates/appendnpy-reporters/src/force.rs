//! Per-particle force reporter

use crate::config::ReporterConfig;
use crate::reporter::{ReportRequest, Reporter, append_vectors};
use crate::state::SimulationState;
use crate::units::kj_per_nm_to_kcal_per_angstrom;
use crate::{ReportError, Result};

/// Appends an N×3 block of forces in kcal/(mol·Å) at every report
#[derive(Debug, Clone)]
pub struct ForceReporter {
    config: ReporterConfig,
}

impl ForceReporter {
    /// Create a reporter from its configuration
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub const fn config(&self) -> &ReporterConfig {
        &self.config
    }
}

impl Reporter for ForceReporter {
    fn describe_next_report(&self, current_step: u64) -> ReportRequest {
        ReportRequest {
            forces: true,
            ..ReportRequest::after(self.config.steps_until_next(current_step))
        }
    }

    fn report(&mut self, state: &dyn SimulationState) -> Result<()> {
        let forces = state.forces().ok_or(ReportError::MissingQuantity("forces"))?;
        append_vectors(&self.config, forces, kj_per_nm_to_kcal_per_angstrom)
    }
}
