//! Potential energy reporter

use crate::config::ReporterConfig;
use crate::reporter::{ReportRequest, Reporter, append_view};
use crate::state::SimulationState;
use crate::units::kj_to_kcal;
use crate::{ReportError, Result};
use appendnpy_store::ArrayView;

/// Appends the potential energy in kcal/mol as one element per report
#[derive(Debug, Clone)]
pub struct PotentialEnergyReporter {
    config: ReporterConfig,
}

impl PotentialEnergyReporter {
    /// Create a reporter from its configuration
    pub const fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub const fn config(&self) -> &ReporterConfig {
        &self.config
    }
}

impl Reporter for PotentialEnergyReporter {
    fn describe_next_report(&self, current_step: u64) -> ReportRequest {
        ReportRequest {
            energy: true,
            ..ReportRequest::after(self.config.steps_until_next(current_step))
        }
    }

    fn report(&mut self, state: &dyn SimulationState) -> Result<()> {
        let energy = state
            .potential_energy()
            .ok_or(ReportError::MissingQuantity("potential energy"))?;
        let energy = kj_to_kcal(energy);
        append_view(&self.config, &ArrayView::scalar(&energy))
    }
}
