//! Reporter trait and the request it hands back to the host

use crate::Result;
use crate::config::ReporterConfig;
use crate::state::{SimulationState, Vec3};
use appendnpy_store::{AppendableArray, ArrayView};
use tracing::debug;

/// What a reporter needs from the next state it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    /// Steps until the next report
    pub steps: u64,
    /// Positions must be computed
    pub positions: bool,
    /// Velocities must be computed
    pub velocities: bool,
    /// Forces must be computed
    pub forces: bool,
    /// Energies must be computed
    pub energy: bool,
    /// Wrap positions into the periodic box; `None` leaves it to the host
    pub wrap_positions: Option<bool>,
}

impl ReportRequest {
    /// Request nothing, `steps` from now
    pub const fn after(steps: u64) -> Self {
        Self {
            steps,
            positions: false,
            velocities: false,
            forces: false,
            energy: false,
            wrap_positions: None,
        }
    }
}

/// Periodic writer driven by a host simulation loop
pub trait Reporter {
    /// Describe the next report, given the host's current step
    fn describe_next_report(&self, current_step: u64) -> ReportRequest;

    /// Write one report from `state`
    ///
    /// # Errors
    ///
    /// Fails if `state` lacks the requested quantity or the append fails.
    fn report(&mut self, state: &dyn SimulationState) -> Result<()>;
}

/// Append `vectors` as an N×3 block, scaling every component
pub(crate) fn append_vectors(
    config: &ReporterConfig,
    vectors: &[Vec3],
    scale: impl Fn(f64) -> f64,
) -> Result<()> {
    let flat: Vec<f64> = vectors.iter().flatten().map(|&v| scale(v)).collect();
    let view = ArrayView::new(vec![vectors.len() as u64, 3], &flat)?;
    append_view(config, &view)
}

/// Open a session on the configured file, append `view` and close it
pub(crate) fn append_view(config: &ReporterConfig, view: &ArrayView<'_, f64>) -> Result<()> {
    let mut store = AppendableArray::open_with_config(config.path(), config.store())?;
    store.append(view)?;
    debug!(
        "Reported {:?} to {}, file shape {:?}",
        view.shape(),
        config.path().display(),
        store.shape()
    );
    store.close()?;
    Ok(())
}
