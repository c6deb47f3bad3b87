//! Simulation state supplied by the host

/// Cartesian vector, one per particle
pub type Vec3 = [f64; 3];

/// Quantities a host simulation exposes at a reporting step
///
/// Values are in simulation units: nanometres for positions, kJ/(mol·nm)
/// for forces and kJ/mol for energies. A quantity that was not computed
/// for this step is `None`.
pub trait SimulationState {
    /// Particle positions in nm
    fn positions(&self) -> Option<&[Vec3]>;

    /// Per-particle forces in kJ/(mol·nm)
    fn forces(&self) -> Option<&[Vec3]>;

    /// Potential energy of the system in kJ/mol
    fn potential_energy(&self) -> Option<f64>;
}

/// A plain state snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Particle positions in nm
    pub positions: Option<Vec<Vec3>>,
    /// Per-particle forces in kJ/(mol·nm)
    pub forces: Option<Vec<Vec3>>,
    /// Potential energy in kJ/mol
    pub potential_energy: Option<f64>,
}

impl SimulationState for Frame {
    fn positions(&self) -> Option<&[Vec3]> {
        self.positions.as_deref()
    }

    fn forces(&self) -> Option<&[Vec3]> {
        self.forces.as_deref()
    }

    fn potential_energy(&self) -> Option<f64> {
        self.potential_energy
    }
}
