//! Unit conversions from simulation units to reporting units
//!
//! States are supplied in nanometres and kilojoules per mole. Reports are
//! written in ångströms and kilocalories per mole.

/// Ångströms per nanometre
pub const ANGSTROM_PER_NM: f64 = 10.0;

/// Kilojoules per kilocalorie (thermochemical)
pub const KJ_PER_KCAL: f64 = 4.184;

/// nm → Å
pub fn nm_to_angstrom(value: f64) -> f64 {
    value * ANGSTROM_PER_NM
}

/// kJ/mol → kcal/mol
pub fn kj_to_kcal(value: f64) -> f64 {
    value / KJ_PER_KCAL
}

/// kJ/(mol·nm) → kcal/(mol·Å)
pub fn kj_per_nm_to_kcal_per_angstrom(value: f64) -> f64 {
    kj_to_kcal(value) / ANGSTROM_PER_NM
}
