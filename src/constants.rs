//! # Physical Constants
//!
//! Constants for gamma photon transport and dosimetry.

// ============================================================================
// FUNDAMENTAL CONSTANTS
// ============================================================================

/// Electron rest mass energy (MeV), the Compton kinematics scale
pub const ELECTRON_REST_MASS_MEV: f64 = 0.511;

/// Conversion: 1 MeV to Joules
pub const MEV_TO_JOULES: f64 = 1.602_176_634e-13;

/// Avogadro number (1/mol)
pub const N_A: f64 = 6.022_140_76e23;

// ============================================================================
// SIMULATION DEFAULTS
// ============================================================================

/// Default RNG seed. Runs stay reproducible when the caller supplies none
pub const DEFAULT_SEED: u64 = 42;

/// Default photon count per run
pub const DEFAULT_NUM_PHOTONS: u64 = 100_000;

/// Default Compton energy retention factor (tunable, not physically derived)
pub const DEFAULT_COMPTON_RETENTION: f64 = 0.5;

/// Minimum photon budget recommended by the uncertainty estimator
pub const MIN_PHOTON_BUDGET: u64 = 10_000;

/// Safety margin applied by the uncertainty estimator
pub const BUDGET_SAFETY_FACTOR: f64 = 1.5;
