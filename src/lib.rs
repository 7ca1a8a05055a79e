//! # SHIELDSIM-RS
//!
//! Monte Carlo gamma-ray transport through multi-layer radiation shields.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         SHIELDSIM-RS                             │
//! │            Gamma Shield Transport Engine in Rust                 │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  shield      : layer geometry, cumulative depth, mass            │
//! │  materials   : preset attenuation catalog (~1 MeV)               │
//! │  stochastic  : seeded xoshiro256** stream (bit-reproducible)     │
//! │  transport   : per-photon random walk, tallies, buildup          │
//! │  analysis    : Beer-Lambert comparison, photon budget, dose      │
//! │  simulator   : session facade (stack + engine, single writer)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two estimates per shield: the deterministic Beer-Lambert exponential
//! and a stochastic Monte Carlo run that captures scattering-induced dose
//! buildup. Same seed, same stack, same photon count: bit-identical
//! results.
//!
//! ## Author
//! Avermex Research Division

pub mod analysis;
pub mod constants;
pub mod error;
pub mod materials;
pub mod shield;
pub mod simulator;
pub mod stochastic;
pub mod transport;

// Re-exports
pub use analysis::{
    absorbed_dose_per_layer, analytical_transmission, compare_with_analytical,
    estimate_required_photons, transmitted_dose, AnalyticalComparison, GammaSource, LayerDose,
};
pub use error::ShieldError;
pub use materials::{AttenuationData, GammaMaterial};
pub use shield::{Layer, LayerDescriptor, LayerStack, Slab};
pub use simulator::ShieldSimulator;
pub use stochastic::RandomGenerator;
pub use transport::{
    ComptonModel, DoseTally, FixedRetention, KleinNishina, MonteCarloResult, Photon, PhotonFate,
    PhotonOutcome, PhotonTransport,
};

/// SHIELDSIM version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Information about the simulator
pub fn info() -> String {
    format!(
        "SHIELDSIM-RS v{}\n\
         Monte Carlo Gamma Shield Transport Engine\n\
         Deterministic, bit-reproducible photon histories\n\
         Avermex Research Division",
        VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info() {
        let info = info();
        assert!(info.contains("SHIELDSIM"));
        assert!(info.contains(VERSION));
    }
}
