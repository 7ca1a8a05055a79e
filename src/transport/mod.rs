//! # Monte Carlo Photon Transport Module
//!
//! Stochastic gamma transport through a multi-layer shield.
//!
//! ## Theory
//!
//! Each photon performs a 1-D random walk along the depth axis. The free
//! path between interactions is exponential in the local total attenuation
//! coefficient:
//!
//! ```text
//! ℓ = -ln(U) / μ_total,   U ~ Uniform(0, 1)
//! ```
//!
//! At an interaction site the channel is chosen by a second deviate:
//! Compton scattering with probability μ_compton/μ_total degrades the
//! photon energy and lets it continue forward; otherwise the photon is
//! absorbed photoelectrically and deposits its remaining energy. A photon
//! reaching the detector face is transmitted. Scattered photons propagate
//! forward only; no backscatter out of the source face is modelled.
//!
//! The dose buildup factor emerges from the tallies: scattered photons
//! that survive carry dose the bare Beer-Lambert exponential does not
//! predict, so the transmitted-dose ratio is ≥ 1 by construction.
//!
//! ## Reproducibility
//!
//! [`PhotonTransport::run`] consumes a single seeded stream in strict
//! photon order: same seed, stack, energy, and photon count give
//! bit-identical results. [`PhotonTransport::run_parallel`] instead gives
//! every photon its own generator seeded `base_seed + photon_index`:
//! deterministic, but a different stream than the sequential mode.
//!
//! ## References
//!
//! [1] Lux & Koblinger, "Monte Carlo Particle Transport Methods"
//! [2] Shultis & Faw, "Radiation Shielding"
//!
//! ## Author
//! Avermex Research Division

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::constants::{DEFAULT_COMPTON_RETENTION, ELECTRON_REST_MASS_MEV};
use crate::error::ShieldError;
use crate::shield::LayerStack;
use crate::stochastic::RandomGenerator;

// ============================================================================
// PHOTON AND OUTCOME
// ============================================================================

/// Gamma photon state during the walk
#[derive(Debug, Clone)]
pub struct Photon {
    /// Depth from the source face (cm)
    pub position_cm: f64,
    /// Current energy (MeV)
    pub energy_mev: f64,
    /// Compton scatter events experienced
    pub scatter_count: u32,
}

impl Photon {
    pub fn new(energy_mev: f64) -> Self {
        Self {
            position_cm: 0.0,
            energy_mev,
            scatter_count: 0,
        }
    }
}

/// Terminal classification of a photon history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotonFate {
    /// Escaped through the detector face
    Transmitted,
    /// Photoelectric absorption inside the shield
    Absorbed,
}

/// Ephemeral per-photon record; only tally aggregates survive the run
#[derive(Debug, Clone, Copy)]
pub struct PhotonOutcome {
    pub fate: PhotonFate,
    /// Final energy (MeV): carried out if transmitted, deposited if absorbed
    pub energy_mev: f64,
    pub scatter_count: u32,
}

// ============================================================================
// COMPTON ENERGY MODELS
// ============================================================================

/// Per-event energy degradation strategy for Compton scattering.
///
/// The transport loop owns path sampling and channel selection; the model
/// only answers "what energy does the photon keep". Implementations may
/// consume extra deviates from the shared stream; doing so changes the
/// replay stream relative to the default model, which consumes none.
pub trait ComptonModel: Send + Sync {
    /// Energy (MeV) retained by a photon of `energy_mev` after one scatter
    fn scattered_energy(&self, energy_mev: f64, rng: &mut RandomGenerator) -> f64;
}

/// Fixed multiplicative retention per scatter.
///
/// The factor is a tunable in (0, 1), not a physically derived value (no
/// energy-dependent Compton kinematics are modelled). Consumes no deviates,
/// so the documented two-draws-per-interaction sequence holds exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedRetention {
    retention: f64,
}

impl FixedRetention {
    pub fn new(retention: f64) -> Result<Self, ShieldError> {
        if !(retention > 0.0 && retention < 1.0) {
            return Err(ShieldError::InvalidParameter {
                name: "compton_retention",
                value: retention,
                constraint: "in the open interval (0, 1)",
            });
        }
        Ok(Self { retention })
    }

    pub fn retention(&self) -> f64 {
        self.retention
    }
}

impl Default for FixedRetention {
    fn default() -> Self {
        Self {
            retention: DEFAULT_COMPTON_RETENTION,
        }
    }
}

impl ComptonModel for FixedRetention {
    fn scattered_energy(&self, energy_mev: f64, _rng: &mut RandomGenerator) -> f64 {
        energy_mev * self.retention
    }
}

/// Klein-Nishina energy sampling with isotropic scattering angle.
///
/// Samples cosθ uniform on [-1, 1] and applies the Compton shift
/// E' = E / (1 + α(1 - cosθ)) with α = E/mₑc². Consumes one deviate per
/// scatter, so runs using it do not replay against [`FixedRetention`]
/// streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct KleinNishina;

impl ComptonModel for KleinNishina {
    fn scattered_energy(&self, energy_mev: f64, rng: &mut RandomGenerator) -> f64 {
        let cos_theta = 2.0 * rng.uniform() - 1.0;
        let alpha = energy_mev / ELECTRON_REST_MASS_MEV;
        energy_mev / (1.0 + alpha * (1.0 - cos_theta))
    }
}

// ============================================================================
// DOSE TALLY
// ============================================================================

/// Streaming reducer from photon outcomes to summary statistics.
#[derive(Debug, Clone, Default)]
pub struct DoseTally {
    total: u64,
    transmitted: u64,
    absorbed: u64,
    transmitted_energy_mev: f64,
    absorbed_energy_mev: f64,
    scatter_events: u64,
}

impl DoseTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one photon history
    pub fn record(&mut self, outcome: &PhotonOutcome) {
        self.total += 1;
        self.scatter_events += u64::from(outcome.scatter_count);
        match outcome.fate {
            PhotonFate::Transmitted => {
                self.transmitted += 1;
                self.transmitted_energy_mev += outcome.energy_mev;
            }
            PhotonFate::Absorbed => {
                self.absorbed += 1;
                self.absorbed_energy_mev += outcome.energy_mev;
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Reduce to the immutable result record.
    ///
    /// `analytical_transmission` is the Beer-Lambert prediction for the
    /// same stack; it anchors the dose buildup factor. Degenerate
    /// statistics become `None` sentinels: zero analytical transmission
    /// leaves the buildup undefined, zero transmitted photons leave the
    /// uncertainty undefined.
    pub fn finalize(
        &self,
        source_energy_mev: f64,
        source_area_cm2: f64,
        analytical_transmission: f64,
    ) -> MonteCarloResult {
        let n = self.total.max(1) as f64;
        let dose_transmitted = self.transmitted_energy_mev / n;
        let dose_absorbed = self.absorbed_energy_mev / n;
        let transmission_factor = self.transmitted as f64 / n;

        let buildup_factor = if analytical_transmission > 0.0 {
            Some(((dose_transmitted / source_energy_mev) / analytical_transmission).max(1.0))
        } else {
            None
        };

        let uncertainty = if self.transmitted > 0 {
            Some(1.0 / (self.transmitted as f64).sqrt())
        } else {
            None
        };

        MonteCarloResult {
            source_energy_mev,
            source_area_cm2,
            total_photons: self.total,
            transmitted_photons: self.transmitted,
            absorbed_photons: self.absorbed,
            dose_transmitted,
            dose_absorbed,
            transmission_factor,
            analytical_transmission,
            buildup_factor,
            uncertainty,
            mean_scatter_count: self.scatter_events as f64 / n,
        }
    }
}

// ============================================================================
// RESULT RECORD
// ============================================================================

/// Summary statistics of one simulation run, immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloResult {
    /// Source energy (MeV)
    pub source_energy_mev: f64,
    /// Source area (cm²), recorded for the caller; no effect on 1-D transport
    pub source_area_cm2: f64,
    /// Photons simulated
    pub total_photons: u64,
    /// Photons that escaped through the detector face
    pub transmitted_photons: u64,
    /// Photons absorbed in the shield
    pub absorbed_photons: u64,
    /// Mean transmitted energy per source photon (MeV)
    pub dose_transmitted: f64,
    /// Mean absorbed energy per source photon (MeV)
    pub dose_absorbed: f64,
    /// transmitted_photons / total_photons, in [0, 1]
    pub transmission_factor: f64,
    /// Beer-Lambert prediction exp(-Σ μ_total·t)
    pub analytical_transmission: f64,
    /// Dose buildup relative to Beer-Lambert, ≥ 1; `None` when the
    /// analytical transmission is zero
    pub buildup_factor: Option<f64>,
    /// Relative statistical uncertainty 1/√transmitted; `None` when no
    /// photon was transmitted
    pub uncertainty: Option<f64>,
    /// Mean Compton scatters per source photon
    pub mean_scatter_count: f64,
}

impl fmt::Display for MonteCarloResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(v: Option<f64>) -> String {
            v.map_or_else(|| "undefined".to_string(), |x| format!("{:.4}", x))
        }

        writeln!(f, "=== Monte Carlo Transport Summary ===")?;
        writeln!(f, "Source energy: {:.3} MeV", self.source_energy_mev)?;
        writeln!(f, "Photons simulated: {}", self.total_photons)?;
        writeln!(
            f,
            "Transmitted: {} ({:.4} transmission factor)",
            self.transmitted_photons, self.transmission_factor
        )?;
        writeln!(f, "Absorbed: {}", self.absorbed_photons)?;
        writeln!(f, "Dose transmitted: {:.6} MeV/photon", self.dose_transmitted)?;
        writeln!(f, "Dose absorbed: {:.6} MeV/photon", self.dose_absorbed)?;
        writeln!(
            f,
            "Analytical transmission: {:.6e}",
            self.analytical_transmission
        )?;
        writeln!(f, "Buildup factor: {}", opt(self.buildup_factor))?;
        writeln!(f, "Uncertainty: {}", opt(self.uncertainty))?;
        write!(
            f,
            "Mean scatters per photon: {:.3}",
            self.mean_scatter_count
        )
    }
}

// ============================================================================
// TRANSPORT ENGINE
// ============================================================================

/// Monte Carlo photon transport engine.
///
/// Owns the random stream; the shield stack is borrowed read-only per run.
/// Sequential runs on the same engine continue the stream, so back-to-back
/// runs differ; construct a fresh engine to replay.
pub struct PhotonTransport {
    seed: u64,
    rng: RandomGenerator,
    compton: Box<dyn ComptonModel>,
}

impl PhotonTransport {
    /// Engine with the given seed and the default fixed-retention model
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: RandomGenerator::new(seed),
            compton: Box::new(FixedRetention::default()),
        }
    }

    /// Swap the Compton energy model (changes the replay stream)
    pub fn with_compton_model(mut self, model: impl ComptonModel + 'static) -> Self {
        self.compton = Box::new(model);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn validate(
        stack: &LayerStack,
        source_energy_mev: f64,
        num_photons: u64,
    ) -> Result<(), ShieldError> {
        if stack.is_empty() {
            return Err(ShieldError::EmptyStack);
        }
        if num_photons == 0 {
            return Err(ShieldError::InvalidParameter {
                name: "num_photons",
                value: 0.0,
                constraint: ">= 1",
            });
        }
        if !(source_energy_mev > 0.0) {
            return Err(ShieldError::InvalidParameter {
                name: "source_energy_mev",
                value: source_energy_mev,
                constraint: "> 0",
            });
        }
        Ok(())
    }

    /// Run the simulation, consuming the shared stream sequentially.
    ///
    /// Draws are consumed in strict photon order and never reused across
    /// photons; this is the bit-reproducible mode.
    pub fn run(
        &mut self,
        stack: &LayerStack,
        source_energy_mev: f64,
        num_photons: u64,
        source_area_cm2: f64,
    ) -> Result<MonteCarloResult, ShieldError> {
        Self::validate(stack, source_energy_mev, num_photons)?;

        log::info!(
            "transport run: {} photons at {} MeV through {} layers ({:.2} cm)",
            num_photons,
            source_energy_mev,
            stack.len(),
            stack.total_thickness()
        );

        let mut tally = DoseTally::new();
        for _ in 0..num_photons {
            let outcome =
                transport_photon(stack, source_energy_mev, &mut self.rng, self.compton.as_ref());
            tally.record(&outcome);
        }

        let analytical = (-stack.optical_depth()).exp();
        let result = tally.finalize(source_energy_mev, source_area_cm2, analytical);
        log::debug!(
            "transport run complete: transmission {:.4}, buildup {:?}",
            result.transmission_factor,
            result.buildup_factor
        );
        Ok(result)
    }

    /// Run with photons fanned out over the rayon pool.
    ///
    /// Photon `i` gets its own generator seeded `seed + i`: deterministic
    /// for a given seed and photon count, but a different stream than
    /// [`run`](Self::run), so the two modes are not bit-identical. The shared
    /// stream is left untouched.
    pub fn run_parallel(
        &self,
        stack: &LayerStack,
        source_energy_mev: f64,
        num_photons: u64,
        source_area_cm2: f64,
    ) -> Result<MonteCarloResult, ShieldError> {
        Self::validate(stack, source_energy_mev, num_photons)?;

        log::info!(
            "parallel transport run: {} photons at {} MeV through {} layers",
            num_photons,
            source_energy_mev,
            stack.len()
        );

        let compton = self.compton.as_ref();
        let tally = (0..num_photons)
            .into_par_iter()
            .map(|i| {
                let mut rng = RandomGenerator::new(self.seed.wrapping_add(i));
                transport_photon(stack, source_energy_mev, &mut rng, compton)
            })
            .fold(DoseTally::new, |mut tally, outcome| {
                tally.record(&outcome);
                tally
            })
            .reduce(DoseTally::new, |mut a, b| {
                a.total += b.total;
                a.transmitted += b.transmitted;
                a.absorbed += b.absorbed;
                a.transmitted_energy_mev += b.transmitted_energy_mev;
                a.absorbed_energy_mev += b.absorbed_energy_mev;
                a.scatter_events += b.scatter_events;
                a
            });

        let analytical = (-stack.optical_depth()).exp();
        Ok(tally.finalize(source_energy_mev, source_area_cm2, analytical))
    }
}

/// Walk one photon from the source face to its terminal fate.
fn transport_photon(
    stack: &LayerStack,
    source_energy_mev: f64,
    rng: &mut RandomGenerator,
    compton: &dyn ComptonModel,
) -> PhotonOutcome {
    let mut photon = Photon::new(source_energy_mev);
    let total_thickness = stack.total_thickness();

    loop {
        if photon.position_cm >= total_thickness {
            return PhotonOutcome {
                fate: PhotonFate::Transmitted,
                energy_mev: photon.energy_mev,
                scatter_count: photon.scatter_count,
            };
        }

        let slab = match stack.layer_at_depth(photon.position_cm) {
            Some(slab) => slab,
            // Depth lookup only fails past the detector face
            None => {
                return PhotonOutcome {
                    fate: PhotonFate::Transmitted,
                    energy_mev: photon.energy_mev,
                    scatter_count: photon.scatter_count,
                }
            }
        };

        // μ_total = 0 gives an infinite free path: the photon streams
        // through the layer without a chance to interact.
        let free_path = rng.exponential(slab.layer.mu_total());
        let distance_to_boundary = slab.end_cm - photon.position_cm;

        if free_path >= distance_to_boundary {
            // No interaction in this layer; advancing to the boundary
            // consumes no channel draw.
            photon.position_cm = slab.end_cm;
            continue;
        }

        photon.position_cm += free_path;

        let channel = rng.uniform();
        if channel < slab.layer.mu_compton() / slab.layer.mu_total() {
            photon.energy_mev = compton.scattered_energy(photon.energy_mev, rng);
            photon.scatter_count += 1;
        } else {
            return PhotonOutcome {
                fate: PhotonFate::Absorbed,
                energy_mev: photon.energy_mev,
                scatter_count: photon.scatter_count,
            };
        }
    }
}
