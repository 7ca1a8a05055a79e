//! # Analysis Module
//!
//! Closed-form companions to the transport engine: the Beer-Lambert
//! prediction, Monte-Carlo-vs-analytical comparison, photon budget sizing,
//! and simple source/dose arithmetic. Everything here is a pure function
//! over stack and result data, with no engine state.

use std::fmt;

use serde::Serialize;

use crate::constants::{BUDGET_SAFETY_FACTOR, MIN_PHOTON_BUDGET};
use crate::error::ShieldError;
use crate::shield::LayerStack;
use crate::transport::{MonteCarloResult, PhotonTransport};

// ============================================================================
// BEER-LAMBERT PREDICTION
// ============================================================================

/// Uncollided transmission exp(-Σ μ_total·t) over the whole stack
pub fn analytical_transmission(stack: &LayerStack) -> f64 {
    (-stack.optical_depth()).exp()
}

// ============================================================================
// MONTE CARLO VS ANALYTICAL
// ============================================================================

/// One engine run set against the exponential attenuation law.
///
/// `buildup_factor` here is the photon-count ratio
/// `mc_transmission / analytical_transmission`: how many photons actually
/// arrive relative to the uncollided prediction. The dose-based buildup
/// lives on the embedded [`MonteCarloResult`]. Both are `None` when the
/// analytical transmission is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticalComparison {
    pub monte_carlo: MonteCarloResult,
    pub analytical_transmission: f64,
    pub buildup_factor: Option<f64>,
    pub difference_percent: Option<f64>,
}

impl fmt::Display for AnalyticalComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(v: Option<f64>) -> String {
            v.map_or_else(|| "undefined".to_string(), |x| format!("{:.4}", x))
        }

        writeln!(f, "=== Monte Carlo vs Beer-Lambert ===")?;
        writeln!(
            f,
            "MC transmission: {:.6}",
            self.monte_carlo.transmission_factor
        )?;
        writeln!(
            f,
            "Analytical transmission: {:.6e}",
            self.analytical_transmission
        )?;
        writeln!(f, "Count buildup factor: {}", opt(self.buildup_factor))?;
        write!(f, "Difference: {} %", opt(self.difference_percent))
    }
}

/// Run the engine once and compare against the closed-form prediction.
pub fn compare_with_analytical(
    engine: &mut PhotonTransport,
    stack: &LayerStack,
    source_energy_mev: f64,
    num_photons: u64,
) -> Result<AnalyticalComparison, ShieldError> {
    let monte_carlo = engine.run(stack, source_energy_mev, num_photons, 1.0)?;
    let analytical = analytical_transmission(stack);

    let (buildup_factor, difference_percent) = if analytical > 0.0 {
        (
            Some(monte_carlo.transmission_factor / analytical),
            Some((monte_carlo.transmission_factor - analytical) / analytical * 100.0),
        )
    } else {
        (None, None)
    };

    Ok(AnalyticalComparison {
        monte_carlo,
        analytical_transmission: analytical,
        buildup_factor,
        difference_percent,
    })
}

// ============================================================================
// PHOTON BUDGET
// ============================================================================

/// Photon count needed to reach a target relative uncertainty.
///
/// Uncertainty scales as 1/√N_detected with N_detected = N·T, so
/// N = 1.5 / (u²·T) with a safety factor, floored at 10 000.
/// Fails with [`ShieldError::InvalidParameter`] on non-positive inputs.
pub fn estimate_required_photons(
    desired_uncertainty: f64,
    expected_transmission: f64,
) -> Result<u64, ShieldError> {
    if !(desired_uncertainty > 0.0) {
        return Err(ShieldError::InvalidParameter {
            name: "desired_uncertainty",
            value: desired_uncertainty,
            constraint: "> 0",
        });
    }
    if !(expected_transmission > 0.0) {
        return Err(ShieldError::InvalidParameter {
            name: "expected_transmission",
            value: expected_transmission,
            constraint: "> 0",
        });
    }

    let n = (BUDGET_SAFETY_FACTOR
        / (desired_uncertainty * desired_uncertainty * expected_transmission))
        .ceil();
    Ok((n as u64).max(MIN_PHOTON_BUDGET))
}

// ============================================================================
// SOURCES AND ANALYTICAL DOSE
// ============================================================================

/// A gamma point source characterised by activity and line energy.
#[derive(Debug, Clone, Serialize)]
pub struct GammaSource {
    pub name: String,
    /// Activity (Bq)
    pub intensity_bq: f64,
    /// Line energy (MeV)
    pub energy_mev: f64,
}

impl GammaSource {
    pub fn new(name: impl Into<String>, intensity_bq: f64, energy_mev: f64) -> Self {
        Self {
            name: name.into(),
            intensity_bq,
            energy_mev,
        }
    }

    /// Activity after `elapsed_s` of decay with the given half-life.
    ///
    /// A non-positive half-life means "no decay data" and returns the
    /// initial activity unchanged.
    pub fn decayed_intensity(&self, elapsed_s: f64, half_life_s: f64) -> f64 {
        if half_life_s > 0.0 {
            self.intensity_bq * 0.5f64.powf(elapsed_s / half_life_s)
        } else {
            self.intensity_bq
        }
    }
}

/// Uncollided dose rate behind the shield: S·exp(-Σ μ·t)
pub fn transmitted_dose(stack: &LayerStack, source: &GammaSource) -> f64 {
    source.intensity_bq * analytical_transmission(stack)
}

/// Per-layer absorbed fraction of the source, S·(1 - exp(-μᵢ·tᵢ))
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDose {
    pub material: String,
    pub dose: f64,
}

pub fn absorbed_dose_per_layer(stack: &LayerStack, source: &GammaSource) -> Vec<LayerDose> {
    stack
        .layers()
        .iter()
        .map(|layer| LayerDose {
            material: layer.material().to_string(),
            dose: source.intensity_bq
                * (1.0 - (-layer.mu_total() * layer.thickness_cm()).exp()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lead_stack(thickness_cm: f64) -> LayerStack {
        let mut stack = LayerStack::new();
        stack
            .append_layer("Lead", thickness_cm, 0.77, 0.58, 0.19, 11.34)
            .unwrap();
        stack
    }

    #[test]
    fn test_analytical_transmission() {
        let stack = lead_stack(5.0);
        assert!((analytical_transmission(&stack) - (-3.85f64).exp()).abs() < 1e-15);

        let empty = LayerStack::new();
        assert_eq!(analytical_transmission(&empty), 1.0);
    }

    #[test]
    fn test_compare_embeds_matching_run() {
        let stack = lead_stack(5.0);

        let mut engine = PhotonTransport::new(42);
        let comparison = compare_with_analytical(&mut engine, &stack, 1.0, 20_000).unwrap();

        let reference = PhotonTransport::new(42)
            .run(&stack, 1.0, 20_000, 1.0)
            .unwrap();
        assert_eq!(comparison.monte_carlo, reference);

        let buildup = comparison.buildup_factor.unwrap();
        assert!(
            (buildup
                - comparison.monte_carlo.transmission_factor
                    / comparison.analytical_transmission)
                .abs()
                < 1e-12
        );

        // Forward-only transport always over-shoots the uncollided law
        assert!(comparison.difference_percent.unwrap() > 0.0);
    }

    #[test]
    fn test_compare_propagates_engine_errors() {
        let empty = LayerStack::new();
        let mut engine = PhotonTransport::new(42);
        assert!(matches!(
            compare_with_analytical(&mut engine, &empty, 1.0, 1_000),
            Err(ShieldError::EmptyStack)
        ));
    }

    #[test]
    fn test_budget_estimator_values() {
        // 1% uncertainty at 10% transmission: 1.5/(1e-4 · 0.1) = 150 000
        assert_eq!(estimate_required_photons(0.01, 0.1).unwrap(), 150_000);

        // Loose target hits the floor
        assert_eq!(estimate_required_photons(0.1, 1.0).unwrap(), 10_000);

        // Fractional quotients round up
        assert_eq!(
            estimate_required_photons(0.003, 0.9).unwrap(),
            185_186
        );
    }

    #[test]
    fn test_budget_estimator_rejects_non_positive() {
        assert!(estimate_required_photons(0.0, 0.1).is_err());
        assert!(estimate_required_photons(-0.01, 0.1).is_err());
        assert!(estimate_required_photons(0.01, 0.0).is_err());
        assert!(estimate_required_photons(0.01, -0.5).is_err());
        assert!(estimate_required_photons(f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_budget_estimator_monotone_in_transmission() {
        let base = estimate_required_photons(0.01, 0.1).unwrap();
        let harder = estimate_required_photons(0.01, 0.05).unwrap();
        assert!(harder >= base);
    }

    #[test]
    fn test_source_decay() {
        let source = GammaSource::new("Co-60", 1e6, 1.25);

        // One half-life halves the activity
        let half_life = 5.27 * 365.25 * 86_400.0;
        assert!((source.decayed_intensity(half_life, half_life) - 5e5).abs() < 1.0);

        // No elapsed time, no decay
        assert_eq!(source.decayed_intensity(0.0, half_life), 1e6);

        // Missing half-life data leaves the activity unchanged
        assert_eq!(source.decayed_intensity(1e9, 0.0), 1e6);
    }

    #[test]
    fn test_transmitted_dose() {
        let stack = lead_stack(5.0);
        let source = GammaSource::new("Cs-137", 100.0, 0.662);

        let dose = transmitted_dose(&stack, &source);
        assert!((dose - 100.0 * (-3.85f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_absorbed_dose_per_layer() {
        let mut stack = lead_stack(5.0);
        stack
            .append_layer("Water", 10.0, 0.0707, 0.0700, 0.0007, 1.0)
            .unwrap();
        let source = GammaSource::new("Cs-137", 100.0, 0.662);

        let doses = absorbed_dose_per_layer(&stack, &source);
        assert_eq!(doses.len(), 2);
        assert_eq!(doses[0].material, "Lead");
        assert!((doses[0].dose - 100.0 * (1.0 - (-3.85f64).exp())).abs() < 1e-9);
        assert!((doses[1].dose - 100.0 * (1.0 - (-0.707f64).exp())).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            .. ProptestConfig::default()
        })]

        /// PROPERTY: the budget never drops below the floor, and lowering
        /// the expected transmission never lowers the recommendation.
        #[test]
        fn property_budget_floor_and_monotonicity(
            uncertainty in 1e-4f64..1.0,
            transmission in 1e-6f64..1.0,
        ) {
            let n = estimate_required_photons(uncertainty, transmission).unwrap();
            prop_assert!(n >= 10_000);

            let n_half = estimate_required_photons(uncertainty, transmission / 2.0).unwrap();
            prop_assert!(n_half >= n);
        }
    }
}
