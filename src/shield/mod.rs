//! # Shield Module
//!
//! Multi-layer shield geometry for 1-D photon transport.
//!
//! A shield is an ordered stack of material layers, index 0 nearest the
//! source. Depth is measured in cm from the source-facing surface; each
//! layer occupies the half-open interval [start, end) so a photon sitting
//! exactly on a boundary belongs to the next layer.
//!
//! ## Author
//! Avermex Research Division

use serde::Serialize;

use crate::error::ShieldError;

// ============================================================================
// LAYER
// ============================================================================

/// A single material layer, immutable after construction.
///
/// Attenuation coefficients are linear (cm⁻¹) at the source energy. The
/// caller is responsible for supplying `mu_total >= mu_compton +
/// mu_photoelectric`; the stack tolerates a violation without validating
/// it, since partial channel data is common in tabulated sources.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    material: String,
    thickness_cm: f64,
    mu_total: f64,
    mu_compton: f64,
    mu_photoelectric: f64,
    density_g_cm3: f64,
}

impl Layer {
    /// Validate and construct a layer.
    ///
    /// Fails with [`ShieldError::InvalidLayer`] on non-positive thickness
    /// or density, or any negative attenuation coefficient.
    pub fn new(
        material: impl Into<String>,
        thickness_cm: f64,
        mu_total: f64,
        mu_compton: f64,
        mu_photoelectric: f64,
        density_g_cm3: f64,
    ) -> Result<Self, ShieldError> {
        let material = material.into();

        if !(thickness_cm > 0.0) {
            return Err(ShieldError::invalid_layer(
                &material,
                format!("thickness {} cm must be > 0", thickness_cm),
            ));
        }
        if !(density_g_cm3 > 0.0) {
            return Err(ShieldError::invalid_layer(
                &material,
                format!("density {} g/cm³ must be > 0", density_g_cm3),
            ));
        }
        for (name, mu) in [
            ("mu_total", mu_total),
            ("mu_compton", mu_compton),
            ("mu_photoelectric", mu_photoelectric),
        ] {
            if !(mu >= 0.0) {
                return Err(ShieldError::invalid_layer(
                    &material,
                    format!("{} {} cm⁻¹ must be >= 0", name, mu),
                ));
            }
        }

        Ok(Self {
            material,
            thickness_cm,
            mu_total,
            mu_compton,
            mu_photoelectric,
            density_g_cm3,
        })
    }

    /// Material label (opaque to the transport engine)
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Thickness (cm)
    pub fn thickness_cm(&self) -> f64 {
        self.thickness_cm
    }

    /// Total linear attenuation coefficient (cm⁻¹)
    pub fn mu_total(&self) -> f64 {
        self.mu_total
    }

    /// Compton scattering coefficient (cm⁻¹)
    pub fn mu_compton(&self) -> f64 {
        self.mu_compton
    }

    /// Photoelectric absorption coefficient (cm⁻¹)
    pub fn mu_photoelectric(&self) -> f64 {
        self.mu_photoelectric
    }

    /// Density (g/cm³), informational for 1-D transport
    pub fn density_g_cm3(&self) -> f64 {
        self.density_g_cm3
    }

    /// Mass of this layer over the given area (kg)
    pub fn mass_kg(&self, area_m2: f64) -> f64 {
        let area_cm2 = area_m2 * 10_000.0;
        let volume_cm3 = area_cm2 * self.thickness_cm;
        volume_cm3 * self.density_g_cm3 / 1000.0
    }
}

/// Ordered (material, thickness) snapshot entry for display and persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    pub material: String,
    pub thickness_cm: f64,
}

// ============================================================================
// LAYER STACK
// ============================================================================

/// Slab view returned by depth lookup: the containing layer plus its
/// absolute start/end boundaries (cm from the source face).
#[derive(Debug, Clone, Copy)]
pub struct Slab<'a> {
    pub index: usize,
    pub layer: &'a Layer,
    pub start_cm: f64,
    pub end_cm: f64,
}

/// Ordered stack of layers, source-to-detector.
///
/// Built incrementally by appends; read-only for the duration of a
/// simulation run. Mutating the stack while a run is in flight is a caller
/// contract violation (single-writer discipline).
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    /// Cumulative starting depth of each layer (starts[i] = Σ t_j, j < i)
    starts: Vec<f64>,
    total_thickness_cm: f64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a layer at the detector end of the stack.
    pub fn append_layer(
        &mut self,
        material: impl Into<String>,
        thickness_cm: f64,
        mu_total: f64,
        mu_compton: f64,
        mu_photoelectric: f64,
        density_g_cm3: f64,
    ) -> Result<(), ShieldError> {
        let layer = Layer::new(
            material,
            thickness_cm,
            mu_total,
            mu_compton,
            mu_photoelectric,
            density_g_cm3,
        )?;
        self.push(layer);
        Ok(())
    }

    /// Append an already-validated layer.
    pub fn push(&mut self, layer: Layer) {
        self.starts.push(self.total_thickness_cm);
        self.total_thickness_cm += layer.thickness_cm();
        self.layers.push(layer);
    }

    /// Remove all layers.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.starts.clear();
        self.total_thickness_cm = 0.0;
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Total shield thickness (cm)
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness_cm
    }

    /// Find the layer containing depth `d` (cm), with its boundaries.
    ///
    /// Layers are half-open [start, end): a depth exactly on a boundary
    /// resolves to the following layer. Returns `None` for depths at or
    /// beyond the detector face, or negative depths.
    pub fn layer_at_depth(&self, d: f64) -> Option<Slab<'_>> {
        if d < 0.0 || d >= self.total_thickness_cm {
            return None;
        }
        // Stacks are a handful of layers; linear scan beats bookkeeping.
        for (i, layer) in self.layers.iter().enumerate() {
            let start = self.starts[i];
            let end = start + layer.thickness_cm();
            if d < end {
                return Some(Slab {
                    index: i,
                    layer,
                    start_cm: start,
                    end_cm: end,
                });
            }
        }
        None
    }

    /// Ordered snapshot of layer descriptors for display/persistence.
    pub fn descriptors(&self) -> Vec<LayerDescriptor> {
        self.layers
            .iter()
            .map(|l| LayerDescriptor {
                material: l.material().to_string(),
                thickness_cm: l.thickness_cm(),
            })
            .collect()
    }

    /// Total shield mass over the given area (kg)
    pub fn total_mass_kg(&self, area_m2: f64) -> f64 {
        self.layers.iter().map(|l| l.mass_kg(area_m2)).sum()
    }

    /// Σ μ_total·t over all layers, the Beer-Lambert exponent
    pub fn optical_depth(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.mu_total() * l.thickness_cm())
            .sum()
    }
}
