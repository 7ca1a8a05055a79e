//! # Materials Module
//!
//! Preset gamma attenuation data for common shielding materials.
//!
//! Linear attenuation coefficients are tabulated near 1 MeV, where Compton
//! scattering dominates for light and mid-Z materials and the photoelectric
//! channel only matters for high-Z absorbers like lead. Callers working at
//! other source energies should supply their own coefficients through
//! [`Layer::new`](crate::shield::Layer::new).
//!
//! ## Data Sources
//!
//! [1] NIST XCOM photon cross section database
//! [2] Shultis & Faw, "Radiation Shielding"

use crate::error::ShieldError;
use crate::shield::Layer;

/// Tabulated attenuation entry for one material at ~1 MeV
#[derive(Debug, Clone, Copy)]
pub struct AttenuationData {
    /// Total linear attenuation coefficient (cm⁻¹)
    pub mu_total: f64,
    /// Compton scattering coefficient (cm⁻¹)
    pub mu_compton: f64,
    /// Photoelectric absorption coefficient (cm⁻¹)
    pub mu_photoelectric: f64,
    /// Density (g/cm³)
    pub density_g_cm3: f64,
}

/// Common shielding materials with built-in ~1 MeV attenuation data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GammaMaterial {
    /// Lead - dense high-Z absorber with a strong photoelectric channel
    Lead,
    /// Carbon steel - structural shielding
    Steel,
    /// Ordinary concrete - bulk biological shielding
    Concrete,
    /// Water - pool / tank shielding
    Water,
}

impl GammaMaterial {
    /// All catalogued materials
    pub const ALL: [GammaMaterial; 4] = [
        GammaMaterial::Lead,
        GammaMaterial::Steel,
        GammaMaterial::Concrete,
        GammaMaterial::Water,
    ];

    /// Attenuation data near 1 MeV
    pub fn attenuation(&self) -> AttenuationData {
        match self {
            GammaMaterial::Lead => AttenuationData {
                mu_total: 0.77,
                mu_compton: 0.58,
                mu_photoelectric: 0.19,
                density_g_cm3: 11.34,
            },
            GammaMaterial::Steel => AttenuationData {
                mu_total: 0.468,
                mu_compton: 0.455,
                mu_photoelectric: 0.013,
                density_g_cm3: 7.85,
            },
            GammaMaterial::Concrete => AttenuationData {
                mu_total: 0.152,
                mu_compton: 0.149,
                mu_photoelectric: 0.003,
                density_g_cm3: 2.30,
            },
            GammaMaterial::Water => AttenuationData {
                mu_total: 0.0707,
                mu_compton: 0.0700,
                mu_photoelectric: 0.0007,
                density_g_cm3: 1.00,
            },
        }
    }

    /// Display name, also the lookup key for [`GammaMaterial::from_name`]
    pub fn name(&self) -> &'static str {
        match self {
            GammaMaterial::Lead => "Lead",
            GammaMaterial::Steel => "Steel",
            GammaMaterial::Concrete => "Concrete",
            GammaMaterial::Water => "Water",
        }
    }

    /// Case-insensitive catalog lookup
    pub fn from_name(name: &str) -> Option<GammaMaterial> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Build a validated layer of this material.
    pub fn layer(&self, thickness_cm: f64) -> Result<Layer, ShieldError> {
        let data = self.attenuation();
        Layer::new(
            self.name(),
            thickness_cm,
            data.mu_total,
            data.mu_compton,
            data.mu_photoelectric,
            data.density_g_cm3,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_physical() {
        for material in GammaMaterial::ALL {
            let data = material.attenuation();
            assert!(data.mu_total > 0.0);
            assert!(data.mu_compton >= 0.0);
            assert!(data.mu_photoelectric >= 0.0);
            assert!(data.density_g_cm3 > 0.0);
            // Channels never exceed the total they sum into
            assert!(data.mu_compton + data.mu_photoelectric <= data.mu_total + 1e-12);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(GammaMaterial::from_name("lead"), Some(GammaMaterial::Lead));
        assert_eq!(GammaMaterial::from_name("WATER"), Some(GammaMaterial::Water));
        assert_eq!(GammaMaterial::from_name("unobtainium"), None);
    }

    #[test]
    fn test_layer_builder() {
        let layer = GammaMaterial::Lead.layer(5.0).unwrap();
        assert_eq!(layer.material(), "Lead");
        assert!((layer.mu_total() - 0.77).abs() < 1e-12);

        assert!(GammaMaterial::Lead.layer(0.0).is_err());
    }

    #[test]
    fn test_density_ordering() {
        // Sanity: lead is the densest catalogued material, water the lightest
        let rho = |m: GammaMaterial| m.attenuation().density_g_cm3;
        assert!(rho(GammaMaterial::Lead) > rho(GammaMaterial::Steel));
        assert!(rho(GammaMaterial::Steel) > rho(GammaMaterial::Concrete));
        assert!(rho(GammaMaterial::Concrete) > rho(GammaMaterial::Water));
    }
}
