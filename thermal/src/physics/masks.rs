use crate::grid::{THERMAL_MASK_CENTER, THERMAL_MASK_DIM};
use eda_common::error::ConfigError;
use eda_common::util::config::ThermalConfig;

/// Spread of the fitted gauss function. Any constant works; fitting only needs the
/// amplitude and the boundary value.
const SPREAD: f64 = 1.0;

pub type ThermalMask = [f64; THERMAL_MASK_DIM];

/// 1D gauss function; the impulse response for power blurring.
#[inline]
pub fn gauss_1d(value: f64, factor: f64, spread: f64) -> f64 {
    factor * (-(1.0 / spread) * value.powi(2)).exp()
}

/// Separable thermal masks, one per layer, index 0 for the layer next to the heat path.
///
/// The 2D mask of layer `l` is `mask[i] * mask[j]`; it peaks with
/// `impulse_factor / l^impulse_factor_scaling_exponent` at the center and, for the first
/// layer, drops to `mask_boundary_value` at the outermost corner tap.
#[derive(Clone, Debug)]
pub struct ThermalMasks {
    masks: Vec<ThermalMask>,
}

impl ThermalMasks {
    pub fn build(layers: usize, config: &ThermalConfig) -> Result<Self, ConfigError> {
        if layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if config.impulse_factor <= 0.0 {
            return Err(ConfigError::InvalidImpulseFactor(config.impulse_factor));
        }
        if config.mask_boundary_value <= 0.0 {
            return Err(ConfigError::InvalidBoundaryValue(config.mask_boundary_value));
        }
        if config.mask_boundary_value >= config.impulse_factor {
            return Err(ConfigError::BoundaryNotBelowImpulse {
                boundary: config.mask_boundary_value,
                impulse: config.impulse_factor,
            });
        }

        // gauss(x = y = center) == boundary value for the 2D mask of the first layer
        let scale = (SPREAD * (config.impulse_factor / config.mask_boundary_value).ln()).sqrt()
            / 2.0_f64.sqrt()
            / THERMAL_MASK_CENTER as f64;

        let mut masks = Vec::with_capacity(layers);
        for l in 1..=layers {
            let layer_impulse_factor =
                config.impulse_factor / (l as f64).powf(config.impulse_factor_scaling_exponent);
            // Both convolution passes multiply the mask in, hence the sqrt
            let amplitude = layer_impulse_factor.sqrt();

            let mut mask = [0.0; THERMAL_MASK_DIM];
            for (i, tap) in mask.iter_mut().enumerate() {
                let offset = i as f64 - THERMAL_MASK_CENTER as f64;
                *tap = gauss_1d(offset * scale, amplitude, SPREAD);
            }
            masks.push(mask);
        }

        for (layer, mask) in masks.iter().enumerate() {
            log::debug!("Thermal 1D mask for layer {}: {:.6?}", layer, mask);
        }

        Ok(Self { masks })
    }

    pub fn layers(&self) -> usize {
        self.masks.len()
    }

    pub fn mask(&self, layer: usize) -> &ThermalMask {
        &self.masks[layer]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThermalMask> {
        self.masks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ThermalConfig {
        ThermalConfig {
            impulse_factor: 1.8,
            impulse_factor_scaling_exponent: 1.0,
            mask_boundary_value: 0.02,
            ..ThermalConfig::default()
        }
    }

    #[test]
    fn test_fitting_round_trip() {
        let cfg = config();
        let masks = ThermalMasks::build(3, &cfg).unwrap();
        let mask = masks.mask(0);

        let center = mask[THERMAL_MASK_CENTER];
        assert!((center * center - cfg.impulse_factor).abs() < 1e-12);

        let corner = mask[0] * mask[0];
        assert!((corner - cfg.mask_boundary_value).abs() < 1e-12);
        assert!((mask[THERMAL_MASK_DIM - 1] * mask[0] - cfg.mask_boundary_value).abs() < 1e-12);
    }

    #[test]
    fn test_masks_are_symmetric() {
        let masks = ThermalMasks::build(4, &config()).unwrap();
        for mask in masks.iter() {
            for i in 0..THERMAL_MASK_CENTER {
                assert_eq!(mask[i], mask[THERMAL_MASK_DIM - 1 - i]);
                assert!(mask[i] < mask[i + 1]);
            }
        }
    }

    #[test]
    fn test_amplitude_decays_with_layer() {
        let cfg = config();
        let masks = ThermalMasks::build(3, &cfg).unwrap();
        assert_eq!(masks.layers(), 3);

        for l in 1..=3 {
            let center = masks.mask(l - 1)[THERMAL_MASK_CENTER];
            let expected = cfg.impulse_factor / l as f64;
            assert!((center * center - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = ThermalMasks::build(2, &config()).unwrap();
        let b = ThermalMasks::build(2, &config()).unwrap();
        assert_eq!(a.mask(0), b.mask(0));
        assert_eq!(a.mask(1), b.mask(1));
    }

    #[test]
    fn test_invalid_parameters_are_fatal() {
        let bad = ThermalConfig {
            impulse_factor: 0.01,
            mask_boundary_value: 0.02,
            ..ThermalConfig::default()
        };
        assert!(matches!(
            ThermalMasks::build(2, &bad),
            Err(ConfigError::BoundaryNotBelowImpulse { .. })
        ));

        let zero = ThermalConfig {
            mask_boundary_value: 0.0,
            ..ThermalConfig::default()
        };
        assert_eq!(
            ThermalMasks::build(2, &zero).unwrap_err(),
            ConfigError::InvalidBoundaryValue(0.0)
        );
        assert_eq!(
            ThermalMasks::build(0, &config()).unwrap_err(),
            ConfigError::NoLayers
        );
    }
}
