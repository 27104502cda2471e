use crate::error::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thermal: ThermalConfig,
    #[serde(default)]
    pub hotspot: HotspotConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thermal: ThermalConfig::default(),
            hotspot: HotspotConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thermal.validate()?;
        self.hotspot.validate()?;
        self.layout.validate()
    }
}

/// Power-blurring parameters; shared by the mask builder, the power-map builder and the
/// blurring engine.
#[derive(Debug, Deserialize, Clone)]
pub struct ThermalConfig {
    #[serde(default = "default_impulse_factor")]
    pub impulse_factor: f64,
    #[serde(default = "default_impulse_factor_scaling_exponent")]
    pub impulse_factor_scaling_exponent: f64,
    #[serde(default = "default_mask_boundary_value")]
    pub mask_boundary_value: f64,
    #[serde(default = "default_power_density_scaling_padding_zone")]
    pub power_density_scaling_padding_zone: f64,
    #[serde(default = "default_power_density_scaling_tsv_region")]
    pub power_density_scaling_tsv_region: f64,
    #[serde(default = "default_temp_offset")]
    pub temp_offset: f64,
    #[serde(default = "default_padding_zone_blocks_distance_limit")]
    pub padding_zone_blocks_distance_limit: f64,
    #[serde(default = "default_extend_boundary_blocks")]
    pub extend_boundary_blocks_into_padding_zone: bool,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            impulse_factor: default_impulse_factor(),
            impulse_factor_scaling_exponent: default_impulse_factor_scaling_exponent(),
            mask_boundary_value: default_mask_boundary_value(),
            power_density_scaling_padding_zone: default_power_density_scaling_padding_zone(),
            power_density_scaling_tsv_region: default_power_density_scaling_tsv_region(),
            temp_offset: default_temp_offset(),
            padding_zone_blocks_distance_limit: default_padding_zone_blocks_distance_limit(),
            extend_boundary_blocks_into_padding_zone: default_extend_boundary_blocks(),
        }
    }
}

impl ThermalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.impulse_factor <= 0.0 || !self.impulse_factor.is_finite() {
            return Err(ConfigError::InvalidImpulseFactor(self.impulse_factor));
        }
        if self.mask_boundary_value <= 0.0 || !self.mask_boundary_value.is_finite() {
            return Err(ConfigError::InvalidBoundaryValue(self.mask_boundary_value));
        }
        if self.mask_boundary_value >= self.impulse_factor {
            return Err(ConfigError::BoundaryNotBelowImpulse {
                boundary: self.mask_boundary_value,
                impulse: self.impulse_factor,
            });
        }
        check_range(
            "power_density_scaling_tsv_region",
            self.power_density_scaling_tsv_region,
            0.0,
            1.0,
        )?;
        check_range(
            "power_density_scaling_padding_zone",
            self.power_density_scaling_padding_zone,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "padding_zone_blocks_distance_limit",
            self.padding_zone_blocks_distance_limit,
            0.0,
            1.0,
        )?;
        check_range(
            "impulse_factor_scaling_exponent",
            self.impulse_factor_scaling_exponent,
            0.0,
            f64::MAX,
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HotspotConfig {
    #[serde(default = "default_growth_gradient_step")]
    pub growth_gradient_step: f64,
    #[serde(default = "default_min_region_bins")]
    pub min_region_bins: usize,
    #[serde(default = "default_score_normalization")]
    pub score_normalization: f64,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            growth_gradient_step: default_growth_gradient_step(),
            min_region_bins: default_min_region_bins(),
            score_normalization: default_score_normalization(),
        }
    }
}

impl HotspotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "growth_gradient_step",
            self.growth_gradient_step,
            0.0,
            f64::MAX,
        )?;
        check_range(
            "score_normalization",
            self.score_normalization,
            f64::MIN_POSITIVE,
            f64::MAX,
        )
    }
}

/// Shape of the generated layouts driven through the thermal core by the CLI.
#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_die_width")]
    pub die_width: f64,
    #[serde(default = "default_die_height")]
    pub die_height: f64,
    #[serde(default = "default_layers")]
    pub layers: usize,
    #[serde(default = "default_num_blocks")]
    pub num_blocks: usize,
    #[serde(default = "default_num_nets")]
    pub num_nets: usize,
    #[serde(default = "default_num_tsv_islands")]
    pub num_tsv_islands: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            die_width: default_die_width(),
            die_height: default_die_height(),
            layers: default_layers(),
            num_blocks: default_num_blocks(),
            num_nets: default_num_nets(),
            num_tsv_islands: default_num_tsv_islands(),
            seed: default_seed(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if self.die_width <= 0.0 || self.die_height <= 0.0 {
            return Err(ConfigError::InvalidDieOutline {
                width: self.die_width,
                height: self.die_height,
            });
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn default_impulse_factor() -> f64 {
    1.0
}

fn default_impulse_factor_scaling_exponent() -> f64 {
    0.75
}

fn default_mask_boundary_value() -> f64 {
    0.01
}

fn default_power_density_scaling_padding_zone() -> f64 {
    0.6
}

fn default_power_density_scaling_tsv_region() -> f64 {
    0.5
}

fn default_temp_offset() -> f64 {
    293.15
}

fn default_padding_zone_blocks_distance_limit() -> f64 {
    0.01
}

fn default_extend_boundary_blocks() -> bool {
    true
}

fn default_growth_gradient_step() -> f64 {
    0.5
}

fn default_min_region_bins() -> usize {
    1
}

fn default_score_normalization() -> f64 {
    1.0
}

fn default_die_width() -> f64 {
    5000.0
}

fn default_die_height() -> f64 {
    5000.0
}

fn default_layers() -> usize {
    2
}

fn default_num_blocks() -> usize {
    40
}

fn default_num_nets() -> usize {
    120
}

fn default_num_tsv_islands() -> usize {
    6
}

fn default_seed() -> u64 {
    42
}
