pub mod power;
pub mod thermal;

pub use power::{PowerMap, PowerMapBin};
pub use thermal::{ThermalBin, ThermalGrid};

/// Bins per side of the unpadded thermal map.
pub const THERMAL_MAP_DIM: usize = 64;
/// Taps of the 1D thermal masks; odd so the mask has a center tap.
pub const THERMAL_MASK_DIM: usize = 11;
pub const THERMAL_MASK_CENTER: usize = THERMAL_MASK_DIM / 2;
/// Padding equals the mask radius, which keeps every convolution read inside the padded map.
pub const POWER_MAPS_PADDED_BINS: usize = THERMAL_MASK_CENTER;
pub const POWER_MAPS_DIM: usize = THERMAL_MAP_DIM + 2 * POWER_MAPS_PADDED_BINS;
