use super::masks::ThermalMasks;
use super::{ThermalAnalyzer, ThermalStats};
use crate::grid::{POWER_MAPS_DIM, POWER_MAPS_PADDED_BINS, THERMAL_MAP_DIM, THERMAL_MASK_CENTER};
use eda_common::util::config::ThermalConfig;

/// Power blurring: convolves every layer's padded power map with that layer's mask and
/// sums the results, on top of `temp_offset`, into the thermal map of the reference layer.
///
/// The 2D convolution runs as two 1D passes. The horizontal pass covers the full padded
/// height so the vertical pass reads valid data inside the padding zone; the padding is as
/// wide as the mask radius, so no index ever leaves the padded map. Masks are symmetric,
/// no kernel flipping required.
pub fn perform_power_blurring(
    ctx: &mut ThermalAnalyzer,
    masks: &ThermalMasks,
    config: &ThermalConfig,
) -> ThermalStats {
    let pad = POWER_MAPS_PADDED_BINS;
    let interior = pad..(THERMAL_MAP_DIM + pad);

    // Claims of the previous candidate's hotspots are stale as well
    ctx.thermal_map.reset_temperatures(config.temp_offset);
    ctx.thermal_map.reset_regions();

    let layers = ctx.layers.min(masks.layers());
    for layer in 0..layers {
        let mask = masks.mask(layer);
        let map = &ctx.power_maps[layer];
        let tmp = &mut ctx.thermal_map_tmp;
        tmp.fill(0.0);

        // Horizontal pass; tmp is indexed like the padded map
        for y in 0..POWER_MAPS_DIM {
            let row = y * POWER_MAPS_DIM;
            for x in interior.clone() {
                let mut sum = 0.0;
                for (mask_i, weight) in mask.iter().enumerate() {
                    let i = x + mask_i - THERMAL_MASK_CENTER;
                    sum += map.power_density(i, y) * weight;
                }
                tmp[row + x] = sum;
            }
        }

        // Vertical pass, accumulated into the unpadded thermal map
        for y in interior.clone() {
            for x in interior.clone() {
                let mut sum = 0.0;
                for (mask_i, weight) in mask.iter().enumerate() {
                    let i = y + mask_i - THERMAL_MASK_CENTER;
                    sum += tmp[i * POWER_MAPS_DIM + x] * weight;
                }
                ctx.thermal_map.add_temp(x - pad, y - pad, sum);
            }
        }
    }

    let max_temp = ctx.thermal_map.max_temp();
    let avg_temp = ctx.thermal_map.avg_temp();

    log::trace!(
        "Power blurring: max temp {:.4}, avg temp {:.4}",
        max_temp,
        avg_temp
    );

    ThermalStats {
        cost_temp: avg_temp * max_temp,
        max_temp,
        avg_temp,
        temp_offset: config.temp_offset,
    }
}
