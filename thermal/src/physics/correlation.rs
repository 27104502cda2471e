use crate::grid::{PowerMap, ThermalGrid};

/// Pearson correlation between an unpadded power map and the thermal map.
///
/// Returns 0.0 when either map has no variance or the maps differ in size.
pub fn pearson_correlation(power_map: &PowerMap, thermal_map: &ThermalGrid) -> f64 {
    let dim = power_map.dim();
    if dim != thermal_map.dim() || dim == 0 {
        log::warn!(
            "Correlation of mismatching maps requested ({} vs {} bins per side)",
            dim,
            thermal_map.dim()
        );
        return 0.0;
    }
    let n = (dim * dim) as f64;

    let mut avg_power = 0.0;
    let mut avg_temp = 0.0;
    for (bin, tbin) in power_map.bins().iter().zip(thermal_map.bins()) {
        avg_power += bin.power_density;
        avg_temp += tbin.temp;
    }
    avg_power /= n;
    avg_temp /= n;

    let mut cov = 0.0;
    let mut var_power = 0.0;
    let mut var_temp = 0.0;
    for (bin, tbin) in power_map.bins().iter().zip(thermal_map.bins()) {
        let power_dev = bin.power_density - avg_power;
        let temp_dev = tbin.temp - avg_temp;
        cov += power_dev * temp_dev;
        var_power += power_dev * power_dev;
        var_temp += temp_dev * temp_dev;
    }

    let denom = (var_power * var_temp).sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }

    let correlation = cov / denom;
    log::trace!(
        "Pearson correlation of power and temperature: {:.4}",
        correlation
    );
    correlation
}
