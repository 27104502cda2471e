use super::{ThermalAnalyzer, WireAggregate};
use eda_common::db::core::{BlockData, TsvIsland};
use eda_common::geom::rect::Rect;
use eda_common::util::config::ThermalConfig;

/// Rasterizes the blocks of every layer onto the padded power maps, then copies the
/// unpadded interior into `power_maps_orig`.
///
/// Bins fully covered by a block take its full power density; boundary bins take the
/// density scaled by their covered area fraction. Bins inside the padding zone are
/// additionally scaled by `power_density_scaling_padding_zone`.
///
/// With `extend_boundary_blocks_into_padding_zone`, blocks at the left/lower die edge are
/// not shifted by the padding offset (they stretch into the padding), and blocks within
/// `padding_zone_blocks_distance_limit` of the right/upper edge are stretched up to the
/// outer edge of the padded map.
pub fn generate_power_maps(
    ctx: &mut ThermalAnalyzer,
    blocks: &[BlockData],
    config: &ThermalConfig,
) {
    for layer in 0..ctx.layers {
        ctx.power_maps[layer].reset();
        ctx.power_maps_orig[layer].reset();
    }

    let conv = &ctx.converter;
    let die_w = ctx.die_area.width();
    let die_h = ctx.die_area.height();
    let offset_x = conv.offset_x();
    let offset_y = conv.offset_y();
    let right_distance = config.padding_zone_blocks_distance_limit * die_w;
    let upper_distance = config.padding_zone_blocks_distance_limit * die_h;
    let extend = config.extend_boundary_blocks_into_padding_zone;
    let bin_area = conv.bin_area();

    for block in blocks {
        if block.layer >= ctx.layers {
            log::trace!("Block '{}' on unknown layer {}", block.name, block.layer);
            continue;
        }

        let bb = conv.to_die_relative(&block.bb);
        if bb.is_empty() || block.power_density == 0.0 {
            continue;
        }

        let mut offset = bb;
        if !(extend && bb.min.x <= 0.0) {
            offset.min.x += offset_x;
        }
        if !(extend && bb.min.y <= 0.0) {
            offset.min.y += offset_y;
        }
        if extend && (die_w - bb.max.x).abs() < right_distance {
            offset.max.x = die_w + 2.0 * offset_x;
        } else {
            offset.max.x += offset_x;
        }
        if extend && (die_h - bb.max.y).abs() < upper_distance {
            offset.max.y = die_h + 2.0 * offset_y;
        } else {
            offset.max.y += offset_y;
        }

        let map = &mut ctx.power_maps[block.layer];
        let (xs, ys) = conv.bin_range(&offset);

        for y in ys.clone() {
            for x in xs.clone() {
                let fully_covered =
                    xs.start < x && x + 1 < xs.end && ys.start < y && y + 1 < ys.end;
                let coverage = if fully_covered {
                    1.0
                } else {
                    conv.bin_rect(x, y).intersection_area(&offset) / bin_area
                };
                if coverage <= 0.0 {
                    continue;
                }

                let scale = if conv.is_padding(x, y) {
                    config.power_density_scaling_padding_zone
                } else {
                    1.0
                };
                map.get_mut(x, y).power_density += block.power_density * coverage * scale;
            }
        }
    }

    let pad = conv.padding_bins();
    for layer in 0..ctx.layers {
        let orig_dim = ctx.power_maps_orig[layer].dim();
        for y in 0..orig_dim {
            for x in 0..orig_dim {
                let density = ctx.power_maps[layer].power_density(x + pad, y + pad);
                ctx.power_maps_orig[layer].get_mut(x, y).power_density += density;
            }
        }
    }
}

/// Maps TSV densities of real and dummy islands, then lowers the power density of every
/// interior bin with TSVs.
///
/// The down-scaling interpolates linearly between 1.0 (no TSVs) and
/// `power_density_scaling_tsv_region` (100% coverage). Only the padded maps are adapted;
/// `power_maps_orig` keeps the plain block power.
pub fn adapt_power_maps_tsvs(
    ctx: &mut ThermalAnalyzer,
    tsvs: &[TsvIsland],
    config: &ThermalConfig,
) {
    let dummies = tsvs.iter().filter(|t| t.is_dummy).count();
    log::trace!("Mapping {} TSV islands ({} dummy)", tsvs.len(), dummies);

    for tsv in tsvs {
        adapt_power_maps_tsvs_helper(ctx, tsv);
    }

    let pad = ctx.converter.padding_bins();
    let interior = pad..(ctx.converter.padded_dim() - pad);
    let factor = (config.power_density_scaling_tsv_region - 1.0) / 100.0;

    for map in ctx.power_maps.iter_mut() {
        for y in interior.clone() {
            for x in interior.clone() {
                let bin = map.get_mut(x, y);
                // Overlapping islands may sum up beyond full coverage
                bin.tsv_density = bin.tsv_density.min(100.0);

                if bin.tsv_density == 0.0 {
                    continue;
                }
                bin.power_density *= 1.0 + factor * bin.tsv_density;
            }
        }
    }
}

fn adapt_power_maps_tsvs_helper(ctx: &mut ThermalAnalyzer, tsv: &TsvIsland) {
    if tsv.layer >= ctx.layers {
        log::trace!("TSV island '{}' on unknown layer {}", tsv.name, tsv.layer);
        return;
    }

    let conv = &ctx.converter;
    let offset = conv.to_padded(&tsv.bb);
    if offset.is_empty() {
        return;
    }

    let bin_area = conv.bin_area();
    let (xs, ys) = conv.bin_range(&offset);
    let map = &mut ctx.power_maps[tsv.layer];

    for y in ys.clone() {
        for x in xs.clone() {
            let fully_covered = xs.start < x && x + 1 < xs.end && ys.start < y && y + 1 < ys.end;
            if fully_covered {
                map.get_mut(x, y).tsv_density += 100.0;
            } else {
                let coverage = conv.bin_rect(x, y).intersection_area(&offset) / bin_area;
                map.get_mut(x, y).tsv_density += 100.0 * coverage;
            }
        }
    }
}

pub fn reset_wires(ctx: &mut ThermalAnalyzer) {
    ctx.wires.fill(WireAggregate::default());
}

/// Folds one net's wiring on `layer` into that layer's aggregate box.
///
/// All nets of a layer end up in a single box.
pub fn adapt_power_maps_wires_helper(
    ctx: &mut ThermalAnalyzer,
    layer: usize,
    net_bb: &Rect,
    total_wire_power: f64,
) {
    let Some(aggregate) = ctx.wires.get_mut(layer) else {
        return;
    };

    aggregate.bb = Some(match aggregate.bb {
        Some(bb) => bb.bounding_box(net_bb),
        None => *net_bb,
    });
    aggregate.total_power += total_wire_power;
}

/// Spreads each layer's aggregated wire power uniformly over its box. Partially covered
/// bins count as fully covered.
pub fn adapt_power_maps_wires(ctx: &mut ThermalAnalyzer) {
    for layer in 0..ctx.wires.len() {
        let Some(bb) = ctx.wires[layer].bb else {
            continue;
        };

        let offset = ctx.converter.to_padded(&bb);
        let area = offset.area();
        if area <= 0.0 {
            continue;
        }
        let power_density = ctx.wires[layer].total_power / area;

        let (xs, ys) = ctx.converter.bin_range(&offset);
        let map = &mut ctx.power_maps[layer];
        for y in ys {
            for x in xs.clone() {
                map.get_mut(x, y).power_density += power_density;
            }
        }
    }
}
