pub mod blurring;
pub mod correlation;
pub mod entropy;
pub mod masks;
pub mod power_maps;

use crate::grid::{
    POWER_MAPS_DIM, POWER_MAPS_PADDED_BINS, PowerMap, THERMAL_MAP_DIM, ThermalGrid,
};
use crate::utils::conversion::GridConverter;
use eda_common::db::core::LayoutDB;
use eda_common::db::indices::NetId;
use eda_common::error::ConfigError;
use eda_common::geom::rect::Rect;
use eda_common::util::config::ThermalConfig;
use eda_common::util::profiler::ScopedTimer;
use masks::ThermalMasks;

/// Scalar outcome of one power-blurring run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThermalStats {
    /// `avg_temp * max_temp`; the value the floorplan optimizer minimizes.
    pub cost_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub temp_offset: f64,
}

pub struct ThermalAnalysisResult<'a> {
    pub stats: ThermalStats,
    pub thermal_map: &'a ThermalGrid,
}

/// Per-wiring-layer aggregate: one box covering all nets on the layer plus their power.
#[derive(Clone, Copy, Debug, Default)]
pub struct WireAggregate {
    pub bb: Option<Rect>,
    pub total_power: f64,
}

/// Buffers of the thermal core, allocated once per die outline and reset per evaluation.
pub struct ThermalAnalyzer {
    pub layers: usize,
    pub die_area: Rect,
    pub converter: GridConverter,

    /// Padded maps, convolution input.
    pub power_maps: Vec<PowerMap>,
    /// Unpadded copies of the block power, for clustering and cross analysis.
    pub power_maps_orig: Vec<PowerMap>,
    pub wires: Vec<WireAggregate>,

    pub thermal_map: ThermalGrid,
    // Horizontal-pass buffer, sized like a padded map
    thermal_map_tmp: Vec<f64>,
}

impl ThermalAnalyzer {
    pub fn new(layers: usize, die_area: Rect) -> Result<Self, ConfigError> {
        if layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if die_area.is_empty() {
            return Err(ConfigError::InvalidDieOutline {
                width: die_area.width(),
                height: die_area.height(),
            });
        }

        Ok(Self {
            layers,
            die_area,
            converter: GridConverter::new(&die_area, THERMAL_MAP_DIM, POWER_MAPS_PADDED_BINS),
            power_maps: vec![PowerMap::new(POWER_MAPS_DIM); layers],
            power_maps_orig: vec![PowerMap::new(THERMAL_MAP_DIM); layers],
            wires: vec![WireAggregate::default(); layers],
            thermal_map: ThermalGrid::new(&die_area),
            thermal_map_tmp: vec![0.0; POWER_MAPS_DIM * POWER_MAPS_DIM],
        })
    }

    /// Full thermal estimate of one layout: blocks, TSVs and wiring onto the power maps,
    /// then power blurring with the prebuilt `masks`.
    pub fn analyze(
        &mut self,
        layout: &LayoutDB,
        masks: &ThermalMasks,
        config: &ThermalConfig,
    ) -> ThermalAnalysisResult<'_> {
        let _timer = ScopedTimer::new("Thermal analysis");

        if layout.layers != self.layers {
            log::debug!(
                "Layout has {} layers, analyzer is set up for {}; extra layers are ignored",
                layout.layers,
                self.layers
            );
        }

        power_maps::generate_power_maps(self, &layout.blocks, config);
        power_maps::adapt_power_maps_tsvs(self, &layout.tsv_islands, config);

        power_maps::reset_wires(self);
        for net_id in NetId::range(layout.num_nets()) {
            let net = &layout.nets[net_id.index()];
            let layer_boxes = layout.net_layer_bboxes(net_id);
            if layer_boxes.is_empty() {
                continue;
            }
            // Wire power is split evenly over the layers the net occupies
            let share = net.wire_power / layer_boxes.len() as f64;
            for (layer, bb) in layer_boxes {
                power_maps::adapt_power_maps_wires_helper(self, layer, &bb, share);
            }
        }
        power_maps::adapt_power_maps_wires(self);

        let stats = blurring::perform_power_blurring(self, masks, config);

        ThermalAnalysisResult {
            stats,
            thermal_map: &self.thermal_map,
        }
    }
}
