//! Fast thermal estimation for 3D-IC floorplans: power maps built from blocks, TSV islands
//! and wiring are blurred with per-layer Gaussian masks into a die-level thermal map, on
//! which hotspot regions are detected and net segments clustered.

pub mod grid;
pub mod hotspot;
pub mod physics;
pub mod utils;

use eda_common::db::core::LayoutDB;
use eda_common::error::ConfigError;
use eda_common::geom::rect::Rect;
use eda_common::util::config::{HotspotConfig, ThermalConfig};
use grid::ThermalGrid;
use hotspot::{Clustering, NetClustering, RegionSet};
use physics::masks::ThermalMasks;
use physics::{ThermalAnalyzer, ThermalStats};

/// Everything one evaluation produced. Borrowed from the engine, valid until the next run.
pub struct Evaluation<'a> {
    pub stats: ThermalStats,
    pub thermal_map: &'a ThermalGrid,
    pub hotspots: &'a RegionSet,
    pub clusters: &'a NetClustering,
}

/// Owns the masks (fixed for the run) and all per-evaluation buffers.
pub struct ThermalEngine {
    thermal: ThermalConfig,
    masks: ThermalMasks,
    analyzer: ThermalAnalyzer,
    clustering: Clustering,
}

impl ThermalEngine {
    pub fn new(
        layers: usize,
        die_area: Rect,
        thermal: ThermalConfig,
        hotspot: HotspotConfig,
    ) -> Result<Self, ConfigError> {
        thermal.validate()?;
        hotspot.validate()?;
        let masks = ThermalMasks::build(layers, &thermal)?;
        let analyzer = ThermalAnalyzer::new(layers, die_area)?;

        log::info!(
            "Thermal engine ready: {} layers, die {:.1} x {:.1}",
            layers,
            die_area.width(),
            die_area.height()
        );

        Ok(Self {
            thermal,
            masks,
            analyzer,
            clustering: Clustering::new(hotspot),
        })
    }

    pub fn analyzer(&self) -> &ThermalAnalyzer {
        &self.analyzer
    }

    /// Thermal analysis only. The thermal map comes back without hotspot claims.
    pub fn analyze(&mut self, layout: &LayoutDB) -> ThermalStats {
        self.analyzer.analyze(layout, &self.masks, &self.thermal).stats
    }

    /// Thermal analysis followed by hotspot detection and net clustering.
    pub fn evaluate(&mut self, layout: &LayoutDB) -> Evaluation<'_> {
        let stats = self.analyze(layout);
        self.clustering
            .cluster_signal_tsvs(&mut self.analyzer.thermal_map, layout);

        Evaluation {
            stats,
            thermal_map: &self.analyzer.thermal_map,
            hotspots: self.clustering.regions(),
            clusters: self.clustering.net_clustering(),
        }
    }
}
