pub mod clusters;
pub mod region;

pub use clusters::{Cluster, NetClustering};
pub use region::{HotspotRegion, RegionSet, RegionState};

use crate::grid::ThermalGrid;
use eda_common::db::core::LayoutDB;
use eda_common::util::config::HotspotConfig;
use eda_common::util::profiler::ScopedTimer;

/// Hotspot detection on the thermal map and clustering of net segments around the
/// hotspots, for steering signal TSVs away from them.
pub struct Clustering {
    config: HotspotConfig,
    regions: RegionSet,
    clustering: NetClustering,
}

impl Clustering {
    pub fn new(config: HotspotConfig) -> Self {
        Self {
            config,
            regions: RegionSet::new(),
            clustering: NetClustering::default(),
        }
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    pub fn net_clustering(&self) -> &NetClustering {
        &self.clustering
    }

    /// Hotspot detection followed by segment clustering.
    pub fn cluster_signal_tsvs(
        &mut self,
        grid: &mut ThermalGrid,
        layout: &LayoutDB,
    ) -> &NetClustering {
        let _timer = ScopedTimer::new("Hotspot clustering");

        self.determine_hotspots(grid);
        self.clustering = clusters::cluster_segments(&self.regions, grid, layout);

        log::trace!(
            "{} hotspot regions, {} clusters for {} nets",
            self.regions.len(),
            self.clustering.clusters.len(),
            layout.num_nets()
        );
        &self.clustering
    }

    /// Finds strict local maxima and grows a region around each, hottest peak first.
    ///
    /// An unclaimed neighbor `n` of member `m` joins while `n.temp <= m.temp` and
    /// `n.temp >= base_temp - growth_gradient_step`. A region finalizes after a step that
    /// adds nothing, or after a step that ran into an eligible bin claimed by an earlier
    /// (hotter) region. Regions smaller than `min_region_bins` are dropped and release
    /// their bins. A grid without strict maxima yields no regions.
    pub fn determine_hotspots(&mut self, grid: &mut ThermalGrid) -> &RegionSet {
        grid.reset_regions();
        self.regions.clear();

        let mut peaks: Vec<usize> = (0..grid.len())
            .filter(|&idx| {
                let temp = grid.bin(idx).temp;
                grid.neighbors(idx).iter().all(|&nb| temp > grid.bin(nb).temp)
            })
            .collect();
        peaks.sort_by(|&a, &b| {
            grid.bin(b)
                .temp
                .total_cmp(&grid.bin(a).temp)
                .then(a.cmp(&b))
        });

        let mut next_id = 0;
        for peak in peaks {
            if grid.bin(peak).region_id.is_some() {
                continue;
            }

            let id = next_id;
            next_id += 1;
            let mut region = HotspotRegion::new(id, peak, grid.bin(peak).temp);
            grid.bin_mut(peak).region_id = Some(id);

            self.grow_region(grid, &mut region);
            region.finalize(self.config.score_normalization);

            if region.len() < self.config.min_region_bins {
                log::trace!(
                    "Dropping hotspot region {} with {} bins",
                    region.id,
                    region.len()
                );
                for &bin in &region.bins {
                    grid.bin_mut(bin).region_id = None;
                }
                continue;
            }

            log::trace!(
                "Hotspot region {}: peak {:.3}, base {:.3}, {} bins, score {:.3}",
                region.id,
                region.peak_temp,
                region.base_temp,
                region.len(),
                region.score
            );
            self.regions.insert(region);
        }

        log::debug!("Determined {} hotspot regions", self.regions.len());
        &self.regions
    }

    fn grow_region(&self, grid: &mut ThermalGrid, region: &mut HotspotRegion) {
        let step = self.config.growth_gradient_step;

        while region.still_growing() {
            let threshold = region.base_temp - step;
            let mut added: Vec<(usize, f64)> = Vec::new();
            let mut blocked = false;

            for &member in &region.bins {
                let member_temp = grid.bin(member).temp;
                // Indexed so bins can be claimed while walking the adjacency
                for k in 0..grid.neighbors(member).len() {
                    let nb = grid.neighbors(member)[k];
                    let nb_temp = grid.bin(nb).temp;
                    if nb_temp > member_temp || nb_temp < threshold {
                        continue;
                    }
                    match grid.bin(nb).region_id {
                        Some(owner) if owner == region.id => {}
                        Some(_) => blocked = true,
                        None => {
                            grid.bin_mut(nb).region_id = Some(region.id);
                            added.push((nb, nb_temp));
                        }
                    }
                }
            }

            if added.is_empty() {
                break;
            }
            region.extend(&added);
            if blocked {
                break;
            }
        }
    }
}
