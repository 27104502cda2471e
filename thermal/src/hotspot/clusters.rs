use super::region::RegionSet;
use crate::grid::ThermalGrid;
use eda_common::db::core::LayoutDB;
use eda_common::db::indices::{NetId, SegmentId};
use eda_common::geom::rect::Rect;
use eda_common::geom::rtree::SpatialIndex;

/// Net segments of one layer sharing one hotspot region, or the segments of that layer
/// touching none (`region_id` is `None`).
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    pub layer: usize,
    pub region_id: Option<u32>,
    pub segments: Vec<SegmentId>,
    /// Sorted, without duplicates.
    pub nets: Vec<NetId>,
    /// Union of the member segments; `None` for an empty cluster.
    pub bb: Option<Rect>,
}

impl Cluster {
    pub fn is_safe(&self) -> bool {
        self.region_id.is_none()
    }
}

/// Clusters grouped by layer. Within a layer, hotspot clusters come in descending region
/// score and the layer's safe cluster comes last.
#[derive(Clone, Debug, Default)]
pub struct NetClustering {
    pub clusters: Vec<Cluster>,
    /// For every net, the indices into `clusters` its segments belong to.
    pub net_clusters: Vec<Vec<usize>>,
    // Start of each layer's run in `clusters`, plus the end of the last one
    layer_offsets: Vec<usize>,
}

impl NetClustering {
    pub fn layers(&self) -> usize {
        self.layer_offsets.len().saturating_sub(1)
    }

    pub fn layer_clusters(&self, layer: usize) -> &[Cluster] {
        match (self.layer_offsets.get(layer), self.layer_offsets.get(layer + 1)) {
            (Some(&start), Some(&end)) => &self.clusters[start..end],
            _ => &[],
        }
    }

    pub fn safe_cluster(&self, layer: usize) -> Option<&Cluster> {
        self.layer_clusters(layer).last().filter(|c| c.is_safe())
    }

    pub fn hotspot_clusters(&self, layer: usize) -> &[Cluster] {
        let clusters = self.layer_clusters(layer);
        match clusters.last() {
            Some(c) if c.is_safe() => &clusters[..clusters.len() - 1],
            _ => clusters,
        }
    }

    pub fn num_hotspot_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| !c.is_safe()).count()
    }
}

/// Assigns every net segment to the highest-scored hotspot region it overlaps (fully or
/// partially) on its own layer; the rest form that layer's safe cluster. Hotspot clusters
/// without segments are left out.
pub fn cluster_segments(
    regions: &RegionSet,
    grid: &ThermalGrid,
    layout: &LayoutDB,
) -> NetClustering {
    let mut layer_segments: Vec<Vec<usize>> = vec![Vec::new(); layout.layers];
    for (seg, segment) in layout.segments.iter().enumerate() {
        match layer_segments.get_mut(segment.layer) {
            Some(list) => list.push(seg),
            None => log::trace!("Segment {} on unknown layer {}", seg, segment.layer),
        }
    }

    let mut clusters = Vec::with_capacity(layout.layers * (regions.len() + 1));
    let mut layer_offsets = Vec::with_capacity(layout.layers + 1);

    for (layer, segs) in layer_segments.iter().enumerate() {
        layer_offsets.push(clusters.len());

        let rects: Vec<Rect> = segs.iter().map(|&s| layout.segments[s].bb).collect();
        let index = SpatialIndex::from_rects(&rects);
        let mut assigned = vec![false; segs.len()];

        for region in regions {
            let mut cluster = Cluster {
                layer,
                region_id: Some(region.id),
                ..Cluster::default()
            };

            for &bin in &region.bins {
                for local in index.query_overlapping(grid.bin(bin).bb) {
                    if !assigned[local] {
                        assigned[local] = true;
                        cluster.segments.push(SegmentId::new(segs[local]));
                    }
                }
            }

            if !cluster.segments.is_empty() {
                log::trace!(
                    "Hotspot region {} (score {:.3}) covers {} segments on layer {}",
                    region.id,
                    region.score,
                    cluster.segments.len(),
                    layer
                );
                clusters.push(cluster);
            }
        }

        let safe: Vec<SegmentId> = segs
            .iter()
            .zip(&assigned)
            .filter(|&(_, &done)| !done)
            .map(|(&seg, _)| SegmentId::new(seg))
            .collect();
        log::trace!(
            "Layer {}: {} of {} segments outside hotspots",
            layer,
            safe.len(),
            index.len()
        );
        clusters.push(Cluster {
            layer,
            segments: safe,
            ..Cluster::default()
        });
    }
    layer_offsets.push(clusters.len());

    let mut net_clusters = vec![Vec::new(); layout.num_nets()];
    for (cluster_idx, cluster) in clusters.iter_mut().enumerate() {
        cluster.segments.sort();
        for &seg in &cluster.segments {
            let segment = &layout.segments[seg.index()];
            cluster.nets.push(segment.net);
            cluster.bb = Some(match cluster.bb {
                Some(bb) => bb.bounding_box(&segment.bb),
                None => segment.bb,
            });
            if let Some(list) = net_clusters.get_mut(segment.net.index()) {
                list.push(cluster_idx);
            }
        }
        cluster.nets.sort();
        cluster.nets.dedup();
    }
    for list in net_clusters.iter_mut() {
        list.dedup();
    }

    NetClustering {
        clusters,
        net_clusters,
        layer_offsets,
    }
}
