use crate::db::indices::*;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct BlockData {
    pub name: String,
    pub layer: usize,
    pub bb: Rect,
    /// Power per unit area.
    pub power_density: f64,
}

impl BlockData {
    pub fn power(&self) -> f64 {
        self.power_density * self.bb.area()
    }
}

#[derive(Clone, Debug)]
pub struct NetData {
    pub name: String,
    /// Total power dissipated by the net's wiring.
    pub wire_power: f64,
    pub segments: Vec<SegmentId>,
}

#[derive(Clone, Debug)]
pub struct NetSegment {
    pub net: NetId,
    pub layer: usize,
    pub bb: Rect,
}

#[derive(Clone, Debug)]
pub struct TsvIsland {
    pub name: String,
    pub layer: usize,
    pub bb: Rect,
    pub is_dummy: bool,
}

/// One floorplan candidate: die outline, stacked layers and everything placed on them.
pub struct LayoutDB {
    pub layers: usize,
    pub die_area: Rect,

    pub blocks: Vec<BlockData>,
    pub nets: Vec<NetData>,
    pub segments: Vec<NetSegment>,
    pub tsv_islands: Vec<TsvIsland>,

    pub block_name_map: HashMap<String, BlockId>,
    pub net_name_map: HashMap<String, NetId>,
}

impl LayoutDB {
    pub fn new(layers: usize, die_width: f64, die_height: f64) -> Self {
        Self {
            layers,
            die_area: Rect::new(Point::new(0.0, 0.0), Point::new(die_width, die_height)),
            blocks: Vec::with_capacity(100),
            nets: Vec::with_capacity(500),
            segments: Vec::with_capacity(1000),
            tsv_islands: Vec::new(),
            block_name_map: HashMap::new(),
            net_name_map: HashMap::new(),
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn die_outline(&self) -> Point<f64> {
        Point::new(self.die_area.width(), self.die_area.height())
    }

    pub fn add_block(
        &mut self,
        name: String,
        layer: usize,
        bb: Rect,
        power_density: f64,
    ) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        self.blocks.push(BlockData {
            name: name.clone(),
            layer,
            bb,
            power_density,
        });
        self.block_name_map.insert(name, id);
        id
    }

    pub fn add_net(&mut self, name: String, wire_power: f64) -> NetId {
        if let Some(&id) = self.net_name_map.get(&name) {
            return id;
        }
        let id = NetId::new(self.nets.len());
        self.nets.push(NetData {
            name: name.clone(),
            wire_power,
            segments: Vec::new(),
        });
        self.net_name_map.insert(name, id);
        id
    }

    pub fn add_segment(&mut self, net: NetId, layer: usize, bb: Rect) -> SegmentId {
        let id = SegmentId::new(self.segments.len());
        self.segments.push(NetSegment { net, layer, bb });
        self.nets[net.index()].segments.push(id);
        id
    }

    pub fn add_tsv_island(
        &mut self,
        name: String,
        layer: usize,
        bb: Rect,
        is_dummy: bool,
    ) -> TsvId {
        let id = TsvId::new(self.tsv_islands.len());
        self.tsv_islands.push(TsvIsland {
            name,
            layer,
            bb,
            is_dummy,
        });
        id
    }

    /// Total block power placed on `layer`.
    pub fn layer_block_power(&self, layer: usize) -> f64 {
        self.blocks
            .iter()
            .filter(|b| b.layer == layer)
            .map(|b| b.power())
            .sum()
    }

    /// Per-layer bounding boxes of a net's segments, in layer order.
    pub fn net_layer_bboxes(&self, net: NetId) -> Vec<(usize, Rect)> {
        let mut boxes: Vec<(usize, Rect)> = Vec::new();
        for &seg_id in &self.nets[net.index()].segments {
            let seg = &self.segments[seg_id.index()];
            match boxes.iter_mut().find(|(layer, _)| *layer == seg.layer) {
                Some((_, bb)) => *bb = bb.bounding_box(&seg.bb),
                None => boxes.push((seg.layer, seg.bb)),
            }
        }
        boxes.sort_by_key(|(layer, _)| *layer);
        boxes
    }
}
