use eda_common::geom::coord::GridCoord;
use eda_common::geom::rect::Rect;

use super::THERMAL_MAP_DIM;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

#[derive(Clone, Debug)]
pub struct ThermalBin {
    pub temp: f64,
    pub coord: GridCoord,
    pub bb: Rect,
    /// Hotspot region claiming this bin during the current clustering pass.
    pub region_id: Option<u32>,
}

/// Temperature grid of the reference layer.
///
/// Bins are stored row-major. The 8-connected adjacency is computed once at
/// construction and kept as flat per-bin index lists, so neighbors are plain indices into
/// `bins` rather than references.
pub struct ThermalGrid {
    dim: usize,
    bins: Vec<ThermalBin>,
    neighbor_offsets: Vec<usize>,
    neighbor_list: Vec<usize>,
}

impl ThermalGrid {
    pub fn new(die_area: &Rect) -> Self {
        Self::with_dim(THERMAL_MAP_DIM, die_area)
    }

    pub fn with_dim(dim: usize, die_area: &Rect) -> Self {
        let bin_w = die_area.width() / dim as f64;
        let bin_h = die_area.height() / dim as f64;

        let mut bins = Vec::with_capacity(dim * dim);
        for y in 0..dim {
            for x in 0..dim {
                let min_x = die_area.min.x + x as f64 * bin_w;
                let min_y = die_area.min.y + y as f64 * bin_h;
                bins.push(ThermalBin {
                    temp: 0.0,
                    coord: GridCoord::new(x as u32, y as u32, 0),
                    bb: Rect::from_coords(min_x, min_y, min_x + bin_w, min_y + bin_h),
                    region_id: None,
                });
            }
        }

        let mut neighbor_offsets = Vec::with_capacity(dim * dim + 1);
        let mut neighbor_list = Vec::with_capacity(dim * dim * 8);
        neighbor_offsets.push(0);
        for y in 0..dim as i64 {
            for x in 0..dim as i64 {
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx >= 0 && ny >= 0 && nx < dim as i64 && ny < dim as i64 {
                        neighbor_list.push(ny as usize * dim + nx as usize);
                    }
                }
                neighbor_offsets.push(neighbor_list.len());
            }
        }

        Self {
            dim,
            bins,
            neighbor_offsets,
            neighbor_list,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.dim + x
    }

    #[inline(always)]
    pub fn bin(&self, idx: usize) -> &ThermalBin {
        &self.bins[idx]
    }

    #[inline(always)]
    pub fn bin_mut(&mut self, idx: usize) -> &mut ThermalBin {
        &mut self.bins[idx]
    }

    #[inline(always)]
    pub fn temp(&self, x: usize, y: usize) -> f64 {
        self.bins[self.index(x, y)].temp
    }

    #[inline(always)]
    pub fn set_temp(&mut self, x: usize, y: usize, temp: f64) {
        let idx = self.index(x, y);
        self.bins[idx].temp = temp;
    }

    #[inline(always)]
    pub fn add_temp(&mut self, x: usize, y: usize, delta: f64) {
        let idx = self.index(x, y);
        self.bins[idx].temp += delta;
    }

    #[inline(always)]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbor_list[self.neighbor_offsets[idx]..self.neighbor_offsets[idx + 1]]
    }

    pub fn bins(&self) -> &[ThermalBin] {
        &self.bins
    }

    pub fn reset_temperatures(&mut self, temp: f64) {
        for bin in &mut self.bins {
            bin.temp = temp;
        }
    }

    pub fn reset_regions(&mut self) {
        for bin in &mut self.bins {
            bin.region_id = None;
        }
    }

    pub fn max_temp(&self) -> f64 {
        self.bins
            .iter()
            .map(|b| b.temp)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean over all bins; zero for an empty grid.
    pub fn avg_temp(&self) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        self.bins.iter().map(|b| b.temp).sum::<f64>() / self.bins.len() as f64
    }
}
