use eda_common::geom::rect::Rect;
use std::ops::Range;

/// Maps die coordinates onto the bins of a padded power map.
///
/// Bins keep the size of the unpadded thermal map's bins; the padding only adds
/// `padding_bins` bins on every side, so die coordinates are shifted by `offset_x/y`.
#[derive(Clone, Debug)]
pub struct GridConverter {
    bin_w: f64,
    bin_h: f64,
    origin_x: f64,
    origin_y: f64,
    padding_bins: usize,
    padded_dim: usize,
    // One entry more than bins; the last is the upper-right corner of the last bin
    bins_ll_x: Vec<f64>,
    bins_ll_y: Vec<f64>,
}

impl GridConverter {
    pub fn new(die_area: &Rect, map_dim: usize, padding_bins: usize) -> Self {
        let bin_w = die_area.width() / map_dim as f64;
        let bin_h = die_area.height() / map_dim as f64;
        let padded_dim = map_dim + 2 * padding_bins;

        Self {
            bin_w,
            bin_h,
            origin_x: die_area.min.x,
            origin_y: die_area.min.y,
            padding_bins,
            padded_dim,
            bins_ll_x: (0..=padded_dim).map(|b| b as f64 * bin_w).collect(),
            bins_ll_y: (0..=padded_dim).map(|b| b as f64 * bin_h).collect(),
        }
    }

    pub fn bin_w(&self) -> f64 {
        self.bin_w
    }
    pub fn bin_h(&self) -> f64 {
        self.bin_h
    }
    pub fn bin_area(&self) -> f64 {
        self.bin_w * self.bin_h
    }
    pub fn padded_dim(&self) -> usize {
        self.padded_dim
    }
    pub fn padding_bins(&self) -> usize {
        self.padding_bins
    }

    pub fn offset_x(&self) -> f64 {
        self.bin_w * self.padding_bins as f64
    }
    pub fn offset_y(&self) -> f64 {
        self.bin_h * self.padding_bins as f64
    }

    /// Die coordinates relative to the die's lower-left corner.
    pub fn to_die_relative(&self, r: &Rect) -> Rect {
        r.translate(-self.origin_x, -self.origin_y)
    }

    /// Die coordinates into padded-map coordinates.
    pub fn to_padded(&self, r: &Rect) -> Rect {
        self.to_die_relative(r).translate(self.offset_x(), self.offset_y())
    }

    /// Bins touched by `r` (padded-map coordinates), clipped to the map.
    ///
    /// Lower bounds floor; upper bounds emulate ceil via floor + 1, so the last bin in
    /// each range may share no area with `r`. Float-to-usize casts saturate, which clips
    /// negative coordinates to bin 0.
    pub fn bin_range(&self, r: &Rect) -> (Range<usize>, Range<usize>) {
        let x_lower = (r.min.x / self.bin_w) as usize;
        let y_lower = (r.min.y / self.bin_h) as usize;
        let x_upper = ((r.max.x / self.bin_w) as usize)
            .saturating_add(1)
            .min(self.padded_dim);
        let y_upper = ((r.max.y / self.bin_h) as usize)
            .saturating_add(1)
            .min(self.padded_dim);

        (x_lower..x_upper, y_lower..y_upper)
    }

    /// Outline of bin `(x, y)` in padded-map coordinates.
    pub fn bin_rect(&self, x: usize, y: usize) -> Rect {
        Rect::from_coords(
            self.bins_ll_x[x],
            self.bins_ll_y[y],
            self.bins_ll_x[x + 1],
            self.bins_ll_y[y + 1],
        )
    }

    pub fn is_padding(&self, x: usize, y: usize) -> bool {
        x < self.padding_bins
            || x >= self.padded_dim - self.padding_bins
            || y < self.padding_bins
            || y >= self.padded_dim - self.padding_bins
    }
}
