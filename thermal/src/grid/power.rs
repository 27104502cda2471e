#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PowerMapBin {
    pub power_density: f64,
    /// Coverage by TSVs in percent, capped at 100 once all islands are mapped.
    pub tsv_density: f64,
}

/// Square, row-major power map of one die layer.
#[derive(Clone, Debug)]
pub struct PowerMap {
    dim: usize,
    bins: Vec<PowerMapBin>,
}

impl PowerMap {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            bins: vec![PowerMapBin::default(); dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.dim + x
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> &PowerMapBin {
        &self.bins[self.index(x, y)]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut PowerMapBin {
        let idx = self.index(x, y);
        &mut self.bins[idx]
    }

    #[inline(always)]
    pub fn power_density(&self, x: usize, y: usize) -> f64 {
        self.bins[self.index(x, y)].power_density
    }

    pub fn bins(&self) -> &[PowerMapBin] {
        &self.bins
    }

    pub fn reset(&mut self) {
        self.bins.fill(PowerMapBin::default());
    }

    pub fn total_power_density(&self) -> f64 {
        self.bins.iter().map(|b| b.power_density).sum()
    }
}
