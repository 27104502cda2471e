#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionState {
    Growing,
    Finalized,
}

/// Contiguous set of thermal bins grown from one local temperature maximum.
#[derive(Clone, Debug)]
pub struct HotspotRegion {
    pub id: u32,
    pub peak_temp: f64,
    /// Lowest temperature among the members.
    pub base_temp: f64,
    pub temp_gradient: f64,
    /// Indices into the thermal grid.
    pub bins: Vec<usize>,
    pub state: RegionState,
    pub score: f64,
}

impl HotspotRegion {
    pub fn new(id: u32, peak_bin: usize, peak_temp: f64) -> Self {
        Self {
            id,
            peak_temp,
            base_temp: peak_temp,
            temp_gradient: 0.0,
            bins: vec![peak_bin],
            state: RegionState::Growing,
            score: 0.0,
        }
    }

    pub fn still_growing(&self) -> bool {
        self.state == RegionState::Growing
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Appends grown bins and lowers the base temperature accordingly.
    pub fn extend(&mut self, bins: &[(usize, f64)]) {
        debug_assert!(self.still_growing());
        for &(idx, temp) in bins {
            self.bins.push(idx);
            self.base_temp = self.base_temp.min(temp);
        }
        self.temp_gradient = self.peak_temp - self.base_temp;
    }

    /// Severity score: grows with the peak temperature and the gradient, shrinks with the
    /// square root of the region size.
    pub fn finalize(&mut self, score_normalization: f64) {
        self.state = RegionState::Finalized;
        let size = self.bins.len().max(1) as f64;
        self.score =
            score_normalization * self.peak_temp * (1.0 + self.temp_gradient) / size.sqrt();
    }
}

/// Finalized regions ordered by descending score. Equal scores are all kept, in insertion
/// order.
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    regions: Vec<HotspotRegion>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: HotspotRegion) {
        let pos = self.regions.partition_point(|r| r.score >= region.score);
        self.regions.insert(pos, region);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HotspotRegion> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[HotspotRegion] {
        &self.regions
    }

    pub fn get_by_id(&self, id: u32) -> Option<&HotspotRegion> {
        self.regions.iter().find(|r| r.id == id)
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a HotspotRegion;
    type IntoIter = std::slice::Iter<'a, HotspotRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: u32, score: f64) -> HotspotRegion {
        let mut r = HotspotRegion::new(id, id as usize, 0.0);
        r.state = RegionState::Finalized;
        r.score = score;
        r
    }

    #[test]
    fn test_duplicate_scores_are_kept() {
        let mut set = RegionSet::new();
        set.insert(scored(0, 2.0));
        set.insert(scored(1, 5.0));
        set.insert(scored(2, 5.0));

        let scores: Vec<f64> = set.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![5.0, 5.0, 2.0]);
        let ids: Vec<u32> = set.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_order_is_non_increasing() {
        let mut set = RegionSet::new();
        for (id, score) in [3.0, 9.5, 1.0, 9.5, 4.2, 0.0, 7.7].into_iter().enumerate() {
            set.insert(scored(id as u32, score));
        }

        assert_eq!(set.len(), 7);
        for pair in set.as_slice().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(set.get_by_id(4).map(|r| r.score), Some(4.2));
    }

    #[test]
    fn test_growth_tracks_base_and_gradient() {
        let mut r = HotspotRegion::new(0, 10, 50.0);
        r.extend(&[(11, 49.0), (12, 47.5)]);
        r.extend(&[(13, 48.0)]);

        assert_eq!(r.len(), 4);
        assert_eq!(r.base_temp, 47.5);
        assert_eq!(r.temp_gradient, 2.5);
        assert!(r.still_growing());

        r.finalize(1.0);
        assert!(!r.still_growing());
        assert!((r.score - 50.0 * 3.5 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_larger_regions_score_lower() {
        let mut small = HotspotRegion::new(0, 0, 40.0);
        small.extend(&[(1, 39.0)]);
        let mut large = HotspotRegion::new(1, 5, 40.0);
        large.extend(&[(6, 39.0), (7, 39.5), (8, 39.5), (9, 39.2)]);

        small.finalize(1.0);
        large.finalize(1.0);
        assert!(small.score > large.score);
    }
}
