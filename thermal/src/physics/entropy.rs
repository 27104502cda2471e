use crate::grid::PowerMap;

/// Ranges below this size are not split any further.
pub const MIN_PARTITION_SIZE: usize = 8;
/// Standard deviation treated as zero when deciding whether a range is uniform.
const STD_DEV_EPSILON: f64 = 1.0e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerBin {
    pub x: usize,
    pub y: usize,
    pub value: f64,
}

/// Bins of one power class, sorted by ascending power density.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerPartition {
    pub bins: Vec<PowerBin>,
}

impl PowerPartition {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.bins.first().map_or(0.0, |b| b.value)
    }

    pub fn max(&self) -> f64 {
        self.bins.last().map_or(0.0, |b| b.value)
    }

    pub fn avg(&self) -> f64 {
        mean_and_std_dev(&self.bins).0
    }

    pub fn std_dev(&self) -> f64 {
        mean_and_std_dev(&self.bins).1
    }
}

fn mean_and_std_dev(bins: &[PowerBin]) -> (f64, f64) {
    if bins.is_empty() {
        return (0.0, 0.0);
    }
    let n = bins.len() as f64;
    let avg = bins.iter().map(|b| b.value).sum::<f64>() / n;
    let var = bins.iter().map(|b| (b.value - avg).powi(2)).sum::<f64>() / n;
    (avg, var.sqrt())
}

/// Classifies the bins of one map by power density.
///
/// All bins are sorted by value and cut at the first value above the average. Each part
/// is split the same way, recursively, until it is uniform, smaller than
/// `MIN_PARTITION_SIZE`, or the next cut would split off a single bin. The returned
/// partitions cover every bin exactly once, in ascending power order.
pub fn partition_power_map(map: &PowerMap) -> Vec<PowerPartition> {
    let dim = map.dim();
    let mut values = Vec::with_capacity(dim * dim);
    for y in 0..dim {
        for x in 0..dim {
            values.push(PowerBin {
                x,
                y,
                value: map.power_density(x, y),
            });
        }
    }
    values.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut partitions = Vec::new();
    let (avg, _) = mean_and_std_dev(&values);
    let cut = values.partition_point(|b| b.value <= avg);
    split_partition(&values[..cut], &mut partitions);
    split_partition(&values[cut..], &mut partitions);
    partitions
}

fn split_partition(values: &[PowerBin], partitions: &mut Vec<PowerPartition>) {
    if values.is_empty() {
        return;
    }

    let (avg, std_dev) = mean_and_std_dev(values);
    let len = values.len();
    let cut = values.partition_point(|b| b.value <= avg);

    let stop = std_dev <= STD_DEV_EPSILON || len < MIN_PARTITION_SIZE || cut <= 1 || len - cut <= 1;
    if stop {
        log::trace!(
            "Power partition: {} bins, avg {:.4}, std dev {:.4}",
            len,
            avg,
            std_dev
        );
        partitions.push(PowerPartition {
            bins: values.to_vec(),
        });
        return;
    }

    split_partition(&values[..cut], partitions);
    split_partition(&values[cut..], partitions);
}

pub fn partition_power_maps(maps: &[PowerMap]) -> Vec<Vec<PowerPartition>> {
    maps.iter().map(partition_power_map).collect()
}

/// Spatial entropy of the power maps, averaged over layers; 0.0 without maps.
///
/// Per layer, `-sum((d_int / d_ext) * r * log2(r))` over all partitions, where `d_int` is
/// the average Manhattan distance between bins of the partition, `d_ext` the average
/// distance from its bins to all other bins of the map, and `r` its share of the map.
/// Scattered power classes push the entropy up, clustered ones push it down.
pub fn spatial_entropy(maps: &[PowerMap]) -> f64 {
    if maps.is_empty() {
        return 0.0;
    }

    let mut overall = 0.0;
    for (layer, map) in maps.iter().enumerate() {
        let partitions = partition_power_map(map);
        let entropy = layer_entropy(&partitions, map.dim());
        log::debug!(
            "Spatial entropy on layer {}: {:.6} ({} partitions)",
            layer,
            entropy,
            partitions.len()
        );
        overall += entropy;
    }
    overall / maps.len() as f64
}

fn layer_entropy(partitions: &[PowerPartition], dim: usize) -> f64 {
    let total = dim * dim;
    if total == 0 {
        return 0.0;
    }
    // Distance sums to all bins of the map; every coordinate occurs `dim` times per axis
    let all = axis_distance_sums(&vec![dim; dim]);

    let mut entropy = 0.0;
    for part in partitions {
        let n = part.len();
        // Parts with a single bin have no internal pairs, a part covering the map no
        // external ones; both contribute nothing
        if n < 2 || n >= total {
            continue;
        }

        let mut hist_x = vec![0; dim];
        let mut hist_y = vec![0; dim];
        for bin in &part.bins {
            hist_x[bin.x] += 1;
            hist_y[bin.y] += 1;
        }
        let own_x = axis_distance_sums(&hist_x);
        let own_y = axis_distance_sums(&hist_y);

        let mut int_sum = 0usize;
        let mut ext_sum = 0usize;
        for bin in &part.bins {
            let own = own_x[bin.x] + own_y[bin.y];
            int_sum += own;
            ext_sum += all[bin.x] + all[bin.y] - own;
        }
        if ext_sum == 0 {
            continue;
        }

        let d_int = int_sum as f64 / (n * (n - 1)) as f64;
        let d_ext = ext_sum as f64 / (n * (total - n)) as f64;
        let ratio = n as f64 / total as f64;
        entropy += (d_int / d_ext) * ratio * ratio.log2();
    }
    -entropy
}

/// For every coordinate `c`, `sum(counts[c'] * |c - c'|)`.
fn axis_distance_sums(counts: &[usize]) -> Vec<usize> {
    (0..counts.len())
        .map(|c| {
            counts
                .iter()
                .enumerate()
                .map(|(other, &count)| count * c.abs_diff(other))
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn map_with(dim: usize, f: impl Fn(usize, usize) -> f64) -> PowerMap {
        let mut map = PowerMap::new(dim);
        for y in 0..dim {
            for x in 0..dim {
                map.get_mut(x, y).power_density = f(x, y);
            }
        }
        map
    }

    fn manhattan(a: &PowerBin, b: &PowerBin) -> usize {
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
    }

    // Pairwise reference of `layer_entropy`
    fn entropy_pairwise(partitions: &[PowerPartition], dim: usize) -> f64 {
        let total = dim * dim;
        let mut entropy = 0.0;
        for (i, part) in partitions.iter().enumerate() {
            let n = part.len();
            if n < 2 || n >= total {
                continue;
            }
            let mut d_int = 0;
            let mut d_ext = 0;
            for a in &part.bins {
                d_int += part.bins.iter().map(|b| manhattan(a, b)).sum::<usize>();
                for (j, other) in partitions.iter().enumerate() {
                    if i != j {
                        d_ext += other.bins.iter().map(|b| manhattan(a, b)).sum::<usize>();
                    }
                }
            }
            let d_int = d_int as f64 / (n * (n - 1)) as f64;
            let d_ext = d_ext as f64 / (n * (total - n)) as f64;
            let ratio = n as f64 / total as f64;
            entropy += (d_int / d_ext) * ratio * ratio.log2();
        }
        -entropy
    }

    #[test]
    fn test_uniform_map_is_one_partition() {
        let map = map_with(16, |_, _| 0.7);
        let partitions = partition_power_map(&map);

        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].len(), 256);
        assert!(partitions[0].std_dev() < 1e-12);
        assert_eq!(spatial_entropy(&[map]), 0.0);
    }

    #[test]
    fn test_two_levels_split_into_two_partitions() {
        let map = map_with(8, |x, _| if x < 4 { 0.0 } else { 2.0 });
        let partitions = partition_power_map(&map);

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].max(), 0.0);
        assert_eq!(partitions[1].min(), 2.0);
        assert!(partitions[1].bins.iter().all(|b| b.x >= 4));
        assert!((partitions[1].avg() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_ranges_are_not_split() {
        let map = map_with(2, |x, y| (1 + x + 2 * y) as f64);
        let partitions = partition_power_map(&map);

        let values: Vec<Vec<f64>> = partitions
            .iter()
            .map(|p| p.bins.iter().map(|b| b.value).collect())
            .collect();
        assert_eq!(values, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_partitions_cover_map_in_ascending_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut map = PowerMap::new(16);
        for y in 0..16 {
            for x in 0..16 {
                map.get_mut(x, y).power_density = rng.gen_range(0.0..3.0);
            }
        }
        let partitions = partition_power_map(&map);

        let mut seen = vec![false; 256];
        for part in &partitions {
            assert!(!part.is_empty());
            for bin in &part.bins {
                let idx = bin.y * 16 + bin.x;
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        for pair in partitions.windows(2) {
            assert!(pair[0].max() <= pair[1].min());
        }
        assert!(partitions.len() > 2);
    }

    #[test]
    fn test_entropy_matches_pairwise_distances() {
        let mut rng = StdRng::seed_from_u64(17);
        for dim in [4, 9, 12] {
            let mut map = PowerMap::new(dim);
            for y in 0..dim {
                for x in 0..dim {
                    map.get_mut(x, y).power_density = rng.gen_range(0.0..1.0);
                }
            }
            let partitions = partition_power_map(&map);

            let fast = layer_entropy(&partitions, dim);
            let reference = entropy_pairwise(&partitions, dim);
            assert!((fast - reference).abs() < 1e-9, "{} vs {}", fast, reference);
        }
    }

    #[test]
    fn test_scattered_power_has_higher_entropy() {
        let clustered = map_with(16, |x, _| if x < 8 { 0.0 } else { 1.0 });
        let scattered = map_with(16, |x, y| ((x + y) % 2) as f64);

        let low = spatial_entropy(std::slice::from_ref(&clustered));
        let high = spatial_entropy(std::slice::from_ref(&scattered));
        assert!(low > 0.0);
        assert!(high > low);

        let both = spatial_entropy(&[clustered, scattered]);
        assert!((both - (low + high) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_hot_bin_and_empty_input() {
        let map = map_with(16, |x, y| if (x, y) == (3, 4) { 9.0 } else { 0.0 });
        let partitions = partition_power_map(&map);

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[1].bins, vec![PowerBin { x: 3, y: 4, value: 9.0 }]);
        let entropy = spatial_entropy(&[map]);
        assert!(entropy.is_finite() && entropy > 0.0);

        assert_eq!(spatial_entropy(&[]), 0.0);
        assert!(partition_power_maps(&[]).is_empty());
    }
}
