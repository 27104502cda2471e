use eda_common::error::ConfigError;
use eda_common::util::config::{HotspotConfig, LayoutConfig, ThermalConfig};
use eda_common::util::generator::generate_random_layout;
use eda_thermal::ThermalEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        die_width: 2000.0,
        die_height: 1500.0,
        layers: 2,
        num_blocks: 25,
        num_nets: 60,
        num_tsv_islands: 4,
        seed: 7,
    }
}

fn engine(config: &LayoutConfig) -> ThermalEngine {
    let layout = generate_random_layout(config, 0);
    ThermalEngine::new(
        config.layers,
        layout.die_area,
        ThermalConfig::default(),
        HotspotConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let config = layout_config();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..3 {
        let layout = generate_random_layout(&config, rng.r#gen());
        let mut first = engine(&config);
        let mut warm = engine(&config);

        // Leave stale state in the warm engine before the compared run
        let other = generate_random_layout(&config, rng.r#gen());
        warm.evaluate(&other);

        let a = first.evaluate(&layout);
        let temps_a: Vec<f64> = a.thermal_map.bins().iter().map(|b| b.temp).collect();
        let regions_a: Vec<(u32, usize)> = a.hotspots.iter().map(|r| (r.id, r.len())).collect();
        let stats_a = a.stats;

        let b = warm.evaluate(&layout);
        let temps_b: Vec<f64> = b.thermal_map.bins().iter().map(|b| b.temp).collect();
        let regions_b: Vec<(u32, usize)> = b.hotspots.iter().map(|r| (r.id, r.len())).collect();

        assert_eq!(stats_a, b.stats);
        assert_eq!(temps_a, temps_b);
        assert_eq!(regions_a, regions_b);
    }
}

#[test]
fn test_more_power_is_hotter() {
    let config = layout_config();
    let mut layout = generate_random_layout(&config, 3);
    let mut engine = engine(&config);

    let base = engine.analyze(&layout);
    assert!(base.avg_temp > base.temp_offset);
    assert!(base.max_temp >= base.avg_temp);
    assert!((base.cost_temp - base.avg_temp * base.max_temp).abs() < 1e-9 * base.cost_temp);

    for block in layout.blocks.iter_mut() {
        block.power_density *= 2.0;
    }
    let hotter = engine.analyze(&layout);

    assert!(hotter.avg_temp > base.avg_temp);
    assert!(hotter.max_temp > base.max_temp);
}

#[test]
fn test_hotspots_and_clusters_are_consistent() {
    let config = layout_config();
    let layout = generate_random_layout(&config, 5);
    let mut engine = engine(&config);
    let eval = engine.evaluate(&layout);

    assert!(!eval.hotspots.is_empty());
    for pair in eval.hotspots.as_slice().windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let hottest = eval
        .hotspots
        .iter()
        .map(|r| r.peak_temp)
        .fold(f64::MIN, f64::max);
    assert!(hottest <= eval.stats.max_temp);

    for region in eval.hotspots {
        for &bin in &region.bins {
            assert_eq!(eval.thermal_map.bin(bin).region_id, Some(region.id));
        }
    }

    let assigned: usize = eval.clusters.clusters.iter().map(|c| c.segments.len()).sum();
    assert_eq!(assigned, layout.segments.len());
    assert_eq!(eval.clusters.net_clusters.len(), layout.num_nets());
    assert_eq!(eval.clusters.layers(), layout.layers);
    for layer in 0..layout.layers {
        assert!(eval.clusters.safe_cluster(layer).is_some());
        for cluster in eval.clusters.layer_clusters(layer) {
            assert_eq!(cluster.layer, layer);
            for seg in &cluster.segments {
                assert_eq!(layout.segments[seg.index()].layer, layer);
            }
        }
    }
}

#[test]
fn test_analysis_drops_previous_hotspot_claims() {
    let config = layout_config();
    let first = generate_random_layout(&config, 1);
    let second = generate_random_layout(&config, 2);
    let mut engine = engine(&config);

    let claimed = engine
        .evaluate(&first)
        .thermal_map
        .bins()
        .iter()
        .filter(|b| b.region_id.is_some())
        .count();
    assert!(claimed > 0);

    engine.analyze(&second);
    let grid = &engine.analyzer().thermal_map;
    assert!(grid.bins().iter().all(|b| b.region_id.is_none()));
}

#[test]
fn test_invalid_masks_are_rejected() {
    let config = layout_config();
    let layout = generate_random_layout(&config, 0);
    let thermal = ThermalConfig {
        mask_boundary_value: 2.0,
        ..ThermalConfig::default()
    };

    let err = ThermalEngine::new(2, layout.die_area, thermal, HotspotConfig::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        ConfigError::BoundaryNotBelowImpulse {
            boundary: 2.0,
            impulse: 1.0
        }
    );
}
