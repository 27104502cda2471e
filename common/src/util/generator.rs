use crate::db::core::LayoutDB;
use crate::geom::rect::Rect;
use crate::util::config::LayoutConfig;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Builds a random stacked layout; identical `(config, seed)` pairs give identical layouts.
pub fn generate_random_layout(config: &LayoutConfig, seed: u64) -> LayoutDB {
    let mut rng = StdRng::seed_from_u64(seed);
    let layers = config.layers.max(1);
    let die_w = config.die_width;
    let die_h = config.die_height;
    let mut db = LayoutDB::new(layers, die_w, die_h);

    log::debug!(
        "Generating layout: {} blocks, {} nets, {} TSV islands, {} layers, die {:.0}x{:.0}",
        config.num_blocks,
        config.num_nets,
        config.num_tsv_islands,
        layers,
        die_w,
        die_h
    );

    for i in 0..config.num_blocks {
        let w = die_w * rng.gen_range(0.04..0.2);
        let h = die_h * rng.gen_range(0.04..0.2);
        let x = rng.gen_range(0.0..(die_w - w));
        let y = rng.gen_range(0.0..(die_h - h));
        let layer = rng.gen_range(0..layers);
        let density = rng.gen_range(0.2..2.0);

        db.add_block(
            format!("blk{}", i),
            layer,
            Rect::from_coords(x, y, x + w, y + h),
            density,
        );
    }

    // L-shaped two-pin nets between block centers, routed on the driver's layer
    let wire_width = die_w.min(die_h) * 0.002;
    if db.num_blocks() >= 2 {
        for i in 0..config.num_nets {
            let a = rng.gen_range(0..db.num_blocks());
            let mut b = rng.gen_range(0..db.num_blocks());
            if a == b {
                b = (b + 1) % db.num_blocks();
            }

            let (ax, ay, layer) = {
                let blk = &db.blocks[a];
                (
                    (blk.bb.min.x + blk.bb.max.x) / 2.0,
                    (blk.bb.min.y + blk.bb.max.y) / 2.0,
                    blk.layer,
                )
            };
            let (bx, by) = {
                let blk = &db.blocks[b];
                (
                    (blk.bb.min.x + blk.bb.max.x) / 2.0,
                    (blk.bb.min.y + blk.bb.max.y) / 2.0,
                )
            };

            let net = db.add_net(format!("net{}", i), rng.gen_range(0.001..0.02));
            db.add_segment(
                net,
                layer,
                Rect::from_coords(ax.min(bx), ay, ax.max(bx), ay + wire_width),
            );
            db.add_segment(
                net,
                layer,
                Rect::from_coords(bx, ay.min(by), bx + wire_width, ay.max(by)),
            );
        }
    }

    for i in 0..config.num_tsv_islands {
        let side = die_w.min(die_h) * rng.gen_range(0.01..0.05);
        let x = rng.gen_range(0.0..(die_w - side));
        let y = rng.gen_range(0.0..(die_h - side));
        let layer = rng.gen_range(0..layers);
        let is_dummy = rng.gen_bool(0.25);

        db.add_tsv_island(
            format!("tsv{}", i),
            layer,
            Rect::from_coords(x, y, x + side, y + side),
            is_dummy,
        );
    }

    db
}
