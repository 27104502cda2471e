use super::rect::Rect;
use rstar::{AABB, RTree};

pub struct SpatialIndex {
    tree: RTree<IndexedRect>,
}

struct IndexedRect {
    rect: Rect,
    id: usize,
}

impl rstar::RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.min.x, self.rect.min.y],
            [self.rect.max.x, self.rect.max.y],
        )
    }
}

impl SpatialIndex {
    /// Bulk-loads all rects; ids are their positions in `rects`.
    pub fn from_rects(rects: &[Rect]) -> Self {
        let items = rects
            .iter()
            .enumerate()
            .map(|(id, &rect)| IndexedRect { rect, id })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of the rects sharing area with `rect`; rects that only touch it are skipped.
    pub fn query_overlapping(&self, rect: Rect) -> Vec<usize> {
        let aabb = AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y]);
        self.tree
            .locate_in_envelope_intersecting(&aabb)
            .filter(|item| item.rect.overlaps(&rect))
            .map(|item| item.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overlapping_skips_touching() {
        let index = SpatialIndex::from_rects(&[
            Rect::from_coords(0.0, 0.0, 1.0, 1.0),
            Rect::from_coords(1.0, 0.0, 2.0, 1.0),
            Rect::from_coords(5.0, 5.0, 6.0, 6.0),
        ]);

        let overlapping = index.query_overlapping(Rect::from_coords(0.5, 0.5, 1.0, 0.8));
        assert_eq!(overlapping, vec![0]);
        assert_eq!(index.len(), 3);

        let mut both = index.query_overlapping(Rect::from_coords(0.5, 0.5, 1.5, 0.8));
        both.sort();
        assert_eq!(both, vec![0, 1]);
        assert!(SpatialIndex::from_rects(&[]).is_empty());
    }
}
