//! Bucketed neighbour queries over integer star coordinates.
//!
//! Single-shot build, many queries: there is no removal. The cell size is
//! set equal to the query radius, so a radius query only has to look at the
//! 3×3 block of cells around the query point.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f64,
    buckets: HashMap<(i64, i64), Vec<(usize, i32, i32)>>,
}

impl SpatialHash {
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be > 0");
        Self {
            cell_size,
            buckets: HashMap::new(),
        }
    }

    #[inline]
    fn cell_of(&self, x: i32, y: i32) -> (i64, i64) {
        (
            (f64::from(x) / self.cell_size).floor() as i64,
            (f64::from(y) / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, id: usize, x: i32, y: i32) {
        let cell = self.cell_of(x, y);
        self.buckets.entry(cell).or_default().push((id, x, y));
    }

    /// Ids within Euclidean distance `radius` of `(x, y)`, in insertion order
    /// per cell. Only the 3×3 cell neighbourhood is scanned.
    pub fn query_radius(&self, x: i32, y: i32, radius: f64) -> Vec<usize> {
        let (cx, cy) = self.cell_of(x, y);
        let r2 = radius * radius;
        let mut found = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                // Saturated cells at the i64 edge have no neighbour beyond.
                let (Some(nx), Some(ny)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                    continue;
                };
                let Some(bucket) = self.buckets.get(&(nx, ny)) else {
                    continue;
                };
                for &(id, px, py) in bucket {
                    let ddx = f64::from(px) - f64::from(x);
                    let ddy = f64::from(py) - f64::from(y);
                    if ddx * ddx + ddy * ddy <= r2 {
                        found.push(id);
                    }
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_points_within_radius_only() {
        let mut h = SpatialHash::new(10.0);
        h.insert(0, 0, 0);
        h.insert(1, 6, 8); // distance 10
        h.insert(2, 7, 8); // just past 10
        h.insert(3, -5, -5);
        let mut found = h.query_radius(0, 0, 10.0);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 3]);
    }

    #[test]
    fn query_crosses_negative_cell_boundaries() {
        let mut h = SpatialHash::new(5.0);
        h.insert(0, -1, -1);
        h.insert(1, 1, 1);
        let mut found = h.query_radius(0, 0, 5.0);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn tiny_cells_saturate_without_overflow() {
        let mut h = SpatialHash::new(1e-300);
        h.insert(0, 0, 0);
        h.insert(1, 5, 5);
        h.insert(2, -5, -5);
        h.insert(3, 6, 5);
        assert_eq!(h.query_radius(5, 5, 1e-300), vec![1]);
        assert_eq!(h.query_radius(-5, -5, 1e-300), vec![2]);
        let mut near = h.query_radius(5, 5, 1.0);
        near.sort_unstable();
        assert_eq!(near, vec![1, 3]);
    }

    #[test]
    fn empty_hash_returns_nothing() {
        let h = SpatialHash::new(25.0);
        assert!(h.is_empty());
        assert!(h.query_radius(100, 100, 25.0).is_empty());
    }

    #[test]
    fn len_counts_inserted_points() {
        let mut h = SpatialHash::new(3.0);
        for i in 0..10 {
            h.insert(i, i as i32 * 7, 0);
        }
        assert_eq!(h.len(), 10);
    }
}
