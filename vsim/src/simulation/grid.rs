//! Uniform hash grid for fixed-radius neighbour pairs
//!
//! Cell edge = query radius, so any pair within the radius lies in the same
//! or an adjacent cell (27 cells including self).

use std::collections::HashMap;

use crate::simulation::states::NVec3;

type CellKey = (i64, i64, i64);

pub struct UniformGrid {
    cell_size: f64,
    inv_cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl UniformGrid {
    /// Bucket every position into cells of edge `cell_size` (must be > 0).
    pub fn build(positions: &[NVec3], cell_size: f64) -> Self {
        let inv_cell_size = 1.0 / cell_size;
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, p) in positions.iter().enumerate() {
            cells.entry(cell_of(p, inv_cell_size)).or_default().push(idx);
        }
        Self { cell_size, inv_cell_size, cells }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Every unordered pair `(i, j)`, `i < j`, within `radius`, sorted.
    ///
    /// `radius` must not exceed the cell size or pairs spanning two cells
    /// are lost.
    pub fn query_pairs(&self, positions: &[NVec3], radius: f64) -> Vec<(usize, usize)> {
        let radius2 = radius * radius;
        let mut pairs = Vec::new();
        let mut neighbours = Vec::new();

        for (i, p) in positions.iter().enumerate() {
            let (cx, cy, cz) = cell_of(p, self.inv_cell_size);
            neighbours.clear();
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let key = (cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz));
                        let Some(indices) = self.cells.get(&key) else { continue };
                        for &j in indices {
                            // Each j lives in exactly one cell, so no pair is seen twice
                            if j > i && (positions[j] - p).norm_squared() <= radius2 {
                                neighbours.push(j);
                            }
                        }
                    }
                }
            }
            neighbours.sort_unstable();
            pairs.extend(neighbours.iter().map(|&j| (i, j)));
        }

        pairs
    }
}

fn cell_of(p: &NVec3, inv_cell_size: f64) -> CellKey {
    (
        (p.x * inv_cell_size).floor() as i64,
        (p.y * inv_cell_size).floor() as i64,
        (p.z * inv_cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_across_cell_boundary() {
        // 0 and 1 straddle the x = 0 cell face
        let positions = vec![
            NVec3::new(-0.05, 0.0, 0.0),
            NVec3::new(0.05, 0.0, 0.0),
            NVec3::new(3.0, 3.0, 3.0),
        ];
        let grid = UniformGrid::build(&positions, 0.4);

        assert_eq!(grid.cell_size(), 0.4);
        assert_eq!(grid.occupied_cells(), 3);
        assert_eq!(grid.query_pairs(&positions, 0.4), vec![(0, 1)]);
    }

    #[test]
    fn negative_coordinates_floor_down() {
        assert_eq!(cell_of(&NVec3::new(-0.1, 0.1, -1.0), 1.0), (-1, 0, -1));
    }
}
