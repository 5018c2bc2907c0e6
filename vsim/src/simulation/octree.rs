//! # Octree neighbour index (3D)
//!
//! This module builds an **octree** over particle positions and answers the
//! one query the collision pass needs: *every unordered pair of particles
//! whose centres lie within a fixed radius `r` of each other*. It replaces the
//! naive `O(N²)` all-pairs scan with roughly `O(N log N)` work for well spread
//! particle clouds.
//!
//! ## Core Concepts
//!
//! - The space around all particles is enclosed in a cube and recursively
//!   subdivided into 8 regions (octants).
//! - Each region becomes a node of the octree, stored in a flat arena
//!   (`Vec<OctreeNode>`) and referenced by index.
//! - Leaf nodes hold up to [`LEAF_CAPACITY`] particle indices; a full leaf is
//!   split unless it is already at [`MAX_DEPTH`] (coincident particles would
//!   otherwise subdivide forever).
//! - A radius query descends only into nodes whose box is within `r` of the
//!   query point.
//!
//! The tree is rebuilt from scratch whenever positions change; it holds
//! indices, not particles.

use crate::simulation::states::NVec3;

/// Particles held by a leaf before it splits.
pub const LEAF_CAPACITY: usize = 8;

/// Depth at which leaves stop splitting and simply grow.
pub const MAX_DEPTH: usize = 16;

/// A single octree node.
///
/// Either a leaf (`children` all `None`, indices in `items`) or an internal
/// node (`items` empty, at least one child).
pub struct OctreeNode {
    pub bbox_min: NVec3,
    pub bbox_max: NVec3,
    pub children: [Option<usize>; 8], // indices into Octree::nodes
    pub items: Vec<usize>, // particle indices, leaves only
}

impl OctreeNode {
    fn empty(bbox_min: NVec3, bbox_max: NVec3) -> Self {
        Self {
            bbox_min,
            bbox_max,
            children: [None; 8],
            items: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }
}

/// Octree over a snapshot of positions.
pub struct Octree {
    pub nodes: Vec<OctreeNode>,
    pub root: usize,
}

impl Octree {
    /// Build an octree over `positions`.
    ///
    /// 1. Computes a cubic bounding box enclosing every position.
    /// 2. Creates the root node covering it.
    /// 3. Inserts each index, splitting full leaves as needed.
    pub fn build(positions: &[NVec3]) -> Self {
        let (bbox_min, bbox_max) = compute_global_bbox(positions);

        let mut tree = Octree {
            nodes: vec![OctreeNode::empty(bbox_min, bbox_max)],
            root: 0,
        };

        for i in 0..positions.len() {
            tree.insert(tree.root, i, positions, 0);
        }

        tree
    }

    /// Collect every unordered pair `(i, j)`, `i < j`, with
    /// `|positions[i] - positions[j]| <= radius`.
    ///
    /// `positions` must be the slice the tree was built from. Pairs come out
    /// sorted, so the result matches a brute-force scan in order.
    pub fn query_pairs(&self, positions: &[NVec3], radius: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        let mut neighbours = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            neighbours.clear();
            self.query_node(self.root, p, radius * radius, positions, &mut neighbours);
            neighbours.retain(|&j| j > i);
            neighbours.sort_unstable();
            pairs.extend(neighbours.iter().map(|&j| (i, j)));
        }
        pairs
    }

    /// Indices of all positions within `radius` of `point` (unsorted).
    pub fn query_radius(&self, point: &NVec3, radius: f64, positions: &[NVec3]) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_node(self.root, point, radius * radius, positions, &mut out);
        out
    }

    /// Number of particle indices stored in leaves.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // helpers ==============================================================================

    /// Insert particle `idx` below `node_idx`.
    ///
    /// - A leaf with room (or at max depth) just stores the index.
    /// - A full leaf is subdivided, its items are pushed down, then the new
    ///   index follows.
    /// - An internal node forwards the index to the child octant holding it.
    fn insert(&mut self, node_idx: usize, idx: usize, positions: &[NVec3], depth: usize) {
        // Copy the bbox out by value so no borrow is held while recursing
        let bbox_min = self.nodes[node_idx].bbox_min;
        let bbox_max = self.nodes[node_idx].bbox_max;

        if self.nodes[node_idx].is_leaf() {
            if self.nodes[node_idx].items.len() < LEAF_CAPACITY || depth >= MAX_DEPTH {
                self.nodes[node_idx].items.push(idx);
                return;
            }

            // Full leaf: split and push the existing items down a level
            let existing = std::mem::take(&mut self.nodes[node_idx].items);
            self.subdivide(node_idx, bbox_min, bbox_max);
            for e in existing {
                let child = self.child_for(node_idx, &positions[e], &bbox_min, &bbox_max);
                self.insert(child, e, positions, depth + 1);
            }
        }

        let child = self.child_for(node_idx, &positions[idx], &bbox_min, &bbox_max);
        self.insert(child, idx, positions, depth + 1);
    }

    /// Split a node's box into 8 empty child octants.
    fn subdivide(&mut self, node_idx: usize, bbox_min: NVec3, bbox_max: NVec3) {
        for child_idx in 0..8 {
            let (cmin, cmax) = child_bbox(&bbox_min, &bbox_max, child_idx);
            let new_node_idx = self.nodes.len();
            self.nodes.push(OctreeNode::empty(cmin, cmax));
            self.nodes[node_idx].children[child_idx] = Some(new_node_idx);
        }
    }

    fn child_for(&self, node_idx: usize, p: &NVec3, bbox_min: &NVec3, bbox_max: &NVec3) -> usize {
        let octant = child_index_for_point(p, bbox_min, bbox_max);
        // subdivide() always creates all eight children
        self.nodes[node_idx].children[octant].unwrap_or(node_idx)
    }

    /// Recursively gather indices within `sqrt(radius2)` of `point`.
    ///
    /// Whole subtrees are pruned when the squared distance from `point` to the
    /// node's box already exceeds `radius2`.
    fn query_node(&self, node_idx: usize, point: &NVec3, radius2: f64, positions: &[NVec3], out: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];

        if box_distance2(point, &node.bbox_min, &node.bbox_max) > radius2 {
            return;
        }

        for &j in &node.items {
            if (positions[j] - point).norm_squared() <= radius2 {
                out.push(j);
            }
        }

        for child in node.children.iter().flatten() {
            self.query_node(*child, point, radius2, positions, out);
        }
    }
}

// helpers ===========================================================================

/// Compute a cubic bounding box enclosing all positions.
///
/// The axis-aligned extent is expanded to a cube around its centre so every
/// node splits into equal octants. An empty slice yields a unit cube at the origin.
fn compute_global_bbox(positions: &[NVec3]) -> (NVec3, NVec3) {
    if positions.is_empty() {
        return (NVec3::from_element(-0.5), NVec3::from_element(0.5));
    }

    let mut min = NVec3::from_element(f64::INFINITY);
    let mut max = NVec3::from_element(f64::NEG_INFINITY);

    for p in positions {
        min = min.inf(p);
        max = max.sup(p);
    }

    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    // Padded so rounding in `center - half` never leaves a point outside the root
    let max_half = half.x.max(half.y).max(half.z) * (1.0 + 1e-9) + 1e-12;
    let half = NVec3::from_element(max_half);

    (center - half, center + half)
}

/// Octant index of `p` within a box.
///
/// - Bit 0 (value 1): x >= center.x
/// - Bit 1 (value 2): y >= center.y
/// - Bit 2 (value 4): z >= center.z
fn child_index_for_point(p: &NVec3, bbox_min: &NVec3, bbox_max: &NVec3) -> usize {
    let center = (bbox_min + bbox_max) * 0.5;
    let mut idx = 0;

    if p.x >= center.x { idx |= 1; }
    if p.y >= center.y { idx |= 2; }
    if p.z >= center.z { idx |= 4; }

    idx
}

/// Bounding box of one child octant, same bit layout as `child_index_for_point`.
fn child_bbox(parent_min: &NVec3, parent_max: &NVec3, child_idx: usize) -> (NVec3, NVec3) {
    let center = (parent_min + parent_max) * 0.5;

    let mut min = *parent_min;
    let mut max = *parent_max;

    for axis in 0..3 {
        if child_idx & (1 << axis) == 0 {
            max[axis] = center[axis];
        } else {
            min[axis] = center[axis];
        }
    }

    (min, max)
}

/// Squared distance from a point to an axis-aligned box (zero inside).
fn box_distance2(p: &NVec3, bbox_min: &NVec3, bbox_max: &NVec3) -> f64 {
    let mut d2 = 0.0;
    for axis in 0..3 {
        let v = p[axis];
        if v < bbox_min[axis] {
            d2 += (bbox_min[axis] - v).powi(2);
        } else if v > bbox_max[axis] {
            d2 += (v - bbox_max[axis]).powi(2);
        }
    }
    d2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_terminate() {
        let positions = vec![NVec3::new(1.0, 1.0, 1.0); 50];
        let tree = Octree::build(&positions);
        assert_eq!(tree.len(), 50);
        assert!(!tree.is_empty());
        assert!(Octree::build(&[]).is_empty());
        assert_eq!(tree.query_pairs(&positions, 0.1).len(), 50 * 49 / 2);
    }

    #[test]
    fn child_boxes_tile_parent() {
        let min = NVec3::new(-1.0, -1.0, -1.0);
        let max = NVec3::new(1.0, 1.0, 1.0);
        let (cmin, cmax) = child_bbox(&min, &max, 7);
        assert_eq!(cmin, NVec3::zeros());
        assert_eq!(cmax, max);
        assert_eq!(child_index_for_point(&NVec3::new(0.5, 0.5, 0.5), &min, &max), 7);
        assert_eq!(child_index_for_point(&NVec3::new(-0.5, 0.5, -0.5), &min, &max), 2);
    }

    #[test]
    fn radius_query_finds_neighbours_across_leaves() {
        let positions: Vec<NVec3> = (0..40).map(|i| NVec3::new(i as f64 * 0.1, 0.0, 0.0)).collect();
        let tree = Octree::build(&positions);

        let mut found = tree.query_radius(&NVec3::new(1.0, 0.0, 0.0), 0.25, &positions);
        found.sort_unstable();

        assert_eq!(found, vec![8, 9, 10, 11, 12]);
        assert!(tree.nodes.len() > 1);
    }

    #[test]
    fn box_distance_is_zero_inside() {
        let min = NVec3::zeros();
        let max = NVec3::new(1.0, 1.0, 1.0);
        assert_eq!(box_distance2(&NVec3::new(0.5, 0.5, 0.5), &min, &max), 0.0);
        assert!((box_distance2(&NVec3::new(2.0, 0.5, 0.5), &min, &max) - 1.0).abs() < 1e-12);
    }
}
