//! Dynamic-programming tables for the minimum bitonic tour.
//!
//! For `n` points sorted by x, cell `(i, j)` with `i <= j` holds the
//! length of the shortest pair of x-monotone chains that together cover
//! points `0..=j`, one ending at `i` and the other at `j`. Both tables
//! are flat `n * n` arrays indexed by `i * n + j`; cells with `i > j`
//! are never written.
//!
//! Fill order:
//!
//! - `(0, 0)` is zero. `(0, j)` is a single chain through `0..=j`.
//! - For `i >= 1`, `(i, j)` with `i < j - 1` extends the `j` chain by
//!   one point from `(i, j - 1)`.
//! - Otherwise (`j == i` or `j == i + 1`) the new point `j` closes onto
//!   the best earlier chain tip `k < i`, read from `(k, i)`.
//!
//! `(n - 1, n - 1)` is the closed tour. Its [`PathNode`] is the head of
//! a chain of nodes, linked by cell index, that
//! [`build_path`](crate::reconstruct::build_path) walks to recover the
//! visiting order.

use crate::types::TourVertex;

/// Which end of the output sequence a [`PathNode`]'s vertex is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written from the front, left to right.
    Forward,
    /// Written from the back, right to left.
    Backward,
}

/// Largest point count whose cell indices fit a [`PathNode`] link.
///
/// `n * n - 1` must stay below `u32::MAX`, which marks an absent link.
pub const MAX_TABLE_POINTS: usize = 65_535;

const ABSENT: u32 = u32::MAX;

fn encode(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(ABSENT)
}

fn decode(raw: u32) -> Option<usize> {
    if raw == ABSENT {
        None
    } else {
        usize::try_from(raw).ok()
    }
}

/// One entry of the reconstruction table.
///
/// Nodes live in a flat array owned by [`TourTable`] and refer to their
/// predecessor by cell index. [`PathNode::NIL`] terminates every chain.
/// Links are stored as `u32`, so a node takes 16 bytes; tables are only
/// built for up to [`MAX_TABLE_POINTS`] points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
    forward_tip: u32,
    vertex: u32,
    predecessor: u32,
    direction: Direction,
}

impl PathNode {
    /// The sentinel that ends every chain.
    pub const NIL: Self = Self {
        forward_tip: ABSENT,
        vertex: ABSENT,
        predecessor: ABSENT,
        direction: Direction::Forward,
    };

    /// Returns `true` for the sentinel.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.vertex == ABSENT
    }

    /// Sorted index of the vertex this node places, `None` for the sentinel.
    #[must_use]
    pub fn vertex(&self) -> Option<usize> {
        decode(self.vertex)
    }

    /// Which end of the output this node's vertex goes to.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Vertex currently terminating the forward chain.
    #[must_use]
    pub fn forward_tip(&self) -> Option<usize> {
        decode(self.forward_tip)
    }

    /// Cell index of the previous node, `None` for the sentinel.
    #[must_use]
    pub fn predecessor(&self) -> Option<usize> {
        decode(self.predecessor)
    }

    /// Derive the node for an edge `src -> dest` appended after `self`,
    /// where `self` sits at cell index `predecessor`.
    ///
    /// If `src` is the current forward tip (or `self` is the sentinel),
    /// the forward chain grows: `src` is placed from the front and `dest`
    /// becomes the new tip. Otherwise `dest` is placed from the back and
    /// the forward tip carries over unchanged.
    ///
    /// Indices that do not fit a `u32` link are stored as absent.
    #[must_use]
    pub fn extend(self, src: usize, dest: usize, predecessor: usize) -> Self {
        let src = encode(src);
        if self.is_nil() || (self.forward_tip != ABSENT && self.forward_tip == src) {
            Self {
                forward_tip: encode(dest),
                vertex: src,
                predecessor: encode(predecessor),
                direction: Direction::Forward,
            }
        } else {
            Self {
                forward_tip: self.forward_tip,
                vertex: encode(dest),
                predecessor: encode(predecessor),
                direction: Direction::Backward,
            }
        }
    }
}

/// Filled distance and reconstruction tables for one point set.
#[derive(Debug, Clone)]
pub struct TourTable {
    n: usize,
    costs: Vec<f64>,
    nodes: Vec<PathNode>,
}

impl TourTable {
    /// Fill both tables for points already sorted by x.
    ///
    /// Runs in O(n²) memory and O(n²) time: the closing search costs
    /// O(i) but only runs on two cells per row.
    ///
    /// Inputs larger than [`MAX_TABLE_POINTS`] cannot be linked and give
    /// an incomplete reconstruction chain; the checked entry points
    /// reject them through [`TourConfig`](crate::TourConfig).
    #[must_use]
    pub fn build<P: TourVertex>(sorted: &[P]) -> Self {
        let n = sorted.len();
        let mut costs = vec![0.0; n * n];
        let mut nodes = vec![PathNode::NIL; n * n];

        // Row 0: one chain through 0..=j.
        for j in 1..n {
            costs[j] = costs[j - 1] + sorted[j - 1].euclidean_distance(&sorted[j]);
            nodes[j] = nodes[j - 1].extend(j - 1, j, j - 1);
        }

        for i in 1..n {
            for j in i..n {
                let cell = i * n + j;
                if i + 1 < j {
                    costs[cell] = costs[cell - 1] + sorted[j - 1].euclidean_distance(&sorted[j]);
                    nodes[cell] = nodes[cell - 1].extend(j - 1, j, cell - 1);
                } else {
                    let (k, cost) = best_closing(&costs, sorted, i, j);
                    let from = k * n + i;
                    costs[cell] = cost;
                    nodes[cell] = nodes[from].extend(k, j, from);
                }
            }
        }

        Self { n, costs, nodes }
    }

    /// Number of points the table was built for.
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.n
    }

    /// Flat index of cell `(i, j)`.
    #[must_use]
    pub const fn cell_index(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    /// Cost of cell `(i, j)`, `None` outside `0 <= i <= j < n`.
    #[must_use]
    pub fn cost(&self, i: usize, j: usize) -> Option<f64> {
        if i > j || j >= self.n {
            return None;
        }
        self.costs.get(self.cell_index(i, j)).copied()
    }

    /// Reconstruction node of cell `(i, j)`, `None` outside `0 <= i <= j < n`.
    #[must_use]
    pub fn node(&self, i: usize, j: usize) -> Option<PathNode> {
        if i > j || j >= self.n {
            return None;
        }
        self.nodes.get(self.cell_index(i, j)).copied()
    }

    /// The flat reconstruction table, indexed by [`cell_index`](Self::cell_index).
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Length of the optimal closed bitonic tour, `None` for an empty input.
    #[must_use]
    pub fn optimal_length(&self) -> Option<f64> {
        self.costs.last().copied()
    }

    /// Head of the reconstruction chain, `None` for an empty input.
    #[must_use]
    pub fn terminal(&self) -> Option<PathNode> {
        self.nodes.last().copied()
    }
}

/// Closing-case search for cell `(i, j)`.
///
/// Returns the `k` in `0..i` minimizing `costs[(k, i)] + dist(k, j)`
/// together with that cost. Comparison is strict, so the smallest `k`
/// wins among equal candidates. If no candidate compares below infinity
/// (all NaN), `k = 0` is kept and its candidate, read from cell
/// `(0, i)`, is returned as the cost.
///
/// `costs` is the flat distance table for `sorted.len()` points; every
/// cell `(k, i)` with `k < i` must already be filled.
#[must_use]
pub(crate) fn best_closing<P: TourVertex>(
    costs: &[f64],
    sorted: &[P],
    i: usize,
    j: usize,
) -> (usize, f64) {
    let n = sorted.len();
    let mut best_k = 0;
    let mut best_cost = f64::INFINITY;
    for k in 0..i {
        let candidate = costs[k * n + i] + sorted[k].euclidean_distance(&sorted[j]);
        if candidate < best_cost {
            best_cost = candidate;
            best_k = k;
        }
    }
    if best_cost.is_infinite() && i > 0 {
        best_cost = costs[i] + sorted[0].euclidean_distance(&sorted[j]);
    }
    (best_k, best_cost)
}
