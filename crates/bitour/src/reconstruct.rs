//! Turning a filled [`TourTable`] back into a visiting order.
//!
//! The walk starts at the terminal node and follows predecessor links
//! until the sentinel. Forward nodes fill the output from the front and
//! backward nodes from the back; the two cursors meet exactly when the
//! chain ends.

use crate::table::{Direction, PathNode, TourTable};

/// Materialize the tour recorded in `table` over the same sorted points
/// it was built from.
///
/// `sorted` must be the slice passed to [`TourTable::build`]. Tables of
/// zero or one point have no chain to walk and, like a length mismatch,
/// return the sorted points unchanged.
#[must_use = "returns the ordered tour"]
pub fn build_path<P: Copy>(table: &TourTable, sorted: &[P]) -> Vec<P> {
    match table.terminal() {
        Some(terminal) if !terminal.is_nil() && table.point_count() == sorted.len() => {
            walk(terminal, table.nodes(), sorted)
        }
        _ => sorted.to_vec(),
    }
}

/// Follow the chain from `terminal`, writing each vertex to its end of
/// the output.
fn walk<P: Copy>(terminal: PathNode, nodes: &[PathNode], sorted: &[P]) -> Vec<P> {
    // Every slot is overwritten exactly once; the copy only provides
    // initialized storage.
    let mut out = sorted.to_vec();
    let mut front = 0;
    let mut back = sorted.len();

    let mut node = terminal;
    while let Some(vertex) = node.vertex() {
        match node.direction() {
            Direction::Forward => {
                out[front] = sorted[vertex];
                front += 1;
            }
            Direction::Backward => {
                back -= 1;
                out[back] = sorted[vertex];
            }
        }
        node = node.predecessor().map_or(PathNode::NIL, |cell| nodes[cell]);
    }

    debug_assert_eq!(front, back, "cursors must meet when the chain ends");
    out
}
