use std::cmp::Ordering;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use log::{debug, info};

use super::edit_map::{EditMap, EditVertex};
use crate::handle::VertexId;

/// Order vertexes by position, compared in whole map units
fn vertex_compare(a: &EditVertex, b: &EditVertex) -> Ordering {
    let (ax, ay) = (a.pos.x as i32, a.pos.y as i32);
    let (bx, by) = (b.pos.x as i32, b.pos.y as i32);
    ax.cmp(&bx).then(ay.cmp(&by))
}

impl EditMap {
    /// Mark every vertex which shares a position with an earlier one in sort
    /// order. Duplicates point at the first vertex of their group and are
    /// otherwise left alone. Returns how many were marked.
    pub(crate) fn detect_duplicate_vertexes(&mut self) -> usize {
        #[cfg(feature = "hprof")]
        profile!("detect_duplicate_vertexes");

        let mut order: Vec<VertexId> = (0..self.vertexes.len()).map(VertexId::from_index).collect();
        order.sort_by(|a, b| vertex_compare(&self.vertexes[a.index()], &self.vertexes[b.index()]));

        let mut marked = 0;
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if vertex_compare(&self.vertexes[a.index()], &self.vertexes[b.index()])
                != Ordering::Equal
            {
                continue;
            }
            let canonical = self.vertexes[a.index()].equiv.unwrap_or(a);
            self.vertexes[b.index()].equiv = Some(canonical);
            marked += 1;
        }

        if marked > 0 {
            info!("Marked {} duplicate vertexes", marked);
        }
        marked
    }

    /// Removing unused or duplicate elements would renumber everything after
    /// them, and map scripts and property tables address elements by number.
    /// So nothing is removed.
    pub(crate) fn prune_redundant_map_data(&mut self) {
        debug!(
            "Keeping {} vertexes, {} lines, {} sides as numbered",
            self.vertexes.len(),
            self.lines.len(),
            self.sides.len()
        );
    }
}
