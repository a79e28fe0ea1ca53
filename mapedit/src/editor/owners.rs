//! Vertex line owner rings.
//!
//! Each vertex keeps a ring of the lines which meet at it, ordered by the
//! angle each line leaves the vertex at. While editing the rings are plain
//! singly linked lists in an arena with two nodes per line. Once the lines
//! are hardened the lists are sorted and turned into circular, doubly linked
//! rings of `LineOwner`s in the runtime map.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::DVec2;
use log::debug;
use math::{BinAngle, bams_atan2};

use super::edit_map::{EditMap, EditVertex};
use crate::handle::{LineId, OwnerId, VertexId};
use crate::map::GameMap;
use crate::map::map_defs::LineOwner;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OwnerNode {
    pub line: LineId,
    pub next: Option<OwnerId>,
    /// Angle of the line leaving the ring's vertex, once known
    pub angle: Option<BinAngle>,
}

/// Iterate a vertex's singly linked owner list
fn owner_list(nodes: &[OwnerNode], head: Option<OwnerId>) -> impl Iterator<Item = OwnerId> + '_ {
    std::iter::successors(head, |id| nodes[id.index()].next)
}

/// Angle of the line from `root` to `other`, in the form the rings are
/// sorted by
fn owner_angle(root: DVec2, other: DVec2) -> BinAngle {
    let dx = (other.x - root.x) as i32;
    let dy = (other.y - root.y) as i32;
    bams_atan2(dx.saturating_mul(-100), dy.saturating_mul(100))
}

impl EditMap {
    /// Give every vertex an unsorted list of the lines using it. The lines
    /// remember which node they were given at each end.
    pub(crate) fn register_owner_rings(&mut self) -> Vec<OwnerNode> {
        #[cfg(feature = "hprof")]
        profile!("register_owner_rings");

        let capacity = self.lines.len() * 2;
        let mut nodes: Vec<OwnerNode> = Vec::with_capacity(capacity);

        for (i, line) in self.lines.iter_mut().enumerate() {
            let line_id = LineId::from_index(i);
            for p in 0..2 {
                let vertex = &mut self.vertexes[line.v[p].index()];
                if owner_list(&nodes, vertex.owners).any(|o| nodes[o.index()].line == line_id) {
                    continue;
                }

                assert!(nodes.len() < capacity, "line owner arena exhausted");
                nodes.push(OwnerNode {
                    line: line_id,
                    next: vertex.owners,
                    angle: None,
                });
                let id = OwnerId::from_index(nodes.len() - 1);
                vertex.owners = Some(id);
                vertex.num_owners += 1;
                line.owners[p] = Some(id);
            }
        }
        debug!("Registered {} line owners", nodes.len());
        nodes
    }
}

/// Sort each vertex's owners clockwise and link them into rings in
/// `map.line_owners`. The lines must already be hardened.
pub(crate) fn harden_owner_rings(map: &mut GameMap, vertexes: &mut [EditVertex], nodes: &mut [OwnerNode]) {
    #[cfg(feature = "hprof")]
    profile!("harden_owner_rings");

    map.line_owners = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| LineOwner {
            line: node.line,
            next: OwnerId::from_index(i),
            prev: OwnerId::from_index(i),
            delta: BinAngle::ZERO,
        })
        .collect();

    let positions: Vec<DVec2> = vertexes.iter().map(|v| v.pos).collect();
    for (i, vertex) in vertexes.iter_mut().enumerate() {
        if vertex.num_owners == 0 {
            continue;
        }
        let root_id = VertexId::from_index(i);
        let root = vertex.pos;

        let mut ring: Vec<OwnerId> = owner_list(nodes, vertex.owners).collect();
        for &id in &ring {
            let node = &mut nodes[id.index()];
            debug_assert!(map.linedefs.get(node.line.index()).is_some());
            if node.angle.is_none() {
                let other = map.linedefs[node.line.index()].other_vertex(root_id);
                let other = positions.get(other.index()).copied().unwrap_or(root);
                node.angle = Some(owner_angle(root, other));
            }
        }

        // Largest angle first, ties keep their list order
        ring.sort_by(|a, b| {
            let a = nodes[a.index()].angle.unwrap_or(BinAngle::ZERO);
            let b = nodes[b.index()].angle.unwrap_or(BinAngle::ZERO);
            b.cmp(&a)
        });

        let count = ring.len();
        for (pos, &id) in ring.iter().enumerate() {
            let next = ring[(pos + 1) % count];
            let prev = ring[(pos + count - 1) % count];
            let this_angle = nodes[id.index()].angle.unwrap_or(BinAngle::ZERO);
            let next_angle = nodes[next.index()].angle.unwrap_or(BinAngle::ZERO);

            nodes[id.index()].next = if pos + 1 < count { Some(next) } else { None };
            let owner = &mut map.line_owners[id.index()];
            owner.next = next;
            owner.prev = prev;
            owner.delta = this_angle - next_angle;
        }
        vertex.owners = ring.first().copied();
    }
}
