//! One-sided window detection.
//!
//! Some maps use a one-sided line with a sector on both sides of it as a
//! "window": the player looks through the missing back side into the sector
//! beyond. Such lines show up as a vertex with an odd number of one-sided
//! lines. For each candidate a ray is cast from the line's middle, across
//! it, and the nearest lines hit on each side tell which sectors the line
//! really separates.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::DVec2;
use log::info;
use math::DIST_EPSILON;

use super::edit_map::{EditLineDef, EditMap};
use super::owners::OwnerNode;
use crate::diagnostics::{Diagnostics, WindowEffect};
use crate::handle::{LineId, SectorId, VertexId};

#[derive(Debug, Clone, Copy)]
struct Hit {
    dist: f64,
    sector: Option<SectorId>,
}

impl EditMap {
    fn is_self_referencing(&self, line: &EditLineDef) -> bool {
        line.front_side().is_some()
            && line.back_side().is_some()
            && self.side_sector(line.front_side()) == self.side_sector(line.back_side())
    }

    /// Count the one and two sided lines meeting at `vertex`
    fn count_vertex_line_owners(&self, nodes: &[OwnerNode], vertex: VertexId) -> (u32, u32) {
        let mut one_sided = 0;
        let mut two_sided = 0;
        let mut next = self.vertex(vertex).owners;
        while let Some(id) = next {
            let node = &nodes[id.index()];
            let line = self.line(node.line);
            if line.front_side().is_some() && line.back_side().is_some() {
                two_sided += 1;
            } else {
                one_sided += 1;
            }
            next = node.next;
        }
        (one_sided, two_sided)
    }

    /// Find the one-sided lines used as windows and record the sector each
    /// one looks into. Returns the number found.
    pub(crate) fn detect_window_effects(
        &mut self,
        nodes: &[OwnerNode],
        diagnostics: &mut Diagnostics,
    ) -> usize {
        #[cfg(feature = "hprof")]
        profile!("detect_window_effects");

        let mut found = 0;
        for i in 0..self.lines.len() {
            let line = &self.lines[i];
            if line.front_side().is_none() || line.back_side().is_some() || line.is_polyobj() {
                continue;
            }

            let suspect = line.v.iter().any(|&v| {
                let (one, two) = self.count_vertex_line_owners(nodes, v);
                one % 2 == 1 && one + two > 1
            });
            if !suspect {
                continue;
            }

            let id = LineId::from_index(i);
            if let Some(effect) = self.test_for_window_effect(id) {
                info!(
                    "Linedef {} seems to be a one-sided window (back faces sector {})",
                    id, effect.back_sector
                );
                self.lines[i].window_effect = Some(effect.front_sector);
                diagnostics.add_window_effect(effect);
                found += 1;
            }
        }
        found
    }

    fn test_for_window_effect(&self, id: LineId) -> Option<WindowEffect> {
        let l = self.line(id);
        let p1 = self.vertex(l.v[0]).pos;
        let p2 = self.vertex(l.v[1]).pos;
        let mid = (p1 + p2) / 2.0;
        let d = p2 - p1;
        let cast_horiz = d.x.abs() < d.y.abs();

        let mut front: Option<Hit> = None;
        let mut back: Option<Hit> = None;

        for (j, n) in self.lines.iter().enumerate() {
            if j == id.index() || self.is_self_referencing(n) || n.is_polyobj() {
                continue;
            }
            let n1 = self.vertex(n.v[0]).pos;
            let n2 = self.vertex(n.v[1]).pos;
            let d2 = n2 - n1;

            // Work in (along, across) the cast so both directions read the same
            let (n1_along, n1_across) = along_across(cast_horiz, n1);
            let (_, n2_across) = along_across(cast_horiz, n2);
            let (d2_along, d2_across) = along_across(cast_horiz, d2);
            let (_, d_across) = along_across(cast_horiz, d);
            let (mid_along, mid_across) = along_across(cast_horiz, mid);

            if d2_across.abs() < DIST_EPSILON {
                continue;
            }
            if n1_across.max(n2_across) < mid_across - DIST_EPSILON
                || n1_across.min(n2_across) > mid_across + DIST_EPSILON
            {
                continue;
            }

            let dist = n1_along + (mid_across - n1_across) * d2_along / d2_across - mid_along;
            let is_front = if cast_horiz {
                (d_across > 0.0) != (dist > 0.0)
            } else {
                (d_across > 0.0) == (dist > 0.0)
            };
            let dist = dist.abs();
            if dist < DIST_EPSILON {
                continue;
            }

            let side = ((d_across > 0.0) ^ (d2_across > 0.0) ^ !is_front) as usize;
            let hit = Hit {
                dist,
                sector: self.side_sector(n.sides[side]),
            };
            let nearest = if is_front { &mut front } else { &mut back };
            if nearest.is_none_or(|h| dist < h.dist) {
                *nearest = Some(hit);
            }
        }

        let front_sector = front?.sector?;
        let back_sector = back?.sector?;
        if self.side_sector(l.front_side()) != Some(back_sector) {
            return None;
        }
        Some(WindowEffect {
            line: id,
            back_sector,
            front_sector,
        })
    }
}

/// Split a vector into the component along the cast ray and the one across
/// it
#[inline]
fn along_across(cast_horiz: bool, v: DVec2) -> (f64, f64) {
    if cast_horiz { (v.x, v.y) } else { (v.y, v.x) }
}
