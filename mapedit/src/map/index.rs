//! Lookup tables and derived values filled in once the BSP exists.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::{Vec2, Vec3};
use log::debug;
use math::{accurate_distance, bams_atan2};

use super::GameMap;
use super::map_defs::{BBox, SlopeType};
use crate::handle::{LineId, SectorId};

/// Size of the world texture grid leaves are aligned to
const WORLD_GRID_SIZE: f32 = 64.0;

/// One entry in a sector's linked list of lines
#[derive(Debug, Clone, Copy)]
struct LineLink {
    line: LineId,
    next: Option<usize>,
}

impl GameMap {
    /// Build every sector's line list. A line is listed under its front
    /// sector and, if different, its back sector. Lists keep the order the
    /// lines were created in, which the old stair and floor specials rely on.
    pub(crate) fn build_sector_line_lists(&mut self) {
        #[cfg(feature = "hprof")]
        profile!("build_sector_line_lists");

        let mut links: Vec<LineLink> = Vec::with_capacity(self.linedefs.len() * 2);
        let mut heads: Vec<Option<usize>> = vec![None; self.sectors.len()];

        let mut push = |sector: SectorId, line: LineId, links: &mut Vec<LineLink>| {
            let Some(head) = heads.get_mut(sector.index()) else {
                return;
            };
            links.push(LineLink { line, next: *head });
            *head = Some(links.len() - 1);
        };

        for (i, line) in self.linedefs.iter().enumerate() {
            let id = LineId::from_index(i);
            let front = self.side_sector(line.front_side());
            if let Some(front) = front {
                push(front, id, &mut links);
            }
            if let Some(back) = self.side_sector(line.back_side()) {
                if Some(back) != front {
                    push(back, id, &mut links);
                }
            }
        }

        // Flatten, each list is newest first so fill it from the end
        self.sector_line_buf = Vec::with_capacity(links.len());
        for (sector, head) in self.sectors.iter_mut().zip(heads) {
            let start = self.sector_line_buf.len();
            let mut next = head;
            while let Some(idx) = next {
                self.sector_line_buf.push(links[idx].line);
                next = links[idx].next;
            }
            self.sector_line_buf[start..].reverse();
            sector.lines = start..self.sector_line_buf.len();
        }
        debug!(
            "Built sector line lists, {} links over {} sectors",
            self.sector_line_buf.len(),
            self.sectors.len()
        );
    }

    /// Record which leaves belong to each sector, and where each leaf sits
    /// in its sector's list
    pub(crate) fn build_sector_leaf_lists(&mut self) {
        for (i, sector) in self.sectors.iter_mut().enumerate() {
            let id = SectorId::from_index(i);
            sector.bsp_leafs.clear();
            for (leaf_idx, leaf) in self.bsp_leafs.iter_mut().enumerate() {
                if leaf.sector == Some(id) {
                    leaf.in_sector_index = sector.bsp_leafs.len();
                    sector.bsp_leafs.push(leaf_idx);
                }
            }
        }
    }

    /// Recalculate the derived line values from the final vertex positions
    pub(crate) fn finish_linedefs(&mut self) {
        for line in self.linedefs.iter_mut() {
            let (Some(v1), Some(v2)) = (
                self.vertexes.get(line.v[0].index()),
                self.vertexes.get(line.v[1].index()),
            ) else {
                continue;
            };
            let delta = v2.pos - v1.pos;
            line.delta = delta;
            line.slopetype = SlopeType::from_delta(delta.x as f64, delta.y as f64);
            line.bbox = BBox::new(v1.pos, v2.pos);
            line.length = accurate_distance(delta.x as f64, delta.y as f64) as f32;
            line.angle = bams_atan2(delta.y as i32, delta.x as i32);
        }
    }

    pub(crate) fn finish_sectors(&mut self) {
        for sector in self.sectors.iter_mut() {
            let lines = &self.sector_line_buf[sector.lines.clone()];
            let points = lines.iter().flat_map(|l| {
                let line = &self.linedefs[l.index()];
                line.v.map(|v| self.vertexes[v.index()].pos)
            });
            if let Some(aa_box) = BBox::from_points(points) {
                sector.aa_box = aa_box;
            }
            sector.rough_area = sector.aa_box.width() * sector.aa_box.height();
            sector.origin = sector.aa_box.center();

            let mid = sector.aa_box.center();
            sector.sound_origin = Vec3::new(
                mid.x,
                mid.y,
                (sector.ceiling_height() - sector.floor_height()) / 2.0,
            );
            for plane in sector.planes.iter_mut() {
                plane.sound_origin = Vec3::new(mid.x, mid.y, plane.height);
                plane.target = plane.height;
            }
        }
    }

    /// The map bounds are the union of every sector with lines
    pub(crate) fn update_bounds(&mut self) {
        let mut bounds: Option<BBox> = None;
        for sector in self.sectors.iter().filter(|s| s.line_count() > 0) {
            match bounds.as_mut() {
                Some(b) => b.join(&sector.aa_box),
                None => bounds = Some(sector.aa_box),
            }
        }
        self.bbox = bounds.unwrap_or_default();
    }

    pub(crate) fn prepare_bsp_leafs(&mut self) {
        for leaf in self.bsp_leafs.iter_mut() {
            if let Some(aa_box) = BBox::from_points(leaf.points.iter().copied()) {
                leaf.aa_box = aa_box;
            }
            leaf.mid_point = leaf.aa_box.center();
            leaf.world_grid_offset = Vec2::new(
                leaf.aa_box.left % WORLD_GRID_SIZE,
                leaf.aa_box.top % WORLD_GRID_SIZE,
            );
        }
    }
}
