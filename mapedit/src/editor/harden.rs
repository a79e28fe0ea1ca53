//! Copy the editable elements into the runtime map. Each element keeps its
//! position, so a handle from editing addresses the same element afterwards.

use glam::Vec3;
use log::debug;

use super::edit_map::{EditLineDef, EditPolyobj, EditSector, EditSideDef, EditVertex};
use crate::flags::{HEdgeFlags, LineInFlags};
use crate::handle::{LineId, SectorId};
use crate::map::GameMap;
use crate::map::map_defs::{
    BBox, HEdge, LineDef, Plane, Polyobj, Sector, SideDef, Surface, Vertex, to_vec2,
};

/// Planes are added later by `harden_planes`
pub(super) fn harden_sectors(map: &mut GameMap, sectors: &[EditSector]) {
    map.sectors = sectors
        .iter()
        .enumerate()
        .map(|(i, s)| Sector {
            num: i as u32,
            light_level: s.light_level,
            rgb: s.rgb,
            flags: s.flags,
            planes: Vec::new(),
            lines: 0..0,
            bsp_leafs: Vec::new(),
            aa_box: BBox::default(),
            rough_area: 0.0,
            origin: Default::default(),
            sound_origin: Vec3::ZERO,
        })
        .collect();
}

pub(super) fn harden_sidedefs(map: &mut GameMap, sides: &[EditSideDef]) {
    map.sidedefs = sides
        .iter()
        .map(|s| SideDef {
            sector: s.sector,
            line: None,
            flags: s.flags,
            surfaces: s
                .surfaces
                .map(|surface| Surface::new(surface.material, surface.offset, surface.color)),
            origin: Default::default(),
        })
        .collect();
}

/// Also points each side back at its line and places the side's origin at
/// the middle of that line
pub(super) fn harden_linedefs(map: &mut GameMap, lines: &[EditLineDef], vertexes: &[EditVertex]) {
    map.linedefs = Vec::with_capacity(lines.len());
    for (i, l) in lines.iter().enumerate() {
        let id = LineId::from_index(i);
        let mid = (vertexes[l.v[0].index()].pos + vertexes[l.v[1].index()].pos) / 2.0;
        for side in l.sides.iter().flatten() {
            if let Some(side) = map.sidedefs.get_mut(side.index()) {
                side.line = Some(id);
                side.origin = to_vec2(mid);
            }
        }

        map.linedefs.push(LineDef {
            v: l.v,
            sides: l.sides,
            flags: l.flags,
            in_flags: l.in_flags,
            delta: to_vec2(l.delta),
            slopetype: l.slopetype,
            bbox: l.bbox,
            length: l.length as f32,
            angle: l.angle,
            owners: l.owners,
            window_effect: l.window_effect,
        });
    }
}

/// Each polyobj line gets a half-edge of its own. The half-edge end points
/// are filled in by `finish_polyobj_hedges` once the vertexes are final.
pub(super) fn harden_polyobjs(map: &mut GameMap, polyobjs: &[EditPolyobj]) {
    let mut polys = Vec::with_capacity(polyobjs.len());
    for (idx, po) in polyobjs.iter().enumerate() {
        let mut hedges = Vec::with_capacity(po.lines.len());
        for &line_id in &po.lines {
            let Some(line) = map.linedefs.get_mut(line_id.index()) else {
                continue;
            };
            line.in_flags |= LineInFlags::Polyobj as u32;
            let front = line.front_side();
            let length = line.length;
            hedges.push(HEdge {
                line: line_id,
                v: [None, None],
                length,
                front_sector: map.side_sector(front),
                back_sector: None,
                flags: HEdgeFlags::Polyobj as u32,
            });
        }

        polys.push(Polyobj {
            idx,
            tag: po.tag,
            seq_type: po.seq_type,
            crush: false,
            pos: to_vec2(po.anchor),
            lines: po.lines.clone(),
            hedges,
            original_pts: Vec::new(),
            prev_pts: Vec::new(),
        });
    }
    map.polyobjs = polys;
}

/// Includes any vertexes the BSP builder appended
pub(super) fn harden_vertexes(map: &mut GameMap, vertexes: &[EditVertex]) {
    map.vertexes = vertexes
        .iter()
        .map(|v| Vertex {
            pos: to_vec2(v.pos),
            owners: v.owners,
            num_owners: v.num_owners,
        })
        .collect();
    debug!("Hardened {} vertexes", map.vertexes.len());
}

/// Link the polyobj half-edges to their line's vertexes and record each
/// line's start relative to the anchor
pub(super) fn finish_polyobj_hedges(map: &mut GameMap) {
    for po in map.polyobjs.iter_mut() {
        po.original_pts.clear();
        for hedge in po.hedges.iter_mut() {
            let line = &map.linedefs[hedge.line.index()];
            hedge.v = line.v.map(Some);
            let start = map.vertexes[line.v[0].index()].pos;
            po.original_pts.push(start - po.pos);
        }
        po.prev_pts = po.original_pts.clone();
    }
}

pub(super) fn harden_planes(map: &mut GameMap, sectors: &[EditSector]) {
    for (i, (sector, edit)) in map.sectors.iter_mut().zip(sectors).enumerate() {
        let id = SectorId::from_index(i);
        sector.planes = edit
            .planes
            .iter()
            .map(|p| Plane {
                kind: p.kind,
                sector: id,
                height: p.height,
                target: p.height,
                old_height: [p.height; 2],
                vis_height: p.height,
                vis_height_delta: 0.0,
                surface: p.surface,
                normal: p.normal,
                tangent: p.tangent,
                bitangent: p.bitangent,
                sound_origin: Vec3::ZERO,
            })
            .collect();
    }
}
