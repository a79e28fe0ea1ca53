//! The editable map. Elements are created one at a time, each getting the
//! next 1-based build index, and only ever appended.

use glam::{DVec2, Vec2, Vec3, Vec4};
use math::{BinAngle, accurate_distance, bams_atan2, unit_clamp};

use crate::error::EditError;
use crate::flags::{LineDefFlags, LineInFlags};
use crate::gameobj::{GameObjDb, GameObjDef, PropValue};
use crate::handle::{LineId, OwnerId, PlaneId, PolyobjId, SectorId, SideId, VertexId};
use crate::map::map_defs::{BBox, MaterialId, PlaneType, SlopeType, Surface, to_vec2};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EditVertex {
    pub pos: DVec2,
    /// Number of lines using this vertex
    pub(crate) ref_count: u32,
    /// The vertex this one duplicates
    pub(crate) equiv: Option<VertexId>,
    /// Head of the owner list while rings are being built
    pub(crate) owners: Option<OwnerId>,
    pub(crate) num_owners: u32,
}

impl EditVertex {
    /// A new vertex, as made by the BSP builder for split points
    pub fn new(pos: DVec2) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    pub fn equiv(&self) -> Option<VertexId> {
        self.equiv
    }

    pub fn num_owners(&self) -> u32 {
        self.num_owners
    }
}

#[derive(Debug, Clone)]
pub struct EditLineDef {
    pub v: [VertexId; 2],
    pub sides: [Option<SideId>; 2],
    pub flags: u32,
    pub in_flags: u32,
    pub delta: DVec2,
    pub slopetype: SlopeType,
    pub bbox: BBox,
    pub length: f64,
    pub angle: BinAngle,
    /// Owner node registered at each end
    pub owners: [Option<OwnerId>; 2],
    pub window_effect: Option<SectorId>,
}

impl EditLineDef {
    fn new(v1: VertexId, v2: VertexId) -> Self {
        Self {
            v: [v1, v2],
            sides: [None, None],
            flags: 0,
            in_flags: 0,
            delta: DVec2::ZERO,
            slopetype: SlopeType::Horizontal,
            bbox: BBox::default(),
            length: 0.0,
            angle: BinAngle::ZERO,
            owners: [None, None],
            window_effect: None,
        }
    }

    pub fn front_side(&self) -> Option<SideId> {
        self.sides[0]
    }

    pub fn back_side(&self) -> Option<SideId> {
        self.sides[1]
    }

    pub fn is_polyobj(&self) -> bool {
        self.in_flags & LineInFlags::Polyobj as u32 != 0
    }

    /// Refresh the values derived from the end points
    fn update_geometry(&mut self, p1: DVec2, p2: DVec2) {
        self.delta = p2 - p1;
        self.slopetype = SlopeType::from_delta(self.delta.x, self.delta.y);
        self.bbox = BBox::new(to_vec2(p1), to_vec2(p2));
        self.length = accurate_distance(self.delta.x, self.delta.y);
        self.angle = bams_atan2(self.delta.y as i32, self.delta.x as i32);
    }
}

#[derive(Debug, Default, Clone)]
pub struct EditSideDef {
    pub sector: Option<SectorId>,
    pub flags: i16,
    pub surfaces: [Surface; 3],
    /// The one line allowed to use this side
    pub line: Option<LineId>,
}

#[derive(Debug, Clone)]
pub struct EditPlane {
    pub kind: PlaneType,
    pub height: f32,
    pub surface: Surface,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl EditPlane {
    fn new(height: f32, surface: Surface, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        let (tangent, bitangent) = build_tangents(normal);
        Self {
            kind: if normal.z < 0.0 {
                PlaneType::Ceiling
            } else {
                PlaneType::Floor
            },
            height,
            surface,
            normal,
            tangent,
            bitangent,
        }
    }
}

/// Tangent and bitangent for a surface with the given unit normal
fn build_tangents(normal: Vec3) -> (Vec3, Vec3) {
    let reference = if normal.z.abs() > normal.x.abs().max(normal.y.abs()) {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let tangent = reference.cross(normal).normalize_or_zero();
    let bitangent = tangent.cross(normal).normalize_or_zero();
    (tangent, bitangent)
}

#[derive(Debug, Default, Clone)]
pub struct EditSector {
    pub light_level: f32,
    pub rgb: Vec3,
    pub flags: u32,
    pub planes: Vec<EditPlane>,
}

#[derive(Debug, Default, Clone)]
pub struct EditPolyobj {
    pub lines: Vec<LineId>,
    pub tag: i32,
    pub seq_type: i32,
    pub anchor: DVec2,
}

/// A map under construction
#[derive(Debug, Default)]
pub struct EditMap {
    pub(crate) uri: String,
    pub(crate) vertexes: Vec<EditVertex>,
    pub(crate) lines: Vec<EditLineDef>,
    pub(crate) sides: Vec<EditSideDef>,
    pub(crate) sectors: Vec<EditSector>,
    pub(crate) polyobjs: Vec<EditPolyobj>,
    pub(crate) gameobj: GameObjDb,
}

impl EditMap {
    pub fn new(uri: &str, defs: Vec<GameObjDef>) -> Self {
        Self {
            uri: uri.to_owned(),
            gameobj: GameObjDb::new(defs),
            ..Self::default()
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn vertexes(&self) -> &[EditVertex] {
        &self.vertexes
    }

    pub fn lines(&self) -> &[EditLineDef] {
        &self.lines
    }

    pub fn sides(&self) -> &[EditSideDef] {
        &self.sides
    }

    pub fn sectors(&self) -> &[EditSector] {
        &self.sectors
    }

    pub fn polyobjs(&self) -> &[EditPolyobj] {
        &self.polyobjs
    }

    pub(crate) fn vertex(&self, id: VertexId) -> &EditVertex {
        &self.vertexes[id.index()]
    }

    pub(crate) fn line(&self, id: LineId) -> &EditLineDef {
        &self.lines[id.index()]
    }

    /// Sector on the given side of a line
    pub(crate) fn side_sector(&self, side: Option<SideId>) -> Option<SectorId> {
        side.and_then(|s| self.sides.get(s.index()))
            .and_then(|s| s.sector)
    }

    // Unchecked factory. Each appends a blank record and hands back its
    // handle, the callers below validate first.

    fn create_vertex(&mut self) -> VertexId {
        self.vertexes.push(EditVertex::default());
        VertexId::from_index(self.vertexes.len() - 1)
    }

    fn create_line(&mut self, v1: VertexId, v2: VertexId) -> LineId {
        self.lines.push(EditLineDef::new(v1, v2));
        LineId::from_index(self.lines.len() - 1)
    }

    fn create_side(&mut self) -> SideId {
        self.sides.push(EditSideDef::default());
        SideId::from_index(self.sides.len() - 1)
    }

    fn create_sector(&mut self) -> SectorId {
        self.sectors.push(EditSector::default());
        SectorId::from_index(self.sectors.len() - 1)
    }

    fn create_polyobj(&mut self) -> PolyobjId {
        self.polyobjs.push(EditPolyobj::default());
        PolyobjId::from_index(self.polyobjs.len() - 1)
    }

    fn check_vertex(&self, id: VertexId) -> Result<(), EditError> {
        if id.index() < self.vertexes.len() {
            Ok(())
        } else {
            Err(EditError::VertexOutOfRange(id))
        }
    }

    fn check_side(&self, id: Option<SideId>) -> Result<(), EditError> {
        match id {
            Some(id) if id.index() >= self.sides.len() => Err(EditError::SideOutOfRange(id)),
            Some(id) if self.sides[id.index()].line.is_some() => Err(EditError::SideInUse(id)),
            _ => Ok(()),
        }
    }

    fn check_sector(&self, id: SectorId) -> Result<(), EditError> {
        if id.index() < self.sectors.len() {
            Ok(())
        } else {
            Err(EditError::SectorOutOfRange(id))
        }
    }

    pub fn vertex_create(&mut self, x: f64, y: f64) -> VertexId {
        let id = self.create_vertex();
        self.vertexes[id.index()].pos = DVec2::new(x, y);
        id
    }

    /// Create a vertex at each position, in order
    pub fn vertex_create_many(&mut self, positions: &[(f64, f64)]) -> Result<Vec<VertexId>, EditError> {
        if positions.is_empty() {
            return Err(EditError::NoVertexes);
        }
        Ok(positions
            .iter()
            .map(|&(x, y)| self.vertex_create(x, y))
            .collect())
    }

    /// Create a sidedef. A `None` sector is allowed. The top and bottom
    /// sections are always opaque.
    pub fn sidedef_create(
        &mut self,
        sector: Option<SectorId>,
        flags: i16,
        top: Surface,
        middle: Surface,
        bottom: Surface,
    ) -> Result<SideId, EditError> {
        if let Some(sector) = sector {
            self.check_sector(sector)?;
        }

        let opaque = |s: Surface| Surface::new(s.material, s.offset, s.color.truncate().extend(1.0));
        let id = self.create_side();
        let side = &mut self.sides[id.index()];
        side.sector = sector;
        side.flags = flags;
        side.surfaces = [
            opaque(top),
            Surface::new(middle.material, middle.offset, middle.color),
            opaque(bottom),
        ];
        Ok(id)
    }

    pub fn linedef_create(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        front: Option<SideId>,
        back: Option<SideId>,
        flags: u32,
    ) -> Result<LineId, EditError> {
        self.check_vertex(v1)?;
        self.check_vertex(v2)?;
        if v1 == v2 {
            return Err(EditError::SameVertex(v1));
        }
        self.check_side(front)?;
        self.check_side(back)?;
        if let (Some(f), Some(b)) = (front, back) {
            if f == b {
                return Err(EditError::SideInUse(b));
            }
        }

        let p1 = self.vertex(v1).pos;
        let p2 = self.vertex(v2).pos;
        let length = accurate_distance(p2.x - p1.x, p2.y - p1.y);
        if !(length > 0.0) {
            return Err(EditError::ZeroLength(v1, v2));
        }

        let id = self.create_line(v1, v2);
        self.vertexes[v1.index()].ref_count += 1;
        self.vertexes[v2.index()].ref_count += 1;
        for side in [front, back].into_iter().flatten() {
            self.sides[side.index()].line = Some(id);
        }

        let line = &mut self.lines[id.index()];
        line.sides = [front, back];
        line.update_geometry(p1, p2);
        line.flags = flags;
        if front.is_none() || back.is_none() {
            line.flags |= LineDefFlags::Blocking as u32;
        }
        Ok(id)
    }

    /// Light level and colour are clamped to `0.0..=1.0`
    pub fn sector_create(&mut self, light_level: f32, red: f32, green: f32, blue: f32) -> SectorId {
        let id = self.create_sector();
        let sector = &mut self.sectors[id.index()];
        sector.light_level = unit_clamp(light_level);
        sector.rgb = Vec3::new(unit_clamp(red), unit_clamp(green), unit_clamp(blue));
        id
    }

    /// Add a plane to `sector`. The returned handle is the plane's position
    /// within that sector.
    pub fn plane_create(
        &mut self,
        sector: SectorId,
        height: f32,
        material: Option<MaterialId>,
        offset: Vec2,
        rgba: Vec4,
        normal: Vec3,
    ) -> Result<PlaneId, EditError> {
        self.check_sector(sector)?;
        let planes = &mut self.sectors[sector.index()].planes;
        planes.push(EditPlane::new(
            height,
            Surface::new(material, offset, rgba),
            normal,
        ));
        Ok(PlaneId::from_index(planes.len() - 1))
    }

    pub fn polyobj_create(
        &mut self,
        lines: &[LineId],
        tag: i32,
        seq_type: i32,
        anchor_x: f64,
        anchor_y: f64,
    ) -> Result<PolyobjId, EditError> {
        if lines.is_empty() {
            return Err(EditError::NoLines);
        }
        for (i, &line) in lines.iter().enumerate() {
            let Some(l) = self.lines.get(line.index()) else {
                return Err(EditError::LineOutOfRange(line));
            };
            if l.is_polyobj() || lines[..i].contains(&line) {
                return Err(EditError::LineInPolyobj(line));
            }
        }

        let id = self.create_polyobj();
        for &line in lines {
            self.lines[line.index()].in_flags |= LineInFlags::Polyobj as u32;
        }
        let po = &mut self.polyobjs[id.index()];
        po.lines = lines.to_vec();
        po.tag = tag;
        po.seq_type = seq_type;
        po.anchor = DVec2::new(anchor_x, anchor_y);
        Ok(id)
    }

    pub fn game_obj_property(
        &mut self,
        obj_name: &str,
        element: u32,
        prop_name: &str,
        value: PropValue,
    ) -> Result<(), EditError> {
        self.gameobj.add_value(obj_name, element, prop_name, value)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3, Vec4};
    use math::BinAngle;

    use super::{EditMap, build_tangents};
    use crate::error::EditError;
    use crate::flags::LineDefFlags;
    use crate::handle::{SectorId, SideId, VertexId};
    use crate::map::map_defs::{PlaneType, SlopeType, Surface};

    #[test]
    fn build_indices_are_sequential() {
        let mut map = EditMap::new("", Vec::new());
        for i in 1..=5 {
            assert_eq!(map.vertex_create(i as f64, 0.0).get(), i);
        }
        let many = map.vertex_create_many(&[(9.0, 9.0), (10.0, 10.0)]).unwrap();
        assert_eq!(many.iter().map(|v| v.get()).collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(map.vertex_create_many(&[]), Err(EditError::NoVertexes));
    }

    #[test]
    fn line_geometry_and_flags() {
        let mut map = EditMap::new("", Vec::new());
        let a = map.vertex_create(0.0, 0.0);
        let b = map.vertex_create(0.0, 64.0);
        let sec = map.sector_create(0.5, 1.0, 1.0, 1.0);
        let side = map
            .sidedef_create(Some(sec), 0, Surface::default(), Surface::default(), Surface::default())
            .unwrap();
        let line = map.linedef_create(a, b, Some(side), None, 0).unwrap();

        let l = map.line(line);
        assert_eq!(l.slopetype, SlopeType::Vertical);
        assert_eq!(l.length, 64.0);
        assert_eq!(l.angle, BinAngle::new(0x4000));
        assert_ne!(l.flags & LineDefFlags::Blocking as u32, 0);
        assert_eq!(map.sides()[side.index()].line, Some(line));
        assert_eq!(map.vertex(a).ref_count(), 1);
    }

    #[test]
    fn sidedef_alpha() {
        let mut map = EditMap::new("", Vec::new());
        let see_through = Surface::new(None, Vec2::new(8.0, 0.0), Vec4::new(1.0, 0.5, 0.5, 0.25));
        let side = map
            .sidedef_create(None, 0, see_through, see_through, see_through)
            .unwrap();
        let s = &map.sides()[side.index()];
        assert_eq!(s.sector, None);
        assert_eq!(s.surfaces[0].color.w, 1.0);
        assert_eq!(s.surfaces[1].color.w, 0.25);
        assert_eq!(s.surfaces[2].color.w, 1.0);
        assert_eq!(s.surfaces[1].vis_offset, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn plane_type_from_normal() {
        let mut map = EditMap::new("", Vec::new());
        let sec = map.sector_create(2.0, -1.0, 0.5, 1.0);
        assert_eq!(map.sectors()[0].light_level, 1.0);
        assert_eq!(map.sectors()[0].rgb, Vec3::new(0.0, 0.5, 1.0));

        let floor = map
            .plane_create(sec, 0.0, None, Vec2::ZERO, Vec4::ONE, Vec3::new(0.0, 0.0, 2.0))
            .unwrap();
        let ceil = map
            .plane_create(sec, 128.0, None, Vec2::ZERO, Vec4::ONE, Vec3::new(0.0, 0.0, -1.0))
            .unwrap();
        assert_eq!(floor.get(), 1);
        assert_eq!(ceil.get(), 2);

        let planes = &map.sectors()[0].planes;
        assert_eq!(planes[0].kind, PlaneType::Floor);
        assert_eq!(planes[0].normal, Vec3::Z);
        assert_eq!(planes[1].kind, PlaneType::Ceiling);

        assert_eq!(
            map.plane_create(SectorId::new(2).unwrap(), 0.0, None, Vec2::ZERO, Vec4::ONE, Vec3::Z),
            Err(EditError::SectorOutOfRange(SectorId::new(2).unwrap()))
        );
    }

    #[test]
    fn tangents_are_orthogonal() {
        for n in [Vec3::Z, Vec3::NEG_Z, Vec3::X, Vec3::new(0.6, 0.0, 0.8)] {
            let (t, b) = build_tangents(n);
            assert!(t.dot(n).abs() < 1e-6);
            assert!(b.dot(n).abs() < 1e-6);
            assert!((t.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn rejected_lines_leave_map_unchanged() {
        let mut map = EditMap::new("", Vec::new());
        let a = map.vertex_create(0.0, 0.0);
        let b = map.vertex_create(0.0, 0.0);
        let c = map.vertex_create(64.0, 0.0);
        let side = map
            .sidedef_create(None, 0, Surface::default(), Surface::default(), Surface::default())
            .unwrap();

        assert_eq!(map.linedef_create(a, a, None, None, 0), Err(EditError::SameVertex(a)));
        assert_eq!(map.linedef_create(a, b, None, None, 0), Err(EditError::ZeroLength(a, b)));
        let missing = VertexId::new(9).unwrap();
        assert_eq!(
            map.linedef_create(a, missing, None, None, 0),
            Err(EditError::VertexOutOfRange(missing))
        );
        let no_side = SideId::new(4).unwrap();
        assert_eq!(
            map.linedef_create(a, c, Some(no_side), None, 0),
            Err(EditError::SideOutOfRange(no_side))
        );
        assert_eq!(
            map.linedef_create(a, c, Some(side), Some(side), 0),
            Err(EditError::SideInUse(side))
        );
        assert!(map.lines().is_empty());
        assert_eq!(map.vertex(a).ref_count(), 0);

        map.linedef_create(a, c, Some(side), None, 0).unwrap();
        assert_eq!(
            map.linedef_create(c, a, Some(side), None, 0),
            Err(EditError::SideInUse(side))
        );
    }

    #[test]
    fn polyobj_lines() {
        let mut map = EditMap::new("", Vec::new());
        let a = map.vertex_create(0.0, 0.0);
        let b = map.vertex_create(16.0, 0.0);
        let line = map.linedef_create(a, b, None, None, 0).unwrap();

        assert_eq!(map.polyobj_create(&[], 1, 0, 0.0, 0.0), Err(EditError::NoLines));
        assert_eq!(
            map.polyobj_create(&[line, line], 1, 0, 0.0, 0.0),
            Err(EditError::LineInPolyobj(line))
        );
        let po = map.polyobj_create(&[line], 1, 0, 8.0, 0.0).unwrap();
        assert_eq!(po.get(), 1);
        assert!(map.line(line).is_polyobj());
        assert_eq!(
            map.polyobj_create(&[line], 2, 0, 0.0, 0.0),
            Err(EditError::LineInPolyobj(line))
        );
    }
}
