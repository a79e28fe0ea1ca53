use std::ops::Range;

use glam::{DVec2, Vec2, Vec3, Vec4};
use math::BinAngle;

use crate::flags::{HEdgeFlags, LineInFlags, SectorFlags};
use crate::handle::{LineId, OwnerId, SectorId, SideId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

impl SlopeType {
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dx == 0.0 {
            SlopeType::Vertical
        } else if dy == 0.0 {
            SlopeType::Horizontal
        } else if dy / dx > 0.0 {
            SlopeType::Positive
        } else {
            SlopeType::Negative
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BBox {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl BBox {
    pub fn new(v1: Vec2, v2: Vec2) -> Self {
        let mut bbox = BBox::default();

        if v1.x < v2.x {
            bbox.left = v1.x;
            bbox.right = v2.x;
        } else {
            bbox.left = v2.x;
            bbox.right = v1.x;
        }

        if v1.y < v2.y {
            bbox.bottom = v1.y;
            bbox.top = v2.y;
        } else {
            bbox.bottom = v2.y;
            bbox.top = v1.y;
        }

        bbox
    }

    /// Box covering every point, `None` if there are none
    pub fn from_points(mut points: impl Iterator<Item = Vec2>) -> Option<Self> {
        let first = points.next()?;
        let mut bbox = BBox::new(first, first);
        for p in points {
            bbox.add_point(p);
        }
        Some(bbox)
    }

    pub fn add_point(&mut self, p: Vec2) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.bottom = self.bottom.min(p.y);
        self.top = self.top.max(p.y);
    }

    /// Expand to also cover `other`
    pub fn join(&mut self, other: &BBox) {
        self.left = self.left.min(other.left);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.min(other.bottom);
        self.top = self.top.max(other.top);
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left, self.bottom)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Opaque material reference, resolved by the resource system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub material: Option<MaterialId>,
    /// Material origin offset
    pub offset: Vec2,
    /// Offset used when drawing. Starts equal to `offset`
    pub vis_offset: Vec2,
    /// RGBA
    pub color: Vec4,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            material: None,
            offset: Vec2::ZERO,
            vis_offset: Vec2::ZERO,
            color: Vec4::ONE,
        }
    }
}

impl Surface {
    pub fn new(material: Option<MaterialId>, offset: Vec2, color: Vec4) -> Self {
        Self {
            material,
            offset,
            vis_offset: offset,
            color,
        }
    }
}

/// Index into `SideDef::surfaces`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideSection {
    Top = 0,
    Middle = 1,
    Bottom = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneType {
    Floor,
    Ceiling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    /// First owner of the ring of lines meeting here
    pub owners: Option<OwnerId>,
    pub num_owners: u32,
}

/// A node in a vertex's ring of lines. Rings are circular and sorted
/// clockwise by the angle of each line as seen from the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOwner {
    pub line: LineId,
    pub next: OwnerId,
    pub prev: OwnerId,
    /// Clockwise angle from this line to `next`
    pub delta: BinAngle,
}

#[derive(Debug, Clone)]
pub struct SideDef {
    /// Sector the SideDef is facing.
    pub sector: Option<SectorId>,
    /// The linedef this side belongs to
    pub line: Option<LineId>,
    pub flags: i16,
    pub surfaces: [Surface; 3],
    /// Middle of the owning line, used as the origin for surface sounds
    pub origin: Vec2,
}

impl SideDef {
    pub fn surface(&self, section: SideSection) -> &Surface {
        &self.surfaces[section as usize]
    }
}

#[derive(Debug, Clone)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v: [VertexId; 2],
    /// Front and back sides. The back is `None` on one-sided lines
    pub sides: [Option<SideId>; 2],
    pub flags: u32,
    /// `LineInFlags`
    pub in_flags: u32,
    // Precalculated v2 - v1 for side checking.
    pub delta: Vec2,
    pub slopetype: SlopeType,
    pub bbox: BBox,
    pub length: f32,
    pub angle: BinAngle,
    /// The ring nodes for this line at v1 and v2
    pub owners: [Option<OwnerId>; 2],
    /// Sector seen through this one-sided line
    pub window_effect: Option<SectorId>,
}

impl LineDef {
    pub fn front_side(&self) -> Option<SideId> {
        self.sides[0]
    }

    pub fn back_side(&self) -> Option<SideId> {
        self.sides[1]
    }

    pub fn is_polyobj(&self) -> bool {
        self.in_flags & LineInFlags::Polyobj as u32 != 0
    }

    /// Vertex at the other end of the line from `v`
    pub fn other_vertex(&self, v: VertexId) -> VertexId {
        if self.v[0] == v { self.v[1] } else { self.v[0] }
    }
}

#[derive(Debug, Clone)]
pub struct Plane {
    pub kind: PlaneType,
    pub sector: SectorId,
    pub height: f32,
    /// Height the plane is moving towards
    pub target: f32,
    pub old_height: [f32; 2],
    pub vis_height: f32,
    pub vis_height_delta: f32,
    pub surface: Surface,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub sound_origin: Vec3,
}

/// The SECTORS record, at runtime.
#[derive(Debug, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: u32,
    pub light_level: f32,
    pub rgb: Vec3,
    /// `SectorFlags`
    pub flags: u32,
    pub planes: Vec<Plane>,
    /// Range of this sector's lines in `GameMap::sector_lines` storage
    pub(crate) lines: Range<usize>,
    pub bsp_leafs: Vec<usize>,
    pub aa_box: BBox,
    pub rough_area: f32,
    pub origin: Vec2,
    /// origin for any sounds played by the sector
    pub sound_origin: Vec3,
}

impl Sector {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_unclosed(&self) -> bool {
        self.flags & SectorFlags::Unclosed as u32 != 0
    }

    pub fn plane(&self, kind: PlaneType) -> Option<&Plane> {
        self.planes.iter().find(|p| p.kind == kind)
    }

    pub fn floor_height(&self) -> f32 {
        self.plane(PlaneType::Floor).map(|p| p.height).unwrap_or(0.0)
    }

    pub fn ceiling_height(&self) -> f32 {
        self.plane(PlaneType::Ceiling).map(|p| p.height).unwrap_or(0.0)
    }
}

/// Half-edge. Only the polyobj ones are made here, the rest come from the BSP
#[derive(Debug, Clone)]
pub struct HEdge {
    pub line: LineId,
    /// Filled in once the vertexes are hardened
    pub v: [Option<VertexId>; 2],
    pub length: f32,
    pub front_sector: Option<SectorId>,
    pub back_sector: Option<SectorId>,
    /// `HEdgeFlags`
    pub flags: u32,
}

impl HEdge {
    pub fn is_polyobj(&self) -> bool {
        self.flags & HEdgeFlags::Polyobj as u32 != 0
    }
}

#[derive(Debug, Clone)]
pub struct Polyobj {
    pub idx: usize,
    pub tag: i32,
    pub seq_type: i32,
    pub crush: bool,
    /// The anchor point the polyobj rotates and moves about
    pub pos: Vec2,
    pub lines: Vec<LineId>,
    /// One per line, same order
    pub hedges: Vec<HEdge>,
    /// Start point of every line relative to `pos`
    pub original_pts: Vec<Vec2>,
    pub prev_pts: Vec<Vec2>,
}

/// A convex leaf produced by the partitioner
#[derive(Debug, Clone, Default)]
pub struct BspLeaf {
    pub sector: Option<SectorId>,
    /// Outline of the leaf
    pub points: Vec<Vec2>,
    /// Position of this leaf in its sector's leaf list
    pub in_sector_index: usize,
    pub aa_box: BBox,
    pub mid_point: Vec2,
    pub world_grid_offset: Vec2,
}

impl BspLeaf {
    pub fn new(sector: Option<SectorId>, points: Vec<Vec2>) -> Self {
        Self {
            sector,
            points,
            ..Self::default()
        }
    }
}

/// Convert a double precision build position to runtime precision
#[inline]
pub(crate) fn to_vec2(v: DVec2) -> Vec2 {
    v.as_vec2()
}
