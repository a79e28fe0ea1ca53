//! The compiled, runtime map.
//!
//! A `GameMap` is produced by `MapEditor::end` and is not edited again
//! afterwards, apart from the BSP builder and engine hooks that fill in their
//! parts while the map is being finished.
//!
//! Access to the `Vec` arrays within is limited to slices so that nothing can
//! be removed or reordered. Every cross reference is a handle into these
//! arrays, so moving an element would break them.

pub mod blockmap;
mod index;
pub mod map_defs;

use glam::Vec2;

use crate::gameobj::GameObjDb;
use crate::handle::{LineId, OwnerId, PolyobjId, SectorId, SideId, VertexId};

use self::blockmap::Blockmap;
use self::map_defs::{BBox, BspLeaf, LineDef, LineOwner, Polyobj, Sector, SideDef, Vertex};

#[derive(Debug, Default, Clone)]
pub struct GameMap {
    pub(crate) uri: String,
    pub(crate) vertexes: Vec<Vertex>,
    pub(crate) linedefs: Vec<LineDef>,
    pub(crate) sidedefs: Vec<SideDef>,
    pub(crate) sectors: Vec<Sector>,
    pub(crate) polyobjs: Vec<Polyobj>,
    /// Arena for every vertex owner ring
    pub(crate) line_owners: Vec<LineOwner>,
    pub(crate) bsp_leafs: Vec<BspLeaf>,
    /// Every sector's lines, back to back. See `Sector::lines`
    pub(crate) sector_line_buf: Vec<LineId>,
    pub(crate) line_blockmap: Blockmap<LineId>,
    /// Map objects are linked in by the game, it starts empty
    pub(crate) mobj_blockmap: Blockmap<u32>,
    pub(crate) polyobj_blockmap: Blockmap<PolyobjId>,
    pub(crate) bbox: BBox,
    pub(crate) gameobj: GameObjDb,
}

impl GameMap {
    pub(crate) fn new(uri: &str, gameobj: GameObjDb) -> Self {
        Self {
            uri: uri.to_owned(),
            gameobj,
            ..Self::default()
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sectors_mut(&mut self) -> &mut [Sector] {
        &mut self.sectors
    }

    pub fn polyobjs(&self) -> &[Polyobj] {
        &self.polyobjs
    }

    pub fn line_owners(&self) -> &[LineOwner] {
        &self.line_owners
    }

    pub fn bsp_leafs(&self) -> &[BspLeaf] {
        &self.bsp_leafs
    }

    pub fn bsp_leafs_mut(&mut self) -> &mut [BspLeaf] {
        &mut self.bsp_leafs
    }

    /// Add a leaf made by the partitioner. Returns its index.
    pub fn push_bsp_leaf(&mut self, leaf: BspLeaf) -> usize {
        self.bsp_leafs.push(leaf);
        self.bsp_leafs.len() - 1
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertexes.get(id.index())
    }

    pub fn linedef(&self, id: LineId) -> Option<&LineDef> {
        self.linedefs.get(id.index())
    }

    pub fn sidedef(&self, id: SideId) -> Option<&SideDef> {
        self.sidedefs.get(id.index())
    }

    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id.index())
    }

    pub fn line_owner(&self, id: OwnerId) -> Option<&LineOwner> {
        self.line_owners.get(id.index())
    }

    /// The sector a side faces
    pub fn side_sector(&self, side: Option<SideId>) -> Option<SectorId> {
        side.and_then(|s| self.sidedefs.get(s.index()))
            .and_then(|s| s.sector)
    }

    pub fn front_sector(&self, line: &LineDef) -> Option<SectorId> {
        self.side_sector(line.front_side())
    }

    pub fn back_sector(&self, line: &LineDef) -> Option<SectorId> {
        self.side_sector(line.back_side())
    }

    /// Lines of `sector`, in the order they were created
    pub fn sector_lines(&self, sector: SectorId) -> &[LineId] {
        self.sectors
            .get(sector.index())
            .map(|s| &self.sector_line_buf[s.lines.clone()])
            .unwrap_or(&[])
    }

    /// Walk the ring of lines meeting at `vertex`, clockwise from its first
    /// owner
    pub fn vertex_owners(&self, vertex: VertexId) -> OwnerRing<'_> {
        let (head, count) = self
            .vertexes
            .get(vertex.index())
            .map(|v| (v.owners, v.num_owners as usize))
            .unwrap_or((None, 0));
        OwnerRing {
            owners: &self.line_owners,
            next: head,
            remaining: count,
        }
    }

    pub fn line_blockmap(&self) -> &Blockmap<LineId> {
        &self.line_blockmap
    }

    pub fn mobj_blockmap(&self) -> &Blockmap<u32> {
        &self.mobj_blockmap
    }

    pub fn mobj_blockmap_mut(&mut self) -> &mut Blockmap<u32> {
        &mut self.mobj_blockmap
    }

    pub fn polyobj_blockmap(&self) -> &Blockmap<PolyobjId> {
        &self.polyobj_blockmap
    }

    pub fn polyobj_blockmap_mut(&mut self) -> &mut Blockmap<PolyobjId> {
        &mut self.polyobj_blockmap
    }

    /// Bounds of every sector which has lines
    pub fn bounds(&self) -> &BBox {
        &self.bbox
    }

    pub fn gameobj(&self) -> &GameObjDb {
        &self.gameobj
    }

    /// Set up the line, mobj and polyobj blockmaps to cover `min..=max`
    pub(crate) fn init_blockmaps(&mut self, min: Vec2, max: Vec2, cell_size: f32) {
        self.line_blockmap = Blockmap::new(min, max, cell_size);
        // Share whatever cell size the line grid settled on
        let cell_size = self.line_blockmap.cell_size;
        self.mobj_blockmap = Blockmap::new(min, max, cell_size);
        self.polyobj_blockmap = Blockmap::new(min, max, cell_size);
    }

    /// Link a line into every line blockmap cell it crosses, using the
    /// given end points.
    pub(crate) fn link_linedef(&mut self, line: LineId, start: Vec2, end: Vec2) -> usize {
        self.line_blockmap.link_segment(line, start, end)
    }
}

/// Iterator over a vertex's owner ring
pub struct OwnerRing<'a> {
    owners: &'a [LineOwner],
    next: Option<OwnerId>,
    remaining: usize,
}

impl<'a> Iterator for OwnerRing<'a> {
    type Item = (OwnerId, &'a LineOwner);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        let owner = self.owners.get(id.index())?;
        self.remaining -= 1;
        self.next = Some(owner.next);
        Some((id, owner))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
