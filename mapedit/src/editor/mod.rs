//! The map editing interface.
//!
//! A map loader calls `begin`, creates every element of the map through the
//! `*_create` calls, then calls `end` to compile the result into a `GameMap`.
//! Every handle returned while editing stays valid in the built map.

mod build;
mod dedup;
mod edit_map;
mod harden;
mod owners;
#[cfg(test)]
mod tests;
mod window;

use glam::{Vec2, Vec3, Vec4};
use log::{info, warn};

pub use edit_map::{
    EditLineDef, EditMap, EditPlane, EditPolyobj, EditSector, EditSideDef, EditVertex,
};

use crate::collab::{BspBuilder, MapHooks};
use crate::diagnostics::Diagnostics;
use crate::error::{BuildError, EditError};
use crate::gameobj::{GameObjDef, PropValue};
use crate::handle::{LineId, PlaneId, PolyobjId, SectorId, SideId, VertexId};
use crate::map::GameMap;
use crate::map::blockmap::MAPBLOCKUNITS;
use crate::map::map_defs::{MaterialId, Surface};

const LOG_TAG: &str = "MapEditor";

/// Owns the map being edited and the last map built
pub struct MapEditor {
    editing: Option<EditMap>,
    last_built: Option<GameMap>,
    diagnostics: Diagnostics,
    gameobj_defs: Vec<GameObjDef>,
    blockmap_cell_size: f32,
}

impl Default for MapEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MapEditor {
    pub fn new() -> Self {
        Self {
            editing: None,
            last_built: None,
            diagnostics: Diagnostics::default(),
            gameobj_defs: Vec::new(),
            blockmap_cell_size: MAPBLOCKUNITS,
        }
    }

    /// Size of the blockmap cells in map units for maps built after this
    pub fn set_blockmap_cell_size(&mut self, size: f32) {
        if size > 0.0 {
            self.blockmap_cell_size = size;
        } else {
            warn!("{LOG_TAG}: ignoring blockmap cell size {size}");
        }
    }

    /// Make a game object type known. Maps begun after this can record
    /// values for it.
    pub fn register_game_obj_def(&mut self, def: GameObjDef) {
        if let Some(existing) = self
            .gameobj_defs
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(&def.name))
        {
            *existing = def;
        } else {
            self.gameobj_defs.push(def);
        }
    }

    /// Start editing a new map. Does nothing if a map is already being
    /// edited.
    pub fn begin(&mut self, uri: &str) -> bool {
        if self.editing.is_some() {
            return true;
        }
        info!("{LOG_TAG}: begin map \"{uri}\"");
        self.diagnostics.clear();
        self.editing = Some(EditMap::new(uri, self.gameobj_defs.clone()));
        true
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The map being edited
    pub fn edit_map(&self) -> Option<&EditMap> {
        self.editing.as_ref()
    }

    /// Compile the map being edited. On success the map is kept as the last
    /// built map. Editing is over either way.
    pub fn end(
        &mut self,
        bsp: &mut dyn BspBuilder,
        hooks: &mut dyn MapHooks,
    ) -> Result<(), BuildError> {
        let edit = self.editing.take().ok_or(BuildError::NotEditing)?;
        match edit.build(bsp, hooks, self.blockmap_cell_size, &mut self.diagnostics) {
            Ok(map) => {
                self.last_built = Some(map);
                Ok(())
            }
            Err(e) => {
                warn!("{LOG_TAG}: {e}");
                Err(e)
            }
        }
    }

    pub fn last_built_map(&self) -> Option<&GameMap> {
        self.last_built.as_ref()
    }

    pub fn take_last_built_map(&mut self) -> Option<GameMap> {
        self.last_built.take()
    }

    /// Problems found by the last `end`
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn edit<T>(
        &mut self,
        what: &str,
        f: impl FnOnce(&mut EditMap) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let result = match self.editing.as_mut() {
            Some(map) => f(map),
            None => Err(EditError::NotEditing),
        };
        if let Err(e) = &result {
            warn!("{LOG_TAG}: {what} rejected: {e}");
        }
        result
    }

    pub fn vertex_create(&mut self, x: f64, y: f64) -> Result<VertexId, EditError> {
        self.edit("vertex", |map| Ok(map.vertex_create(x, y)))
    }

    pub fn vertex_create_many(&mut self, positions: &[(f64, f64)]) -> Result<Vec<VertexId>, EditError> {
        self.edit("vertexes", |map| map.vertex_create_many(positions))
    }

    pub fn sidedef_create(
        &mut self,
        sector: Option<SectorId>,
        flags: i16,
        top: Surface,
        middle: Surface,
        bottom: Surface,
    ) -> Result<SideId, EditError> {
        self.edit("sidedef", |map| {
            map.sidedef_create(sector, flags, top, middle, bottom)
        })
    }

    pub fn linedef_create(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        front: Option<SideId>,
        back: Option<SideId>,
        flags: u32,
    ) -> Result<LineId, EditError> {
        self.edit("linedef", |map| map.linedef_create(v1, v2, front, back, flags))
    }

    pub fn sector_create(
        &mut self,
        light_level: f32,
        red: f32,
        green: f32,
        blue: f32,
    ) -> Result<SectorId, EditError> {
        self.edit("sector", |map| {
            Ok(map.sector_create(light_level, red, green, blue))
        })
    }

    pub fn plane_create(
        &mut self,
        sector: SectorId,
        height: f32,
        material: Option<MaterialId>,
        offset: Vec2,
        rgba: Vec4,
        normal: Vec3,
    ) -> Result<PlaneId, EditError> {
        self.edit("plane", |map| {
            map.plane_create(sector, height, material, offset, rgba, normal)
        })
    }

    pub fn polyobj_create(
        &mut self,
        lines: &[LineId],
        tag: i32,
        seq_type: i32,
        anchor_x: f64,
        anchor_y: f64,
    ) -> Result<PolyobjId, EditError> {
        self.edit("polyobj", |map| {
            map.polyobj_create(lines, tag, seq_type, anchor_x, anchor_y)
        })
    }

    pub fn game_obj_property(
        &mut self,
        obj_name: &str,
        element: u32,
        prop_name: &str,
        value: PropValue,
    ) -> Result<(), EditError> {
        self.edit("game object property", |map| {
            map.game_obj_property(obj_name, element, prop_name, value)
        })
    }
}
