//! Compiles a map built up one element at a time into the cross referenced
//! runtime form used by the game.
//!
//! The usual flow is:
//!
//! - `MapEditor::begin`
//! - create vertexes, sectors and planes, sidedefs, linedefs and polyobjs
//! - `MapEditor::end` with a `BspBuilder` and `MapHooks`
//! - take the result from `MapEditor::take_last_built_map`

pub mod collab;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod flags;
pub mod gameobj;
pub mod handle;
pub mod map;

pub use crate::collab::{BspBuilder, MapElement, MapHooks, NoHooks, SectorLeafBuilder};
pub use crate::diagnostics::{Diagnostics, UnclosedSector, WindowEffect};
pub use crate::editor::{EditVertex, MapEditor};
pub use crate::error::{BuildError, EditError};
pub use crate::flags::{HEdgeFlags, LineDefFlags, LineInFlags, SectorFlags};
pub use crate::gameobj::{GameObjDb, GameObjDef, PropValue, ValueType};
pub use crate::handle::{LineId, OwnerId, PlaneId, PolyobjId, SectorId, SideId, VertexId};
pub use crate::map::GameMap;
pub use crate::map::blockmap::{Blockmap, MAPBLOCKUNITS, MAX_BLOCKMAP_CELLS};
pub use crate::map::map_defs::*;
