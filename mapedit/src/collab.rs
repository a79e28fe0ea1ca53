//! The parts of map loading that live outside the compiler. The partitioner
//! and the engine side hooks are handed in by the caller of
//! `MapEditor::end`.

use std::error::Error;

use log::debug;

use crate::diagnostics::Diagnostics;
use crate::editor::EditVertex;
use crate::handle::{SectorId, VertexId};
use crate::map::GameMap;
use crate::map::map_defs::BspLeaf;

/// Element kinds announced to the game once a map is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapElement {
    Vertex,
    LineDef,
    SideDef,
    Sector,
}

/// Builds the BSP for a hardened map.
///
/// `vertexes` is the editable vertex list, in build order. The builder may
/// append new vertexes for split points; they are hardened along with the
/// rest. Leaves are pushed to `map` with `GameMap::push_bsp_leaf`, and any
/// sector found to be open is registered with
/// `Diagnostics::register_unclosed_sector_near`.
pub trait BspBuilder {
    fn build(
        &mut self,
        map: &mut GameMap,
        vertexes: &mut Vec<EditVertex>,
        diagnostics: &mut Diagnostics,
    ) -> bool;
}

/// Engine side steps run while finishing a map. All default to doing nothing.
pub trait MapHooks {
    /// Turn the BSP leaves into renderable polygons
    fn polygonize_map(&mut self, _map: &mut GameMap) {}

    /// Work out the environmental audio of each leaf
    fn determine_reverb_leafs(&mut self, _map: &mut GameMap) {}

    /// Let the game prepare for `count` elements of `kind`
    fn setup_for_map_data(&mut self, _kind: MapElement, _count: usize) {}

    /// Persist the built map. A failure is reported but does not fail the
    /// build.
    fn write_cached_map(&mut self, _map: &GameMap) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl MapHooks for NoHooks {}

/// Stand-in partitioner that makes one leaf per sector, outlined by the end
/// points of the sector's lines. Nothing is split, so the leaves are only
/// convex for convex sectors. A sector whose lines do not meet in pairs at
/// every vertex is registered as unclosed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectorLeafBuilder;

impl BspBuilder for SectorLeafBuilder {
    fn build(
        &mut self,
        map: &mut GameMap,
        vertexes: &mut Vec<EditVertex>,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let mut leafs = Vec::with_capacity(map.sectors().len());
        for i in 0..map.sectors().len() {
            let sector = SectorId::from_index(i);
            let mut points = Vec::new();
            let mut ends: Vec<(VertexId, u32)> = Vec::new();
            for line in map.linedefs() {
                let front = map.front_sector(line) == Some(sector);
                let back = map.back_sector(line) == Some(sector);
                if !front && !back {
                    continue;
                }
                for v in line.v {
                    let p = vertexes[v.index()].pos.as_vec2();
                    if !points.contains(&p) {
                        points.push(p);
                    }
                    // Lines with this sector on both sides do not bound it
                    if front != back {
                        let v = vertexes[v.index()].equiv().unwrap_or(v);
                        match ends.iter_mut().find(|(id, _)| *id == v) {
                            Some((_, n)) => *n += 1,
                            None => ends.push((v, 1)),
                        }
                    }
                }
            }
            if let Some((v, _)) = ends.iter().find(|(_, n)| n % 2 == 1) {
                let pos = vertexes[v.index()].pos;
                diagnostics.register_unclosed_sector_near(sector, pos.x, pos.y);
            }
            leafs.push(BspLeaf::new(Some(sector), points));
        }

        debug!("Made {} sector leafs", leafs.len());
        for leaf in leafs {
            map.push_bsp_leaf(leaf);
        }
        true
    }
}
