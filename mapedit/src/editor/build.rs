//! Turning a finished `EditMap` into a `GameMap`.

use std::time::Instant;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::Vec2;
use log::{debug, error, info};

use super::edit_map::EditMap;
use super::harden;
use super::owners::harden_owner_rings;
use crate::collab::{BspBuilder, MapElement, MapHooks};
use crate::diagnostics::Diagnostics;
use crate::error::BuildError;
use crate::flags::SectorFlags;
use crate::handle::LineId;
use crate::map::GameMap;
use crate::map::map_defs::{BBox, to_vec2};

impl EditMap {
    /// Compile the map. The editable map is consumed whether or not this
    /// succeeds.
    pub(crate) fn build(
        mut self,
        bsp: &mut dyn BspBuilder,
        hooks: &mut dyn MapHooks,
        cell_size: f32,
        diagnostics: &mut Diagnostics,
    ) -> Result<GameMap, BuildError> {
        #[cfg(feature = "hprof")]
        profile!("build_map");

        let start = Instant::now();
        let mut map = GameMap::new(&self.uri, std::mem::take(&mut self.gameobj));

        // Clean up the loaded data
        self.detect_duplicate_vertexes();
        self.prune_redundant_map_data();

        let mut owner_nodes = self.register_owner_rings();
        self.detect_window_effects(&owner_nodes, diagnostics);

        // Harden most of the map now so the BSP builder can use it
        harden::harden_sectors(&mut map, &self.sectors);
        harden::harden_sidedefs(&mut map, &self.sides);
        harden::harden_linedefs(&mut map, &self.lines, &self.vertexes);
        harden::harden_polyobjs(&mut map, &self.polyobjs);
        harden_owner_rings(&mut map, &mut self.vertexes, &mut owner_nodes);
        drop(owner_nodes);

        // Sectors stay, their planes are hardened after the BSP
        let EditMap {
            mut vertexes,
            sectors,
            lines,
            sides,
            polyobjs,
            ..
        } = self;
        drop((lines, sides, polyobjs));

        let bounds = BBox::from_points(vertexes.iter().map(|v| to_vec2(v.pos)));
        let (min, max) = match bounds {
            Some(b) => (b.min(), b.max()),
            None => (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
        };
        map.init_blockmaps(min, max, cell_size);
        for i in 0..map.linedefs.len() {
            let [v1, v2] = map.linedefs[i].v;
            let start = to_vec2(vertexes[v1.index()].pos);
            let end = to_vec2(vertexes[v2.index()].pos);
            map.link_linedef(LineId::from_index(i), start, end);
        }

        let built_ok = bsp.build(&mut map, &mut vertexes, diagnostics);

        harden::harden_vertexes(&mut map, &vertexes);
        drop(vertexes);
        harden::finish_polyobj_hedges(&mut map);

        hooks.polygonize_map(&mut map);
        map.build_sector_leaf_lists();

        diagnostics.print();
        for usec in diagnostics.unclosed_sectors() {
            if let Some(sector) = map.sectors.get_mut(usec.sector.index()) {
                sector.flags |= SectorFlags::Unclosed as u32;
            }
        }

        harden::harden_planes(&mut map, &sectors);
        drop(sectors);

        if !built_ok {
            return Err(BuildError::BspFailed);
        }

        map.build_sector_line_lists();
        map.finish_linedefs();
        map.finish_sectors();
        map.update_bounds();
        hooks.determine_reverb_leafs(&mut map);
        map.prepare_bsp_leafs();

        hooks.setup_for_map_data(MapElement::Vertex, map.vertexes.len());
        hooks.setup_for_map_data(MapElement::LineDef, map.linedefs.len());
        hooks.setup_for_map_data(MapElement::SideDef, map.sidedefs.len());
        hooks.setup_for_map_data(MapElement::Sector, map.sectors.len());

        if !map.uri.is_empty() {
            match hooks.write_cached_map(&map) {
                Ok(()) => debug!("Cached map {}", map.uri),
                Err(e) => error!("Could not cache map {}: {}", map.uri, e),
            }
        }

        info!(
            "Built map \"{}\": {} vertexes, {} lines, {} sides, {} sectors, {} leafs, took: {:#?}",
            map.uri,
            map.vertexes.len(),
            map.linedefs.len(),
            map.sidedefs.len(),
            map.sectors.len(),
            map.bsp_leafs.len(),
            start.elapsed()
        );
        Ok(map)
    }
}
