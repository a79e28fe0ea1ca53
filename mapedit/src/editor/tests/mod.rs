mod editor_tests;

use std::error::Error;

use glam::{DVec2, Vec2, Vec3, Vec4};

use crate::collab::{BspBuilder, MapElement, MapHooks, SectorLeafBuilder};
use crate::diagnostics::Diagnostics;
use crate::editor::{EditVertex, MapEditor};
use crate::handle::{LineId, SectorId, SideId, VertexId};
use crate::map::GameMap;
use crate::map::map_defs::Surface;

/// One leaf per sector, plus knobs for what a real partitioner might do
#[derive(Default)]
pub(super) struct LeafPerSector {
    /// Extra vertexes to append, as a real partitioner does for splits
    pub split_points: Vec<DVec2>,
    pub unclosed: Vec<SectorId>,
}

impl BspBuilder for LeafPerSector {
    fn build(
        &mut self,
        map: &mut GameMap,
        vertexes: &mut Vec<EditVertex>,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        if !SectorLeafBuilder.build(map, vertexes, diagnostics) {
            return false;
        }
        for p in &self.split_points {
            vertexes.push(EditVertex::new(*p));
        }
        for &sector in &self.unclosed {
            diagnostics.register_unclosed_sector_near(sector, 0.0, 0.0);
        }
        true
    }
}

pub(super) struct FailingBsp;

impl BspBuilder for FailingBsp {
    fn build(&mut self, _: &mut GameMap, _: &mut Vec<EditVertex>, _: &mut Diagnostics) -> bool {
        false
    }
}

/// Records which hooks ran, in order
#[derive(Default)]
pub(super) struct RecordingHooks {
    pub calls: Vec<String>,
    pub setup: Vec<(MapElement, usize)>,
    pub fail_cache: bool,
}

impl MapHooks for RecordingHooks {
    fn polygonize_map(&mut self, _map: &mut GameMap) {
        self.calls.push("polygonize".to_owned());
    }

    fn determine_reverb_leafs(&mut self, _map: &mut GameMap) {
        self.calls.push("reverb".to_owned());
    }

    fn setup_for_map_data(&mut self, kind: MapElement, count: usize) {
        self.calls.push("setup".to_owned());
        self.setup.push((kind, count));
    }

    fn write_cached_map(&mut self, map: &GameMap) -> Result<(), Box<dyn Error>> {
        self.calls.push(format!("cache {}", map.uri()));
        if self.fail_cache {
            return Err("disk full".into());
        }
        Ok(())
    }
}

pub(super) fn one_sided(editor: &mut MapEditor, sector: SectorId) -> SideId {
    editor
        .sidedef_create(
            Some(sector),
            0,
            Surface::default(),
            Surface::default(),
            Surface::default(),
        )
        .unwrap()
}

pub(super) fn sector_with_planes(editor: &mut MapEditor, floor: f32, ceiling: f32) -> SectorId {
    let sector = editor.sector_create(0.75, 1.0, 1.0, 1.0).unwrap();
    editor
        .plane_create(sector, floor, None, Vec2::ZERO, Vec4::ONE, Vec3::Z)
        .unwrap();
    editor
        .plane_create(sector, ceiling, None, Vec2::ZERO, Vec4::ONE, Vec3::NEG_Z)
        .unwrap();
    sector
}

/// Join the points into a closed loop of one-sided lines facing `sector`
pub(super) fn closed_loop(
    editor: &mut MapEditor,
    sector: SectorId,
    points: &[(f64, f64)],
) -> (Vec<VertexId>, Vec<LineId>) {
    let vertexes = editor.vertex_create_many(points).unwrap();
    let mut lines = Vec::new();
    for i in 0..vertexes.len() {
        let side = one_sided(editor, sector);
        let line = editor
            .linedef_create(vertexes[i], vertexes[(i + 1) % vertexes.len()], Some(side), None, 0)
            .unwrap();
        lines.push(line);
    }
    (vertexes, lines)
}
