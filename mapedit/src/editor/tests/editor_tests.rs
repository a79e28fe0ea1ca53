use super::{FailingBsp, LeafPerSector, RecordingHooks, closed_loop, sector_with_planes};
use crate::collab::{MapElement, NoHooks};
use crate::editor::MapEditor;
use crate::error::{BuildError, EditError};
use crate::gameobj::{GameObjDef, PropValue, ValueType};
use crate::handle::{SectorId, VertexId};
use crate::map::map_defs::Surface;

const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (64.0, 0.0), (64.0, 64.0), (0.0, 64.0)];

#[test]
fn calls_while_idle_are_rejected() {
    let mut editor = MapEditor::new();
    assert!(!editor.is_editing());
    assert_eq!(editor.vertex_create(0.0, 0.0), Err(EditError::NotEditing));
    assert_eq!(editor.sector_create(1.0, 1.0, 1.0, 1.0), Err(EditError::NotEditing));
    assert_eq!(
        editor.sidedef_create(None, 0, Surface::default(), Surface::default(), Surface::default()),
        Err(EditError::NotEditing)
    );
    assert_eq!(
        editor.end(&mut LeafPerSector::default(), &mut NoHooks),
        Err(BuildError::NotEditing)
    );
    assert!(editor.last_built_map().is_none());
}

#[test]
fn begin_is_reentrant() {
    let mut editor = MapEditor::new();
    assert!(editor.begin("MAP01"));
    let v = editor.vertex_create(1.0, 2.0).unwrap();
    assert!(editor.begin("MAP02"));
    assert_eq!(editor.edit_map().unwrap().uri(), "MAP01");
    assert_eq!(editor.edit_map().unwrap().vertexes().len(), 1);
    assert_eq!(editor.vertex_create(3.0, 4.0).unwrap().get(), v.get() + 1);
}

#[test]
fn indices_run_from_one() {
    let mut editor = MapEditor::new();
    editor.begin("");
    let ids: Vec<u32> = (0..6)
        .map(|i| editor.vertex_create(i as f64, 0.0).unwrap().get())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn rejected_calls_change_nothing() {
    let mut editor = MapEditor::new();
    editor.begin("");
    let missing = SectorId::new(3).unwrap();
    assert_eq!(
        editor.sidedef_create(Some(missing), 0, Surface::default(), Surface::default(), Surface::default()),
        Err(EditError::SectorOutOfRange(missing))
    );
    let v = editor.vertex_create(0.0, 0.0).unwrap();
    assert_eq!(
        editor.linedef_create(v, VertexId::new(2).unwrap(), None, None, 0),
        Err(EditError::VertexOutOfRange(VertexId::new(2).unwrap()))
    );
    let map = editor.edit_map().unwrap();
    assert!(map.sides().is_empty());
    assert!(map.lines().is_empty());
}

#[test]
fn hooks_run_in_order() {
    let mut editor = MapEditor::new();
    editor.begin("MAP01");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);

    let mut hooks = RecordingHooks::default();
    editor.end(&mut LeafPerSector::default(), &mut hooks).unwrap();

    assert_eq!(
        hooks.calls,
        vec!["polygonize", "reverb", "setup", "setup", "setup", "setup", "cache MAP01"]
    );
    assert_eq!(
        hooks.setup,
        vec![
            (MapElement::Vertex, 4),
            (MapElement::LineDef, 4),
            (MapElement::SideDef, 4),
            (MapElement::Sector, 1),
        ]
    );
}

#[test]
fn unnamed_maps_are_not_cached() {
    let mut editor = MapEditor::new();
    editor.begin("");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);

    let mut hooks = RecordingHooks::default();
    editor.end(&mut LeafPerSector::default(), &mut hooks).unwrap();
    assert!(!hooks.calls.iter().any(|c| c.starts_with("cache")));
}

#[test]
fn cache_failure_is_not_fatal() {
    let mut editor = MapEditor::new();
    editor.begin("MAP07");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);

    let mut hooks = RecordingHooks {
        fail_cache: true,
        ..Default::default()
    };
    assert!(editor.end(&mut LeafPerSector::default(), &mut hooks).is_ok());
    assert_eq!(editor.last_built_map().unwrap().uri(), "MAP07");
}

#[test]
fn bsp_failure_drops_the_map() {
    let mut editor = MapEditor::new();
    editor.begin("MAP01");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);

    let mut hooks = RecordingHooks::default();
    assert_eq!(editor.end(&mut FailingBsp, &mut hooks), Err(BuildError::BspFailed));
    assert!(!editor.is_editing());
    assert!(editor.last_built_map().is_none());
    // Polygonizing still happens, nothing after the failure does
    assert_eq!(hooks.calls, vec!["polygonize"]);

    // Ready for the next map
    assert!(editor.begin("MAP02"));
    assert_eq!(editor.edit_map().unwrap().vertexes().len(), 0);
}

#[test]
fn unclosed_sectors_are_flagged() {
    let mut editor = MapEditor::new();
    editor.begin("");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);

    let mut bsp = LeafPerSector {
        unclosed: vec![sector, sector],
        ..Default::default()
    };
    editor.end(&mut bsp, &mut NoHooks).unwrap();

    assert_eq!(editor.diagnostics().unclosed_sectors().len(), 1);
    let map = editor.last_built_map().unwrap();
    assert!(map.sector(sector).unwrap().is_unclosed());
}

#[test]
fn game_object_values_reach_the_map() {
    let mut editor = MapEditor::new();
    editor.register_game_obj_def(
        GameObjDef::new("Thing")
            .with_prop("X", ValueType::Short)
            .with_prop("Type", ValueType::Int),
    );
    editor.begin("");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    closed_loop(&mut editor, sector, &SQUARE);
    editor
        .game_obj_property("Thing", 0, "type", PropValue::Int(1))
        .unwrap();
    editor
        .game_obj_property("Thing", 0, "X", PropValue::Short(32))
        .unwrap();
    assert!(matches!(
        editor.game_obj_property("Thing", 0, "Z", PropValue::Short(0)),
        Err(EditError::UnknownProperty { .. })
    ));
    editor.end(&mut LeafPerSector::default(), &mut NoHooks).unwrap();

    let map = editor.take_last_built_map().unwrap();
    assert_eq!(map.gameobj().value("Thing", 0, "Type"), Some(PropValue::Int(1)));
    assert_eq!(map.gameobj().element_count("thing"), 1);
    assert!(editor.last_built_map().is_none());
}

#[test]
fn blockmap_cell_size() {
    let mut editor = MapEditor::new();
    editor.set_blockmap_cell_size(32.0);
    editor.begin("");
    let sector = sector_with_planes(&mut editor, 0.0, 128.0);
    let (_, lines) = closed_loop(&mut editor, sector, &SQUARE);
    editor.end(&mut LeafPerSector::default(), &mut NoHooks).unwrap();

    let bm = editor.last_built_map().unwrap().line_blockmap();
    assert_eq!((bm.columns, bm.rows), (3, 3));
    // The bottom wall runs along row 0 only
    assert!(bm.cell(1, 0).contains(&lines[0]));
    assert!(!bm.cell(1, 1).contains(&lines[0]));
}
