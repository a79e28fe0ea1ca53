//! `mapc` compiles a TOML map description with the map editor and reports
//! what it found.

mod cache;
mod cli;
mod config;
mod description;

use std::error::Error;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use mapedit::{GameMap, MapEditor, SectorId, SectorLeafBuilder, VertexId};
use mimalloc::MiMalloc;
use simplelog::TermLogger;

use crate::cache::MapCache;
use crate::cli::CLIOptions;
use crate::config::UserConfig;
use crate::description::MapDescription;

const BASE_DIR: &str = "mapedit";

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    let (mut user_config, created) = UserConfig::load()?;
    user_config.sync_cli(&mut options);

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    user_config.report(created);
    user_config.write()?;

    let path = Path::new(&options.map);
    let source = std::fs::read_to_string(path)?;
    let desc: MapDescription = toml::from_str(&source)?;
    let name = options
        .name
        .clone()
        .or_else(|| desc.name.clone())
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let mut editor = MapEditor::new();
    if let Some(size) = options.cell_size {
        editor.set_blockmap_cell_size(size);
    }
    for def in desc.game_obj_defs() {
        editor.register_game_obj_def(def);
    }

    let start = Instant::now();
    editor.begin(&name);
    desc.apply(&mut editor)?;
    info!("Loaded {:?} in {:#?}", path, start.elapsed());

    let mut hooks = MapCache::new(
        crc32fast::hash(source.as_bytes()),
        options.cache.unwrap_or(true),
    );
    editor.end(&mut SectorLeafBuilder, &mut hooks)?;
    if let Some(written) = hooks.written() {
        info!("Cached as {:?}", written);
    }

    let map = editor
        .take_last_built_map()
        .ok_or("Map editor finished without a map")?;
    let diag = editor.diagnostics();
    for effect in diag.window_effects() {
        warn!(
            "Line {} looks from sector {} into sector {}",
            effect.line, effect.back_sector, effect.front_sector
        );
    }
    if !diag.unclosed_sectors().is_empty() {
        warn!("{} sectors are not closed", diag.unclosed_sectors().len());
    }

    if options.dump_sectors {
        dump_sectors(&map);
    }
    if options.dump_rings {
        dump_rings(&map);
    }

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}

fn dump_sectors(map: &GameMap) {
    for (i, sector) in map.sectors().iter().enumerate() {
        let Some(id) = SectorId::new(i as u32 + 1) else {
            continue;
        };
        println!(
            "sector {}: light {:.2}, floor {}, ceiling {}, area {}, {} leafs{}",
            id,
            sector.light_level,
            sector.floor_height(),
            sector.ceiling_height(),
            sector.rough_area,
            sector.bsp_leafs.len(),
            if sector.is_unclosed() { ", unclosed" } else { "" }
        );
        for line in map.sector_lines(id) {
            if let Some(l) = map.linedef(*line) {
                println!(
                    "    line {}: {} -> {}, length {:.1}, angle {:.1}",
                    line,
                    l.v[0],
                    l.v[1],
                    l.length,
                    l.angle.to_degrees()
                );
            }
        }
    }
}

fn dump_rings(map: &GameMap) {
    for (i, vertex) in map.vertexes().iter().enumerate() {
        let Some(id) = VertexId::new(i as u32 + 1) else {
            continue;
        };
        let ring: Vec<String> = map
            .vertex_owners(id)
            .map(|(_, owner)| format!("{} ({:.1})", owner.line, owner.delta.to_degrees()))
            .collect();
        println!(
            "vertex {} at ({}, {}): {}",
            id,
            vertex.pos.x,
            vertex.pos.y,
            ring.join(", ")
        );
    }
}
