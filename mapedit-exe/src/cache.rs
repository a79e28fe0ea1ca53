//! Writes compiled maps to the user's cache dir so a later run can tell the
//! map has already been built from the same description.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use log::{debug, info};
use mapedit::{GameMap, MapElement, MapHooks, PlaneType, SectorId};
use serde::Serialize;

use crate::BASE_DIR;

const CACHE_MAGIC: [u8; 4] = *b"DCM1";

/// Handle to array position, 0 for none
fn raw<T>(id: Option<T>, get: impl Fn(T) -> u32) -> u32 {
    id.map(get).unwrap_or(0)
}

#[derive(Debug, Serialize)]
struct CachedLine {
    v: [u32; 2],
    sides: [u32; 2],
    flags: u32,
    angle: u16,
    length: f32,
    window_effect: u32,
}

#[derive(Debug, Serialize)]
struct CachedSector {
    light_level: f32,
    rgb: [f32; 3],
    flags: u32,
    floor: f32,
    ceiling: f32,
    lines: Vec<u32>,
    bbox: [f32; 4],
}

/// Flat snapshot of a `GameMap`. Every reference is a 1-based build index
#[derive(Debug, Serialize)]
pub struct CachedMap {
    magic: [u8; 4],
    source_crc: u32,
    name: String,
    vertexes: Vec<[f32; 2]>,
    lines: Vec<CachedLine>,
    /// Sector of each side
    sides: Vec<u32>,
    sectors: Vec<CachedSector>,
    leaf_count: u32,
}

impl CachedMap {
    pub fn from_map(map: &GameMap, source_crc: u32) -> Self {
        Self {
            magic: CACHE_MAGIC,
            source_crc,
            name: map.uri().to_owned(),
            vertexes: map.vertexes().iter().map(|v| v.pos.to_array()).collect(),
            lines: map
                .linedefs()
                .iter()
                .map(|l| CachedLine {
                    v: l.v.map(|v| v.get()),
                    sides: l.sides.map(|s| raw(s, |s| s.get())),
                    flags: l.flags,
                    angle: l.angle.bams(),
                    length: l.length,
                    window_effect: raw(l.window_effect, |s| s.get()),
                })
                .collect(),
            sides: map
                .sidedefs()
                .iter()
                .map(|s| raw(s.sector, |s| s.get()))
                .collect(),
            sectors: map
                .sectors()
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let id = SectorId::new(i as u32 + 1);
                    CachedSector {
                        light_level: s.light_level,
                        rgb: s.rgb.to_array(),
                        flags: s.flags,
                        floor: s.floor_height(),
                        ceiling: s.ceiling_height(),
                        lines: id
                            .map(|id| map.sector_lines(id).iter().map(|l| l.get()).collect())
                            .unwrap_or_default(),
                        bbox: [s.aa_box.top, s.aa_box.bottom, s.aa_box.left, s.aa_box.right],
                    }
                })
                .collect(),
            leaf_count: map.bsp_leafs().len() as u32,
        }
    }
}

/// The `mapc` map hooks. Reports each step and writes the cache file
pub struct MapCache {
    source_crc: u32,
    enabled: bool,
    written: Option<PathBuf>,
}

impl MapCache {
    /// `source_crc` identifies the description the map is built from
    pub fn new(source_crc: u32, enabled: bool) -> Self {
        Self {
            source_crc,
            enabled,
            written: None,
        }
    }

    /// Where the last map was written, if it was
    pub fn written(&self) -> Option<&PathBuf> {
        self.written.as_ref()
    }

    /// Map uris may look like paths, so separators are flattened to `_`
    pub fn cache_file_name(name: &str, source_crc: u32) -> String {
        let name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        format!("{name}_{source_crc:08x}.dcm")
    }

    /// Returns the cache file path for the given map, creating the dir
    pub fn get_cache_path(name: &str, source_crc: u32) -> Result<PathBuf, Box<dyn Error>> {
        let cache_dir = dirs::cache_dir()
            .ok_or("Could not determine cache directory")?
            .join(BASE_DIR);

        std::fs::create_dir_all(&cache_dir)?;
        Ok(cache_dir.join(Self::cache_file_name(name, source_crc)))
    }
}

impl MapHooks for MapCache {
    fn polygonize_map(&mut self, map: &mut GameMap) {
        debug!("{} leafs to polygonize", map.bsp_leafs().len());
    }

    fn determine_reverb_leafs(&mut self, map: &mut GameMap) {
        let open = map
            .sectors()
            .iter()
            .filter(|s| s.plane(PlaneType::Ceiling).is_none())
            .count();
        debug!("{open} sectors without a ceiling");
    }

    fn setup_for_map_data(&mut self, kind: MapElement, count: usize) {
        debug!("Map has {count} {kind:?}");
    }

    fn write_cached_map(&mut self, map: &GameMap) -> Result<(), Box<dyn Error>> {
        if !self.enabled {
            return Ok(());
        }
        let path = Self::get_cache_path(map.uri(), self.source_crc)?;
        let file = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(file, &CachedMap::from_map(map, self.source_crc))?;
        info!("Wrote map cache {path:?}");
        self.written = Some(path);
        Ok(())
    }
}
