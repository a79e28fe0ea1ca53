//! User configuration options.

use std::error::Error;
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use dirs::config_dir;
use log::{LevelFilter, info, warn};
use mapedit::MAPBLOCKUNITS;
use serde::{Deserialize, Serialize};

use crate::BASE_DIR;
use crate::cli::CLIOptions;

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Result<PathBuf, Box<dyn Error>> {
    let mut dir = config_dir().ok_or_else(|| format!("{LOG_TAG}: Couldn't open user config dir"))?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir_all(&dir).map_err(|e| format!("{LOG_TAG}: Couldn't create {dir:?}: {e}"))?;
    }
    dir.push("user.toml");
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    pub blockmap_cell_size: f32,
    pub write_cache: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info.to_string(),
            blockmap_cell_size: MAPBLOCKUNITS,
            write_cache: true,
        }
    }
}

impl UserConfig {
    /// Read the config, creating a default one if there is none or it can't
    /// be parsed. This runs before logging is set up so it stays quiet; the
    /// `bool` is `true` if the file was (re)created.
    pub fn load() -> Result<(Self, bool), Box<dyn Error>> {
        let path = get_cfg_file()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| format!("Couldn't open {path:?}, {e}"))?;
        let mut buf = String::new();
        if file.read_to_string(&mut buf)? > 0 {
            if let Ok(data) = toml::from_str(&buf) {
                return Ok((data, false));
            }
        }
        let config = UserConfig::default();
        let data = toml::to_string(&config)?;
        file.set_len(0)?;
        file.write_all(data.as_bytes())?;
        Ok((config, true))
    }

    pub fn write(&self) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(get_cfg_file()?)?;
        let data = toml::to_string_pretty(self)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        if let Some(level) = cli.verbose {
            if level != self.log_level() {
                self.log_level = level.to_string();
            }
        } else {
            cli.verbose = Some(self.log_level());
        }

        if let Some(size) = cli.cell_size {
            if size > 0.0 && size != self.blockmap_cell_size {
                self.blockmap_cell_size = size;
            }
        } else {
            cli.cell_size = Some(self.blockmap_cell_size);
        }

        if let Some(f) = cli.cache {
            if f != self.write_cache {
                self.write_cache = f;
            }
        } else {
            cli.cache = Some(self.write_cache);
        }
    }

    /// Log what was loaded. Called once the logger is running
    pub fn report(&self, created: bool) {
        if created {
            warn!(target: LOG_TAG, "No usable config file, created a default one");
        } else {
            info!(target: LOG_TAG, "Loaded user config file");
        }
        info!(
            target: LOG_TAG,
            "Log level {}, blockmap cell size {}, cache {}",
            self.log_level,
            self.blockmap_cell_size,
            if self.write_cache { "on" } else { "off" }
        );
    }
}
