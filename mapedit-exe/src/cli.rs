use argh::FromArgs;

/// Compile a map description into the runtime map form
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// path to the map description (TOML)
    #[argh(positional)]
    pub map: String,
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// name to build the map as, defaults to the name in the description or
    /// the file name
    #[argh(option)]
    pub name: Option<String>,
    /// blockmap cell size in map units
    #[argh(option)]
    pub cell_size: Option<f32>,
    /// write the compiled map to the cache dir?
    #[argh(option)]
    pub cache: Option<bool>,
    /// print every sector with its lines and planes
    #[argh(switch)]
    pub dump_sectors: bool,
    /// print the ring of lines at every vertex
    #[argh(switch)]
    pub dump_rings: bool,
}
