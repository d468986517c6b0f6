//! Configuration file of the host.
use std::fs;
use std::io;

use ringchord_core::config::ChordConfig;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_NODES: usize = 8;
pub const DEFAULT_RUN_SECONDS: u64 = 10;
pub const DEFAULT_CONFIG_PATH: &str = "~/.ringchord/config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Parameters shared by every node of the ring.
    #[serde(default)]
    pub chord: ChordConfig,
    /// Count of simulated nodes, ignored when `seed_ids` is not empty.
    pub nodes: usize,
    /// Explicit node ids. The first one starts the ring and the others join through it.
    #[serde(default)]
    pub seed_ids: Vec<u64>,
    /// Random delay, as `[min, max]` milliseconds, applied to every simulated request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_delay_ms: Option<(u64, u64)>,
    /// How long the ring runs before its snapshot is printed.
    pub run_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chord: ChordConfig::default(),
            nodes: DEFAULT_NODES,
            seed_ids: vec![],
            transport_delay_ms: None,
            run_seconds: DEFAULT_RUN_SECONDS,
        }
    }
}

impl Config {
    /// Read `path` if given, the defaults otherwise.
    pub fn load<P>(path: Option<P>) -> Result<Config>
    where P: AsRef<std::path::Path> {
        match path {
            Some(p) => Self::read_fs(p),
            None => Ok(Self::default()),
        }
    }

    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }
}
