//! Browser executable discovery
//!
//! Discovery walks an ordered list of [`Probe`]s and picks the first
//! candidate path that exists. Whether the binary actually runs is only
//! known at launch time.

use crate::{Error, Result};
use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variables consulted before any well-known location.
pub const ENV_OVERRIDES: &[&str] = &["CHROME", "GOOGLE_CHROME_BIN"];

/// Well-known install locations, in priority order.
pub const WELL_KNOWN_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Google Chrome Beta.app/Contents/MacOS/Google Chrome Beta",
    "/Applications/Google Chrome Dev.app/Contents/MacOS/Google Chrome Dev",
    "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

/// One candidate source for the browser executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Path named by an environment variable
    Env(String),
    /// Fixed filesystem path
    Path(PathBuf),
}

impl Probe {
    /// Candidate path this probe points at, if any.
    pub fn candidate<E>(&self, env: E) -> Option<PathBuf>
    where
        E: Fn(&str) -> Option<OsString>,
    {
        match self {
            Probe::Env(var) => env(var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            Probe::Path(path) => Some(path.clone()),
        }
    }
}

/// Environment overrides followed by the well-known paths.
pub fn default_probes() -> Vec<Probe> {
    ENV_OVERRIDES
        .iter()
        .map(|var| Probe::Env(var.to_string()))
        .chain(WELL_KNOWN_PATHS.iter().map(|p| Probe::Path(PathBuf::from(p))))
        .collect()
}

/// Find the browser using the process environment and the real filesystem.
pub fn locate(probes: &[Probe]) -> Result<PathBuf> {
    locate_with(probes, |var| std::env::var_os(var), Path::exists)
}

/// Find the browser with injectable environment and existence checks.
pub fn locate_with<E, X>(probes: &[Probe], env: E, exists: X) -> Result<PathBuf>
where
    E: Fn(&str) -> Option<OsString>,
    X: Fn(&Path) -> bool,
{
    for probe in probes {
        if let Some(path) = probe.candidate(&env) {
            if exists(&path) {
                debug!("browser executable: {} (from {:?})", path.display(), probe);
                return Ok(path);
            }
            debug!("skipping missing browser candidate {}", path.display());
        }
    }
    Err(Error::BrowserNotFound)
}
