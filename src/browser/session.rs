//! Headless Chrome session guard

use crate::browser::discovery;
use crate::cdp::CdpPage;
use crate::{Error, ExportConfig, Result};
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extra Chrome switches. Together with `sandbox(false)` (`--no-sandbox`) these
/// trade process isolation for running in containers and CI without setup.
pub const LAUNCH_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-breakpad",
    "--disable-crash-reporter",
    "--disable-crashpad",
    "--single-process",
    "--no-zygote",
];

/// Slack added to the navigation timeout for the browser's idle-connection timeout.
const IDLE_SLACK: Duration = Duration::from_secs(60);

/// An exclusively owned headless browser process.
///
/// The process is shut down exactly once: by [`BrowserSession::release`] or,
/// on any early return or panic, by `Drop`.
pub struct BrowserSession {
    browser: Option<Browser>,
    executable: PathBuf,
}

impl BrowserSession {
    /// Discover a browser through `config.browser_probes` and launch it.
    pub fn acquire(config: &ExportConfig) -> Result<Self> {
        let executable = discovery::locate(&config.browser_probes)?;
        Self::launch(executable, config)
    }

    /// Launch the browser at `executable`.
    pub fn launch(executable: PathBuf, config: &ExportConfig) -> Result<Self> {
        let idle_timeout = config.navigation_timeout() + IDLE_SLACK;
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(Some(executable.clone()))
            .idle_browser_timeout(idle_timeout)
            .args(LAUNCH_ARGS.iter().map(OsStr::new).collect())
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build launch options: {}", e))
            })?;

        debug!("launching {}", executable.display());
        let browser = Browser::new(launch_options).map_err(|e| {
            Error::InitializationError(format!(
                "Failed to launch browser {}: {}",
                executable.display(),
                e
            ))
        })?;

        Ok(Self {
            browser: Some(browser),
            executable,
        })
    }

    /// Path of the running executable
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Open the single page used for the job.
    pub fn new_page(&self, config: &ExportConfig) -> Result<CdpPage> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| Error::InitializationError("Browser session already released".into()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(config.navigation_timeout());
        Ok(CdpPage::new(tab))
    }

    /// Shut the browser down now.
    pub fn release(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(browser) = self.browser.take() {
            debug!("closing browser {}", self.executable().display());
            // Dropping the handle kills the child process.
            drop(browser);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
