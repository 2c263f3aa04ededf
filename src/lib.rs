//! Mockshot
//!
//! Renders a local HTML mockup in headless Chrome and exports images of one
//! element (or the whole viewport) at several sizes, pixel densities and
//! encodings.
//!
//! # Pipeline
//!
//! 1. [`ExportJob::resolve`] turns a [`JobRequest`] into an immutable job.
//! 2. [`BrowserSession::acquire`] finds and launches a browser.
//! 3. [`loader::load`] opens the document and waits for it to settle.
//! 4. [`capture::capture_all`] captures each variant in order.
//! 5. [`capture::write_all`] writes the images.
//!
//! [`export`] runs steps 2 to 5.
//!
//! # Example
//!
//! ```no_run
//! use mockshot::{ExportConfig, ExportJob, JobRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut request = JobRequest::new("mockups/poster.html");
//! request.variants = vec![
//!     "preview:1600x900@2".parse()?,
//!     "poster:2400x1350@3,quality=95".parse()?,
//! ];
//!
//! let job = ExportJob::resolve(request, &std::env::current_dir()?)?;
//! for image in mockshot::export(&job, &ExportConfig::default())? {
//!     println!("{}", image);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod browser;
pub mod capture;
pub mod cli;
pub mod job;
pub mod variant;

#[cfg(feature = "cdp")]
pub mod cdp;

#[cfg(feature = "cdp")]
pub mod loader;

pub use browser::Probe;
#[cfg(feature = "cdp")]
pub use browser::BrowserSession;
pub use capture::{CaptureSurface, ExportedImage};
pub use job::{CaptureRegion, ExportJob, JobRequest};
pub use variant::{Encoding, Variant, VariantDefaults, VariantSpec};

/// Runtime settings that are not part of the job itself
///
/// # Examples
///
/// ```
/// let cfg = mockshot::ExportConfig::default();
/// assert_eq!(cfg.settle_delay_ms, 800);
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Upper bound for navigation to reach network idle, in milliseconds
    pub navigation_timeout_ms: u64,
    /// Pause after load before the first capture, in milliseconds
    pub settle_delay_ms: u64,
    /// Ordered browser discovery probes
    pub browser_probes: Vec<Probe>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 120_000,
            settle_delay_ms: 800,
            browser_probes: browser::default_probes(),
        }
    }
}

impl ExportConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Run `job` end to end and return the written files in capture order.
///
/// The output directory is created before the browser is launched. The
/// browser is released on every path out of this function.
#[cfg(feature = "cdp")]
pub fn export(job: &ExportJob, config: &ExportConfig) -> Result<Vec<ExportedImage>> {
    job.prepare_output_directory()?;

    let session = BrowserSession::acquire(config)?;
    log::info!(
        "rendering {} with {}",
        job.source_document.display(),
        session.executable().display()
    );
    let captured = {
        let page = loader::load(&session, &job.source_document, config)?;
        capture::capture_all(&page, job)?
    };
    session.release();

    capture::write_all(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.navigation_timeout(), Duration::from_secs(120));
        assert_eq!(config.settle_delay(), Duration::from_millis(800));
        assert_eq!(config.browser_probes.first(), Some(&Probe::Env("CHROME".into())));
    }
}
