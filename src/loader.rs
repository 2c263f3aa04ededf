//! Loads the source document into a fresh page

use crate::browser::BrowserSession;
use crate::cdp::CdpPage;
use crate::{Error, ExportConfig, Result};
use log::{debug, warn};
use std::path::Path;
use std::time::Instant;
use url::Url;

/// `file://` URL for an absolute document path.
pub fn file_url(document: &Path) -> Result<Url> {
    Url::from_file_path(document)
        .map_err(|_| Error::LoadError(format!("Not an absolute path: {}", document.display())))
}

/// A page a document can be loaded into.
///
/// The CDP page implements this; tests substitute a scripted page.
pub trait PageLoad {
    /// Navigate to `url` and block until the network is idle.
    fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until the document's web fonts are ready.
    fn wait_for_fonts(&self) -> Result<()>;
}

/// Open a page on `session`, load `document` and let it settle.
pub fn load(session: &BrowserSession, document: &Path, config: &ExportConfig) -> Result<CdpPage> {
    let url = file_url(document)?;
    let page = session.new_page(config)?;
    load_into(&page, &url, config)?;
    Ok(page)
}

/// Load `url` into `page` and let it settle.
///
/// A navigation failure reported once the configured timeout has elapsed
/// becomes [`Error::Timeout`]; earlier failures pass through unchanged. The
/// font wait is best effort. The settle delay absorbs layout changes made by
/// scripts after load.
pub fn load_into<P>(page: &P, url: &Url, config: &ExportConfig) -> Result<()>
where
    P: PageLoad + ?Sized,
{
    let started = Instant::now();
    if let Err(err) = page.navigate(url.as_str()) {
        if started.elapsed() >= config.navigation_timeout() {
            return Err(Error::Timeout(config.navigation_timeout_ms));
        }
        return Err(err);
    }
    debug!("loaded {} in {:?}", url, started.elapsed());

    if let Err(err) = page.wait_for_fonts() {
        warn!("ignoring font readiness failure: {}", err);
    }

    std::thread::sleep(config.settle_delay());
    Ok(())
}
