//! Browser discovery and session lifecycle

pub mod discovery;

#[cfg(feature = "cdp")]
pub mod session;

pub use discovery::{default_probes, locate, Probe};

#[cfg(feature = "cdp")]
pub use session::BrowserSession;
