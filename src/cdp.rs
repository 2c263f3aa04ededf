//! Chrome DevTools Protocol page adapter
//!
//! Wraps the single `headless_chrome` tab of a job and implements
//! [`PageLoad`] and [`CaptureSurface`] over it.

use crate::capture::{CaptureSurface, ElementBox, ScreenshotRequest, ViewportMetrics};
use crate::loader::PageLoad;
use crate::{Error, Result};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::types::Method;
use headless_chrome::protocol::cdp::{Emulation, Page};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Resolves once web fonts are ready; trivially true where the Font Loading API is absent.
const FONTS_READY_SCRIPT: &str =
    "(document.fonts && document.fonts.ready) ? document.fonts.ready.then(() => true) : true";

/// The page a job renders into
pub struct CdpPage {
    tab: Arc<Tab>,
}

impl CdpPage {
    pub(crate) fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// Evaluate `script` in the page and return its JSON value, if any.
    pub fn evaluate(&self, script: &str, await_promise: bool) -> Result<Option<Value>> {
        let remote = self
            .tab
            .evaluate(script, await_promise)
            .map_err(|e| Error::ScriptError(format!("Evaluation failed: {}", e)))?;
        Ok(remote.value)
    }

    /// Send a protocol command built from its JSON parameters.
    ///
    /// Optional parameters left out of `params` deserialize to `None`.
    fn call<M>(&self, params: Value) -> Result<M::ReturnObject>
    where
        M: Method + Serialize + DeserializeOwned + std::fmt::Debug,
    {
        let method: M = serde_json::from_value(params)
            .map_err(|e| Error::CdpError(format!("Invalid protocol parameters: {}", e)))?;
        Ok(self.tab.call_method(method)?)
    }
}

impl PageLoad for CdpPage {
    /// Navigate and block until Chrome reports the network almost idle
    /// (at most two requests in flight for 500ms). Bounded by the tab's default timeout.
    fn navigate(&self, url: &str) -> Result<()> {
        debug!("navigating to {}", url);
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;
        Ok(())
    }

    fn wait_for_fonts(&self) -> Result<()> {
        self.tab
            .evaluate(FONTS_READY_SCRIPT, true)
            .map_err(|e| Error::ScriptError(format!("Font readiness wait failed: {}", e)))?;
        Ok(())
    }
}

impl CaptureSurface for CdpPage {
    fn set_viewport(&self, metrics: &ViewportMetrics) -> Result<()> {
        debug!(
            "viewport {}x{} @{}",
            metrics.width, metrics.height, metrics.device_scale_factor
        );
        self.call::<Emulation::SetDeviceMetricsOverride>(json!({
            "width": metrics.width,
            "height": metrics.height,
            "deviceScaleFactor": metrics.device_scale_factor,
            "mobile": false,
        }))?;
        Ok(())
    }

    fn element_box(&self, selector: &str) -> Result<Option<ElementBox>> {
        let selector_literal =
            serde_json::to_string(selector).map_err(|e| Error::ScriptError(e.to_string()))?;
        let script = format!(
            r#"(function() {{
                const el = document.querySelector({selector_literal});
                if (!el) return null;
                const r = el.getBoundingClientRect();
                return JSON.stringify({{ x: r.x, y: r.y, width: r.width, height: r.height }});
            }})()"#
        );

        match self.evaluate(&script, false)? {
            Some(Value::String(s)) => serde_json::from_str(&s)
                .map(Some)
                .map_err(|e| Error::ScriptError(format!("Unexpected bounding box {}: {}", s, e))),
            _ => Ok(None),
        }
    }

    fn screenshot(&self, request: &ScreenshotRequest) -> Result<Vec<u8>> {
        let mut params = json!({
            "format": request.encoding.as_str(),
            "fromSurface": true,
            "captureBeyondViewport": request.capture_beyond_viewport,
        });
        if let Some(quality) = request.quality {
            params["quality"] = json!(quality);
        }
        if let Some(clip) = &request.clip {
            params["clip"] = json!({
                "x": clip.x,
                "y": clip.y,
                "width": clip.width,
                "height": clip.height,
                "scale": 1.0,
            });
        }

        let shot = self
            .call::<Page::CaptureScreenshot>(params)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))?;
        base64::engine::general_purpose::STANDARD
            .decode(shot.data)
            .map_err(|e| Error::RenderError(format!("Screenshot payload was not base64: {}", e)))
    }
}
