//! Headless Chromium rendering
//!
//! A [`Renderer`] owns the browser process for a whole run. Each document
//! is loaded into its own [`RenderPage`], which closes its tab when dropped
//! so every exit path releases it.

pub mod script;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::{default_executable, FetcherOptions};
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::estimate::{groups_from_json, ContentGroup, SectionRef};
use crate::layout::PaperSize;

/// How to start the browser
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Chromium binary; `None` searches the usual locations
    pub chrome_path: Option<PathBuf>,
    /// Download Chromium when no installed binary is found
    pub allow_download: bool,
    /// Run Chromium with its sandbox enabled
    pub sandbox: bool,
    /// How long the browser may stay silent before the driver gives up
    pub idle_timeout: Duration,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            allow_download: true,
            sandbox: true,
            idle_timeout: Duration::from_secs(300),
        }
    }
}

/// Running headless browser
pub struct Renderer {
    browser: Browser,
}

impl Renderer {
    /// Launch Chromium, downloading it first when none is installed
    ///
    /// Failure here is fatal for a run: nothing can be rendered without it.
    pub fn launch(options: &RendererOptions) -> Result<Self> {
        let path = resolve_executable(options)?;
        if path.is_none() {
            info!("no installed Chromium found, downloading one");
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(options.sandbox)
            .path(path)
            .fetcher_options(FetcherOptions::default().with_allow_download(options.allow_download))
            .idle_browser_timeout(options.idle_timeout)
            .build()
            .map_err(|e| Error::BrowserLaunch(e.to_string()))?;

        let browser = Browser::new(launch_options).map_err(|e| Error::BrowserLaunch(e.to_string()))?;
        debug!("browser launched");

        Ok(Self { browser })
    }

    /// Open a new tab showing `html`
    pub fn open(&self, html: &str) -> Result<RenderPage> {
        let tab = self.browser.new_tab().map_err(Error::browser)?;
        let page = RenderPage { tab };

        let tree = page
            .tab
            .call_method(Page::GetFrameTree(None))
            .map_err(Error::browser)?;
        page.tab
            .call_method(Page::SetDocumentContent {
                frame_id: tree.frame_tree.frame.id,
                html: html.to_string(),
            })
            .map_err(Error::browser)?;
        page.evaluate(script::WAIT_FOR_FONTS, true)?;

        Ok(page)
    }
}

/// Pick the Chromium binary to launch
///
/// `Ok(None)` means nothing is installed and the driver should download a
/// build. An explicit path that does not exist is an error.
fn resolve_executable(options: &RendererOptions) -> Result<Option<PathBuf>> {
    if let Some(path) = &options.chrome_path {
        if !path.exists() {
            return Err(Error::BrowserLaunch(format!(
                "Chromium executable not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.clone()));
    }

    match default_executable() {
        Ok(path) => Ok(Some(path)),
        Err(_) if options.allow_download => Ok(None),
        Err(reason) => Err(Error::BrowserLaunch(reason)),
    }
}

/// One document loaded in its own tab
pub struct RenderPage {
    tab: Arc<Tab>,
}

impl RenderPage {
    fn evaluate(&self, expression: &str, await_promise: bool) -> Result<Option<Value>> {
        let remote = self
            .tab
            .evaluate(expression, await_promise)
            .map_err(Error::browser)?;
        Ok(remote.value)
    }

    /// Strip dividers and normalize section styling
    pub fn normalize(&self, group_selector: &str, divider_selector: &str) -> Result<()> {
        self.evaluate(&script::normalize(group_selector, divider_selector), false)?;
        Ok(())
    }

    /// Measure every section, grouped by container
    ///
    /// Must run after [`RenderPage::normalize`]; padding changes alter the
    /// measured heights.
    pub fn measure(&self, group_selector: &str) -> Result<Vec<ContentGroup>> {
        match self.evaluate(&script::measure(group_selector), false)? {
            Some(Value::String(json)) => groups_from_json(&json),
            other => Err(Error::Measurement(format!(
                "expected a JSON string of heights, got {:?}",
                other
            ))),
        }
    }

    /// Force page breaks before the given sections
    ///
    /// Returns how many sections were found and marked.
    pub fn apply_page_breaks(&self, group_selector: &str, breaks: &[SectionRef]) -> Result<usize> {
        let applied = self.evaluate(&script::apply_page_breaks(group_selector, breaks), false)?;
        Ok(applied.and_then(|value| value.as_u64()).unwrap_or(0) as usize)
    }

    /// Print the page with backgrounds in print media
    pub fn print(&self, paper: &PaperSize) -> Result<Vec<u8>> {
        self.tab
            .call_method(Emulation::SetEmulatedMedia {
                media: Some("print".to_string()),
                features: None,
            })
            .map_err(Error::browser)?;

        let options = PrintToPdfOptions {
            print_background: Some(true),
            paper_width: Some(paper.width.inches()),
            paper_height: Some(paper.height.inches()),
            ..Default::default()
        };

        self.tab.print_to_pdf(Some(options)).map_err(Error::browser)
    }
}

impl Drop for RenderPage {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            warn!("failed to close tab: {}", e);
        }
    }
}
