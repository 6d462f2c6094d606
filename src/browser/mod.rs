//! Headless browser seam.
//!
//! The traits are synchronous because the CDP client underneath is; async
//! callers go through [`blocking`].

pub mod chrome;

#[cfg(test)]
pub mod fake;

use std::sync::Arc;

use anyhow::{Context, Result};

pub use chrome::ChromeDriver;

/// Something that can start a browser process
pub trait BrowserDriver: Send + Sync {
    fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A running browser. Dropping it without `close` still tears the process
/// down, but `close` reports failures.
pub trait BrowserSession: Send {
    /// Fresh browsing context with a single page
    fn new_page(&self) -> Result<Box<dyn BrowserPage>>;

    fn close(self: Box<Self>) -> Result<()>;
}

pub trait BrowserPage: Send {
    fn goto(&self, url: &str) -> Result<()>;

    /// Focus the first element matching `selector` and type `text` into it
    fn fill(&self, selector: &str, text: &str) -> Result<()>;

    fn press(&self, selector: &str, key: &str) -> Result<()>;

    /// Block until the navigation started by the last action has settled
    fn wait_for_idle(&self) -> Result<()>;
}

pub type SharedDriver = Arc<dyn BrowserDriver>;

/// Run a blocking browser call on tokio's blocking pool.
pub async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("browser task panicked")?
}

pub const GOOGLE_URL: &str = "https://www.google.com";
pub const SEARCH_BOX: &str = r#"textarea[name="q"], input[name="q"]"#;

/// Type `query` into Google's search box and submit it.
pub fn search_google(page: &dyn BrowserPage, query: &str) -> Result<()> {
    page.goto(GOOGLE_URL)
        .with_context(|| format!("failed to open {}", GOOGLE_URL))?;
    page.fill(SEARCH_BOX, query)
        .context("search box not found")?;
    page.press(SEARCH_BOX, "Enter")?;
    page.wait_for_idle()
        .context("search results did not finish loading")?;
    Ok(())
}
