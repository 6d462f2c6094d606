use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, LaunchOptionsBuilder, Tab};
use tracing::debug;

use super::{BrowserDriver, BrowserPage, BrowserSession};
use crate::config::BrowserConfig;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives a local Chromium over the DevTools protocol
pub struct ChromeDriver {
    config: BrowserConfig,
}

impl ChromeDriver {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn launch_options(&self) -> Result<LaunchOptions<'static>> {
        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(self.config.headless)
            .sandbox(false)
            .window_size(Some((1280, 800)))
            .args(vec![
                OsStr::new("--disable-background-networking"),
                OsStr::new("--disable-default-apps"),
                OsStr::new("--disable-sync"),
                OsStr::new("--mute-audio"),
                OsStr::new("--no-first-run"),
            ]);

        if let Some(path) = &self.config.executable {
            builder.path(Some(path.clone()));
        }

        builder
            .build()
            .context("unable to construct headless Chromium launch options")
    }
}

impl BrowserDriver for ChromeDriver {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let browser = Browser::new(self.launch_options()?).context("failed to launch Chromium")?;
        debug!(headless = self.config.headless, "browser launched");
        Ok(Box::new(ChromeSession { browser }))
    }
}

struct ChromeSession {
    browser: Browser,
}

impl BrowserSession for ChromeSession {
    fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        let tab = self
            .browser
            .new_context()
            .context("failed to create browser context")?
            .new_tab()
            .context("failed to open a new page")?;
        tab.set_default_timeout(NAVIGATION_TIMEOUT);
        Ok(Box::new(ChromePage { tab }))
    }

    fn close(self: Box<Self>) -> Result<()> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map(|tabs| tabs.clone())
            .unwrap_or_default();
        for tab in tabs {
            // Tabs may already be gone if the page crashed.
            if let Err(e) = tab.close(false) {
                debug!(error = %e, "tab close failed");
            }
        }
        // Dropping the handle kills the Chromium process.
        drop(self.browser);
        debug!("browser closed");
        Ok(())
    }
}

struct ChromePage {
    tab: Arc<Tab>,
}

impl BrowserPage for ChromePage {
    fn goto(&self, url: &str) -> Result<()> {
        debug!(%url, "navigating");
        self.tab
            .navigate_to(url)?
            .wait_until_navigated()?;
        Ok(())
    }

    fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.tab
            .wait_for_element(selector)?
            .click()?
            .type_into(text)?;
        Ok(())
    }

    fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.tab.wait_for_element(selector)?.focus()?;
        self.tab.press_key(key)?;
        Ok(())
    }

    fn wait_for_idle(&self) -> Result<()> {
        self.tab.wait_until_navigated()?;
        Ok(())
    }
}
