use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use super::{BrowserDriver, BrowserPage, BrowserSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Launch,
    NewPage,
    Goto(String),
    Fill(String, String),
    Press(String, String),
    WaitForIdle,
    Close,
}

/// Records every call instead of driving a browser. `failing_on` names the
/// operation that should error.
#[derive(Clone, Default)]
pub struct FakeDriver {
    log: Arc<Mutex<Vec<Action>>>,
    fail_on: Option<&'static str>,
}

impl FakeDriver {
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, action: Action) -> Result<()> {
        self.log.lock().unwrap().push(action);
        if self.fail_on == Some(op) {
            bail!("{} failed", op);
        }
        Ok(())
    }
}

impl BrowserDriver for FakeDriver {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        self.record("launch", Action::Launch)?;
        Ok(Box::new(self.clone()))
    }
}

impl BrowserSession for FakeDriver {
    fn new_page(&self) -> Result<Box<dyn BrowserPage>> {
        self.record("new_page", Action::NewPage)?;
        Ok(Box::new(self.clone()))
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.record("close", Action::Close)
    }
}

impl BrowserPage for FakeDriver {
    fn goto(&self, url: &str) -> Result<()> {
        self.record("goto", Action::Goto(url.to_string()))
    }

    fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.record("fill", Action::Fill(selector.to_string(), text.to_string()))
    }

    fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.record("press", Action::Press(selector.to_string(), key.to_string()))
    }

    fn wait_for_idle(&self) -> Result<()> {
        self.record("wait_for_idle", Action::WaitForIdle)
    }
}
