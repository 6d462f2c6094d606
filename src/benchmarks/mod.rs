pub mod agents;
pub mod runner;
pub mod timing;
pub mod tokens;

/// Where a benchmark reports what it is doing while it runs
pub trait Progress {
    fn update(&self, message: &str);

    /// Non-fatal problem; the benchmark carries on
    fn warn(&self, message: &str);
}

/// Discards progress, for library callers and tests
pub struct Silent;

impl Progress for Silent {
    fn update(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

#[cfg(test)]
#[derive(Default)]
pub struct Recorder {
    updates: std::sync::Mutex<Vec<String>>,
    warnings: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl Recorder {
    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Progress for Recorder {
    fn update(&self, message: &str) {
        self.updates.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}
