// Capturing Logger
//
// Keeps formatted log lines in memory so tests can assert on them.

use super::logger::{LogLevel, Logger};
use std::cell::RefCell;

pub struct CapturingLogger {
    level: LogLevel,
    lines: RefCell<Vec<String>>,
}

impl CapturingLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            lines: RefCell::new(Vec::new()),
        }
    }

    /// Captured lines, each formatted as `[LEVEL] message`.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }

    fn push(&self, level: LogLevel, msg: &str) {
        if self.is_enabled(level) {
            self.lines.borrow_mut().push(format!("[{}] {}", level, msg));
        }
    }
}

impl Logger for CapturingLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        self.push(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}
