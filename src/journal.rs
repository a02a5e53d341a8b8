//! Simulation journal
//!
//! Strategies report status lines and throw/landing events to an injected
//! [`Journal`]. A disabled journal drops everything, so the simulation runs
//! the same whether or not anyone is listening.

use std::cell::RefCell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single journal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalEntry {
    Message(String),
    Warning(String),
    Error(String),
    /// Snowball left the thrower
    Throw { position: DVec2, velocity: DVec2 },
    /// Snowball flight ended, on the target or on the ground
    Landing { position: DVec2, hit_target: bool },
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalEntry::Message(text) => write!(f, "{text}"),
            JournalEntry::Warning(text) => write!(f, "WARNING: {text}"),
            JournalEntry::Error(text) => write!(f, "ERROR: {text}"),
            JournalEntry::Throw { position, velocity } => write!(
                f,
                "Snowball thrown from ({}, {}) with velocity ({}, {})",
                position.x, position.y, velocity.x, velocity.y
            ),
            JournalEntry::Landing {
                position,
                hit_target: true,
            } => write!(f, "Snowball hit target at ({}, {})", position.x, position.y),
            JournalEntry::Landing {
                position,
                hit_target: false,
            } => write!(f, "Snowball hit ground at ({}, {})", position.x, position.y),
        }
    }
}

/// Destination for journal entries
pub trait JournalSink: fmt::Debug {
    fn record(&mut self, entry: &JournalEntry);
}

/// Optional journal handle owned by each strategy
#[derive(Debug, Default)]
pub struct Journal {
    sink: Option<Box<dyn JournalSink>>,
}

impl Journal {
    pub fn new(sink: impl JournalSink + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// A journal that drops every entry
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn record(&mut self, entry: JournalEntry) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&entry);
        }
    }

    pub fn message(&mut self, text: impl Into<String>) {
        if self.is_enabled() {
            self.record(JournalEntry::Message(text.into()));
        }
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        if self.is_enabled() {
            self.record(JournalEntry::Warning(text.into()));
        }
    }

    pub fn error(&mut self, text: impl Into<String>) {
        if self.is_enabled() {
            self.record(JournalEntry::Error(text.into()));
        }
    }

    pub fn throw(&mut self, position: DVec2, velocity: DVec2) {
        self.record(JournalEntry::Throw { position, velocity });
    }

    pub fn landing(&mut self, position: DVec2, hit_target: bool) {
        self.record(JournalEntry::Landing {
            position,
            hit_target,
        });
    }
}

/// Forwards entries to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl JournalSink for LogSink {
    fn record(&mut self, entry: &JournalEntry) {
        match entry {
            JournalEntry::Warning(text) => log::warn!("{text}"),
            JournalEntry::Error(text) => log::error!("{text}"),
            other => log::info!("{other}"),
        }
    }
}

/// Keeps entries in memory; clones share the same record
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Rc<RefCell<Vec<JournalEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether any free-text entry contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.entries.borrow().iter().any(|e| match e {
            JournalEntry::Message(t) | JournalEntry::Warning(t) | JournalEntry::Error(t) => {
                t.contains(needle)
            }
            _ => false,
        })
    }
}

impl JournalSink for MemorySink {
    fn record(&mut self, entry: &JournalEntry) {
        self.entries.borrow_mut().push(entry.clone());
    }
}

/// Append-only plain text log, one `<unix-seconds> - <entry>` line per record
#[derive(Debug)]
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl JournalSink for FileSink {
    fn record(&mut self, entry: &JournalEntry) {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        if let Err(e) = writeln!(self.file, "{stamp} - {entry}") {
            log::warn!("Failed to append journal entry: {e}");
        }
    }
}
