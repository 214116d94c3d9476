//! Session event log: a trait with no-op defaults so the menu can log
//! unconditionally, plus a timestamped `TextLogger` selected at startup
//! from `--log-file`.

use anyhow::Result;
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub trait Logger: Send + Sync {
    fn connected(&self, _host: &str, _port: u16) {}
    fn listing(&self, _total: usize, _retained: usize) {}
    fn fetched(&self, _name: &str, _bytes: u64) {}
    fn skipped(&self, _name: &str) {}
    fn error(&self, _context: &str, _msg: &str) {}
    fn quit(&self) {}
}

pub struct NoopLogger;
impl Logger for NoopLogger {}

pub struct TextLogger {
    file: Mutex<File>,
}

impl TextLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(f),
        })
    }

    fn line(&self, s: &str) {
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(f, "[{}] {}", Utc::now().to_rfc3339(), s);
        }
    }
}

impl Logger for TextLogger {
    fn connected(&self, host: &str, port: u16) {
        self.line(&format!("CONNECT host={host} port={port}"));
    }
    fn listing(&self, total: usize, retained: usize) {
        self.line(&format!("LIST total={total} retained={retained}"));
    }
    fn fetched(&self, name: &str, bytes: u64) {
        self.line(&format!("FETCH name={name} bytes={bytes}"));
    }
    fn skipped(&self, name: &str) {
        self.line(&format!("SKIP name={name}"));
    }
    fn error(&self, context: &str, msg: &str) {
        self.line(&format!("ERROR ctx={context} msg={msg}"));
    }
    fn quit(&self) {
        self.line("QUIT");
    }
}
