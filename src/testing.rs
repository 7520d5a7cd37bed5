//! Test doubles shared by the unit tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::admin::AdminNotifier;
use crate::error::{DnsUtilsError, Result};
use crate::executor::ProcessRunner;

/// Records every call and answers with a canned output.
#[derive(Default)]
pub struct RecordingRunner {
    output: String,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingRunner {
    pub fn with_output(output: &str) -> Self {
        RecordingRunner {
            output: output.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok(self.output.clone())
    }
}

/// Fails every launch with the same OS error; optionally only for one program.
pub struct FailingRunner {
    kind: std::io::ErrorKind,
    message: String,
    only: Option<String>,
}

impl FailingRunner {
    pub fn new(kind: std::io::ErrorKind, message: &str) -> Self {
        FailingRunner {
            kind,
            message: message.to_string(),
            only: None,
        }
    }

    pub fn only_for(mut self, program: &str) -> Self {
        self.only = Some(program.to_string());
        self
    }
}

impl ProcessRunner for FailingRunner {
    fn run(&self, program: &str, _args: &[String]) -> Result<String> {
        if self.only.as_deref().is_some_and(|only| only != program) {
            return Ok(String::new());
        }
        Err(DnsUtilsError::ProcessLaunch {
            tool: program.to_string(),
            source: std::io::Error::new(self.kind, self.message.clone()),
        })
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Snapshot of the notices received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AdminNotifier for RecordingNotifier {
    fn warn_admins(&self, text: &str) {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(text.to_string());
    }
}

/// Log sink shared between a test and the subscriber it installs.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local `fmt` subscriber and return its result plus
/// everything logged at `debug` and above.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (result, logs)
}
