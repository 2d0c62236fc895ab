//! Shared fixtures for digitstrip-core integration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use digitstrip_core::{FetchError, RemoteSource, RemoteStream};
use digitstrip_test_support::fixtures::{IMAGES_FILE, LABELS_FILE, SyntheticDataset, gzip_bytes};
use tracing::Level;

/// Serves gzip archives of a synthetic dataset and records every request.
pub struct FakeMirror {
    archives: HashMap<String, Vec<u8>>,
    inflate_declared: Option<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeMirror {
    pub fn new(dataset: SyntheticDataset) -> Self {
        let archives = HashMap::from([
            (format!("{LABELS_FILE}.gz"), gzip_bytes(&dataset.labels_bytes())),
            (format!("{IMAGES_FILE}.gz"), gzip_bytes(&dataset.images_bytes())),
        ]);
        Self {
            archives,
            inflate_declared: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Declares one byte more than `name` actually serves.
    pub fn with_short_body(mut self, name: &str) -> Self {
        self.inflate_declared = Some(name.to_owned());
        self
    }

    /// Stops serving `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.archives.remove(name);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl RemoteSource for FakeMirror {
    fn open(&self, name: &str) -> Result<RemoteStream, FetchError> {
        self.requests.borrow_mut().push(name.to_owned());
        let payload = self.archives.get(name).cloned().ok_or_else(|| FetchError::Request {
            url: name.to_owned(),
            message: "404 Not Found".to_owned(),
        })?;
        let mut declared_len = payload.len() as u64;
        if self.inflate_declared.as_deref() == Some(name) {
            declared_len += 1;
        }
        Ok(RemoteStream {
            location: format!("fake://{name}"),
            declared_len,
            body: Box::new(Cursor::new(payload)),
        })
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a debug-level subscriber and returns its result with the
/// formatted log output.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().expect("log buffer lock")).into_owned();
    (result, logs)
}
