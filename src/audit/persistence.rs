use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use super::ActionEntry;
use crate::error::GameError;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(e) => e.into_inner(),
    }
}

/// What a JSONL file held, up to the last complete entry.
#[derive(Debug)]
pub struct LoadedEntries {
    pub entries: Vec<ActionEntry>,
    /// Byte length of the intact prefix, ending after its newline.
    pub valid_len: u64,
    pub file_len: u64,
    /// The intact prefix lacks a trailing newline.
    pub needs_newline: bool,
}

/// Parse every line of an action log file.
///
/// A final line that fails to parse is taken to be a write torn by a crash and skipped with a
/// warning. A bad line followed by more data is an error.
pub fn read_jsonl(path: &Path) -> Result<LoadedEntries, GameError> {
    let bytes = fs::read(path)?;
    let mut entries = Vec::new();
    let mut valid_len = 0usize;
    let mut offset = 0usize;
    let mut torn: Option<(usize, serde_json::Error)> = None;

    for segment in bytes.split(|b| *b == b'\n') {
        let start = offset;
        let end = start + segment.len();
        offset = (end + 1).min(bytes.len());
        if segment.iter().all(u8::is_ascii_whitespace) {
            if torn.is_none() {
                valid_len = offset;
            }
            continue;
        }
        if let Some((line_start, e)) = torn.take() {
            log::error!("action log {}: bad entry at byte {line_start}", path.display());
            return Err(e.into());
        }
        match serde_json::from_slice::<ActionEntry>(segment) {
            Ok(entry) => {
                entries.push(entry);
                valid_len = offset;
            }
            Err(e) => torn = Some((start, e)),
        }
    }

    if let Some((line_start, e)) = torn {
        log::warn!(
            "action log {}: skipping torn entry at byte {line_start}: {e}",
            path.display()
        );
    }
    let needs_newline = valid_len > 0 && bytes[valid_len - 1] != b'\n';
    Ok(LoadedEntries {
        entries,
        valid_len: valid_len as u64,
        file_len: bytes.len() as u64,
        needs_newline,
    })
}

/// Cut a torn tail off the file and end it on a newline, so appended entries start on a fresh line.
pub fn repair_tail(path: &Path, loaded: &LoadedEntries) -> Result<(), GameError> {
    if loaded.valid_len < loaded.file_len {
        OpenOptions::new()
            .write(true)
            .open(path)?
            .set_len(loaded.valid_len)?;
        log::warn!(
            "action log {}: truncated {} torn bytes",
            path.display(),
            loaded.file_len - loaded.valid_len
        );
    }
    if loaded.needs_newline {
        OpenOptions::new().append(true).open(path)?.write_all(b"\n")?;
    }
    Ok(())
}

/// Appends action entries to a JSONL file from a dedicated thread.
#[derive(Clone, Debug)]
pub struct FileWriter {
    // taken on close so the writer thread sees the channel hang up
    sender: Arc<Mutex<Option<Sender<ActionEntry>>>>,
    handle: Arc<Mutex<Option<thread::JoinHandle<()>>>>,
}

impl FileWriter {
    pub fn new(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<ActionEntry>();
        let handle = thread::spawn(move || {
            let file = match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(f) => f,
                Err(e) => {
                    log::error!("action log: cannot open {}: {e}", path.display());
                    return;
                }
            };
            let mut writer = BufWriter::new(file);
            for entry in rx {
                match serde_json::to_vec(&entry) {
                    Ok(mut bytes) => {
                        bytes.push(b'\n');
                        if let Err(e) = writer.write_all(&bytes).and_then(|_| writer.flush()) {
                            log::error!("action log: write of seq {} failed: {e}", entry.seq);
                        }
                    }
                    Err(e) => log::error!("action log: cannot encode seq {}: {e}", entry.seq),
                }
            }
            let _ = writer.flush();
        });

        FileWriter {
            sender: Arc::new(Mutex::new(Some(tx))),
            handle: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Queue an entry; dropped silently once the writer is closed.
    pub fn send(&self, entry: ActionEntry) {
        if let Some(tx) = &*lock(&self.sender) {
            let _ = tx.send(entry);
        }
    }

    /// Drop the sender and wait for pending writes to reach the file.
    pub fn close(&self) {
        lock(&self.sender).take();
        let handle = lock(&self.handle).take();
        if let Some(h) = handle {
            let _ = h.join();
        }
    }
}
