use log::debug;
use quorum_core::command::Command;
use quorum_core::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A journal entry for an accepted command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position of the command, contiguous from 1
    pub sequence: u64,

    /// The accepted command
    pub command: Command,

    /// Milliseconds since the Unix epoch when the entry was written
    pub timestamp: i64,
}

impl JournalEntry {
    /// Create an entry stamped with the current time
    pub fn new(sequence: u64, command: Command) -> Self {
        Self {
            sequence,
            command,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Append-only log of accepted commands, written before their effects are applied
pub trait CommandJournal: Send + Sync {
    /// Durably record an accepted command
    ///
    /// # Parameters
    /// * `entry` - The entry to append
    ///
    /// # Returns
    /// Ok(()) if the entry was written and flushed, Err otherwise
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    /// Get an iterator over all entries in append order
    fn iterate_entries(&self) -> Box<dyn Iterator<Item = Result<JournalEntry, StorageError>> + '_>;
}

/// A file-based command journal.
///
/// Each entry is a little-endian `u64` length followed by the bincode payload.
pub struct FileCommandJournal {
    /// Path to the journal file
    path: PathBuf,

    /// File handle for writing
    file: Mutex<BufWriter<File>>,
}

impl FileCommandJournal {
    /// Create or open the journal at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)
            .map_err(|e| StorageError::Journal(format!("Failed to open journal file: {}", e)))?;
        debug!("Opened command journal at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandJournal for FileCommandJournal {
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| StorageError::Journal(format!("Failed to acquire lock: {}", e)))?;

        let serialized = bincode::serialize(entry)?;

        // Length and payload go out as one frame
        let mut frame = Vec::with_capacity(8 + serialized.len());
        frame.extend_from_slice(&(serialized.len() as u64).to_le_bytes());
        frame.extend_from_slice(&serialized);
        file.write_all(&frame)?;
        file.flush()?;

        Ok(())
    }

    fn iterate_entries(&self) -> Box<dyn Iterator<Item = Result<JournalEntry, StorageError>> + '_> {
        match File::open(&self.path) {
            Ok(file) => Box::new(JournalEntryIterator {
                reader: BufReader::new(file),
                done: false,
            }),
            Err(e) => Box::new(std::iter::once(Err(StorageError::Journal(format!(
                "Failed to read journal file: {}",
                e
            ))))),
        }
    }
}

/// Iterator over journal entries
struct JournalEntryIterator {
    reader: BufReader<File>,
    done: bool,
}

impl JournalEntryIterator {
    fn read_entry(&mut self) -> Option<Result<JournalEntry, StorageError>> {
        // Read the entry length
        let mut len_buf = [0u8; 8];
        match self.reader.read_exact(&mut len_buf) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return None,
            Err(e) => return Some(Err(StorageError::from(e))),
        }

        let entry_len = u64::from_le_bytes(len_buf);

        // The prefix is untrusted; read at most what the file actually holds
        let mut entry_data = Vec::new();
        let read = match (&mut self.reader).take(entry_len).read_to_end(&mut entry_data) {
            Ok(read) => read as u64,
            Err(e) => return Some(Err(StorageError::from(e))),
        };
        if read != entry_len {
            return Some(Err(StorageError::Journal(format!(
                "Truncated journal entry ({} bytes expected, {} found)",
                entry_len, read
            ))));
        }

        Some(bincode::deserialize(&entry_data).map_err(StorageError::from))
    }
}

impl Iterator for JournalEntryIterator {
    type Item = Result<JournalEntry, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.read_entry();
        // Stop after the first error; the rest of the file cannot be framed
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// In-memory journal, used when no journal file is configured
#[derive(Debug, Default)]
pub struct InMemoryCommandJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl InMemoryCommandJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandJournal for InMemoryCommandJournal {
    fn append(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Journal(format!("Failed to acquire lock: {}", e)))?;
        entries.push(entry.clone());
        Ok(())
    }

    fn iterate_entries(&self) -> Box<dyn Iterator<Item = Result<JournalEntry, StorageError>> + '_> {
        match self.entries.lock() {
            Ok(entries) => Box::new(entries.clone().into_iter().map(Ok)),
            Err(e) => Box::new(std::iter::once(Err(StorageError::Journal(format!(
                "Failed to acquire lock: {}",
                e
            ))))),
        }
    }
}
