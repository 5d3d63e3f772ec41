//! Size-rotated file sink: `<dir>/<name>.log` plus `<name>.log.1` … `<name>.log.N`.

use super::{HandlerError, HandlerKind};
use crate::internal;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Rotation bookkeeping, kept across disable/enable so re-enabling resumes where it left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStats {
    /// Bytes in the active file as far as the sink knows.
    pub size: u64,
    /// Completed rotations since the handler was created.
    pub rotations: u64,
    /// Rotations abandoned because a rename or delete failed.
    pub rotation_failures: u64,
}

/// The open handle lives in an `Option`: `Some` exactly while the handler is enabled.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u64,
    file: Option<File>,
    stats: FileStats,
}

impl FileSink {
    /// Creates a closed sink; nothing touches the filesystem until [`FileSink::open`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            backup_count,
            file: None,
            stats: FileStats::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.file.is_some()
    }

    #[must_use]
    pub const fn stats(&self) -> FileStats {
        self.stats
    }

    /// `<name>.log.<index>` beside the active file.
    #[must_use]
    pub fn backup_path(&self, index: u64) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    pub(super) fn open(&mut self) -> Result<(), HandlerError> {
        if self.file.is_some() {
            return Ok(());
        }
        self.reopen(false)
    }

    fn reopen(&mut self, truncate: bool) -> Result<(), HandlerError> {
        let open_err = |source| HandlerError::Open {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(open_err)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let file = if truncate {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)
        } else {
            OpenOptions::new().create(true).append(true).open(&self.path)
        }
        .map_err(open_err)?;

        self.stats.size = file.metadata().map_or(0, |m| m.len());
        self.file = Some(file);
        internal::debug("FILE", &format!("Opened {}", self.path.display()));
        Ok(())
    }

    pub(super) fn close(&mut self) -> Result<(), HandlerError> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        internal::debug("FILE", &format!("Closed {}", self.path.display()));
        file.flush().map_err(|source| HandlerError::Flush {
            kind: HandlerKind::File,
            source,
        })
    }

    pub(super) fn flush(&mut self) -> Result<(), HandlerError> {
        match self.file.as_mut() {
            Some(file) => file.flush().map_err(|source| HandlerError::Flush {
                kind: HandlerKind::File,
                source,
            }),
            None => Ok(()),
        }
    }

    /// Size check, rotation and write happen under the caller's lock on this sink, so they
    /// are never interleaved with another thread's record.
    pub(super) fn write(&mut self, line: &str) -> Result<(), HandlerError> {
        let incoming = line.len() as u64 + 1;

        if self.should_rotate(incoming)
            && let Err(e) = self.rotate()
        {
            self.stats.rotation_failures += 1;
            internal::error("ROTATE", &e.to_string());
        }

        if self.file.is_none() {
            self.reopen(false)?;
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        let mut content = String::with_capacity(line.len() + 1);
        content.push_str(line);
        content.push('\n');
        file.write_all(content.as_bytes())
            .map_err(|source| HandlerError::Write {
                kind: HandlerKind::File,
                source,
            })?;

        self.stats.size += incoming;
        Ok(())
    }

    /// An empty file is never rotated, so a single oversized record still gets written.
    const fn should_rotate(&self, incoming: u64) -> bool {
        self.max_bytes > 0 && self.stats.size > 0 && self.stats.size + incoming > self.max_bytes
    }

    /// Shifts backups up by one and starts a fresh active file. With no backups configured the
    /// active file is truncated instead. On failure the active file is reopened for appending.
    fn rotate(&mut self) -> Result<(), HandlerError> {
        if let Some(mut file) = self.file.take()
            && let Err(e) = file.flush()
        {
            internal::warning(
                "ROTATE",
                &format!("flush of {} before rotation failed: {e}", self.path.display()),
            );
        }

        let shifted = if self.backup_count == 0 {
            Ok(())
        } else {
            self.shift_backups()
        };
        let fresh = shifted.is_ok() && self.backup_count == 0;

        self.reopen(fresh)?;
        shifted?;

        self.stats.rotations += 1;
        internal::debug(
            "ROTATE",
            &format!(
                "Rotated {} (rotation #{})",
                self.path.display(),
                self.stats.rotations
            ),
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_handle(&mut self, file: File) {
        self.file = Some(file);
    }

    /// Moves every backup up one slot and the active file to `.1`. All or nothing: if any
    /// rename fails, the completed ones are undone and the oldest backup is put back.
    fn shift_backups(&self) -> Result<(), HandlerError> {
        let oldest = self.backup_path(self.backup_count);
        let parked = parked_path(&oldest);

        let mut moves = Vec::new();
        if oldest.exists() {
            moves.push((oldest, parked.clone()));
        }
        for index in (1..self.backup_count).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                moves.push((from, self.backup_path(index + 1)));
            }
        }
        moves.push((self.path.clone(), self.backup_path(1)));

        rename_all(&moves)?;

        // Only discarded once the shift is complete.
        if let Err(e) = remove_if_exists(&parked) {
            internal::warning("ROTATE", &e.to_string());
        }
        Ok(())
    }
}

/// Where the oldest backup waits while the others shift.
fn parked_path(oldest: &Path) -> PathBuf {
    let mut name = oldest.as_os_str().to_owned();
    name.push(".rotating");
    PathBuf::from(name)
}

/// Applies `moves` in order. On the first failure the completed moves are reversed, newest
/// first, and that failure is returned.
fn rename_all(moves: &[(PathBuf, PathBuf)]) -> Result<(), HandlerError> {
    for (done, (from, to)) in moves.iter().enumerate() {
        if let Err(e) = rename(from, to) {
            for (from, to) in moves[..done].iter().rev() {
                if let Err(undo) = rename(to, from) {
                    internal::error("ROTATE", &format!("could not restore backup: {undo}"));
                }
            }
            return Err(e);
        }
    }
    Ok(())
}

fn rename(from: &Path, to: &Path) -> Result<(), HandlerError> {
    fs::rename(from, to).map_err(|source| HandlerError::Rotate {
        path: from.to_path_buf(),
        source,
    })
}

fn remove_if_exists(path: &Path) -> Result<(), HandlerError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(HandlerError::Rotate {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backup_paths_append_index() {
        let sink = FileSink::new("/var/log/app.log", 10, 3);
        assert_eq!(sink.backup_path(2), PathBuf::from("/var/log/app.log.2"));
    }

    #[test]
    fn write_opens_a_closed_sink() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("app.log"), 0, 0);
        sink.write("first").unwrap();
        assert!(sink.is_open());
        assert_eq!(sink.stats().size, 6);
    }

    #[test]
    fn zero_backups_truncates_on_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = FileSink::new(&path, 10, 0);
        sink.open().unwrap();
        sink.write("aaaaaaa").unwrap();
        sink.write("bbbbbbb").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "bbbbbbb\n");
        assert!(!sink.backup_path(1).exists());
        assert_eq!(sink.stats().rotations, 1);
    }

    #[test]
    fn failed_move_undoes_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let moves = [
            (first.clone(), dir.path().join("first.moved")),
            (second.clone(), dir.path().join("second.moved")),
            (dir.path().join("missing"), dir.path().join("missing.moved")),
        ];
        let err = rename_all(&moves).unwrap_err();

        assert!(matches!(err, HandlerError::Rotate { .. }));
        assert_eq!(fs::read_to_string(&first).unwrap(), "1");
        assert_eq!(fs::read_to_string(&second).unwrap(), "2");
        assert!(!dir.path().join("first.moved").exists());
        assert!(!dir.path().join("second.moved").exists());
    }

    #[test]
    fn read_only_handle_surfaces_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = FileSink::new(&path, 0, 0);
        sink.open().unwrap();
        sink.force_handle(File::open(&path).unwrap());

        let err = sink.write("nope").unwrap_err();
        assert!(matches!(err, HandlerError::Write { kind: HandlerKind::File, .. }));
    }
}
