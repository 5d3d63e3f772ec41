//! Size-based rotation and file handler lifecycle.

use magiklog::{HandlerKind, Level, Logger};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ten bytes per line including the newline.
fn record(i: usize) -> String {
    format!("record-{i:02}")
}

fn file_logger(dir: &Path, max_bytes: u64, backup_count: u64) -> Logger {
    Logger::builder()
        .name("rot")
        .path(dir.to_string_lossy())
        .level(Level::Debug)
        .format("{msg}")
        .log_to_console(false)
        .log_to_file(true)
        .max_bytes(max_bytes)
        .backup_count(backup_count)
        .build()
        .unwrap()
}

fn active(dir: &Path) -> PathBuf {
    dir.join("rot.log")
}

fn backup(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("rot.log.{index}"))
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn fourth_record_triggers_first_rotation() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 30, 2);

    for i in 1..=3 {
        logger.info(&record(i));
    }
    assert!(!backup(dir.path(), 1).exists());
    assert_eq!(fs::metadata(active(dir.path())).unwrap().len(), 30);

    logger.info(&record(4));
    assert_eq!(read_lines(&backup(dir.path(), 1)), ["record-01", "record-02", "record-03"]);
    assert_eq!(read_lines(&active(dir.path())), ["record-04"]);
    assert_eq!(logger.file_stats().unwrap().rotations, 1);
}

#[test]
fn oldest_backup_is_discarded() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 30, 2);

    for i in 1..=10 {
        logger.info(&record(i));
    }

    let stats = logger.file_stats().unwrap();
    assert_eq!(stats.rotations, 3);
    assert_eq!(stats.rotation_failures, 0);
    assert_eq!(read_lines(&active(dir.path())), ["record-10"]);
    assert_eq!(read_lines(&backup(dir.path(), 1)), ["record-07", "record-08", "record-09"]);
    assert_eq!(read_lines(&backup(dir.path(), 2)), ["record-04", "record-05", "record-06"]);
    assert!(!backup(dir.path(), 3).exists());
}

#[test]
fn zero_max_bytes_never_rotates() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 0, 5);

    for i in 1..=50 {
        logger.info(&record(i));
    }
    assert_eq!(read_lines(&active(dir.path())).len(), 50);
    assert!(!backup(dir.path(), 1).exists());
}

#[test]
fn oversized_record_lands_in_an_empty_file() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 5, 1);

    logger.info("much longer than five bytes");
    assert_eq!(read_lines(&active(dir.path())), ["much longer than five bytes"]);
    assert_eq!(logger.file_stats().unwrap().rotations, 0);
}

#[test]
fn existing_file_is_appended_and_counted() {
    let dir = TempDir::new().unwrap();
    fs::write(active(dir.path()), "previous!\nprevious!\n").unwrap();

    let logger = file_logger(dir.path(), 30, 1);
    assert_eq!(logger.file_stats().unwrap().size, 20);

    logger.info(&record(1));
    logger.info(&record(2));
    assert_eq!(read_lines(&backup(dir.path(), 1)), ["previous!", "previous!", "record-01"]);
    assert_eq!(read_lines(&active(dir.path())), ["record-02"]);
}

#[test]
fn disable_releases_and_enable_resumes() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 30, 2);

    logger.info(&record(1));
    logger.info(&record(2));
    logger.disable_handler(HandlerKind::File).unwrap();
    logger.info("dropped while disabled");

    // The handle is gone, so the file can be moved away underneath.
    fs::rename(active(dir.path()), dir.path().join("moved.log")).unwrap();

    logger.enable_handler(HandlerKind::File).unwrap();
    logger.info(&record(3));

    assert_eq!(read_lines(&dir.path().join("moved.log")), ["record-01", "record-02"]);
    assert_eq!(read_lines(&active(dir.path())), ["record-03"]);
}

#[test]
fn failed_rotation_leaves_backups_untouched() {
    let dir = TempDir::new().unwrap();
    fs::write(backup(dir.path(), 1), "backup-1\n").unwrap();
    fs::write(backup(dir.path(), 2), "backup-2\n").unwrap();

    let logger = file_logger(dir.path(), 30, 2);
    for i in 1..=3 {
        logger.info(&record(i));
    }
    // The last rename of the shift (active to .1) now fails after the backups have moved.
    fs::remove_file(active(dir.path())).unwrap();

    let outcome = logger.info(&record(4));
    assert!(outcome.delivered_to(HandlerKind::File));

    let stats = logger.file_stats().unwrap();
    assert_eq!(stats.rotations, 0);
    assert_eq!(stats.rotation_failures, 1);
    assert_eq!(read_lines(&backup(dir.path(), 1)), ["backup-1"]);
    assert_eq!(read_lines(&backup(dir.path(), 2)), ["backup-2"]);
    assert_eq!(read_lines(&active(dir.path())), ["record-04"]);

    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["rot.log", "rot.log.1", "rot.log.2"]);
}

#[test]
fn repeated_rotation_failures_keep_every_backup() {
    let dir = TempDir::new().unwrap();
    fs::write(backup(dir.path(), 1), "backup-1\n").unwrap();
    fs::write(backup(dir.path(), 2), "backup-2\n").unwrap();

    let logger = file_logger(dir.path(), 30, 2);
    let mut written = 0;
    for _ in 0..3 {
        while logger.file_stats().unwrap().size < 30 {
            written += 1;
            logger.info(&record(written));
        }
        fs::remove_file(active(dir.path())).unwrap();
        written += 1;
        logger.info(&record(written));
    }

    assert_eq!(logger.file_stats().unwrap().rotation_failures, 3);
    assert_eq!(read_lines(&backup(dir.path(), 1)), ["backup-1"]);
    assert_eq!(read_lines(&backup(dir.path(), 2)), ["backup-2"]);
}

#[test]
fn successful_rotation_discards_only_the_oldest_backup() {
    let dir = TempDir::new().unwrap();
    fs::write(backup(dir.path(), 1), "backup-1\n").unwrap();
    fs::write(backup(dir.path(), 2), "backup-2\n").unwrap();

    let logger = file_logger(dir.path(), 30, 2);
    for i in 1..=4 {
        logger.info(&record(i));
    }

    assert_eq!(read_lines(&backup(dir.path(), 1)), ["record-01", "record-02", "record-03"]);
    assert_eq!(read_lines(&backup(dir.path(), 2)), ["backup-1"]);
    assert!(!dir.path().join("rot.log.2.rotating").exists());
    assert!(!backup(dir.path(), 3).exists());
}

#[test]
fn removing_file_handler_closes_it() {
    let dir = TempDir::new().unwrap();
    let logger = file_logger(dir.path(), 0, 0);

    logger.info(&record(1));
    logger.remove_handler(HandlerKind::File).unwrap();
    assert!(logger.file_stats().is_none());

    logger.info(&record(2));
    assert_eq!(read_lines(&active(dir.path())), ["record-01"]);
}
