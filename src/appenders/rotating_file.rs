//! Rotating file appender with size-based log rotation
//!
//! The active segment lives at the configured path. Before a line would push
//! it past `max_size`, the segment is renamed to a timestamped backup and a
//! fresh file is opened, so a line never straddles two segments.
//!
//! Backups are named `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm>.<ext>` next to the
//! active file, with a `_<n>` disambiguator when that name is already taken,
//! and `.gz` appended when compression is enabled.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default size at which a segment is rotated (1 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESSED_SUFFIX: &str = ".gz";

/// Configuration for rotating file appender
///
/// Retention is unlimited unless `max_backups` or `max_age_days` is set.
///
/// # Examples
///
/// ```
/// use shlog::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_compression(true);
/// assert_eq!(policy.max_backups, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Segment size in bytes that triggers rotation
    pub max_size: u64,
    /// Maximum number of backups to keep
    pub max_backups: Option<usize>,
    /// Maximum age of a backup, in days, judged by the timestamp in its name
    pub max_age_days: Option<u32>,
    /// Whether to gzip rotated segments
    pub compress: bool,
    /// Stamp backups with local time instead of UTC
    pub local_time: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_backups: None,
            max_age_days: None,
            compress: false,
            local_time: false,
        }
    }
}

impl RotationPolicy {
    /// Create a new rotation policy with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_size = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = Some(count);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = Some(days);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    /// Reject policies that could never hold a line.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_size must be greater than zero",
            ));
        }
        Ok(())
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// Rotating file appender
///
/// # Examples
///
/// ```no_run
/// use shlog::appenders::{RotatingFileAppender, RotationPolicy};
///
/// // 1 MiB segments, every backup kept
/// let appender = RotatingFileAppender::new("/var/log/app.log").unwrap();
///
/// // 10 MiB segments, a week of compressed backups
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_max_age_days(7)
///     .with_compression(true);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
    rotation_count: u64,
    /// Stamp and sequence of the last backup this appender produced
    last_backup: Option<(String, u32)>,
    /// After a failed rotation, the segment size at which to try again
    retry_rotation_at: Option<u64>,
}

/// A backup found on disk, with the timestamp parsed from its name.
#[derive(Debug)]
struct Backup {
    path: PathBuf,
    stamp: NaiveDateTime,
    seq: u32,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a rotating file appender with a custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the policy is invalid or the file cannot be opened
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_segment(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            file: Some(file),
            current_size,
            rotation_count: 0,
            last_backup: None,
            retry_rotation_at: None,
        })
    }

    fn open_segment(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("Failed to open '{}'", path.display()),
                    e,
                )
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("Cannot access metadata of '{}'", path.display()),
                    e,
                )
            })?
            .len();
        Ok((file, size))
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        let projected = self.current_size.saturating_add(incoming);
        match self.retry_rotation_at {
            Some(retry_at) => projected > retry_at,
            None => self.current_size > 0 && projected > self.policy.max_size,
        }
    }

    /// Close the active segment, move it aside and open a fresh one.
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let backup = self.next_backup_path();
        if self.base_path.exists() {
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                )
            })?;
        }

        let (file, size) = Self::open_segment(&self.base_path)?;
        self.file = Some(file);
        self.current_size = size;
        self.rotation_count += 1;
        self.retry_rotation_at = None;

        if self.policy.compress && backup.exists() {
            if let Err(e) = compress_file(&backup) {
                eprintln!("[LOGGER WARNING] Failed to compress rotated log {}: {}", backup.display(), e);
            }
        }

        if let Err(e) = self.prune_backups() {
            eprintln!("[LOGGER WARNING] Failed to apply log retention: {}", e);
        }

        Ok(())
    }

    fn name_parts(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        let ext = self
            .base_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (stem, ext)
    }

    /// Backup name for a rotation happening now, unique on disk.
    ///
    /// Rotations within the same millisecond get increasing sequence
    /// numbers, so name order stays rotation order even after pruning.
    fn next_backup_path(&mut self) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let stamp = self.policy.now().format(BACKUP_TIME_FORMAT).to_string();

        let mut seq = match self.last_backup {
            Some((ref last, last_seq)) if *last == stamp => last_seq + 1,
            _ => 0,
        };
        loop {
            let name = if seq == 0 {
                format!("{}-{}{}", stem, stamp, ext)
            } else {
                format!("{}-{}_{}{}", stem, stamp, seq, ext)
            };
            let candidate = self.base_path.with_file_name(name);
            if !candidate.exists() && !gz_path(&candidate).exists() {
                self.last_backup = Some((stamp, seq));
                return candidate;
            }
            seq += 1;
        }
    }

    /// Backups of this log, newest first.
    fn list_backups(&self) -> Result<Vec<Backup>> {
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);
        let dir = match self.base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };

        let mut backups = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let rest = rest.strip_suffix(COMPRESSED_SUFFIX).unwrap_or(rest);
            let Some(middle) = rest.strip_suffix(ext.as_str()) else {
                continue;
            };
            let (stamp, seq) = match middle.split_once('_') {
                Some((stamp, seq)) => match seq.parse::<u32>() {
                    Ok(seq) => (stamp, seq),
                    Err(_) => continue,
                },
                None => (middle, 0),
            };
            if let Ok(stamp) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: entry.path(),
                    stamp,
                    seq,
                });
            }
        }

        backups.sort_by(|a, b| (b.stamp, b.seq).cmp(&(a.stamp, a.seq)));
        Ok(backups)
    }

    /// Delete backups beyond `max_backups` or older than `max_age_days`.
    fn prune_backups(&self) -> Result<()> {
        if self.policy.max_backups.is_none() && self.policy.max_age_days.is_none() {
            return Ok(());
        }

        let cutoff = self
            .policy
            .max_age_days
            .map(|days| self.policy.now() - chrono::Duration::days(i64::from(days)));

        for (idx, backup) in self.list_backups()?.iter().enumerate() {
            let too_many = self.policy.max_backups.is_some_and(|max| idx >= max);
            let too_old = cutoff.is_some_and(|cutoff| backup.stamp < cutoff);
            if too_many || too_old {
                if let Err(e) = fs::remove_file(&backup.path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove old log backup {}: {}",
                        backup.path.display(),
                        e
                    );
                }
            }
        }
        Ok(())
    }

    /// Paths of all backups currently on disk, newest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        Ok(self.list_backups()?.into_iter().map(|b| b.path).collect())
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Number of rotations performed by this appender
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotation_count
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "RotatingFileAppender"
    }

    fn append(&mut self, line: &str) -> Result<()> {
        let incoming = line.len() as u64;

        if self.should_rotate(incoming) {
            if let Err(e) = self.rotate() {
                // Keep logging into whatever file is at the base path
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                if self.file.is_none() {
                    let (file, size) = Self::open_segment(&self.base_path).map_err(|reopen| {
                        eprintln!(
                            "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen
                        );
                        e
                    })?;
                    self.file = Some(file);
                    self.current_size = size;
                }
                // Let the segment grow by another max_size before trying again
                self.retry_rotation_at = Some(self.current_size.saturating_add(self.policy.max_size));
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Log file not open"))?;
        file.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation(
                "writing log file",
                format!("Failed to write to '{}'", self.base_path.display()),
                e,
            )
        })?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::io_operation(
                    "flushing log file",
                    format!("Failed to flush '{}'", self.base_path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(COMPRESSED_SUFFIX);
    PathBuf::from(name)
}

/// Gzip `path` next to itself and remove the original once the compressed
/// copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let gz = gz_path(path);
    let mut tmp = OsString::from(gz.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&tmp).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", tmp.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut out| out.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&tmp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&tmp, &gz).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz.display()),
            e,
        )
    })?;

    // Only remove the original once the compressed copy is in place
    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn line(i: usize) -> String {
        format!("entry number {:04}\n", i)
    }

    #[test]
    fn test_failed_rotation_keeps_real_size() {
        let dir = tempdir().unwrap();
        // Short enough to open, too long once the backup stamp is added
        let path = dir.path().join(format!("{}.log", "x".repeat(240)));
        let policy = RotationPolicy::new().with_max_size(40);
        let mut appender = RotatingFileAppender::with_policy(&path, policy).unwrap();

        for i in 0..3 {
            appender.append(&line(i)).unwrap();
        }
        assert_eq!(appender.rotation_count(), 0);
        assert_eq!(appender.current_size(), 54);
        assert_eq!(appender.retry_rotation_at, Some(36 + 40));

        // No retry until the segment has grown by another max_size
        appender.append(&line(3)).unwrap();
        assert_eq!(appender.current_size(), 72);
        appender.append(&line(4)).unwrap();
        assert_eq!(appender.rotation_count(), 0);
        assert_eq!(appender.retry_rotation_at, Some(72 + 40));

        appender.flush().unwrap();
        assert_eq!(appender.current_size(), fs::metadata(&path).unwrap().len());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_rotation_policy_builder() {
        let policy = RotationPolicy::new()
            .with_max_size(1024)
            .with_max_backups(3)
            .with_max_age_days(2)
            .with_compression(true)
            .with_local_time(true);

        assert_eq!(policy.max_size, 1024);
        assert_eq!(policy.max_backups, Some(3));
        assert_eq!(policy.max_age_days, Some(2));
        assert!(policy.compress);
        assert!(policy.local_time);
    }

    #[test]
    fn test_default_policy_keeps_everything() {
        let policy = RotationPolicy::default();
        assert_eq!(policy.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(policy.max_backups, None);
        assert_eq!(policy.max_age_days, None);
        assert!(!policy.compress);
    }

    #[test]
    fn test_zero_size_policy_is_rejected() {
        let dir = tempdir().unwrap();
        let result = RotatingFileAppender::with_policy(
            dir.path().join("x.log"),
            RotationPolicy::new().with_max_size(0),
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_rotating_appender_creation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("test.log");

        let appender = RotatingFileAppender::new(&log_path).unwrap();
        assert_eq!(appender.path(), log_path);
        assert_eq!(appender.current_size(), 0);
        assert!(log_path.exists());
    }

    #[test]
    fn test_rotation_keeps_lines_whole() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let one = line(0).len() as u64;

        // Room for exactly three lines per segment
        let policy = RotationPolicy::new().with_max_size(one * 3);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..10 {
            appender.append(&line(i)).unwrap();
        }
        appender.flush().unwrap();

        assert_eq!(appender.rotation_count(), 3);
        let backups = appender.backups().unwrap();
        assert_eq!(backups.len(), 3);

        let mut all = Vec::new();
        for path in backups.iter().rev().chain(std::iter::once(&log_path)) {
            let content = fs::read_to_string(path).unwrap();
            assert!(content.len() as u64 <= one * 3);
            assert!(content.ends_with('\n'));
            all.extend(content.lines().map(str::to_string));
        }
        let expected: Vec<String> = (0..10).map(|i| line(i).trim_end().to_string()).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_oversized_line_gets_its_own_segment() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");
        let policy = RotationPolicy::new().with_max_size(16);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        appender.append("short\n").unwrap();
        let big = format!("{}\n", "z".repeat(64));
        appender.append(&big).unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), big);
        assert_eq!(appender.rotation_count(), 1);
    }

    #[test]
    fn test_existing_file_size_counts() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("existing.log");
        fs::write(&log_path, "x".repeat(30)).unwrap();

        let policy = RotationPolicy::new().with_max_size(32);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        assert_eq!(appender.current_size(), 30);

        appender.append("next line\n").unwrap();
        assert_eq!(appender.rotation_count(), 1);
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "next line\n");
    }

    #[test]
    fn test_backup_names_are_unique() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("fast.log");
        let policy = RotationPolicy::new().with_max_size(1);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        // Several rotations inside the same millisecond must not collide
        for i in 0..20 {
            appender.append(&line(i)).unwrap();
        }

        let backups = appender.backups().unwrap();
        assert_eq!(backups.len(), 19);
        let mut names: Vec<_> = backups.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 19);
    }

    #[test]
    fn test_max_backups_retention() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_size(1).with_max_backups(2);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..10 {
            appender.append(&line(i)).unwrap();
        }

        let backups = appender.backups().unwrap();
        assert_eq!(backups.len(), 2);
        // Newest backup holds the line before the active one
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), line(8));
    }

    #[test]
    fn test_max_age_retention_removes_old_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");
        let stale = dir.path().join("aged-2001-01-01T00-00-00.000.log");
        fs::write(&stale, "ancient\n").unwrap();
        let unrelated = dir.path().join("aged-notes.log");
        fs::write(&unrelated, "keep me\n").unwrap();

        let policy = RotationPolicy::new().with_max_size(1).with_max_age_days(1);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();
        appender.append(&line(0)).unwrap();
        appender.append(&line(1)).unwrap();

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert_eq!(appender.backups().unwrap().len(), 1);
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("zip.log");
        let policy = RotationPolicy::new().with_max_size(1).with_compression(true);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        appender.append(&line(0)).unwrap();
        appender.append(&line(1)).unwrap();

        let backups = appender.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].to_string_lossy().ends_with(".log.gz"));

        let mut decoded = String::new();
        GzDecoder::new(File::open(&backups[0]).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, line(0));
    }
}
