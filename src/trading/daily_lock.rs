use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::error::JournalError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// "One & done" gate: the lock file holds the date of the last logged trade.
///
/// Only a manual [`DailyLock::reset`] clears it; a new calendar day simply
/// stops matching.
pub struct DailyLock {
    path: PathBuf,
    tz: Tz,
}

impl DailyLock {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.lock_path(), cfg.timezone()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current calendar date on the exchange's clock.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Date stored in the lock file, if any.
    ///
    /// A missing file is "never locked". Content that is not an ISO date is
    /// treated the same way, since it can never match a real day.
    pub fn locked_date(&self) -> Result<Option<NaiveDate>, JournalError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.lock_err(e)),
        };

        match NaiveDate::parse_from_str(content.trim(), DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                warn!(
                    "Lock file {} holds '{}', ignoring it",
                    self.path.display(),
                    content.trim()
                );
                Ok(None)
            }
        }
    }

    pub fn is_locked_on(&self, date: NaiveDate) -> Result<bool, JournalError> {
        Ok(self.locked_date()? == Some(date))
    }

    pub fn is_locked_today(&self) -> Result<bool, JournalError> {
        self.is_locked_on(self.today())
    }

    /// Persist `date` as the lock value.
    ///
    /// Goes through a sibling temp file and a rename so readers only ever see
    /// the old date or the new one.
    pub fn lock_on(&self, date: NaiveDate) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.lock_err(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = File::create(&tmp).map_err(|e| self.lock_err(e))?;
        file.write_all(date.format(DATE_FORMAT).to_string().as_bytes())
            .map_err(|e| self.lock_err(e))?;
        file.sync_all().map_err(|e| self.lock_err(e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| self.lock_err(e))?;

        info!("Daily lock set for {}", date);
        Ok(())
    }

    pub fn lock(&self) -> Result<(), JournalError> {
        self.lock_on(self.today())
    }

    /// Clear the lock. Clearing an absent lock is fine.
    pub fn reset(&self) -> Result<(), JournalError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Daily lock cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.lock_err(e)),
        }
    }

    /// Put back a state captured earlier with [`DailyLock::locked_date`].
    pub fn restore(&self, previous: Option<NaiveDate>) -> Result<(), JournalError> {
        match previous {
            Some(date) => self.lock_on(date),
            None => self.reset(),
        }
    }

    fn lock_err(&self, source: std::io::Error) -> JournalError {
        JournalError::LockIo {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::scratch_dir;
    use chrono_tz::Asia::Kolkata;

    fn lock_in(dir: &Path) -> DailyLock {
        DailyLock::new(dir.join("trade_lock.txt"), Kolkata)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_file_is_unlocked() {
        let dir = scratch_dir("lock_missing");
        let lock = lock_in(&dir);
        assert!(!lock.is_locked_today().unwrap());
        assert_eq!(lock.locked_date().unwrap(), None);
    }

    #[test]
    fn lock_then_reset() {
        let dir = scratch_dir("lock_reset");
        let lock = lock_in(&dir);
        lock.lock().unwrap();
        assert!(lock.is_locked_today().unwrap());
        lock.reset().unwrap();
        assert!(!lock.is_locked_today().unwrap());
    }

    #[test]
    fn lock_is_idempotent() {
        let dir = scratch_dir("lock_idempotent");
        let lock = lock_in(&dir);
        let d = day(2026, 3, 2);
        lock.lock_on(d).unwrap();
        lock.lock_on(d).unwrap();
        assert!(lock.is_locked_on(d).unwrap());
        assert_eq!(fs::read_to_string(lock.path()).unwrap(), "2026-03-02");
    }

    #[test]
    fn yesterday_lock_does_not_block_today() {
        let dir = scratch_dir("lock_yesterday");
        let lock = lock_in(&dir);
        lock.lock_on(day(2026, 3, 2)).unwrap();
        assert!(!lock.is_locked_on(day(2026, 3, 3)).unwrap());
    }

    #[test]
    fn reset_without_lock_is_ok() {
        let dir = scratch_dir("lock_reset_absent");
        let lock = lock_in(&dir);
        lock.reset().unwrap();
        lock.reset().unwrap();
    }

    #[test]
    fn garbage_content_reads_as_unlocked() {
        let dir = scratch_dir("lock_garbage");
        let lock = lock_in(&dir);
        fs::write(lock.path(), "not a date").unwrap();
        assert_eq!(lock.locked_date().unwrap(), None);
        assert!(!lock.is_locked_today().unwrap());
    }

    #[test]
    fn reads_date_with_trailing_newline() {
        let dir = scratch_dir("lock_newline");
        let lock = lock_in(&dir);
        fs::write(lock.path(), "2026-03-02\n").unwrap();
        assert!(lock.is_locked_on(day(2026, 3, 2)).unwrap());
    }

    #[test]
    fn restore_puts_previous_state_back() {
        let dir = scratch_dir("lock_restore");
        let lock = lock_in(&dir);
        lock.lock_on(day(2026, 3, 2)).unwrap();
        lock.lock_on(day(2026, 3, 3)).unwrap();
        lock.restore(Some(day(2026, 3, 2))).unwrap();
        assert_eq!(lock.locked_date().unwrap(), Some(day(2026, 3, 2)));

        lock.restore(None).unwrap();
        assert!(!lock.path().exists());
    }

    #[test]
    fn unwritable_location_surfaces_error() {
        let dir = scratch_dir("lock_unwritable");
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        let lock = DailyLock::new(blocker.join("trade_lock.txt"), Kolkata);
        assert!(matches!(lock.lock(), Err(JournalError::LockIo { .. })));
    }
}
