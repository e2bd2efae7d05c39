use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, ConfigError};
use crate::error::JournalError;
use crate::models::{Mindset, Outcome};
use crate::trading::trade_record::TradeRecord;

pub const HEADER: [&str; 6] = [
    "Timestamp",
    "Outcome",
    "Points",
    "Net_PnL",
    "Mindset",
    "Followed_Rules",
];

/// Naive layouts written by older journals; read as market-local time.
const LEGACY_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct JournalRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Outcome")]
    outcome: Outcome,
    #[serde(rename = "Points")]
    points: f64,
    #[serde(rename = "Net_PnL")]
    net_pnl: f64,
    #[serde(rename = "Mindset")]
    mindset: Mindset,
    #[serde(rename = "Followed_Rules")]
    followed_rules: String,
}

/// Append-only CSV store of trade outcomes.
pub struct TradeJournal {
    path: PathBuf,
    tz: Tz,
}

impl TradeJournal {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.journal_path(), cfg.timezone()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Add one row after everything already on disk.
    ///
    /// The header goes in first when the file is new or empty. The row is
    /// encoded up front and lands in a single write, then synced, so an error
    /// here means nothing was reported as stored.
    pub fn append(&self, record: &TradeRecord) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        let mut bytes = Vec::new();
        if len > 0 && !ends_with_newline(&mut file).map_err(|e| self.io_err(e))? {
            bytes.push(b'\n');
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut bytes);
            if len == 0 {
                writer.write_record(HEADER).map_err(|e| self.csv_err(e))?;
            }
            writer
                .write_record(encode_row(record))
                .map_err(|e| self.csv_err(e))?;
            writer.flush().map_err(|e| self.io_err(e))?;
        }

        file.write_all(&bytes).map_err(|e| self.io_err(e))?;
        file.sync_all().map_err(|e| self.io_err(e))?;

        info!(
            "Journal: logged {} {:+.2} ({} pts, {})",
            record.outcome, record.net_pnl, record.points, record.mindset
        );
        Ok(())
    }

    /// Every record in file order. No file yet means no trades yet.
    pub fn load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        if !self.path.exists() {
            debug!("Journal {} not created yet", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.csv_err(e))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<JournalRow>() {
            let row = row.map_err(|e| self.csv_err(e))?;
            records.push(self.decode_row(row, records.len() as u64 + 2)?);
        }
        Ok(records)
    }

    fn decode_row(&self, row: JournalRow, line: u64) -> Result<TradeRecord, JournalError> {
        let timestamp = parse_timestamp(&row.timestamp, self.tz).ok_or_else(|| {
            self.bad_row(line, format!("unreadable timestamp '{}'", row.timestamp))
        })?;
        let followed_rules = parse_flag(&row.followed_rules).ok_or_else(|| {
            self.bad_row(
                line,
                format!("Followed_Rules must be True or False, got '{}'", row.followed_rules),
            )
        })?;

        Ok(TradeRecord {
            timestamp,
            outcome: row.outcome,
            points: row.points,
            net_pnl: row.net_pnl,
            mindset: row.mindset,
            followed_rules,
        })
    }

    fn io_err(&self, source: std::io::Error) -> JournalError {
        JournalError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> JournalError {
        JournalError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn bad_row(&self, line: u64, reason: String) -> JournalError {
        JournalError::BadRow {
            path: self.path.clone(),
            line,
            reason,
        }
    }
}

fn encode_row(record: &TradeRecord) -> [String; 6] {
    [
        record.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        record.outcome.as_str().to_string(),
        record.points.to_string(),
        record.net_pnl.to_string(),
        record.mindset.as_str().to_string(),
        if record.followed_rules { "True" } else { "False" }.to_string(),
    ]
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    LEGACY_TIMESTAMP_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|local| local.fixed_offset())
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
