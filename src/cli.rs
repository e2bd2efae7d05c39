use anyhow::{bail, Context, Result};
use std::slice::Iter;

use nifty_journal::config::Config;
use nifty_journal::models::{Mindset, Outcome};
use nifty_journal::trading::session::RiskConfig;
use nifty_journal::trading::trade_record::TradeEntry;

pub const USAGE: &str = "\
usage: nifty-journal [risk options] <command>

commands:
  status                      live price, lot size, zone room, lock state (default)
  watch                       refresh status until Ctrl+C
  log <target|stop> [--mindset M] [--rules] [--points N]
                              record today's trade (buy = target, sell = stop)
  review [--days N] [--json]  performance review
  reset-lock                  reopen trading for today (admin)

risk options:
  --capital X  --risk PCT  --support S  --resistance R  --zone W";

/// Session inputs typed on the command line; unset ones come from config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskOverrides {
    pub capital: Option<f64>,
    pub risk_pct: Option<f64>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub zone_width: Option<f64>,
}

impl RiskOverrides {
    pub fn apply(&self, cfg: &Config) -> RiskConfig {
        let mut risk = RiskConfig::from_config(cfg);
        if let Some(v) = self.capital {
            risk.capital = v;
        }
        if let Some(v) = self.risk_pct {
            risk.risk_pct = v;
        }
        if let Some(v) = self.support {
            risk.support = v;
        }
        if let Some(v) = self.resistance {
            risk.resistance = v;
        }
        if let Some(v) = self.zone_width {
            risk.zone_width = v;
        }
        risk
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Watch,
    Log(TradeEntry),
    Review { days: Option<i64>, json: bool },
    ResetLock,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub risk: RiskOverrides,
    pub command: Command,
}

/// Parse everything after the program name.
pub fn parse(args: &[String]) -> Result<Cli> {
    let mut risk = RiskOverrides::default();
    let mut words: Vec<&str> = Vec::new();
    let mut mindset = Mindset::default();
    let mut followed_rules = false;
    let mut points = None;
    let mut days = None;
    let mut json = false;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--capital" => risk.capital = Some(number(&mut it, "--capital")?),
            "--risk" => {
                let pct = number(&mut it, "--risk")?;
                if !(pct > 0.0 && pct <= 5.0) {
                    bail!("--risk must be above 0 and at most 5 percent, got {}", pct);
                }
                risk.risk_pct = Some(pct);
            }
            "--support" => risk.support = Some(number(&mut it, "--support")?),
            "--resistance" => risk.resistance = Some(number(&mut it, "--resistance")?),
            "--zone" => risk.zone_width = Some(number(&mut it, "--zone")?),
            "--mindset" => {
                mindset = value(&mut it, "--mindset")?
                    .parse::<Mindset>()
                    .map_err(anyhow::Error::msg)?
            }
            "--points" => points = Some(number(&mut it, "--points")?),
            "--days" => {
                let raw = value(&mut it, "--days")?;
                let d: i64 = raw
                    .parse()
                    .with_context(|| format!("--days expects whole days, got '{}'", raw))?;
                if d <= 0 {
                    bail!("--days must be positive, got {}", d);
                }
                days = Some(d);
            }
            "--rules" => followed_rules = true,
            "--json" => json = true,
            "-h" | "--help" => words.push("help"),
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            word => words.push(word),
        }
    }

    let command = match words.first().copied() {
        None | Some("status") => Command::Status,
        Some("watch") => Command::Watch,
        Some("log") => {
            let outcome = words
                .get(1)
                .context("log needs an outcome: target or stop")?
                .parse::<Outcome>()
                .map_err(anyhow::Error::msg)?;
            let mut entry = TradeEntry::new(outcome, mindset, followed_rules);
            entry.points = points;
            Command::Log(entry)
        }
        Some("review") => Command::Review { days, json },
        Some("reset-lock") => Command::ResetLock,
        Some("help") => Command::Help,
        Some(other) => bail!("unknown command '{}'", other),
    };

    Ok(Cli { risk, command })
}

fn value<'a>(it: &mut Iter<'a, String>, flag: &str) -> Result<&'a str> {
    it.next()
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn number(it: &mut Iter<'_, String>, flag: &str) -> Result<f64> {
    let raw = value(it, flag)?;
    let v: f64 = raw
        .parse()
        .with_context(|| format!("{} expects a number, got '{}'", flag, raw))?;
    if !v.is_finite() {
        bail!("{} must be finite", flag);
    }
    Ok(v)
}
