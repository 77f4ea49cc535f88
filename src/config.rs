use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::calibration::{Calibration, MAX_GOALS_CAP};
use crate::prediction::DEFAULT_TOP_N;
use crate::profile::{ProfileBook, TeamProfile};
use crate::teams;

const DEFAULT_REPORT_PATH: &str = "afcon_predictions.json";

pub const DEFAULT_FIXTURES: &[(&str, &str)] = &[("Congo DR", "Benin"), ("Senegal", "Botswana")];

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub profiles_path: Option<PathBuf>,
    pub calibration_path: Option<PathBuf>,
    pub max_goals: Option<usize>,
    pub top_n: usize,
    pub report_path: Option<PathBuf>,
    pub xlsx_path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub fixtures: Vec<(String, String)>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            profiles_path: None,
            calibration_path: None,
            max_goals: None,
            top_n: DEFAULT_TOP_N,
            report_path: Some(PathBuf::from(DEFAULT_REPORT_PATH)),
            xlsx_path: None,
            threads: None,
            fixtures: Vec::new(),
        }
    }
}

impl RunConfig {
    /// `.env.local` then `.env`, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let mut cfg = Self::default();
        cfg.profiles_path = path("AFCON_PROFILES");
        cfg.calibration_path = path("AFCON_CALIBRATION");
        cfg.max_goals = lookup("AFCON_MAX_GOALS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|v| v.min(MAX_GOALS_CAP));
        cfg.top_n = lookup("AFCON_TOP_N")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_TOP_N)
            .max(1);
        if let Some(report) = path("AFCON_REPORT_PATH") {
            cfg.report_path = Some(report);
        }
        cfg.xlsx_path = path("AFCON_XLSX_PATH");
        cfg.threads = lookup("AFCON_THREADS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0);
        cfg
    }

    /// Command-line flags win over the environment.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(v) = arg_value(args, "--profiles") {
            self.profiles_path = Some(PathBuf::from(v));
        }
        if let Some(v) = arg_value(args, "--calibration") {
            self.calibration_path = Some(PathBuf::from(v));
        }
        if let Some(v) = arg_value(args, "--out") {
            self.report_path = Some(PathBuf::from(v));
        }
        if let Some(v) = arg_value(args, "--xlsx") {
            self.xlsx_path = Some(PathBuf::from(v));
        }
        if let Some(v) = arg_value(args, "--top") {
            let n = v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("--top expects a number, got {v:?}"))?;
            self.top_n = n.max(1);
        }
        if let Some(v) = arg_value(args, "--max-goals") {
            let n = v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("--max-goals expects a number, got {v:?}"))?;
            self.max_goals = Some(n.min(MAX_GOALS_CAP));
        }
        if let Some(v) = arg_value(args, "--threads") {
            let n = v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("--threads expects a number, got {v:?}"))?;
            if n == 0 {
                return Err(anyhow!("--threads must be at least 1"));
            }
            self.threads = Some(n);
        }
        if has_flag(args, "--no-json") {
            self.report_path = None;
        }
        for raw in arg_values(args, "--match") {
            self.fixtures.push(parse_fixture(&raw)?);
        }
        Ok(())
    }

    pub fn fixtures_or_default(&self) -> Vec<(String, String)> {
        if self.fixtures.is_empty() {
            DEFAULT_FIXTURES
                .iter()
                .map(|(h, a)| (h.to_string(), a.to_string()))
                .collect()
        } else {
            self.fixtures.clone()
        }
    }

    pub fn load_book(&self) -> Result<ProfileBook> {
        let Some(path) = &self.profiles_path else {
            return Ok(teams::builtin_book()?.clone());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read profiles from {}", path.display()))?;
        let profiles: Vec<TeamProfile> = serde_json::from_str(&raw)
            .with_context(|| format!("parse profiles in {}", path.display()))?;
        ProfileBook::from_profiles(profiles)
            .with_context(|| format!("invalid profile in {}", path.display()))
    }

    pub fn load_calibration(&self) -> Result<Calibration> {
        let mut cal = match &self.calibration_path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("read calibration from {}", path.display()))?;
                serde_json::from_str::<Calibration>(&raw)
                    .with_context(|| format!("parse calibration in {}", path.display()))?
            }
            None => Calibration::default(),
        };
        if let Some(max_goals) = self.max_goals {
            cal.max_goals = max_goals;
        }
        cal.validate().context("calibration rejected")?;
        Ok(cal)
    }
}

pub fn parse_fixture(raw: &str) -> Result<(String, String)> {
    let (home, away) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("fixture {raw:?} must look like \"Home:Away\""))?;
    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        return Err(anyhow!("fixture {raw:?} has an empty side"));
    }
    Ok((home.to_string(), away.to_string()))
}

fn arg_values(args: &[String], name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            out.push(raw.to_string());
        } else if arg == name
            && let Some(next) = args.get(idx + 1)
        {
            out.push(next.clone());
        }
    }
    out
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    arg_values(args, name).pop()
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}
