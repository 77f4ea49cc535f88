use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, Result};

pub const FORM_LEN: usize = 5;

/// Results of the last five matches, oldest first. W=1, D=0.5, L=0.
pub type FormRun = [f64; FORM_LEN];

/// Fixed reference data for one competitor. Only enters the estimator through
/// a [`ProfileBook`], which validates every field on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub name: String,

    pub fifa_rank: u16,
    pub elo: f64,
    pub team_strength_index: f64,

    pub attack_strength: f64,
    pub defense_strength: f64,

    pub avg_goals: f64,
    pub avg_conceded: f64,
    pub xg_for: f64,
    pub xg_against: f64,

    pub shots_per_match: f64,
    pub shots_on_target: f64,
    pub possession_pct: f64,
    pub pass_accuracy_pct: f64,

    pub form: FormRun,
    pub goals_last_5: u8,
    pub conceded_last_5: u8,
    pub clean_sheets_last_5: u8,

    pub squad_value_m_eur: f64,
    pub avg_player_rating: f64,
    pub players_top5_leagues: u8,
    pub avg_age: f64,
    pub injury_index: f64,
    pub star_dependency: f64,

    pub pressing_intensity: f64,
    pub defensive_line_height: f64,
    pub counter_attack_rate: f64,
    pub set_piece_goals_ratio: f64,

    pub coach_experience_years: f64,
    pub tournament_experience: f64,
    pub knockout_win_rate: f64,
    pub variance_index: f64,

    pub coach: String,
    pub key_player: String,
    pub style: String,
    #[serde(default)]
    pub weakness: String,
}

impl TeamProfile {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EstimatorError::EmptyName);
        }

        let unit = [
            ("team_strength_index", self.team_strength_index),
            ("injury_index", self.injury_index),
            ("star_dependency", self.star_dependency),
            ("pressing_intensity", self.pressing_intensity),
            ("defensive_line_height", self.defensive_line_height),
            ("counter_attack_rate", self.counter_attack_rate),
            ("set_piece_goals_ratio", self.set_piece_goals_ratio),
            ("tournament_experience", self.tournament_experience),
            ("knockout_win_rate", self.knockout_win_rate),
            ("variance_index", self.variance_index),
        ];
        for (field, value) in unit {
            self.check(field, value, 0.0, 1.0, "[0, 1]")?;
        }
        for value in self.form {
            self.check("form", value, 0.0, 1.0, "[0, 1]")?;
        }

        let non_negative = [
            ("attack_strength", self.attack_strength),
            ("defense_strength", self.defense_strength),
            ("avg_goals", self.avg_goals),
            ("avg_conceded", self.avg_conceded),
            ("xg_for", self.xg_for),
            ("xg_against", self.xg_against),
            ("shots_per_match", self.shots_per_match),
            ("shots_on_target", self.shots_on_target),
            ("squad_value_m_eur", self.squad_value_m_eur),
            ("avg_player_rating", self.avg_player_rating),
            ("avg_age", self.avg_age),
            ("coach_experience_years", self.coach_experience_years),
        ];
        for (field, value) in non_negative {
            self.check(field, value, 0.0, f64::MAX, "[0, inf)")?;
        }

        self.check("possession_pct", self.possession_pct, 0.0, 100.0, "[0, 100]")?;
        self.check(
            "pass_accuracy_pct",
            self.pass_accuracy_pct,
            0.0,
            100.0,
            "[0, 100]",
        )?;
        self.check("elo", self.elo, 0.0, 4000.0, "[0, 4000]")?;
        Ok(())
    }

    fn check(&self, field: &'static str, value: f64, lo: f64, hi: f64, expected: &'static str) -> Result<()> {
        if value.is_finite() && (lo..=hi).contains(&value) {
            Ok(())
        } else {
            Err(EstimatorError::DomainViolation {
                team: self.name.clone(),
                field,
                value,
                expected,
            })
        }
    }
}

/// Name -> profile lookup. Every profile is validated on insertion, so
/// downstream math can assume well-formed inputs.
#[derive(Debug, Clone, Default)]
pub struct ProfileBook {
    teams: BTreeMap<String, TeamProfile>,
}

impl ProfileBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = TeamProfile>) -> Result<Self> {
        let mut book = Self::new();
        for profile in profiles {
            book.insert(profile)?;
        }
        Ok(book)
    }

    pub fn insert(&mut self, profile: TeamProfile) -> Result<()> {
        profile.validate()?;
        let key = profile.name.trim().to_string();
        if self.teams.contains_key(&key) {
            return Err(EstimatorError::DuplicateTeam { name: key });
        }
        self.teams.insert(key, profile);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&TeamProfile> {
        self.teams
            .get(name.trim())
            .ok_or_else(|| EstimatorError::UnknownTeam {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.teams.keys().cloned().collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &TeamProfile> {
        self.teams.values()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
