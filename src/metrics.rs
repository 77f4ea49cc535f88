use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::profile::TeamProfile;
use crate::strength::form_score;

/// Descriptive indices derived from a profile. These feed the comparison
/// report only; the goal rates never read them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub form_score: f64,
    pub momentum: f64,
    pub shot_efficiency: f64,
    pub on_target_efficiency: f64,
    pub xg_overperformance: f64,
    pub xga_underperformance: f64,
    pub squad_depth: f64,
    pub tactical_score: f64,
    pub experience_factor: f64,
    pub quality_index: f64,
    pub defensive_solidity: f64,
    pub attack_consistency: f64,
}

impl TeamMetrics {
    pub fn derive(team: &TeamProfile, cal: &Calibration) -> Self {
        let form = form_score(&team.form, &cal.form_weights);
        let momentum = team.form[2..].iter().sum::<f64>() / 3.0;

        let tactical_score = 0.25
            * (team.pressing_intensity
                + (1.0 - team.defensive_line_height)
                + team.counter_attack_rate
                + team.set_piece_goals_ratio);

        let experience_factor = (team.coach_experience_years / 20.0).min(1.0) * 0.3
            + team.tournament_experience * 0.4
            + team.knockout_win_rate * 0.3;

        let quality_index = team.team_strength_index * 0.25
            + (team.squad_value_m_eur / 400.0) * 0.20
            + (team.avg_player_rating / 7.5) * 0.15
            + (team.players_top5_leagues as f64 / 15.0) * 0.10
            + form * 0.15
            + tactical_score * 0.10
            + experience_factor * 0.05;

        Self {
            form_score: form,
            momentum,
            shot_efficiency: ratio_or(team.avg_goals, team.shots_per_match, 0.0),
            on_target_efficiency: ratio_or(team.avg_goals, team.shots_on_target, 0.0),
            xg_overperformance: ratio_or(team.avg_goals, team.xg_for, 1.0),
            xga_underperformance: ratio_or(team.xg_against, team.avg_conceded, 1.0),
            squad_depth: 1.0 - (team.injury_index * 0.5 + team.star_dependency * 0.3),
            tactical_score,
            experience_factor,
            quality_index,
            defensive_solidity: team.defense_strength * (1.0 - team.variance_index),
            attack_consistency: team.attack_strength * (1.0 - team.variance_index),
        }
    }
}

fn ratio_or(num: f64, den: f64, fallback: f64) -> f64 {
    if den > 0.0 { num / den } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams;

    #[test]
    fn favourite_has_higher_quality_index() {
        let book = teams::builtin_book().unwrap();
        let cal = Calibration::default();
        let senegal = TeamMetrics::derive(book.get("Senegal").unwrap(), &cal);
        let botswana = TeamMetrics::derive(book.get("Botswana").unwrap(), &cal);
        assert!(senegal.quality_index > botswana.quality_index);
        assert!(senegal.squad_depth > botswana.squad_depth);
    }

    #[test]
    fn zero_denominators_use_fallbacks() {
        let mut team = teams::builtin_book().unwrap().get("Benin").unwrap().clone();
        team.shots_per_match = 0.0;
        team.xg_for = 0.0;
        let m = TeamMetrics::derive(&team, &Calibration::default());
        assert_eq!(m.shot_efficiency, 0.0);
        assert_eq!(m.xg_overperformance, 1.0);
    }

    #[test]
    fn momentum_reads_last_three() {
        let mut team = teams::builtin_book().unwrap().get("Tanzania").unwrap().clone();
        team.form = [0.0, 0.0, 1.0, 1.0, 1.0];
        let m = TeamMetrics::derive(&team, &Calibration::default());
        assert!((m.momentum - 1.0).abs() < 1e-12);
    }
}
