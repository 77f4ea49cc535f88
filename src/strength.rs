use serde::Serialize;
use tracing::debug;

use crate::calibration::Calibration;
use crate::elo;
use crate::profile::{FormRun, TeamProfile};

/// Poisson means for the two sides, already clamped to the calibrated ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedGoalsPair {
    pub home: f64,
    pub away: f64,
}

impl ExpectedGoalsPair {
    pub fn new(home: f64, away: f64) -> Self {
        Self {
            home: home.max(0.0),
            away: away.max(0.0),
        }
    }

    pub fn scaled(self, home: f64, away: f64) -> Self {
        Self::new(self.home * home, self.away * away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StyleMatchup {
    Neutral,
    /// Home counters into a high away line.
    HomeCounter,
    /// Away counters into a high home line.
    AwayCounter,
}

/// Every intermediate factor behind a rate pair, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateBreakdown {
    pub base_home: f64,
    pub base_away: f64,
    pub form_home: f64,
    pub form_away: f64,
    pub form_factor: f64,
    pub elo_expectation: f64,
    pub quality_factor: f64,
    pub xg_ratio_home: f64,
    pub xg_ratio_away: f64,
    pub pressing_diff: f64,
    pub style: StyleMatchup,
    pub unclamped_home: f64,
    pub unclamped_away: f64,
}

pub fn form_score(form: &FormRun, weights: &FormRun) -> f64 {
    form.iter().zip(weights).map(|(f, w)| f * w).sum()
}

pub fn derive_rates(home: &TeamProfile, away: &TeamProfile, cal: &Calibration) -> ExpectedGoalsPair {
    derive_rates_detailed(home, away, cal).0
}

pub fn derive_rates_detailed(
    home: &TeamProfile,
    away: &TeamProfile,
    cal: &Calibration,
) -> (ExpectedGoalsPair, RateBreakdown) {
    let base_home = home.xg_for * (cal.defense_pivot - away.defense_strength);
    let base_away = away.xg_for * (cal.defense_pivot - home.defense_strength);

    let form_home = form_score(&home.form, &cal.form_weights);
    let form_away = form_score(&away.form, &cal.form_weights);
    let form_factor = 1.0 + (form_home - form_away) * cal.form_sensitivity;

    let elo_expectation = elo::expected_score(home.elo, away.elo);
    let quality = elo::quality_factor(home.elo, away.elo);

    let xg_ratio_home = home.avg_goals / home.xg_for.max(cal.xg_ratio_floor);
    let xg_ratio_away = away.avg_goals / away.xg_for.max(cal.xg_ratio_floor);
    let finishing_home = (1.0 - cal.xg_ratio_blend) + xg_ratio_home * cal.xg_ratio_blend;
    let finishing_away = (1.0 - cal.xg_ratio_blend) + xg_ratio_away * cal.xg_ratio_blend;

    let pressing_diff = home.pressing_intensity - away.pressing_intensity;
    let tactical_home = 1.0 + pressing_diff * cal.pressing_home;
    let tactical_away = 1.0 - pressing_diff * cal.pressing_away;

    let style = style_matchup(home, away, cal);
    let (style_home, style_away) = match style {
        StyleMatchup::AwayCounter => (cal.style.penalty, cal.style.boost),
        StyleMatchup::HomeCounter => (cal.style.boost, cal.style.penalty),
        StyleMatchup::Neutral => (1.0, 1.0),
    };

    let unclamped_home = base_home
        * (1.0 + quality * cal.quality_home)
        * form_factor
        * finishing_home
        * tactical_home
        * style_home
        * dampening(home, cal)
        * cal.tournament_home;
    let unclamped_away = base_away
        * (1.0 - quality * cal.quality_away)
        * (2.0 - form_factor)
        * finishing_away
        * tactical_away
        * style_away
        * dampening(away, cal)
        * cal.tournament_away;

    let (h_lo, h_hi) = cal.home_rate_range;
    let (a_lo, a_hi) = cal.away_rate_range;
    let rates = ExpectedGoalsPair::new(
        unclamped_home.clamp(h_lo, h_hi),
        unclamped_away.clamp(a_lo, a_hi),
    );

    debug!(
        home = %home.name,
        away = %away.name,
        lambda_home = rates.home,
        lambda_away = rates.away,
        quality,
        form_factor,
        ?style,
        "derived expected goals"
    );

    let breakdown = RateBreakdown {
        base_home,
        base_away,
        form_home,
        form_away,
        form_factor,
        elo_expectation,
        quality_factor: quality,
        xg_ratio_home,
        xg_ratio_away,
        pressing_diff,
        style,
        unclamped_home,
        unclamped_away,
    };
    (rates, breakdown)
}

fn style_matchup(home: &TeamProfile, away: &TeamProfile, cal: &Calibration) -> StyleMatchup {
    let rule = &cal.style;
    if away.counter_attack_rate > rule.counter_threshold
        && home.defensive_line_height > rule.line_threshold
    {
        StyleMatchup::AwayCounter
    } else if home.counter_attack_rate > rule.counter_threshold
        && away.defensive_line_height > rule.line_threshold
    {
        StyleMatchup::HomeCounter
    } else {
        StyleMatchup::Neutral
    }
}

fn dampening(team: &TeamProfile, cal: &Calibration) -> f64 {
    (1.0 - team.variance_index * cal.variance_damping) * (1.0 - team.injury_index * cal.injury_damping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teams;

    fn pair(home: &str, away: &str) -> (TeamProfile, TeamProfile) {
        let book = teams::builtin_book().unwrap();
        (
            book.get(home).unwrap().clone(),
            book.get(away).unwrap().clone(),
        )
    }

    #[test]
    fn recent_results_weigh_more() {
        let w = Calibration::default().form_weights;
        let won_last = form_score(&[0.0, 0.0, 0.0, 0.0, 1.0], &w);
        let won_first = form_score(&[1.0, 0.0, 0.0, 0.0, 0.0], &w);
        assert!(won_last > won_first);
        assert!((form_score(&[1.0; 5], &w) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stronger_side_gets_more_goals() {
        let (home, away) = pair("Nigeria", "Tanzania");
        let rates = derive_rates(&home, &away, &Calibration::default());
        assert!(rates.home > rates.away);
        assert!((rates.home - 1.3129).abs() < 1e-3);
        assert!((rates.away - 0.6006).abs() < 1e-3);
    }

    #[test]
    fn rates_stay_inside_clamp_ranges() {
        let cal = Calibration::default();
        let (mut home, mut away) = pair("Senegal", "Botswana");
        home.xg_for = 9.0;
        home.elo = 3000.0;
        away.defense_strength = 0.0;
        away.xg_for = 0.0;
        let rates = derive_rates(&home, &away, &cal);
        assert_eq!(rates.home, cal.home_rate_range.1);
        assert_eq!(rates.away, cal.away_rate_range.0);
    }

    #[test]
    fn counter_attack_into_high_line_swings_rates() {
        let cal = Calibration::default();
        let (mut home, mut away) = pair("Congo DR", "Benin");
        home.defensive_line_height = 0.40;
        let (_, plain) = derive_rates_detailed(&home, &away, &cal);
        assert_eq!(plain.style, StyleMatchup::Neutral);

        home.defensive_line_height = 0.50;
        away.counter_attack_rate = 0.70;
        let (_, swung) = derive_rates_detailed(&home, &away, &cal);
        assert_eq!(swung.style, StyleMatchup::AwayCounter);
    }

    #[test]
    fn injuries_reduce_own_rate() {
        let cal = Calibration::default();
        let (mut home, away) = pair("Congo DR", "Benin");
        let before = derive_rates(&home, &away, &cal);
        home.injury_index = 0.9;
        let after = derive_rates(&home, &away, &cal);
        assert!(after.home < before.home);
        assert_eq!(after.away, before.away);
    }
}
