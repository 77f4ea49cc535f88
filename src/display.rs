use std::fmt;

use crate::calibration::Calibration;
use crate::estimator::Prediction;
use crate::metrics::TeamMetrics;
use crate::strength::StyleMatchup;

const RULE_WIDTH: usize = 100;

/// Console card for one fixture.
pub struct MatchCard<'a> {
    pub prediction: &'a Prediction,
    pub calibration: &'a Calibration,
}

pub fn render_prediction(p: &Prediction, cal: &Calibration) -> String {
    MatchCard {
        prediction: p,
        calibration: cal,
    }
    .to_string()
}

impl fmt::Display for MatchCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prediction;
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);
        let (home, away) = (&p.home, &p.away);
        let r = &p.result;

        writeln!(f, "{rule}")?;
        writeln!(f, "AFCON 2025 PREDICTION: {} vs {}", home.name, away.name)?;
        writeln!(f, "{rule}")?;

        let hm = TeamMetrics::derive(home, self.calibration);
        let am = TeamMetrics::derive(away, self.calibration);
        writeln!(f, "{:<25} {:<20} {:<20} {:<15}", "Metric", home.name, away.name, "Advantage")?;
        writeln!(f, "{thin}")?;
        let rows: [(&str, f64, f64, bool); 9] = [
            ("FIFA Rank", home.fifa_rank as f64, away.fifa_rank as f64, false),
            ("Elo Rating", home.elo, away.elo, true),
            ("Squad Value (EUR m)", home.squad_value_m_eur, away.squad_value_m_eur, true),
            ("Attack Strength", home.attack_strength, away.attack_strength, true),
            ("Defense Strength", home.defense_strength, away.defense_strength, true),
            ("Avg Goals", home.avg_goals, away.avg_goals, true),
            ("Form (weighted)", hm.form_score, am.form_score, true),
            ("Quality Index", hm.quality_index, am.quality_index, true),
            ("Tournament Exp.", home.tournament_experience, away.tournament_experience, true),
        ];
        for (label, h, a, higher_is_better) in rows {
            let adv = advantage(h, a, higher_is_better, &home.name, &away.name);
            writeln!(f, "{label:<25} {h:<20.2} {a:<20.2} {adv:<15}")?;
        }

        writeln!(f)?;
        writeln!(f, "Most likely score: {}", r.most_likely)?;
        writeln!(f, "Model confidence:  {:.2}%", r.confidence * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Expected goals:")?;
        writeln!(f, "   {}: {:.2}", home.name, p.rates.home)?;
        writeln!(f, "   {}: {:.2}", away.name, p.rates.away)?;
        writeln!(f)?;
        writeln!(f, "Match outcome probabilities:")?;
        writeln!(f, "   {} win: {:.2}%", home.name, r.outcomes.home_win * 100.0)?;
        writeln!(f, "   Draw: {:.2}%", r.outcomes.draw * 100.0)?;
        writeln!(f, "   {} win: {:.2}%", away.name, r.outcomes.away_win * 100.0)?;

        writeln!(f)?;
        writeln!(f, "Top {} scores:", r.top_scores.len())?;
        writeln!(f, "{:<8} {:<10} {:>12} {:>12} {:>10}", "Rank", "Score", "Probability", "Cumulative", "1 in X")?;
        for (idx, s) in r.top_scores.iter().enumerate() {
            writeln!(
                f,
                "{:<8} {:<10} {:>11.2}% {:>11.2}% {:>10}",
                idx + 1,
                s.score.to_string(),
                s.probability * 100.0,
                s.cumulative * 100.0,
                s.one_in
            )?;
        }

        let m = &r.markets;
        writeln!(f)?;
        writeln!(f, "Markets:")?;
        writeln!(f, "   {} clean sheet: {:.1}%", home.name, m.home_clean_sheet * 100.0)?;
        writeln!(f, "   {} clean sheet: {:.1}%", away.name, m.away_clean_sheet * 100.0)?;
        writeln!(f, "   Over 1.5 goals: {:.1}%", m.over_1_5 * 100.0)?;
        writeln!(f, "   Over 2.5 goals: {:.1}%", m.over_2_5 * 100.0)?;
        writeln!(f, "   Both teams score: {:.1}%", m.both_teams_score * 100.0)?;

        let b = &p.breakdown;
        writeln!(f)?;
        writeln!(f, "Key factors:")?;
        writeln!(f, "   Elo expectation: {:.1}% (quality {:+.2})", b.elo_expectation * 100.0, b.quality_factor)?;
        writeln!(f, "   Form: {:.2} vs {:.2} (factor {:.3})", b.form_home, b.form_away, b.form_factor)?;
        writeln!(f, "   Finishing vs xG: {:.2} vs {:.2}", b.xg_ratio_home, b.xg_ratio_away)?;
        writeln!(f, "   Pressing edge: {:+.2}", b.pressing_diff)?;
        let style = match b.style {
            StyleMatchup::Neutral => "no style edge".to_string(),
            StyleMatchup::HomeCounter => format!("{} counters into a high line", home.name),
            StyleMatchup::AwayCounter => format!("{} counters into a high line", away.name),
        };
        writeln!(f, "   Style: {style}")?;
        writeln!(f, "   Key players: {} vs {}", home.key_player, away.key_player)?;

        writeln!(f)?;
        writeln!(f, "Verdict: {}", verdict(p))?;
        writeln!(f, "{rule}")
    }
}

fn verdict(p: &Prediction) -> String {
    let o = &p.result.outcomes;
    let (fav, fav_p) = if o.home_win >= o.away_win {
        (&p.home.name, o.home_win)
    } else {
        (&p.away.name, o.away_win)
    };
    if fav_p > 0.60 {
        format!("{fav} are strong favourites")
    } else if fav_p > 0.45 {
        format!("{fav} are favourites, but it should be tight")
    } else {
        "competitive match with no clear favourite".to_string()
    }
}

fn advantage<'a>(h: f64, a: f64, higher_is_better: bool, home: &'a str, away: &'a str) -> &'a str {
    if (h - a).abs() < 1e-9 {
        return "Equal";
    }
    if (h > a) == higher_is_better { home } else { away }
}
