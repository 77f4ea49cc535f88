use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::profile::{ProfileBook, TeamProfile};

static BOOK: OnceCell<ProfileBook> = OnceCell::new();

/// Built-in AFCON 2025 profile table, validated once on first use.
pub fn builtin_book() -> Result<&'static ProfileBook> {
    BOOK.get_or_try_init(|| ProfileBook::from_profiles(builtin_profiles()))
}

pub fn builtin_profiles() -> Vec<TeamProfile> {
    vec![
        TeamProfile {
            name: "Nigeria".to_string(),
            fifa_rank: 42,
            elo: 1680.0,
            team_strength_index: 0.72,
            attack_strength: 1.45,
            defense_strength: 1.08,
            avg_goals: 1.60,
            avg_conceded: 1.10,
            xg_for: 1.65,
            xg_against: 1.15,
            shots_per_match: 12.5,
            shots_on_target: 5.2,
            possession_pct: 52.3,
            pass_accuracy_pct: 83.7,
            form: [1.0, 0.5, 1.0, 0.0, 1.0],
            goals_last_5: 9,
            conceded_last_5: 5,
            clean_sheets_last_5: 2,
            squad_value_m_eur: 380.0,
            avg_player_rating: 7.1,
            players_top5_leagues: 12,
            avg_age: 26.2,
            injury_index: 0.12,
            star_dependency: 0.38,
            pressing_intensity: 0.62,
            defensive_line_height: 0.52,
            counter_attack_rate: 0.58,
            set_piece_goals_ratio: 0.32,
            coach_experience_years: 8.0,
            tournament_experience: 0.68,
            knockout_win_rate: 0.55,
            variance_index: 0.28,
            coach: "José Peseiro".to_string(),
            key_player: "Victor Osimhen".to_string(),
            style: "Fast, attacking, physical".to_string(),
            weakness: "Defensive consistency".to_string(),
        },
        TeamProfile {
            name: "Tanzania".to_string(),
            fifa_rank: 121,
            elo: 1480.0,
            team_strength_index: 0.48,
            attack_strength: 0.95,
            defense_strength: 1.25,
            avg_goals: 0.95,
            avg_conceded: 1.45,
            xg_for: 1.05,
            xg_against: 1.50,
            shots_per_match: 8.7,
            shots_on_target: 3.1,
            possession_pct: 41.8,
            pass_accuracy_pct: 76.4,
            form: [0.0, 0.5, 0.0, 1.0, 0.5],
            goals_last_5: 4,
            conceded_last_5: 8,
            clean_sheets_last_5: 1,
            squad_value_m_eur: 45.0,
            avg_player_rating: 6.4,
            players_top5_leagues: 2,
            avg_age: 27.8,
            injury_index: 0.22,
            star_dependency: 0.45,
            pressing_intensity: 0.42,
            defensive_line_height: 0.35,
            counter_attack_rate: 0.65,
            set_piece_goals_ratio: 0.25,
            coach_experience_years: 5.0,
            tournament_experience: 0.42,
            knockout_win_rate: 0.28,
            variance_index: 0.41,
            coach: "Adel Amrouche".to_string(),
            key_player: "Simon Msuva".to_string(),
            style: "Defensive, disciplined, counter-attack".to_string(),
            weakness: "Creativity in attack".to_string(),
        },
        TeamProfile {
            name: "Congo DR".to_string(),
            fifa_rank: 62,
            elo: 1620.0,
            team_strength_index: 0.64,
            attack_strength: 1.32,
            defense_strength: 1.10,
            avg_goals: 1.45,
            avg_conceded: 1.05,
            xg_for: 1.55,
            xg_against: 1.10,
            shots_per_match: 11.8,
            shots_on_target: 4.7,
            possession_pct: 48.5,
            pass_accuracy_pct: 82.3,
            form: [1.0, 0.5, 1.0, 1.0, 0.5],
            goals_last_5: 7,
            conceded_last_5: 4,
            clean_sheets_last_5: 2,
            squad_value_m_eur: 170.0,
            avg_player_rating: 6.9,
            players_top5_leagues: 7,
            avg_age: 26.8,
            injury_index: 0.15,
            star_dependency: 0.34,
            pressing_intensity: 0.58,
            defensive_line_height: 0.46,
            counter_attack_rate: 0.62,
            set_piece_goals_ratio: 0.28,
            coach_experience_years: 12.0,
            tournament_experience: 0.62,
            knockout_win_rate: 0.48,
            variance_index: 0.32,
            coach: "Sébastien Desabre".to_string(),
            key_player: "Yoane Wissa".to_string(),
            style: "Physical, direct".to_string(),
            weakness: "Inconsistent finishing".to_string(),
        },
        TeamProfile {
            name: "Benin".to_string(),
            fifa_rank: 88,
            elo: 1520.0,
            team_strength_index: 0.52,
            attack_strength: 1.05,
            defense_strength: 1.12,
            avg_goals: 1.10,
            avg_conceded: 1.30,
            xg_for: 1.18,
            xg_against: 1.32,
            shots_per_match: 9.4,
            shots_on_target: 3.5,
            possession_pct: 44.2,
            pass_accuracy_pct: 78.6,
            form: [0.5, 0.0, 1.0, 0.5, 0.0],
            goals_last_5: 5,
            conceded_last_5: 7,
            clean_sheets_last_5: 1,
            squad_value_m_eur: 50.0,
            avg_player_rating: 6.6,
            players_top5_leagues: 3,
            avg_age: 27.4,
            injury_index: 0.18,
            star_dependency: 0.42,
            pressing_intensity: 0.46,
            defensive_line_height: 0.38,
            counter_attack_rate: 0.68,
            set_piece_goals_ratio: 0.31,
            coach_experience_years: 20.0,
            tournament_experience: 0.55,
            knockout_win_rate: 0.36,
            variance_index: 0.38,
            coach: "Gernot Rohr".to_string(),
            key_player: "Steve Mounié".to_string(),
            style: "Defensive, counter-attack".to_string(),
            weakness: "Goal scoring".to_string(),
        },
        TeamProfile {
            name: "Senegal".to_string(),
            fifa_rank: 20,
            elo: 1750.0,
            team_strength_index: 0.78,
            attack_strength: 1.48,
            defense_strength: 0.95,
            avg_goals: 1.60,
            avg_conceded: 0.85,
            xg_for: 1.65,
            xg_against: 0.90,
            shots_per_match: 13.2,
            shots_on_target: 5.2,
            possession_pct: 52.8,
            pass_accuracy_pct: 84.6,
            form: [1.0, 1.0, 0.5, 1.0, 1.0],
            goals_last_5: 8,
            conceded_last_5: 3,
            clean_sheets_last_5: 3,
            squad_value_m_eur: 350.0,
            avg_player_rating: 7.2,
            players_top5_leagues: 15,
            avg_age: 27.1,
            injury_index: 0.12,
            star_dependency: 0.38,
            pressing_intensity: 0.62,
            defensive_line_height: 0.50,
            counter_attack_rate: 0.55,
            set_piece_goals_ratio: 0.30,
            coach_experience_years: 9.0,
            tournament_experience: 0.78,
            knockout_win_rate: 0.65,
            variance_index: 0.28,
            coach: "Aliou Cissé".to_string(),
            key_player: "Sadio Mané".to_string(),
            style: "Balanced, high intensity".to_string(),
            weakness: "Occasional creativity drop".to_string(),
        },
        TeamProfile {
            name: "Botswana".to_string(),
            fifa_rank: 147,
            elo: 1380.0,
            team_strength_index: 0.36,
            attack_strength: 0.85,
            defense_strength: 1.25,
            avg_goals: 0.85,
            avg_conceded: 1.65,
            xg_for: 0.90,
            xg_against: 1.70,
            shots_per_match: 7.8,
            shots_on_target: 2.6,
            possession_pct: 41.0,
            pass_accuracy_pct: 75.2,
            form: [0.0, 0.5, 0.0, 1.0, 0.0],
            goals_last_5: 3,
            conceded_last_5: 8,
            clean_sheets_last_5: 1,
            squad_value_m_eur: 18.0,
            avg_player_rating: 6.2,
            players_top5_leagues: 0,
            avg_age: 26.5,
            injury_index: 0.20,
            star_dependency: 0.46,
            pressing_intensity: 0.40,
            defensive_line_height: 0.34,
            counter_attack_rate: 0.70,
            set_piece_goals_ratio: 0.34,
            coach_experience_years: 7.0,
            tournament_experience: 0.22,
            knockout_win_rate: 0.18,
            variance_index: 0.45,
            coach: "Didier Gomes Da Rosa".to_string(),
            key_player: "Thapelo Kopelang".to_string(),
            style: "Low block, counter-attack".to_string(),
            weakness: "Defensive transitions".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_validates() {
        let book = builtin_book().unwrap();
        assert_eq!(book.len(), 6);
        assert_eq!(
            book.names(),
            vec!["Benin", "Botswana", "Congo DR", "Nigeria", "Senegal", "Tanzania"]
        );
    }

    #[test]
    fn builtin_book_is_shared() {
        let a = builtin_book().unwrap() as *const ProfileBook;
        let b = builtin_book().unwrap() as *const ProfileBook;
        assert_eq!(a, b);
    }
}
