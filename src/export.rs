use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::estimator::Prediction;

pub struct ExportReport {
    pub fixtures: usize,
    pub grid_sheets: usize,
}

/// One summary sheet plus a score grid (percent) per fixture.
pub fn export_predictions(path: &Path, predictions: &[Prediction]) -> Result<ExportReport> {
    let mut summary_rows = vec![vec![
        "Match".to_string(),
        "Predicted".to_string(),
        "Confidence %".to_string(),
        "xG Home".to_string(),
        "xG Away".to_string(),
        "Home Win %".to_string(),
        "Draw %".to_string(),
        "Away Win %".to_string(),
        "Over 2.5 %".to_string(),
        "BTTS %".to_string(),
    ]];
    for p in predictions {
        let r = &p.result;
        summary_rows.push(vec![
            p.label(),
            r.most_likely.to_string(),
            format!("{:.2}", r.confidence * 100.0),
            format!("{:.2}", p.rates.home),
            format!("{:.2}", p.rates.away),
            format!("{:.2}", r.outcomes.home_win * 100.0),
            format!("{:.2}", r.outcomes.draw * 100.0),
            format!("{:.2}", r.outcomes.away_win * 100.0),
            format!("{:.2}", r.markets.over_2_5 * 100.0),
            format!("{:.2}", r.markets.both_teams_score * 100.0),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &summary_rows)?;
    }
    for (idx, p) in predictions.iter().enumerate() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(format!("Grid {}", idx + 1))?;
        write_grid(sheet, p)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        fixtures: predictions.len(),
        grid_sheets: predictions.len(),
    })
}

fn write_grid(worksheet: &mut Worksheet, p: &Prediction) -> Result<()> {
    let title = format!("{} (rows) vs {} (cols)", p.home.name, p.away.name);
    worksheet
        .write_string(0, 0, &title)
        .context("write grid title")?;
    for goals in 0..p.matrix.side() {
        let col = goals as u16 + 1;
        worksheet
            .write_number(1, col, goals as f64)
            .with_context(|| format!("write away header {goals}"))?;
        worksheet
            .write_number(goals as u32 + 2, 0, goals as f64)
            .with_context(|| format!("write home header {goals}"))?;
    }
    for (h, a, prob) in p.matrix.cells() {
        worksheet
            .write_number(h as u32 + 2, a as u16 + 1, (prob * 10_000.0).round() / 100.0)
            .with_context(|| format!("write cell ({h},{a})"))?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
