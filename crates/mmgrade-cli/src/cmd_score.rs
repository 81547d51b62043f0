use mmgrade_extract::{AnswerExtractor, ExtractOptions};
use mmgrade_score::{score_all, BatchReport, GroundTruth, ScoreOptions};
use mmgrade_table::read_csv;
use std::path::{Path, PathBuf};

pub struct ScoreParams<'a> {
    pub paths: &'a [PathBuf],
    pub answers_file: Option<&'a Path>,
    pub answers_column: &'a str,
    pub options: ScoreOptions,
    pub extract: ExtractOptions,
    pub json: bool,
}

pub fn execute(params: &ScoreParams<'_>) -> anyhow::Result<()> {
    let tables = crate::tables::load_tables(params.paths)?;
    if tables.is_empty() {
        anyhow::bail!("no csv tables found");
    }

    let extractor = AnswerExtractor::new(&params.extract)?;

    let truth = match params.answers_file {
        Some(path) => {
            let reference = read_csv(&crate::tables::table_name(path), path)?;
            GroundTruth::Series(reference.column(params.answers_column)?.to_vec())
        }
        None => GroundTruth::Column,
    };

    let report = score_all(&extractor, &tables, &truth, &params.options);

    if params.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    render(&report);
    Ok(())
}

fn render(report: &BatchReport) {
    println!(
        "{:<24} {:>6} {:>8} {:>9} {:>8} {:>9} {:>10}",
        "dataset", "rows", "correct", "reasoned", "skipped", "accuracy", "reasoned%"
    );
    for (name, summary) in &report.summaries {
        println!(
            "{:<24} {:>6} {:>8} {:>9} {:>8} {:>9} {:>10}",
            name,
            summary.rows,
            summary.correct,
            summary.with_reasoning,
            summary.rows_skipped,
            fmt_rate(summary.accuracy()),
            fmt_rate(summary.reasoning_rate()),
        );
    }
    if !report.skipped.is_empty() {
        println!();
        for (name, reason) in &report.skipped {
            println!("not scored: {name} ({reason})");
        }
    }
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => "n/a".to_string(),
    }
}
