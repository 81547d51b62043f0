use mmgrade_core::{parse_choices, AnswerIndexing};
use mmgrade_extract::AnswerExtractor;
use mmgrade_table::{cell_as_index, Table, TableError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a table is scored: where responses, ground truth, and choices
/// live, and which indexing convention the ground truth uses.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Column holding the transcript. `None` means the table's last
    /// column.
    pub response_column: Option<String>,
    /// Column holding the ground-truth answer index (used by
    /// [`score_table`] and column-mode [`score_all`]).
    pub answer_column: String,
    /// Column holding the per-row choice list, if any.
    pub choices_column: Option<String>,
    pub indexing: AnswerIndexing,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            response_column: None,
            answer_column: "answer".to_string(),
            choices_column: None,
            indexing: AnswerIndexing::ZeroBased,
        }
    }
}

/// Summary counters for one scored table. Derived rates are computed on
/// demand and undefined for empty tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Rows in the table.
    pub rows: usize,
    /// Rows whose extracted letter matched the ground truth.
    pub correct: usize,
    /// Rows where reasoning text was recovered, regardless of correctness.
    pub with_reasoning: usize,
    /// Rows excluded from the correctness comparison because their
    /// ground-truth cell was missing or not an integer.
    pub rows_skipped: usize,
}

impl TableSummary {
    pub fn accuracy(&self) -> Option<f64> {
        (self.rows > 0).then(|| self.correct as f64 / self.rows as f64)
    }

    pub fn reasoning_rate(&self) -> Option<f64> {
        (self.rows > 0).then(|| self.with_reasoning as f64 / self.rows as f64)
    }
}

/// Where ground truth comes from in a batch run.
#[derive(Debug, Clone)]
pub enum GroundTruth {
    /// Each table carries its own answer column (`ScoreOptions::answer_column`).
    Column,
    /// One external series, row-aligned with every table.
    Series(Vec<Value>),
}

/// Batch result: summaries for the tables that scored, and the one-line
/// reason for each table that did not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub summaries: BTreeMap<String, TableSummary>,
    pub skipped: BTreeMap<String, String>,
}

fn response_column<'a>(table: &'a Table, opts: &'a ScoreOptions) -> Result<&'a str, TableError> {
    match &opts.response_column {
        Some(column) => Ok(column),
        None => table
            .headers()
            .last()
            .map(String::as_str)
            .ok_or_else(|| TableError::MissingColumn {
                table: table.name().to_string(),
                column: "(last column)".to_string(),
            }),
    }
}

/// Score one table against an external row-aligned ground-truth series.
///
/// Pure fold over the rows: extraction runs on every response cell; the
/// recovered letter is indexed under `opts.indexing` and compared to the
/// row's ground-truth integer. Rows without a usable ground-truth value
/// are counted in `rows_skipped` and compared to nothing; a malformed
/// row never interrupts the pass.
pub fn score_with_series(
    extractor: &AnswerExtractor,
    table: &Table,
    truth: &[Value],
    opts: &ScoreOptions,
) -> Result<TableSummary, TableError> {
    let responses = table.column(response_column(table, opts)?)?;
    let choices = opts
        .choices_column
        .as_deref()
        .map(|column| table.column(column))
        .transpose()?;

    let mut summary = TableSummary {
        rows: responses.len(),
        ..TableSummary::default()
    };

    for (row, response) in responses.iter().enumerate() {
        let row_choices = choices.map(|col| parse_choices(&col[row]));
        let extraction = extractor.extract_cell(response, row_choices.as_deref());

        if extraction.reasoning.is_some() {
            summary.with_reasoning += 1;
        }

        let Some(expected) = truth.get(row).and_then(cell_as_index) else {
            summary.rows_skipped += 1;
            continue;
        };
        if let Some(letter) = extraction.letter {
            if opts.indexing.letter_index(letter) == expected {
                summary.correct += 1;
            }
        }
    }

    Ok(summary)
}

/// Score one table whose ground truth lives in its own answer column.
pub fn score_table(
    extractor: &AnswerExtractor,
    table: &Table,
    opts: &ScoreOptions,
) -> Result<TableSummary, TableError> {
    let truth = table.column(&opts.answer_column)?;
    score_with_series(extractor, table, truth, opts)
}

/// Score every table in a batch. A table that fails (missing column) is
/// reported once under `skipped`; the remaining tables still score.
pub fn score_all(
    extractor: &AnswerExtractor,
    tables: &BTreeMap<String, Table>,
    truth: &GroundTruth,
    opts: &ScoreOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    for (name, table) in tables {
        let result = match truth {
            GroundTruth::Column => score_table(extractor, table, opts),
            GroundTruth::Series(series) => score_with_series(extractor, table, series, opts),
        };
        match result {
            Ok(summary) => {
                report.summaries.insert(name.clone(), summary);
            }
            Err(err) => {
                tracing::warn!(table = %name, "not scored: {err}");
                report.skipped.insert(name.clone(), err.to_string());
            }
        }
    }
    report
}
