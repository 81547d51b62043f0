use anyhow::Context;
use mmgrade_core::parse_choices_str;
use mmgrade_extract::{AnswerExtractor, ExtractOptions};
use mmgrade_score::ScoreOptions;
use mmgrade_table::cell_as_index;
use serde_json::Value;
use std::path::Path;

pub struct AnnotateParams<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub options: ScoreOptions,
    pub extract: ExtractOptions,
}

/// Copy the input CSV with `extracted_answer`, `reasoning`, and
/// `is_correct` columns appended. `is_correct` is empty when the row has
/// no usable ground truth or no extracted letter.
pub fn execute(params: &AnnotateParams<'_>) -> anyhow::Result<()> {
    let extractor = AnswerExtractor::new(&params.extract)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(params.input)
        .with_context(|| format!("open {}", params.input.display()))?;
    let headers = reader.headers()?.clone();

    let response_idx = match &params.options.response_column {
        Some(column) => headers
            .iter()
            .position(|h| h == column.as_str())
            .ok_or_else(|| anyhow::anyhow!("input has no column `{column}`"))?,
        None => headers
            .len()
            .checked_sub(1)
            .ok_or_else(|| anyhow::anyhow!("input has no columns"))?,
    };
    let answer_idx = headers
        .iter()
        .position(|h| h == params.options.answer_column);
    let choices_idx = params
        .options
        .choices_column
        .as_deref()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| anyhow::anyhow!("input has no column `{column}`"))
        })
        .transpose()?;

    let mut writer = csv::Writer::from_path(params.output)
        .with_context(|| format!("create {}", params.output.display()))?;
    let mut out_headers: Vec<String> = headers.iter().map(str::to_string).collect();
    out_headers.extend(["extracted_answer", "reasoning", "is_correct"].map(String::from));
    writer.write_record(&out_headers)?;

    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        let response = record.get(response_idx).unwrap_or("");
        let choices = choices_idx.map(|i| parse_choices_str(record.get(i).unwrap_or("")));
        let extraction = extractor.extract(response, choices.as_deref());

        let expected = answer_idx
            .and_then(|i| record.get(i))
            .and_then(|raw| cell_as_index(&Value::String(raw.to_string())));
        let is_correct = match (expected, extraction.letter) {
            (Some(expected), Some(letter)) => {
                Some(params.options.indexing.letter_index(letter) == expected)
            }
            _ => None,
        };

        let mut out: Vec<String> = record.iter().map(str::to_string).collect();
        out.push(
            extraction
                .letter
                .map(|letter| letter.to_string())
                .unwrap_or_default(),
        );
        out.push(extraction.reasoning.unwrap_or_default());
        out.push(match is_correct {
            Some(true) => "true".to_string(),
            Some(false) => "false".to_string(),
            None => String::new(),
        });
        writer.write_record(&out)?;
        rows += 1;
    }
    writer.flush()?;

    println!("annotated {rows} rows -> {}", params.output.display());
    Ok(())
}
