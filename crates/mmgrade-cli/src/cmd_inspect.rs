use mmgrade_core::parse_choices;
use mmgrade_extract::{AnswerExtractor, ExtractOptions};
use mmgrade_score::ScoreOptions;
use mmgrade_table::{cell_as_index, read_csv};
use rand::Rng;
use std::path::Path;

pub struct InspectParams<'a> {
    pub file: &'a Path,
    pub row: Option<usize>,
    pub random: bool,
    pub options: ScoreOptions,
    pub extract: ExtractOptions,
}

pub fn execute(params: &InspectParams<'_>) -> anyhow::Result<()> {
    let name = crate::tables::table_name(params.file);
    let table = read_csv(&name, params.file)?;
    if table.is_empty() {
        anyhow::bail!("table `{name}` has no rows");
    }

    let row = match (params.row, params.random) {
        (Some(row), _) => row,
        (None, true) => rand::thread_rng().gen_range(0..table.len()),
        (None, false) => anyhow::bail!("pass --row N or --random"),
    };

    let response_column = match &params.options.response_column {
        Some(column) => column.clone(),
        None => table
            .headers()
            .last()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("table `{name}` has no columns"))?,
    };
    let cell = table.cell(&response_column, row)?;

    println!("table: {name}   row: {row} of {}", table.len());
    println!();
    match cell.as_str() {
        Some(text) => match text.split_once(&params.extract.marker) {
            Some((user, reply)) => {
                println!("--- user ---");
                println!("{}", user.trim());
                println!();
                println!("--- assistant ---");
                println!("{}", reply.trim());
            }
            None => {
                println!("(no `{}` marker in this cell)", params.extract.marker);
                println!("{text}");
            }
        },
        None => println!("(non-string cell: {cell})"),
    }
    println!();

    let extractor = AnswerExtractor::new(&params.extract)?;
    let choices = params
        .options
        .choices_column
        .as_deref()
        .map(|column| table.cell(column, row))
        .transpose()?
        .map(parse_choices);
    let extraction = extractor.extract_cell(cell, choices.as_deref());

    match extraction.letter {
        Some(letter) => println!("extracted answer: {letter}"),
        None => println!("extracted answer: (none)"),
    }
    match &extraction.reasoning {
        Some(reasoning) => println!(
            "reasoning ({} words): {reasoning}",
            reasoning.split_whitespace().count()
        ),
        None => println!("reasoning: (none)"),
    }

    if let Ok(cell) = table.cell(&params.options.answer_column, row) {
        match cell_as_index(cell) {
            Some(index) => {
                let expected = params.options.indexing.index_letter(index);
                let label = expected
                    .map(|letter| letter.to_string())
                    .unwrap_or_else(|| format!("#{index}"));
                let verdict = match (expected, extraction.letter) {
                    (Some(expected), Some(got)) if expected == got => "match",
                    (_, Some(_)) => "mismatch",
                    (_, None) => "no answer",
                };
                println!("correct answer: {label} [{verdict}]");
            }
            None => println!("correct answer: (not an index: {cell})"),
        }
    }

    Ok(())
}
