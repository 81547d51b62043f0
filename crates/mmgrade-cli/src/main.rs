mod cmd_annotate;
mod cmd_info;
mod cmd_inspect;
mod cmd_score;
mod tables;

use clap::{Args, Parser, Subcommand};
use mmgrade_core::AnswerIndexing;
use mmgrade_extract::ExtractOptions;
use mmgrade_score::ScoreOptions;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "mmgrade",
    version,
    about = "Score multimodal model transcripts against ScienceQA answers"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score transcript tables and print per-dataset statistics
    Score {
        /// CSV files or directories of CSV files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Reference CSV holding a row-aligned ground-truth series
        /// (overrides the per-table answer column)
        #[arg(long)]
        answers_file: Option<PathBuf>,
        /// Column to read from the reference CSV
        #[arg(long, default_value = "answer")]
        answers_column: String,
        #[command(flatten)]
        scoring: ScoringArgs,
        #[command(flatten)]
        extractor: ExtractorArgs,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tables with row counts and columns
    Info {
        /// CSV files or directories of CSV files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show one row's transcript split and its extraction
    Inspect {
        /// CSV file holding the table
        file: PathBuf,
        /// Row to inspect (0-based)
        #[arg(long, conflicts_with = "random")]
        row: Option<usize>,
        /// Pick a random row
        #[arg(long)]
        random: bool,
        #[command(flatten)]
        scoring: ScoringArgs,
        #[command(flatten)]
        extractor: ExtractorArgs,
    },
    /// Copy a CSV with extraction columns appended
    Annotate {
        /// Input CSV
        file: PathBuf,
        /// Output CSV
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        scoring: ScoringArgs,
        #[command(flatten)]
        extractor: ExtractorArgs,
    },
}

#[derive(Args, Debug)]
struct ScoringArgs {
    /// Transcript column (default: the last column of each table)
    #[arg(long)]
    response_column: Option<String>,
    /// Ground-truth answer column
    #[arg(long, default_value = "answer")]
    answer_column: String,
    /// Answer-choice list column
    #[arg(long)]
    choices_column: Option<String>,
    /// Ground-truth indexing convention: zero (A=0) or one (A=1)
    #[arg(long, default_value = "zero", value_parser = parse_indexing)]
    indexing: AnswerIndexing,
}

fn parse_indexing(raw: &str) -> Result<AnswerIndexing, String> {
    raw.parse()
}

impl ScoringArgs {
    fn options(&self) -> ScoreOptions {
        ScoreOptions {
            response_column: self.response_column.clone(),
            answer_column: self.answer_column.clone(),
            choices_column: self.choices_column.clone(),
            indexing: self.indexing,
        }
    }
}

#[derive(Args, Debug)]
struct ExtractorArgs {
    /// Literal marker separating the user prompt from the model reply
    #[arg(long, default_value = "Assistant:")]
    marker: String,
    /// Highest valid answer letter (inclusive, from A)
    #[arg(long, default_value_t = 'E')]
    letters: char,
    /// Discard reasoning spans of this many words or fewer
    #[arg(long, default_value_t = 10)]
    min_words: usize,
    /// Disable the standalone-letter pattern
    #[arg(long)]
    no_bare: bool,
    /// Disable the parenthesized-letter pattern
    #[arg(long)]
    no_paren: bool,
    /// Disable the choice-text fallback
    #[arg(long)]
    no_choice_text: bool,
}

impl ExtractorArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            marker: self.marker.clone(),
            last_letter: self.letters,
            bare_letter: !self.no_bare,
            paren_letter: !self.no_paren,
            choice_text: !self.no_choice_text,
            reasoning_min_words: self.min_words,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Score {
            paths,
            answers_file,
            answers_column,
            scoring,
            extractor,
            json,
        } => cmd_score::execute(&cmd_score::ScoreParams {
            paths: &paths,
            answers_file: answers_file.as_deref(),
            answers_column: &answers_column,
            options: scoring.options(),
            extract: extractor.options(),
            json,
        }),
        Command::Info { paths } => cmd_info::execute(&paths),
        Command::Inspect {
            file,
            row,
            random,
            scoring,
            extractor,
        } => cmd_inspect::execute(&cmd_inspect::InspectParams {
            file: &file,
            row,
            random,
            options: scoring.options(),
            extract: extractor.options(),
        }),
        Command::Annotate {
            file,
            output,
            scoring,
            extractor,
        } => cmd_annotate::execute(&cmd_annotate::AnnotateParams {
            input: &file,
            output: &output,
            options: scoring.options(),
            extract: extractor.options(),
        }),
    }
}
