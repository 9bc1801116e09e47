use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eyre::{WrapErr, bail};
use probe::{frequency::FrequencyStore, logging};
use tracing::info;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	/// Show the ranked words
	Print,
	/// Add words from a text (-t) or frequency (-f) file
	Import,
}

/// Maintains the word frequency store used to skip common words.
#[derive(Parser, Debug)]
#[command(name = "freq", version)]
struct Cli {
	#[arg(value_enum)]
	action: Action,

	/// Frequency store, created when missing
	db: PathBuf,

	/// Plain text file; every word counts once
	#[arg(short, long, conflicts_with = "frequency")]
	text: Option<PathBuf>,

	/// File of `word count` lines
	#[arg(short, long)]
	frequency: Option<PathBuf>,

	/// Rows to print
	#[arg(short, long, default_value_t = 100)]
	limit: usize,

	#[arg(short, long)]
	debug: bool,

	#[arg(short, long)]
	verbose: bool,

	/// Import inside a transaction that is rolled back
	#[arg(short, long)]
	pretend: bool,
}

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let cli = Cli::parse();
	logging::init(cli.debug, cli.verbose);

	let store = FrequencyStore::open(&cli.db)
		.wrap_err_with(|| format!("Failed to open frequency store {}", cli.db.display()))?;

	match cli.action {
		Action::Print => {
			for row in store.rows(cli.limit)? {
				let rank = |value: Option<i64>| value.map_or("-".to_string(), |v| v.to_string());
				println!(
					"WORD: {:<15} OCCUR: {:<8} POS: {:<5} POS_LVL: {:<5}",
					row.word,
					row.occur,
					rank(row.position),
					rank(row.position_lvl)
				);
			}
		}
		Action::Import => {
			let (path, is_text) = match (&cli.text, &cli.frequency) {
				(Some(path), _) => (path, true),
				(None, Some(path)) => (path, false),
				(None, None) => bail!("no import file specified, use -t or -f"),
			};

			info!("Importing words from {}", path.display());
			let content = fs_err::read_to_string(path)?;
			let count = store.batch(cli.pretend, |store| {
				if is_text { store.import_text(&content) } else { store.import_frequencies(&content) }
			})?;

			let suffix = if cli.pretend { " (pretend, rolled back)" } else { "" };
			println!("Imported {} words from {}{}", count, path.display(), suffix);
		}
	}

	Ok(())
}
