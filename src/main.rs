use std::path::{Path, PathBuf};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::Parser;
use eyre::{WrapErr, bail};
use probe::{cards::CardStore, config_loader::load_config, corpus::Corpus, error::ProbeError, export::{export, export_json}, extract_items, logging, selftest, types::config::OutputFormat};
use tracing::{debug, info};

/// Extracts question/answer flashcards from a marked-up note.
#[derive(Parser, Debug)]
#[command(name = "probe", version)]
struct Cli {
	/// Note to read
	input: Option<PathBuf>,

	/// Log everything down to debug events
	#[arg(short, long)]
	debug: bool,

	/// Log progress
	#[arg(short, long)]
	verbose: bool,

	/// Parse and count the cards without writing anything
	#[arg(short, long)]
	pretend: bool,

	/// Run the built-in checks and exit
	#[arg(short, long)]
	test: bool,

	/// Where to write the cards; defaults to the input with the configured extension
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Configuration file; defaults to ./probe.toml when present
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(short, long, value_enum)]
	format: Option<OutputFormat>,

	/// Card store to append the generated cards to
	#[arg(short, long)]
	store: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let cli = Cli::parse();
	logging::init(cli.debug, cli.verbose);

	if cli.test {
		return run_checks();
	}

	let Some(input) = cli.input.as_deref() else {
		bail!("no input file specified");
	};

	let mut config = load_config(cli.config.as_deref()).wrap_err("Failed to load configuration")?;
	if let Some(format) = cli.format {
		config.output.format = format;
	}
	debug!("Configuration: {:?}", config);

	let source =
		fs_err::read_to_string(input).wrap_err_with(|| format!("Failed to read {}", input.display()))?;
	let title = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
	let corpus = Corpus::from_config(&config.corpus);

	let items = match extract_items(&source, &title, &corpus) {
		Ok(items) => items,
		Err(err) => {
			report_in_source(input, &source, &err);
			return Err(err).wrap_err_with(|| format!("Failed to process {}", input.display()));
		}
	};

	if cli.pretend {
		println!("{} cards from {} (pretend, nothing written)", items.len(), input.display());
		return Ok(());
	}

	let rendered = match config.output.format {
		OutputFormat::Text => export(&items),
		OutputFormat::Json => export_json(&items)?,
	};

	// Output is written only after the store has committed
	if let Some(path) = cli.store.as_deref() {
		let store = CardStore::open(path).wrap_err("Failed to open card store")?;
		store.add_items(&items).wrap_err("Failed to store cards")?;
	}

	let output = cli.output.clone().unwrap_or_else(|| input.with_extension(&config.output.extension));
	fs_err::write(&output, rendered)?;
	info!("Wrote {} cards to {}", items.len(), output.display());

	Ok(())
}

fn run_checks() -> color_eyre::Result<()> {
	let outcomes = selftest::run();
	let failed = outcomes.iter().filter(|o| !o.passed).count();

	for outcome in &outcomes {
		if outcome.passed {
			println!("ok    {}", outcome.name);
		} else {
			println!("FAIL  {}: {}", outcome.name, outcome.detail);
		}
	}

	if failed > 0 {
		bail!("{} of {} checks failed", failed, outcomes.len());
	}
	println!("all {} checks passed", outcomes.len());
	Ok(())
}

/// Points at the offending line for errors that carry one.
fn report_in_source(path: &Path, source: &str, err: &ProbeError) {
	let Some(line) = err.line().filter(|line| *line > 0) else {
		return;
	};

	let name = path.display().to_string();
	let start: usize = source.split_inclusive('\n').take(line - 1).map(str::len).sum();
	let text = source.get(start..).and_then(|rest| rest.lines().next()).unwrap_or("");
	let span = err
		.fragment()
		.filter(|fragment| !fragment.is_empty())
		.and_then(|fragment| text.find(fragment).map(|at| start + at..start + at + fragment.len()))
		.unwrap_or(start..start + text.len());

	let label = match err {
		ProbeError::UnknownOption { command, .. } => format!("not an option of \\{command}"),
		_ => "here".to_string(),
	};

	let _ = Report::build(ReportKind::Error, (name.as_str(), span.clone()))
		.with_config(Config::default().with_index_type(IndexType::Byte))
		.with_message(err.to_string())
		.with_label(Label::new((name.as_str(), span)).with_message(label).with_color(Color::Red))
		.finish()
		.eprint((name.as_str(), Source::from(source)));
}
