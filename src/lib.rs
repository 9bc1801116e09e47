use tracing::instrument;

use crate::{corpus::Corpus, error::Result, processor::Processor, types::item::OutputItem};

pub mod cards;
pub mod config_loader;
pub mod corpus;
pub mod error;
pub mod escape;
pub mod export;
pub mod frequency;
pub mod logging;
pub mod parse;
pub mod processor;
pub mod selftest;
pub mod types;

/// Parses `source` and generates its flashcards. `title` is the initial title
/// heading, usually the input's file stem.
#[instrument(skip(source, corpus))]
pub fn extract_items(source: &str, title: &str, corpus: &Corpus) -> Result<Vec<OutputItem>> {
	let document = parse::parse(source)?;
	Processor::new(title, corpus).process(&document)
}
