//! Walks a parsed document and turns its class commands into flashcards.

use tracing::{debug, info, instrument, trace};

use crate::{corpus::Corpus, error::Result, types::{item::OutputItem, node::{Block, ClassCommand, Document, Heading, Node, TokenKind, Word}, options::ASK_MARKED}};

const PROSE_GAP: &str = "...";
const VERBATIM_GAP: &str = "[...]";
const PREFIX_SEPARATOR: &str = ": ";

/// Heading state for one document. `title` starts out as the name of the
/// input, usually its file stem.
pub struct Processor<'c> {
	corpus:     &'c Corpus,
	title:      String,
	section:    String,
	subsection: String,
}

impl<'c> Processor<'c> {
	pub fn new(title: impl Into<String>, corpus: &'c Corpus) -> Self {
		Self { corpus, title: title.into(), section: String::new(), subsection: String::new() }
	}

	/// Colon-joined non-empty headings, always ending in `": "`.
	pub fn prefix(&self) -> String {
		let parts: Vec<&str> = [&self.title, &self.section, &self.subsection]
			.into_iter()
			.map(|s| s.trim())
			.filter(|s| !s.is_empty())
			.collect();

		let mut prefix = parts.join(PREFIX_SEPARATOR);
		prefix.push_str(PREFIX_SEPARATOR);
		prefix
	}

	#[instrument(skip_all, fields(nodes = document.nodes.len()))]
	pub fn process(&mut self, document: &Document) -> Result<Vec<OutputItem>> {
		let mut items = Vec::new();

		for node in &document.nodes {
			match node {
				Node::Title(heading) => self.title = heading_slot(heading),
				Node::Section(heading) => self.section = heading_slot(heading),
				Node::Subsection(heading) => self.subsection = heading_slot(heading),
				Node::Class(class) => self.process_class(class, &mut items)?,
			}
		}

		info!("Generated {} items", items.len());
		Ok(items)
	}

	fn process_class(&self, class: &ClassCommand, items: &mut Vec<OutputItem>) -> Result<()> {
		let prefix = self.prefix();
		let before = items.len();

		for block in &class.blocks {
			for index in self.select(class, block)? {
				let word = &block.words[index];
				items.push(OutputItem {
					prefix:        prefix.clone(),
					question:      question(class, block, index),
					answer:        word.content.trim().to_string(),
					question_hint: word.question_hint.clone(),
					answer_hint:   word.answer_hint.clone(),
				});
			}
		}

		debug!("{} produced {} items", class.kind.keyword(), items.len() - before);
		Ok(())
	}

	/// Indices of the words to ask about, ascending.
	fn select(&self, class: &ClassCommand, block: &Block) -> Result<Vec<usize>> {
		if class.options.string("ask") == ASK_MARKED {
			return Ok(block.words.iter().enumerate().filter(|(_, w)| w.marked).map(|(i, _)| i).collect());
		}

		let min_length = class.options.integer("minlength");
		let use_corpus = self.corpus.is_enabled() && class.options.flag("corpus");

		let mut selected = Vec::new();
		for (index, word) in block.words.iter().enumerate() {
			if !askable(word, min_length) {
				continue;
			}
			if use_corpus && self.corpus.is_ignored(&word.content)? {
				trace!("Skipping common word {:?}", word.content);
				continue;
			}
			selected.push(index);
		}
		Ok(selected)
	}
}

fn heading_slot(heading: &Heading) -> String {
	let options = &heading.options;
	if options.flag("hidden") {
		return String::new();
	}
	let short = options.string("short");
	if short.is_empty() { heading.content.clone() } else { short }
}

fn askable(word: &Word, min_length: i64) -> bool {
	let content = word.content.trim();
	!word.ignored
		&& word.token_kind != TokenKind::Separator
		&& !content.is_empty()
		&& content.chars().count() as i64 >= min_length
}

/// The block with word `index` blanked out.
fn question(class: &ClassCommand, block: &Block, index: usize) -> String {
	if class.kind.is_verbatim() {
		return block
			.words
			.iter()
			.enumerate()
			.map(|(i, w)| if i == index { VERBATIM_GAP } else { w.content.as_str() })
			.collect();
	}

	block
		.words
		.iter()
		.enumerate()
		.map(|(i, w)| if i == index { PROSE_GAP } else { w.content.trim() })
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use crate::{export::export, parse::parse};

	fn items(source: &str) -> Vec<OutputItem> { items_with(source, &Corpus::disabled()) }

	fn items_with(source: &str, corpus: &Corpus) -> Vec<OutputItem> {
		let document = parse(source).unwrap();
		Processor::new("", corpus).process(&document).unwrap()
	}

	fn answers(items: &[OutputItem]) -> Vec<&str> { items.iter().map(|i| i.answer.as_str()).collect() }

	#[test]
	fn marked_word_with_hints() {
		let items = items(r"\cloze{The |capital?is France!Paris| of France.}");
		assert_eq!(items, vec![OutputItem {
			prefix:        PREFIX_SEPARATOR.to_string(),
			question:      "The ... of France".to_string(),
			answer:        "Paris".to_string(),
			question_hint: "capital".to_string(),
			answer_hint:   "is France".to_string(),
		}]);
	}

	#[rstest]
	#[case(r"\cloze[ask=all]{one two three four}", 4)]
	#[case(r"\cloze{one |two| three |four|}", 2)]
	#[case(r"\cloze{nothing marked here}", 0)]
	#[case(r"\set{one two /three/ four}", 3)]
	fn ask_selects_words(#[case] source: &str, #[case] expected: usize) {
		assert_eq!(items(source).len(), expected);
	}

	#[test]
	fn tabbed_asks_every_cell() {
		let items = items("\\tabbed{cat\tchat\ndog\tchien}");
		assert_eq!(answers(&items), vec!["cat", "chat", "dog", "chien"]);
		assert_eq!(items[0].question, "... chat");
		assert_eq!(items[3].question, "dog ...");
	}

	#[test]
	fn headings_build_the_prefix() {
		let items = items("\\section{Europe}\n\\cloze{|Paris| is big}\n\\subsection{Rivers}\n|Seine| flows");
		assert_eq!(items[0].prefix, "Europe: ");
		assert_eq!(items[1].prefix, "Europe: Rivers: ");
	}

	#[test]
	fn title_comes_first_and_starts_as_the_input_name() {
		let document = parse("|a| b\n\\section{S}\n|c| d\n\\title{Other}\n|e| f").unwrap();
		let corpus = Corpus::disabled();
		let items = Processor::new("notes", &corpus).process(&document).unwrap();
		let prefixes: Vec<_> = items.iter().map(|i| i.prefix.as_str()).collect();
		assert_eq!(prefixes, vec!["notes: ", "notes: S: ", "Other: S: "]);
	}

	#[test]
	fn hidden_and_short_headings() {
		let items = items(
			"\\title[short=Geo]{Geography of the world}\n\\section[hidden]{Drafts}\n|x| y",
		);
		assert_eq!(items[0].prefix, "Geo: ");
	}

	#[test]
	fn prefix_without_headings_is_still_terminated() {
		let items = items("|Paris| is big");
		assert_eq!(items[0].prefix, ": ");
		assert_eq!(export(&items), "q: : ... is big\na: Paris\n\n");
	}

	#[test]
	fn blank_headings_do_not_add_separators() {
		let items = items("\\section{ }\n\\subsection{Rivers}\n|Seine| flows");
		assert_eq!(items[0].prefix, "Rivers: ");
	}

	#[test]
	fn minlength_skips_short_answers() {
		let items = items(r"\set[minlength=3]{a bb ccc dddd}");
		assert_eq!(answers(&items), vec!["ccc", "dddd"]);
	}

	#[test]
	fn corpus_filters_common_words() {
		let corpus = Corpus::from_words(["the", "of"]);
		let items = items_with(r"\set{The capital of France}", &corpus);
		assert_eq!(answers(&items), vec!["capital", "France"]);
	}

	#[test]
	fn corpus_option_turns_filtering_off_per_command() {
		let corpus = Corpus::from_words(["the"]);
		let items = items_with(r"\set[corpus=no]{The end}", &corpus);
		assert_eq!(items.len(), 2);
	}

	#[test]
	fn corpus_never_filters_marked_words() {
		let corpus = Corpus::from_words(["the"]);
		let items = items_with(r"\cloze{|the| end}", &corpus);
		assert_eq!(answers(&items), vec!["the"]);
	}

	#[test]
	fn verbatim_questions_keep_layout() {
		let items = items("\\code[ask=marked]{x}\\verbatim{let x = 1;\nx}");
		assert_eq!(answers(&items), vec!["let", "x", "=", "1", ";", "x"]);
		assert_eq!(items[0].question, "[...] x = 1;\nx");
		assert_eq!(items[3].question, "let x = [...];\nx");
	}

	#[test]
	fn order_is_document_then_block_then_word() {
		let items = items("\\set{b1 b2. c1}\n\\set{d1}");
		assert_eq!(answers(&items), vec!["b1", "b2", "c1", "d1"]);
	}
}
