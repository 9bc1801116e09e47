//! Per-command content parsing.
//!
//! Every class command is described by a [`Strategy`]: how its text breaks
//! into blocks, how a block breaks into words, and which markers flag words
//! as asked or ignored. Verbatim kinds bypass all of that and go through the
//! code lexer so that no character is lost.

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::{error::{ProbeError, Result}, escape::unescape, parse::{lexer::CodeToken, options::parse_options}, types::{node::{Block, ClassCommand, ClassKind, Command, Heading, Node, TokenKind, Word}, options::OptionSet}};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.?!]+").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TABS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+").unwrap());
static TERM_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*:\s*|\s+-\s+").unwrap());

// hint? hint! answer, where the answer may not contain a live `?` or `!`
static MARKED_SPAN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?s)^(?:([^?!]*)\?)?(?:([^?!]*)!)?([^?!]+)$").unwrap());

pub struct Markers {
	marked: char,
	span:   Lazy<Regex>,
}

static PROSE_MARKERS: Markers = Markers {
	marked: '|',
	span:   Lazy::new(|| Regex::new(r"\|[^|]*\||/[^/]*/").unwrap()),
};

/// How a class command's text is cut up.
pub struct Strategy {
	/// `None` keeps the whole text as one block.
	pub block_separator: Option<&'static Regex>,
	pub word_separator:  &'static Regex,
	pub markers:         Option<&'static Markers>,
	/// Lex into identifier/punctuation/separator tokens instead of words.
	pub tokenized:       bool,
}

pub fn strategy(kind: ClassKind) -> Strategy {
	let prose = |blocks: &'static Regex, words: &'static Regex| Strategy {
		block_separator: Some(blocks),
		word_separator:  words,
		markers:         Some(&PROSE_MARKERS),
		tokenized:       false,
	};

	match kind {
		ClassKind::Sentence | ClassKind::Cloze | ClassKind::Set => prose(&*SENTENCE_END, &*WHITESPACE),
		ClassKind::Paragraph => prose(&*LINE_BREAK, &*WHITESPACE),
		ClassKind::Tabbed => prose(&*LINE_BREAK, &*TABS),
		ClassKind::Definition => prose(&*LINE_BREAK, &*TERM_SEPARATOR),
		ClassKind::Verbatim | ClassKind::Code | ClassKind::PythonCode => Strategy {
			block_separator: None,
			word_separator:  &*WHITESPACE,
			markers:         None,
			tokenized:       true,
		},
	}
}

/// Strips exactly one `{` and one `}`.
fn strip_braces(content: &str) -> &str {
	let content = content.strip_prefix('{').unwrap_or(content);
	content.strip_suffix('}').unwrap_or(content)
}

fn line_at(text: &str, offset: usize) -> usize { text[..offset].matches('\n').count() }

/// Builds the node for one `\command[options]{content}` occurrence. `line` is
/// the source line the braces start on.
#[instrument(skip(options, content))]
pub fn parse_command(
	command: Command,
	options: Option<&str>,
	content: Option<&str>,
	line: usize,
) -> Result<Node> {
	let options = parse_options(command, options)?;
	let body = content.map(strip_braces).unwrap_or_default();

	let heading = |options: OptionSet| Heading { content: unescape(body).trim().to_string(), options };

	Ok(match command {
		Command::Title => Node::Title(heading(options)),
		Command::Section => Node::Section(heading(options)),
		Command::Subsection => Node::Subsection(heading(options)),
		Command::Class(kind) => {
			let mut class = ClassCommand { kind, options, blocks: Vec::new() };
			parse_content(&mut class, body, line)?;
			Node::Class(class)
		}
	})
}

/// Fills `class.blocks` from the unbraced, still escaped `body`.
pub fn parse_content(class: &mut ClassCommand, body: &str, line: usize) -> Result<()> {
	let strategy = strategy(class.kind);

	if strategy.tokenized {
		let block = tokenize(&unescape(body));
		if !block.is_empty() {
			class.blocks.push(block);
		}
		debug!("Tokenized {} into {} blocks", class.kind.keyword(), class.blocks.len());
		return Ok(());
	}

	for (offset, text) in split_blocks(body, &strategy) {
		let block = split_words(text, &strategy, line + line_at(body, offset))?;
		if !block.is_empty() {
			class.blocks.push(block);
		}
	}

	debug!("Parsed {} into {} blocks", class.kind.keyword(), class.blocks.len());
	Ok(())
}

/// Splits on the block separator, never inside a marked or ignored span.
/// Yields each block with its byte offset in `text`.
fn split_blocks<'t>(text: &'t str, strategy: &Strategy) -> Vec<(usize, &'t str)> {
	let Some(separator) = strategy.block_separator else {
		return vec![(0, text)];
	};

	let mut blocks = Vec::new();
	let mut start = 0;
	let mut position = 0;

	while let Some(found) = separator.find_at(text, position) {
		let span = strategy.markers.and_then(|markers| markers.span.find_at(text, position));

		match span {
			Some(span) if span.start() < found.start() => {
				position = span.end();
			}
			_ => {
				blocks.push((start, &text[start..found.start()]));
				start = found.end();
				position = found.end();
			}
		}
	}

	if start < text.len() {
		blocks.push((start, &text[start..]));
	}
	blocks
}

/// `line` is the source line `text` starts on.
fn split_words(text: &str, strategy: &Strategy, line: usize) -> Result<Block> {
	let mut block = Block::default();
	let push_plain = |block: &mut Block, plain: &str| {
		for token in strategy.word_separator.split(plain) {
			let token = unescape(token);
			if !token.trim().is_empty() {
				block.words.push(Word::plain(token));
			}
		}
	};

	let Some(markers) = strategy.markers else {
		push_plain(&mut block, text);
		return Ok(block);
	};

	let mut last = 0;
	for span in markers.span.find_iter(text) {
		push_plain(&mut block, &text[last..span.start()]);
		last = span.end();

		let raw = span.as_str();
		let inner = &raw[1..raw.len() - 1];
		if raw.starts_with(markers.marked) {
			let word = marked_word(inner, raw).map_err(|e| e.at_line(line + line_at(text, span.start())))?;
			block.words.push(word);
		} else {
			trace!("Ignored span {:?}", inner);
			block.words.push(Word::ignored(unescape(inner)));
		}
	}
	push_plain(&mut block, &text[last..]);

	Ok(block)
}

fn marked_word(inner: &str, raw: &str) -> Result<Word> {
	let captures = MARKED_SPAN.captures(inner).ok_or_else(|| {
		ProbeError::syntax(
			format!("malformed marked span '{}', expected |question?answer!text|", unescape(raw)),
			unescape(raw),
		)
	})?;

	let hint = |index: usize| {
		captures.get(index).map(|m| unescape(m.as_str()).trim().to_string()).unwrap_or_default()
	};

	Ok(Word::marked(unescape(&captures[3]).trim(), hint(1), hint(2)))
}

fn tokenize(text: &str) -> Block {
	let words = CodeToken::lexer(text)
		.spanned()
		.map(|(token, span)| {
			let kind = match token {
				Ok(CodeToken::Ident) => TokenKind::Ident,
				Ok(CodeToken::Separator) => TokenKind::Separator,
				Ok(CodeToken::Punctuation) | Err(_) => TokenKind::Punctuation,
			};
			Word::token(&text[span], kind)
		})
		.collect();

	Block { words }
}
