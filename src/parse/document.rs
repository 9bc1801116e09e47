//! Top-level scanner. Finds `\keyword[options]{content}` occurrences in the
//! escaped source and hands each one to the command parser; prose between
//! commands becomes an implicit `cloze`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, trace};

use crate::{error::{ProbeError, Result}, escape::{escape, strip_comments, unescape}, parse::command::{parse_command, parse_content}, types::{node::{ClassCommand, ClassKind, Command, Document, Node}, options::OptionSet}};

static COMMAND: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\\([A-Za-z]+)(\[[^\]]*\])?(\{[^}]*\})?").unwrap());

fn line_of(text: &str, offset: usize) -> usize { text[..offset].matches('\n').count() + 1 }

#[instrument(skip(source), fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Document> {
	let text = escape(&strip_comments(source));
	let mut document = Document::default();
	let mut position = 0;

	for captures in COMMAND.captures_iter(&text) {
		let Some(whole) = captures.get(0) else { continue };

		push_prose(&mut document, &text, position, whole.start())?;
		position = whole.end();

		let keyword = &captures[1];
		let line = line_of(&text, whole.start());
		let command = Command::from_keyword(keyword).ok_or_else(|| {
			ProbeError::syntax(format!("unknown command '\\{keyword}'"), unescape(whole.as_str()))
				.at_line(line)
		})?;

		let options = captures.get(2).map(|m| m.as_str());
		let content = captures.get(3);
		let content_line = content.map_or(line, |m| line_of(&text, m.start()));

		trace!("Command \\{} at line {}", keyword, line);
		let node = parse_command(command, options, content.map(|m| m.as_str()), content_line)
			.map_err(|e| e.at_line(line))?;
		document.nodes.push(node);
	}

	push_prose(&mut document, &text, position, text.len())?;

	info!("Parsed {} nodes", document.nodes.len());
	Ok(document)
}

/// Wraps `text[start..end]` in an implicit cloze unless it is blank.
fn push_prose(document: &mut Document, text: &str, start: usize, end: usize) -> Result<()> {
	let prose = &text[start..end];
	if prose.trim().is_empty() {
		return Ok(());
	}

	let kind = ClassKind::Cloze;
	let mut class =
		ClassCommand { kind, options: OptionSet::new(Command::Class(kind)), blocks: Vec::new() };
	parse_content(&mut class, prose, line_of(text, start))?;

	if class.blocks.is_empty() {
		return Ok(());
	}
	debug!("Implicit cloze with {} blocks", class.blocks.len());
	document.nodes.push(Node::Class(class));
	Ok(())
}
