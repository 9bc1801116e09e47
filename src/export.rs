//! Question/answer text format.
//!
//! Every item is one paragraph closed by a blank line. Question lines start
//! with `q: `, answer lines with `a: `. A hint follows its side after a blank
//! marker line, ending in `?` for the question and `!` for the answer.

use std::fmt::Write;

use tracing::instrument;

use crate::{error::Result, types::item::OutputItem};

#[instrument(skip_all, fields(items = items.len()))]
pub fn export(items: &[OutputItem]) -> String {
	let mut out = String::new();
	for item in items {
		write_item(&mut out, item);
	}
	out
}

pub fn export_json(items: &[OutputItem]) -> Result<String> {
	let mut json = serde_json::to_string_pretty(items)?;
	json.push('\n');
	Ok(json)
}

fn write_item(out: &mut String, item: &OutputItem) {
	if item.question.contains('\n') {
		tagged(out, 'q', &item.prefix);
		for line in lines(&item.question) {
			tagged(out, 'q', line);
		}
	} else {
		tagged(out, 'q', &item.full_question());
	}
	hint(out, 'q', &item.question_hint, '?');

	for line in lines(&item.answer) {
		tagged(out, 'a', line);
	}
	hint(out, 'a', &item.answer_hint, '!');

	out.push('\n');
}

/// Source lines of a field, without an empty first or last line.
fn lines(text: &str) -> Vec<&str> {
	let mut lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
	if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
		lines.pop();
	}
	if lines.len() > 1 && lines.first().is_some_and(|l| l.is_empty()) {
		lines.remove(0);
	}
	lines
}

fn tagged(out: &mut String, tag: char, text: &str) {
	// Writing into a String cannot fail
	let _ = writeln!(out, "{tag}: {text}");
}

fn hint(out: &mut String, tag: char, hint: &str, terminator: char) {
	if hint.is_empty() {
		return;
	}
	tagged(out, tag, "");
	tagged(out, tag, &format!("{hint}{terminator}"));
}
