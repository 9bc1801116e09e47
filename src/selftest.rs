//! Checks run by `probe --test` against the installed binary, so a broken
//! build can be spotted without the source tree.

use tracing::{info, warn};

use crate::{corpus::Corpus, error::ProbeError, escape::{escape, unescape}, export::export, extract_items, parse::parse, types::item::OutputItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
	pub name:   &'static str,
	pub passed: bool,
	pub detail: String,
}

type Check = fn() -> std::result::Result<(), String>;

const CHECKS: &[(&str, Check)] = &[
	("escape round trip", escape_round_trip),
	("ask all and ask marked", ask_counts),
	("marked span hints", marked_span_hints),
	("section prefix", section_prefix),
	("tabbed blocks", tabbed_blocks),
	("two-line export", two_line_export),
	("unknown command", unknown_command),
];

pub fn run() -> Vec<CheckOutcome> {
	CHECKS
		.iter()
		.map(|&(name, check)| {
			let outcome = match check() {
				Ok(()) => CheckOutcome { name, passed: true, detail: String::new() },
				Err(detail) => CheckOutcome { name, passed: false, detail },
			};
			if outcome.passed {
				info!("check '{}' passed", name);
			} else {
				warn!("check '{}' failed: {}", name, outcome.detail);
			}
			outcome
		})
		.collect()
}

fn items(source: &str) -> std::result::Result<Vec<OutputItem>, String> {
	extract_items(source, "", &Corpus::disabled()).map_err(|e| e.to_string())
}

fn expect<T: PartialEq + std::fmt::Debug>(what: &str, got: T, want: T) -> std::result::Result<(), String> {
	if got == want { Ok(()) } else { Err(format!("{what}: expected {want:?}, got {got:?}")) }
}

fn escape_round_trip() -> std::result::Result<(), String> {
	let samples = [r"\| \\ \/ \{ \} \? \!", r"a\\|b|", "\u{E000}\u{E007}", "% not \\", ""];
	for sample in samples {
		expect("unescape(escape(s))", unescape(&escape(sample)).as_str(), sample)?;
	}
	Ok(())
}

fn ask_counts() -> std::result::Result<(), String> {
	expect("ask=all items", items(r"\cloze[ask=all]{one two three}")?.len(), 3)?;
	expect("ask=marked items", items(r"\cloze{one |two| three}")?.len(), 1)
}

fn marked_span_hints() -> std::result::Result<(), String> {
	let items = items(r"\cloze{The |capital?is France!Paris| of France.}")?;
	expect("item count", items.len(), 1)?;
	let item = &items[0];
	expect("answer", item.answer.as_str(), "Paris")?;
	expect("question hint", item.question_hint.as_str(), "capital")?;
	expect("answer hint", item.answer_hint.as_str(), "is France")?;
	expect("question has a gap", item.question.contains("..."), true)
}

fn section_prefix() -> std::result::Result<(), String> {
	let items = items("\\section{Europe}\n\\cloze{|Paris| and |Rome|}")?;
	expect("item count", items.len(), 2)?;
	expect("prefixes", items.iter().all(|i| i.prefix.starts_with("Europe: ")), true)
}

fn tabbed_blocks() -> std::result::Result<(), String> {
	let document = parse("\\tabbed{cat\tchat\ndog\tchien}").map_err(|e| e.to_string())?;
	expect("nodes", document.nodes.len(), 1)?;
	expect("items", items("\\tabbed{cat\tchat\ndog\tchien}")?.len(), 4)
}

fn two_line_export() -> std::result::Result<(), String> {
	let item = OutputItem {
		prefix: "P: ".to_string(),
		question: "first\nsecond".to_string(),
		answer: "x".to_string(),
		..Default::default()
	};
	expect("export", export(&[item]).as_str(), "q: P: \nq: first\nq: second\na: x\n\n")
}

fn unknown_command() -> std::result::Result<(), String> {
	match parse(r"\unknownthing{x}") {
		Err(ProbeError::Syntax { .. }) => Ok(()),
		other => Err(format!("expected a syntax error, got {other:?}")),
	}
}
