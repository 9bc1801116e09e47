//! Reversible protection of escaped markup characters.
//!
//! The scanners downstream work on regexes that know nothing about
//! backslashes, so every `\|`, `\\`, `\/`, `\{`, `\}`, `\?` and `\!` is swapped
//! for a private-use placeholder before scanning and swapped back afterwards.

/// Characters that may follow a backslash to lose their markup meaning.
pub const SPECIALS: [char; 7] = ['|', '\\', '/', '{', '}', '?', '!'];

const PLACEHOLDERS: [char; 7] =
	['\u{E000}', '\u{E001}', '\u{E002}', '\u{E003}', '\u{E004}', '\u{E005}', '\u{E006}'];

// Precedes a literal private-use character that would otherwise be read back
// as a placeholder.
const SHIELD: char = '\u{E007}';

fn special_index(c: char) -> Option<usize> { SPECIALS.iter().position(|s| *s == c) }

fn placeholder_index(c: char) -> Option<usize> { PLACEHOLDERS.iter().position(|p| *p == c) }

fn is_reserved(c: char) -> bool { ('\u{E000}'..=SHIELD).contains(&c) }

pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	let mut chars = text.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' {
			if let Some(index) = chars.peek().copied().and_then(special_index) {
				chars.next();
				escaped.push(PLACEHOLDERS[index]);
				continue;
			}
		}

		if is_reserved(c) {
			escaped.push(SHIELD);
		}
		escaped.push(c);
	}

	escaped
}

pub fn unescape(text: &str) -> String {
	let mut plain = String::with_capacity(text.len());
	let mut chars = text.chars();

	while let Some(c) = chars.next() {
		if c == SHIELD {
			if let Some(literal) = chars.next() {
				plain.push(literal);
			}
		} else if let Some(index) = placeholder_index(c) {
			plain.push('\\');
			plain.push(SPECIALS[index]);
		} else {
			plain.push(c);
		}
	}

	plain
}

/// Deletes every run from an unescaped `%` to the end of its line. The line
/// break stays so line numbers keep pointing at the original source.
pub fn strip_comments(text: &str) -> String {
	let mut stripped = String::with_capacity(text.len());
	let mut chars = text.chars();

	while let Some(c) = chars.next() {
		match c {
			'\\' => {
				stripped.push(c);
				if let Some(next) = chars.next() {
					stripped.push(next);
				}
			}
			'%' => {
				for rest in chars.by_ref() {
					if rest == '\n' {
						stripped.push('\n');
						break;
					}
				}
			}
			_ => stripped.push(c),
		}
	}

	stripped
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rstest::rstest;

	use super::*;

	#[test]
	fn escaped_text_hides_markup() {
		let escaped = escape(r"a \| b \{c\} \/d\/ e\? f\! g\\");
		for markup in ['|', '{', '}', '/', '?', '!', '\\'] {
			assert!(!escaped.contains(markup), "{markup} survived in {escaped:?}");
		}
	}

	#[test]
	fn unescaped_markup_is_left_alone() {
		assert_eq!(escape(r"\cloze{a |b| c}"), r"\cloze{a |b| c}");
	}

	#[test]
	fn double_backslash_is_consumed_before_the_next_special() {
		// `\\|` is an escaped backslash followed by a live pipe
		let escaped = escape(r"\\|");
		assert!(escaped.ends_with('|'));
		assert_eq!(unescape(&escaped), r"\\|");
	}

	#[rstest]
	#[case(r"\| \\ \/ \{ \} \? \!")]
	#[case(r"\|\\\/\{\}\?\!")]
	#[case("trailing backslash \\")]
	#[case("\u{E000} literal placeholder \u{E007}\u{E003}")]
	#[case("")]
	fn round_trips_fixed_cases(#[case] input: &str) {
		assert_eq!(unescape(&escape(input)), input);
	}

	proptest! {
		#[test]
		fn round_trips_any_string(input in any::<String>()) {
			prop_assert_eq!(unescape(&escape(&input)), input);
		}

		#[test]
		fn round_trips_markup_heavy_strings(input in r"[\\|/{}?!% a-z\u{E000}-\u{E007}]{0,40}") {
			prop_assert_eq!(unescape(&escape(&input)), input);
		}
	}

	#[rstest]
	#[case("text % comment\nmore", "text \nmore")]
	#[case("% whole line\nnext", "\nnext")]
	#[case(r"100\% sure", r"100\% sure")]
	#[case("no newline % at end", "no newline ")]
	#[case(r"\\% comment after escaped backslash", r"\\")]
	fn strips_comments(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(strip_comments(input), expected);
	}
}
