use logos::Logos;

/// Tokens of verbatim and code commands. The three classes cover every
/// character, so concatenating the slices gives back the input.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeToken {
	#[regex(r"\w+")]
	Ident,

	#[regex(r"[^\w\s]+")]
	Punctuation,

	#[regex(r"\s+")]
	Separator,
}
