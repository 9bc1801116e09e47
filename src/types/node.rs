use crate::types::options::OptionSet;

/// Parsed note, in source order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
	pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Title(Heading),
	Section(Heading),
	Subsection(Heading),
	Class(ClassCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
	pub content: String,
	pub options: OptionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassCommand {
	pub kind:    ClassKind,
	pub options: OptionSet,
	pub blocks:  Vec<Block>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Block {
	pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
	pub content:       String,
	pub marked:        bool,
	pub ignored:       bool,
	pub question_hint: String,
	pub answer_hint:   String,
	pub token_kind:    TokenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Plain,
	Ident,
	Punctuation,
	Separator,
}

/// Commands whose braces hold quizzable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
	Sentence,
	Paragraph,
	Definition,
	Tabbed,
	Verbatim,
	Code,
	PythonCode,
	Cloze,
	Set,
}

/// Everything a `\keyword` can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
	Title,
	Section,
	Subsection,
	Class(ClassKind),
}

const KEYWORDS: [(&str, Command); 12] = [
	("title", Command::Title),
	("section", Command::Section),
	("subsection", Command::Subsection),
	("sentence", Command::Class(ClassKind::Sentence)),
	("paragraph", Command::Class(ClassKind::Paragraph)),
	("definition", Command::Class(ClassKind::Definition)),
	("tabbed", Command::Class(ClassKind::Tabbed)),
	("verbatim", Command::Class(ClassKind::Verbatim)),
	("code", Command::Class(ClassKind::Code)),
	("pythoncode", Command::Class(ClassKind::PythonCode)),
	("cloze", Command::Class(ClassKind::Cloze)),
	("set", Command::Class(ClassKind::Set)),
];

impl Command {
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		KEYWORDS.iter().find(|(name, _)| *name == keyword).map(|(_, command)| *command)
	}

	pub fn keyword(self) -> &'static str {
		KEYWORDS.iter().find(|(_, command)| *command == self).map_or("", |(name, _)| *name)
	}
}

impl ClassKind {
	pub fn keyword(self) -> &'static str { Command::Class(self).keyword() }

	/// Verbatim kinds keep every character, whitespace included.
	pub fn is_verbatim(self) -> bool {
		matches!(self, ClassKind::Verbatim | ClassKind::Code | ClassKind::PythonCode)
	}
}

impl Word {
	fn new(content: String, token_kind: TokenKind) -> Self {
		Self {
			content,
			marked: false,
			ignored: false,
			question_hint: String::new(),
			answer_hint: String::new(),
			token_kind,
		}
	}

	pub fn plain(content: impl Into<String>) -> Self { Self::new(content.into(), TokenKind::Plain) }

	pub fn marked(
		content: impl Into<String>,
		question_hint: impl Into<String>,
		answer_hint: impl Into<String>,
	) -> Self {
		Self {
			marked: true,
			question_hint: question_hint.into(),
			answer_hint: answer_hint.into(),
			..Self::plain(content)
		}
	}

	pub fn ignored(content: impl Into<String>) -> Self {
		Self { ignored: true, ..Self::plain(content) }
	}

	pub fn token(content: impl Into<String>, token_kind: TokenKind) -> Self {
		Self::new(content.into(), token_kind)
	}
}

impl Block {
	pub fn is_empty(&self) -> bool { self.words.is_empty() }

	/// Lossless for verbatim kinds, where separators are words too.
	pub fn concat(&self) -> String { self.words.iter().map(|w| w.content.as_str()).collect() }
}

impl Node {
	pub fn options(&self) -> &OptionSet {
		match self {
			Node::Title(heading) | Node::Section(heading) | Node::Subsection(heading) => {
				&heading.options
			}
			Node::Class(class) => &class.options,
		}
	}
}
