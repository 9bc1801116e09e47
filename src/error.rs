use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Debug, Error)]
pub enum ProbeError {
	#[error("Syntax error at line {line}: {message}")]
	Syntax { line: usize, message: String, fragment: String },

	#[error("Unknown option '{name}' for \\{command} at line {line}")]
	UnknownOption { line: usize, command: &'static str, name: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("Corpus store {path:?} unavailable: {source}")]
	CorpusUnavailable { path: PathBuf, source: rusqlite::Error },

	#[error("Store error: {0}")]
	Store(#[from] rusqlite::Error),

	#[error("Unsupported card store version '{0}'")]
	StoreVersion(String),

	#[error("Card {0} not found")]
	CardNotFound(i64),

	#[error("Invalid configuration: {0}")]
	Config(#[from] toml::de::Error),

	#[error("JSON export failed: {0}")]
	Json(#[from] serde_json::Error),
}

impl ProbeError {
	pub fn syntax(message: impl Into<String>, fragment: impl Into<String>) -> Self {
		ProbeError::Syntax { line: 0, message: message.into(), fragment: fragment.into() }
	}

	/// Attaches a source line to errors raised below the document scanner,
	/// which is the only layer that knows where a command starts.
	pub fn at_line(self, at: usize) -> Self {
		match self {
			ProbeError::Syntax { line: 0, message, fragment } => {
				ProbeError::Syntax { line: at, message, fragment }
			}
			ProbeError::UnknownOption { line: 0, command, name } => {
				ProbeError::UnknownOption { line: at, command, name }
			}
			other => other,
		}
	}

	pub fn line(&self) -> Option<usize> {
		match self {
			ProbeError::Syntax { line, .. } | ProbeError::UnknownOption { line, .. } => Some(*line),
			_ => None,
		}
	}

	/// The piece of source text the error is about, if any.
	pub fn fragment(&self) -> Option<&str> {
		match self {
			ProbeError::Syntax { fragment, .. } => Some(fragment),
			ProbeError::UnknownOption { name, .. } => Some(name),
			_ => None,
		}
	}
}
