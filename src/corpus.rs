//! Common-word lookup backed by a frequency store.

use std::{collections::HashSet, path::PathBuf};

use once_cell::unsync::OnceCell;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info, instrument};

use crate::{error::{ProbeError, Result}, frequency::normalize_word, types::config::CorpusConfig};

#[derive(Debug)]
enum Source {
	Disabled,
	Store(PathBuf),
	Preloaded,
}

/// Answers whether a word is too common to be worth asking. The store is read
/// once, on the first query, and the answer set is kept for the rest of the run.
#[derive(Debug)]
pub struct Corpus {
	source:       Source,
	ignore_level: u32,
	words:        OnceCell<HashSet<String>>,
}

impl Corpus {
	pub fn disabled() -> Self {
		Self { source: Source::Disabled, ignore_level: 0, words: OnceCell::new() }
	}

	pub fn from_config(config: &CorpusConfig) -> Self {
		if !config.enabled {
			return Self::disabled();
		}
		Self {
			source:       Source::Store(config.path.clone()),
			ignore_level: config.ignore_level,
			words:        OnceCell::new(),
		}
	}

	/// A corpus that ignores exactly `words`, without any store behind it.
	pub fn from_words<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let set = words.into_iter().map(|w| normalize_word(w.as_ref())).collect();
		Self { source: Source::Preloaded, ignore_level: 0, words: OnceCell::with_value(set) }
	}

	pub fn is_enabled(&self) -> bool { !matches!(self.source, Source::Disabled) }

	pub fn is_ignored(&self, word: &str) -> Result<bool> {
		if !self.is_enabled() {
			return Ok(false);
		}
		let words = self.words.get_or_try_init(|| self.load())?;
		Ok(words.contains(&normalize_word(word)))
	}

	#[instrument(skip(self))]
	fn load(&self) -> Result<HashSet<String>> {
		let Source::Store(path) = &self.source else {
			return Ok(HashSet::new());
		};

		let unavailable =
			|source: rusqlite::Error| ProbeError::CorpusUnavailable { path: path.clone(), source };

		let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(unavailable)?;
		debug!("Opened corpus {:?}", path);

		let mut stmt =
			conn.prepare("SELECT WORD FROM TFREQ WHERE POSITION_LVL <= ?1").map_err(unavailable)?;
		let words = stmt
			.query_map(params![self.ignore_level], |row| row.get::<_, String>(0))?
			.collect::<std::result::Result<HashSet<_>, _>>()?;

		info!("Loaded {} common words up to level {}", words.len(), self.ignore_level);
		Ok(words)
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;
	use crate::frequency::FrequencyStore;

	#[test]
	fn disabled_corpus_ignores_nothing() {
		let corpus = Corpus::disabled();
		assert!(!corpus.is_ignored("the").unwrap());
	}

	#[test]
	fn disabled_config_never_opens_the_store() {
		let config = CorpusConfig { enabled: false, path: "/does/not/exist.db".into(), ignore_level: 2 };
		assert!(!Corpus::from_config(&config).is_ignored("the").unwrap());
	}

	#[test]
	fn preloaded_words_are_normalized() {
		let corpus = Corpus::from_words([" The ", "OF"]);
		assert!(corpus.is_ignored("the").unwrap());
		assert!(corpus.is_ignored("Of ").unwrap());
		assert!(!corpus.is_ignored("capital").unwrap());
	}

	#[test]
	fn missing_store_is_fatal_when_enabled() {
		let dir = TempDir::new().unwrap();
		let config =
			CorpusConfig { enabled: true, path: dir.path().join("absent.db"), ignore_level: 2 };
		let err = Corpus::from_config(&config).is_ignored("the").unwrap_err();
		assert!(matches!(err, ProbeError::CorpusUnavailable { .. }));
	}

	#[test]
	fn store_words_up_to_the_level_are_ignored() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("corpus.db");

		let store = FrequencyStore::open(&path).unwrap();
		store
			.batch(false, |store| {
				store.import_word("common", 5000)?;
				for i in 0..1500 {
					store.import_word(&format!("filler{i:04}"), 100)?;
				}
				store.import_word("rare", 1)?;
				Ok(1502)
			})
			.unwrap();
		drop(store);

		let config = CorpusConfig { enabled: true, path, ignore_level: 1 };
		let corpus = Corpus::from_config(&config);
		assert!(corpus.is_ignored("Common").unwrap());
		assert!(!corpus.is_ignored("rare").unwrap());
		assert!(!corpus.is_ignored("unknown").unwrap());
	}
}
