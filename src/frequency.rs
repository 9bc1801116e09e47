//! Word frequency store. Ranks words by how often they occur in imported text
//! and groups the ranks into levels of a thousand words each.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, params};
use tracing::{debug, info, instrument};

use crate::error::{ProbeError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS TFREQ (
	WORD         TEXT NOT NULL,
	OCCUR        INTEGER NOT NULL DEFAULT 0,
	POSITION     INTEGER,
	POSITION_LVL INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS XI_TFREQ_WORD ON TFREQ (WORD);
CREATE INDEX IF NOT EXISTS XI_TFREQ_LVL ON TFREQ (POSITION_LVL);
"#;

/// Words per position level.
pub const LEVEL_SIZE: i64 = 1000;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Form a word is stored and looked up in.
pub fn normalize_word(word: &str) -> String { word.trim().to_lowercase().replace('"', "'") }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqRow {
	pub word:         String,
	pub occur:        i64,
	pub position:     Option<i64>,
	pub position_lvl: Option<i64>,
}

pub struct FrequencyStore {
	conn: Connection,
}

impl FrequencyStore {
	#[instrument(skip(path), fields(path = %path.as_ref().display()))]
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let conn = Connection::open(path.as_ref())?;
		Self::init(conn)
	}

	pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

	fn init(conn: Connection) -> Result<Self> {
		conn.execute_batch(SCHEMA)?;
		Ok(Self { conn })
	}

	/// Adds `occur` occurrences of `word`. Blank words are skipped and reported
	/// as `false`.
	pub fn import_word(&self, word: &str, occur: i64) -> Result<bool> {
		let word = normalize_word(word);
		if word.is_empty() {
			return Ok(false);
		}

		self.conn.execute(
			"INSERT INTO TFREQ (WORD, OCCUR) VALUES (?1, ?2)
			 ON CONFLICT(WORD) DO UPDATE SET OCCUR = OCCUR + excluded.OCCUR",
			params![word, occur],
		)?;
		Ok(true)
	}

	/// Counts every word of free text once.
	pub fn import_text(&self, text: &str) -> Result<usize> {
		let mut count = 0;
		for word in NON_WORD.split(text) {
			if self.import_word(word, 1)? {
				count += 1;
			}
		}
		debug!("Imported {} words of text", count);
		Ok(count)
	}

	/// Reads `word count` lines. Blank lines are skipped; anything else that is
	/// not exactly a word and an integer fails the import.
	pub fn import_frequencies(&self, text: &str) -> Result<usize> {
		let mut count = 0;
		for (index, line) in text.lines().enumerate() {
			if line.trim().is_empty() {
				continue;
			}

			let malformed = || {
				ProbeError::Syntax {
					line:     index + 1,
					message:  "expected 'word count'".to_string(),
					fragment: line.to_string(),
				}
			};

			let mut parts = line.split_whitespace();
			let (Some(word), Some(occur), None) = (parts.next(), parts.next(), parts.next()) else {
				return Err(malformed());
			};
			let occur = occur.parse::<i64>().map_err(|_| malformed())?;

			self.import_word(word, occur)?;
			count += 1;
		}
		debug!("Imported {} frequency lines", count);
		Ok(count)
	}

	/// Re-ranks every word by occurrence count, most frequent first, ties broken
	/// alphabetically.
	#[instrument(skip(self))]
	pub fn recalc_positions(&self) -> Result<()> {
		let updated = self.conn.execute(
			"UPDATE TFREQ SET POSITION = ranked.pos, POSITION_LVL = ranked.pos / ?1 + 1
			 FROM (SELECT WORD, ROW_NUMBER() OVER (ORDER BY OCCUR DESC, WORD) AS pos FROM TFREQ) AS ranked
			 WHERE TFREQ.WORD = ranked.WORD",
			params![LEVEL_SIZE],
		)?;
		info!("Ranked {} words", updated);
		Ok(())
	}

	/// Runs an import in one transaction and re-ranks before it ends. With
	/// `pretend` the transaction is rolled back and the store is left as it was.
	pub fn batch<F>(&self, pretend: bool, import: F) -> Result<usize>
	where
		F: FnOnce(&Self) -> Result<usize>,
	{
		let tx = self.conn.unchecked_transaction()?;
		let count = import(self)?;
		self.recalc_positions()?;

		if pretend {
			info!("Pretend mode, rolling back {} imported words", count);
			tx.rollback()?;
		} else {
			tx.commit()?;
		}
		Ok(count)
	}

	/// Highest ranked rows first; unranked words come last.
	pub fn rows(&self, limit: usize) -> Result<Vec<FreqRow>> {
		let mut stmt = self.conn.prepare(
			"SELECT WORD, OCCUR, POSITION, POSITION_LVL FROM TFREQ
			 ORDER BY POSITION IS NULL, POSITION, WORD LIMIT ?1",
		)?;
		let rows = stmt
			.query_map(params![limit as i64], |row| {
				Ok(FreqRow {
					word:         row.get(0)?,
					occur:        row.get(1)?,
					position:     row.get(2)?,
					position_lvl: row.get(3)?,
				})
			})?
			.collect::<std::result::Result<Vec<_>, _>>()?;
		Ok(rows)
	}

	pub fn count(&self) -> Result<i64> {
		Ok(self.conn.query_row("SELECT COUNT(*) FROM TFREQ", [], |row| row.get(0))?)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn store() -> FrequencyStore { FrequencyStore::open_in_memory().unwrap() }

	fn ranking(store: &FrequencyStore) -> Vec<(String, i64, Option<i64>)> {
		store.rows(100).unwrap().into_iter().map(|r| (r.word, r.occur, r.position)).collect()
	}

	#[test]
	fn words_are_normalized_and_accumulated() {
		let store = store();
		store.import_word("  The ", 2).unwrap();
		store.import_word("the", 3).unwrap();
		store.import_word("say \"hi\"", 1).unwrap();
		assert!(!store.import_word("   ", 1).unwrap());

		let rows = store.rows(10).unwrap();
		assert_eq!(rows.len(), 2);
		assert!(rows.iter().any(|r| r.word == "the" && r.occur == 5));
		assert!(rows.iter().any(|r| r.word == "say 'hi'"));
	}

	#[test]
	fn text_import_splits_on_non_word_runs() {
		let store = store();
		let count = store.import_text("The cat, the hat -- and THE bat!").unwrap();
		assert_eq!(count, 7);
		store.recalc_positions().unwrap();
		assert_eq!(ranking(&store)[0], ("the".to_string(), 3, Some(1)));
	}

	#[test]
	fn ranking_breaks_ties_alphabetically() {
		let store = store();
		store.import_frequencies("beta 5\nalpha 5\ngamma 9\n\n").unwrap();
		store.recalc_positions().unwrap();
		assert_eq!(ranking(&store), vec![
			("gamma".to_string(), 9, Some(1)),
			("alpha".to_string(), 5, Some(2)),
			("beta".to_string(), 5, Some(3)),
		]);
	}

	#[test]
	fn levels_hold_a_thousand_positions() {
		let store = store();
		store
			.batch(false, |store| {
				for i in 0..1200 {
					store.import_word(&format!("w{i:04}"), 2000 - i)?;
				}
				Ok(1200)
			})
			.unwrap();

		let rows = store.rows(1200).unwrap();
		assert_eq!(rows[0].position_lvl, Some(1));
		assert_eq!(rows[998].position, Some(999));
		assert_eq!(rows[998].position_lvl, Some(1));
		assert_eq!(rows[999].position_lvl, Some(2));
	}

	#[test]
	fn malformed_frequency_line_reports_its_line() {
		let err = store().import_frequencies("one 1\ntwo\n").unwrap_err();
		assert!(matches!(err, ProbeError::Syntax { line: 2, .. }));

		let err = store().import_frequencies("one x").unwrap_err();
		assert!(matches!(err, ProbeError::Syntax { line: 1, .. }));
	}

	#[test]
	fn pretend_batch_leaves_the_store_untouched() {
		let store = store();
		store.import_word("kept", 1).unwrap();
		let count = store.batch(true, |store| store.import_text("gone away")).unwrap();
		assert_eq!(count, 2);
		assert_eq!(store.count().unwrap(), 1);
	}

	#[test]
	fn failed_batch_rolls_back() {
		let store = store();
		let result = store.batch(false, |store| {
			store.import_word("partial", 1)?;
			store.import_frequencies("broken")
		});
		assert!(result.is_err());
		assert_eq!(store.count().unwrap(), 0);
	}
}
