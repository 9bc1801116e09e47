//! Card store. Every card gets its id from the store; each call commits on its
//! own, and batches of generated items go in through one transaction.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{error::{ProbeError, Result}, types::item::OutputItem};

pub const STORE_VERSION: &str = "01";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS TCARDS (
	ID            INTEGER PRIMARY KEY,
	QUESTION      TEXT NOT NULL DEFAULT '',
	ANSWER        TEXT NOT NULL DEFAULT '',
	QUESTION_HINT TEXT NOT NULL DEFAULT '',
	ANSWER_HINT   TEXT NOT NULL DEFAULT '',
	SCORE         NUMERIC
);
CREATE TABLE IF NOT EXISTS TVERSION (
	VERSION TEXT NOT NULL
);
"#;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
	pub id:            Option<i64>,
	pub question:      String,
	pub answer:        String,
	pub question_hint: String,
	pub answer_hint:   String,
	pub score:         Option<f64>,
}

impl Card {
	pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
		Self { question: question.into(), answer: answer.into(), ..Default::default() }
	}
}

impl From<&OutputItem> for Card {
	fn from(item: &OutputItem) -> Self {
		Self {
			id:            None,
			question:      item.full_question(),
			answer:        item.answer.clone(),
			question_hint: item.question_hint.clone(),
			answer_hint:   item.answer_hint.clone(),
			score:         None,
		}
	}
}

pub struct CardStore {
	conn: Connection,
}

impl CardStore {
	#[instrument(skip(path), fields(path = %path.as_ref().display()))]
	pub fn open(path: impl AsRef<Path>) -> Result<Self> { Self::init(Connection::open(path.as_ref())?) }

	pub fn open_in_memory() -> Result<Self> { Self::init(Connection::open_in_memory()?) }

	fn init(conn: Connection) -> Result<Self> {
		conn.execute_batch(SCHEMA)?;

		let version: Option<String> =
			conn.query_row("SELECT VERSION FROM TVERSION", [], |row| row.get(0)).optional()?;
		match version {
			Some(version) if version != STORE_VERSION => return Err(ProbeError::StoreVersion(version)),
			Some(_) => {}
			None => {
				conn.execute("INSERT INTO TVERSION (VERSION) VALUES (?1)", params![STORE_VERSION])?;
				debug!("Created card store version {}", STORE_VERSION);
			}
		}

		Ok(Self { conn })
	}

	/// Returns the id the store assigned.
	pub fn add_card(&self, card: &Card) -> Result<i64> {
		self.conn.execute(
			"INSERT INTO TCARDS (QUESTION, ANSWER, QUESTION_HINT, ANSWER_HINT, SCORE)
			 VALUES (?1, ?2, ?3, ?4, ?5)",
			params![card.question, card.answer, card.question_hint, card.answer_hint, card.score],
		)?;
		Ok(self.conn.last_insert_rowid())
	}

	/// Stores all items or none of them.
	#[instrument(skip(self, items), fields(count = items.len()))]
	pub fn add_items(&self, items: &[OutputItem]) -> Result<Vec<i64>> {
		let tx = self.conn.unchecked_transaction()?;
		let ids = items.iter().map(|item| self.add_card(&Card::from(item))).collect::<Result<Vec<_>>>()?;
		tx.commit()?;

		info!("Stored {} cards", ids.len());
		Ok(ids)
	}

	pub fn get_card(&self, id: i64) -> Result<Card> {
		self.conn
			.query_row(
				"SELECT ID, QUESTION, ANSWER, QUESTION_HINT, ANSWER_HINT, SCORE FROM TCARDS WHERE ID = ?1",
				params![id],
				|row| {
					Ok(Card {
						id:            row.get(0)?,
						question:      row.get(1)?,
						answer:        row.get(2)?,
						question_hint: row.get(3)?,
						answer_hint:   row.get(4)?,
						score:         row.get(5)?,
					})
				},
			)
			.optional()?
			.ok_or(ProbeError::CardNotFound(id))
	}

	pub fn exists_card(&self, id: i64) -> Result<bool> {
		let found =
			self.conn.query_row("SELECT ID FROM TCARDS WHERE ID = ?1", params![id], |row| row.get::<_, i64>(0)).optional()?;
		Ok(found.is_some())
	}

	/// Overwrites every field of card `id` with the fields of `card`; the id
	/// stored in `card` itself is not used.
	pub fn update_card(&self, id: i64, card: &Card) -> Result<()> {
		let changed = self.conn.execute(
			"UPDATE TCARDS SET QUESTION = ?1, ANSWER = ?2, QUESTION_HINT = ?3, ANSWER_HINT = ?4, SCORE = ?5
			 WHERE ID = ?6",
			params![card.question, card.answer, card.question_hint, card.answer_hint, card.score, id],
		)?;
		if changed == 0 {
			return Err(ProbeError::CardNotFound(id));
		}
		Ok(())
	}

	pub fn delete_card(&self, id: i64) -> Result<()> {
		let changed = self.conn.execute("DELETE FROM TCARDS WHERE ID = ?1", params![id])?;
		if changed == 0 {
			return Err(ProbeError::CardNotFound(id));
		}
		Ok(())
	}

	pub fn delete_all(&self) -> Result<usize> { Ok(self.conn.execute("DELETE FROM TCARDS", [])?) }

	pub fn count(&self) -> Result<i64> {
		Ok(self.conn.query_row("SELECT COUNT(*) FROM TCARDS", [], |row| row.get(0))?)
	}

	/// `(id, question)` of cards whose question contains `filter`, in id order.
	/// Rows are counted from 0; `start` is inclusive and `end` exclusive, an
	/// absent `end` reads to the last row.
	pub fn headers(&self, filter: &str, start: usize, end: Option<usize>) -> Result<Vec<(i64, String)>> {
		let limit = match end {
			Some(end) => end.saturating_sub(start) as i64,
			None => -1,
		};

		let mut stmt = self.conn.prepare(
			"SELECT ID, QUESTION FROM TCARDS WHERE instr(QUESTION, ?1) > 0
			 ORDER BY ID LIMIT ?2 OFFSET ?3",
		)?;
		let headers = stmt
			.query_map(params![filter, limit, start as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
			.collect::<std::result::Result<Vec<_>, _>>()?;
		Ok(headers)
	}
}
