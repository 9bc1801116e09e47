use serde::{Deserialize, Serialize};

/// A finished flashcard. Carries no reference back into the document it came
/// from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
	pub prefix:        String,
	pub question:      String,
	pub answer:        String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub question_hint: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub answer_hint:   String,
}

impl OutputItem {
	/// Prefix and question as a learner sees them.
	pub fn full_question(&self) -> String { format!("{}{}", self.prefix, self.question) }
}
