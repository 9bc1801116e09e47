use std::collections::BTreeMap;

use crate::{error::{ProbeError, Result}, types::node::{ClassKind, Command}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
	String,
	Enum(&'static [&'static str]),
	Integer,
	Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
	Str(&'static str),
	Int(i64),
	Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
	String(String),
	Integer(i64),
	Boolean(bool),
}

#[derive(Debug, PartialEq, Eq)]
pub struct OptionSpec {
	pub name:    &'static str,
	pub ty:      OptionType,
	pub default: OptionDefault,
}

#[derive(Debug, PartialEq, Eq)]
pub struct OptionSchema {
	pub options: &'static [OptionSpec],
}

pub const ASK_MARKED: &str = "marked";
pub const ASK_ALL: &str = "all";

const ASK_VALUES: &[&str] = &[ASK_MARKED, ASK_ALL];

static HEADING_SCHEMA: OptionSchema = OptionSchema {
	options: &[
		OptionSpec { name: "short", ty: OptionType::String, default: OptionDefault::Str("") },
		OptionSpec { name: "hidden", ty: OptionType::Boolean, default: OptionDefault::Bool(false) },
	],
};

static CLOZE_SCHEMA: OptionSchema = OptionSchema {
	options: &[
		OptionSpec {
			name:    "ask",
			ty:      OptionType::Enum(ASK_VALUES),
			default: OptionDefault::Str(ASK_MARKED),
		},
		OptionSpec { name: "corpus", ty: OptionType::Boolean, default: OptionDefault::Bool(true) },
		OptionSpec { name: "minlength", ty: OptionType::Integer, default: OptionDefault::Int(0) },
	],
};

static ASK_ALL_SCHEMA: OptionSchema = OptionSchema {
	options: &[
		OptionSpec {
			name:    "ask",
			ty:      OptionType::Enum(ASK_VALUES),
			default: OptionDefault::Str(ASK_ALL),
		},
		OptionSpec { name: "corpus", ty: OptionType::Boolean, default: OptionDefault::Bool(true) },
		OptionSpec { name: "minlength", ty: OptionType::Integer, default: OptionDefault::Int(0) },
	],
};

impl OptionSchema {
	pub fn of(command: Command) -> &'static OptionSchema {
		match command {
			Command::Title | Command::Section | Command::Subsection => &HEADING_SCHEMA,
			Command::Class(ClassKind::Cloze) => &CLOZE_SCHEMA,
			Command::Class(_) => &ASK_ALL_SCHEMA,
		}
	}

	pub fn find(&self, name: &str) -> Option<&'static OptionSpec> {
		self.options.iter().find(|spec| spec.name == name)
	}
}

impl From<OptionDefault> for OptionValue {
	fn from(default: OptionDefault) -> Self {
		match default {
			OptionDefault::Str(s) => OptionValue::String(s.to_string()),
			OptionDefault::Int(i) => OptionValue::Integer(i),
			OptionDefault::Bool(b) => OptionValue::Boolean(b),
		}
	}
}

fn strip_quotes(value: &str) -> &str {
	for quote in ['\'', '"'] {
		if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
			return inner;
		}
	}
	value
}

impl OptionSpec {
	fn convert(&self, raw: &str) -> Result<OptionValue> {
		let invalid = |expected: &str| {
			ProbeError::syntax(
				format!("option '{}' expects {}, got '{}'", self.name, expected, raw),
				raw,
			)
		};

		match self.ty {
			OptionType::Boolean => match raw.to_ascii_lowercase().as_str() {
				"" | "true" | "yes" | "on" | "1" => Ok(OptionValue::Boolean(true)),
				"false" | "no" | "off" | "0" => Ok(OptionValue::Boolean(false)),
				_ => Err(invalid("a boolean")),
			},
			_ if raw.is_empty() => Err(invalid("a value")),
			OptionType::Integer => {
				raw.parse::<i64>().map(OptionValue::Integer).map_err(|_| invalid("an integer"))
			}
			OptionType::Enum(allowed) => {
				let value = strip_quotes(raw);
				if allowed.contains(&value) {
					Ok(OptionValue::String(value.to_string()))
				} else {
					Err(invalid(&format!("one of [{}]", allowed.join(", "))))
				}
			}
			OptionType::String => Ok(OptionValue::String(strip_quotes(raw).to_string())),
		}
	}
}

/// Options given to one command, checked against the command's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
	command: Command,
	values:  BTreeMap<&'static str, OptionValue>,
}

impl OptionSet {
	pub fn new(command: Command) -> Self { Self { command, values: BTreeMap::new() } }

	pub fn schema(&self) -> &'static OptionSchema { OptionSchema::of(self.command) }

	/// Stores `value` under `name`. An empty value is a bare flag and means
	/// `true`.
	pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
		let spec = self.schema().find(name).ok_or_else(|| ProbeError::UnknownOption {
			line:    0,
			command: self.command.keyword(),
			name:    name.to_string(),
		})?;

		let value = spec.convert(value)?;
		self.values.insert(spec.name, value);
		Ok(())
	}

	/// The stored value, or the schema default. `None` only for names the
	/// schema does not know.
	pub fn get(&self, name: &str) -> Option<OptionValue> {
		if let Some(value) = self.values.get(name) {
			return Some(value.clone());
		}
		self.schema().find(name).map(|spec| spec.default.into())
	}

	pub fn string(&self, name: &str) -> String {
		match self.get(name) {
			Some(OptionValue::String(s)) => s,
			_ => String::new(),
		}
	}

	pub fn flag(&self, name: &str) -> bool { matches!(self.get(name), Some(OptionValue::Boolean(true))) }

	pub fn integer(&self, name: &str) -> i64 {
		match self.get(name) {
			Some(OptionValue::Integer(i)) => i,
			_ => 0,
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn cloze_options() -> OptionSet { OptionSet::new(Command::Class(ClassKind::Cloze)) }

	#[test]
	fn defaults_depend_on_the_command() {
		assert_eq!(cloze_options().string("ask"), ASK_MARKED);
		assert_eq!(OptionSet::new(Command::Class(ClassKind::Set)).string("ask"), ASK_ALL);
		assert_eq!(OptionSet::new(Command::Class(ClassKind::Tabbed)).string("ask"), ASK_ALL);
		assert!(cloze_options().flag("corpus"));
		assert!(!OptionSet::new(Command::Section).flag("hidden"));
	}

	#[test]
	fn bare_flag_means_true() {
		let mut options = OptionSet::new(Command::Title);
		options.set("hidden", "").unwrap();
		assert!(options.flag("hidden"));
	}

	#[test]
	fn unknown_option_is_rejected() {
		let err = cloze_options().set("big", "").unwrap_err();
		assert!(matches!(
			err,
			ProbeError::UnknownOption { command: "cloze", ref name, .. } if name == "big"
		));
	}

	#[test]
	fn heading_options_are_not_class_options() {
		assert!(OptionSet::new(Command::Section).set("ask", "all").is_err());
		assert!(cloze_options().set("short", "x").is_err());
	}

	#[rstest]
	#[case("ask", "all", OptionValue::String("all".into()))]
	#[case("ask", "'marked'", OptionValue::String("marked".into()))]
	#[case("minlength", "4", OptionValue::Integer(4))]
	#[case("corpus", "no", OptionValue::Boolean(false))]
	#[case("corpus", "TRUE", OptionValue::Boolean(true))]
	fn typed_values(#[case] name: &str, #[case] raw: &str, #[case] expected: OptionValue) {
		let mut options = cloze_options();
		options.set(name, raw).unwrap();
		assert_eq!(options.get(name), Some(expected));
	}

	#[rstest]
	#[case("ask", "some")]
	#[case("ask", "")]
	#[case("minlength", "four")]
	#[case("corpus", "maybe")]
	fn ill_typed_values_are_syntax_errors(#[case] name: &str, #[case] raw: &str) {
		let err = cloze_options().set(name, raw).unwrap_err();
		assert!(matches!(err, ProbeError::Syntax { .. }), "{err:?}");
	}

	#[test]
	fn string_values_lose_one_pair_of_quotes() {
		let mut options = OptionSet::new(Command::Title);
		options.set("short", "'Geez'").unwrap();
		assert_eq!(options.string("short"), "Geez");
		options.set("short", "\"it's\"").unwrap();
		assert_eq!(options.string("short"), "it's");
	}

	#[test]
	fn get_of_unknown_name_is_none() {
		assert_eq!(cloze_options().get("nope"), None);
	}
}
