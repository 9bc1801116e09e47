use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct ProbeConfig {
	pub corpus: CorpusConfig,
	pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct CorpusConfig {
	pub enabled:      bool,
	pub path:         PathBuf,
	// Words ranked at or below this level count as too common to ask
	pub ignore_level: u32,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct OutputConfig {
	pub extension: String,
	pub format:    OutputFormat,
}

#[derive(Deserialize, Serialize, ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

impl Default for CorpusConfig {
	fn default() -> Self {
		Self { enabled: false, path: PathBuf::from("corpus_en.db"), ignore_level: 2 }
	}
}

impl Default for OutputConfig {
	fn default() -> Self { Self { extension: "qa".to_string(), format: OutputFormat::Text } }
}
