use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{error::Result, types::config::ProbeConfig};

/// Looked up in the working directory when no file is named.
pub const DEFAULT_CONFIG_FILE: &str = "probe.toml";

/// Reads `explicit` if given, else `probe.toml` from the working directory if
/// there is one, else falls back to defaults. A named file that cannot be read
/// is an error; a missing default file is not.
#[instrument]
pub fn load_config(explicit: Option<&Path>) -> Result<ProbeConfig> {
	let path = match explicit {
		Some(path) => path.to_path_buf(),
		None => {
			let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
			if !candidate.is_file() {
				debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
				return Ok(ProbeConfig::default());
			}
			candidate
		}
	};

	let content = fs_err::read_to_string(&path)?;
	let config = parse_config(&content)?;

	info!("Loaded config from {:?}", path);
	Ok(config)
}

pub fn parse_config(content: &str) -> Result<ProbeConfig> { Ok(toml::from_str(content)?) }

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tempfile::TempDir;

	use super::*;
	use crate::{error::ProbeError, types::config::OutputFormat};

	#[test]
	fn empty_file_gives_defaults() {
		let config = parse_config("").unwrap();
		assert_eq!(config, ProbeConfig::default());
		assert!(!config.corpus.enabled);
		assert_eq!(config.corpus.ignore_level, 2);
		assert_eq!(config.output.extension, "qa");
	}

	#[test]
	fn partial_sections_keep_other_defaults() {
		let config = parse_config("[corpus]\nenabled = true\n\n[output]\nformat = \"json\"\n").unwrap();
		assert!(config.corpus.enabled);
		assert_eq!(config.corpus.path, PathBuf::from("corpus_en.db"));
		assert_eq!(config.output.format, OutputFormat::Json);
		assert_eq!(config.output.extension, "qa");
	}

	#[test]
	fn bad_values_are_config_errors() {
		let err = parse_config("[output]\nformat = \"xml\"\n").unwrap_err();
		assert!(matches!(err, ProbeError::Config(_)));
	}

	#[test]
	fn named_file_is_read() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("custom.toml");
		fs_err::write(&path, "[corpus]\nignore_level = 5\n").unwrap();
		assert_eq!(load_config(Some(&path)).unwrap().corpus.ignore_level, 5);
	}

	#[test]
	fn missing_named_file_is_an_error() {
		let dir = TempDir::new().unwrap();
		let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
		assert!(matches!(err, ProbeError::Io(_)));
	}
}
