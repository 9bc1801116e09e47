use chumsky::prelude::*;
use tracing::trace;

use crate::{error::{ProbeError, Result}, types::{node::Command, options::OptionSet}};

type Entry = (String, Option<String>);

/// `name=value, flag, name2=value2`, brackets already removed. Anything parses;
/// a value runs up to the next comma and may itself contain `=`.
fn option_list<'a>() -> impl Parser<'a, &'a str, Vec<Entry>, extra::Err<Rich<'a, char>>> + Clone {
	let name = none_of(",=").repeated().collect::<String>();
	let value = just('=').ignore_then(none_of(',').repeated().collect::<String>());

	name.then(value.or_not()).separated_by(just(',')).collect::<Vec<_>>().then_ignore(end())
}

/// Turns the bracketed option text of a command into a checked [`OptionSet`].
pub fn parse_options(command: Command, text: Option<&str>) -> Result<OptionSet> {
	let mut options = OptionSet::new(command);
	let Some(text) = text else {
		return Ok(options);
	};

	let inner = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')).unwrap_or(text);
	let entries = option_list().parse(inner).into_result().map_err(|errors| {
		let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
		ProbeError::syntax(format!("invalid option list: {message}"), text)
	})?;

	for (name, value) in entries {
		let name = name.trim();
		// Trailing commas leave nameless entries behind
		if name.is_empty() {
			continue;
		}
		let value = value.as_deref().unwrap_or("").trim();
		trace!("Option {} = {:?}", name, value);
		options.set(name, value)?;
	}

	Ok(options)
}
