use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

/// `debug` wins over `verbose`; neither leaves only warnings and errors.
pub fn level(debug: bool, verbose: bool) -> Level {
	match (debug, verbose) {
		(true, _) => Level::DEBUG,
		(false, true) => Level::INFO,
		(false, false) => Level::WARN,
	}
}

/// Installs the stderr subscriber for a binary. Call once, first thing.
pub fn init(debug: bool, verbose: bool) {
	tracing_subscriber::fmt()
		.with_max_level(level(debug, verbose))
		.with_timer(ChronoLocal::rfc_3339())
		.with_writer(std::io::stderr)
		.with_target(debug)
		.init();
}
