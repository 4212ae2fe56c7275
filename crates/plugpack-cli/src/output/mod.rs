//! Output formatting for build, verify and list results.
//!
//! Human output goes to the terminal with `console` styling; `--json` swaps
//! in a formatter that prints one JSON document per command on stdout.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// Picks the formatter for the global `--json`, `--verbose` and `--quiet` flags.
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}
