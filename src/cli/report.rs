//! Report formatting and printing utilities.
//!
//! Prints the run log in cargo style, then one summary line. Kept apart from
//! the pipeline so the crate can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandKind, CommandResult};
use crate::log::{LogEntry, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the result to stdout.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print the result to a custom writer.
///
/// Info lines are shown for `init` always and for pipeline runs only when
/// `verbose` is set or the run did not succeed.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    let show_info = verbose || result.kind == CommandKind::Init || result.error_count() > 0;

    for entry in result.log.entries() {
        if entry.severity == Severity::Info && !show_info {
            continue;
        }
        let _ = writeln!(writer, "{}", format_entry(entry));
    }

    print_summary(result, writer);
}

fn format_entry(entry: &LogEntry) -> String {
    match entry.severity {
        Severity::Error => format!("{} {}", "error:".bold().red(), entry.message),
        Severity::Warning => format!("{} {}", "warning:".bold().yellow(), entry.message),
        Severity::Info => entry.message.clone(),
    }
}

fn print_summary<W: Write>(result: &CommandResult, writer: &mut W) {
    if result.kind == CommandKind::Init {
        return;
    }

    let errors = result.error_count();
    let warnings = result.warning_count();
    if errors > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} {} finished with {} {}, {} {}",
                verb(result.kind),
                modules_phrase(result),
                errors,
                plural(errors, "error", "errors"),
                warnings,
                plural(warnings, "warning", "warnings")
            )
            .red()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{} {}", verb(result.kind), modules_phrase(result)).green()
        );
    }
}

fn verb(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Extract => "Extracted",
        CommandKind::Compile => "Compiled",
        CommandKind::Init => "Initialized",
    }
}

fn modules_phrase(result: &CommandResult) -> String {
    let summary = &result.summary;
    let mut phrase = format!(
        "{} {}",
        summary.modules,
        plural(summary.modules, "module", "modules")
    );
    if summary.distributions > 0 {
        phrase.push_str(&format!(
            ", {} JavaScript {}",
            summary.distributions,
            plural(summary.distributions, "distribution", "distributions")
        ));
    }
    if summary.skipped > 0 {
        phrase.push_str(&format!(" ({} skipped)", summary.skipped));
    }
    phrase
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
