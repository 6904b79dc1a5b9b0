//! Small formatting helpers shared by the scanner and parser for user-facing
//! diagnostics. Kept separate from the stages themselves so each stage's
//! error accumulator (`had_error` on `Scanner`/`Parser`) stays the single
//! source of truth instead of a process-wide flag.

use log::warn;

/// Scanner-style diagnostic: `[line L] Error: message`.
pub fn scan_error(line: usize, message: &str) {
    warn!("scan error at line {line}: {message}");
    eprintln!("[line {line}] Error: {message}");
}

/// Parser-style diagnostic: `Line L at 'lexeme'. message` (or `at end.` for EOF).
pub fn parse_error(line: usize, at_end: bool, lexeme: &str, message: &str) {
    warn!("parse error at line {line}: {message}");
    if at_end {
        eprintln!("Line {line} at end. {message}");
    } else {
        eprintln!("Line {line} at '{lexeme}'. {message}");
    }
}

/// Runtime-style diagnostic: the bare message, no line prefix.
pub fn runtime_error(message: &str) {
    eprintln!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_helpers_do_not_panic() {
        scan_error(1, "Unexpected character: @");
        parse_error(3, false, "+", "Expect expression.");
        parse_error(3, true, "", "Expect expression.");
        runtime_error("Operands must be numbers.");
    }
}
