//! The session loop: reads one statement at a time, executes it against
//! an [`Engine`], and reports the result or error through an
//! [`OutputSink`].
//!
//! No raw-terminal line editor or command history here — a session reads
//! whole lines from any [`std::io::BufRead`], one statement per line.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::engine::Engine;
use crate::format::OutputSink;
use crate::parser::parse_statement;

pub struct Session {
    engine: Engine,
}

impl Session {
    pub fn new() -> Self {
        Self { engine: Engine::new() }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs one line of input. Returns `false` if the line requests the
    /// session to end (`exit` or `q`).
    pub fn run_line(&mut self, line: &str, sink: &mut impl OutputSink) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("q") {
            return false;
        }

        match parse_statement(line).and_then(|stmt| self.engine.execute(stmt)) {
            Ok(outcome) => sink.emit(&outcome),
            Err(e) => {
                warn!(%e, %line, "statement failed");
                sink.emit_error(&format!("Failed to execute '{line}'"));
            }
        }
        true
    }

    /// Drives the loop over `input`, prompting on `prompt_out` when it is
    /// a terminal-facing writer (the prompt is plain text either way —
    /// the caller decides whether to show it, e.g. suppressing it for a
    /// non-interactive script).
    pub fn run(&mut self, mut input: impl BufRead, mut prompt_out: Option<&mut dyn Write>, sink: &mut impl OutputSink) {
        let mut line = String::new();
        loop {
            if let Some(w) = prompt_out.as_deref_mut() {
                let _ = write!(w, ">> ");
                let _ = w.flush();
            }

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(_) => break,
            }

            if !self.run_line(&line, sink) {
                break;
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
