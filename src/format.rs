//! Result formatting for human display.
//!
//! [`OutputSink`] is the boundary between the engine's [`ExecOutcome`]
//! values and however a caller wants to present them; [`PlainTextSink`]
//! is the only implementation this crate ships, a plain tab-separated
//! table dump to any `std::io::Write`.

use crate::engine::ExecOutcome;
use crate::types::Literal;

pub trait OutputSink {
    fn emit(&mut self, outcome: &ExecOutcome);
    fn emit_error(&mut self, message: &str);
}

/// Writes tab-separated rows and `[Info]`/`[Error]`-prefixed messages to
/// any `std::io::Write`, e.g. stdout.
pub struct PlainTextSink<W> {
    out: W,
}

impl<W: std::io::Write> PlainTextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: std::io::Write> OutputSink for PlainTextSink<W> {
    fn emit(&mut self, outcome: &ExecOutcome) {
        match outcome {
            ExecOutcome::Message(msg) => {
                let _ = writeln!(self.out, "[Info]  {msg}");
            }
            ExecOutcome::Rows { columns, rows } => {
                let _ = writeln!(self.out, "{}", columns.join("\t"));
                for row in rows {
                    let line = row.iter().map(render).collect::<Vec<_>>().join("\t");
                    let _ = writeln!(self.out, "{line}");
                }
                let _ = writeln!(self.out, "({} row(s))", rows.len());
            }
            ExecOutcome::TableNames(names) => {
                let _ = writeln!(self.out, "# Table List:");
                for name in names {
                    let _ = writeln!(self.out, "{name}");
                }
            }
            ExecOutcome::ColumnList(columns) => {
                for (name, ty) in columns {
                    let _ = writeln!(self.out, "{name}\t{ty}");
                }
            }
        }
    }

    fn emit_error(&mut self, message: &str) {
        let _ = writeln!(self.out, "[Error]  {message}");
    }
}

fn render(value: &Literal) -> String {
    value.to_string()
}
