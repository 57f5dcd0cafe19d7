// Copyright (C) 2024 ramdb Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! `ramdb` is a single-user, in-memory relational engine. It accepts SQL
//! statements, compiles them into a small plan tree, and drives execution
//! through a pull-based ("Volcano") operator pipeline over a custom tuple
//! arena. A session-scoped transaction is implemented as an undo-log that
//! reverses both row and catalog mutations on rollback.
//!
//! The SQL tokenizer/parser, the interactive line-editor, and human-facing
//! result formatting are treated as thin, swappable layers around this
//! core: [`parser`] only implements the statement surface this engine
//! understands, and [`format`] exposes the minimal [`format::OutputSink`]
//! contract the operators write through.
//!
//! ## Module map
//! - [`arena`] — fixed-size tuple slots, bulk-allocated in groups of 100.
//! - [`tuple`] — binary tuple layout: header reservation, null bitmap, payload encode/decode.
//! - [`table`] — per-table tuple store built on top of an [`arena::TupleArena`].
//! - [`catalog`] — the (schema, name) → table directory and index metadata.
//! - [`undo`] — the transaction undo stack and its commit/rollback actions.
//! - [`ast`] — the statement AST contract consumed from the (external) parser.
//! - [`plan`] / [`operator`] — plan-tree assembly and the pull-iterator pipeline.
//! - [`engine`] — the single owned value bundling catalog + undo log + transaction state.
//! - [`session`] — accepts one statement at a time, drives it to completion, reports the outcome.

#![forbid(unsafe_code)]
#![deny(clippy::expect_used)]

pub mod arena;
pub mod ast;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod operator;
pub mod parser;
pub mod plan;
pub mod session;
pub mod table;
pub mod tuple;
pub mod types;
pub mod undo;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use session::Session;
