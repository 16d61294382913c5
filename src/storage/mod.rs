//! Local storage layer for tomato.
//!
//! `SQLite` persistence for focus session history, with schema migrations.

mod database;
mod migrations;

pub use database::Database;
