//! Minimal terminal application runtime: a fixed-rate tick, renders after
//! every state change, and crossterm input in between.

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, runner::Tui};
