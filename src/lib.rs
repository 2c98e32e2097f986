//! Reddown library
//!
//! The Markdown processor with the Redmine underline extension, the line diff
//! engine behind the review window, and the egui shell built on both.

pub mod app;
pub mod config;
pub mod constant;
pub mod diff;
pub mod document;
pub mod markdown;
pub mod messages;
pub mod saver;
pub mod style;
pub mod ui;
