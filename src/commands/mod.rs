//! Command implementations for the Bookbot CLI

pub mod book;
pub mod completions;
pub mod setup;
pub mod version;
