//! Service layer for rulecrawl.
//!
//! Domain logic separated from UI concerns, usable by the CLI or any
//! embedding application.

pub mod reader;

pub use reader::RuleService;
