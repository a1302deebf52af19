//! # Graph-Mutation Query Synthesizer
//!
//! Turns a [`Translation`](crate::translate::Translation) plus a
//! [`VersioningContext`](crate::layout::VersioningContext) into one Create
//! or Delete statement, built as a typed AST and rendered to Cypher.
//!
//! ```text
//! Create: scaffold MERGEs -> structure (MERGE reusable, CREATE private) -> linking
//! Delete: MATCH structure -> DELETE edges -> orphan sweep
//! ```
//!
//! Both statements are safe to retry wholesale: Create re-merges what
//! already exists, and a Delete whose structure no longer matches does
//! nothing.

pub mod ast;
pub mod render;
mod vars;
mod create;
mod delete;

pub use ast::{
    Clause, MatchClause, NodePattern, Pattern, PatternDirection, PatternElement, Predicate,
    Query, RelPattern, SweepMode,
};
pub use create::synthesize_create;
pub use delete::synthesize_delete;
