//! Assembly of decoded SS-MIX2 segments into per-category documents.
//!
//! Each category's grouping rules live in a static table ([`grammar`]); a
//! single engine ([`Assembler`]) interprets them. [`Jsonizer`] dispatches
//! messages to the assembler of their category.

pub mod assembler;
pub mod document;
pub mod grammar;
pub mod jsonizer;

pub use assembler::{Assembler, Jsonized};
pub use document::{Document, Group, GroupKind, Node, NodeKey, SegmentNode};
pub use grammar::{Condition, Grammar, Placement, Rule, Step, grammar_for};
pub use jsonizer::Jsonizer;
