//! Decoding of individual HL7 v2 segments into ordered field maps.
//!
//! A [`MessageContext`] carries the delimiters announced by the message
//! header and collects diagnostics; a [`SegmentBuilder`] turns one raw
//! segment line into a [`Segment`] using the schema tables.

pub mod context;
pub mod delimiters;
pub mod escape;
pub mod field;
pub mod primitive;
pub mod segment;
pub mod source;

pub use context::{FieldLocation, MessageContext};
pub use delimiters::{DelimiterSet, HEADER_TAG};
pub use escape::resolve_escapes;
pub use field::FieldDecoder;
pub use primitive::{PRIMITIVE_TYPES, is_primitive};
pub use segment::{OBSERVATION_VALUE_TYPES, Segment, SegmentBuilder};
pub use source::{segment_tag, split_segments};
