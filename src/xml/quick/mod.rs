//! Quick-xml helper utilities for configuration deserialization.
//!
//! This module wraps quick-xml's low-level event API into a small owned
//! element tree so the schema walkers can look at an element's children in
//! any order, and resolves XInclude directives over that tree.

pub mod de;
pub mod include;

pub use de::{Attrs, XmlElement, parse_document};
pub use include::{MAX_INCLUDE_DEPTH, expand_includes};
