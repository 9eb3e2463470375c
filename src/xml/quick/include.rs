//! XInclude expansion over a parsed element tree.
//!
//! An `<xi:include href="..."/>` element is replaced by the root element of
//! the document it references. Paths are relative to the directory of the
//! including document, and included documents may include further documents
//! up to [`MAX_INCLUDE_DEPTH`] levels deep. An include that cannot be
//! resolved is logged and dropped; expansion never fails the caller.

use std::fs;
use std::path::Path;

use crate::xml::deserialize::DeserializeError;
use crate::xml::quick::de::{XmlElement, parse_document};

/// Maximum nesting of includes; guards against include cycles.
pub const MAX_INCLUDE_DEPTH: usize = 8;

const HREF: &str = "href";

/// Whether `element` is an XInclude directive.
pub fn is_include(element: &XmlElement) -> bool {
    match element.name().split_once(':') {
        Some((_, local)) => local == "include",
        None => false,
    }
}

/// Expand every include below `root`, returning how many were resolved.
pub fn expand_includes(root: &mut XmlElement, base_dir: &Path) -> usize {
    expand_children(root, base_dir, 0)
}

fn expand_children(element: &mut XmlElement, base_dir: &Path, depth: usize) -> usize {
    let mut resolved = 0;
    let children = std::mem::take(element.children_mut());

    for mut child in children {
        if is_include(&child) {
            match load_include(&child, base_dir, depth) {
                Ok((included, nested)) => {
                    resolved += 1 + nested;
                    element.children_mut().push(included);
                }
                Err(e) => {
                    log::error!(
                        "Failed to resolve include '{}' in <{}>: {}",
                        child.attrs().get(HREF),
                        element.name(),
                        e
                    );
                }
            }
        } else {
            resolved += expand_children(&mut child, base_dir, depth);
            element.children_mut().push(child);
        }
    }

    resolved
}

fn load_include(
    include: &XmlElement,
    base_dir: &Path,
    depth: usize,
) -> Result<(XmlElement, usize), DeserializeError> {
    if depth >= MAX_INCLUDE_DEPTH {
        return Err(DeserializeError::Custom(format!(
            "include nesting exceeds {} levels",
            MAX_INCLUDE_DEPTH
        )));
    }

    let href = include.attrs().get_req(HREF)?;
    let path = base_dir.join(href);
    log::debug!("Including {}", path.display());

    let text = fs::read_to_string(&path)?;
    let mut root = parse_document(&text)?;
    let nested_dir = path.parent().unwrap_or(base_dir);
    let nested = expand_children(&mut root, nested_dir, depth + 1);

    Ok((root, nested))
}
