//! Reference resolution: path tokens to in-tree pointers and back.
//!
//! A parsed tree carries textual references (path tokens). Resolving turns
//! each one into a pointer node aimed at the node its path designates;
//! restoring reverses the exchange using the bindings the resolution
//! returned. Handles are arena indices, so resolved pointers survive any
//! amount of further allocation; the only way to break one is to overwrite
//! its target slot with an unrelated value, which is the caller's contract
//! to avoid between resolve and restore.

use crate::document::Document;
use crate::node::{Node, NodeId, PathToken};
use crate::{Error, Result};

/// One resolved reference: the original path string, the slot that held
/// the token, and the target it resolved to (`None` when broken).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
    /// The path string the token carried, leading `/` included.
    pub path: String,
    /// The slot the token occupied (now a pointer node).
    pub slot: NodeId,
    /// The resolved target, or `None` if a segment missed.
    pub target: Option<NodeId>,
}

/// Collect `(path, slot)` for every path-token node reachable from the
/// document root, in depth-first order.
#[must_use]
pub fn find_references(doc: &Document) -> Vec<(String, NodeId)> {
    let mut found = Vec::new();
    collect(doc, doc.root(), &mut found);
    found
}

fn collect(doc: &Document, id: NodeId, found: &mut Vec<(String, NodeId)>) {
    match doc.node(id) {
        Node::Object(obj) => {
            for &(_, child) in obj.entries() {
                collect(doc, child, found);
            }
        },
        Node::Array(items) => {
            for &child in items {
                collect(doc, child, found);
            }
        },
        Node::Path(token) => found.push((token.as_str().to_owned(), id)),
        _ => {},
    }
}

/// Resolve collected references to targets, marking broken ones.
///
/// A reference whose path misses any segment has its slot replaced with a
/// null pointer immediately; intact references keep their token until
/// [`resolve_paths`] swaps them.
pub fn resolve_targets(doc: &mut Document, refs: Vec<(String, NodeId)>) -> Vec<PathBinding> {
    let root = doc.root();
    refs.into_iter()
        .map(|(path, slot)| {
            let target = doc
                .walk_read(root, &path[1..])
                .ok()
                .filter(|&id| !doc.is_sentinel(id));
            if target.is_none() {
                *doc.node_mut(slot) = Node::Pointer(None);
            }
            PathBinding { path, slot, target }
        })
        .collect()
}

/// Replace every reachable path token with a pointer to its target (a
/// null pointer when broken). Returns the bindings for later restore and
/// for the printer's reverse lookup.
pub fn resolve_paths(doc: &mut Document) -> Vec<PathBinding> {
    let bindings = resolve_targets(doc, find_references(doc));
    for binding in &bindings {
        *doc.node_mut(binding.slot) = Node::Pointer(binding.target);
    }
    bindings
}

/// Reverse [`resolve_paths`]: put the original path tokens back into the
/// slots the bindings name.
pub fn restore_paths(doc: &mut Document, bindings: &[PathBinding]) -> Result<()> {
    for binding in bindings {
        let token = PathToken::new(binding.path.clone())?;
        *doc.node_mut(binding.slot) = Node::Path(token);
    }
    Ok(())
}

/// Recursive containment test: `true` if the subtree under `parent` holds
/// the target node itself or any pointer aimed at it.
#[must_use]
pub fn contains(doc: &Document, parent: NodeId, target: NodeId) -> bool {
    match doc.node(parent) {
        Node::Object(obj) => obj
            .entries()
            .iter()
            .any(|&(_, child)| child == target || contains(doc, child, target)),
        Node::Array(items) => items
            .iter()
            .any(|&child| child == target || contains(doc, child, target)),
        Node::Pointer(Some(aimed)) => *aimed == target,
        _ => false,
    }
}

/// `true` if the subtree a pointer target roots points back at it.
#[must_use]
pub fn is_cyclic(doc: &Document, target: NodeId) -> bool {
    contains(doc, target, target)
}

/// Depth-first reverse lookup: the `/`-joined path from `from` down to
/// `target`, or `None` if the target is not reachable through containers.
#[must_use]
pub fn find_path(doc: &Document, from: NodeId, target: NodeId) -> Option<String> {
    let mut segments = Vec::new();
    if dfs_path(doc, from, target, &mut segments) {
        let mut path = String::new();
        if segments.is_empty() {
            path.push('/');
        } else {
            for seg in &segments {
                path.push('/');
                path.push_str(seg);
            }
        }
        Some(path)
    } else {
        None
    }
}

fn dfs_path(doc: &Document, cur: NodeId, target: NodeId, segments: &mut Vec<String>) -> bool {
    if cur == target {
        return true;
    }
    match doc.node(cur) {
        Node::Object(obj) => {
            for (key, child) in obj.entries() {
                segments.push(doc.key_text(key).into_owned());
                if dfs_path(doc, *child, target, segments) {
                    return true;
                }
                segments.pop();
            }
        },
        Node::Array(items) => {
            for (idx, &child) in items.iter().enumerate() {
                segments.push(idx.to_string());
                if dfs_path(doc, child, target, segments) {
                    return true;
                }
                segments.pop();
            }
        },
        _ => {},
    }
    false
}

/// The originally-stored path for a resolved pointer target. Linear in the
/// binding count; fails if the pointer was not produced by the resolve.
pub fn lookup_path<'a>(bindings: &'a [PathBinding], target: NodeId) -> Result<&'a str> {
    bindings
        .iter()
        .find(|binding| binding.target == Some(target))
        .map(|binding| binding.path.as_str())
        .ok_or_else(|| Error::MemberNotFound("pointer target not in resolved bindings".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, ParseMode};

    fn doc_with_ref() -> Document {
        Document::parse(
            br#"{"data":{"x":"v"},"ref":"$cppon-path:/data/x"}"#,
            ParseMode::Quick,
        )
        .unwrap()
    }

    #[test]
    fn find_collects_in_dfs_order() {
        let doc = doc_with_ref();
        let refs = find_references(&doc);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, "/data/x");
    }

    #[test]
    fn resolve_and_restore_are_inverse() {
        let mut doc = doc_with_ref();
        let slot = doc.get("/ref").unwrap();
        assert!(matches!(doc.node(slot), Node::Path(_)));

        let bindings = resolve_paths(&mut doc);
        assert_eq!(bindings.len(), 1);
        let target = bindings[0].target.unwrap();
        assert_eq!(doc.node(slot), &Node::Pointer(Some(target)));
        assert_eq!(doc.text_of(target).unwrap(), "v");

        restore_paths(&mut doc, &bindings).unwrap();
        match doc.node(slot) {
            Node::Path(token) => assert_eq!(token.as_str(), "/data/x"),
            other => panic!("expected a path token, got {other:?}"),
        }
    }

    #[test]
    fn broken_reference_becomes_null_pointer() {
        let mut doc = Document::parse(
            br#"{"ref":"$cppon-path:/no/such/node"}"#,
            ParseMode::Quick,
        )
        .unwrap();
        let slot = doc.get("/ref").unwrap();
        let bindings = resolve_paths(&mut doc);
        assert_eq!(bindings[0].target, None);
        assert_eq!(doc.node(slot), &Node::Pointer(None));
    }

    #[test]
    fn cycle_detection() {
        let mut doc = Document::new();
        doc.set("/a/val", 1i64).unwrap();
        let a = doc.get("/a").unwrap();
        doc.set("/a/me", a).unwrap();
        assert!(is_cyclic(&doc, a));
        let val = doc.get("/a/val").unwrap();
        assert!(!is_cyclic(&doc, val));
        assert!(contains(&doc, a, val));
    }

    #[test]
    fn reverse_lookup() {
        let mut doc = Document::new();
        doc.set("/list/2/deep", true).unwrap();
        let deep = doc.get("/list/2/deep").unwrap();
        assert_eq!(
            find_path(&doc, doc.root(), deep).unwrap(),
            "/list/2/deep"
        );
        assert_eq!(find_path(&doc, doc.root(), doc.root()).unwrap(), "/");
        let mut other = Document::new();
        other.set("/x", 1i64).unwrap();
        assert_eq!(find_path(&doc, doc.root(), NodeId(9999)), None);
    }

    #[test]
    fn lookup_path_scans_bindings() {
        let mut doc = doc_with_ref();
        let bindings = resolve_paths(&mut doc);
        let target = bindings[0].target.unwrap();
        assert_eq!(lookup_path(&bindings, target).unwrap(), "/data/x");
        assert!(lookup_path(&bindings, doc.root()).is_err());
    }
}
