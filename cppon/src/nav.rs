//! Path-segmented navigation over the tree.
//!
//! One dispatch accepts three index forms: an integer (array position), a
//! bare member name, and a slash-separated path. Paths are walked left to
//! right; an all-digit segment targets an array, anything else targets an
//! object. A leading `/` makes the indexed node the current root before the
//! remainder resolves against it.
//!
//! Read traversal returns the reserved null sentinel for a missing leaf
//! and never mutates. Write traversal autovivifies: a null (or null
//! pointer) slot becomes the container its next segment calls for, arrays
//! grow with null fillers up to the configured maximum gap, and a slot is
//! only mutated once its segment is known to be legal.

use crate::document::Document;
use crate::node::{Key, Node, NodeId, Object};
use crate::{Error, Result};

/// An index form accepted by the navigator's single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index<'a> {
    /// Array position.
    Pos(usize),
    /// Bare object member name (may contain `/`).
    Key(&'a str),
    /// Slash-separated path, relative or absolute.
    Path(&'a str),
}

impl From<usize> for Index<'_> {
    fn from(pos: usize) -> Self {
        Self::Pos(pos)
    }
}

impl<'a> From<&'a str> for Index<'a> {
    fn from(path: &'a str) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a String> for Index<'a> {
    fn from(path: &'a String) -> Self {
        Self::Path(path)
    }
}

/// A classified path segment.
#[derive(Debug, Clone, Copy)]
enum Seg<'a> {
    Pos(usize),
    Key(&'a str),
}

/// Classify one segment: a pure digit run targets an array, anything else
/// targets an object. A segment that starts with a digit but is not a pure
/// digit run is a bad array index.
fn classify(seg: &str) -> Result<Seg<'_>> {
    let bytes = seg.as_bytes();
    if bytes.first().is_some_and(u8::is_ascii_digit) {
        if bytes.iter().all(u8::is_ascii_digit) {
            return seg
                .parse()
                .map(Seg::Pos)
                .map_err(|_| Error::BadArrayIndex(seg.to_string()));
        }
        return Err(Error::BadArrayIndex(seg.to_string()));
    }
    Ok(Seg::Key(seg))
}

impl Document {
    // ========================================================================
    // Dereference policy
    // ========================================================================

    /// Resolve references transparently, as the read path does.
    ///
    /// An in-tree pointer yields its target (the sentinel for the null
    /// pointer); a path token resolves against the current root with its
    /// leading `/` removed; every other kind passes through.
    pub fn deref_if_ptr(&self, id: NodeId) -> Result<NodeId> {
        match self.node(id) {
            Node::Pointer(Some(target)) => Ok(*target),
            Node::Pointer(None) => Ok(NodeId::SENTINEL),
            Node::Path(token) => {
                let rest = &token.as_str()[1..];
                self.walk_read(self.current_root(), rest)
            },
            _ => Ok(id),
        }
    }

    /// Resolve references for a write: a null-pointer slot yields the slot
    /// itself so the write can replace it with a container in place.
    pub(crate) fn deref_for_write(&mut self, id: NodeId) -> Result<NodeId> {
        match self.node(id) {
            Node::Pointer(None) => Ok(id),
            Node::Pointer(Some(target)) => Ok(*target),
            Node::Path(token) => {
                let path = token.as_str().to_owned();
                self.walk_read(self.current_root(), &path[1..])
            },
            _ => Ok(id),
        }
    }

    // ========================================================================
    // Read traversal
    // ========================================================================

    /// Resolve an index against the current root, read-only.
    ///
    /// A missing member or out-of-bounds position at the leaf yields the
    /// null sentinel; crossing it with path remaining is an error.
    pub fn get<'a>(&self, index: impl Into<Index<'a>>) -> Result<NodeId> {
        self.get_at(self.current_root(), index)
    }

    /// Resolve an index against an explicit node, read-only.
    pub fn get_at<'a>(&self, node: NodeId, index: impl Into<Index<'a>>) -> Result<NodeId> {
        match index.into() {
            Index::Pos(pos) => self.step_read(node, Seg::Pos(pos)),
            Index::Key(name) => self.step_read(node, Seg::Key(name)),
            Index::Path(path) => {
                if let Some(rest) = path.strip_prefix('/') {
                    // Absolute: the indexed node becomes the current root.
                    self.push_root(node);
                    self.walk_read(node, rest)
                } else {
                    self.walk_read(node, path)
                }
            },
        }
    }

    pub(crate) fn walk_read(&self, mut cur: NodeId, path: &str) -> Result<NodeId> {
        for seg in path.split('/').filter(|seg| !seg.is_empty()) {
            cur = self.step_read(cur, classify(seg)?)?;
        }
        Ok(cur)
    }

    fn step_read(&self, cur: NodeId, seg: Seg<'_>) -> Result<NodeId> {
        let cur = self.deref_if_ptr(cur)?;
        if self.is_sentinel(cur) {
            return Err(match seg {
                Seg::Pos(pos) => Error::NullValue(pos.to_string()),
                Seg::Key(name) => Error::MemberNotFound(name.to_string()),
            });
        }
        match (self.node(cur), seg) {
            (Node::Object(_), Seg::Key(name)) => {
                Ok(self.member(cur, name).unwrap_or(NodeId::SENTINEL))
            },
            (Node::Object(_), Seg::Pos(_)) => Err(Error::mismatch("array", self.kind(cur))),
            (Node::Array(items), Seg::Pos(pos)) => {
                Ok(items.get(pos).copied().unwrap_or(NodeId::SENTINEL))
            },
            (Node::Array(_), Seg::Key(_)) => Err(Error::mismatch("object", self.kind(cur))),
            (node, _) => Err(Error::mismatch("container", node.kind())),
        }
    }

    // ========================================================================
    // Write traversal (autovivification)
    // ========================================================================

    /// Resolve an index against the current root for writing, creating
    /// intermediate containers as needed. Returns the slot to assign into.
    pub fn slot<'a>(&mut self, index: impl Into<Index<'a>>) -> Result<NodeId> {
        self.slot_at(self.current_root(), index)
    }

    /// Resolve an index against an explicit node for writing.
    pub fn slot_at<'a>(&mut self, node: NodeId, index: impl Into<Index<'a>>) -> Result<NodeId> {
        match index.into() {
            Index::Pos(pos) => self.step_write(node, Seg::Pos(pos)),
            Index::Key(name) => self.step_write(node, Seg::Key(name)),
            Index::Path(path) => {
                let (start, rest) = if let Some(rest) = path.strip_prefix('/') {
                    self.push_root(node);
                    (node, rest)
                } else {
                    (node, path)
                };
                let mut cur = start;
                for seg in rest.split('/').filter(|seg| !seg.is_empty()) {
                    cur = self.step_write(cur, classify(seg)?)?;
                }
                Ok(cur)
            },
        }
    }

    /// Resolve a slot and assign a value into it.
    ///
    /// # Example
    ///
    /// ```
    /// use cppon::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.set("/array/2/value", "x").unwrap();
    /// assert_eq!(doc.array(doc.get("/array").unwrap()).unwrap().len(), 3);
    /// ```
    pub fn set<'a>(&mut self, index: impl Into<Index<'a>>, value: impl Into<Node>) -> Result<NodeId> {
        let slot = self.slot(index)?;
        self.assign(slot, value)?;
        Ok(slot)
    }

    /// Resolve a slot against an explicit node and assign into it.
    pub fn set_at<'a>(
        &mut self,
        node: NodeId,
        index: impl Into<Index<'a>>,
        value: impl Into<Node>,
    ) -> Result<NodeId> {
        let slot = self.slot_at(node, index)?;
        self.assign(slot, value)?;
        Ok(slot)
    }

    fn step_write(&mut self, cur: NodeId, seg: Seg<'_>) -> Result<NodeId> {
        let cur = self.deref_for_write(cur)?;
        if cur == NodeId::SENTINEL {
            return Err(Error::mismatch("writable slot", self.kind(cur)));
        }
        match seg {
            Seg::Pos(pos) => self.step_write_pos(cur, pos),
            Seg::Key(name) => self.step_write_key(cur, name),
        }
    }

    fn step_write_pos(&mut self, cur: NodeId, pos: usize) -> Result<NodeId> {
        let limit = self.config.max_array_delta;
        // Legality first: the slot is only mutated once the growth is known
        // to fit the policy.
        match self.node(cur) {
            Node::Null | Node::Pointer(None) => {
                if pos > limit {
                    return Err(Error::ExcessiveArrayResize { requested: pos, limit });
                }
                let reserve = self.config.array_reserve.max(pos + 1);
                *self.node_mut(cur) = Node::Array(Vec::with_capacity(reserve));
            },
            Node::Array(items) => {
                let len = items.len();
                if pos >= len && pos - len > limit {
                    return Err(Error::ExcessiveArrayResize { requested: pos, limit });
                }
            },
            node => return Err(Error::mismatch("array", node.kind())),
        }
        let len = self.node(cur).as_array().map_or(0, <[NodeId]>::len);
        if pos >= len {
            let fillers: Vec<NodeId> = (len..=pos).map(|_| self.alloc(Node::Null)).collect();
            if let Node::Array(items) = self.node_mut(cur) {
                items.extend(fillers);
            }
        }
        match self.node(cur) {
            Node::Array(items) => Ok(items[pos]),
            _ => unreachable!("slot was just shaped into an array"),
        }
    }

    fn step_write_key(&mut self, cur: NodeId, name: &str) -> Result<NodeId> {
        match self.node(cur) {
            Node::Null | Node::Pointer(None) => {
                let reserve = self.config.object_reserve;
                *self.node_mut(cur) = Node::Object(Object::with_capacity(reserve));
            },
            Node::Object(_) => {},
            node => return Err(Error::mismatch("object", node.kind())),
        }
        // Assignment to an existing key updates the first match in place;
        // a missing key appends.
        if let Some(child) = self.member(cur, name) {
            return Ok(child);
        }
        let child = self.alloc(Node::Null);
        if let Node::Object(obj) = self.node_mut(cur) {
            obj.push(Key::Text(name.into()), child);
        }
        Ok(child)
    }
}
