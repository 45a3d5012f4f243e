//! The owning document: source buffer, node arena, and root stack.
//!
//! A [`Document`] owns everything a tree needs: the sentinel-padded copy of
//! the parse input, the arena of [`Node`]s, the per-document root stack
//! used for absolute-path resolution, and the configuration knobs. Handles
//! ([`NodeId`]) index the arena and stay valid for the document's lifetime;
//! overwritten subtrees simply become unreachable slots until the document
//! is dropped.
//!
//! Slot 0 of every arena is a reserved null sentinel. Read-only traversal
//! returns it for missing members so the dereference path stays uniform;
//! it is never writable.

use std::borrow::Cow;
use std::cell::RefCell;

use crate::constants::Config;
use crate::node::{Key, Node, NodeId, NodeKind, Object, PathToken};
use crate::parser::{self, ParseMode};
use crate::source::{SourceBuffer, Span};
use crate::{Error, Result, codec};

/// A parsed or built value tree.
///
/// # Example
///
/// ```
/// use cppon::{Document, ParseMode};
///
/// let doc = Document::parse(br#"{"a":1,"b":[true,null,"s"]}"#, ParseMode::Quick).unwrap();
/// assert!(doc.get_strict::<bool>("/b/0").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) source: SourceBuffer,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    /// Root stack: sentinel at the bottom, document root above it. Reads
    /// may hoist entries, hence the interior mutability.
    pub(crate) roots: RefCell<Vec<NodeId>>,
    pub(crate) config: Config,
}

impl Document {
    /// Parse `text` with the default configuration.
    ///
    /// The input is copied into a sentinel-terminated buffer owned by the
    /// document; borrowed views into the tree reference that copy. Empty
    /// input parses to null.
    pub fn parse(text: &[u8], mode: ParseMode) -> Result<Self> {
        parser::parse_document(text, mode, Config::default())
    }

    /// Parse `text` with explicit configuration knobs.
    pub fn parse_with(text: &[u8], mode: ParseMode, config: Config) -> Result<Self> {
        config.validate()?;
        parser::parse_document(text, mode, config)
    }

    /// Create an empty document whose root is null.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty document with explicit configuration knobs.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let nodes = vec![Node::Null, Node::Null];
        let root = NodeId(1);
        Self {
            source: SourceBuffer::new(b""),
            nodes,
            root,
            roots: RefCell::new(vec![NodeId::SENTINEL, root]),
            config,
        }
    }

    /// The document root.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The source buffer this document's views borrow from.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &SourceBuffer {
        &self.source
    }

    /// The configuration knobs this document was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of allocated nodes, the reserved sentinel excluded.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    // ========================================================================
    // Arena access
    // ========================================================================

    /// The node a handle designates.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this document.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        debug_assert!(id != NodeId::SENTINEL, "the sentinel slot is read-only");
        &mut self.nodes[id.index()]
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    /// Returns `true` if the handle is the reserved missing-member sentinel.
    #[inline]
    #[must_use]
    pub fn is_sentinel(&self, id: NodeId) -> bool {
        id == NodeId::SENTINEL
    }

    /// Discriminant of the designated node.
    #[inline]
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Returns `true` if the designated node is null (the sentinel is).
    #[inline]
    #[must_use]
    pub fn is_null(&self, id: NodeId) -> bool {
        self.node(id).is_null()
    }

    /// Children of an array node, `type_mismatch` otherwise.
    pub fn array(&self, id: NodeId) -> Result<&[NodeId]> {
        self.node(id).try_array()
    }

    /// Storage of an object node, `type_mismatch` otherwise.
    pub fn object(&self, id: NodeId) -> Result<&Object> {
        self.node(id).try_object()
    }

    /// First child with the given key, comparing keys as byte sequences.
    #[must_use]
    pub fn member(&self, object: NodeId, name: &str) -> Option<NodeId> {
        let obj = self.node(object).as_object()?;
        obj.entries()
            .iter()
            .find(|(key, _)| self.key_bytes(key) == name.as_bytes())
            .map(|&(_, child)| child)
    }

    /// The byte sequence of an object key.
    #[inline]
    #[must_use]
    pub fn key_bytes<'a>(&'a self, key: &'a Key) -> &'a [u8] {
        match key {
            Key::View(span) => self.source.slice(*span),
            Key::Text(text) => text.as_bytes(),
        }
    }

    /// The text of an object key.
    #[inline]
    #[must_use]
    pub fn key_text<'a>(&'a self, key: &'a Key) -> Cow<'a, str> {
        String::from_utf8_lossy(self.key_bytes(key))
    }

    /// The text of a string node (borrowed view or owned), if it is one.
    #[must_use]
    pub fn text_of(&self, id: NodeId) -> Option<Cow<'_, str>> {
        match self.node(id) {
            Node::View(span) => Some(self.source.text(*span)),
            Node::Text(text) => Some(Cow::Borrowed(text)),
            _ => None,
        }
    }

    /// The byte range of a borrowed token, resolved against the source.
    #[inline]
    #[must_use]
    pub(crate) fn span_bytes(&self, span: Span) -> &[u8] {
        self.source.slice(span)
    }

    // ========================================================================
    // Root stack
    // ========================================================================

    /// Make `id` the current root; hoists instead of duplicating if the
    /// node is already on the stack.
    pub fn push_root(&self, id: NodeId) {
        let mut roots = self.roots.borrow_mut();
        if let Some(pos) = roots.iter().position(|&r| r == id) {
            roots.remove(pos);
        }
        roots.push(id);
    }

    /// Remove `id` from the root stack; no-op if absent.
    pub fn pop_root(&self, id: NodeId) {
        if id == NodeId::SENTINEL {
            return;
        }
        let mut roots = self.roots.borrow_mut();
        if let Some(pos) = roots.iter().position(|&r| r == id) {
            roots.remove(pos);
        }
    }

    /// The node absolute paths currently resolve against.
    #[must_use]
    pub fn current_root(&self) -> NodeId {
        let roots = self.roots.borrow();
        let top = *roots.last().unwrap_or(&NodeId::SENTINEL);
        debug_assert!(top != NodeId::SENTINEL, "root stack bottomed out");
        top
    }

    /// Make `id` the current root for the guard's lifetime.
    ///
    /// The entry is released on every exit path, panics included.
    #[must_use]
    pub fn scoped_root(&self, id: NodeId) -> RootGuard<'_> {
        self.push_root(id);
        RootGuard { doc: self, id }
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Replace the designated slot with a new value.
    ///
    /// An in-tree pointer is validated against this arena before the write;
    /// a handle that does not designate a live node of this tree is an
    /// `unsafe_pointer_assignment`. Writing through the sentinel is a
    /// `type_mismatch`.
    pub fn assign(&mut self, id: NodeId, value: impl Into<Node>) -> Result<()> {
        let node = value.into();
        if id == NodeId::SENTINEL {
            return Err(Error::mismatch("writable slot", NodeKind::Null));
        }
        if let Node::Pointer(Some(target)) = node {
            if target == NodeId::SENTINEL || target.index() >= self.nodes.len() {
                return Err(Error::UnsafePointerAssignment);
            }
        }
        *self.node_mut(id) = node;
        Ok(())
    }

    /// Convert a lazy number slot into its concrete numeric alternative.
    ///
    /// A slot that is already a concrete numeric is left alone. Any other
    /// kind is a `type_mismatch`. Conversion happens at most once: the
    /// replaced slot is never lazy again.
    pub fn realize_number(&mut self, id: NodeId) -> Result<()> {
        match self.node(id) {
            Node::Number(lazy) => {
                let lazy = *lazy;
                let concrete = codec::parse_number(self.span_bytes(lazy.span), lazy.kind)?;
                *self.node_mut(id) = concrete;
                Ok(())
            },
            node if node.is_numeric() => Ok(()),
            node => Err(Error::mismatch("number", node.kind())),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped root-stack entry; see [`Document::scoped_root`].
#[derive(Debug)]
pub struct RootGuard<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl Drop for RootGuard<'_> {
    fn drop(&mut self) {
        self.doc.pop_root(self.id);
    }
}

// ============================================================================
// VALUE CONVERSIONS FOR ASSIGNMENT
// ============================================================================

impl From<()> for Node {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i8> for Node {
    fn from(v: i8) -> Self {
        Self::Int8(v)
    }
}

impl From<u8> for Node {
    fn from(v: u8) -> Self {
        Self::Uint8(v)
    }
}

impl From<i16> for Node {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<u16> for Node {
    fn from(v: u16) -> Self {
        Self::Uint16(v)
    }
}

impl From<i32> for Node {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for Node {
    fn from(v: u32) -> Self {
        Self::Uint32(v)
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for Node {
    fn from(v: u64) -> Self {
        Self::Uint64(v)
    }
}

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Self::Text(v.into_boxed_str())
    }
}

impl From<Vec<u8>> for Node {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<PathToken> for Node {
    fn from(v: PathToken) -> Self {
        Self::Path(v)
    }
}

/// A handle assigns as an in-tree pointer to the designated node.
impl From<NodeId> for Node {
    fn from(v: NodeId) -> Self {
        Self::Pointer(Some(v))
    }
}
