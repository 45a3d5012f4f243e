//! The printer: tree in, text out.
//!
//! Layout is driven by a [`PrintOptions`] value, built directly or parsed
//! from an options tree (the same node type as data). Output is compact by
//! default; pretty mode indents with spaces and can inline selected object
//! keys. Flatten inlines pointer targets unless doing so would recurse;
//! JSON-compatible mode restricts output to strict JSON and rejects
//! integers outside the 53-bit safe range.

use std::cell::Cell;
use std::fmt::Write as _;

use crate::document::Document;
use crate::node::{Node, NodeId, NodeKind, NumberKind};
use crate::refs::{self, PathBinding};
use crate::{Error, Result, codec, constants};

/// Largest integer magnitude strict JSON consumers hold exactly.
const JSON_SAFE_MAX: i64 = 9_007_199_254_740_991;

thread_local! {
    /// Capacity hint retained between prints on this thread.
    static RETAINED_CAPACITY: Cell<usize> = const { Cell::new(0) };
}

/// Which objects print inline when pretty mode is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Compaction {
    /// No forced inlining.
    #[default]
    None,
    /// Every container prints inline.
    All,
    /// Objects under these keys print inline, subtrees included.
    Keys(Vec<String>),
}

/// Printer options.
///
/// # Example
///
/// ```
/// use cppon::{Document, ParseMode, PrintOptions};
///
/// let doc = Document::parse(br#"{"a":1,"b":[true,null,"s"]}"#, ParseMode::Quick).unwrap();
/// let out = doc.print(&PrintOptions::default()).unwrap();
/// assert_eq!(out, r#"{"a":1,"b":[true,null,"s"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Indent output with newlines and spaces.
    pub pretty: bool,
    /// In pretty mode, open nested containers on their own line.
    pub alt_layout: bool,
    /// Restrict output to strict JSON.
    pub compatible: bool,
    /// Inline pointer targets instead of emitting path tokens.
    pub flatten: bool,
    /// Keep the output length as a capacity hint for the next print on
    /// this thread.
    pub retain_buffer: bool,
    /// Drop the retained capacity hint before printing.
    pub reset_buffer: bool,
    /// Preallocate the output buffer from the element count.
    pub reserve: bool,
    /// Forced-inline selection for pretty mode.
    pub compact: Compaction,
    /// Left offset, in spaces, added to every broken line.
    pub margin: usize,
    /// Indent step, in spaces.
    pub tab_width: usize,
    /// Preallocation guess, in bytes per tree element.
    pub reserve_per_element: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            alt_layout: false,
            compatible: false,
            flatten: false,
            retain_buffer: false,
            reset_buffer: false,
            reserve: true,
            compact: Compaction::None,
            margin: 0,
            tab_width: 2,
            reserve_per_element: constants::PRINTER_RESERVE_PER_ELEMENT,
        }
    }
}

impl PrintOptions {
    /// Strict JSON output: compatible on, flatten off.
    #[must_use]
    pub fn json() -> Self {
        Self {
            compatible: true,
            flatten: false,
            ..Self::default()
        }
    }

    /// Reference-inlining output: flatten on.
    #[must_use]
    pub fn flatten() -> Self {
        Self {
            flatten: true,
            ..Self::default()
        }
    }

    /// Parse an options object from its textual form.
    ///
    /// ```
    /// use cppon::PrintOptions;
    ///
    /// let opts = PrintOptions::parse(br#"{"pretty":true,"tabulation":4}"#).unwrap();
    /// assert!(opts.pretty);
    /// assert_eq!(opts.tab_width, 4);
    /// ```
    pub fn parse(text: &[u8]) -> Result<Self> {
        let doc = Document::parse(text, crate::ParseMode::Quick)?;
        Self::from_node(&doc, doc.root())
    }

    /// Build options from an already-parsed options tree.
    ///
    /// Unknown keys and malformed shapes fail fast with `bad_option`.
    pub fn from_node(doc: &Document, id: NodeId) -> Result<Self> {
        let object = doc
            .node(id)
            .as_object()
            .ok_or_else(|| Error::bad_option("options must be an object"))?;
        let mut opts = Self::default();
        for (key, child) in object.entries() {
            let key = doc.key_text(key);
            match key.as_ref() {
                "buffer" => opts.apply_buffer(doc, *child)?,
                "layout" => opts.apply_layout(doc, *child)?,
                "compact" => opts.apply_compact(doc, *child)?,
                "pretty" => opts.pretty = opt_bool(doc, *child)?,
                "margin" => opts.margin = opt_usize(doc, *child)?,
                "tabulation" => opts.tab_width = opt_usize(doc, *child)?,
                other => return Err(Error::bad_option(format!("unknown key {other:?}"))),
            }
        }
        Ok(opts)
    }

    fn apply_buffer(&mut self, doc: &Document, id: NodeId) -> Result<()> {
        if let Some(word) = doc.text_of(id) {
            return match word.as_ref() {
                "reset" => {
                    self.reset_buffer = true;
                    Ok(())
                },
                "retain" => {
                    self.retain_buffer = true;
                    Ok(())
                },
                "reserve" => {
                    self.reserve = true;
                    Ok(())
                },
                "noreserve" => {
                    self.reserve = false;
                    Ok(())
                },
                other => Err(Error::bad_option(format!("unknown buffer mode {other:?}"))),
            };
        }
        let object = doc
            .node(id)
            .as_object()
            .ok_or_else(|| Error::bad_option("buffer must be a string or an object"))?;
        for (key, child) in object.entries() {
            match doc.key_text(key).as_ref() {
                "reset" => self.reset_buffer = opt_bool(doc, *child)?,
                "retain" => self.retain_buffer = opt_bool(doc, *child)?,
                "reserve" => self.reserve = opt_bool(doc, *child)?,
                other => return Err(Error::bad_option(format!("unknown buffer key {other:?}"))),
            }
        }
        Ok(())
    }

    fn apply_layout(&mut self, doc: &Document, id: NodeId) -> Result<()> {
        if let Some(alias) = doc.text_of(id) {
            return match alias.as_ref() {
                "json" => {
                    self.compatible = true;
                    self.flatten = false;
                    Ok(())
                },
                "flatten" => {
                    self.flatten = true;
                    Ok(())
                },
                "cppon" => {
                    self.compatible = false;
                    self.flatten = false;
                    Ok(())
                },
                other => Err(Error::bad_option(format!("unknown layout alias {other:?}"))),
            };
        }
        let object = doc
            .node(id)
            .as_object()
            .ok_or_else(|| Error::bad_option("layout must be a string or an object"))?;
        for (key, child) in object.entries() {
            match doc.key_text(key).as_ref() {
                "json" => self.compatible = opt_bool(doc, *child)?,
                "flatten" => self.flatten = opt_bool(doc, *child)?,
                "alt" => self.alt_layout = opt_bool(doc, *child)?,
                other => return Err(Error::bad_option(format!("unknown layout key {other:?}"))),
            }
        }
        Ok(())
    }

    fn apply_compact(&mut self, doc: &Document, id: NodeId) -> Result<()> {
        match doc.node(id) {
            Node::Boolean(true) => {
                self.compact = Compaction::All;
                Ok(())
            },
            Node::Boolean(false) => {
                self.compact = Compaction::None;
                Ok(())
            },
            Node::Array(items) => {
                let mut keys = Vec::with_capacity(items.len());
                for &item in items {
                    let key = doc
                        .text_of(item)
                        .ok_or_else(|| Error::bad_option("compact list entries must be strings"))?;
                    keys.push(key.into_owned());
                }
                self.compact = Compaction::Keys(keys);
                Ok(())
            },
            _ => Err(Error::bad_option("compact must be a boolean or a string list")),
        }
    }
}

fn opt_bool(doc: &Document, id: NodeId) -> Result<bool> {
    match doc.node(id) {
        Node::Boolean(flag) => Ok(*flag),
        node => Err(Error::bad_option(format!(
            "expected a boolean, found {}",
            node.kind().name()
        ))),
    }
}

fn opt_usize(doc: &Document, id: NodeId) -> Result<usize> {
    let wrong = |kind: NodeKind| Error::bad_option(format!("expected an integer, found {}", kind.name()));
    let node = match doc.node(id) {
        Node::Number(lazy) if lazy.kind.is_integer() => {
            codec::parse_number(doc.span_bytes(lazy.span), lazy.kind)?
        },
        node => node.clone(),
    };
    match node {
        Node::Int8(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Int8)),
        Node::Uint8(v) => Ok(usize::from(v)),
        Node::Int16(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Int16)),
        Node::Uint16(v) => Ok(usize::from(v)),
        Node::Int32(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Int32)),
        Node::Uint32(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Uint32)),
        Node::Int64(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Int64)),
        Node::Uint64(v) => usize::try_from(v).map_err(|_| wrong(NodeKind::Uint64)),
        other => Err(wrong(other.kind())),
    }
}

impl Document {
    /// Print the tree from its root.
    pub fn print(&self, opts: &PrintOptions) -> Result<String> {
        self.print_with(opts, None)
    }

    /// Print with resolver bindings for pointer reverse lookup; without
    /// them, pointer paths are recovered by depth-first search.
    pub fn print_with(&self, opts: &PrintOptions, bindings: Option<&[PathBinding]>) -> Result<String> {
        if opts.reset_buffer {
            RETAINED_CAPACITY.with(|cell| cell.set(0));
        }
        let total = self.node_count();
        let predicted = opts.reserve_per_element.saturating_mul(total);
        let mut out = String::new();
        if opts.reserve {
            let hint = if opts.retain_buffer {
                predicted.max(RETAINED_CAPACITY.with(Cell::get))
            } else {
                predicted
            };
            out.reserve(hint);
        }
        let mut emitter = Emitter {
            doc: self,
            opts,
            bindings,
            out,
            indent: 0,
            active: Vec::new(),
            emitted: 0,
            predicted,
            total,
            boosted: false,
        };
        emitter.emit(self.root(), false)?;
        let out = emitter.out;
        if opts.retain_buffer {
            RETAINED_CAPACITY.with(|cell| cell.set(out.len()));
        }
        Ok(out)
    }

    /// Print with default options (compact, full fidelity).
    pub fn to_text(&self) -> Result<String> {
        self.print(&PrintOptions::default())
    }
}

struct Emitter<'a> {
    doc: &'a Document,
    opts: &'a PrintOptions,
    bindings: Option<&'a [PathBinding]>,
    out: String,
    indent: usize,
    /// Pointer targets currently being flattened; a repeat visit falls
    /// back to a path token so cycles stay finite.
    active: Vec<NodeId>,
    emitted: usize,
    predicted: usize,
    total: usize,
    boosted: bool,
}

impl Emitter<'_> {
    fn line_break(&mut self) {
        self.out.push('\n');
        let spaces = self.opts.margin + self.indent * self.opts.tab_width;
        for _ in 0..spaces {
            self.out.push(' ');
        }
    }

    /// One-shot reserve adjustment once actual usage outruns the guess.
    fn adjust_reserve(&mut self) {
        if self.opts.reserve
            && !self.boosted
            && self.emitted > 0
            && self.out.len() > self.predicted
        {
            let average = self.out.len() / self.emitted;
            let remaining = self.total.saturating_sub(self.emitted);
            self.out.reserve(average.saturating_mul(remaining));
            self.boosted = true;
        }
    }

    fn emit(&mut self, id: NodeId, inline: bool) -> Result<()> {
        self.emitted += 1;
        self.adjust_reserve();
        match self.doc.node(id) {
            Node::Object(_) => self.emit_object(id, inline),
            Node::Array(_) => self.emit_array(id, inline),
            Node::Double(v) => {
                push_double(&mut self.out, *v);
                Ok(())
            },
            Node::Float(v) => {
                push_float(&mut self.out, *v, self.opts.compatible);
                Ok(())
            },
            Node::Int8(v) => self.emit_integer(i64::from(*v), "i8"),
            Node::Uint8(v) => self.emit_integer(i64::from(*v), "u8"),
            Node::Int16(v) => self.emit_integer(i64::from(*v), "i16"),
            Node::Uint16(v) => self.emit_integer(i64::from(*v), "u16"),
            Node::Int32(v) => self.emit_integer(i64::from(*v), "i32"),
            Node::Uint32(v) => self.emit_integer(i64::from(*v), "u32"),
            Node::Int64(v) => self.emit_integer(*v, ""),
            Node::Uint64(v) => self.emit_uint64(*v),
            Node::Number(lazy) => self.emit_lazy(*lazy),
            Node::Boolean(flag) => {
                self.out.push_str(if *flag { "true" } else { "false" });
                Ok(())
            },
            Node::View(span) => {
                let text = self.doc.source().text(*span).into_owned();
                self.emit_string_literal(&text);
                Ok(())
            },
            Node::Text(text) => {
                let text = text.clone();
                self.emit_string_literal(&text);
                Ok(())
            },
            Node::Base64(span) => {
                let text = self.doc.source().text(*span).into_owned();
                self.emit_prefixed(&self.doc.config().blob_prefix.clone(), &text);
                Ok(())
            },
            Node::Blob(bytes) => {
                let encoded = codec::base64_encode(bytes);
                self.emit_prefixed(&self.doc.config().blob_prefix.clone(), &encoded);
                Ok(())
            },
            Node::Path(token) => {
                let path = token.as_str().to_owned();
                self.emit_prefixed(&self.doc.config().path_prefix.clone(), &path);
                Ok(())
            },
            Node::Pointer(None) => {
                self.out.push_str("null");
                Ok(())
            },
            Node::Pointer(Some(target)) => self.emit_pointer(*target, inline),
            Node::Null => {
                self.out.push_str("null");
                Ok(())
            },
        }
    }

    fn emit_object(&mut self, id: NodeId, inline: bool) -> Result<()> {
        let compact =
            inline || !self.opts.pretty || matches!(self.opts.compact, Compaction::All);
        let entries = self.doc.object(id)?.entries().to_vec();
        if entries.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        if !compact {
            self.indent += 1;
        }
        for (i, (key, child)) in entries.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            if !compact {
                self.line_break();
            }
            let key_text = self.doc.key_text(key).into_owned();
            self.out.push('"');
            self.out.push_str(&key_text);
            self.out.push('"');
            self.out.push(':');
            let force_inline = inline
                || match &self.opts.compact {
                    Compaction::Keys(keys) => keys.iter().any(|k| k == &key_text),
                    Compaction::All => true,
                    Compaction::None => false,
                };
            if !compact {
                if self.opts.alt_layout && self.is_open_container(*child) && !force_inline {
                    self.line_break();
                } else {
                    self.out.push(' ');
                }
            }
            self.emit(*child, force_inline)?;
        }
        if !compact {
            self.indent -= 1;
            self.line_break();
        }
        self.out.push('}');
        Ok(())
    }

    fn emit_array(&mut self, id: NodeId, inline: bool) -> Result<()> {
        let compact =
            inline || !self.opts.pretty || matches!(self.opts.compact, Compaction::All);
        let items = self.doc.array(id)?.to_vec();
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        if !compact {
            self.indent += 1;
        }
        for (i, child) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            if !compact {
                self.line_break();
            }
            self.emit(*child, inline)?;
        }
        if !compact {
            self.indent -= 1;
            self.line_break();
        }
        self.out.push(']');
        Ok(())
    }

    /// Containers with at least one entry; only these get the alt-layout
    /// line break before the brace.
    fn is_open_container(&self, id: NodeId) -> bool {
        match self.doc.node(id) {
            Node::Object(obj) => !obj.is_empty(),
            Node::Array(items) => !items.is_empty(),
            _ => false,
        }
    }

    fn emit_integer(&mut self, value: i64, suffix: &str) -> Result<()> {
        if self.opts.compatible && !(-JSON_SAFE_MAX..=JSON_SAFE_MAX).contains(&value) {
            return Err(Error::JsonCompatibility(format!(
                "integer {value} outside the 53-bit safe range"
            )));
        }
        // Display for integers never fails; the write trait demands the check.
        let _ = write!(self.out, "{value}");
        if !self.opts.compatible {
            self.out.push_str(suffix);
        }
        Ok(())
    }

    fn emit_uint64(&mut self, value: u64) -> Result<()> {
        #[allow(clippy::cast_sign_loss)]
        if self.opts.compatible && value > JSON_SAFE_MAX as u64 {
            return Err(Error::JsonCompatibility(format!(
                "integer {value} outside the 53-bit safe range"
            )));
        }
        let _ = write!(self.out, "{value}");
        if !self.opts.compatible {
            self.out.push_str("u64");
        }
        Ok(())
    }

    /// A lazy token prints verbatim; compatible mode strips the suffix and
    /// range-checks 64-bit integer tokens.
    fn emit_lazy(&mut self, lazy: crate::node::LazyNumber) -> Result<()> {
        let bytes = self.doc.span_bytes(lazy.span).to_vec();
        if !self.opts.compatible {
            self.out.push_str(&String::from_utf8_lossy(&bytes));
            return Ok(());
        }
        let stripped = codec::strip_suffix(&bytes, lazy.kind).to_vec();
        let text = String::from_utf8_lossy(&stripped).into_owned();
        match lazy.kind {
            NumberKind::Int64 => {
                let value: i64 = text
                    .parse()
                    .map_err(|_| Error::InvalidNumber(text.clone()))?;
                return self.emit_integer(value, "");
            },
            NumberKind::Uint64 => {
                let value: u64 = text
                    .parse()
                    .map_err(|_| Error::InvalidNumber(text.clone()))?;
                return self.emit_uint64(value);
            },
            _ => {},
        }
        self.out.push_str(&text);
        Ok(())
    }

    fn emit_string_literal(&mut self, text: &str) {
        // Escapes were preserved on parse and are not re-applied here.
        self.out.push('"');
        self.out.push_str(text);
        self.out.push('"');
    }

    /// Reference strings carry their prefix except in compatible mode,
    /// which never emits non-standard prefixes.
    fn emit_prefixed(&mut self, prefix: &str, payload: &str) {
        self.out.push('"');
        if !self.opts.compatible {
            self.out.push_str(prefix);
        }
        self.out.push_str(payload);
        self.out.push('"');
    }

    fn emit_pointer(&mut self, target: NodeId, inline: bool) -> Result<()> {
        if self.opts.flatten
            && !self.active.contains(&target)
            && !refs::is_cyclic(self.doc, target)
        {
            self.active.push(target);
            let result = self.emit(target, inline);
            self.active.pop();
            return result;
        }
        let path = self
            .bindings
            .and_then(|bindings| refs::lookup_path(bindings, target).ok().map(str::to_owned))
            .or_else(|| refs::find_path(self.doc, self.doc.root(), target));
        match path {
            Some(path) => {
                let prefix = self.doc.config().path_prefix.clone();
                self.emit_prefixed(&prefix, &path);
                Ok(())
            },
            None => {
                self.out.push_str("null");
                Ok(())
            },
        }
    }
}

fn push_double(out: &mut String, value: f64) {
    if !value.is_finite() {
        out.push_str("null");
        return;
    }
    let start = out.len();
    let _ = write!(out, "{value}");
    if !out[start..].contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
}

fn push_float(out: &mut String, value: f32, compatible: bool) {
    if !value.is_finite() {
        out.push_str("null");
        return;
    }
    let start = out.len();
    let _ = write!(out, "{value}");
    if !out[start..].contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
    if !compatible {
        out.push('f');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseMode;

    #[test]
    fn doubles_force_decimal_point() {
        let mut out = String::new();
        push_double(&mut out, 1.0);
        assert_eq!(out, "1.0");
        out.clear();
        push_double(&mut out, 1.5e-3);
        assert_eq!(out, "0.0015");
        out.clear();
        push_double(&mut out, f64::NAN);
        assert_eq!(out, "null");
    }

    #[test]
    fn float_suffix_depends_on_mode() {
        let mut out = String::new();
        push_float(&mut out, 1.0, false);
        assert_eq!(out, "1.0f");
        out.clear();
        push_float(&mut out, 1.0, true);
        assert_eq!(out, "1.0");
    }

    #[test]
    fn options_aliases() {
        let opts = PrintOptions::parse(br#"{"layout":"json"}"#).unwrap();
        assert!(opts.compatible);
        assert!(!opts.flatten);
        let opts = PrintOptions::parse(br#"{"layout":"flatten"}"#).unwrap();
        assert!(opts.flatten);
        let opts = PrintOptions::parse(br#"{"layout":{"json":true,"alt":true}}"#).unwrap();
        assert!(opts.compatible);
        assert!(opts.alt_layout);
    }

    #[test]
    fn options_reject_unknown_shapes() {
        assert!(matches!(
            PrintOptions::parse(br#"{"wat":1}"#),
            Err(Error::BadOption(_))
        ));
        assert!(matches!(
            PrintOptions::parse(br#"{"pretty":"yes"}"#),
            Err(Error::BadOption(_))
        ));
        assert!(matches!(
            PrintOptions::parse(br#"{"layout":"fancy"}"#),
            Err(Error::BadOption(_))
        ));
        assert!(matches!(
            PrintOptions::parse(br#"{"compact":3}"#),
            Err(Error::BadOption(_))
        ));
        assert!(matches!(
            PrintOptions::parse(br#"[1]"#),
            Err(Error::BadOption(_))
        ));
    }

    #[test]
    fn options_buffer_and_numbers() {
        let opts = PrintOptions::parse(br#"{"buffer":"retain","margin":3,"tabulation":4}"#).unwrap();
        assert!(opts.retain_buffer);
        assert_eq!(opts.margin, 3);
        assert_eq!(opts.tab_width, 4);
        let opts = PrintOptions::parse(br#"{"buffer":{"reset":true,"reserve":false}}"#).unwrap();
        assert!(opts.reset_buffer);
        assert!(!opts.reserve);
        let opts = PrintOptions::parse(br#"{"compact":["meta"]}"#).unwrap();
        assert_eq!(opts.compact, Compaction::Keys(vec!["meta".to_string()]));
    }

    #[test]
    fn compact_round_trip() {
        let text = br#"{"a":1,"b":[true,null,"s"]}"#;
        let doc = Document::parse(text, ParseMode::Quick).unwrap();
        assert_eq!(doc.to_text().unwrap().as_bytes(), text);
    }

    #[test]
    fn typed_suffixes_round_trip_outside_compat() {
        let mut doc = Document::new();
        doc.set("/a", 5i8).unwrap();
        doc.set("/b", 7u32).unwrap();
        doc.set("/c", 9i64).unwrap();
        doc.set("/d", 11u64).unwrap();
        assert_eq!(doc.to_text().unwrap(), r#"{"a":5i8,"b":7u32,"c":9,"d":11u64}"#);
        let strict = doc.print(&PrintOptions::json()).unwrap();
        assert_eq!(strict, r#"{"a":5,"b":7,"c":9,"d":11}"#);
    }

    #[test]
    fn compat_blocks_unsafe_integers() {
        let mut doc = Document::new();
        doc.set("/n", 9_007_199_254_740_992i64).unwrap();
        assert!(matches!(
            doc.print(&PrintOptions::json()),
            Err(Error::JsonCompatibility(_))
        ));
        doc.set("/n", 9_007_199_254_740_991i64).unwrap();
        assert_eq!(doc.print(&PrintOptions::json()).unwrap(), r#"{"n":9007199254740991}"#);
    }

    #[test]
    fn compat_strips_prefixes() {
        let doc = Document::parse(
            br#"{"r":"$cppon-path:/x","b":"$cppon-blob:QUJD"}"#,
            ParseMode::Quick,
        )
        .unwrap();
        assert_eq!(
            doc.print(&PrintOptions::json()).unwrap(),
            r#"{"r":"/x","b":"QUJD"}"#
        );
        assert_eq!(
            doc.to_text().unwrap(),
            r#"{"r":"$cppon-path:/x","b":"$cppon-blob:QUJD"}"#
        );
    }

    #[test]
    fn lazy_suffix_stripped_in_compat() {
        let doc = Document::parse(br#"{"a":42i8,"b":1.0f}"#, ParseMode::Quick).unwrap();
        assert_eq!(doc.to_text().unwrap(), r#"{"a":42i8,"b":1.0f}"#);
        assert_eq!(doc.print(&PrintOptions::json()).unwrap(), r#"{"a":42,"b":1.0}"#);
    }

    #[test]
    fn buffer_hint_retained_per_thread() {
        let doc = Document::parse(br#"[1,2,3]"#, ParseMode::Quick).unwrap();
        let opts = PrintOptions {
            retain_buffer: true,
            ..PrintOptions::default()
        };
        let out = doc.print(&opts).unwrap();
        assert_eq!(RETAINED_CAPACITY.with(Cell::get), out.len());
        let reset = PrintOptions {
            reset_buffer: true,
            ..PrintOptions::default()
        };
        let _ = doc.print(&reset).unwrap();
        assert_eq!(RETAINED_CAPACITY.with(Cell::get), 0);
    }
}
