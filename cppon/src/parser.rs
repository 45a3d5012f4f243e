//! The parser: text in, tree out.
//!
//! Four modes share one acceptance pass:
//!
//! - [`Parse`](ParseMode::Parse) — structural validation only, no tree.
//! - [`Quick`](ParseMode::Quick) — build the tree, keep numbers as lazy
//!   tokens and blobs as base64 tokens.
//! - [`Eval`](ParseMode::Eval) — convert numbers eagerly, keep base64.
//! - [`Full`](ParseMode::Full) — convert numbers and decode blobs.
//!
//! Strings are scanned with the quote finder and an escape-parity check;
//! escapes are preserved verbatim. Numbers are classified (dot/exponent,
//! typed suffixes) and recorded as `(span, kind)` tokens. String literals
//! starting with a configured `$` prefix become path tokens, base64
//! tokens, or number tokens.

use std::cell::RefCell;

use crate::constants::Config;
use crate::document::Document;
use crate::node::{Key, LazyNumber, Node, NodeId, NumberKind, Object, PathToken};
use crate::source::{SourceBuffer, Span};
use crate::{Error, Result, codec, scan};

/// How much of the tree a parse materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Validate structure; allocate nothing. The document root is null.
    Parse,
    /// Build the tree; leave numbers lazy and blobs as base64 tokens.
    Quick,
    /// Build the tree; convert numbers eagerly, leave base64 tokens.
    Eval,
    /// Build the tree; convert numbers and decode blobs to owned bytes.
    Full,
}

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// BOM and UTF-8 first-byte guards. Returns the content start offset.
fn preamble_guards(text: &[u8]) -> Result<usize> {
    if text.len() >= 4
        && (text[..4] == [0x00, 0x00, 0xfe, 0xff] || text[..4] == [0xff, 0xfe, 0x00, 0x00])
    {
        return Err(Error::UnexpectedUtf32Bom);
    }
    if text.len() >= 2 && (text[..2] == [0xfe, 0xff] || text[..2] == [0xff, 0xfe]) {
        return Err(Error::UnexpectedUtf16Bom);
    }
    if let Some(&first) = text.first() {
        if first & 0xf8 == 0xf8 {
            return Err(Error::InvalidUtf8Sequence);
        }
        if first & 0xc0 == 0x80 {
            return Err(Error::InvalidUtf8Continuation);
        }
    }
    Ok(if text.starts_with(&UTF8_BOM) { UTF8_BOM.len() } else { 0 })
}

pub(crate) fn parse_document(text: &[u8], mode: ParseMode, config: Config) -> Result<Document> {
    let content_start = preamble_guards(text)?;
    let source = SourceBuffer::new(text);
    let mut nodes = vec![Node::Null];
    let root = {
        let mut parser = Parser {
            buf: source.sentinel_bytes(),
            end: source.len(),
            pos: content_start,
            mode,
            emit: !matches!(mode, ParseMode::Parse),
            config: &config,
            nodes: &mut nodes,
        };
        parser.skip_ws();
        if parser.at_end() {
            NodeId::SENTINEL
        } else {
            let id = parser.accept_value()?;
            parser.skip_ws();
            if !parser.at_end() {
                return Err(Error::UnexpectedSymbol {
                    byte: parser.buf[parser.pos],
                    offset: parser.pos,
                });
            }
            id
        }
    };
    // Empty input and validate-only parses get a real null root.
    let root = if root == NodeId::SENTINEL {
        nodes.push(Node::Null);
        NodeId(u32::try_from(nodes.len() - 1).unwrap_or(u32::MAX))
    } else {
        root
    };
    Ok(Document {
        source,
        nodes,
        root,
        roots: RefCell::new(vec![NodeId::SENTINEL, root]),
        config,
    })
}

struct Parser<'a> {
    /// Sentinel-padded window.
    buf: &'a [u8],
    /// Content length; `buf[end]` is the NUL sentinel.
    end: usize,
    pos: usize,
    mode: ParseMode,
    emit: bool,
    config: &'a Config,
    nodes: &'a mut Vec<Node>,
}

impl Parser<'_> {
    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    #[inline]
    fn skip_ws(&mut self) {
        self.pos = scan::skip_whitespace(self.buf, self.pos, self.config.trusted_whitespace);
    }

    /// Skip whitespace and require more input; the context tags the
    /// construct in progress for the end-of-text error.
    fn skip_ws_expect(&mut self, context: &'static str) -> Result<u8> {
        self.skip_ws();
        if self.at_end() {
            return Err(Error::UnexpectedEndOfText { context });
        }
        Ok(self.buf[self.pos])
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn emit_node(&mut self, node: Node) -> NodeId {
        if self.emit { self.push(node) } else { NodeId::SENTINEL }
    }

    /// Accept one value; `self.pos` must sit on its first byte.
    fn accept_value(&mut self) -> Result<NodeId> {
        match self.buf[self.pos] {
            b'"' => self.accept_string(),
            b'{' => self.accept_object(),
            b'[' => self.accept_array(),
            b'n' => self.accept_literal(b"null", Node::Null),
            b't' => self.accept_literal(b"true", Node::Boolean(true)),
            b'f' => self.accept_literal(b"false", Node::Boolean(false)),
            b'-' | b'0'..=b'9' => self.accept_number(),
            byte => Err(Error::UnexpectedSymbol { byte, offset: self.pos }),
        }
    }

    fn accept_literal(&mut self, literal: &'static [u8], node: Node) -> Result<NodeId> {
        let stop = self.pos + literal.len();
        if stop > self.end {
            return Err(Error::UnexpectedEndOfText { context: "value" });
        }
        if &self.buf[self.pos..stop] != literal {
            return Err(Error::UnexpectedSymbol {
                byte: self.buf[self.pos],
                offset: self.pos,
            });
        }
        self.pos = stop;
        Ok(self.emit_node(node))
    }

    /// Accept a quoted token and return the span between the quotes.
    ///
    /// The closing quote is the first one preceded by an even run of
    /// backslashes; escapes themselves are preserved verbatim.
    fn accept_quoted(&mut self) -> Result<Span> {
        self.pos += 1;
        let start = self.pos;
        let mut search = self.pos;
        let close = loop {
            let Some(quote) = scan::find_quote(self.buf, search) else {
                return Err(Error::UnexpectedEndOfText { context: "string" });
            };
            let mut run = 0;
            while quote - run > start && self.buf[quote - run - 1] == b'\\' {
                run += 1;
            }
            if run % 2 == 0 {
                break quote;
            }
            search = quote + 1;
        };
        self.pos = close + 1;
        Ok(Span::new(start, close))
    }

    fn accept_string(&mut self) -> Result<NodeId> {
        let span = self.accept_quoted()?;
        if !self.emit {
            return Ok(NodeId::SENTINEL);
        }
        self.classify_string(span)
    }

    /// Turn a quoted token into a view, or a path/blob/number reference if
    /// it carries one of the configured `$` prefixes.
    fn classify_string(&mut self, span: Span) -> Result<NodeId> {
        let start = span.start as usize;
        let end = span.end as usize;
        let bytes = &self.buf[start..end];
        if bytes.first() == Some(&b'$') {
            if bytes.starts_with(self.config.path_prefix.as_bytes()) {
                let rest = &bytes[self.config.path_prefix.len()..];
                let token = PathToken::new(String::from_utf8_lossy(rest).into_owned())?;
                return Ok(self.push(Node::Path(token)));
            }
            if bytes.starts_with(self.config.blob_prefix.as_bytes()) {
                let rest = Span::new(start + self.config.blob_prefix.len(), end);
                return if matches!(self.mode, ParseMode::Full) {
                    let blob = codec::base64_decode(&self.buf[rest.start as usize..end], true)?;
                    Ok(self.push(Node::Blob(blob)))
                } else {
                    Ok(self.push(Node::Base64(rest)))
                };
            }
            if bytes.starts_with(self.config.number_prefix.as_bytes()) {
                let num_start = start + self.config.number_prefix.len();
                let (stop, kind) = classify_number(self.buf, num_start, end)?;
                if stop != end {
                    return Err(Error::UnexpectedSymbol {
                        byte: self.buf[stop],
                        offset: stop,
                    });
                }
                let lazy = LazyNumber { span: Span::new(num_start, stop), kind };
                return self.finish_number(lazy);
            }
        }
        Ok(self.push(Node::View(span)))
    }

    fn accept_number(&mut self) -> Result<NodeId> {
        let (stop, kind) = classify_number(self.buf, self.pos, self.end)?;
        let lazy = LazyNumber {
            span: Span::new(self.pos, stop),
            kind,
        };
        self.pos = stop;
        if !self.emit {
            return Ok(NodeId::SENTINEL);
        }
        self.finish_number(lazy)
    }

    fn finish_number(&mut self, lazy: LazyNumber) -> Result<NodeId> {
        match self.mode {
            ParseMode::Eval | ParseMode::Full => {
                let text = &self.buf[lazy.span.start as usize..lazy.span.end as usize];
                let concrete = codec::parse_number(text, lazy.kind)?;
                Ok(self.push(concrete))
            },
            _ => Ok(self.push(Node::Number(lazy))),
        }
    }

    fn accept_array(&mut self) -> Result<NodeId> {
        self.pos += 1;
        if self.skip_ws_expect("array")? == b']' {
            self.pos += 1;
            return Ok(self.emit_node(Node::Array(Vec::new())));
        }
        let mut items = if self.emit {
            Vec::with_capacity(self.config.array_reserve)
        } else {
            Vec::new()
        };
        loop {
            let value = self.accept_value()?;
            if self.emit {
                items.push(value);
            }
            match self.skip_ws_expect("array")? {
                b',' => {
                    self.pos += 1;
                    self.skip_ws_expect("array")?;
                },
                b']' => {
                    self.pos += 1;
                    break;
                },
                _ => {
                    return Err(Error::ExpectedSymbol {
                        expected: ',',
                        offset: self.pos,
                    });
                },
            }
        }
        Ok(self.emit_node(Node::Array(items)))
    }

    fn accept_object(&mut self) -> Result<NodeId> {
        self.pos += 1;
        if self.skip_ws_expect("object")? == b'}' {
            self.pos += 1;
            return Ok(self.emit_node(Node::Object(Object::new())));
        }
        let mut object = if self.emit {
            Object::with_capacity(self.config.object_reserve)
        } else {
            Object::new()
        };
        loop {
            if self.buf[self.pos] != b'"' {
                return Err(Error::ExpectedSymbol {
                    expected: '"',
                    offset: self.pos,
                });
            }
            let key = self.accept_quoted()?;
            if self.skip_ws_expect("object")? != b':' {
                return Err(Error::ExpectedSymbol {
                    expected: ':',
                    offset: self.pos,
                });
            }
            self.pos += 1;
            self.skip_ws_expect("object")?;
            let value = self.accept_value()?;
            if self.emit {
                object.push(Key::View(key), value);
            }
            match self.skip_ws_expect("object")? {
                b',' => {
                    self.pos += 1;
                    self.skip_ws_expect("object")?;
                },
                b'}' => {
                    self.pos += 1;
                    break;
                },
                _ => {
                    return Err(Error::ExpectedSymbol {
                        expected: ',',
                        offset: self.pos,
                    });
                },
            }
        }
        Ok(self.emit_node(Node::Object(object)))
    }
}

/// Classify one number token: returns the end of the token and its kind.
///
/// Grammar: optional `-`; `0` or a digit run; then either a fraction
/// (`.` digits) or an integer suffix (`i`/`u`, optional width); an
/// exponent if still unsuffixed; a trailing `f` promotes a double to a
/// float; a width byte after `i`/`u` selects 8/16/32/64, default 64.
fn classify_number(buf: &[u8], start: usize, end: usize) -> Result<(usize, NumberKind)> {
    let mut i = start;
    if i < end && buf[i] == b'-' {
        i += 1;
    }
    if i >= end {
        return Err(Error::UnexpectedEndOfText { context: "number" });
    }
    match buf[i] {
        b'0' => i += 1,
        b'1'..=b'9' => i = scan::scan_digits(buf, i).min(end),
        byte => return Err(Error::UnexpectedSymbol { byte, offset: i }),
    }
    let mut kind = NumberKind::Int64;
    let mut suffix: Option<bool> = None;
    if i < end && buf[i] == b'.' && i + 1 < end && buf[i + 1].is_ascii_digit() {
        i = scan::scan_digits(buf, i + 1).min(end);
        kind = NumberKind::Double;
    } else if i < end && matches!(buf[i], b'i' | b'I') {
        suffix = Some(false);
        i += 1;
    } else if i < end && matches!(buf[i], b'u' | b'U') {
        suffix = Some(true);
        i += 1;
    }
    if suffix.is_none() && i < end && matches!(buf[i], b'e' | b'E') {
        i += 1;
        if i < end && matches!(buf[i], b'+' | b'-') {
            i += 1;
        }
        if i >= end {
            return Err(Error::UnexpectedEndOfText { context: "number" });
        }
        if !buf[i].is_ascii_digit() {
            return Err(Error::UnexpectedSymbol { byte: buf[i], offset: i });
        }
        i = scan::scan_digits(buf, i).min(end);
        kind = NumberKind::Double;
    }
    if kind == NumberKind::Double && i < end && matches!(buf[i], b'f' | b'F') {
        i += 1;
        kind = NumberKind::Float;
    } else if let Some(unsigned) = suffix {
        let bits = if i < end {
            match buf[i] {
                b'8' => {
                    i += 1;
                    8
                },
                b'1' if i + 1 < end && buf[i + 1] == b'6' => {
                    i += 2;
                    16
                },
                b'3' if i + 1 < end && buf[i + 1] == b'2' => {
                    i += 2;
                    32
                },
                b'6' if i + 1 < end && buf[i + 1] == b'4' => {
                    i += 2;
                    64
                },
                _ => 64,
            }
        } else {
            64
        };
        kind = NumberKind::integer(unsigned, bits);
    }
    Ok((i, kind))
}
