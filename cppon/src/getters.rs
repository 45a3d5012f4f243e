//! Typed read helpers spanning the navigator and the codec.
//!
//! Four access families, each in a read-only and a write-capable form:
//!
//! - strict — the resolved slot must hold exactly the requested type;
//! - cast — any concrete numeric, converted to the requested type;
//! - blob — owned bytes, realizing a base64 token in the write form;
//! - optional — a value if the type matches, `None` otherwise, no errors.
//!
//! All of them follow raw pointers and path tokens transparently. The
//! read-only forms never mutate: a lazy number fails strict/cast access
//! with `number_not_converted` and a base64 token fails blob access with
//! `blob_not_realized`; the write-capable forms realize in place first.

use crate::document::Document;
use crate::nav::Index;
use crate::node::{Node, NodeId};
use crate::{Error, Result};

/// Types a slot can hold exactly. Implemented for the numeric primitives,
/// `bool`, and `String`.
pub trait Strict: Sized {
    /// Name used in `type_mismatch` errors.
    const NAME: &'static str;

    /// Extract the value if the node holds exactly this type.
    fn extract(doc: &Document, node: &Node) -> Option<Self>;
}

/// Types any concrete numeric slot can convert into.
pub trait Cast: Sized {
    /// Convert from the numeric a slot holds.
    fn cast(value: Numeric) -> Self;
}

/// The concrete numeric a slot holds, widened for casting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// Any signed integer alternative.
    Int(i64),
    /// The unsigned 64-bit alternative (narrower unsigned widen to `Int`).
    Uint(u64),
    /// The 32-bit float alternative.
    Float(f32),
    /// The 64-bit float alternative.
    Double(f64),
}

impl Numeric {
    fn of(node: &Node) -> Option<Self> {
        Some(match node {
            Node::Double(v) => Self::Double(*v),
            Node::Float(v) => Self::Float(*v),
            Node::Int8(v) => Self::Int(i64::from(*v)),
            Node::Uint8(v) => Self::Int(i64::from(*v)),
            Node::Int16(v) => Self::Int(i64::from(*v)),
            Node::Uint16(v) => Self::Int(i64::from(*v)),
            Node::Int32(v) => Self::Int(i64::from(*v)),
            Node::Uint32(v) => Self::Int(i64::from(*v)),
            Node::Int64(v) => Self::Int(*v),
            Node::Uint64(v) => Self::Uint(*v),
            _ => return None,
        })
    }
}

macro_rules! strict_impl {
    ($ty:ty, $name:literal, $variant:ident) => {
        impl Strict for $ty {
            const NAME: &'static str = $name;

            fn extract(_doc: &Document, node: &Node) -> Option<Self> {
                match node {
                    Node::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

strict_impl!(bool, "boolean", Boolean);
strict_impl!(f64, "double", Double);
strict_impl!(f32, "float", Float);
strict_impl!(i8, "int8", Int8);
strict_impl!(u8, "uint8", Uint8);
strict_impl!(i16, "int16", Int16);
strict_impl!(u16, "uint16", Uint16);
strict_impl!(i32, "int32", Int32);
strict_impl!(u32, "uint32", Uint32);
strict_impl!(i64, "int64", Int64);
strict_impl!(u64, "uint64", Uint64);

/// Both string alternatives (borrowed view and owned) extract as `String`.
impl Strict for String {
    const NAME: &'static str = "string";

    fn extract(doc: &Document, node: &Node) -> Option<Self> {
        match node {
            Node::View(span) => Some(doc.source().text(*span).into_owned()),
            Node::Text(text) => Some(text.to_string()),
            _ => None,
        }
    }
}

macro_rules! cast_impl {
    ($ty:ty) => {
        impl Cast for $ty {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_possible_wrap,
                clippy::cast_precision_loss
            )]
            fn cast(value: Numeric) -> Self {
                match value {
                    Numeric::Int(v) => v as $ty,
                    Numeric::Uint(v) => v as $ty,
                    Numeric::Float(v) => v as $ty,
                    Numeric::Double(v) => v as $ty,
                }
            }
        }
    };
}

cast_impl!(i8);
cast_impl!(u8);
cast_impl!(i16);
cast_impl!(u16);
cast_impl!(i32);
cast_impl!(u32);
cast_impl!(i64);
cast_impl!(u64);
cast_impl!(f32);
cast_impl!(f64);

impl Document {
    /// Resolve an index, follow references, and return the node handle.
    fn resolve<'a>(&self, index: impl Into<Index<'a>>) -> Result<NodeId> {
        let id = self.get(index)?;
        self.deref_if_ptr(id)
    }

    /// Read a value that must hold exactly `T`.
    ///
    /// A lazy number fails with `number_not_converted`; use
    /// [`get_strict_mut`](Self::get_strict_mut) to realize it first.
    pub fn get_strict<'a, T: Strict>(&self, index: impl Into<Index<'a>>) -> Result<T> {
        let id = self.resolve(index)?;
        let node = self.node(id);
        if matches!(node, Node::Number(_)) {
            return Err(Error::NumberNotConverted);
        }
        T::extract(self, node).ok_or_else(|| Error::mismatch(T::NAME, node.kind()))
    }

    /// Read a value that must hold exactly `T`, realizing a lazy number
    /// in place first.
    pub fn get_strict_mut<'a, T: Strict>(&mut self, index: impl Into<Index<'a>>) -> Result<T> {
        let id = self.resolve(index)?;
        if matches!(self.node(id), Node::Number(_)) {
            self.realize_number(id)?;
        }
        let node = self.node(id);
        T::extract(self, node).ok_or_else(|| Error::mismatch(T::NAME, node.kind()))
    }

    /// Read any concrete numeric, cast to `T`.
    pub fn get_cast<'a, T: Cast>(&self, index: impl Into<Index<'a>>) -> Result<T> {
        let id = self.resolve(index)?;
        let node = self.node(id);
        if matches!(node, Node::Number(_)) {
            return Err(Error::NumberNotConverted);
        }
        Numeric::of(node)
            .map(T::cast)
            .ok_or_else(|| Error::mismatch("numeric", node.kind()))
    }

    /// Read any numeric, cast to `T`, realizing a lazy number first.
    pub fn get_cast_mut<'a, T: Cast>(&mut self, index: impl Into<Index<'a>>) -> Result<T> {
        let id = self.resolve(index)?;
        if matches!(self.node(id), Node::Number(_)) {
            self.realize_number(id)?;
        }
        let node = self.node(id);
        Numeric::of(node)
            .map(T::cast)
            .ok_or_else(|| Error::mismatch("numeric", node.kind()))
    }

    /// Read an owned blob.
    ///
    /// A base64 token fails with `blob_not_realized`; use
    /// [`get_blob_mut`](Self::get_blob_mut) to decode it in place.
    pub fn get_blob<'a>(&self, index: impl Into<Index<'a>>) -> Result<&[u8]> {
        let id = self.resolve(index)?;
        match self.node(id) {
            Node::Blob(bytes) => Ok(bytes),
            Node::Base64(_) => Err(Error::BlobNotRealized),
            node => Err(Error::mismatch("blob", node.kind())),
        }
    }

    /// Read an owned blob, decoding a base64 token in place first.
    pub fn get_blob_mut<'a>(&mut self, index: impl Into<Index<'a>>) -> Result<&[u8]> {
        let id = self.resolve(index)?;
        if let Node::Base64(span) = self.node(id) {
            let decoded = crate::codec::base64_decode(self.span_bytes(*span), true)?;
            *self.node_mut(id) = Node::Blob(decoded);
        }
        match self.node(id) {
            Node::Blob(bytes) => Ok(bytes),
            node => Err(Error::mismatch("blob", node.kind())),
        }
    }

    /// Read a value if the slot holds exactly `T`; `None` otherwise.
    ///
    /// Never fails on a type mismatch and never realizes anything: a lazy
    /// number or unrealized blob is simply absent.
    #[must_use]
    pub fn get_optional<'a, T: Strict>(&self, index: impl Into<Index<'a>>) -> Option<T> {
        let id = self.resolve(index).ok()?;
        T::extract(self, self.node(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, ParseMode};

    fn quick(text: &[u8]) -> Document {
        Document::parse(text, ParseMode::Quick).unwrap()
    }

    #[test]
    fn strict_requires_exact_kind() {
        let mut doc = Document::new();
        doc.set("/flag", true).unwrap();
        doc.set("/n", 5i32).unwrap();
        assert!(doc.get_strict::<bool>("/flag").unwrap());
        assert_eq!(doc.get_strict::<i32>("/n").unwrap(), 5);
        assert!(matches!(
            doc.get_strict::<i64>("/n"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn strict_read_only_rejects_lazy() {
        let mut doc = quick(br#"{"n":42}"#);
        assert_eq!(doc.get_strict::<i64>("/n").unwrap_err(), Error::NumberNotConverted);
        // The write-capable form realizes, monotonically.
        assert_eq!(doc.get_strict_mut::<i64>("/n").unwrap(), 42);
        assert_eq!(doc.get_strict::<i64>("/n").unwrap(), 42);
    }

    #[test]
    fn cast_widens_and_narrows() {
        let mut doc = quick(br#"{"n":300,"f":1.5}"#);
        assert_eq!(doc.get_cast_mut::<i64>("/n").unwrap(), 300);
        assert_eq!(doc.get_cast::<u8>("/n").unwrap(), 44); // wraps, as casts do
        assert_eq!(doc.get_cast_mut::<f64>("/f").unwrap(), 1.5);
        assert_eq!(doc.get_cast::<i32>("/f").unwrap(), 1);
        let mut doc = Document::new();
        doc.set("/s", "x").unwrap();
        assert!(matches!(
            doc.get_cast::<i64>("/s"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn blob_realization() {
        let mut doc = quick(br#""$cppon-blob:SGVsbG8sIFdvcmxkIQ==""#);
        assert_eq!(doc.get_blob("").unwrap_err(), Error::BlobNotRealized);
        assert_eq!(doc.get_blob_mut("").unwrap(), b"Hello, World!");
        // Realized in place; the read-only form now succeeds.
        assert_eq!(doc.get_blob("").unwrap(), b"Hello, World!");
    }

    #[test]
    fn full_mode_decodes_upfront() {
        let doc = Document::parse(
            br#""$cppon-blob:SGVsbG8sIFdvcmxkIQ==""#,
            ParseMode::Full,
        )
        .unwrap();
        assert_eq!(doc.get_blob("").unwrap(), b"Hello, World!");
    }

    #[test]
    fn optional_never_errors() {
        let mut doc = quick(br#"{"n":42,"s":"txt"}"#);
        assert_eq!(doc.get_optional::<String>("/s").unwrap(), "txt");
        assert_eq!(doc.get_optional::<bool>("/s"), None);
        assert_eq!(doc.get_optional::<i64>("/n"), None); // lazy, not realized
        assert_eq!(doc.get_optional::<i64>("/missing"), None);
        doc.set("/b", false).unwrap();
        assert_eq!(doc.get_optional::<bool>("/b"), Some(false));
    }

    #[test]
    fn getters_follow_references() {
        let mut doc = quick(br#"{"data":{"x":"v"},"ref":"$cppon-path:/data/x"}"#);
        assert_eq!(doc.get_strict::<String>("/ref").unwrap(), "v");
        let x = doc.get("/data/x").unwrap();
        doc.set("/ptr", x).unwrap();
        assert_eq!(doc.get_strict::<String>("/ptr").unwrap(), "v");
    }
}
