//! Error types for parsing, navigation, and printing.

use crate::node::NodeKind;

/// Errors surfaced at the crate boundary.
///
/// Each variant corresponds to one failure the engine can report: malformed
/// input, a type/shape violation during navigation, a policy limit, a
/// deferred-materialization access, or an unsafe assignment.
///
/// # Example
///
/// ```
/// use cppon::{Document, Error, ParseMode};
///
/// let err = Document::parse(b"{\"a\":", ParseMode::Quick).unwrap_err();
/// assert!(matches!(err, Error::UnexpectedEndOfText { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input ended while a value, string, number, or container was
    /// still being accepted. The context names the construct in progress.
    UnexpectedEndOfText {
        /// Construct being accepted when the sentinel was reached.
        context: &'static str,
    },

    /// A byte that cannot start or continue the current construct.
    UnexpectedSymbol {
        /// The offending byte.
        byte: u8,
        /// Byte offset into the source buffer.
        offset: usize,
    },

    /// A specific structural byte (`:`, `,`, `]`, `}`) was required.
    ExpectedSymbol {
        /// The byte that was required.
        expected: char,
        /// Byte offset into the source buffer.
        offset: usize,
    },

    /// Input starts with a UTF-32 byte order mark.
    UnexpectedUtf32Bom,

    /// Input starts with a UTF-16 byte order mark.
    UnexpectedUtf16Bom,

    /// First byte announces a 5- or 6-byte UTF-8 sequence.
    InvalidUtf8Sequence,

    /// First byte is a stray UTF-8 continuation byte.
    InvalidUtf8Continuation,

    /// Base64 text with an invalid byte or non-canonical padding.
    InvalidBase64(String),

    /// A path string that is empty or does not begin with `/`.
    InvalidPath(String),

    /// Numeric text that cannot be realized into its classified kind
    /// (overflow or malformed digits).
    InvalidNumber(String),

    /// The slot holds a different kind than the operation requires.
    TypeMismatch {
        /// What the operation required.
        expected: &'static str,
        /// What the slot actually holds.
        found: NodeKind,
    },

    /// An array segment that is not a run of decimal digits.
    BadArrayIndex(String),

    /// Read traversal crossed a missing object member with path remaining.
    MemberNotFound(String),

    /// Read traversal crossed a null slot with an array segment remaining.
    NullValue(String),

    /// Sparse array growth beyond the configured maximum gap.
    ExcessiveArrayResize {
        /// Index the write asked for.
        requested: usize,
        /// Maximum allowed gap past the current size.
        limit: usize,
    },

    /// A lazy number was accessed strictly through a read-only path.
    NumberNotConverted,

    /// A base64 token was accessed as a blob through a read-only path.
    BlobNotRealized,

    /// A printer options tree with an unknown key or a malformed shape.
    BadOption(String),

    /// An integer outside the 53-bit safe range in JSON-compatible output.
    JsonCompatibility(String),

    /// Assignment of an in-tree pointer whose target is not a valid node
    /// of this tree.
    UnsafePointerAssignment,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEndOfText { context } => {
                write!(f, "unexpected end of text in {context}")
            },
            Self::UnexpectedSymbol { byte, offset } => {
                write!(f, "unexpected symbol 0x{byte:02x} at offset {offset}")
            },
            Self::ExpectedSymbol { expected, offset } => {
                write!(f, "expected '{expected}' at offset {offset}")
            },
            Self::UnexpectedUtf32Bom => write!(f, "unexpected utf-32 byte order mark"),
            Self::UnexpectedUtf16Bom => write!(f, "unexpected utf-16 byte order mark"),
            Self::InvalidUtf8Sequence => write!(f, "invalid utf-8 sequence at start of input"),
            Self::InvalidUtf8Continuation => {
                write!(f, "stray utf-8 continuation byte at start of input")
            },
            Self::InvalidBase64(msg) => write!(f, "invalid base64: {msg}"),
            Self::InvalidPath(path) => write!(f, "invalid path: {path:?}"),
            Self::InvalidNumber(text) => write!(f, "invalid number: {text:?}"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {}", found.name())
            },
            Self::BadArrayIndex(seg) => write!(f, "bad array index: {seg:?}"),
            Self::MemberNotFound(name) => write!(f, "member not found: {name:?}"),
            Self::NullValue(seg) => write!(f, "null value crossed at segment {seg:?}"),
            Self::ExcessiveArrayResize { requested, limit } => {
                write!(f, "excessive array resize to index {requested} (max gap {limit})")
            },
            Self::NumberNotConverted => write!(f, "lazy number not converted"),
            Self::BlobNotRealized => write!(f, "base64 blob not realized"),
            Self::BadOption(msg) => write!(f, "bad printer option: {msg}"),
            Self::JsonCompatibility(msg) => write!(f, "json compatibility: {msg}"),
            Self::UnsafePointerAssignment => write!(f, "unsafe pointer assignment"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Create a type-mismatch error.
    #[inline]
    #[must_use]
    pub const fn mismatch(expected: &'static str, found: NodeKind) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Create a bad-option error.
    #[inline]
    #[must_use]
    pub fn bad_option(msg: impl Into<String>) -> Self {
        Self::BadOption(msg.into())
    }

    /// Returns `true` if this error came from malformed input text.
    #[inline]
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEndOfText { .. }
                | Self::UnexpectedSymbol { .. }
                | Self::ExpectedSymbol { .. }
                | Self::UnexpectedUtf32Bom
                | Self::UnexpectedUtf16Bom
                | Self::InvalidUtf8Sequence
                | Self::InvalidUtf8Continuation
        )
    }

    /// Returns `true` if this error reports a policy limit, not broken data.
    #[inline]
    #[must_use]
    pub const fn is_policy_error(&self) -> bool {
        matches!(
            self,
            Self::ExcessiveArrayResize { .. } | Self::JsonCompatibility(_) | Self::BadOption(_)
        )
    }

    /// Returns `true` if a write-capable access would have succeeded where
    /// this read-only access failed.
    #[inline]
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::NumberNotConverted | Self::BlobNotRealized)
    }
}

/// Result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
