//! Property-based tests for the parser using proptest.
//!
//! Random inputs hunt for panics and for round-trip breakage in the
//! parse/print pipeline.

use cppon::{Document, ParseMode, PrintOptions, ScanWidth, SourceBuffer, scan};
use proptest::prelude::*;

// =============================================================================
// No-Panic Properties
// =============================================================================

proptest! {
    /// Arbitrary bytes never panic the parser in any mode.
    #[test]
    fn parse_never_panics_on_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 0..1024)) {
        for mode in [ParseMode::Parse, ParseMode::Quick, ParseMode::Eval, ParseMode::Full] {
            let _ = Document::parse(&input, mode);
        }
    }

    /// Arbitrary strings never panic the parser.
    #[test]
    fn parse_never_panics_on_arbitrary_strings(input in ".*") {
        let _ = Document::parse(input.as_bytes(), ParseMode::Quick);
    }

    /// Arbitrary option trees never panic the option parser.
    #[test]
    fn options_never_panic(input in ".*") {
        let _ = PrintOptions::parse(input.as_bytes());
    }

    /// Deep nesting parses and prints without blowing the stack at the
    /// depths the generator produces.
    #[test]
    fn nested_containers_round_trip(depth in 1usize..60) {
        let mut text = String::new();
        for _ in 0..depth {
            text.push_str("[{\"k\":");
        }
        text.push('1');
        for _ in 0..depth {
            text.push_str("}]");
        }
        let doc = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(doc.to_text().unwrap(), text);
    }
}

// =============================================================================
// Round-Trip Properties
// =============================================================================

proptest! {
    /// Compact print of a quick parse reproduces whitespace-free input.
    #[test]
    fn integers_round_trip(n in any::<i64>()) {
        let text = format!(r#"{{"n":{n}}}"#);
        let doc = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(doc.to_text().unwrap(), text);
    }

    /// Eval realizes every i64 exactly.
    #[test]
    fn integers_realize_exactly(n in any::<i64>()) {
        let text = format!(r#"{{"n":{n}}}"#);
        let mut doc = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(doc.get_strict_mut::<i64>("/n").unwrap(), n);
    }

    /// Typed unsigned tokens realize exactly.
    #[test]
    fn unsigned_suffixes_realize(n in any::<u64>()) {
        let text = format!("{n}u64");
        let mut doc = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(doc.get_strict_mut::<u64>("").unwrap(), n);
    }

    /// Finite doubles survive parse -> realize -> print -> parse.
    #[test]
    fn doubles_round_trip_through_text(v in prop::num::f64::NORMAL) {
        let mut doc = Document::new();
        doc.set("/v", v).unwrap();
        let text = doc.to_text().unwrap();
        let mut reparsed = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(reparsed.get_strict_mut::<f64>("/v").unwrap(), v);
    }

    /// Simple alphanumeric strings pass through views untouched.
    #[test]
    fn plain_strings_round_trip(s in "[a-zA-Z0-9 ]{0,64}") {
        let text = format!(r#"{{"s":"{s}"}}"#);
        let doc = Document::parse(text.as_bytes(), ParseMode::Quick).unwrap();
        prop_assert_eq!(doc.get_strict::<String>("/s").unwrap(), s);
        prop_assert_eq!(doc.to_text().unwrap(), text);
    }

    /// Blob bytes survive full-mode decode and re-encode.
    #[test]
    fn blobs_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = cppon::codec::base64_encode(&bytes);
        let text = format!(r#""$cppon-blob:{encoded}""#);
        let doc = Document::parse(text.as_bytes(), ParseMode::Full).unwrap();
        prop_assert_eq!(doc.get_blob("").unwrap(), bytes.as_slice());
        prop_assert_eq!(doc.to_text().unwrap(), text);
    }

    /// Autovivified writes read back equal.
    #[test]
    fn writes_read_back(
        key in "[a-z]{1,8}",
        idx in 0usize..64,
        value in any::<i32>()
    ) {
        let mut doc = Document::new();
        let path = format!("/{key}/{idx}/v");
        doc.set(path.as_str(), value).unwrap();
        prop_assert_eq!(doc.get_strict::<i32>(path.as_str()).unwrap(), value);
    }

    /// A string closes at the first quote preceded by an even backslash
    /// run, whatever the run length.
    #[test]
    fn backslash_runs_close_strings_on_even_parity(run in 0usize..24) {
        let mut text = String::from("\"x");
        for _ in 0..run {
            text.push('\\');
        }
        text.push('"');
        let result = Document::parse(text.as_bytes(), ParseMode::Quick);
        if run % 2 == 0 {
            // Even run: the quote closes the string and round-trips.
            let doc = result.unwrap();
            prop_assert_eq!(doc.to_text().unwrap(), text);
        } else {
            // Odd run: the quote is escaped and the string never ends.
            prop_assert!(result.is_err());
        }
    }
}

// =============================================================================
// Scanner Parity Properties
// =============================================================================

/// Bias the byte soup toward quotes, backslashes, and digits so the
/// interesting scanner transitions actually occur.
fn scan_soup() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            Just(b'"'),
            Just(b'\\'),
            prop::num::u8::ANY.prop_map(|b| b'0' + b % 10),
            prop::num::u8::ANY,
        ],
        0..512,
    )
}

proptest! {
    /// Every available vector width agrees with the scalar baseline for
    /// both primitives, from every start offset.
    #[test]
    fn scan_widths_match_scalar(soup in scan_soup(), start in 0usize..512) {
        let buf = SourceBuffer::new(&soup);
        let window = buf.sentinel_bytes();
        let start = start.min(soup.len());

        scan::set_thread_override(Some(ScanWidth::Scalar));
        let quote = scan::find_quote(window, start);
        let digits = scan::scan_digits(window, start);

        for width in [ScanWidth::Bytes16, ScanWidth::Bytes32, ScanWidth::Bytes64] {
            if width > scan::max_supported() {
                continue;
            }
            scan::set_thread_override(Some(width));
            prop_assert_eq!(scan::find_quote(window, start), quote, "width {:?}", width);
            prop_assert_eq!(scan::scan_digits(window, start), digits, "width {:?}", width);
        }
        scan::set_thread_override(None);
    }
}
