//! UTF-8 ⇄ UTF-16 conversion at the engine boundary.
//!
//! # Why two encodings? (for beginners)
//!
//! The host editor speaks UTF-8: one Unicode character is one to four bytes.
//! The transliteration engine speaks UTF-16: every character below U+10000 is
//! a single 16-bit unit, and everything above is split into a *surrogate
//! pair*, a high unit in `0xD800..=0xDBFF` followed by a low unit in
//! `0xDC00..=0xDFFF`.
//!
//! | Character | Code point | UTF-16 units        |
//! |-----------|------------|---------------------|
//! | `a`       | U+0061     | `0x0061`            |
//! | `α`       | U+03B1     | `0x03B1`            |
//! | `😀`      | U+1F600    | `0xD83D 0xDE00`     |
//!
//! # Fail-fast
//!
//! Every function here either converts the whole input or returns an empty
//! result.  Callers treat "empty" as "do nothing": a half-converted string
//! pushed into the engine would be worse than no string at all.

/// First code point that needs a surrogate pair.
const SUPPLEMENTARY_START: u32 = 0x1_0000;
/// One past the last valid Unicode code point.
const CODE_POINT_END: u32 = 0x11_0000;

const HIGH_SURROGATE_START: u16 = 0xD800;
const HIGH_SURROGATE_END: u16 = 0xDBFF;
const LOW_SURROGATE_START: u16 = 0xDC00;
const SURROGATE_END: u16 = 0xDFFF;

/// Converts UTF-8 bytes to a zero-terminated UTF-16 buffer.
///
/// The engine's context API expects the trailing `0` unit, so it is always
/// appended on success.  Malformed UTF-8 yields an empty `Vec` (no
/// terminator either).
pub fn encode_utf16z(text: &[u8]) -> Vec<u16> {
    match std::str::from_utf8(text) {
        Ok(text) => encode_code_points(text.chars().map(u32::from)),
        Err(_) => Vec::new(),
    }
}

/// Converts a `&str` to a zero-terminated UTF-16 buffer.
///
/// Convenience wrapper over [`encode_utf16z`] for text already known to be
/// valid UTF-8.
pub fn encode_str_utf16z(text: &str) -> Vec<u16> {
    encode_code_points(text.chars().map(u32::from))
}

/// Converts raw code points to a zero-terminated UTF-16 buffer.
///
/// A surrogate (`0xD800..=0xDFFF`) or any code point at or above `0x110000`
/// aborts the conversion and an empty `Vec` is returned.
pub fn encode_code_points<I>(code_points: I) -> Vec<u16>
where
    I: IntoIterator<Item = u32>,
{
    let mut units = Vec::new();
    let surrogates = u32::from(HIGH_SURROGATE_START)..=u32::from(SURROGATE_END);
    for cp in code_points {
        if surrogates.contains(&cp) {
            return Vec::new();
        } else if cp < SUPPLEMENTARY_START {
            units.push(cp as u16);
        } else if cp < CODE_POINT_END {
            units.push(HIGH_SURROGATE_START | (((cp - SUPPLEMENTARY_START) >> 10) & 0x3FF) as u16);
            units.push(LOW_SURROGATE_START | (cp & 0x3FF) as u16);
        } else {
            return Vec::new();
        }
    }
    units.push(0);
    units
}

/// Converts a UTF-16 slice to UTF-8.
///
/// The slice is the explicit `[start, end)` range; no terminator is expected.
/// An unpaired high surrogate, a high surrogate followed by a non-low unit,
/// or a lone low surrogate fails the whole conversion (empty `String`).
pub fn decode_utf16(units: &[u16]) -> String {
    let mut result = String::with_capacity(units.len());
    let mut iter = units.iter().copied();

    while let Some(unit) = iter.next() {
        let cp = if !(HIGH_SURROGATE_START..=SURROGATE_END).contains(&unit) {
            u32::from(unit)
        } else if unit <= HIGH_SURROGATE_END {
            match iter.next() {
                Some(low) if (LOW_SURROGATE_START..=SURROGATE_END).contains(&low) => {
                    (((u32::from(unit) & 0x3FF) << 10) | (u32::from(low) & 0x3FF))
                        + SUPPLEMENTARY_START
                }
                _ => return String::new(),
            }
        } else {
            return String::new();
        };

        match char::from_u32(cp) {
            Some(c) => result.push(c),
            None => return String::new(),
        }
    }
    result
}

/// Decodes a zero-terminated UTF-16 buffer, stopping at the first `0` unit.
///
/// Buffers without a terminator are decoded in full.
pub fn decode_utf16z(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    decode_utf16(&units[..end])
}

/// Decodes a zero-terminated sequence of UTF-32 code points to UTF-8.
///
/// This is the shape of the engine's `output` buffer.  An invalid scalar
/// value (a surrogate or anything ≥ `0x110000`) empties the result.
pub fn decode_code_points(code_points: &[u32]) -> String {
    let mut result = String::new();
    for &cp in code_points.iter().take_while(|&&cp| cp != 0) {
        match char::from_u32(cp) {
            Some(c) => result.push(c),
            None => return String::new(),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Forward direction ─────────────────────────────────────────────────────

    #[test]
    fn test_encode_ascii_appends_terminator() {
        assert_eq!(encode_utf16z(b"ab"), vec![0x61, 0x62, 0x00]);
    }

    #[test]
    fn test_encode_empty_input_yields_only_terminator() {
        assert_eq!(encode_utf16z(b""), vec![0x00]);
    }

    #[test]
    fn test_encode_bmp_character_is_one_unit() {
        assert_eq!(encode_str_utf16z("α"), vec![0x03B1, 0x00]);
    }

    #[test]
    fn test_encode_supplementary_character_is_surrogate_pair() {
        // U+1F600 GRINNING FACE
        assert_eq!(encode_str_utf16z("😀"), vec![0xD83D, 0xDE00, 0x00]);
    }

    #[test]
    fn test_encode_highest_code_point() {
        assert_eq!(encode_code_points([0x10FFFF]), vec![0xDBFF, 0xDFFF, 0x00]);
    }

    #[test]
    fn test_encode_malformed_utf8_returns_empty() {
        // 0xC3 starts a two-byte sequence that is never completed
        assert!(encode_utf16z(&[0x61, 0xC3]).is_empty());
    }

    #[test]
    fn test_encode_utf8_encoded_surrogate_returns_empty() {
        // ED A0 80 would be U+D800, which is not valid UTF-8
        assert!(encode_utf16z(&[0xED, 0xA0, 0x80]).is_empty());
    }

    #[test]
    fn test_encode_code_point_out_of_range_returns_empty() {
        assert!(encode_code_points([0x61, 0x11_0000, 0x62]).is_empty());
    }

    #[test]
    fn test_encode_code_points_rejects_surrogate_scalars() {
        // Arrange
        let lone_high = [0x61, 0xD800, 0x62];
        let lone_low = [0xDFFF];

        // Act / Assert
        assert!(encode_code_points(lone_high).is_empty());
        assert!(encode_code_points(lone_low).is_empty());
        assert_eq!(encode_code_points([0xD7FF, 0xE000]), vec![0xD7FF, 0xE000, 0]);
    }

    // ── Reverse direction ─────────────────────────────────────────────────────

    #[test]
    fn test_decode_surrogate_pair() {
        assert_eq!(decode_utf16(&[0x61, 0xD83D, 0xDE00]), "a😀");
    }

    #[test]
    fn test_decode_does_not_require_terminator() {
        assert_eq!(decode_utf16(&[0x03B1, 0x03B2]), "αβ");
    }

    #[test]
    fn test_decode_high_surrogate_at_end_returns_empty() {
        assert_eq!(decode_utf16(&[0x61, 0xD83D]), "");
    }

    #[test]
    fn test_decode_high_surrogate_followed_by_non_low_returns_empty() {
        assert_eq!(decode_utf16(&[0xD83D, 0x0061]), "");
    }

    #[test]
    fn test_decode_two_high_surrogates_returns_empty() {
        assert_eq!(decode_utf16(&[0xD83D, 0xD83D]), "");
    }

    #[test]
    fn test_decode_lone_low_surrogate_returns_empty() {
        assert_eq!(decode_utf16(&[0xDE00, 0x61]), "");
    }

    #[test]
    fn test_decode_utf16z_stops_at_terminator() {
        assert_eq!(decode_utf16z(&[0x78, 0x00, 0x79]), "x");
    }

    #[test]
    fn test_decode_utf16z_without_terminator_decodes_everything() {
        assert_eq!(decode_utf16z(&[0x78, 0x79]), "xy");
    }

    #[test]
    fn test_decode_code_points_stops_at_zero() {
        assert_eq!(decode_code_points(&[0x03B1, 0x1F600, 0, 0x61]), "α😀");
    }

    #[test]
    fn test_decode_code_points_rejects_surrogate_scalar() {
        assert_eq!(decode_code_points(&[0x61, 0xD800, 0]), "");
    }

    #[test]
    fn test_round_trip_mixed_scripts() {
        let text = "kā ελληνικά 𐐷 ğ";
        let units = encode_str_utf16z(text);
        assert_eq!(decode_utf16z(&units), text);
    }
}
