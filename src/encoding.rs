//! Recovery of double-encoded archive strings (Mojibake).
//!
//! Meta's archive exporter writes UTF-8 text that was decoded as if it were
//! ISO-8859-1: each UTF-8 byte of the original text is stored as a separate
//! Unicode codepoint. Example: "Renée" becomes "RenÃ©e" in the raw JSON.
//!
//! [`redecode`] reverses that process by reinterpreting each codepoint as a
//! single Latin-1 byte and decoding the byte sequence as UTF-8 again. The
//! reader applies it to every string lifted from an export file; skipping it
//! silently produces garbled names.

/// Re-decodes a string from the archive's broken encoding.
///
/// Returns the input unchanged when it cannot be the product of the
/// double-encoding artifact:
/// - a codepoint above U+00FF is not Latin-1-representable, so the string
///   was never round-tripped through ISO-8859-1;
/// - the reinterpreted bytes are not valid UTF-8 (e.g. a name that already
///   reads correctly, like a bare "é").
///
/// Never fails and never loses data.
///
/// # Example
///
/// ```rust
/// use msgtally::encoding::redecode;
///
/// // ASCII passes through unchanged
/// assert_eq!(redecode("Alice"), "Alice");
///
/// // The two-step mis-encoding of "é" decodes back to "é"
/// assert_eq!(redecode("Ã©"), "é");
///
/// // An already-correct accented name is left alone
/// assert_eq!(redecode("é"), "é");
/// ```
pub fn redecode(s: &str) -> String {
    if !s.chars().all(|c| (c as u32) <= 0xFF) {
        return s.to_string();
    }
    let bytes: Vec<u8> = s.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}
