//! SCPI header case mapping.
//!
//! Program headers are matched case-insensitively over ASCII only, and a
//! keyword form matches only when the lengths are identical: `SYST` and
//! `SYSTEM` are accepted for `SYSTem`, `SYSTE` is not.

/// Compare a header token against a keyword form.
///
/// Requires an exact length match and ASCII case-insensitive equality.
#[inline]
pub fn header_eq(token: &[u8], keyword: &str) -> bool {
    token.len() == keyword.len() && token.eq_ignore_ascii_case(keyword.as_bytes())
}

/// Short form of a mixed-case SCPI keyword: its uppercase letters plus any
/// trailing `?`.
///
/// `SYSTem` becomes `SYST`, `FREQuency?` becomes `FREQ?`. Keywords with no
/// lowercase letters are returned unchanged.
pub fn short_form(keyword: &str) -> String {
    let (stem, query) = match keyword.strip_suffix('?') {
        Some(stem) => (stem, "?"),
        None => (keyword, ""),
    };
    let mut short: String = stem
        .chars()
        .filter(|c| !c.is_ascii_lowercase())
        .collect();
    short.push_str(query);
    short
}
