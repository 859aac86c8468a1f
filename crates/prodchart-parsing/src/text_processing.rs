use once_cell::sync::Lazy;
use regex::Regex;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Normalize extracted fragment text: expand ligatures, map non-breaking
/// spaces to plain spaces and collapse whitespace runs.
pub fn normalize_fragment(text: &str) -> String {
    static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let expanded = expand_ligatures(text).replace('\u{00A0}', " ");
    WS.replace_all(expanded.trim(), " ").into_owned()
}

/// Parse a quantity cell. Accepts plain decimals with optional `,`
/// thousands separators; rejects anything non-finite.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|q| q.is_finite())
}
