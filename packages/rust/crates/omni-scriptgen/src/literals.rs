//! Literal rendering: strings, numbers, variables and hashtable keys.

use once_cell::sync::Lazy;
use regex::Regex;

/// Quote characters the language treats like `'`.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote characters the language treats like `"`.
const DOUBLE_QUOTES: [char; 4] = ['"', '\u{201C}', '\u{201D}', '\u{201E}'];

static SIMPLE_VARIABLE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:global|local|script|private|using|env|variable|function|alias):)?[\p{L}\p{N}_?]+$",
    )
    .ok()
});

static BARE_KEY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").ok());

/// How a string value is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringKind {
    /// `'text'`
    #[default]
    Literal,
    /// `"text"` with escapes.
    Expandable,
    /// `@'` ... `'@`
    LiteralHere,
    /// `@"` ... `"@`
    ExpandableHere,
}

/// Single-quoted literal; embedded quotes are doubled.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if SINGLE_QUOTES.contains(&c) {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Double-quoted literal with backtick escapes.
#[must_use]
pub fn quote_expandable(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        push_expandable_char(&mut out, c, true);
    }
    out.push('"');
    out
}

/// Here-string of the given kind, or `None` when a content line would end
/// the here-string early.
#[must_use]
pub fn here_string(value: &str, expandable: bool) -> Option<String> {
    let terminator = if expandable { "\"@" } else { "'@" };
    if value.lines().any(|line| line.starts_with(terminator)) {
        return None;
    }
    let (open, close) = if expandable {
        ("@\"", "\"@")
    } else {
        ("@'", "'@")
    };
    let body = if expandable {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            push_expandable_char(&mut escaped, c, false);
        }
        escaped
    } else {
        value.to_string()
    };
    Some(format!("{open}\n{body}\n{close}"))
}

/// Render `value` in the requested quoting style.
///
/// Here-strings fall back to the matching quoted form when the content
/// cannot be represented.
#[must_use]
pub fn render_string(value: &str, kind: StringKind) -> String {
    match kind {
        StringKind::Literal => quote_literal(value),
        StringKind::Expandable => quote_expandable(value),
        StringKind::LiteralHere => here_string(value, false).unwrap_or_else(|| quote_literal(value)),
        StringKind::ExpandableHere => {
            here_string(value, true).unwrap_or_else(|| quote_expandable(value))
        }
    }
}

fn push_expandable_char(out: &mut String, c: char, escape_controls: bool) {
    match c {
        '`' => out.push_str("``"),
        '$' => out.push_str("`$"),
        c if escape_controls && DOUBLE_QUOTES.contains(&c) => {
            out.push('`');
            out.push(c);
        }
        '\0' if escape_controls => out.push_str("`0"),
        '\u{7}' if escape_controls => out.push_str("`a"),
        '\u{8}' if escape_controls => out.push_str("`b"),
        '\u{c}' if escape_controls => out.push_str("`f"),
        '\n' if escape_controls => out.push_str("`n"),
        '\r' if escape_controls => out.push_str("`r"),
        '\t' if escape_controls => out.push_str("`t"),
        '\u{b}' if escape_controls => out.push_str("`v"),
        '\u{1b}' if escape_controls => out.push_str("`e"),
        c => out.push(c),
    }
}

/// Integer literal.
#[must_use]
pub fn render_int(value: i64) -> String {
    value.to_string()
}

/// Floating point literal. Non-finite values use static members of `[double]`.
#[must_use]
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        "[double]::NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "[double]::PositiveInfinity".to_string()
        } else {
            "[double]::NegativeInfinity".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// `$true` or `$false`.
#[must_use]
pub fn render_bool(value: bool) -> &'static str {
    if value { "$true" } else { "$false" }
}

/// Variable reference, braced when the name needs it.
#[must_use]
pub fn render_variable(name: &str) -> String {
    if is_simple_variable(name) {
        return format!("${name}");
    }
    let mut out = String::with_capacity(name.len() + 3);
    out.push_str("${");
    for c in name.chars() {
        if matches!(c, '{' | '}' | '`') {
            out.push('`');
        }
        out.push(c);
    }
    out.push('}');
    out
}

/// Hashtable key, bare when it is identifier-like.
#[must_use]
pub fn render_key(key: &str) -> String {
    let bare = BARE_KEY.as_ref().is_some_and(|re| re.is_match(key));
    if bare {
        key.to_string()
    } else {
        quote_literal(key)
    }
}

fn is_simple_variable(name: &str) -> bool {
    SIMPLE_VARIABLE.as_ref().is_some_and(|re| re.is_match(name))
}
