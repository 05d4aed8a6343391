//! Canonical CSS text for comparisons.
//!
//! Declared values, selectors, and media conditions are compared as text.
//! These helpers rewrite whitespace the way a host serializes declared rules,
//! so authored spacing differences do not affect matching. Quoted strings are
//! copied verbatim.

/// Spacing rules for one kind of CSS text.
struct Spacing {
    /// No whitespace before or after these characters.
    tight: &'static [char],
    /// No whitespace before, exactly one space after.
    spaced_after: &'static [char],
    /// Keep one leading space when the input starts with whitespace.
    keep_leading: bool,
}

const VALUE: Spacing = Spacing {
    tight: &[],
    spaced_after: &[','],
    keep_leading: false,
};

const SELECTOR: Spacing = Spacing {
    tight: &['>', '+', '~', ','],
    spaced_after: &[],
    keep_leading: true,
};

const MEDIA: Spacing = Spacing {
    tight: &[],
    spaced_after: &[',', ':'],
    keep_leading: false,
};

/// Normalize a declaration value: `scale( 2 )` → `scale(2)`,
/// `rgba(0,0,0,  .5)` → `rgba(0, 0, 0, .5)`.
pub fn value(text: &str) -> String {
    compact(text, &VALUE)
}

/// Normalize a selector or pseudo-target: `.a  >  :first-child` → `.a>:first-child`.
///
/// A leading space is significant (descendant combinator) and is kept.
pub fn selector(text: &str) -> String {
    compact(text, &SELECTOR)
}

/// Normalize a media condition: `(min-width:2px)` → `(min-width: 2px)`.
pub fn media(text: &str) -> String {
    compact(text, &MEDIA)
}

/// Split on `separator` outside parentheses, brackets, and quotes.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn compact(text: &str, spacing: &Spacing) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = spacing.keep_leading && text.starts_with(char::is_whitespace);
    // Set after a tight or spaced-after character: swallow the next whitespace run.
    let mut suppress = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            pending_space = !suppress;
            continue;
        }

        let tight = spacing.tight.contains(&c);
        let spaced_after = spacing.spaced_after.contains(&c);
        let drops_space_before = tight || spaced_after || c == ')';

        if pending_space && !drops_space_before && !out.ends_with('(') {
            out.push(' ');
        }
        pending_space = false;
        suppress = false;

        out.push(c);

        if c == '"' || c == '\'' {
            copy_quoted(&mut chars, c, &mut out);
        } else if spaced_after {
            out.push(' ');
            suppress = true;
        } else if tight || c == '(' {
            suppress = true;
        }
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out
}

/// Copy the rest of a quoted string (opening quote already written).
fn copy_quoted(chars: &mut std::str::Chars<'_>, quote: char, out: &mut String) {
    let mut escaped = false;
    for c in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return;
        }
    }
}
