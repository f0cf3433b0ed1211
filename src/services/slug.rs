// src/services/slug.rs
// DOCUMENTATION: Category label to URL slug normalization
// PURPOSE: Deterministic, idempotent mapping of free text onto [a-z0-9_-]

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free text into a URL-safe slug.
///
/// Lowercases, decomposes accented letters and drops the combining marks,
/// turns each whitespace run into `-`, discards anything outside
/// `[A-Za-z0-9_-]` and collapses repeated dashes.
///
/// Distinct titles can collide after normalization, so callers holding a
/// canonical title should compare titles instead.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut chars = folded.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            push_dash(&mut slug);
        } else if c == '-' {
            push_dash(&mut slug);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        }
    }

    slug
}

// Dropped characters can leave two dashes adjacent; they collapse here.
fn push_dash(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}
