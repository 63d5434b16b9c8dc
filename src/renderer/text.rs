//! Placeholder substitution over parsed templates

use tracing::debug;

use crate::bindings::Bindings;
use crate::parser::ast::{Document, Segment};

use super::{MissingPolicy, TextConfig};

/// Substitute bound values into a parsed template
///
/// Values are inserted verbatim and never re-scanned, so a value containing
/// `{{...}}` comes out as-is.
pub fn render_text(doc: &Document<'_>, bindings: &Bindings, config: &TextConfig) -> String {
    let source = doc.source();
    let mut out = String::with_capacity(source.len());
    let mut substituted = 0usize;
    let mut missing = 0usize;

    for segment in doc.segments() {
        match segment {
            Segment::Literal(span) => out.push_str(&source[span.clone()]),
            Segment::Placeholder(span) => {
                let label = doc.label(span);
                match bindings.get(label) {
                    Some(value) => {
                        substituted += 1;
                        out.push_str(value);
                    }
                    None => {
                        missing += 1;
                        if config.missing == MissingPolicy::Keep {
                            out.push_str(&source[span.clone()]);
                        }
                    }
                }
            }
        }
    }

    if config.trailing_newline && !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    debug!(substituted, missing, "rendered template");
    out
}
