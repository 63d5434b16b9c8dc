//! Lint engine for detecting unfinished templates.
//!
//! Runs alongside rendering to flag what the user still has to fill in:
//! placeholders without a value, values left blank, `{{` markers that never
//! close, and bindings that match no placeholder. Warnings never change the
//! rendered output.

use std::collections::HashSet;
use std::fmt;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::bindings::Bindings;
use crate::parser::ast::{Document, Segment, Span};

/// A lint warning about an unfinished template
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
    /// Location in the template source, if the warning has one
    pub span: Option<Span>,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Unfilled,
    Empty,
    Unterminated,
    Unused,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Unfilled => write!(f, "unfilled"),
            LintCategory::Empty => write!(f, "empty"),
            LintCategory::Unterminated => write!(f, "unterminated"),
            LintCategory::Unused => write!(f, "unused"),
        }
    }
}

impl LintWarning {
    /// Whether the rendered output still contains template markers
    pub fn leaves_markers(&self) -> bool {
        matches!(
            self.category,
            LintCategory::Unfilled | LintCategory::Unterminated
        )
    }

    /// Format the warning with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = &self.span else {
            return format!("Warning[{}]: {}\n", self.category, self.message);
        };

        // ariadne addresses characters, not bytes
        let span = char_offset(source, span.start)..char_offset(source, span.end);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_code(self.category)
            .with_message(&self.message)
            .with_label(Label::new((filename, span)).with_message(&self.message))
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Warning[{}]: {}\n", self.category, self.message),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    source[..byte].chars().count()
}

/// Run all lint checks on a template and its bindings.
pub fn check(doc: &Document<'_>, bindings: &Bindings) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_placeholders(doc, bindings, &mut warnings);
    check_unterminated(doc, &mut warnings);
    check_unused(doc, bindings, &mut warnings);
    warnings
}

// ── Placeholder values ────────────────────────────────────────────

fn check_placeholders(doc: &Document<'_>, bindings: &Bindings, warnings: &mut Vec<LintWarning>) {
    for placeholder in doc.placeholders() {
        match bindings.get(placeholder.label) {
            None => warnings.push(LintWarning {
                category: LintCategory::Unfilled,
                message: format!("no value for \"{}\"", placeholder.label),
                span: Some(placeholder.span),
            }),
            Some(value) if value.trim().is_empty() => warnings.push(LintWarning {
                category: LintCategory::Empty,
                message: format!("\"{}\" is bound to an empty value", placeholder.label),
                span: Some(placeholder.span),
            }),
            Some(_) => {}
        }
    }
}

// ── Unterminated markers ──────────────────────────────────────────

/// Any `{{` left in literal text has no closing `}}` after it.
fn check_unterminated(doc: &Document<'_>, warnings: &mut Vec<LintWarning>) {
    for segment in doc.segments() {
        let Segment::Literal(span) = segment else {
            continue;
        };
        for (offset, _) in doc.text(segment).match_indices("{{") {
            let start = span.start + offset;
            warnings.push(LintWarning {
                category: LintCategory::Unterminated,
                message: "\"{{\" is never closed and is kept as text".to_string(),
                span: Some(start..start + 2),
            });
        }
    }
}

// ── Unused bindings ───────────────────────────────────────────────

fn check_unused(doc: &Document<'_>, bindings: &Bindings, warnings: &mut Vec<LintWarning>) {
    let labels: HashSet<&str> = doc.placeholders().map(|p| p.label).collect();
    let mut unused: Vec<&str> = bindings
        .labels()
        .filter(|label| !labels.contains(label))
        .collect();
    // HashMap order is arbitrary
    unused.sort_unstable();

    for label in unused {
        warnings.push(LintWarning {
            category: LintCategory::Unused,
            message: format!("\"{}\" does not appear in the template", label),
            span: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn categories(warnings: &[LintWarning]) -> Vec<LintCategory> {
        warnings.iter().map(|w| w.category).collect()
    }

    #[test]
    fn test_clean_template() {
        let doc = parse("FROM {{image}}");
        let warnings = check(&doc, &Bindings::new().with("image", "alpine"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unfilled_reported_per_occurrence() {
        let doc = parse("{{port}}:{{port}}");
        let warnings = check(&doc, &Bindings::new());
        assert_eq!(
            categories(&warnings),
            vec![LintCategory::Unfilled, LintCategory::Unfilled]
        );
        assert_eq!(warnings[0].span, Some(0..8));
        assert_eq!(warnings[1].span, Some(9..17));
        assert!(warnings.iter().all(|w| w.leaves_markers()));
    }

    #[test]
    fn test_blank_value_reported() {
        let doc = parse("USER {{user}}");
        let warnings = check(&doc, &Bindings::new().with("user", "  "));
        assert_eq!(categories(&warnings), vec![LintCategory::Empty]);
        assert!(!warnings[0].leaves_markers());
    }

    #[test]
    fn test_unterminated_marker() {
        let doc = parse("ok {{a}} then {{broken");
        let warnings = check(&doc, &Bindings::new().with("a", "x"));
        assert_eq!(categories(&warnings), vec![LintCategory::Unterminated]);
        assert_eq!(warnings[0].span, Some(14..16));
    }

    #[test]
    fn test_unused_bindings_sorted() {
        let doc = parse("static");
        let bindings = Bindings::new().with("b", "1").with("a", "2");
        let warnings = check(&doc, &bindings);
        assert_eq!(
            categories(&warnings),
            vec![LintCategory::Unused, LintCategory::Unused]
        );
        assert!(warnings[0].message.contains("\"a\""));
        assert!(warnings[1].message.contains("\"b\""));
        assert!(warnings[0].span.is_none());
    }

    #[test]
    fn test_format_points_at_multibyte_label() {
        let source = "EXPOSE {{端口号}}";
        let doc = parse(source);
        let warnings = check(&doc, &Bindings::new());
        let report = warnings[0].format(source, "Dockerfile");
        assert!(report.contains("Dockerfile"));
        assert!(report.contains("no value for \"端口号\""));
    }

    #[test]
    fn test_format_without_span() {
        let warning = LintWarning {
            category: LintCategory::Unused,
            message: "\"x\" does not appear in the template".to_string(),
            span: None,
        };
        assert_eq!(
            warning.format("", "t"),
            "Warning[unused]: \"x\" does not appear in the template\n"
        );
    }
}
