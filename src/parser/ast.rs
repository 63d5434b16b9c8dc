//! Syntax types for parsed templates

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Width of the `{{` and `}}` delimiters in bytes
const DELIMITER_LEN: usize = 2;

/// A contiguous piece of template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output unchanged
    Literal(Span),
    /// A `{{label}}` marker; the span includes both delimiters
    Placeholder(Span),
}

impl Segment {
    /// Source span of the whole segment
    pub fn span(&self) -> &Span {
        match self {
            Segment::Literal(span) | Segment::Placeholder(span) => span,
        }
    }
}

/// A placeholder occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'src> {
    /// Text between the delimiters, verbatim
    pub label: &'src str,
    /// Span of the marker including delimiters
    pub span: Span,
}

impl Placeholder<'_> {
    /// Span of the label alone
    pub fn label_span(&self) -> Span {
        self.span.start + DELIMITER_LEN..self.span.end - DELIMITER_LEN
    }
}

/// A template split into literal and placeholder segments
///
/// The segments tile the source exactly: concatenating the text of every
/// segment reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'src> {
    source: &'src str,
    segments: Vec<Segment>,
}

impl<'src> Document<'src> {
    /// Build a document, merging adjacent literal segments
    pub fn new(source: &'src str, segments: Vec<Segment>) -> Self {
        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for segment in segments {
            if let (Some(Segment::Literal(prev)), Segment::Literal(next)) =
                (merged.last_mut(), &segment)
            {
                if prev.end == next.start {
                    prev.end = next.end;
                    continue;
                }
            }
            merged.push(segment);
        }
        Self {
            source,
            segments: merged,
        }
    }

    /// The template source
    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Source text of a segment
    pub fn text(&self, segment: &Segment) -> &'src str {
        &self.source[segment.span().clone()]
    }

    /// Label of a placeholder segment's span
    pub fn label(&self, span: &Span) -> &'src str {
        &self.source[span.start + DELIMITER_LEN..span.end - DELIMITER_LEN]
    }

    /// Placeholder occurrences in source order
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder<'src>> + '_ {
        self.segments.iter().filter_map(move |segment| match segment {
            Segment::Placeholder(span) => Some(Placeholder {
                label: self.label(span),
                span: span.clone(),
            }),
            Segment::Literal(_) => None,
        })
    }

    /// Distinct labels in order of first appearance
    ///
    /// These are the fields a form has to ask for.
    pub fn labels(&self) -> Vec<&'src str> {
        let mut labels: Vec<&'src str> = Vec::new();
        for placeholder in self.placeholders() {
            if !labels.contains(&placeholder.label) {
                labels.push(placeholder.label);
            }
        }
        labels
    }

    /// True when the template has no placeholders
    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }
}
