//! Segment parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use tracing::{debug, warn};

use crate::parser::ast::{Document, Segment, Span};
use crate::parser::lexer::{lex, Token};

/// Parse a template into literal and placeholder segments
///
/// Never fails: an `{{` without a later `}}` and any stray `}}` are kept as
/// literal text.
pub fn parse(input: &str) -> Document<'_> {
    let len = input.len();
    let mut tokens: Vec<(Token, Span)> = lex(input).collect();

    // No `{{` after the last `}}` can close, so only the tokens up to it need
    // the parser; the rest is one literal run
    let cut = tokens
        .iter()
        .rposition(|(tok, _)| *tok == Token::Close)
        .map_or(0, |index| index + 1);
    let tail_start = tokens.get(cut).map_or(len, |(_, span)| span.start);
    tokens.truncate(cut);

    // Turn the token list into a stream that chumsky can use
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((tail_start..tail_start).into(), |(t, s): (_, _)| (t, s));

    let mut segments = match segment_parser().parse(token_stream).into_result() {
        Ok(segments) => segments,
        Err(errors) => {
            // Every token is accepted as a literal, so this only guards the fallback
            warn!(
                errors = errors.len(),
                "template scan failed, treating the whole input as literal text"
            );
            vec![Segment::Literal(0..tail_start)]
        }
    };
    if tail_start < len {
        segments.push(Segment::Literal(tail_start..len));
    }

    let doc = Document::new(input, segments);
    debug!(
        bytes = len,
        segments = doc.segments().len(),
        "parsed template"
    );
    doc
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn segment_parser<'a, I>() -> impl Parser<'a, I, Vec<Segment>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // `{{`, then anything up to the first `}}`
    let placeholder = just(Token::Open)
        .ignore_then(any().filter(|tok: &Token| *tok != Token::Close).repeated())
        .then_ignore(just(Token::Close))
        .map_with(|_, e| Segment::Placeholder(span_range(&e.span())));

    // Any token that does not start a closed placeholder is text, including
    // an unterminated `{{`
    let literal = any().map_with(|_, e| Segment::Literal(span_range(&e.span())));

    choice((placeholder, literal)).repeated().collect::<Vec<_>>()
}
