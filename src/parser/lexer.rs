//! Lexer for template placeholders using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Template tokens.
///
/// Only the brace delimiters are significant; everything else is lexed as
/// text runs. Longest match means a run of braces splits into delimiter pairs
/// from the left, so `}}}` is `Close` followed by `RBrace`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Delimiters (order matters - longer patterns first)
    #[token("{{")]
    Open,
    #[token("}}")]
    Close,

    // Lone braces are plain text
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"[^{}]+")]
    Text,
}

/// Lex input string into tokens with spans
///
/// Every byte of the input is covered by exactly one token.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Text), span))
}
