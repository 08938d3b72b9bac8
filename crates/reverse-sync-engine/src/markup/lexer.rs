//! Lossless tokenizer for storage-format markup.
//!
//! Every byte of the input lands in exactly one token, so concatenating
//! token texts reproduces the input. Anything the lexer does not recognise
//! (a stray `<`, a tag cut off at end of input) becomes text.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r#"<[A-Za-z][A-Za-z0-9:_.\-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    OpenTag,

    #[regex(r"</[A-Za-z][A-Za-z0-9:_.\-]*[ \t\r\n]*>")]
    CloseTag,

    #[token("<![CDATA[", |lex| bump_past(lex, "]]>"))]
    CData,

    #[token("<!--", |lex| bump_past(lex, "-->"))]
    Comment,

    #[regex(r"<![A-Za-z][^>]*>")]
    #[regex(r"<\?[^>]*>")]
    Declaration,

    #[regex(r"[^<]+")]
    Text,
}

/// Extends the current token up to and including `terminator`, or to the end
/// of input when it never appears.
fn bump_past(lex: &mut Lexer<'_, RawToken>, terminator: &str) {
    let rest = lex.remainder();
    let len = rest
        .find(terminator)
        .map_or(rest.len(), |at| at + terminator.len());
    lex.bump(len);
}

/// Token categories seen by the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>` or `<name .../>`.
    OpenTag,
    /// `</name>`.
    CloseTag,
    /// Character data between tags, entities still encoded.
    Text,
    /// `<![CDATA[...]]>`, wrapper included.
    CData,
    /// Comments, declarations and processing instructions.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Tokenizes `input`. Adjacent text fragments are merged into one token.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut lexer = RawToken::lexer(input);
    // Start of a pending text run, merged until the next non-text token.
    let mut text_start: Option<usize> = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = match result {
            Ok(RawToken::OpenTag) => TokenKind::OpenTag,
            Ok(RawToken::CloseTag) => TokenKind::CloseTag,
            Ok(RawToken::CData) => TokenKind::CData,
            Ok(RawToken::Comment | RawToken::Declaration) => TokenKind::Other,
            Ok(RawToken::Text) | Err(()) => {
                text_start.get_or_insert(span.start);
                continue;
            }
        };
        if let Some(start) = text_start.take() {
            tokens.push(Token {
                kind: TokenKind::Text,
                text: &input[start..span.start],
            });
        }
        tokens.push(Token {
            kind,
            text: lexer.slice(),
        });
    }

    if let Some(start) = text_start {
        tokens.push(Token {
            kind: TokenKind::Text,
            text: &input[start..],
        });
    }

    tokens
}
