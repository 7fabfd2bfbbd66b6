pub mod token;

use logos::Logos;

use crate::diagnostics::RefactorError;
use crate::span::{Span, Spanned};
use token::Token;

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, RefactorError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => {
                // Comments carry no structure the parser needs; the refactor
                // algorithms that care about them read the raw source text.
                if matches!(tok, Token::Comment) {
                    continue;
                }
                tokens.push(Spanned::new(tok, Span::new(span.start, span.end)));
            }
            Err(()) => {
                return Err(RefactorError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    Ok(tokens)
}
