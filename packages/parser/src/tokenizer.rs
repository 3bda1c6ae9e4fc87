use logos::Logos;
use std::fmt;

/// Tokens between tags: markup openers and raw text runs
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum ContentToken<'src> {
    // `<?xml ... ?>` header
    #[regex(r"<\?[^>]*>")]
    Declaration,

    #[token("</")]
    CloseOpen,

    #[token("<")]
    Open,

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

/// Tokens inside a tag, after `<` or `</`
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum TagToken<'src> {
    #[token(">")]
    End,

    #[token("/>")]
    SelfClosingEnd,

    #[token("=")]
    Equals,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.:-]*", |lex| lex.slice())]
    Name(&'src str),

    // Quotes stripped; entities are decoded by the parser
    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Value(&'src str),
}

impl<'src> fmt::Display for ContentToken<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentToken::Declaration => write!(f, "declaration"),
            ContentToken::CloseOpen => write!(f, "</"),
            ContentToken::Open => write!(f, "<"),
            ContentToken::Text(t) => write!(f, "text {:?}", t),
        }
    }
}

impl<'src> fmt::Display for TagToken<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagToken::End => write!(f, ">"),
            TagToken::SelfClosingEnd => write!(f, "/>"),
            TagToken::Equals => write!(f, "="),
            TagToken::Name(n) => write!(f, "name '{}'", n),
            TagToken::Value(v) => write!(f, "value \"{}\"", v),
        }
    }
}

/// Lex the next content token starting at byte offset `pos`.
///
/// Returns the token (or `None` for unrecognised input) and its absolute span.
pub fn next_content_token(
    source: &str,
    pos: usize,
) -> Option<(Option<ContentToken<'_>>, std::ops::Range<usize>)> {
    let mut lexer = ContentToken::lexer(&source[pos..]);
    let result = lexer.next()?;
    let span = lexer.span();
    Some((result.ok(), pos + span.start..pos + span.end))
}

/// Tokenize a tag body starting at byte offset `pos`, up to and including
/// the first `>` or `/>`. Unrecognised input is returned as `None`.
pub fn tag_tokens(source: &str, pos: usize) -> Vec<(Option<TagToken<'_>>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let lexer = TagToken::lexer(&source[pos..]).spanned();

    for (result, span) in lexer {
        let token = result.ok();
        let done = matches!(token, Some(TagToken::End) | Some(TagToken::SelfClosingEnd) | None);
        tokens.push((token, pos + span.start..pos + span.end));
        if done {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tokens() {
        let source = "<?xml version=\"1.0\"?>\n<a id=\"x\">hi</a>";
        let (tok, span) = next_content_token(source, 0).unwrap();
        assert_eq!(tok, Some(ContentToken::Declaration));
        assert_eq!(span.end, 21);

        let (tok, _) = next_content_token(source, 21).unwrap();
        assert_eq!(tok, Some(ContentToken::Text("\n")));

        let (tok, _) = next_content_token(source, 22).unwrap();
        assert_eq!(tok, Some(ContentToken::Open));

        let (tok, span) = next_content_token(source, 32).unwrap();
        assert_eq!(tok, Some(ContentToken::Text("hi")));
        let (tok, _) = next_content_token(source, span.end).unwrap();
        assert_eq!(tok, Some(ContentToken::CloseOpen));
    }

    #[test]
    fn test_content_eof() {
        assert!(next_content_token("abc", 3).is_none());
    }

    #[test]
    fn test_tag_tokens() {
        let source = "<item id=\"a\" title='x y'/>rest";
        let tokens: Vec<_> = tag_tokens(source, 1).into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Some(TagToken::Name("item")),
                Some(TagToken::Name("id")),
                Some(TagToken::Equals),
                Some(TagToken::Value("a")),
                Some(TagToken::Name("title")),
                Some(TagToken::Equals),
                Some(TagToken::Value("x y")),
                Some(TagToken::SelfClosingEnd),
            ]
        );
    }

    #[test]
    fn test_tag_tokens_stop_on_garbage() {
        let source = "<item id=%>";
        let tokens = tag_tokens(source, 1);
        assert_eq!(tokens.last().map(|(t, _)| *t), Some(None));
    }

    #[test]
    fn test_tag_span_is_absolute() {
        let source = "xx<b id=\"1\">";
        let tokens = tag_tokens(source, 3);
        assert_eq!(tokens[0].1, 3..4);
        assert_eq!(tokens.last().unwrap().1, 11..12);
    }
}
