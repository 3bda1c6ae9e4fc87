use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{next_content_token, tag_tokens, ContentToken, TagToken};
use crate::serializer::unescape;
use crate::tree::{NodeId, Tree};
use std::collections::HashSet;

/// Recursive-descent parser for the markup dialect.
///
/// Grammar: an optional `<?...?>` header, then exactly one root element.
/// Elements are `<tag a="v"...>content</tag>` or `<tag .../>`; content is a
/// single text run or zero or more child elements. Every element needs an
/// `id` attribute, unique across the document.
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
    tree: Tree,
    seen_ids: HashSet<String>,
}

struct OpenTag<'src> {
    tag: &'src str,
    attributes: Vec<(&'src str, &'src str)>,
    self_closing: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tree: Tree::new(),
            seen_ids: HashSet::new(),
        }
    }

    /// Parse a complete document
    pub fn parse_document(mut self) -> ParseResult<Tree> {
        self.skip_whitespace();

        if let Some((Some(ContentToken::Declaration), span)) =
            next_content_token(self.source, self.pos)
        {
            self.pos = span.end;
            self.skip_whitespace();
        }

        if self.is_at_end() {
            return Ok(self.tree);
        }

        let root = self.parse_element()?;
        self.tree.set_root(root);

        self.skip_whitespace();
        if !self.is_at_end() {
            return Err(ParseError::malformed(
                self.pos,
                "unexpected content after the root element",
            ));
        }

        Ok(self.tree)
    }

    fn parse_element(&mut self) -> ParseResult<NodeId> {
        let start = self.pos;
        match next_content_token(self.source, self.pos) {
            Some((Some(ContentToken::Open), span)) => self.pos = span.end,
            Some((token, _)) => {
                return Err(ParseError::malformed(
                    start,
                    format!("expected '<', found {}", Self::format_content(token)),
                ))
            }
            None => return Err(ParseError::malformed(start, "unexpected end of input")),
        }

        let open = self.parse_open_tag(start)?;
        let node = self.build_node(start, &open)?;

        if open.self_closing {
            return Ok(node);
        }

        self.parse_content(start, open.tag, node)?;
        Ok(node)
    }

    fn parse_open_tag(&mut self, start: usize) -> ParseResult<OpenTag<'src>> {
        let source = self.source;
        let mut tokens = tag_tokens(source, self.pos).into_iter();

        let tag = match tokens.next() {
            Some((Some(TagToken::Name(name)), _)) => name,
            Some((_, span)) => {
                return Err(ParseError::malformed(span.start, "expected a tag name"));
            }
            None => return Err(ParseError::malformed(start, "unterminated tag")),
        };

        let mut attributes = Vec::new();
        loop {
            match tokens.next() {
                Some((Some(TagToken::End), span)) => {
                    self.pos = span.end;
                    return Ok(OpenTag {
                        tag,
                        attributes,
                        self_closing: false,
                    });
                }
                Some((Some(TagToken::SelfClosingEnd), span)) => {
                    self.pos = span.end;
                    return Ok(OpenTag {
                        tag,
                        attributes,
                        self_closing: true,
                    });
                }
                Some((Some(TagToken::Name(name)), span)) => {
                    match (tokens.next(), tokens.next()) {
                        (Some((Some(TagToken::Equals), _)), Some((Some(TagToken::Value(value)), _))) => {
                            attributes.push((name, value));
                        }
                        (_, Some((_, bad))) | (Some((_, bad)), None) => {
                            return Err(ParseError::malformed(
                                bad.start,
                                format!("expected {}=\"value\"", name),
                            ));
                        }
                        (None, _) => {
                            return Err(ParseError::malformed(span.start, "unterminated tag"));
                        }
                    }
                }
                Some((Some(token), span)) => {
                    return Err(ParseError::malformed(
                        span.start,
                        format!("unexpected {} in <{}>", token, tag),
                    ));
                }
                Some((None, span)) => {
                    return Err(ParseError::malformed(
                        span.start,
                        format!("invalid character in <{}>", tag),
                    ));
                }
                None => return Err(ParseError::malformed(start, "unterminated tag")),
            }
        }
    }

    fn build_node(&mut self, start: usize, open: &OpenTag<'src>) -> ParseResult<NodeId> {
        // Later duplicates of an attribute win
        let id = open
            .attributes
            .iter()
            .rev()
            .find(|(name, _)| *name == "id")
            .map(|(_, value)| unescape(value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ParseError::missing_id(start, open.tag))?;

        if !self.seen_ids.insert(id.to_string()) {
            return Err(ParseError::duplicate_id(start, &*id));
        }

        let node = self
            .tree
            .create_node(open.tag, &*id)
            .map_err(|e| ParseError::malformed(start, e.to_string()))?;

        for (name, value) in &open.attributes {
            if *name != "id" {
                self.tree
                    .node_mut(node)
                    .set_attribute(*name, unescape(value));
            }
        }

        Ok(node)
    }

    fn parse_content(&mut self, start: usize, tag: &'src str, node: NodeId) -> ParseResult<()> {
        let mut text: Option<&'src str> = None;

        loop {
            let token_start = self.pos;
            match next_content_token(self.source, self.pos) {
                Some((Some(ContentToken::Text(run)), span)) => {
                    if self.tree.node(node).has_children() && !run.trim().is_empty() {
                        return Err(ParseError::mixed_content(token_start, tag));
                    }
                    text = Some(run);
                    self.pos = span.end;
                }
                Some((Some(ContentToken::Open), _)) => {
                    if text.map_or(false, |t| !t.trim().is_empty()) {
                        return Err(ParseError::mixed_content(token_start, tag));
                    }
                    text = None;
                    let child = self.parse_element()?;
                    self.tree
                        .add_child(node, child)
                        .map_err(|_| ParseError::mixed_content(token_start, tag))?;
                }
                Some((Some(ContentToken::CloseOpen), span)) => {
                    self.pos = span.end;
                    self.parse_close_tag(token_start, tag)?;
                    break;
                }
                Some((Some(ContentToken::Declaration), _)) | Some((None, _)) => {
                    return Err(ParseError::malformed(
                        token_start,
                        format!("unexpected markup inside <{}>", tag),
                    ));
                }
                None => {
                    return Err(ParseError::malformed(
                        start,
                        format!("missing closing tag </{}>", tag),
                    ));
                }
            }
        }

        if let Some(run) = text {
            let trimmed = run.trim();
            if !trimmed.is_empty() {
                self.tree
                    .node_mut(node)
                    .set_text_content(Some(unescape(trimmed).into_owned()))
                    .map_err(|_| ParseError::mixed_content(start, tag))?;
            }
        }

        Ok(())
    }

    fn parse_close_tag(&mut self, start: usize, tag: &str) -> ParseResult<()> {
        let source = self.source;
        let mut tokens = tag_tokens(source, self.pos).into_iter();

        match (tokens.next(), tokens.next()) {
            (Some((Some(TagToken::Name(name)), _)), Some((Some(TagToken::End), end))) => {
                if name != tag {
                    return Err(ParseError::malformed(
                        start,
                        format!("expected </{}>, found </{}>", tag, name),
                    ));
                }
                self.pos = end.end;
                Ok(())
            }
            _ => Err(ParseError::malformed(
                start,
                format!("malformed closing tag for <{}>", tag),
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn format_content(token: Option<ContentToken>) -> String {
        match token {
            Some(t) => t.to_string(),
            None => "invalid input".to_string(),
        }
    }
}

/// Parse markup source into a tree. Empty input yields an empty tree.
pub fn parse(source: &str) -> ParseResult<Tree> {
    Parser::new(source).parse_document()
}
