//! Lossless XML tokenizer.
//!
//! Built on `winnow` 0.7. Produces a flat token stream where every token
//! records the byte span it was read from, so callers can splice new
//! markup into the original text without re-serializing (and thereby
//! altering) anything they did not touch.
//!
//! Supported: elements, attributes (single or double quoted), text,
//! comments, CDATA, processing instructions, and `<!DOCTYPE …>` without an
//! internal subset. Element nesting is checked; entity references are only
//! decoded on request (`Attribute::value`, `unescape`).

use smallvec::SmallVec;
use std::borrow::Cow;
use std::ops::Range;
use thiserror::Error;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, preceded, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};

use crate::model::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed markup at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("closing tag `</{found}>` at byte {offset} does not match `<{expected}>`")]
    MismatchedEndTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("element `<{0}>` is never closed")]
    Unclosed(String),

    #[error("word element at byte {offset} has no identifier")]
    MissingWordId { offset: usize },

    #[error("no text container element found")]
    NoContainer,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// One attribute of a start tag. `value` is the raw, still-escaped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub raw_value: &'a str,
}

impl<'a> Attribute<'a> {
    /// The attribute value with entity references decoded.
    pub fn value(&self) -> Cow<'a, str> {
        unescape(self.raw_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    StartTag {
        name: &'a str,
        attributes: SmallVec<[Attribute<'a>; 4]>,
        self_closing: bool,
    },
    EndTag {
        name: &'a str,
    },
    Text(&'a str),
    CData(&'a str),
    Comment(&'a str),
    ProcessingInstruction(&'a str),
    Doctype(&'a str),
}

impl<'a> TokenKind<'a> {
    /// Look up an attribute of a start tag by exact name.
    pub fn attribute(&self, wanted: &str) -> Option<&Attribute<'a>> {
        match self {
            TokenKind::StartTag { attributes, .. } => attributes.iter().find(|a| a.name == wanted),
            _ => None,
        }
    }
}

/// A token together with the byte range it occupies in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Range<usize>,
}

/// Tokenize a whole document, checking that elements nest properly.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut rest = input;
    let mut tokens = Vec::new();
    let mut open: Vec<&str> = Vec::new();

    while !rest.is_empty() {
        let start = input.len() - rest.len();
        let kind = token_kind
            .parse_next(&mut rest)
            .map_err(|e| ParseError::Syntax {
                offset: start,
                message: format!("{e}"),
            })?;
        let end = input.len() - rest.len();

        match &kind {
            TokenKind::StartTag {
                name,
                self_closing: false,
                ..
            } => open.push(name),
            TokenKind::EndTag { name } => match open.pop() {
                Some(expected) if expected == *name => {}
                Some(expected) => {
                    return Err(ParseError::MismatchedEndTag {
                        expected: expected.to_string(),
                        found: name.to_string(),
                        offset: start,
                    });
                }
                None => {
                    return Err(ParseError::MismatchedEndTag {
                        expected: String::new(),
                        found: name.to_string(),
                        offset: start,
                    });
                }
            },
            _ => {}
        }

        tokens.push(Token {
            kind,
            span: start..end,
        });
    }

    match open.pop() {
        Some(name) => Err(ParseError::Unclosed(name.to_string())),
        None => Ok(tokens),
    }
}

// ─── Token parsers ───────────────────────────────────────────────────────

fn token_kind<'a>(input: &mut &'a str) -> ModalResult<TokenKind<'a>> {
    alt((
        comment.map(TokenKind::Comment),
        cdata.map(TokenKind::CData),
        doctype.map(TokenKind::Doctype),
        processing_instruction.map(TokenKind::ProcessingInstruction),
        end_tag.map(|name| TokenKind::EndTag { name }),
        start_tag,
        take_till(1.., '<').map(TokenKind::Text),
    ))
    .parse_next(input)
}

fn comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<!--", take_until(0.., "-->"), "-->").parse_next(input)
}

fn cdata<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<![CDATA[", take_until(0.., "]]>"), "]]>").parse_next(input)
}

fn doctype<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<!", take_till(1.., '>'), '>').parse_next(input)
}

fn processing_instruction<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("<?", take_until(0.., "?>"), "?>").parse_next(input)
}

fn xml_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    })
    .parse_next(input)
}

fn end_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("</", xml_name, (multispace0, '>')).parse_next(input)
}

fn quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)
}

fn attribute<'a>(input: &mut &'a str) -> ModalResult<Attribute<'a>> {
    let name = xml_name.parse_next(input)?;
    let raw_value = preceded((multispace0, '=', multispace0), quoted).parse_next(input)?;
    Ok(Attribute { name, raw_value })
}

fn start_tag<'a>(input: &mut &'a str) -> ModalResult<TokenKind<'a>> {
    let name = preceded('<', xml_name).parse_next(input)?;
    let mut attributes = SmallVec::new();

    loop {
        let ws: &str = multispace0.parse_next(input)?;
        if input.starts_with("/>") {
            let _ = "/>".parse_next(input)?;
            return Ok(TokenKind::StartTag {
                name,
                attributes,
                self_closing: true,
            });
        }
        if input.starts_with('>') {
            let _ = '>'.parse_next(input)?;
            return Ok(TokenKind::StartTag {
                name,
                attributes,
                self_closing: false,
            });
        }
        // Attributes must be separated from the name and from each other.
        if ws.is_empty() {
            return Err(ErrMode::Backtrack(ContextError::new()));
        }
        attributes.push(terminated(attribute, multispace0).parse_next(input)?);
    }
}

// ─── Escaping ────────────────────────────────────────────────────────────

/// Escape the five markup-significant characters.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode predefined entities and numeric character references.
/// Unknown or malformed references are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric(entity),
            }?;
            Some((c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spans_cover_input() {
        let src = r#"<?xml version="1.0"?><w id="w7">hello</w>"#;
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 4);
        let rebuilt: String = tokens.iter().map(|t| &src[t.span.clone()]).collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn start_tag_attributes() {
        let tokens = tokenize(r#"<w id="w7" class='a b'>x</w>"#).unwrap();
        let kind = &tokens[0].kind;
        assert_eq!(kind.attribute("id").unwrap().raw_value, "w7");
        assert_eq!(kind.attribute("class").unwrap().raw_value, "a b");
        assert!(kind.attribute("missing").is_none());
    }

    #[test]
    fn self_closing_and_comments() {
        let tokens = tokenize("<s><!-- note --><w id=\"a\"/></s>").unwrap();
        assert!(matches!(tokens[1].kind, TokenKind::Comment(" note ")));
        assert!(matches!(
            tokens[2].kind,
            TokenKind::StartTag {
                name: "w",
                self_closing: true,
                ..
            }
        ));
    }

    #[test]
    fn mismatched_end_tag_is_rejected() {
        let err = tokenize("<s><w>x</s></w>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedEndTag { .. }));
    }

    #[test]
    fn unclosed_element_is_rejected() {
        assert_eq!(
            tokenize("<body><p>").unwrap_err(),
            ParseError::Unclosed("p".into())
        );
    }

    #[test]
    fn stray_angle_bracket_is_syntax_error() {
        assert!(matches!(
            tokenize("<p>a < b</p>").unwrap_err(),
            ParseError::Syntax { .. }
        ));
    }

    #[test]
    fn escape_and_unescape() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        assert_eq!(unescape("a &amp; b &#65;&#x42; &bogus;"), "a & b AB &bogus;");
    }
}
