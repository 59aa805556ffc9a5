//! Path queries of the form `//name[@attr='value']`.
//!
//! Only the descendant-axis, single-step shape is supported: an element
//! name (or `*`) with at most one attribute-equality predicate. That is
//! enough to address any identified element in the source document.

use crate::config::ExportConfig;
use crate::error::ExportError;
use anchor_core::WordId;
use anchor_core::xml::TokenKind;
use std::fmt;
use std::str::FromStr;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, eof, opt, preceded, separated_pair, terminated};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    /// `None` matches any element.
    pub element: Option<String>,
    pub predicate: Option<(String, String)>,
}

impl PathQuery {
    /// The query that locates `target` under `config`'s naming.
    pub fn for_target(config: &ExportConfig, target: WordId) -> Self {
        let element = match config.word_element.as_str() {
            "*" => None,
            name => Some(name.to_string()),
        };
        Self {
            element,
            predicate: Some((config.id_attribute.clone(), target.as_str().to_string())),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ExportError> {
        query
            .parse(input)
            .map_err(|_| ExportError::Query(input.to_string()))
    }

    /// Whether the predicate value fits in one quoted literal. A value
    /// holding both `'` and `"` has no textual form; `matches` still works
    /// on it, but its `Display` output does not parse back.
    pub fn is_expressible(&self) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|(_, value)| !(value.contains('\'') && value.contains('"')))
    }

    /// Whether a start tag satisfies this query.
    pub fn matches(&self, kind: &TokenKind<'_>) -> bool {
        let TokenKind::StartTag { name, .. } = kind else {
            return false;
        };
        if self.element.as_deref().is_some_and(|wanted| wanted != *name) {
            return false;
        }
        match &self.predicate {
            None => true,
            Some((attr, value)) => kind.attribute(attr).is_some_and(|a| a.value() == value.as_str()),
        }
    }
}

impl FromStr for PathQuery {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Picks whichever quote the value does not contain. See `is_expressible`.
impl fmt::Display for PathQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}", self.element.as_deref().unwrap_or("*"))?;
        if let Some((attr, value)) = &self.predicate {
            if value.contains('\'') {
                write!(f, "[@{attr}=\"{value}\"]")?;
            } else {
                write!(f, "[@{attr}='{value}']")?;
            }
        }
        Ok(())
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

fn query(input: &mut &str) -> ModalResult<PathQuery> {
    let element = preceded("//", element_test).parse_next(input)?;
    let predicate = opt(predicate).parse_next(input)?;
    let _ = (multispace0, eof).parse_next(input)?;
    Ok(PathQuery { element, predicate })
}

fn element_test(input: &mut &str) -> ModalResult<Option<String>> {
    alt(("*".value(None), name.map(|n: &str| Some(n.to_string())))).parse_next(input)
}

fn predicate(input: &mut &str) -> ModalResult<(String, String)> {
    delimited(
        ('[', multispace0, '@'),
        separated_pair(name, (multispace0, '=', multispace0), literal),
        (multispace0, ']'),
    )
    .map(|(attr, value): (&str, &str)| (attr.to_string(), value.to_string()))
    .parse_next(input)
}

fn name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    })
    .parse_next(input)
}

fn literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    terminated(
        alt((
            delimited('\'', take_till(0.., '\''), '\''),
            delimited('"', take_till(0.., '"'), '"'),
        )),
        multispace0,
    )
    .parse_next(input)
}
