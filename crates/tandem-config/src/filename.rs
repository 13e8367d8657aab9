//! Output filename patterns such as `js/[name]_[contenthash:8].js`.

use std::fmt;

use thiserror::Error;

/// A placeholder recognised inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Name,
    Id,
    Hash,
    ContentHash,
    ChunkHash,
    Ext,
    Query,
}

impl Token {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Token::Name),
            "id" => Some(Token::Id),
            "hash" => Some(Token::Hash),
            "contenthash" => Some(Token::ContentHash),
            "chunkhash" => Some(Token::ChunkHash),
            "ext" => Some(Token::Ext),
            "query" => Some(Token::Query),
            _ => None,
        }
    }

    pub fn is_hash(&self) -> bool {
        matches!(self, Token::Hash | Token::ContentHash | Token::ChunkHash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Token { token: Token, len: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("unclosed '[' at offset {0}")]
    Unclosed(usize),

    #[error("unexpected ']' at offset {0}")]
    UnexpectedClose(usize),

    #[error("unknown token [{0}]")]
    UnknownToken(String),

    #[error("invalid length in [{0}]")]
    InvalidLength(String),
}

/// Values substituted into a pattern by [`FilenamePattern::render`].
///
/// All three hash tokens render `hash`; a `:N` suffix truncates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameContext<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub hash: &'a str,
    pub ext: &'a str,
    pub query: &'a str,
}

/// A parsed filename pattern.
///
/// # Example
///
/// ```
/// use tandem_config::{FilenameContext, FilenamePattern};
///
/// let pattern = FilenamePattern::parse("js/[name]_[contenthash:6].js").unwrap();
/// assert!(pattern.has_content_hash());
///
/// let rendered = pattern.render(&FilenameContext {
///     name: "main",
///     hash: "0123456789abcdef",
///     ..Default::default()
/// });
/// assert_eq!(rendered, "js/main_012345.js");
///
/// assert!(FilenamePattern::parse("css/[id].[name_[hash].css").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePattern {
    source: String,
    segments: Vec<Segment>,
}

impl FilenamePattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '[' => {
                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, next) in chars.by_ref() {
                        match next {
                            ']' => {
                                closed = true;
                                break;
                            }
                            '[' => return Err(PatternError::Unclosed(offset)),
                            other => inner.push(other),
                        }
                    }
                    if !closed {
                        return Err(PatternError::Unclosed(offset));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_token(&inner)?);
                }
                ']' => return Err(PatternError::UnexpectedClose(offset)),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_token(&self, wanted: Token) -> bool {
        self.tokens().any(|token| token == wanted)
    }

    /// Whether distinct chunks get distinct filenames.
    pub fn is_unique(&self) -> bool {
        self.tokens()
            .any(|token| matches!(token, Token::Name | Token::Id) || token.is_hash())
    }

    pub fn has_content_hash(&self) -> bool {
        self.tokens().any(|token| token.is_hash())
    }

    pub fn render(&self, ctx: &FilenameContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token { token, len } => {
                    let value = match token {
                        Token::Name => ctx.name,
                        Token::Id => ctx.id,
                        Token::Hash | Token::ContentHash | Token::ChunkHash => ctx.hash,
                        Token::Ext => ctx.ext,
                        Token::Query => ctx.query,
                    };
                    match len {
                        Some(n) => out.extend(value.chars().take(*n)),
                        None => out.push_str(value),
                    }
                }
            }
        }
        out
    }

    fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token { token, .. } => Some(*token),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for FilenamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_token(inner: &str) -> Result<Segment, PatternError> {
    let (name, len) = match inner.split_once(':') {
        Some((name, digits)) => {
            let len = digits
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| PatternError::InvalidLength(inner.to_string()))?;
            (name, Some(len))
        }
        None => (inner, None),
    };

    let token = Token::from_name(name).ok_or_else(|| PatternError::UnknownToken(inner.to_string()))?;
    if len.is_some() && !token.is_hash() {
        return Err(PatternError::InvalidLength(inner.to_string()));
    }

    Ok(Segment::Token { token, len })
}
