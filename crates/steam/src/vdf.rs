//! Text VDF (Valve KeyValues) parser.
//!
//! Handles the format used by `localconfig.vdf`, `sharedconfig.vdf`,
//! `libraryfolders.vdf` and `appmanifest_*.acf`: quoted or bare tokens,
//! nested `{ }` blocks, `//` comments and `[$PLATFORM]` conditionals
//! (which are ignored).

use std::fs;
use std::path::Path;

use crate::SteamError;

/// A node in a parsed VDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VdfNode {
    Value(String),
    Object(Vec<(String, VdfNode)>),
}

impl VdfNode {
    /// Returns the first child with the given key (case-insensitive).
    ///
    /// Steam is inconsistent about key casing (`apps` vs `Apps`).
    pub fn get(&self, key: &str) -> Option<&VdfNode> {
        self.entries()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Follows a chain of keys from this node.
    pub fn path(&self, keys: &[&str]) -> Option<&VdfNode> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Returns the string value, if this is a leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VdfNode::Value(v) => Some(v),
            VdfNode::Object(_) => None,
        }
    }

    /// Returns the children of an object node (empty for leaves).
    pub fn entries(&self) -> &[(String, VdfNode)] {
        match self {
            VdfNode::Object(entries) => entries,
            VdfNode::Value(_) => &[],
        }
    }
}

/// Reads and parses a text VDF file.
pub fn load_text_vdf(path: &Path) -> Result<VdfNode, SteamError> {
    let text = fs::read_to_string(path)
        .map_err(|e| SteamError::Io(format!("failed to read {}: {e}", path.display())))?;
    parse_text_vdf(&text)
}

/// Parses text VDF into a root object node.
pub fn parse_text_vdf(text: &str) -> Result<VdfNode, SteamError> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let root = parse_object(&tokens, &mut pos, true)?;
    Ok(VdfNode::Object(root))
}

#[derive(Debug, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
}

fn tokenize(text: &str) -> Result<Vec<Token>, SteamError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '}' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '/' => {
                chars.next();
                if chars.peek() != Some(&'/') {
                    return Err(SteamError::Vdf("stray '/' outside of a string".into()));
                }
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '[' => {
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(other) => value.push(other),
                            None => {
                                return Err(SteamError::Vdf("unterminated escape".into()));
                            }
                        },
                        Some(other) => value.push(other),
                        None => return Err(SteamError::Vdf("unterminated string".into())),
                    }
                }
                tokens.push(Token::Str(value));
            }
            _ => {
                let mut value = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | '"') {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
                tokens.push(Token::Str(value));
            }
        }
    }

    Ok(tokens)
}

fn parse_object(
    tokens: &[Token],
    pos: &mut usize,
    root: bool,
) -> Result<Vec<(String, VdfNode)>, SteamError> {
    let mut entries = Vec::new();

    loop {
        let key = match tokens.get(*pos) {
            None if root => return Ok(entries),
            None => return Err(SteamError::Vdf("unexpected end of data inside block".into())),
            Some(Token::Close) if root => {
                return Err(SteamError::Vdf("unbalanced '}' at top level".into()));
            }
            Some(Token::Close) => {
                *pos += 1;
                return Ok(entries);
            }
            Some(Token::Open) => {
                return Err(SteamError::Vdf(format!("expected key at token {pos}")));
            }
            Some(Token::Str(key)) => key.clone(),
        };
        *pos += 1;

        match tokens.get(*pos) {
            Some(Token::Str(value)) => {
                *pos += 1;
                entries.push((key, VdfNode::Value(value.clone())));
            }
            Some(Token::Open) => {
                *pos += 1;
                let children = parse_object(tokens, pos, false)?;
                entries.push((key, VdfNode::Object(children)));
            }
            _ => {
                return Err(SteamError::Vdf(format!("missing value for key '{key}'")));
            }
        }
    }
}
