//! Route pattern DSL: tokenizer and compiler
//!
//! Pattern syntax (stable contract, shared by all route tables):
//! - literal path segments: `catalog/list`
//! - `<name>` required capture of one segment
//! - `<name \d+>` capture constrained by an anchored regex fragment
//!   (alternations like `<lang cs|en>` are plain regex alternations)
//! - `[...]` optional segment group, may nest and may span a `/`
//!
//! A pattern is parsed once into a token tree; both the matcher and the
//! URL constructor are derived from that same tree, which is what keeps
//! match and construct symmetric.

use regex::Regex;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use shoproute_core::{Error, Result};

/// One node of the parsed pattern tree.
#[derive(Debug, Clone)]
enum Node {
    Literal(String),
    Capture {
        name: String,
        constraint: Option<Arc<Regex>>,
    },
    Optional(Vec<Node>),
}

/// A piece of one expanded alternative, before segment splitting.
#[derive(Debug, Clone)]
enum Piece {
    Literal(String),
    Capture {
        name: String,
        constraint: Option<Arc<Regex>>,
    },
}

/// One path segment of a fully expanded alternative.
///
/// A segment is either pure literal text or exactly one capture; mixing
/// both in one segment is rejected at compile time.
#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Capture {
        name: String,
        constraint: Option<Arc<Regex>>,
    },
}

/// A compiled route pattern: matcher and constructor in one.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    nodes: Vec<Node>,
    /// Optional groups expanded into concrete segment sequences,
    /// include-variants ordered before exclude-variants.
    alternatives: Vec<Vec<Segment>>,
}

impl CompiledPattern {
    /// Parse and compile a pattern.
    ///
    /// # Errors
    /// - `Error::InvalidPattern` on unbalanced brackets, empty or malformed
    ///   capture names, invalid constraint regexes, or a segment mixing
    ///   literal text with a capture
    pub fn compile(source: &str) -> Result<Self> {
        let mut chars = source.chars().peekable();
        let nodes = parse_sequence(&mut chars, source, false)?;

        let mut alternatives = Vec::new();
        for pieces in expand(&nodes) {
            alternatives.push(segmentize(&pieces, source)?);
        }

        Ok(Self {
            source: source.to_string(),
            nodes,
            alternatives,
        })
    }

    /// The pattern text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains a capture with the given name,
    /// anywhere in the tree.
    pub fn has_capture(&self, name: &str) -> bool {
        fn walk(nodes: &[Node], name: &str) -> bool {
            nodes.iter().any(|node| match node {
                Node::Capture { name: n, .. } => n == name,
                Node::Optional(children) => walk(children, name),
                Node::Literal(_) => false,
            })
        }
        walk(&self.nodes, name)
    }

    /// Match a path against the pattern.
    ///
    /// The path is taken relative (leading and trailing slashes ignored).
    /// Returns the captured values on the first matching alternative,
    /// `None` when no alternative matches.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        'alternatives: for alternative in &self.alternatives {
            if alternative.len() != segments.len() {
                continue;
            }
            let mut captures = HashMap::new();
            for (segment, part) in alternative.iter().zip(&segments) {
                match segment {
                    Segment::Literal(text) => {
                        if text != part {
                            continue 'alternatives;
                        }
                    }
                    Segment::Capture { name, constraint } => {
                        if let Some(re) = constraint {
                            if !re.is_match(part) {
                                continue 'alternatives;
                            }
                        }
                        captures.insert(name.clone(), (*part).to_string());
                    }
                }
            }
            return Some(captures);
        }
        None
    }

    /// Render a path from capture values.
    ///
    /// `values` are the requested parameters; `defaults` supply fallback
    /// values per capture name. An optional group is rendered only when
    /// every capture inside it resolves and at least one resolved value
    /// differs from its default. Returns `None` when a required capture is
    /// missing or a value fails its constraint.
    pub fn construct(
        &self,
        values: &HashMap<String, String>,
        defaults: &HashMap<String, String>,
    ) -> Option<String> {
        let rendered = render_nodes(&self.nodes, values, defaults)?;
        Some(rendered.trim_matches('/').to_string())
    }
}

fn parse_sequence(
    chars: &mut Peekable<Chars<'_>>,
    source: &str,
    in_group: bool,
) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut literal = String::new();

    loop {
        match chars.next() {
            None => {
                if in_group {
                    return Err(Error::InvalidPattern(format!(
                        "unterminated '[' in pattern '{}'",
                        source
                    )));
                }
                flush_literal(&mut literal, &mut nodes);
                return Ok(nodes);
            }
            Some(']') => {
                if !in_group {
                    return Err(Error::InvalidPattern(format!(
                        "unmatched ']' in pattern '{}'",
                        source
                    )));
                }
                flush_literal(&mut literal, &mut nodes);
                if nodes.is_empty() {
                    return Err(Error::InvalidPattern(format!(
                        "empty optional group in pattern '{}'",
                        source
                    )));
                }
                return Ok(nodes);
            }
            Some('[') => {
                flush_literal(&mut literal, &mut nodes);
                nodes.push(Node::Optional(parse_sequence(chars, source, true)?));
            }
            Some('<') => {
                flush_literal(&mut literal, &mut nodes);
                nodes.push(parse_capture(chars, source)?);
            }
            Some('>') => {
                return Err(Error::InvalidPattern(format!(
                    "unmatched '>' in pattern '{}'",
                    source
                )));
            }
            Some(c) => literal.push(c),
        }
    }
}

fn flush_literal(literal: &mut String, nodes: &mut Vec<Node>) {
    if !literal.is_empty() {
        nodes.push(Node::Literal(std::mem::take(literal)));
    }
}

fn parse_capture(chars: &mut Peekable<Chars<'_>>, source: &str) -> Result<Node> {
    let mut body = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(Error::InvalidPattern(format!(
                    "unterminated '<' in pattern '{}'",
                    source
                )));
            }
            Some('>') => break,
            Some(c @ ('<' | '[' | ']')) => {
                return Err(Error::InvalidPattern(format!(
                    "unexpected '{}' inside capture in pattern '{}'",
                    c, source
                )));
            }
            Some(c) => body.push(c),
        }
    }

    let (name, constraint) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.trim(), Some(rest.trim())),
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidPattern(format!(
            "invalid capture name '{}' in pattern '{}'",
            name, source
        )));
    }

    let constraint = match constraint {
        Some(fragment) if !fragment.is_empty() => {
            let re = Regex::new(&format!("^(?:{})$", fragment)).map_err(|e| {
                Error::InvalidPattern(format!(
                    "invalid constraint '{}' for capture '{}': {}",
                    fragment, name, e
                ))
            })?;
            Some(Arc::new(re))
        }
        _ => None,
    };

    Ok(Node::Capture {
        name: name.to_string(),
        constraint,
    })
}

/// Expand optional groups into concrete alternatives.
///
/// Include-variants come before exclude-variants so that, when a path
/// satisfies both, the longer form wins within one pattern.
fn expand(nodes: &[Node]) -> Vec<Vec<Piece>> {
    let mut alternatives: Vec<Vec<Piece>> = vec![Vec::new()];

    for node in nodes {
        match node {
            Node::Literal(text) => {
                for alt in &mut alternatives {
                    alt.push(Piece::Literal(text.clone()));
                }
            }
            Node::Capture { name, constraint } => {
                for alt in &mut alternatives {
                    alt.push(Piece::Capture {
                        name: name.clone(),
                        constraint: constraint.clone(),
                    });
                }
            }
            Node::Optional(children) => {
                let child_alts = expand(children);
                let mut next = Vec::with_capacity(alternatives.len() * (child_alts.len() + 1));
                for alt in alternatives {
                    for child in &child_alts {
                        let mut with = alt.clone();
                        with.extend(child.iter().cloned());
                        next.push(with);
                    }
                    next.push(alt);
                }
                alternatives = next;
            }
        }
    }

    alternatives
}

/// Split one expanded alternative into path segments.
fn segmentize(pieces: &[Piece], source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current: Option<Segment> = None;

    let flush = |current: &mut Option<Segment>, segments: &mut Vec<Segment>| {
        if let Some(segment) = current.take() {
            segments.push(segment);
        }
    };

    for piece in pieces {
        match piece {
            Piece::Literal(text) => {
                for (index, part) in text.split('/').enumerate() {
                    if index > 0 {
                        flush(&mut current, &mut segments);
                    }
                    if part.is_empty() {
                        continue;
                    }
                    match &mut current {
                        None => current = Some(Segment::Literal(part.to_string())),
                        Some(Segment::Literal(existing)) => existing.push_str(part),
                        Some(Segment::Capture { .. }) => {
                            return Err(Error::InvalidPattern(format!(
                                "segment mixes capture and literal in pattern '{}'",
                                source
                            )));
                        }
                    }
                }
            }
            Piece::Capture { name, constraint } => {
                if current.is_some() {
                    return Err(Error::InvalidPattern(format!(
                        "segment mixes capture and literal in pattern '{}'",
                        source
                    )));
                }
                current = Some(Segment::Capture {
                    name: name.clone(),
                    constraint: constraint.clone(),
                });
            }
        }
    }
    flush(&mut current, &mut segments);

    Ok(segments)
}

fn render_nodes(
    nodes: &[Node],
    values: &HashMap<String, String>,
    defaults: &HashMap<String, String>,
) -> Option<String> {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Capture { name, constraint } => {
                let value = values.get(name).or_else(|| defaults.get(name))?;
                if let Some(re) = constraint {
                    if !re.is_match(value) {
                        return None;
                    }
                }
                out.push_str(value);
            }
            Node::Optional(children) => {
                if should_render(children, values, defaults) {
                    out.push_str(&render_nodes(children, values, defaults)?);
                }
            }
        }
    }
    Some(out)
}

/// An optional group is rendered when every capture directly inside it
/// resolves to a value and at least one resolved value differs from its
/// default. Nested groups are evaluated independently during rendering.
fn should_render(
    children: &[Node],
    values: &HashMap<String, String>,
    defaults: &HashMap<String, String>,
) -> bool {
    let mut direct: Vec<&str> = Vec::new();
    let mut nested: Vec<&[Node]> = Vec::new();
    for node in children {
        match node {
            Node::Capture { name, .. } => direct.push(name),
            Node::Optional(inner) => nested.push(inner),
            Node::Literal(_) => {}
        }
    }

    if direct.is_empty() {
        // Purely literal groups are omitted in the canonical form; groups
        // with only nested captures follow their nested groups.
        return nested
            .iter()
            .any(|inner| should_render(inner, values, defaults));
    }

    let mut differs = false;
    for name in direct {
        let Some(value) = values.get(name).or_else(|| defaults.get(name)) else {
            return false;
        };
        match defaults.get(name) {
            Some(default) if default == value => {}
            _ => differs = true,
        }
    }
    differs
}
