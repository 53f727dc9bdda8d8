//! ML Parser
//!
//! A tolerant, single pass markup parser. Problems are collected as
//! `ParseError`s and parsing always produces a tree.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::ast::*;
use super::tags::{self, TagContentType};
use crate::parse_util::{LineIndex, ParseError, ParseSourceSpan};

static ENTITY_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

#[derive(Debug, Clone, Default)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
    pub url: String,
}

/// Parse `source` into an HTML node tree. `url` identifies the template in
/// error reports.
pub fn parse(source: &str, url: &str) -> ParseTreeResult {
    let index = LineIndex::new(source);
    let mut parser = Parser::new(source, 0, source.len(), &index);
    parser.run();
    let (root_nodes, errors) = parser.finish();
    ParseTreeResult {
        root_nodes,
        errors,
        url: url.to_string(),
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    index: &'a LineIndex,
    root: Vec<Node>,
    stack: Vec<Element>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, start: usize, end: usize, index: &'a LineIndex) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: start,
            end,
            index,
            root: Vec::new(),
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.end {
            if self.starts_with("<!--") {
                self.consume_comment();
            } else if self.starts_with("</") && self.is_name_start_at(2) {
                self.consume_end_tag();
            } else if self.peek(0) == Some(b'<') && self.is_name_start_at(1) {
                self.consume_start_tag();
            } else if self.peek(0) == Some(b'{')
                && self.peek(1) != Some(b'{')
                && self.try_consume_expansion()
            {
                continue;
            } else {
                self.consume_text();
            }
        }
    }

    fn finish(mut self) -> (Vec<Node>, Vec<ParseError>) {
        while let Some(open) = self.stack.last() {
            if !tags::closed_by_parent(tags::local_name(&open.name)) {
                let error = ParseError::new(
                    open.start_source_span,
                    format!("Unclosed element \"{}\"", open.name),
                );
                self.errors.push(error);
            }
            self.close_top(None, self.end);
        }
        (self.root, self.errors)
    }

    // ==========================================================================
    // Scanning helpers
    // ==========================================================================

    fn peek(&self, offset: usize) -> Option<u8> {
        let at = self.pos + offset;
        if at < self.end {
            Some(self.bytes[at])
        } else {
            None
        }
    }

    fn byte_at(&self, at: usize) -> Option<u8> {
        if at < self.end {
            Some(self.bytes[at])
        } else {
            None
        }
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.bytes[self.pos..self.end].starts_with(pattern.as_bytes())
    }

    fn is_name_start_at(&self, offset: usize) -> bool {
        matches!(self.peek(offset), Some(b) if b.is_ascii_alphabetic() || b == b':' || b == b'_')
    }

    fn find(&self, pattern: &str, from: usize) -> Option<usize> {
        if from >= self.end {
            return None;
        }
        self.src[from..self.end].find(pattern).map(|idx| idx + from)
    }

    fn find_byte(&self, needle: u8, from: usize) -> Option<usize> {
        (from..self.end).find(|at| self.bytes[*at] == needle)
    }

    fn skip_whitespace(&mut self) {
        self.pos = self.skip_whitespace_from(self.pos);
    }

    fn skip_whitespace_from(&self, mut at: usize) -> usize {
        while matches!(self.byte_at(at), Some(b) if b.is_ascii_whitespace()) {
            at += 1;
        }
        at
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' || b == b'<' {
                break;
            }
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn span(&self, start: usize, end: usize) -> ParseSourceSpan {
        self.index.span(start, end)
    }

    fn error(&mut self, start: usize, end: usize, msg: impl Into<String>) {
        let span = self.span(start, end);
        self.errors.push(ParseError::new(span, msg));
    }

    // ==========================================================================
    // Tree building
    // ==========================================================================

    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn add_text(&mut self, value: String, start: usize, end: usize) {
        if value.is_empty() {
            return;
        }
        let end_location = self.index.location(end);
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let Some(Node::Text(previous)) = siblings.last_mut() {
            previous.value.push_str(&value);
            previous.source_span.end = end_location;
            return;
        }
        let source_span = self.span(start, end);
        self.add_node(Node::Text(Text { value, source_span }));
    }

    fn close_top(&mut self, end_span: Option<ParseSourceSpan>, end: usize) {
        if let Some(mut element) = self.stack.pop() {
            element.source_span.end = self.index.location(end);
            element.end_source_span = end_span;
            self.add_node(Node::Element(element));
        }
    }

    fn pop_element(&mut self, name: &str, end_span: ParseSourceSpan) -> bool {
        for idx in (0..self.stack.len()).rev() {
            let candidate = &self.stack[idx].name;
            if candidate == name || tags::local_name(candidate) == tags::local_name(name) {
                while self.stack.len() > idx + 1 {
                    self.close_top(None, end_span.start.offset);
                }
                self.close_top(Some(end_span), end_span.end.offset);
                return true;
            }
            if !tags::closed_by_parent(tags::local_name(candidate)) {
                return false;
            }
        }
        false
    }

    /// Applies the implicit `svg`/`math` namespaces and namespace inheritance.
    fn element_name(&self, name: &str) -> String {
        if name.starts_with(':') {
            return name.to_string();
        }
        let prefix = tags::implicit_namespace_prefix(name)
            .map(str::to_string)
            .or_else(|| {
                let parent = self.stack.last()?;
                if tags::local_name(&parent.name) == "foreignObject" {
                    return None;
                }
                tags::get_ns_prefix(Some(&parent.name))
            });
        tags::merge_ns_and_name(prefix.as_deref(), name)
    }

    // ==========================================================================
    // Constructs
    // ==========================================================================

    fn consume_comment(&mut self) {
        let start = self.pos;
        let content_start = start + 4;
        let (value_end, end) = match self.find("-->", content_start) {
            Some(idx) => (idx, idx + 3),
            None => {
                self.error(start, self.end, "Unexpected character \"EOF\" in comment");
                (self.end, self.end)
            }
        };
        let value = self.src[content_start.min(value_end)..value_end].trim().to_string();
        self.pos = end;
        let source_span = self.span(start, end);
        self.add_node(Node::Comment(Comment {
            value: Some(value),
            source_span,
        }));
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        while self.pos < self.end {
            if self.starts_with("{{") {
                self.pos = self.find("}}", self.pos + 2).map_or(self.end, |idx| idx + 2);
                continue;
            }
            if self.pos > start && self.at_markup_boundary() {
                break;
            }
            self.pos += 1;
        }
        while !self.src.is_char_boundary(self.pos) {
            self.pos += 1;
        }
        let value = decode_entities(&self.src[start..self.pos]);
        self.add_text(value, start, self.pos);
    }

    fn at_markup_boundary(&self) -> bool {
        match self.peek(0) {
            Some(b'<') => {
                self.starts_with("<!--")
                    || self.is_name_start_at(1)
                    || (self.peek(1) == Some(b'/') && self.is_name_start_at(2))
            }
            Some(b'{') => true,
            _ => false,
        }
    }

    fn consume_start_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name = self.read_name();
        let mut attrs = Vec::new();
        let mut is_self_closing = false;
        let mut terminated = false;

        loop {
            self.skip_whitespace();
            match self.peek(0) {
                Some(b'>') => {
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                Some(b'/') if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    is_self_closing = true;
                    terminated = true;
                    break;
                }
                Some(b'/') => self.pos += 1,
                Some(b'<') | None => break,
                Some(_) => attrs.push(self.consume_attribute()),
            }
        }
        if !terminated {
            self.error(start, self.pos, format!("Unterminated start tag \"{}\"", name));
        }

        let full_name = self.element_name(&name);
        if let Some(parent) = self.stack.last() {
            if tags::is_closed_by_child(&parent.name, &full_name) {
                self.close_top(None, start);
            }
        }

        let start_source_span = self.span(start, self.pos);
        let mut element = Element {
            name: full_name,
            attrs,
            children: Vec::new(),
            source_span: start_source_span,
            start_source_span,
            end_source_span: None,
            is_self_closing,
        };
        let local = tags::local_name(&element.name).to_string();

        if is_self_closing {
            if !tags::can_self_close(&element.name) {
                self.error(
                    start,
                    self.pos,
                    format!("Only void, custom and foreign elements can be self closed \"{}\"", name),
                );
            }
            element.end_source_span = Some(start_source_span);
            self.add_node(Node::Element(element));
        } else if tags::is_void_element(&local) {
            self.add_node(Node::Element(element));
        } else {
            match tags::get_content_type(&local) {
                TagContentType::ParsableData => self.stack.push(element),
                content_type => self.consume_raw_text(element, &local, content_type),
            }
        }
    }

    fn consume_attribute(&mut self) -> Attribute {
        let start = self.pos;
        while let Some(b) = self.peek(0) {
            if b.is_ascii_whitespace()
                || b == b'='
                || b == b'>'
                || b == b'<'
                || (b == b'/' && self.peek(1) == Some(b'>'))
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            // A stray `=` without a name.
            self.pos += 1;
        }
        let name = self.src[start..self.pos].to_string();

        let after_name = self.pos;
        self.skip_whitespace();
        let mut value = String::new();
        let mut value_span = None;
        if self.peek(0) == Some(b'=') {
            self.pos += 1;
            self.skip_whitespace();
            match self.peek(0) {
                Some(quote @ (b'"' | b'\'')) => {
                    let value_start = self.pos + 1;
                    let close = self.find_byte(quote, value_start);
                    let value_end = close.unwrap_or(self.end);
                    value = decode_entities(&self.src[value_start..value_end]);
                    value_span = Some(self.span(value_start, value_end));
                    self.pos = close.map_or(self.end, |idx| idx + 1);
                    if close.is_none() {
                        self.error(start, self.end, format!("Unterminated attribute value for \"{}\"", name));
                    }
                }
                _ => {
                    let value_start = self.pos;
                    while let Some(b) = self.peek(0) {
                        if b.is_ascii_whitespace() || b == b'>' {
                            break;
                        }
                        self.pos += 1;
                    }
                    value = decode_entities(&self.src[value_start..self.pos]);
                    value_span = Some(self.span(value_start, self.pos));
                }
            }
        } else {
            self.pos = after_name;
        }

        Attribute {
            name,
            value,
            source_span: self.span(start, self.pos),
            value_span,
        }
    }

    fn consume_raw_text(&mut self, mut element: Element, local: &str, content_type: TagContentType) {
        let content_start = self.pos;
        let close = (content_start..self.end).find(|at| {
            let rest = &self.bytes[*at..self.end];
            rest.starts_with(b"</")
                && rest.len() >= local.len() + 2
                && rest[2..local.len() + 2].eq_ignore_ascii_case(local.as_bytes())
        });
        let content_end = close.unwrap_or(self.end);
        let raw = &self.src[content_start..content_end];
        let value = match content_type {
            TagContentType::EscapableRawText => decode_entities(raw),
            _ => raw.to_string(),
        };
        if !value.is_empty() {
            element.children.push(Node::Text(Text {
                value,
                source_span: self.span(content_start, content_end),
            }));
        }

        match close {
            Some(close_start) => {
                let end = self.find_byte(b'>', close_start).map_or(self.end, |idx| idx + 1);
                let end_span = self.span(close_start, end);
                element.end_source_span = Some(end_span);
                element.source_span.end = end_span.end;
                self.pos = end;
            }
            None => {
                self.errors.push(ParseError::new(
                    element.start_source_span,
                    format!("Unclosed element \"{}\"", element.name),
                ));
                element.source_span.end = self.index.location(self.end);
                self.pos = self.end;
            }
        }
        self.add_node(Node::Element(element));
    }

    fn consume_end_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self.read_name();
        self.skip_whitespace();
        match self.find_byte(b'>', self.pos) {
            Some(idx) => self.pos = idx + 1,
            None => {
                self.error(start, self.end, format!("Unterminated end tag \"{}\"", name));
                self.pos = self.end;
            }
        }
        let end_span = self.span(start, self.pos);

        if tags::is_void_element(tags::local_name(&name)) {
            self.errors.push(ParseError::new(
                end_span,
                format!("Void elements do not have end tags \"{}\"", name),
            ));
        } else if !self.pop_element(&name, end_span) {
            self.errors.push(ParseError::new(
                end_span,
                format!(
                    "Unexpected closing tag \"{}\". It may happen when the tag has already been closed by another tag.",
                    name
                ),
            ));
        }
    }

    fn try_consume_expansion(&mut self) -> bool {
        let start = self.pos;
        match self.scan_expansion(start) {
            Some((expansion, errors, end)) => {
                self.errors.extend(errors);
                self.pos = end;
                self.add_node(Node::Expansion(expansion));
                true
            }
            None => false,
        }
    }

    /// `{switch, kind, value {content} ...}`. Anything that does not fit the
    /// shape is left to be read as text.
    fn scan_expansion(&self, start: usize) -> Option<(Expansion, Vec<ParseError>, usize)> {
        let mut pos = start + 1;
        let switch_end = self.find_byte(b',', pos)?;
        let switch_value = self.src[pos..switch_end].trim();
        if switch_value.is_empty() || switch_value.contains(['{', '}']) {
            return None;
        }
        pos = switch_end + 1;
        let kind_end = self.find_byte(b',', pos)?;
        let kind = self.src[pos..kind_end].trim();
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        pos = kind_end + 1;

        let mut cases = Vec::new();
        let mut errors = Vec::new();
        loop {
            pos = self.skip_whitespace_from(pos);
            if self.byte_at(pos)? == b'}' {
                pos += 1;
                break;
            }
            let value_start = pos;
            while let Some(b) = self.byte_at(pos) {
                if b.is_ascii_whitespace() || b == b'{' || b == b'}' {
                    break;
                }
                pos += 1;
            }
            if pos == value_start {
                return None;
            }
            let value = self.src[value_start..pos].to_string();
            pos = self.skip_whitespace_from(pos);
            if self.byte_at(pos)? != b'{' {
                return None;
            }
            let content_start = pos + 1;
            let content_end = self.matching_brace(content_start)?;
            let mut inner = Parser::new(self.src, content_start, content_end, self.index);
            inner.run();
            let (expression, inner_errors) = inner.finish();
            errors.extend(inner_errors);
            cases.push(ExpansionCase {
                value,
                expression,
                source_span: self.span(value_start, content_end + 1),
            });
            pos = content_end + 1;
        }

        if cases.is_empty() {
            return None;
        }
        let expansion = Expansion {
            switch_value: switch_value.to_string(),
            kind: kind.to_string(),
            cases,
            source_span: self.span(start, pos),
        };
        Some((expansion, errors, pos))
    }

    fn matching_brace(&self, from: usize) -> Option<usize> {
        let mut depth = 1usize;
        for at in from..self.end {
            match self.bytes[at] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(at);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Decode the character references Angular templates commonly use.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_REGEXP
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &#65;&#x42; &unknown;"), "a & b AB &unknown;");
    }

    #[test]
    fn test_text_is_merged() {
        let result = parse("a < b", "test.html");
        assert_eq!(result.root_nodes.len(), 1);
        match &result.root_nodes[0] {
            Node::Text(text) => assert_eq!(text.value, "a < b"),
            other => panic!("unexpected node {:?}", other),
        }
    }
}
