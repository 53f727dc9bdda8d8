//! Style Parser
//!
//! A rule-level stylesheet parser for component styles. Comments are
//! stripped, style rules and at-rules are recognised, and malformed input is
//! reported while the well-formed prefix is kept.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parse_util::{LineIndex, ParseError, ParseSourceSpan};

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

/// At-rules whose block holds rules rather than declarations.
const NESTING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "container",
    "layer",
    "scope",
    "keyframes",
    "-webkit-keyframes",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleAst {
    pub rules: Vec<CssRule>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CssRule {
    Style(StyleRule),
    At(AtRule),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<CssDeclaration>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    pub name: String,
    pub prelude: String,
    pub block: Option<AtRuleBlock>,
    pub span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AtRuleBlock {
    Rules(Vec<CssRule>),
    Declarations(Vec<CssDeclaration>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

pub fn parse_styles(text: &str) -> StyleAst {
    // Comments are blanked out in place so offsets stay valid.
    let stripped = COMMENT_RE.replace_all(text, |caps: &regex::Captures| {
        caps[0]
            .chars()
            .map(|c| if c == '\n' { '\n' } else { ' ' })
            .collect::<String>()
    });
    let index = LineIndex::new(&stripped);
    let mut parser = StyleParser {
        src: &stripped,
        bytes: stripped.as_bytes(),
        index: &index,
        errors: Vec::new(),
    };
    let (rules, _) = parser.parse_rules(0, stripped.len(), false);
    StyleAst {
        rules,
        errors: parser.errors,
    }
}

struct StyleParser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    index: &'a LineIndex,
    errors: Vec<ParseError>,
}

impl<'a> StyleParser<'a> {
    fn error(&mut self, start: usize, end: usize, msg: impl Into<String>) {
        let span = self.index.span(start, end);
        self.errors.push(ParseError::new(span, msg));
    }

    fn skip_whitespace(&self, mut pos: usize, end: usize) -> usize {
        while pos < end && self.bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    /// First top-level occurrence of any byte in `stops`, ignoring quoted
    /// strings and parenthesised groups.
    fn find_top_level(&self, from: usize, end: usize, stops: &[u8]) -> Option<usize> {
        let mut depth = 0i32;
        let mut quote: Option<u8> = None;
        let mut pos = from;
        while pos < end {
            let b = self.bytes[pos];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) if b == b'\\' => pos += 1,
                Some(_) => {}
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ if depth == 0 && stops.contains(&b) => return Some(pos),
                    _ => {}
                },
            }
            pos += 1;
        }
        None
    }

    /// Index of the `}` closing the block whose body starts at `from`.
    fn matching_brace(&self, from: usize, end: usize) -> Option<usize> {
        let mut depth = 1i32;
        let mut pos = from;
        while let Some(at) = self.find_top_level(pos, end, b"{}") {
            if self.bytes[at] == b'{' {
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            pos = at + 1;
        }
        None
    }

    /// Parses rules in `[pos, end)`. Returns the rules and the position after them.
    fn parse_rules(&mut self, mut pos: usize, end: usize, nested: bool) -> (Vec<CssRule>, usize) {
        let mut rules = Vec::new();
        loop {
            pos = self.skip_whitespace(pos, end);
            if pos >= end {
                break;
            }
            match self.bytes[pos] {
                b'}' => {
                    if nested {
                        break;
                    }
                    self.error(pos, pos + 1, "Unexpected \"}\"");
                    pos += 1;
                }
                b';' => pos += 1,
                b'@' => {
                    let (rule, next) = self.parse_at_rule(pos, end);
                    rules.extend(rule);
                    pos = next;
                }
                _ => {
                    let (rule, next) = self.parse_style_rule(pos, end);
                    rules.extend(rule);
                    pos = next;
                }
            }
        }
        (rules, pos)
    }

    fn parse_at_rule(&mut self, start: usize, end: usize) -> (Option<CssRule>, usize) {
        let name_start = start + 1;
        let mut name_end = name_start;
        while name_end < end && (self.bytes[name_end].is_ascii_alphanumeric() || self.bytes[name_end] == b'-') {
            name_end += 1;
        }
        let name = self.src[name_start..name_end].to_string();
        let Some(stop) = self.find_top_level(name_end, end, b"{;}") else {
            let prelude = self.src[name_end..end].trim().to_string();
            self.error(start, end, format!("Unterminated at-rule \"@{}\"", name));
            return (Some(self.at_rule(name, prelude, None, start, end)), end);
        };
        let prelude = self.src[name_end..stop].trim().to_string();

        match self.bytes[stop] {
            b';' => (Some(self.at_rule(name, prelude, None, start, stop + 1)), stop + 1),
            b'}' => {
                self.error(start, stop, format!("Unterminated at-rule \"@{}\"", name));
                (Some(self.at_rule(name, prelude, None, start, stop)), stop)
            }
            _ => {
                let body_start = stop + 1;
                let (body_end, next) = match self.matching_brace(body_start, end) {
                    Some(close) => (close, close + 1),
                    None => {
                        self.error(start, end, format!("Unclosed block in \"@{}\"", name));
                        (end, end)
                    }
                };
                let block = if NESTING_AT_RULES.contains(&name.to_ascii_lowercase().as_str()) {
                    let (rules, _) = self.parse_rules(body_start, body_end, true);
                    AtRuleBlock::Rules(rules)
                } else {
                    AtRuleBlock::Declarations(self.parse_declarations(body_start, body_end))
                };
                (Some(self.at_rule(name, prelude, Some(block), start, next)), next)
            }
        }
    }

    fn at_rule(&self, name: String, prelude: String, block: Option<AtRuleBlock>, start: usize, end: usize) -> CssRule {
        CssRule::At(AtRule {
            name,
            prelude,
            block,
            span: self.index.span(start, end),
        })
    }

    fn parse_style_rule(&mut self, start: usize, end: usize) -> (Option<CssRule>, usize) {
        let Some(open) = self.find_top_level(start, end, b"{;}") else {
            self.error(start, end, "Expected \"{\" after selector");
            return (None, end);
        };
        if self.bytes[open] != b'{' {
            self.error(start, open, "Expected \"{\" after selector");
            let next = if self.bytes[open] == b';' { open + 1 } else { open };
            return (None, next);
        }

        let selectors = split_top_level(&self.src[start..open], b',')
            .into_iter()
            .map(|selector| selector.trim().to_string())
            .filter(|selector| !selector.is_empty())
            .collect::<Vec<_>>();
        let body_start = open + 1;
        let (body_end, next) = match self.matching_brace(body_start, end) {
            Some(close) => (close, close + 1),
            None => {
                self.error(start, end, "Unclosed block");
                (end, end)
            }
        };
        let declarations = self.parse_declarations(body_start, body_end);
        let rule = CssRule::Style(StyleRule {
            selectors,
            declarations,
            span: self.index.span(start, next),
        });
        (Some(rule), next)
    }

    fn parse_declarations(&mut self, start: usize, end: usize) -> Vec<CssDeclaration> {
        let mut declarations = Vec::new();
        let mut pos = start;
        while pos < end {
            let stop = self.find_top_level(pos, end, b";").unwrap_or(end);
            let text = self.src[pos..stop].trim();
            if !text.is_empty() {
                match text.split_once(':') {
                    Some((property, value)) if !property.trim().is_empty() && !property.contains('{') => {
                        let value = value.trim();
                        let (value, important) = match value.strip_suffix("!important") {
                            Some(rest) => (rest.trim_end(), true),
                            None => (value, false),
                        };
                        declarations.push(CssDeclaration {
                            property: property.trim().to_string(),
                            value: value.to_string(),
                            important,
                        });
                    }
                    _ => self.error(pos, stop, format!("Invalid declaration \"{}\"", text)),
                }
            }
            pos = stop + 1;
        }
        declarations
    }
}

fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, b) in bytes.iter().enumerate() {
        match *b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b if b == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_stripped() {
        let ast = parse_styles("/* header */ a { color: red; /* inline */ }");
        assert!(ast.errors.is_empty());
        match &ast.rules[0] {
            CssRule::Style(rule) => {
                assert_eq!(rule.selectors, vec!["a"]);
                assert_eq!(rule.declarations.len(), 1);
            }
            other => panic!("unexpected rule {:?}", other),
        }
    }

    #[test]
    fn test_split_selector_list_keeps_functional_pseudo_classes() {
        assert_eq!(split_top_level(":is(a, b), c", b','), vec![":is(a, b)", " c"]);
    }
}
