//! Markup Parser
//!
//! Builds the node tree for the HTML-like template dialect: elements,
//! attributes, text with `{{ }}` interpolations, comments and control-flow
//! blocks (`@name (params) { ... }`). Parsing never stops at the first
//! problem; every error is collected and the partial tree is returned.

use std::sync::Arc;

use smallvec::SmallVec;

use super::ast::*;
use super::tags::is_void_element;
use crate::parse_util::{ParseError, ParseSourceFile, ParseSourceSpan};

#[derive(Debug)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        let mut builder = TreeBuilder {
            file: ParseSourceFile::new(source, url),
            src: source,
            pos: 0,
            stack: Vec::new(),
            root_nodes: Vec::new(),
            errors: Vec::new(),
        };
        builder.build();
        ParseTreeResult {
            root_nodes: builder.root_nodes,
            errors: builder.errors,
        }
    }
}

enum Open {
    Element(Element),
    Block(Block),
}

struct TreeBuilder<'s> {
    file: Arc<ParseSourceFile>,
    src: &'s str,
    pos: usize,
    stack: Vec<Open>,
    root_nodes: Vec<Node>,
    errors: Vec<ParseError>,
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'>' | b'/' | b'=' | b'"' | b'\'')
}

impl<'s> TreeBuilder<'s> {
    fn byte(&self, at: usize) -> Option<u8> {
        self.src.as_bytes().get(at).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix)
    }

    fn span(&self, start: usize, end: usize) -> ParseSourceSpan {
        self.file.span(start, end)
    }

    fn error(&mut self, start: usize, end: usize, msg: impl Into<String>) {
        let span = self.span(start, end);
        self.errors.push(ParseError::new(span, msg));
    }

    fn skip_whitespace(&mut self) {
        while self.byte(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn build(&mut self) {
        while self.pos < self.src.len() {
            let next = self.byte(self.pos + 1);
            if self.starts_with("<!--") {
                self.consume_comment();
            } else if self.starts_with("</") {
                self.consume_tag_close();
            } else if self.starts_with("<") && next.is_some_and(|b| b.is_ascii_alphabetic()) {
                self.consume_tag_open();
            } else if self.starts_with("@") && next.is_some_and(|b| b.is_ascii_alphabetic()) {
                self.consume_block_open();
            } else if self.starts_with("}") {
                self.consume_block_close();
            } else {
                self.consume_text();
            }
        }

        while let Some(open) = self.stack.last() {
            let (start, msg) = match open {
                Open::Element(e) => (e.source_span.start.offset, format!("Unclosed element \"{}\"", e.name)),
                Open::Block(b) => (b.source_span.start.offset, format!("Unclosed block \"@{}\"", b.name)),
            };
            self.error(start, self.src.len(), msg);
            self.pop_container(self.src.len());
        }
    }

    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(Open::Element(e)) => e.children.push(node),
            Some(Open::Block(b)) => b.children.push(node),
            None => self.root_nodes.push(node),
        }
    }

    fn pop_container(&mut self, end: usize) {
        let Some(open) = self.stack.pop() else {
            return;
        };
        let node = match open {
            Open::Element(mut e) => {
                e.source_span = self.span(e.source_span.start.offset, end);
                Node::Element(e)
            }
            Open::Block(mut b) => {
                b.source_span = self.span(b.source_span.start.offset, end);
                Node::Block(b)
            }
        };
        self.add_node(node);
    }

    fn consume_comment(&mut self) {
        let start = self.pos;
        let content_start = start + 4;
        match self.src[content_start..].find("-->") {
            Some(len) => {
                self.pos = content_start + len + 3;
                let comment = Comment {
                    value: self.src[content_start..content_start + len].to_string(),
                    source_span: self.span(start, self.pos),
                };
                self.add_node(Node::Comment(comment));
            }
            None => {
                self.pos = self.src.len();
                self.error(start, self.pos, "Unexpected character \"EOF\"");
            }
        }
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < self.src.len() {
            if self.starts_with("{{") {
                match self.src[self.pos + 2..].find("}}") {
                    Some(len) => self.pos += len + 4,
                    None => self.pos = self.src.len(),
                }
                continue;
            }
            let next = self.byte(self.pos + 1);
            let stop = match bytes[self.pos] {
                b'<' => next.is_some_and(|b| b.is_ascii_alphabetic() || b == b'/' || b == b'!'),
                b'@' => next.is_some_and(|b| b.is_ascii_alphabetic()),
                b'}' => true,
                _ => false,
            };
            if stop && self.pos > start {
                break;
            }
            // Advance a whole character, text may be non-ASCII.
            self.pos += self.src[self.pos..].chars().next().map_or(1, char::len_utf8);
            if stop {
                break;
            }
        }
        let text = Text {
            value: decode_entities(&self.src[start..self.pos]),
            source_span: self.span(start, self.pos),
        };
        self.add_node(Node::Text(text));
    }

    fn consume_tag_open(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name_start = self.pos;
        while self.byte(self.pos).is_some_and(|b| !is_name_end(b)) {
            self.pos += 1;
        }
        let name = self.src[name_start..self.pos].to_string();

        let mut attrs = Vec::new();
        let mut is_self_closing = false;
        loop {
            self.skip_whitespace();
            if self.starts_with("/>") {
                self.pos += 2;
                is_self_closing = true;
                break;
            }
            if self.starts_with(">") {
                self.pos += 1;
                break;
            }
            let Some(b) = self.byte(self.pos) else {
                self.error(start, self.pos, "Unexpected character \"EOF\"");
                return;
            };
            if is_name_end(b) {
                self.error(self.pos, self.pos + 1, format!("Unexpected character \"{}\"", b as char));
                self.pos += 1;
                continue;
            }
            match self.consume_attribute() {
                Some(attr) => attrs.push(attr),
                None => return,
            }
        }

        let start_source_span = self.span(start, self.pos);
        let element = Element {
            name: name.clone(),
            attrs,
            children: Vec::new(),
            is_self_closing,
            source_span: start_source_span.clone(),
            start_source_span,
            end_source_span: None,
        };
        if is_self_closing || is_void_element(&name) {
            self.add_node(Node::Element(element));
        } else {
            self.stack.push(Open::Element(element));
        }
    }

    fn consume_attribute(&mut self) -> Option<Attribute> {
        let start = self.pos;
        while self.byte(self.pos).is_some_and(|b| !is_name_end(b)) {
            self.pos += 1;
        }
        let name = self.src[start..self.pos].to_string();
        let name_end = self.pos;

        self.skip_whitespace();
        if !self.starts_with("=") {
            self.pos = name_end;
            return Some(Attribute {
                name,
                value: String::new(),
                source_span: self.span(start, name_end),
                value_span: None,
            });
        }
        self.pos += 1;
        self.skip_whitespace();

        let (value_start, value_end) = match self.byte(self.pos) {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let Some(len) = self.src[value_start..].find(quote as char) else {
                    self.error(start, self.src.len(), "Unterminated attribute value");
                    self.pos = self.src.len();
                    return None;
                };
                self.pos = value_start + len + 1;
                (value_start, value_start + len)
            }
            _ if self.starts_with("{{") => {
                // Unquoted interpolation, may contain whitespace.
                let value_start = self.pos;
                let Some(len) = self.src[value_start + 2..].find("}}") else {
                    self.error(start, self.src.len(), "Unterminated attribute value");
                    self.pos = self.src.len();
                    return None;
                };
                self.pos = value_start + len + 4;
                (value_start, self.pos)
            }
            _ => {
                let value_start = self.pos;
                while self
                    .byte(self.pos)
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                (value_start, self.pos)
            }
        };

        Some(Attribute {
            name,
            value: decode_entities(&self.src[value_start..value_end]),
            source_span: self.span(start, self.pos),
            value_span: Some(self.span(value_start, value_end)),
        })
    }

    fn consume_tag_close(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name_start = self.pos;
        while self.byte(self.pos).is_some_and(|b| !is_name_end(b)) {
            self.pos += 1;
        }
        let name = self.src[name_start..self.pos].to_string();
        self.skip_whitespace();
        if self.starts_with(">") {
            self.pos += 1;
        } else {
            self.error(start, self.pos, format!("Unexpected character \"{}\"", self.describe_current()));
        }

        match self.stack.last_mut() {
            Some(Open::Element(e)) if e.name == name => {
                e.end_source_span = Some(self.file.span(start, self.pos));
                self.pop_container(self.pos);
            }
            _ => self.error(start, self.pos, format!("Unexpected closing tag \"{}\"", name)),
        }
    }

    fn describe_current(&self) -> String {
        self.src[self.pos..]
            .chars()
            .next()
            .map_or_else(|| "EOF".to_string(), String::from)
    }

    fn consume_block_open(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name_start = self.pos;
        while self
            .byte(self.pos)
            .is_some_and(|b| b.is_ascii_alphabetic() || b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        let raw_name = &self.src[name_start..self.pos];
        let name = raw_name.split_whitespace().collect::<Vec<_>>().join(" ");
        let name_span = self.span(start, name_start + raw_name.trim_end().len());

        self.skip_whitespace();
        let mut parameters = SmallVec::new();
        if self.starts_with("(") {
            match self.consume_block_parameters() {
                Some(params) => parameters = params,
                None => return,
            }
            self.skip_whitespace();
        }

        let block = Block {
            name,
            parameters,
            children: Vec::new(),
            source_span: self.span(start, self.pos),
            name_span,
        };
        if self.starts_with("{") {
            self.pos += 1;
            self.stack.push(Open::Block(block));
        } else {
            self.error(start, self.pos, format!("Incomplete block \"@{}\"", block.name));
            self.add_node(Node::Block(block));
        }
    }

    /// Reads `( ... )`, splitting the content on top-level `;`.
    fn consume_block_parameters(&mut self) -> Option<SmallVec<[BlockParameter; 2]>> {
        let open = self.pos;
        self.pos += 1;
        let mut depth = 1usize;
        let mut quote: Option<u8> = None;
        let mut param_start = self.pos;
        let mut params = SmallVec::new();

        while let Some(b) = self.byte(self.pos) {
            if let Some(q) = quote {
                if b == b'\\' {
                    self.pos += 1;
                } else if b == q {
                    quote = None;
                }
                self.pos += 1;
                continue;
            }
            match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.push_parameter(&mut params, param_start, self.pos);
                        self.pos += 1;
                        return Some(params);
                    }
                }
                b';' if depth == 1 => {
                    self.push_parameter(&mut params, param_start, self.pos);
                    param_start = self.pos + 1;
                }
                _ => {}
            }
            self.pos += 1;
        }

        self.pos = self.src.len();
        self.error(open, self.pos, "Unexpected character \"EOF\"");
        None
    }

    fn push_parameter(&self, params: &mut SmallVec<[BlockParameter; 2]>, start: usize, end: usize) {
        let raw = &self.src[start..end];
        let expression = raw.trim();
        if expression.is_empty() {
            return;
        }
        let leading = raw.len() - raw.trim_start().len();
        let span = self.span(start + leading, start + leading + expression.len());
        params.push(BlockParameter::new(expression.to_string(), span));
    }

    fn consume_block_close(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let Some(block_index) = self.stack.iter().rposition(|open| matches!(open, Open::Block(_))) else {
            self.error(start, self.pos, "Unexpected closing block");
            return;
        };
        while self.stack.len() > block_index + 1 {
            if let Some(Open::Element(e)) = self.stack.last() {
                let (element_start, msg) = (e.source_span.start.offset, format!("Unclosed element \"{}\"", e.name));
                self.error(element_start, start, msg);
            }
            self.pop_container(start);
        }
        self.pop_container(self.pos);
    }
}

/// Decode the character references allowed in text and attribute values.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity.strip_prefix('#').and_then(|dec| dec.parse().ok())
                    };
                    code.and_then(char::from_u32)
                }
            };
            ch.map(|ch| (ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
