//! Template text preprocessing
//!
//! Component templates are authored with a JSX flavoured shorthand. The
//! helpers here turn that shorthand into Angular template syntax, and hide
//! control-flow block headers from the TSX parser before the file is parsed.

use once_cell::sync::Lazy;
use regex::Regex;

static EVENT_BINDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"on:([a-z]+)=\{([^}]+)\}").unwrap());
static STYLE_BINDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"style:([\w-]+)=\{([^}]+)\}").unwrap());
static INTERPOLATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}\n]+)\}").unwrap());

/// Rewrites the micro-syntax of a sliced template into Angular syntax:
///
/// * `on:event={expr}` becomes `(event)="expr"`
/// * `style:prop={expr}` becomes `[style.prop]="expr"`
/// * `{expr}` becomes `{{expr}}`
///
/// Expressions containing braces are not supported.
pub fn preprocess(raw: &str) -> String {
    let text = EVENT_BINDING.replace_all(raw, "($1)=\"$2\"");
    let text = STYLE_BINDING.replace_all(&text, "[style.$1]=\"$2\"");
    INTERPOLATION.replace_all(&text, "{{$1}}").into_owned()
}

const BLOCK_KEYWORDS: [&str; 3] = ["if", "else", "defer"];

/// Words after which a `<` or `/` starts an expression rather than
/// continuing one.
const EXPRESSION_KEYWORDS: [&str; 13] = [
    "return", "yield", "await", "case", "default", "throw", "typeof", "void", "delete", "in", "of", "else", "do",
];

/// Lexical context of the shield scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Script code. `depth` counts the braces opened in this frame.
    Code { depth: usize },
    /// Between the backticks of a template literal.
    TemplateLiteral,
    /// Inside `<tag ...>` or `</tag>`.
    Tag { closing: bool },
    /// Children of a JSX element.
    Children,
    /// Children of a control-flow block.
    Block,
}

/// Blanks out control-flow block headers (`@if (...) {`, `@else if (...) {`,
/// `@else {`, `@defer (...) {`) and their closing braces so the TSX parser
/// accepts the surrounding JSX.
///
/// Only JSX children are touched. Strings, template literals, regular
/// expressions and comments in script code are skipped, so the same text
/// there keeps its meaning.
///
/// Every blanked byte becomes a space except line breaks, so the result has
/// the same length and line layout as `source` and spans computed on it can
/// be used to slice `source`.
pub fn shield_blocks(source: &str) -> String {
    let mut shield = Shield {
        bytes: source.as_bytes(),
        out: source.as_bytes().to_vec(),
        stack: vec![Frame::Code { depth: 0 }],
        prev: None,
    };
    let mut i = 0;
    while i < shield.bytes.len() {
        i = match shield.top() {
            Frame::Code { depth } => shield.code(i, depth),
            Frame::TemplateLiteral => shield.template_literal(i),
            Frame::Tag { closing } => shield.tag(i, closing),
            Frame::Children | Frame::Block => shield.children(i),
        };
    }

    String::from_utf8(shield.out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

struct Shield<'s> {
    bytes: &'s [u8],
    out: Vec<u8>,
    stack: Vec<Frame>,
    /// Last significant byte of script code.
    prev: Option<usize>,
}

impl Shield<'_> {
    fn top(&self) -> Frame {
        self.stack.last().copied().unwrap_or(Frame::Code { depth: 0 })
    }

    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.stack.last_mut() {
            *top = frame;
        }
    }

    /// Pops a frame, keeping the root code frame.
    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn code(&mut self, i: usize, depth: usize) -> usize {
        let bytes = self.bytes;
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b'"' | b'\'' => {
                let end = skip_string(bytes, i);
                self.prev = Some(end - 1);
                return end;
            }
            b'`' => {
                self.stack.push(Frame::TemplateLiteral);
                return i + 1;
            }
            b'/' if next == Some(b'/') => return skip_line(bytes, i),
            b'/' if next == Some(b'*') => return skip_block_comment(bytes, i),
            b'/' if expression_may_start(bytes, self.prev) => {
                let end = skip_regex(bytes, i);
                self.prev = Some(end - 1);
                return end;
            }
            b'<' if expression_may_start(bytes, self.prev) && starts_jsx(bytes, i + 1) => {
                self.stack.push(Frame::Tag { closing: false });
                return i + 1;
            }
            b'{' => self.set_top(Frame::Code { depth: depth + 1 }),
            b'}' if depth == 0 => self.pop(),
            b'}' => self.set_top(Frame::Code { depth: depth - 1 }),
            _ => {}
        }
        if !bytes[i].is_ascii_whitespace() {
            self.prev = Some(i);
        }
        i + 1
    }

    fn template_literal(&mut self, i: usize) -> usize {
        match self.bytes[i] {
            b'\\' => i + 2,
            b'`' => {
                self.stack.pop();
                self.prev = Some(i);
                i + 1
            }
            b'$' if self.bytes.get(i + 1) == Some(&b'{') => {
                self.stack.push(Frame::Code { depth: 0 });
                self.prev = Some(i + 1);
                i + 2
            }
            _ => i + 1,
        }
    }

    fn tag(&mut self, i: usize, closing: bool) -> usize {
        match self.bytes[i] {
            quote @ (b'"' | b'\'') => self.bytes[i + 1..]
                .iter()
                .position(|b| *b == quote)
                .map_or(self.bytes.len(), |offset| i + offset + 2),
            b'{' => {
                self.stack.push(Frame::Code { depth: 0 });
                self.prev = Some(i);
                i + 1
            }
            b'/' if self.bytes.get(i + 1) == Some(&b'>') => {
                self.stack.pop();
                self.element_closed(i + 1);
                i + 2
            }
            b'>' => {
                self.stack.pop();
                if closing {
                    while self.top() == Frame::Block {
                        self.stack.pop();
                    }
                    if self.top() == Frame::Children {
                        self.stack.pop();
                    }
                    self.element_closed(i);
                } else {
                    self.stack.push(Frame::Children);
                }
                i + 1
            }
            _ => i + 1,
        }
    }

    /// Records the `>` ending an element when that element sits in code.
    fn element_closed(&mut self, at: usize) {
        if matches!(self.top(), Frame::Code { .. }) {
            self.prev = Some(at);
        }
    }

    fn children(&mut self, i: usize) -> usize {
        match self.bytes[i] {
            b'<' if self.bytes.get(i + 1) == Some(&b'/') => {
                self.stack.push(Frame::Tag { closing: true });
                i + 2
            }
            b'<' => {
                self.stack.push(Frame::Tag { closing: false });
                i + 1
            }
            b'{' => {
                self.stack.push(Frame::Code { depth: 0 });
                self.prev = Some(i);
                i + 1
            }
            b'@' if starts_block(self.bytes, i) => match block_header_end(self.bytes, i) {
                Some(open) => {
                    blank(&mut self.out, i, open + 1);
                    self.stack.push(Frame::Block);
                    open + 1
                }
                None => i + 1,
            },
            b'}' if self.top() == Frame::Block => {
                self.out[i] = b' ';
                self.stack.pop();
                i + 1
            }
            _ => i + 1,
        }
    }
}

/// Whether a `<` or `/` after the code byte at `prev` begins an operand.
fn expression_may_start(bytes: &[u8], prev: Option<usize>) -> bool {
    let Some(at) = prev else {
        return true;
    };
    if is_identifier_byte(bytes[at]) {
        let start = bytes[..at].iter().rposition(|b| !is_identifier_byte(*b)).map_or(0, |p| p + 1);
        let word = &bytes[start..=at];
        return EXPRESSION_KEYWORDS.iter().any(|keyword| keyword.as_bytes() == word);
    }
    !matches!(bytes[at], b')' | b']' | b'"' | b'\'' | b'`')
}

fn starts_jsx(bytes: &[u8], at: usize) -> bool {
    bytes.get(at).is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'_' | b'$' | b'>'))
}

/// End of the quoted string starting at `at`. Unterminated strings stop at
/// the line break.
fn skip_string(bytes: &[u8], at: usize) -> usize {
    let quote = bytes[at];
    let mut i = at + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_regex(bytes: &[u8], at: usize) -> usize {
    let mut in_class = false;
    let mut i = at + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => return i + 1,
            b'\n' => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn skip_line(bytes: &[u8], at: usize) -> usize {
    bytes[at..].iter().position(|b| *b == b'\n').map_or(bytes.len(), |offset| at + offset)
}

fn skip_block_comment(bytes: &[u8], at: usize) -> usize {
    bytes[at + 2..]
        .windows(2)
        .position(|pair| pair == b"*/")
        .map_or(bytes.len(), |offset| at + 2 + offset + 2)
}

fn starts_block(bytes: &[u8], at: usize) -> bool {
    let preceded_ok = at == 0 || matches!(bytes[at - 1], b'>' | b'}') || bytes[at - 1].is_ascii_whitespace();
    preceded_ok && keyword_at(bytes, at + 1).is_some()
}

fn keyword_at(bytes: &[u8], at: usize) -> Option<&'static str> {
    BLOCK_KEYWORDS.into_iter().find(|keyword| {
        let end = at + keyword.len();
        bytes.get(at..end) == Some(keyword.as_bytes())
            && bytes.get(end).map_or(true, |b| !is_identifier_byte(*b))
    })
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Offset of the `{` opening the block that starts at `at`, or `None` when
/// the text does not form a complete block header.
fn block_header_end(bytes: &[u8], at: usize) -> Option<usize> {
    let keyword = keyword_at(bytes, at + 1)?;
    let mut i = skip_whitespace(bytes, at + 1 + keyword.len());
    let mut requires_condition = keyword == "if";
    if keyword == "else" && keyword_at(bytes, i) == Some("if") {
        i = skip_whitespace(bytes, i + 2);
        requires_condition = true;
    }
    if bytes.get(i) == Some(&b'(') {
        i = skip_whitespace(bytes, matching_paren(bytes, i)? + 1);
    } else if requires_condition {
        return None;
    }

    (bytes.get(i) == Some(&b'{')).then_some(i)
}

fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, b) in bytes[open..].iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

fn blank(out: &mut [u8], start: usize, end: usize) {
    for b in &mut out[start..end] {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_rewrite_event_bindings() {
        assert_eq!(preprocess("<button on:click={inc()}>+</button>"), "<button (click)=\"inc()\">+</button>");
    }

    #[test]
    fn should_rewrite_style_bindings() {
        assert_eq!(
            preprocess("<h1 style:font-size={size() + 'px'}></h1>"),
            "<h1 [style.font-size]=\"size() + 'px'\"></h1>"
        );
    }

    #[test]
    fn should_rewrite_interpolations() {
        assert_eq!(preprocess("<h1>{count()}</h1>"), "<h1>{{count()}}</h1>");
    }

    #[test]
    fn should_apply_rules_in_order() {
        assert_eq!(
            preprocess("<p on:click={go()} style:color={c()}>{label}</p>"),
            "<p (click)=\"go()\" [style.color]=\"c()\">{{label}}</p>"
        );
    }

    #[test]
    fn should_not_join_braces_across_lines() {
        let text = "@if (a) {\n  <p>x</p>\n}";
        assert_eq!(preprocess(text), text);
    }

    #[test]
    fn should_blank_if_block_and_keep_layout() {
        let source = "<div>\n  @if (a < b) {\n    <p>{a}</p>\n  }\n</div>";
        let shielded = shield_blocks(source);
        assert_eq!(shielded.len(), source.len());
        assert_eq!(shielded, "<div>\n               \n    <p>{a}</p>\n   \n</div>");
    }

    #[test]
    fn should_blank_else_chains() {
        let source = "<div>@if (a) {<p/>} @else if (b) {<em/>} @else {<i/>}</div>";
        let shielded = shield_blocks(source);
        assert_eq!(shielded.len(), source.len());
        assert!(!shielded.contains('@'));
        assert!(!shielded.contains('{'));
        assert!(shielded.contains("<p/>"));
        assert!(shielded.contains("<em/>"));
        assert!(shielded.contains("<i/>"));
    }

    #[test]
    fn should_blank_defer_blocks() {
        let source = "<div>\n@defer {\n<p>{x}</p>\n}\n</div>";
        assert_eq!(shield_blocks(source), "<div>\n        \n<p>{x}</p>\n \n</div>");
    }

    #[test]
    fn should_leave_decorators_and_emails_alone() {
        let source = "@Component({}) class A {}\nconst mail = 'me@if.dev';";
        assert_eq!(shield_blocks(source), source);
    }

    #[test]
    fn should_keep_multibyte_text_aligned() {
        let source = "<p>\n@if (name() === 'é') {\n<b>é</b>\n}\n</p>";
        let shielded = shield_blocks(source);
        assert_eq!(shielded.len(), source.len());
        assert!(shielded.contains("<b>é</b>"));
    }

    #[test]
    fn should_leave_block_syntax_in_script_strings_and_comments() {
        let source = "const s = \" @if (x) {\";\n// contact me @if (x) { foo\n/* @defer { */\nconst t = `@else {`;\nexport function A() { return <div>x</div>; }";
        assert_eq!(shield_blocks(source), source);
    }

    #[test]
    fn should_shield_blocks_but_not_strings_in_the_same_file() {
        let source = "const s = '@if (a) {';\nfunction A() {\n  return <div>\n@if (a) {\n<p/>\n}\n</div>;\n}";
        let shielded = shield_blocks(source);
        assert!(shielded.starts_with("const s = '@if (a) {';"), "{}", shielded);
        assert!(shielded.contains("<div>\n         \n<p/>\n \n</div>;\n}"), "{}", shielded);
    }

    #[test]
    fn should_treat_quotes_in_jsx_text_as_text() {
        let source = "function A() { return <p>don't\n@if (a) {\n<b/>\n}\n</p>; }";
        assert!(!shield_blocks(source).contains('@'));
    }

    #[test]
    fn should_not_mistake_comparisons_and_division_for_jsx_or_regex() {
        let source = "const x = a < b ? c / d : e;\nconst y = ' @if (z) {';\nfunction A() { return <i>\n@if (a) {\n<b/>\n}\n</i>; }";
        let shielded = shield_blocks(source);
        assert!(shielded.contains("' @if (z) {'"), "{}", shielded);
        assert_eq!(shielded.matches('@').count(), 1);
    }

    #[test]
    fn should_shield_blocks_inside_nested_expression_containers() {
        let source = "const v = <ul>{show && <li>\n@if (a) {\n<b/>\n}\n</li>}</ul>;";
        let shielded = shield_blocks(source);
        assert_eq!(shielded.len(), source.len());
        assert!(!shielded.contains('@'));
        assert!(shielded.ends_with("</li>}</ul>;"), "{}", shielded);
    }
}
