//! Regex-driven syntax highlighting for rendered code blocks.
//!
//! Every supported language is described by a [`grammar::Grammar`] table. A
//! table compiles into one scanner regex whose alternatives are ordered
//! comment, string, entity, number, keyword, type, identifier. The regex
//! engine picks the leftmost match and, at equal positions, the earliest
//! alternative, so a keyword inside a comment or string is never reached and
//! spans can never overlap or nest.
//!
//! Input and output are HTML-escaped text. Highlighting only inserts `<span>`
//! tags; the visible text is unchanged.

mod grammar;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use grammar::Grammar;

/// Classification of a highlighted substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightToken {
    Comment,
    String,
    Number,
    Keyword,
    Type,
    FunctionName,
    Plain,
}

impl HighlightToken {
    /// CSS class of the wrapping span, `None` for plain text.
    pub fn class(self) -> Option<&'static str> {
        match self {
            HighlightToken::Comment => Some("hl-comment"),
            HighlightToken::String => Some("hl-string"),
            HighlightToken::Number => Some("hl-number"),
            HighlightToken::Keyword => Some("hl-keyword"),
            HighlightToken::Type => Some("hl-type"),
            HighlightToken::FunctionName => Some("hl-function"),
            HighlightToken::Plain => None,
        }
    }
}

/// A classified byte range of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: HighlightToken,
    pub range: Range<usize>,
}

/// Languages with a highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CFamily,
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::CFamily, Language::Python, Language::JavaScript];

    /// Resolves a fence tag such as `js` or `cpp`. Case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|language| {
            language
                .tags()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(tag))
        })
    }

    /// Resolves the first `language-*` entry of an HTML class attribute.
    pub fn from_class_attr(class: &str) -> Option<Self> {
        class
            .split_ascii_whitespace()
            .find_map(|name| name.strip_prefix("language-"))
            .and_then(Language::from_tag)
    }

    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Language::CFamily => &["c", "cpp", "c++"],
            Language::Python => &["python"],
            Language::JavaScript => &["js", "javascript"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::CFamily => "C family",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
        }
    }

    fn scanner(self) -> &'static Scanner {
        static C_FAMILY: LazyLock<Scanner> =
            LazyLock::new(|| Scanner::compile(&grammar::C_FAMILY));
        static PYTHON: LazyLock<Scanner> = LazyLock::new(|| Scanner::compile(&grammar::PYTHON));
        static JAVASCRIPT: LazyLock<Scanner> =
            LazyLock::new(|| Scanner::compile(&grammar::JAVASCRIPT));

        match self {
            Language::CFamily => &*C_FAMILY,
            Language::Python => &*PYTHON,
            Language::JavaScript => &*JAVASCRIPT,
        }
    }

    /// Classified, non-plain tokens of `escaped`, in source order.
    pub fn tokenize(self, escaped: &str) -> Vec<Token> {
        self.scanner().tokenize(escaped)
    }

    /// Wraps every classified token of `escaped` in a span.
    pub fn highlight(self, escaped: &str) -> String {
        let tokens = self.tokenize(escaped);
        let mut out = String::with_capacity(escaped.len() + tokens.len() * 32);
        let mut last = 0;

        for token in tokens {
            out.push_str(&escaped[last..token.range.start]);
            let text = &escaped[token.range.clone()];
            match token.kind.class() {
                Some(class) => {
                    out.push_str("<span class=\"");
                    out.push_str(class);
                    out.push_str("\">");
                    out.push_str(text);
                    out.push_str("</span>");
                }
                None => out.push_str(text),
            }
            last = token.range.end;
        }

        out.push_str(&escaped[last..]);
        out
    }
}

/// Highlights `escaped` as the language named by `tag`.
///
/// Returns `None` when the tag has no highlighter; callers leave such code
/// untouched.
pub fn highlight_code(tag: &str, escaped: &str) -> Option<String> {
    Language::from_tag(tag).map(|language| language.highlight(escaped))
}

/// Capture groups in priority order, with the token each one yields.
const GROUPS: [(&str, HighlightToken); 7] = [
    ("comment", HighlightToken::Comment),
    ("string", HighlightToken::String),
    ("entity", HighlightToken::Plain),
    ("number", HighlightToken::Number),
    ("keyword", HighlightToken::Keyword),
    ("type", HighlightToken::Type),
    ("ident", HighlightToken::Plain),
];

const ENTITY: &str = r"&(?:amp|lt|gt|quot|#39);";
const IDENT: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";

struct Scanner {
    pattern: Regex,
    definition_marker: Option<&'static str>,
}

impl Scanner {
    fn compile(grammar: &Grammar) -> Self {
        let groups = [
            ("comment", grammar.comments.join("|")),
            ("string", grammar.strings.join("|")),
            ("entity", ENTITY.to_owned()),
            ("number", grammar.number.to_owned()),
            ("keyword", word_list(grammar.keywords)),
            ("type", word_list(grammar.types)),
            ("ident", IDENT.to_owned()),
        ];

        let source = groups
            .iter()
            .filter(|(_, body)| !body.is_empty())
            .map(|(name, body)| format!("(?P<{name}>{body})"))
            .collect::<Vec<_>>()
            .join("|");

        Scanner {
            pattern: Regex::new(&source).unwrap(),
            definition_marker: grammar.definition_marker,
        }
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut after_marker = false;
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some((kind, found)) = GROUPS
                .iter()
                .find_map(|(name, kind)| caps.name(name).map(|found| (*kind, found)))
            else {
                continue;
            };

            if !text[last..found.start()].trim().is_empty() {
                after_marker = false;
            }
            last = found.end();

            let kind = match kind {
                HighlightToken::Plain if after_marker && caps.name("ident").is_some() => {
                    HighlightToken::FunctionName
                }
                other => other,
            };
            after_marker = kind == HighlightToken::Keyword
                && self.definition_marker == Some(found.as_str());

            if kind != HighlightToken::Plain {
                tokens.push(Token {
                    kind,
                    range: found.range(),
                });
            }
        }

        tokens
    }
}

fn word_list(words: &[&str]) -> String {
    if words.is_empty() {
        return String::new();
    }

    let alternatives: Vec<String> = words.iter().map(|word| regex::escape(word)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}
