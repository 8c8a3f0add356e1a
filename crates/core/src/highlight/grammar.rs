//! Per-language pattern tables.
//!
//! Patterns match already-escaped HTML, so quotes appear as `&quot;` and
//! `&#39;`.

pub(crate) struct Grammar {
    pub comments: &'static [&'static str],
    pub strings: &'static [&'static str],
    pub number: &'static str,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Keyword whose following identifier is a function name.
    pub definition_marker: Option<&'static str>,
}

const NUMBER: &str = r"\b(?:0[xX][0-9A-Fa-f]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";

const DOUBLE_QUOTED: &str = r"&quot;(?:\\&quot;|\\[^\n]|[^\\\n])*?&quot;";
const SINGLE_QUOTED: &str = r"&#39;(?:\\&#39;|\\[^\n]|[^\\\n])*?&#39;";

const LINE_COMMENT: &str = r"//[^\n]*";
const BLOCK_COMMENT: &str = r"(?s:/\*.*?\*/)";

pub(crate) static C_FAMILY: Grammar = Grammar {
    comments: &[LINE_COMMENT, BLOCK_COMMENT],
    strings: &[DOUBLE_QUOTED, SINGLE_QUOTED],
    number: NUMBER,
    keywords: &[
        "auto", "break", "case", "catch", "class", "const", "constexpr", "continue",
        "default", "delete", "do", "else", "enum", "extern", "false", "for", "friend",
        "goto", "if", "inline", "namespace", "new", "noexcept", "nullptr", "operator",
        "override", "private", "protected", "public", "register", "return", "sizeof",
        "static", "struct", "switch", "template", "this", "throw", "true", "try",
        "typedef", "typename", "union", "using", "virtual", "volatile", "while",
    ],
    types: &[
        "bool", "char", "double", "float", "int", "int8_t", "int16_t", "int32_t",
        "int64_t", "long", "short", "signed", "size_t", "string", "uint8_t",
        "uint16_t", "uint32_t", "uint64_t", "unsigned", "void", "wchar_t",
    ],
    definition_marker: None,
};

pub(crate) static PYTHON: Grammar = Grammar {
    comments: &[r"#[^\n]*"],
    strings: &[
        r"(?s:&quot;&quot;&quot;.*?&quot;&quot;&quot;)",
        r"(?s:&#39;&#39;&#39;.*?&#39;&#39;&#39;)",
        DOUBLE_QUOTED,
        SINGLE_QUOTED,
    ],
    number: NUMBER,
    keywords: &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break",
        "class", "continue", "def", "del", "elif", "else", "except", "finally", "for",
        "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or",
        "pass", "raise", "return", "try", "while", "with", "yield",
    ],
    types: &[],
    definition_marker: Some("def"),
};

pub(crate) static JAVASCRIPT: Grammar = Grammar {
    comments: &[LINE_COMMENT, BLOCK_COMMENT],
    strings: &[DOUBLE_QUOTED, SINGLE_QUOTED, r"`(?:\\[\s\S]|[^\\`])*`"],
    number: NUMBER,
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue",
        "debugger", "default", "delete", "do", "else", "export", "extends", "false",
        "finally", "for", "function", "if", "import", "in", "instanceof", "let", "new",
        "null", "of", "return", "static", "super", "switch", "this", "throw", "true",
        "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
    ],
    types: &[],
    definition_marker: None,
};
