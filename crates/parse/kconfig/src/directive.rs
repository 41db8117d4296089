//! Line classification for Kconfig source.
//!
//! Each logical line is matched against an ordered table of patterns; the
//! first matching rule decides the [`Directive`]. The recognizer knows
//! nothing about parse state: whether a `depends on` belongs to a symbol,
//! a menu or a choice is decided by the parser's dispatch.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::symbol::{DefaultKind, TypeKind};

/// How a `source`-family directive resolves its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceKind {
    /// `osource` / `orsource`: a missing file is skipped.
    pub optional: bool,
    /// `rsource` / `orsource`: path is relative to the including file.
    pub relative: bool,
}

/// A classified logical line, borrowing its captures from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// `# ...`
    Comment,
    /// Macro-language variable assignment (`FOO := ...`).
    Assignment,
    /// Bare macro call (`$(warning ...)`).
    MacroCall,
    /// `source "path"` and its relative/optional variants.
    Source {
        /// Which `source` variant.
        kind: SourceKind,
        /// Path as written, before `$(SRCARCH)` substitution.
        path: &'a str,
        /// The line had leading whitespace, which is unusual for `source`.
        indented: bool,
    },
    /// `if <cond>`.
    If(&'a str),
    /// `endif`, with any trailing comment.
    EndIf,
    /// `comment "text"`: a visible note, not a symbol.
    CommentBlock(&'a str),
    /// `menu "title"`, title unquoted.
    Menu(&'a str),
    /// `mainmenu "title"`: a menu that is never closed.
    MainMenu(&'a str),
    /// `endmenu`.
    EndMenu,
    /// `choice`, optionally named.
    Choice(Option<&'a str>),
    /// `endchoice`.
    EndChoice,
    /// `config NAME` or `menuconfig NAME`.
    Config {
        /// Symbol name without the `CONFIG_` prefix.
        name: &'a str,
        /// Declared with `menuconfig`.
        menuconfig: bool,
    },
    /// `depends on <expr>`.
    DependsOn(&'a str),
    /// `visible if <expr>`, meaningful inside a menu.
    VisibleIf(&'a str),
    /// `select <expr>`.
    Select(&'a str),
    /// A type keyword line such as `bool "Prompt" if FOO`.
    Type {
        /// The type keyword.
        kind: TypeKind,
        /// Verbatim text after the keyword.
        rest: Option<&'a str>,
    },
    /// `default`, `def_bool` or `def_tristate` with its expression.
    Default {
        /// Which default keyword.
        kind: DefaultKind,
        /// Verbatim value expression.
        expr: &'a str,
    },
    /// `range <lo> <hi> [if <expr>]`.
    Range(&'a str),
    /// `option ...`.
    Option(&'a str),
    /// `imply <expr>`.
    Imply(&'a str),
    /// `prompt ...`, verbatim.
    Prompt(&'a str),
    /// `help` or `---help---`.
    Help,
    /// `optional` inside a choice.
    Optional,
    /// Non-blank line matching no rule.
    Unknown,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Comment,
    Assignment,
    MacroCall,
    Source,
    If,
    EndIf,
    CommentBlock,
    MainMenu,
    Menu,
    EndMenu,
    Choice,
    EndChoice,
    Config,
    DependsOn,
    VisibleIf,
    Select,
    Type,
    Default,
    Range,
    Option,
    Imply,
    Prompt,
    Help,
    Optional,
}

/// Recognition rules, tried in order.
///
/// Structural rules come before property rules; `menu\s` cannot match
/// `menuconfig`, and the assignment rule requires the operator right after
/// the identifier so property lines such as `default FOO=y` are not taken
/// for assignments.
const RULES: &[(Rule, &str)] = &[
    (Rule::Comment, r"^\s*#"),
    (Rule::Assignment, r"^\s*[A-Za-z_][A-Za-z0-9_-]*\s*(?::=|\+=|\?=|=)"),
    (Rule::MacroCall, r"^\s*\$\(.*\)\s*$"),
    (Rule::Source, r#"^(\s*)(o?r?)source\s+"?([^"]+?)"?\s*$"#),
    (Rule::If, r"^\s*if\s+(.+)$"),
    (Rule::EndIf, r"^\s*endif\b"),
    (Rule::CommentBlock, r"^\s*comment\s+(.+)$"),
    (Rule::MainMenu, r"^\s*mainmenu\s+(.+)$"),
    (Rule::Menu, r"^\s*menu\s+(.+)$"),
    (Rule::EndMenu, r"^\s*endmenu\b"),
    (Rule::Choice, r"^\s*choice(?:\s+([A-Za-z0-9_]+))?\s*$"),
    (Rule::EndChoice, r"^\s*endchoice\b"),
    (
        Rule::Config,
        r"^\s*(menu)?config\s+([A-Za-z0-9_]*[A-Z0-9][A-Za-z0-9_]*)\s*$",
    ),
    (Rule::DependsOn, r"^\s*depends\s+on\s+(.+)$"),
    (Rule::VisibleIf, r"^\s*visible\s+if\s+(.+)$"),
    (Rule::Select, r"^\s*select\s+(.+)$"),
    (Rule::Type, r"^\s*(bool|tristate|string|int|hex)(?:\s+(.+))?$"),
    (Rule::Default, r"^\s*(default|def_bool|def_tristate)\s+(.+)$"),
    (Rule::Range, r"^\s*range\s+(.+)$"),
    (Rule::Option, r"^\s*option\s+(.+)$"),
    (Rule::Imply, r"^\s*imply\s+(.+)$"),
    (Rule::Prompt, r"^\s*prompt\s+(.+)$"),
    (Rule::Help, r"^\s*(?:---)?help(?:---)?\s*$"),
    (Rule::Optional, r"^\s*optional\s*$"),
];

static COMPILED: Lazy<Vec<(Rule, Regex)>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|&(rule, pattern)| (rule, Regex::new(pattern).unwrap()))
        .collect()
});

/// Classifies one logical line.
#[must_use]
pub fn recognize(line: &str) -> Directive<'_> {
    if line.trim().is_empty() {
        return Directive::Blank;
    }
    COMPILED
        .iter()
        .find_map(|(rule, re)| re.captures(line).map(|caps| build(*rule, &caps)))
        .unwrap_or(Directive::Unknown)
}

fn build<'a>(rule: Rule, caps: &Captures<'a>) -> Directive<'a> {
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim_end());
    let text = |i: usize| group(i).unwrap_or_default();

    match rule {
        Rule::Comment => Directive::Comment,
        Rule::Assignment => Directive::Assignment,
        Rule::MacroCall => Directive::MacroCall,
        Rule::Source => {
            let prefix = text(2);
            Directive::Source {
                kind: SourceKind {
                    optional: prefix.starts_with('o'),
                    relative: prefix.ends_with('r'),
                },
                path: text(3),
                indented: !caps.get(1).is_some_and(|m| m.as_str().is_empty()),
            }
        }
        Rule::If => Directive::If(text(1)),
        Rule::EndIf => Directive::EndIf,
        Rule::CommentBlock => Directive::CommentBlock(unquote(text(1))),
        Rule::MainMenu => Directive::MainMenu(unquote(text(1))),
        Rule::Menu => Directive::Menu(unquote(text(1))),
        Rule::EndMenu => Directive::EndMenu,
        Rule::Choice => Directive::Choice(group(1)),
        Rule::EndChoice => Directive::EndChoice,
        Rule::Config => Directive::Config {
            name: text(2),
            menuconfig: caps.get(1).is_some(),
        },
        Rule::DependsOn => Directive::DependsOn(text(1)),
        Rule::VisibleIf => Directive::VisibleIf(text(1)),
        Rule::Select => Directive::Select(text(1)),
        Rule::Type => match TypeKind::from_keyword(text(1)) {
            Some(kind) => Directive::Type {
                kind,
                rest: group(2),
            },
            None => Directive::Unknown,
        },
        Rule::Default => match DefaultKind::from_keyword(text(1)) {
            Some(kind) => Directive::Default {
                kind,
                expr: text(2),
            },
            None => Directive::Unknown,
        },
        Rule::Range => Directive::Range(text(1)),
        Rule::Option => Directive::Option(text(1)),
        Rule::Imply => Directive::Imply(text(1)),
        Rule::Prompt => Directive::Prompt(text(1)),
        Rule::Help => Directive::Help,
        Rule::Optional => Directive::Optional,
    }
}

/// Returns the text between the first pair of double quotes, or the whole
/// input when it is not quoted.
#[must_use]
pub fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .map_or(text, |inner| inner.split_once('"').map_or(inner, |(body, _)| body))
}
