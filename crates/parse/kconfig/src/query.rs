//! Read-only queries over a finished [`SymbolTable`].

use std::collections::BTreeMap;

use regex::Regex;

use crate::symbol::{RelationField, Symbol};
use crate::table::SymbolTable;

/// Prefix used for symbols in `.config` files and C code.
pub const SYMBOL_PREFIX: &str = "CONFIG_";

/// Any character that cannot be part of a symbol name.
const NOT_WORD: &str = "[^A-Za-z0-9_]";

/// Strips a leading [`SYMBOL_PREFIX`] if present.
#[must_use]
pub fn strip_prefix(name: &str) -> &str {
    name.strip_prefix(SYMBOL_PREFIX).unwrap_or(name)
}

/// Whole-word matcher for a set of candidate strings.
///
/// A candidate matches when it is neither preceded nor followed by a symbol
/// name character. The boundary is taken from the candidate's position in
/// the expression, so operators directly adjacent to a name (`!FOO`,
/// `(FOO||BAR)`) do not prevent a match, and candidates that themselves
/// begin or end with punctuation still match.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    patterns: Vec<Regex>,
}

impl WordMatcher {
    /// Builds a matcher; empty candidates are ignored.
    #[must_use]
    pub fn new<S: AsRef<str>>(candidates: &[S]) -> Self {
        let patterns = candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !c.is_empty())
            .filter_map(|c| {
                let pattern = format!("(?:^|{NOT_WORD}){}(?:$|{NOT_WORD})", regex::escape(c));
                Regex::new(&pattern).ok()
            })
            .collect();
        Self { patterns }
    }

    /// `true` if any candidate occurs in `text` as a whole word.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    /// `true` if the matcher has no usable candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl SymbolTable {
    /// Looks up a symbol by name, with or without the `CONFIG_` prefix.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(strip_prefix(name))
    }

    /// Symbols whose `field` has an entry mentioning any of `candidates` as
    /// a whole word, in name order. Each symbol appears at most once.
    #[must_use]
    pub fn search<S: AsRef<str>>(&self, field: RelationField, candidates: &[S]) -> Vec<&Symbol> {
        let matcher = WordMatcher::new(candidates);
        self.search_with(&[field], &matcher)
    }

    /// Union of [`search`](Self::search) over several fields.
    #[must_use]
    pub fn search_fields<S: AsRef<str>>(&self, fields: &[RelationField], candidates: &[S]) -> Vec<&Symbol> {
        let matcher = WordMatcher::new(candidates);
        self.search_with(fields, &matcher)
    }

    fn search_with(&self, fields: &[RelationField], matcher: &WordMatcher) -> Vec<&Symbol> {
        if matcher.is_empty() {
            return Vec::new();
        }
        let mut hits: BTreeMap<&str, &Symbol> = BTreeMap::new();
        for &field in fields {
            for symbol in self.symbols.values() {
                if hits.contains_key(symbol.name.as_str()) {
                    continue;
                }
                if symbol.relation(field).iter().any(|entry| matcher.matches(entry)) {
                    hits.insert(&symbol.name, symbol);
                }
            }
        }
        hits.into_values().collect()
    }

    /// Symbols that `select` `name`.
    #[must_use]
    pub fn selected_by(&self, name: &str) -> Vec<&Symbol> {
        self.search(RelationField::Select, &[strip_prefix(name)])
    }

    /// Symbols that `imply` `name`.
    #[must_use]
    pub fn implied_by(&self, name: &str) -> Vec<&Symbol> {
        self.search(RelationField::Imply, &[strip_prefix(name)])
    }

    /// Symbols whose `depends on` mentions `name`.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&Symbol> {
        self.search(RelationField::DependsOn, &[strip_prefix(name)])
    }
}
