//! Link extraction from document content.
//!
//! The builder never looks at link syntax itself. It asks a [`LinkParser`]
//! for the names a document refers to and resolves those names against the
//! document set.

use regex::Regex;
use std::sync::OnceLock;

/// Turns document content into the list of referenced document names.
pub trait LinkParser: Send + Sync {
    /// Returns target names in order of appearance. Duplicates are kept.
    fn parse_links(&self, content: &str) -> Vec<String>;
}

impl<F> LinkParser for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn parse_links(&self, content: &str) -> Vec<String> {
        self(content)
    }
}

/// Parses `[[Target]]`, `[[Target|alias]]` and `[[Target#heading]]` links.
#[derive(Debug, Default, Clone, Copy)]
pub struct WikiLinkParser;

impl WikiLinkParser {
    pub fn new() -> Self {
        Self
    }
}

fn wiki_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Target stops at the first '|', '#' or closing bracket.
    PATTERN.get_or_init(|| {
        Regex::new(r"\[\[([^\[\]|#]*)(?:[#|][^\[\]]*)?\]\]").expect("valid wiki link pattern")
    })
}

impl LinkParser for WikiLinkParser {
    fn parse_links(&self, content: &str) -> Vec<String> {
        wiki_link_pattern()
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|target| !target.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_aliased_links() {
        let parser = WikiLinkParser::new();
        let links = parser.parse_links("[[Alpha]] then [[ Beta | the beta ]] and [[Gamma#Intro]]");
        assert_eq!(links, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_duplicates_kept_and_empty_dropped() {
        let parser = WikiLinkParser::new();
        let links = parser.parse_links("[[A]] [[A]] [[]] [[ ]] [[#only-heading]]");
        assert_eq!(links, vec!["A", "A"]);
    }

    #[test]
    fn test_no_links() {
        let parser = WikiLinkParser::new();
        assert!(parser.parse_links("plain text with [single] brackets").is_empty());
    }

    #[test]
    fn test_closure_parser() {
        let parser = |content: &str| -> Vec<String> {
            content.split_whitespace().map(str::to_string).collect()
        };
        assert_eq!(parser.parse_links("a b"), vec!["a", "b"]);
    }
}
