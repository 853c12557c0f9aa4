use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::rule::{CssRule, RuleKind};
use crate::source::{TokenRole, TokenSource};
use crate::stylesheet::StyleSheet;
use crate::token::{Token, TokenType, write_string};

/// `@import url(...);`
#[derive(Clone, Debug, PartialEq)]
pub struct ImportRule {
    pub url: String,
    resolved_path: Option<PathBuf>,
}

impl ImportRule {
    pub(crate) fn parse(
        source: &mut dyn TokenSource,
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
    ) -> Option<CssRule> {
        let Some(url) = parse_url(source) else {
            source.consume_all();
            return None;
        };
        source.consume_if(TokenType::Semicolon, TokenRole::Punctuation);

        let resolved_path = resolve(&url, parent_stylesheet.location());
        let rule = ImportRule { url, resolved_path };
        Some(CssRule::new(parent_rule, parent_stylesheet, RuleKind::Import(rule)))
    }

    /// The imported file, with relative URLs resolved against the directory
    /// of the importing stylesheet. `None` for URLs with a non-file scheme.
    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved_path.as_deref()
    }
}

fn parse_url(source: &mut dyn TokenSource) -> Option<String> {
    let token = source.get_token().clone();
    match token {
        Token::Url(url) | Token::String(url) => {
            source.consume_token_as(TokenRole::Url);
            Some(url)
        }
        _ if token.is_function("url") => {
            source.consume_token_as(TokenRole::Url);
            let url = match source.get_token() {
                Token::String(url) => url.clone(),
                _ => {
                    source.error("Expected a string inside url()");
                    return None;
                }
            };
            source.consume_token_as(TokenRole::Url);
            if !source.consume_if(TokenType::CloseParens, TokenRole::Url) {
                source.error("Expected ')' at end of url()");
                return None;
            }
            Some(url)
        }
        _ => {
            source.error("Expected a URL");
            None
        }
    }
}

fn resolve(url: &str, base: Option<&Path>) -> Option<PathBuf> {
    let path = match url.split_once("://") {
        Some(("file", path)) => Path::new(path),
        Some(_) => return None,
        None => Path::new(url),
    };

    match base.and_then(Path::parent) {
        Some(dir) if path.is_relative() => Some(dir.join(path)),
        _ => Some(path.to_path_buf()),
    }
}

impl fmt::Display for ImportRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@import url(")?;
        write_string(f, &self.url)?;
        f.write_str(");")
    }
}
