//! Stylesheets: the top-level rule list.
//!
//! A [`StyleSheet`] is always handed out as `Rc<StyleSheet>` because the
//! rules it owns point back at it.

use std::cell::{Ref, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::color::{ColorValue, Rgba};
use crate::error::{CssError, Diagnostic};
use crate::rule::{CssRule, RuleKind, parse_at_rule, parse_qualified_rule};
use crate::source::{TokenRole, TokenSource, TokenizerSource};
use crate::token::Token;

/// A parsed stylesheet.
///
/// Parsing never fails: rules that cannot be parsed are skipped and the
/// problems are kept in [`diagnostics`](StyleSheet::diagnostics).
#[derive(Debug, Default)]
pub struct StyleSheet {
    location: Option<PathBuf>,
    rules: RefCell<Vec<Rc<CssRule>>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl StyleSheet {
    /// Creates an empty stylesheet with no location.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates an empty stylesheet loaded from `location`. Relative
    /// `@import` URLs resolve against its directory.
    pub fn with_location(location: impl Into<PathBuf>) -> Rc<Self> {
        Rc::new(Self {
            location: Some(location.into()),
            ..Self::default()
        })
    }

    /// Parses `css` into a new stylesheet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cssom::StyleSheet;
    ///
    /// let sheet = StyleSheet::parse("@define-color accent #3584e4; button { color: @accent; }");
    /// assert_eq!(sheet.rules().len(), 2);
    /// assert!(sheet.diagnostics().is_empty());
    /// ```
    pub fn parse(css: &str) -> Rc<Self> {
        let sheet = Self::new();
        sheet.add_css(css);
        sheet
    }

    /// Reads and parses the stylesheet at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Rc<Self>, CssError> {
        let path = path.as_ref();
        let css = fs::read_to_string(path)?;
        log::debug!("loaded {} bytes from {}", css.len(), path.display());

        let sheet = Self::with_location(path);
        sheet.add_css(&css);
        Ok(sheet)
    }

    /// Parses `css` and appends its rules to this stylesheet.
    pub fn add_css(self: &Rc<Self>, css: &str) {
        let mut source = TokenizerSource::new(css);
        if let Some(location) = &self.location {
            source = source.with_file(location.clone());
        }

        let rules = self.parse_rules(&mut source);
        log::debug!(
            "parsed {} rules with {} diagnostics",
            rules.len(),
            source.diagnostics().len()
        );

        self.rules.borrow_mut().extend(rules.into_iter().map(Rc::new));
        self.diagnostics
            .borrow_mut()
            .extend(source.take_diagnostics());
    }

    fn parse_rules(self: &Rc<Self>, source: &mut dyn TokenSource) -> Vec<CssRule> {
        let mut rules = Vec::new();
        loop {
            let rule = match source.get_token() {
                Token::Eof => break,
                Token::Cdo | Token::Cdc => {
                    source.consume_token_as(TokenRole::Trivia);
                    continue;
                }
                Token::CloseCurly => {
                    source.error("Unexpected '}'");
                    source.consume_token_as(TokenRole::Junk);
                    continue;
                }
                Token::AtKeyword(_) => parse_at_rule(source, None, self),
                _ => parse_qualified_rule(source, None, self),
            };
            rules.extend(rule);
        }
        rules
    }

    /// The file this stylesheet was loaded from.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn rules(&self) -> Ref<'_, [Rc<CssRule>]> {
        Ref::map(self.rules.borrow(), Vec::as_slice)
    }

    /// Errors and warnings reported while parsing, in input order.
    pub fn diagnostics(&self) -> Ref<'_, [Diagnostic]> {
        Ref::map(self.diagnostics.borrow(), Vec::as_slice)
    }

    /// The CSS text of all rules, one per line.
    pub fn css_text(&self) -> String {
        let mut text = String::new();
        for rule in self.rules().iter() {
            if !text.is_empty() {
                text.push('\n');
            }
            rule.print_css_text(&mut text);
        }
        text
    }

    /// The color most recently defined as `name` by `@define-color`, unresolved.
    pub fn color_definition(&self, name: &str) -> Option<ColorValue> {
        self.rules().iter().rev().find_map(|rule| match rule.kind() {
            RuleKind::DefineColor(define) if define.name == name => Some(define.color.clone()),
            _ => None,
        })
    }

    /// Resolves the color defined as `name`, following `@references` to other
    /// defined colors.
    ///
    /// Returns `None` if the color or anything it refers to is undefined, or
    /// if the references form a cycle.
    pub fn lookup_color(&self, name: &str) -> Option<Rgba> {
        let color = self.color_definition(name)?;
        color.resolve(&|name| self.color_definition(name))
    }
}
