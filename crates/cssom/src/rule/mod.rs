//! CSS rules and the at-rule dispatcher.
//!
//! Every rule is parsed through a [`BoundedSource`], so a sub-parser sees
//! exactly the tokens of its own rule and the outer parser never needs to
//! know how many tokens that was. After the sub-parser returns, anything it
//! left unconsumed is treated as junk: the rule is dropped and the rest of
//! it is drained, so the outer source always ends up just past the rule.
//!
//! - [`parse_at_rule`]: dispatch on the `@keyword` to a rule-specific parser
//! - [`parse_qualified_rule`]: parse a `selector { declarations }` style rule
//! - [`CssRule`]: a parsed rule with its parent back-references
//!
//! ## Submodules
//!
//! - [`define_color`]: `@define-color name <color>;`
//! - [`import`]: `@import url(...);`
//! - [`keyframes`]: `@keyframes name { ... }`
//! - [`style`]: style rules

pub mod define_color;
pub mod import;
pub mod keyframes;
pub mod style;

pub use define_color::DefineColorRule;
pub use import::ImportRule;
pub use keyframes::{Keyframe, KeyframesRule};
pub use style::StyleRule;

use std::fmt::{self, Write};
use std::rc::{Rc, Weak};

use crate::error::CssError;
use crate::source::{BoundedSource, TokenRole, TokenSource};
use crate::stylesheet::StyleSheet;
use crate::token::{Token, TokenType};

/// The at-rules this parser knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtRuleKind {
    Import,
    DefineColor,
    Keyframes,
}

impl AtRuleKind {
    pub const ALL: [AtRuleKind; 3] = [
        AtRuleKind::Import,
        AtRuleKind::DefineColor,
        AtRuleKind::Keyframes,
    ];

    /// The keyword introducing this rule, without the `@`.
    pub fn keyword(self) -> &'static str {
        match self {
            AtRuleKind::Import => "import",
            AtRuleKind::DefineColor => "define-color",
            AtRuleKind::Keyframes => "keyframes",
        }
    }

    /// Looks up a keyword, ASCII case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<AtRuleKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Runs this rule's parser over the tokens following the keyword.
    fn parse(
        self,
        source: &mut dyn TokenSource,
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
    ) -> Option<CssRule> {
        match self {
            AtRuleKind::Import => ImportRule::parse(source, parent_rule, parent_stylesheet),
            AtRuleKind::DefineColor => {
                DefineColorRule::parse(source, parent_rule, parent_stylesheet)
            }
            AtRuleKind::Keyframes => KeyframesRule::parse(source, parent_rule, parent_stylesheet),
        }
    }
}

/// The rule-specific part of a [`CssRule`].
#[derive(Clone, Debug, PartialEq)]
pub enum RuleKind {
    Import(ImportRule),
    DefineColor(DefineColorRule),
    Keyframes(KeyframesRule),
    Style(StyleRule),
}

impl RuleKind {
    /// The at-rule this is, or `None` for style rules.
    pub fn at_rule_kind(&self) -> Option<AtRuleKind> {
        match self {
            RuleKind::Import(_) => Some(AtRuleKind::Import),
            RuleKind::DefineColor(_) => Some(AtRuleKind::DefineColor),
            RuleKind::Keyframes(_) => Some(AtRuleKind::Keyframes),
            RuleKind::Style(_) => None,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Import(rule) => fmt::Display::fmt(rule, f),
            RuleKind::DefineColor(rule) => fmt::Display::fmt(rule, f),
            RuleKind::Keyframes(rule) => fmt::Display::fmt(rule, f),
            RuleKind::Style(rule) => fmt::Display::fmt(rule, f),
        }
    }
}

/// A parsed rule.
///
/// Rules are immutable. The parent stylesheet is held weakly because the
/// stylesheet owns its rules; the parent rule is held strongly.
#[derive(Debug)]
pub struct CssRule {
    parent_rule: Option<Rc<CssRule>>,
    parent_stylesheet: Weak<StyleSheet>,
    kind: RuleKind,
}

impl CssRule {
    pub(crate) fn new(
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
        kind: RuleKind,
    ) -> Self {
        Self {
            parent_rule: parent_rule.cloned(),
            parent_stylesheet: Rc::downgrade(parent_stylesheet),
            kind,
        }
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// The rule this one is nested in, if any.
    pub fn parent_rule(&self) -> Option<&Rc<CssRule>> {
        self.parent_rule.as_ref()
    }

    /// The stylesheet containing this rule, while it is still alive.
    pub fn parent_stylesheet(&self) -> Option<Rc<StyleSheet>> {
        self.parent_stylesheet.upgrade()
    }

    /// Appends the CSS text of this rule to `string`.
    pub fn print_css_text(&self, string: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(string, "{}", self.kind);
    }

    /// The CSS text of this rule, computed on each call.
    pub fn css_text(&self) -> String {
        let mut string = String::new();
        self.print_css_text(&mut string);
        string
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Parses the at-rule at the front of `source`.
///
/// Whatever happens, `source` is left positioned just after the rule's
/// terminator. Errors are reported through `source` and yield `None`:
///
/// - [`CssError::MalformedRuleStart`] if the rule does not start with an at-keyword
/// - [`CssError::UnknownRuleKeyword`] if no parser handles the keyword
/// - [`CssError::TrailingJunk`] if the rule's parser did not consume the whole rule
///
/// # Examples
///
/// ```rust
/// use cssom::rule::{parse_at_rule, AtRuleKind};
/// use cssom::source::{TokenSource, TokenizerSource};
/// use cssom::token::Token;
/// use cssom::StyleSheet;
///
/// let sheet = StyleSheet::new();
/// let mut source = TokenizerSource::new("@IMPORT url(base.css); next");
///
/// let rule = parse_at_rule(&mut source, None, &sheet).unwrap();
/// assert_eq!(rule.kind().at_rule_kind(), Some(AtRuleKind::Import));
/// assert_eq!(source.get_token(), &Token::Ident("next".into()));
/// ```
pub fn parse_at_rule(
    source: &mut dyn TokenSource,
    parent_rule: Option<&Rc<CssRule>>,
    parent_stylesheet: &Rc<StyleSheet>,
) -> Option<CssRule> {
    let mut at_source = BoundedSource::new(source);

    let keyword = match at_source.get_token() {
        Token::AtKeyword(keyword) => keyword.clone(),
        _ => {
            at_source.emit_error(CssError::MalformedRuleStart);
            at_source.consume_all();
            return None;
        }
    };
    at_source.consume_token_as(TokenRole::Keyword);

    let Some(kind) = AtRuleKind::from_keyword(&keyword) else {
        at_source.emit_error(CssError::UnknownRuleKeyword(keyword));
        at_source.consume_all();
        return None;
    };

    log::debug!("parsing @{} rule", kind.keyword());
    let rule = kind.parse(&mut at_source, parent_rule, parent_stylesheet);
    finish_rule(&mut at_source, rule)
}

/// Parses the style rule at the front of `source`, with the same positioning
/// guarantees as [`parse_at_rule`].
pub fn parse_qualified_rule(
    source: &mut dyn TokenSource,
    parent_rule: Option<&Rc<CssRule>>,
    parent_stylesheet: &Rc<StyleSheet>,
) -> Option<CssRule> {
    let mut rule_source = BoundedSource::new(source);
    let rule = StyleRule::parse(&mut rule_source, parent_rule, parent_stylesheet);
    finish_rule(&mut rule_source, rule)
}

/// Checks that a rule's parser consumed the whole rule, and drains whatever
/// is left so the wrapped source ends up past the rule either way.
fn finish_rule(source: &mut BoundedSource<'_>, rule: Option<CssRule>) -> Option<CssRule> {
    let Some(rule) = rule else {
        source.consume_all();
        return None;
    };

    if !source.get_token().is(TokenType::Eof) {
        source.emit_error(CssError::TrailingJunk);
        source.consume_all();
        return None;
    }
    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TokenizerSource;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(AtRuleKind::from_keyword("import"), Some(AtRuleKind::Import));
        assert_eq!(AtRuleKind::from_keyword("Define-Color"), Some(AtRuleKind::DefineColor));
        assert_eq!(AtRuleKind::from_keyword("KEYFRAMES"), Some(AtRuleKind::Keyframes));
        assert_eq!(AtRuleKind::from_keyword("media"), None);
        assert_eq!(AtRuleKind::from_keyword("imports"), None);
    }

    #[test]
    fn test_keyword_round_trip() {
        for kind in AtRuleKind::ALL {
            assert_eq!(AtRuleKind::from_keyword(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn test_malformed_start_drains_rule() {
        let sheet = StyleSheet::new();
        let mut source = TokenizerSource::new("import url(x); next");

        assert!(parse_at_rule(&mut source, None, &sheet).is_none());
        assert!(matches!(source.diagnostics()[0].error, CssError::MalformedRuleStart));
        assert_eq!(source.get_token(), &Token::Ident("next".into()));
    }

    #[test]
    fn test_failed_sub_parser_still_drains() {
        let sheet = StyleSheet::new();
        let mut source = TokenizerSource::new("@import 42 (a; b); next");

        assert!(parse_at_rule(&mut source, None, &sheet).is_none());
        assert_eq!(source.diagnostics().len(), 1);
        assert_eq!(source.get_token(), &Token::Ident("next".into()));
    }

    #[test]
    fn test_parent_references() {
        let sheet = StyleSheet::new();
        let mut source = TokenizerSource::new("@define-color fg red; @define-color bg blue;");

        let parent = Rc::new(parse_at_rule(&mut source, None, &sheet).unwrap());
        let child = parse_at_rule(&mut source, Some(&parent), &sheet).unwrap();

        assert!(parent.parent_rule().is_none());
        assert!(Rc::ptr_eq(child.parent_rule().unwrap(), &parent));
        assert!(Rc::ptr_eq(&child.parent_stylesheet().unwrap(), &sheet));

        drop(sheet);
        assert!(child.parent_stylesheet().is_none());
    }

    #[test]
    fn test_css_text_is_computed_on_demand() {
        let sheet = StyleSheet::new();
        let mut source = TokenizerSource::new("@define-color   fg   #FF0000 ;");
        let rule = parse_at_rule(&mut source, None, &sheet).unwrap();

        assert_eq!(rule.css_text(), "@define-color fg #ff0000;");
        assert_eq!(rule.css_text(), rule.to_string());

        let mut buffer = String::from("/* prefix */ ");
        rule.print_css_text(&mut buffer);
        assert_eq!(buffer, "/* prefix */ @define-color fg #ff0000;");
    }
}
