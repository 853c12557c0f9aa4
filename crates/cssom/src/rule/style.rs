use std::fmt;
use std::rc::Rc;

use crate::declaration::{Declaration, parse_declaration_block};
use crate::rule::{CssRule, RuleKind};
use crate::source::{TokenRole, TokenSource};
use crate::stylesheet::StyleSheet;
use crate::token::{TokenType, serialize_tokens};

/// `selector { declarations }`
///
/// The selector is kept as normalized text; matching it against a tree is
/// up to the consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub(crate) fn parse(
        source: &mut dyn TokenSource,
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
    ) -> Option<CssRule> {
        let mut prelude = Vec::new();
        loop {
            let token = source.peek_token();
            match token.token_type() {
                TokenType::OpenCurly => break,
                TokenType::Eof => {
                    source.error("Expected '{' after selector");
                    return None;
                }
                _ => {
                    prelude.push(token.clone());
                    source.consume_token_as(TokenRole::Selector);
                }
            }
        }

        let selector = serialize_tokens(&prelude);
        if selector.is_empty() {
            source.error("Expected a selector");
            source.consume_all();
            return None;
        }

        let declarations = parse_declaration_block(source)?;
        let rule = StyleRule {
            selector,
            declarations,
        };
        Some(CssRule::new(parent_rule, parent_stylesheet, RuleKind::Style(rule)))
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for declaration in &self.declarations {
            write!(f, " {}", declaration)?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TokenizerSource;

    fn parse(input: &str) -> (Option<CssRule>, usize) {
        let sheet = StyleSheet::new();
        let mut source = TokenizerSource::new(input);
        let rule = StyleRule::parse(&mut source, None, &sheet);
        (rule, source.diagnostics().len())
    }

    fn style(rule: &CssRule) -> &StyleRule {
        match rule.kind() {
            RuleKind::Style(style) => style,
            other => panic!("expected a style rule, got {:?}", other),
        }
    }

    #[test]
    fn test_selector_is_normalized() {
        let (rule, errors) = parse("  button:hover  ,\n label.title /* x */ > a { color: red }");
        let rule = rule.unwrap();
        assert_eq!(errors, 0);
        assert_eq!(style(&rule).selector, "button:hover , label.title > a");
        assert_eq!(style(&rule).declarations, vec![Declaration::new("color", "red")]);
    }

    #[test]
    fn test_missing_block() {
        let (rule, errors) = parse("button");
        assert!(rule.is_none());
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_missing_selector() {
        let (rule, errors) = parse("{ color: red }");
        assert!(rule.is_none());
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_display() {
        let rule = StyleRule {
            selector: "a".to_string(),
            declarations: vec![],
        };
        assert_eq!(rule.to_string(), "a { }");

        let rule = StyleRule {
            selector: "window.dark".to_string(),
            declarations: vec![Declaration::new("color", "white"), Declaration::new("margin", "0")],
        };
        assert_eq!(rule.to_string(), "window.dark { color: white; margin: 0; }");
    }
}
