use std::fmt;
use std::rc::Rc;

use crate::color::ColorValue;
use crate::rule::{CssRule, RuleKind};
use crate::source::{TokenRole, TokenSource};
use crate::stylesheet::StyleSheet;
use crate::token::{Token, TokenType};

/// `@define-color name <color>;`
#[derive(Clone, Debug, PartialEq)]
pub struct DefineColorRule {
    pub name: String,
    pub color: ColorValue,
}

impl DefineColorRule {
    pub(crate) fn parse(
        source: &mut dyn TokenSource,
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
    ) -> Option<CssRule> {
        let name = match source.get_token() {
            Token::Ident(name) => name.clone(),
            _ => {
                source.error("Expected a name for the defined color");
                source.consume_all();
                return None;
            }
        };
        source.consume_token_as(TokenRole::Name);

        let Some(color) = ColorValue::parse(source) else {
            source.consume_all();
            return None;
        };
        source.consume_if(TokenType::Semicolon, TokenRole::Punctuation);

        let rule = DefineColorRule { name, color };
        Some(CssRule::new(parent_rule, parent_stylesheet, RuleKind::DefineColor(rule)))
    }
}

impl fmt::Display for DefineColorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@define-color {} {};", self.name, self.color)
    }
}
