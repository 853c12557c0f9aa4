use std::fmt;
use std::rc::Rc;

use crate::declaration::{Declaration, parse_declaration_block};
use crate::error::CssError;
use crate::rule::{CssRule, RuleKind};
use crate::source::{BoundedSource, TokenRole, TokenSource};
use crate::stylesheet::StyleSheet;
use crate::token::{Token, TokenType, write_number, write_string};

/// `@keyframes name { <keyframe>* }`
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframesRule {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
}

/// One `0%, 50% { ... }` block of a keyframes rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Offsets in percent, `from` and `to` normalized to 0 and 100.
    pub offsets: Vec<f64>,
    pub declarations: Vec<Declaration>,
}

impl KeyframesRule {
    pub(crate) fn parse(
        source: &mut dyn TokenSource,
        parent_rule: Option<&Rc<CssRule>>,
        parent_stylesheet: &Rc<StyleSheet>,
    ) -> Option<CssRule> {
        let name = match source.get_token() {
            Token::Ident(name) | Token::String(name) => name.clone(),
            _ => {
                source.error("Expected a name for the keyframes");
                source.consume_all();
                return None;
            }
        };
        source.consume_token_as(TokenRole::Name);

        if !source.consume_if(TokenType::OpenCurly, TokenRole::Punctuation) {
            source.error("Expected '{' after keyframes name");
            source.consume_all();
            return None;
        }

        let mut keyframes = Vec::new();
        loop {
            match source.get_token() {
                Token::Eof => break,
                Token::CloseCurly => {
                    source.consume_token_as(TokenRole::Punctuation);
                    break;
                }
                _ => {
                    // Each keyframe gets its own view, ending at its closing brace.
                    let mut keyframe_source = BoundedSource::new(source);
                    if let Some(keyframe) = Keyframe::parse(&mut keyframe_source) {
                        if keyframe_source.get_token().is(TokenType::Eof) {
                            keyframes.push(keyframe);
                        } else {
                            keyframe_source.emit_error(CssError::TrailingJunk);
                            keyframe_source.consume_all();
                        }
                    }
                }
            }
        }

        let rule = KeyframesRule { name, keyframes };
        Some(CssRule::new(parent_rule, parent_stylesheet, RuleKind::Keyframes(rule)))
    }
}

impl Keyframe {
    fn parse(source: &mut dyn TokenSource) -> Option<Keyframe> {
        let mut offsets = Vec::new();
        loop {
            let offset = match source.get_token() {
                Token::Percentage(percent) => Some(*percent),
                token if token.is_ident("from") => Some(0.0),
                token if token.is_ident("to") => Some(100.0),
                _ => None,
            };
            match offset {
                Some(offset) if (0.0..=100.0).contains(&offset) => {
                    source.consume_token_as(TokenRole::Selector);
                    offsets.push(offset);
                }
                Some(_) => {
                    source.error("Keyframe offsets must be between 0% and 100%");
                    source.consume_all();
                    return None;
                }
                None => {
                    source.error("Expected a keyframe selector");
                    source.consume_all();
                    return None;
                }
            }

            if !source.consume_if(TokenType::Comma, TokenRole::Punctuation) {
                break;
            }
        }

        let Some(declarations) = parse_declaration_block(source) else {
            source.consume_all();
            return None;
        };
        Some(Keyframe {
            offsets,
            declarations,
        })
    }
}

impl fmt::Display for Keyframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, offset) in self.offsets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_number(f, *offset)?;
            f.write_str("%")?;
        }
        f.write_str(" {")?;
        for declaration in &self.declarations {
            write!(f, " {}", declaration)?;
        }
        f.write_str(" }")
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars().skip_while(|&c| c == '-');
    let starts_well = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '_' || !c.is_ascii(),
        None => false,
    };
    starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
}

impl fmt::Display for KeyframesRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@keyframes ")?;
        if is_identifier(&self.name) {
            f.write_str(&self.name)?;
        } else {
            write_string(f, &self.name)?;
        }
        f.write_str(" {\n")?;
        for keyframe in &self.keyframes {
            writeln!(f, "  {}", keyframe)?;
        }
        f.write_str("}")
    }
}
