//! # CSSOM - CSS Object Model
//!
//! Parses stylesheets into rule objects that know their parent rule and
//! stylesheet, and can print themselves back as CSS text.
//!
//! The parser is built around one idea: every rule is parsed through a
//! [`BoundedSource`](source::BoundedSource), a view of the token stream that
//! ends where the rule ends. Rule parsers therefore cannot overrun into the
//! next rule, and whatever they leave behind is reported as junk and skipped.
//!
//! ## Quick Start
//!
//! ```rust
//! use cssom::StyleSheet;
//! use cssom::color::Rgba;
//!
//! let sheet = StyleSheet::parse(r#"
//!     @define-color accent #3584e4;
//!     @define-color accent_hover shade(@accent, 1.1);
//!
//!     button:hover {
//!         background: @accent_hover;
//!     }
//!
//!     @frobnicate this is skipped;
//! "#);
//!
//! assert_eq!(sheet.rules().len(), 3);
//! assert_eq!(sheet.diagnostics().len(), 1);
//! assert_eq!(sheet.lookup_color("accent"), Some(Rgba::rgb(0x35, 0x84, 0xe4)));
//! ```
//!
//! ## Supported Rules
//!
//! - `@import url(...);`
//! - `@define-color name <color>;`
//! - `@keyframes name { <offset> { <declarations> } ... }`
//! - Style rules: `selector { <declarations> }`
//!
//! At-keywords are matched ASCII case-insensitively. Unknown at-rules are
//! reported as warnings and skipped.
//!
//! ## Modules
//!
//! - [`token`] and [`tokenizer`]: CSS tokens and the tokenizer producing them
//! - [`source`]: pull-based token sources, including the bounded view
//! - [`rule`]: the at-rule dispatcher and rule types
//! - [`stylesheet`]: top-level parsing and color lookup
//! - [`color`]: color values for `@define-color`
//! - [`declaration`]: property declarations
//! - [`error`]: errors and diagnostics

pub mod color;
pub mod declaration;
pub mod error;
pub mod rule;
pub mod source;
pub mod stylesheet;
pub mod token;
pub mod tokenizer;

pub use error::{CssError, Diagnostic};
pub use rule::{AtRuleKind, CssRule, RuleKind, parse_at_rule, parse_qualified_rule};
pub use stylesheet::StyleSheet;
