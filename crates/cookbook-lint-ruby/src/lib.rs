//! # cookbook-lint-ruby
//!
//! Tree-sitter based Ruby support for cookbook-lint.
//!
//! [`RubyParser`] implements [`cookbook_lint_core::SourceParser`]: it parses
//! Ruby with `tree-sitter-ruby`, rejects trees containing error or missing
//! nodes, and lowers the concrete syntax tree into the core [`Node`] model.
//!
//! [`Node`]: cookbook_lint_core::Node

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lower;
mod parser;

pub use parser::RubyParser;
