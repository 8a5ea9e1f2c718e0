//! wyx-parser: Lexer and recursive-descent parser for the wyx language
//!
//! Turns UTF-8 source into a token stream plus a syntax tree, and never
//! aborts: malformed input comes back as a tree with error recovery nodes
//! and a diagnostic list.
//!
//! # Design Principles
//!
//! 1. **Tokens are the single source of truth**
//!    - Trivia (whitespace, comments) are real tokens, so the token texts
//!      concatenate back to the exact input
//!    - Tokens carry no text; a side table indexed by token id does
//!    - A token's id is its index in the token array, even after recovery
//!      inserts missing tokens
//!
//! 2. **Arena-based allocation**
//!    - One bump arena per file holds the source copy, tokens, texts and
//!      every syntax node
//!    - Nodes reference each other with plain `&'a` borrows and record
//!      their extent as half-open token-id ranges
//!    - The whole parse frees in one `reset`
//!
//! 3. **Speculation by cursor rewind**
//!    - Ambiguities (`List<int> x` vs `a < b`, casts, lambdas) resolve by
//!      scanning ahead with no allocation and rewinding the cursor
//!
//! # Example
//!
//! ```
//! use wyx_parser::SyntaxTree;
//!
//! let tree = SyntaxTree::parse("class Point { int x; int y; }");
//! assert_eq!(tree.diagnostics().len(), 0);
//! assert_eq!(tree.root().members.len(), 1);
//! ```

mod span;
mod text_window;
mod token;
mod kind;
mod facts;
mod diagnostics;
mod arena;
mod scanning;
mod tokenizer;

mod ast;
mod parser;
mod types;
mod exprs;
mod patterns;
mod stmts;
mod decls;

mod syntax_tree;

// Re-exports
pub use arena::Arena;
pub use ast::*;
pub use diagnostics::{Diagnostic, Diagnostics, ErrorCode};
pub use kind::SyntaxKind;
pub use parser::{parse_compilation_unit, ParseOutput};
pub use span::{LineIndex, Span};
pub use syntax_tree::SyntaxTree;
pub use token::{LiteralValue, SyntaxToken, TokenFlags, TokenKind};
pub use tokenizer::{tokenize, TokenizerResult};
