//! Structured search over node attributes and custom fields.
//!
//! A search string is free text with optional qualifiers. Matching is
//! case-insensitive substring containment everywhere.
//!
//! # Supported Syntax
//!
//! - `type:<fragment>` - the node's resolved type name contains the fragment
//! - `<field>:<value>` - some custom field's name contains `<field>` and its
//!   value contains `<value>`; any number, all must hold
//! - anything else is free text, matched against the node name, then the
//!   icon (remote `http` icons excluded), then each custom field's name or value
//!
//! # Examples
//!
//! ```
//! // type:Employee Department:Sales   employees in a sales department
//! // 部署:営業部                       field 部署 containing 営業部
//! // alice type:person                 persons whose name/icon/fields mention alice
//! ```

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{MatchField, Query, SearchResult};
pub use evaluator::{search, Evaluator};
pub use parser::Parser;
