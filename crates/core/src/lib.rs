//! maxim-core: data model for the Maxim rule engine.
//!
//! This crate defines what rules and subjects are made of; evaluation
//! lives in `maxim-eval`.
//!
//! Key types are re-exported at the crate root:
//!
//! - [`Value`] / [`Record`] -- the dynamic runtime domain
//! - [`Condition`] / [`Template`] / [`Rule`] -- the rule ASTs
//! - [`RuleSource`] / [`RuleBook`] -- the rule registry contract
//! - [`Schema`] -- per-type capabilities (domain `compare`)
//! - [`FunInfo`] / [`ArgInfo`] -- normalized function argument metadata
//! - [`value_from_json`] / [`value_to_json`] -- the host JSON bridge

pub mod funinfo;
pub mod json;
pub mod registry;
pub mod rule;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use funinfo::{ArgInfo, ArgKey, ArgOverride, ArgSpec, ConfigError, FunInfo};
pub use json::{record_from_json, value_from_json, value_to_json, JsonError};
pub use registry::{CompareFn, RuleBook, RuleSource, Schema};
pub use rule::{path, Condition, Func, Path, Rule, Template};
pub use value::{Record, Value};
