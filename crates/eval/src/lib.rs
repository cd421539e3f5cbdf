//! maxim-eval: partial, re-entrant rule evaluation.
//!
//! Resolving a predicate on a subject yields one of three outcomes: a
//! determined value, an error, or `NotLoaded` carrying the data requests
//! the host must satisfy before evaluation can finish. The engine itself
//! is synchronous and performs no I/O; asynchrony lives outside, in the
//! host's evaluate / load / re-evaluate loop:
//!
//! 1. call [`resolve`] with a subject and an [`Env`];
//! 2. on `NotLoaded`, satisfy the reported requests and fill the
//!    [`DataCache`];
//! 3. re-invoke with the same inputs until the result is determined.
//!
//! Re-invocation only ever moves a result from pending to determined;
//! satisfied requests never reappear.
//!
//! Key entry points:
//!
//! - [`resolve`] / [`resolve_path`] / [`fetch`] -- predicate and field
//!   resolution
//! - [`eval_condition`] / [`project`] -- the two recursive halves of rule
//!   evaluation
//! - [`result`] -- the three-valued combinators
//! - [`Loader`] / [`CacheLoader`] / [`DataCache`] -- the data boundary

pub mod condition;
pub mod context;
pub mod error;
pub mod loader;
pub mod result;
pub mod rules;
pub mod template;

// ── Convenience re-exports ───────────────────────────────────────────

pub use condition::eval_condition;
pub use context::Env;
pub use error::EvalError;
pub use loader::{CacheLoader, DataCache, DataReq, Loader, ASSOC};
pub use result::{Binds, Match, Outcome, Requests};
pub use rules::{fetch, resolve, resolve_path};
pub use template::project;
