//! Rule registry and per-type capabilities.
//!
//! The engine consults rules through the [`RuleSource`] trait so hosts can
//! supply their own registry; [`RuleBook`] is the ordered in-memory
//! implementation. [`Schema`] carries the optional per-type `compare`
//! capability used for typed-literal conditions.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::rule::Rule;
use crate::value::Record;

/// Source of rules for a `(predicate, type)` pair.
///
/// An empty slice means "no rule declared; fall through to field fetch".
/// The returned order is declaration order and is semantically
/// significant.
pub trait RuleSource {
    fn rules_for(&self, predicate: &str, type_tag: &str) -> &[Rule];
}

/// Ordered in-memory rule registry.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: BTreeMap<(String, String), Vec<Rule>>,
}

impl RuleBook {
    pub fn new() -> RuleBook {
        RuleBook::default()
    }

    /// Append a rule for a predicate on a type, after any already declared.
    pub fn add(&mut self, type_tag: impl Into<String>, predicate: impl Into<String>, rule: Rule) {
        self.rules
            .entry((type_tag.into(), predicate.into()))
            .or_default()
            .push(rule);
    }
}

impl RuleSource for RuleBook {
    fn rules_for(&self, predicate: &str, type_tag: &str) -> &[Rule] {
        self.rules
            .get(&(type_tag.to_string(), predicate.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Domain comparison between two records of the same type.
pub type CompareFn = Arc<dyn Fn(&Record, &Record) -> Ordering + Send + Sync>;

/// Per-type capabilities beyond plain field lookup.
///
/// A type that registers `compare` gets domain equality for typed-literal
/// conditions (`compare(a, b) == Equal`); types without it fall back to
/// structural equality.
#[derive(Clone, Default)]
pub struct Schema {
    compare: BTreeMap<String, CompareFn>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    pub fn register_compare(
        &mut self,
        type_tag: impl Into<String>,
        f: impl Fn(&Record, &Record) -> Ordering + Send + Sync + 'static,
    ) {
        self.compare.insert(type_tag.into(), Arc::new(f));
    }

    pub fn compare_for(&self, type_tag: &str) -> Option<&CompareFn> {
        self.compare.get(type_tag)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("compare", &self.compare.keys().collect::<Vec<_>>())
            .finish()
    }
}
