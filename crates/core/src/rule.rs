//! Rule AST: conditions, value templates, callables.
//!
//! A rule says "this predicate holds on records of my type when the
//! condition matches, and in that case its value is the projected
//! template". Conditions and templates are explicit tagged trees; nothing
//! is dispatched by inspecting opaque runtime shapes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A field path, resolved left to right from a root value.
pub type Path = Vec<String>;

/// Builds a [`Path`] from string segments.
pub fn path<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Path {
    segments.into_iter().map(Into::into).collect()
}

/// A declarative condition over a subject value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Literal: matches by structural equality against the subject, with
    /// the per-type `compare` escape for record literals.
    Value(Value),
    /// A predicate name, resolved on the subject; matches iff the result
    /// is `Bool(true)`.
    Pred(String),
    /// Conjunction over named entries: each key is resolved on the subject
    /// and the sub-condition is matched against the resolved value.
    Fields(BTreeMap<String, Condition>),
    /// Disjunction over conditions.
    AnyOf(Vec<Condition>),
    Not(Box<Condition>),
    /// Resolve the path against the root subject, then use the resolved
    /// value as the condition.
    Ref(Path),
    /// Same as [`Condition::Ref`], but rooted at the argument bag.
    ArgRef(Path),
    /// Evaluate the inner condition; when it matches, additionally record
    /// `key -> current subject` into the result's bindings.
    Bind(String, Box<Condition>),
    /// Switch the subject to the argument bag. Only meaningful while the
    /// current subject is the root subject; under any other subject the
    /// condition silently fails to match.
    Args(Box<Condition>),
}

impl Condition {
    pub fn fields(entries: impl IntoIterator<Item = (&'static str, Condition)>) -> Condition {
        Condition::Fields(
            entries
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect(),
        )
    }

    pub fn pred(name: impl Into<String>) -> Condition {
        Condition::Pred(name.into())
    }

    pub fn not(inner: Condition) -> Condition {
        Condition::Not(Box::new(inner))
    }

    pub fn bind(key: impl Into<String>, inner: Condition) -> Condition {
        Condition::Bind(key.into(), Box::new(inner))
    }
}

/// A declarative value template, projected once a rule's condition holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Pass-through leaf: numbers, text, booleans, nil, whole values.
    Value(Value),
    /// Project the value at the path, rooted at the root subject.
    Ref(Path),
    /// Project the value at the path, rooted at the argument bag.
    ArgRef(Path),
    /// Apply a callable to projected arguments.
    Call(Func, Vec<Template>),
    /// Look up a binding recorded by [`Condition::Bind`]; absent keys are
    /// an error.
    Bound(String),
    /// Like [`Template::Bound`], but total: absent keys yield the default.
    BoundOr(String, Value),
    /// Project every entry value, preserving keys.
    Map(BTreeMap<String, Template>),
    /// Project every element.
    List(Vec<Template>),
    /// Project the fields, then reconstruct a record with the same tag.
    Record(String, BTreeMap<String, Template>),
}

impl Template {
    pub fn map(entries: impl IntoIterator<Item = (&'static str, Template)>) -> Template {
        Template::Map(
            entries
                .into_iter()
                .map(|(k, t)| (k.to_string(), t))
                .collect(),
        )
    }

    pub fn bound(key: impl Into<String>) -> Template {
        Template::Bound(key.into())
    }

    pub fn bound_or(key: impl Into<String>, default: Value) -> Template {
        Template::BoundOr(key.into(), default)
    }
}

/// A named callable usable inside [`Template::Call`].
///
/// The function is pure from the engine's perspective; a `Err(message)`
/// return surfaces as a call error. Equality compares names only.
#[derive(Clone)]
pub struct Func {
    name: String,
    f: Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>,
}

impl Func {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Func {
        Func {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.f)(args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Func) -> bool {
        self.name == other.name
    }
}

/// A single rule: an optional key, a condition, and a value template.
///
/// Rules for a given predicate on a given type form an ordered list;
/// declaration order is significant, the first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub key: Option<String>,
    pub when: Condition,
    pub val: Template,
}

impl Rule {
    pub fn new(when: Condition, val: Template) -> Rule {
        Rule {
            key: None,
            when,
            val,
        }
    }

    pub fn keyed(key: impl Into<String>, when: Condition, val: Template) -> Rule {
        Rule {
            key: Some(key.into()),
            when,
            val,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builder() {
        assert_eq!(
            path(["a", "b"]),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn func_equality_is_by_name() {
        let f = Func::new("double", |args| Ok(args[0].clone()));
        let g = Func::new("double", |_| Ok(Value::Nil));
        let h = Func::new("triple", |_| Ok(Value::Nil));
        assert_eq!(f, g);
        assert_ne!(f, h);
    }

    #[test]
    fn func_call() {
        let f = Func::new("first", |args| {
            args.first().cloned().ok_or_else(|| "no args".to_string())
        });
        assert_eq!(f.call(&[Value::Int(7)]), Ok(Value::Int(7)));
        assert_eq!(f.call(&[]), Err("no args".to_string()));
    }

    #[test]
    fn condition_helpers() {
        let cond = Condition::fields([("age", Condition::not(Condition::Value(Value::Int(0))))]);
        match cond {
            Condition::Fields(entries) => {
                assert!(matches!(entries["age"], Condition::Not(_)));
            }
            other => panic!("expected Fields, got {:?}", other),
        }
    }
}
