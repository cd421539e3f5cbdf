//! Condition evaluation.
//!
//! Reduces a condition tree against a subject to a boolean match result,
//! possibly pending data. Dispatch checks the subject's shape before the
//! condition's: a sequence subject always means "any element matches",
//! even when the condition is itself a disjunction. That tie-break is
//! load-bearing.

use std::cmp::Ordering;

use maxim_core::{Condition, Value};

use crate::context::Env;
use crate::result::{self, Match, Outcome};
use crate::rules;

/// Evaluate `cond` against `subject`.
pub fn eval_condition(cond: &Condition, subject: &Value, env: &Env) -> Outcome<Match> {
    // Sequence subjects disjunct element-wise before any condition shape
    // is considered.
    if let Value::List(elements) = subject {
        return result::any(elements.iter().map(|el| eval_condition(cond, el, env)));
    }

    match cond {
        Condition::AnyOf(conds) => {
            result::any(conds.iter().map(|c| eval_condition(c, subject, env)))
        }
        Condition::Fields(entries) => result::all(entries.iter().map(|(key, sub)| {
            rules::resolve(key, subject, env)
                .and_then(|resolved| eval_condition(sub, &resolved, env))
        })),
        Condition::Not(inner) => eval_condition(inner, subject, env).negate(),
        Condition::ArgRef(path) => rules::resolve_path(env.args, path, env)
            .and_then(|resolved| eval_condition(&lift(&resolved), subject, env)),
        Condition::Ref(path) => rules::resolve_path(env.root, path, env)
            .and_then(|resolved| eval_condition(&lift(&resolved), subject, env)),
        Condition::Bind(key, inner) => eval_condition(inner, subject, env).bind(key, subject),
        Condition::Args(inner) => {
            // Only defined while the subject is still the root subject;
            // anywhere deeper it silently fails to match.
            if subject == env.root {
                eval_condition(inner, env.args, env)
            } else {
                Outcome::truth(false)
            }
        }
        Condition::Value(Value::Record(other)) => {
            let pass = match subject {
                Value::Record(rec) if rec.type_tag == other.type_tag => {
                    match env.schema.compare_for(&rec.type_tag) {
                        Some(compare) => compare(rec, other) == Ordering::Equal,
                        None => rec == other,
                    }
                }
                _ => false,
            };
            Outcome::truth(pass)
        }
        Condition::Pred(name) => rules::resolve(name, subject, env)
            .map(|resolved| Match::of(resolved == Value::Bool(true))),
        Condition::Value(literal) => Outcome::truth(subject == literal),
    }
}

/// Turn a `Ref`-resolved value back into a condition: maps become
/// conjunctions, lists become disjunctions, everything else matches as a
/// literal.
fn lift(value: &Value) -> Condition {
    match value {
        Value::Map(entries) => Condition::Fields(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), lift(v)))
                .collect(),
        ),
        Value::List(elements) => Condition::AnyOf(elements.iter().map(lift).collect()),
        other => Condition::Value(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxim_core::{Record, RuleBook, Schema};

    use crate::loader::{CacheLoader, DataCache};

    struct Fixture {
        rules: RuleBook,
        schema: Schema,
        cache: DataCache,
        args: Value,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                rules: RuleBook::new(),
                schema: Schema::new(),
                cache: DataCache::new(),
                args: Value::Nil,
            }
        }

        fn env<'a>(&'a self, root: &'a Value) -> Env<'a> {
            Env::new(
                root,
                &self.args,
                &self.rules,
                &self.schema,
                &CacheLoader,
                &self.cache,
            )
        }
    }

    fn user(age: i64) -> Value {
        Value::Record(Record::new("user").with("age", Value::Int(age)))
    }

    #[test]
    fn literal_equality() {
        let fx = Fixture::new();
        let subject = Value::Int(3);
        let env = fx.env(&subject);
        assert_eq!(
            eval_condition(&Condition::Value(Value::Int(3)), &subject, &env),
            Outcome::truth(true)
        );
        assert_eq!(
            eval_condition(&Condition::Value(Value::Int(4)), &subject, &env),
            Outcome::truth(false)
        );
    }

    #[test]
    fn field_conjunction() {
        let fx = Fixture::new();
        let subject = user(30);
        let env = fx.env(&subject);
        let cond = Condition::fields([("age", Condition::Value(Value::Int(30)))]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));

        let cond = Condition::fields([("age", Condition::Value(Value::Int(31)))]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(false));
    }

    #[test]
    fn condition_disjunction() {
        let fx = Fixture::new();
        let subject = Value::Int(2);
        let env = fx.env(&subject);
        let cond = Condition::AnyOf(vec![
            Condition::Value(Value::Int(1)),
            Condition::Value(Value::Int(2)),
        ]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));
    }

    #[test]
    fn sequence_subject_disjuncts_elements() {
        let fx = Fixture::new();
        let subject = Value::List(vec![Value::Int(1), Value::Int(5)]);
        let env = fx.env(&subject);
        let cond = Condition::Value(Value::Int(5));
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));
    }

    #[test]
    fn sequence_subject_wins_over_sequence_condition() {
        // With both subject and condition being sequences, the subject
        // disjunction applies first: each element is matched against the
        // whole condition list.
        let fx = Fixture::new();
        let subject = Value::List(vec![Value::Int(7)]);
        let env = fx.env(&subject);
        let cond = Condition::AnyOf(vec![Condition::Value(Value::Int(7))]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));

        let empty = Value::List(vec![]);
        let env = fx.env(&empty);
        assert_eq!(eval_condition(&cond, &empty, &env), Outcome::truth(false));
    }

    #[test]
    fn negation() {
        let fx = Fixture::new();
        let subject = Value::Int(0);
        let env = fx.env(&subject);
        let cond = Condition::not(Condition::Value(Value::Int(0)));
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(false));
    }

    #[test]
    fn bind_captures_the_current_subject() {
        let fx = Fixture::new();
        let subject = user(30);
        let env = fx.env(&subject);
        let cond = Condition::fields([(
            "age",
            Condition::bind("the_age", Condition::Value(Value::Int(30))),
        )]);
        match eval_condition(&cond, &subject, &env) {
            Outcome::Ok(m) => {
                assert!(m.pass);
                assert_eq!(m.binds.get("the_age"), Some(&Value::Int(30)));
            }
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn bind_records_nothing_on_mismatch() {
        let fx = Fixture::new();
        let subject = user(30);
        let env = fx.env(&subject);
        let cond = Condition::fields([(
            "age",
            Condition::bind("the_age", Condition::Value(Value::Int(99))),
        )]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(false));
    }

    #[test]
    fn ref_resolves_against_the_root_subject() {
        let fx = Fixture::new();
        let subject = Value::Record(
            Record::new("user")
                .with("age", Value::Int(30))
                .with("retirement_age", Value::Int(30)),
        );
        let env = fx.env(&subject);
        // age matches whatever retirement_age resolves to.
        let cond = Condition::fields([(
            "age",
            Condition::Ref(maxim_core::path(["retirement_age"])),
        )]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));
    }

    #[test]
    fn ref_lifts_maps_to_conjunctions() {
        let fx = Fixture::new();
        let mut profile = std::collections::BTreeMap::new();
        profile.insert("age".to_string(), Value::Int(30));
        let subject = Value::Record(
            Record::new("user")
                .with("age", Value::Int(30))
                .with("wanted", Value::Map(profile)),
        );
        let env = fx.env(&subject);
        // The resolved map {age: 30} becomes a Fields condition matched
        // against the subject itself.
        let cond = Condition::Ref(maxim_core::path(["wanted"]));
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));
    }

    #[test]
    fn arg_ref_resolves_against_args() {
        let mut fx = Fixture::new();
        let mut bag = std::collections::BTreeMap::new();
        bag.insert("min_age".to_string(), Value::Int(30));
        fx.args = Value::Map(bag);
        let subject = user(30);
        let env = fx.env(&subject);
        let cond = Condition::fields([("age", Condition::ArgRef(maxim_core::path(["min_age"])))]);
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));
    }

    #[test]
    fn args_switches_subject_at_the_root_only() {
        let mut fx = Fixture::new();
        let mut bag = std::collections::BTreeMap::new();
        bag.insert("strict".to_string(), Value::Bool(true));
        fx.args = Value::Map(bag);
        let subject = user(30);
        let env = fx.env(&subject);

        let cond = Condition::Args(Box::new(Condition::fields([(
            "strict",
            Condition::Value(Value::Bool(true)),
        )])));
        assert_eq!(eval_condition(&cond, &subject, &env), Outcome::truth(true));

        // Under a non-root subject the same condition silently fails.
        let nested = Condition::fields([("age", Condition::Args(Box::new(Condition::Value(
            Value::Int(30),
        ))))]);
        assert_eq!(
            eval_condition(&nested, &subject, &env),
            Outcome::truth(false)
        );
    }

    #[test]
    fn typed_literal_uses_registered_compare() {
        let mut fx = Fixture::new();
        // Compare money records by cents only, ignoring the note field.
        fx.schema.register_compare("money", |a, b| {
            a.field("cents").cmp(&b.field("cents"))
        });
        let subject = Value::Record(
            Record::new("money")
                .with("cents", Value::Int(100))
                .with("note", Value::Text("mine".to_string())),
        );
        let literal = Record::new("money")
            .with("cents", Value::Int(100))
            .with("note", Value::Text("other".to_string()));
        let env = fx.env(&subject);
        assert_eq!(
            eval_condition(&Condition::Value(Value::Record(literal)), &subject, &env),
            Outcome::truth(true)
        );
    }

    #[test]
    fn typed_literal_without_compare_is_structural() {
        let fx = Fixture::new();
        let subject = user(30);
        let other = Record::new("user").with("age", Value::Int(31));
        let env = fx.env(&subject);
        assert_eq!(
            eval_condition(&Condition::Value(Value::Record(other)), &subject, &env),
            Outcome::truth(false)
        );
    }

    #[test]
    fn predicate_must_resolve_to_true() {
        let fx = Fixture::new();
        let subject = Value::Record(Record::new("user").with("active", Value::Bool(true)));
        let env = fx.env(&subject);
        assert_eq!(
            eval_condition(&Condition::pred("active"), &subject, &env),
            Outcome::truth(true)
        );

        let truthy_but_not_true =
            Value::Record(Record::new("user").with("active", Value::Int(1)));
        let env = fx.env(&truthy_but_not_true);
        assert_eq!(
            eval_condition(&Condition::pred("active"), &truthy_but_not_true, &env),
            Outcome::truth(false)
        );
    }
}
