//! Rule selection and the resolve/fetch bridge.
//!
//! `resolve` is the engine's front door: given a predicate name and a
//! subject, it consults the rule registry for typed subjects and falls
//! back to plain field access when no rule is declared -- or when every
//! declared rule is determinedly false. Rule selection is first-match in
//! declaration order; an undetermined earlier rule blocks selection with
//! the requests it needs.

use maxim_core::{Rule, Value};
use tracing::debug;

use crate::condition::eval_condition;
use crate::context::Env;
use crate::error::EvalError;
use crate::loader::ASSOC;
use crate::result::{self, Match, Outcome};
use crate::template::project;

/// Resolve a predicate or field on a subject.
pub fn resolve(name: &str, subject: &Value, env: &Env) -> Outcome<Value> {
    match subject {
        Value::Record(rec) => {
            let rules = env.rules.rules_for(name, &rec.type_tag);
            if rules.is_empty() {
                fetch(subject, name, env)
            } else {
                match_rules(name, rules, subject, env)
            }
        }
        Value::Map(_) => fetch(subject, name, env),
        other => Outcome::Err(EvalError::KeyNotFound {
            key: name.to_string(),
            container: other.type_name().to_string(),
        }),
    }
}

/// Select the first matching rule and project its value. The subject
/// becomes the root for the whole activation, so `Ref` paths inside the
/// rules resolve against it.
fn match_rules(name: &str, rules: &[Rule], subject: &Value, env: &Env) -> Outcome<Value> {
    let scoped = env.with_root(subject);
    result::find(
        rules.iter(),
        |rule| {
            let result = eval_condition(&rule.when, subject, &scoped);
            if scoped.debug {
                trace_attempt(name, rule, subject, &result);
            }
            result
        },
        |rule, binds| project(&rule.val, &scoped, &binds),
        || fetch(subject, name, env),
    )
}

fn trace_attempt(name: &str, rule: &Rule, subject: &Value, result: &Outcome<Match>) {
    match result {
        Outcome::Ok(m) if m.pass => debug!(
            predicate = name,
            subject = subject.type_tag(),
            rule = rule.key.as_deref().unwrap_or("-"),
            value = ?rule.val,
            condition = ?rule.when,
            "rule matched"
        ),
        _ => debug!(
            predicate = name,
            subject = subject.type_tag(),
            condition = ?rule.when,
            outcome = ?result,
            "rule attempt"
        ),
    }
}

/// Plain field access on a container.
///
/// A deferred association routes through the loader, which answers from
/// the cache or reports the concrete request.
pub fn fetch(container: &Value, key: &str, env: &Env) -> Outcome<Value> {
    match container {
        Value::Record(rec) => match rec.field(key) {
            Some(Value::Deferred) => env.loader.lookup(env.cache, ASSOC, rec, key),
            Some(value) => Outcome::Ok(value.clone()),
            None => Outcome::Err(EvalError::KeyNotFound {
                key: key.to_string(),
                container: rec.type_tag.clone(),
            }),
        },
        Value::Map(entries) => match entries.get(key) {
            Some(value) => Outcome::Ok(value.clone()),
            None => Outcome::Err(EvalError::KeyNotFound {
                key: key.to_string(),
                container: "map".to_string(),
            }),
        },
        other => Outcome::Err(EvalError::KeyNotFound {
            key: key.to_string(),
            container: other.type_name().to_string(),
        }),
    }
}

/// Left fold of `resolve` along a path. A nil intermediate short-circuits
/// the whole path to nil.
pub fn resolve_path(root: &Value, path: &[String], env: &Env) -> Outcome<Value> {
    let mut current = root.clone();
    for key in path {
        if current.is_nil() {
            return Outcome::Ok(Value::Nil);
        }
        match resolve(key, &current, env) {
            Outcome::Ok(value) => current = value,
            blocked => return blocked,
        }
    }
    Outcome::Ok(current)
}
