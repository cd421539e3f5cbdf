//! Value projection.
//!
//! Once a rule's condition holds, its template is projected into a
//! concrete value using the bindings the condition captured. Projection
//! mirrors ordinary data: plain leaves pass through unchanged, containers
//! project their parts, and the special shapes (refs, bound variables,
//! function calls) reach into the evaluation context.

use maxim_core::{Record, Template, Value};

use crate::context::Env;
use crate::error::EvalError;
use crate::result::{self, Binds, Outcome};
use crate::rules;

/// Project `template` into a value.
pub fn project(template: &Template, env: &Env, binds: &Binds) -> Outcome<Value> {
    match template {
        Template::Value(v) => Outcome::Ok(v.clone()),
        Template::Ref(path) => rules::resolve_path(env.root, path, env),
        Template::ArgRef(path) => rules::resolve_path(env.args, path, env),
        Template::Call(func, args) => {
            // All arguments project before the call so one pass reports
            // every request the arguments need.
            result::map_each(args.iter(), |arg| project(arg, env, binds)).and_then(
                |values| match func.call(&values) {
                    Ok(v) => Outcome::Ok(v),
                    Err(message) => Outcome::Err(EvalError::Call {
                        function: func.name().to_string(),
                        message,
                    }),
                },
            )
        }
        Template::Bound(key) => match binds.get(key) {
            Some(v) => Outcome::Ok(v.clone()),
            None => Outcome::Err(EvalError::Unbound { name: key.clone() }),
        },
        Template::BoundOr(key, default) => {
            Outcome::Ok(binds.get(key).cloned().unwrap_or_else(|| default.clone()))
        }
        Template::Map(entries) => {
            result::map_values(entries, |t| project(t, env, binds)).map(Value::Map)
        }
        Template::List(items) => {
            result::map_each(items.iter(), |t| project(t, env, binds)).map(Value::List)
        }
        Template::Record(type_tag, fields) => {
            result::map_values(fields, |t| project(t, env, binds)).map(|fields| {
                Value::Record(Record {
                    type_tag: type_tag.clone(),
                    fields,
                })
            })
        }
    }
}
