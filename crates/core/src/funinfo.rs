//! Per-function argument metadata.
//!
//! Hosts annotate functions used in value templates with per-argument
//! flags (whether an argument should be preloaded as a scope, whether an
//! atom argument names a scope). Annotations arrive either positionally or
//! keyed (`first`, `last`, `all`, or an index); [`FunInfo::new`]
//! normalizes them into a fixed-arity positional list, rejecting
//! mis-keyed annotations synchronously.

use std::collections::BTreeMap;
use std::fmt;

/// Construction-time configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> ConfigError {
        ConfigError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid function config: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Normalized flags for one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArgInfo {
    pub preload_scope: bool,
    pub atom_to_scope: bool,
}

impl ArgInfo {
    /// Merge an override onto a base, field-wise. Explicit overrides win,
    /// including an explicit `false` over an inherited `true`.
    pub fn merged(base: ArgInfo, over: &ArgOverride) -> ArgInfo {
        ArgInfo {
            preload_scope: over.preload_scope.unwrap_or(base.preload_scope),
            atom_to_scope: over.atom_to_scope.unwrap_or(base.atom_to_scope),
        }
    }
}

/// Partial flags for one argument position; unset fields inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArgOverride {
    pub preload_scope: Option<bool>,
    pub atom_to_scope: Option<bool>,
}

impl ArgOverride {
    pub fn preload_scope(value: bool) -> ArgOverride {
        ArgOverride {
            preload_scope: Some(value),
            ..ArgOverride::default()
        }
    }

    pub fn atom_to_scope(value: bool) -> ArgOverride {
        ArgOverride {
            atom_to_scope: Some(value),
            ..ArgOverride::default()
        }
    }
}

/// Key addressing an argument position in a keyed annotation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArgKey {
    Index(usize),
    First,
    Last,
    /// Default seed applied to every position not otherwise annotated.
    All,
}

/// Incoming annotations: keyed or positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    Map(BTreeMap<ArgKey, ArgOverride>),
    List(Vec<ArgInfo>),
}

impl ArgSpec {
    pub fn empty() -> ArgSpec {
        ArgSpec::Map(BTreeMap::new())
    }
}

/// Description of a named host function of fixed arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunInfo {
    pub module: String,
    pub name: String,
    pub arity: usize,
    /// One entry per argument position, length `arity`.
    pub args: Vec<ArgInfo>,
    pub can_return_scope: bool,
    /// Warning emitted by the host when the function result is not ok.
    pub warn_not_ok: Option<String>,
    /// Warning emitted by the host on every call.
    pub warn_always: Option<String>,
}

impl FunInfo {
    /// Normalize `spec` into a positional list of length `arity`.
    ///
    /// Keyed specs seed every position from the `All` entry (if present),
    /// translate `First`/`Last` to positions, and reject indices at or
    /// past the arity. Positional specs must not be longer than the
    /// arity; the tail is padded with empty infos.
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        arity: usize,
        spec: ArgSpec,
    ) -> Result<FunInfo, ConfigError> {
        let module = module.into();
        let name = name.into();
        let args = normalize_args(&module, &name, arity, spec)?;
        Ok(FunInfo {
            module,
            name,
            arity,
            args,
            can_return_scope: false,
            warn_not_ok: None,
            warn_always: None,
        })
    }
}

fn normalize_args(
    module: &str,
    name: &str,
    arity: usize,
    spec: ArgSpec,
) -> Result<Vec<ArgInfo>, ConfigError> {
    match spec {
        ArgSpec::Map(mut entries) => {
            let default = entries
                .remove(&ArgKey::All)
                .map(|over| ArgInfo::merged(ArgInfo::default(), &over))
                .unwrap_or_default();
            let mut args = vec![default; arity];
            for (key, over) in entries {
                let index = match key {
                    ArgKey::Index(i) => i,
                    ArgKey::First => 0,
                    ArgKey::Last => arity.wrapping_sub(1),
                    ArgKey::All => unreachable!("popped above"),
                };
                if index >= arity {
                    return Err(ConfigError::new(format!(
                        "{}.{}/{}: arg key {:?} is out of range",
                        module, name, arity, key
                    )));
                }
                args[index] = ArgInfo::merged(default, &over);
            }
            Ok(args)
        }
        ArgSpec::List(list) => {
            if list.len() > arity {
                return Err(ConfigError::new(format!(
                    "{}.{}/{}: {} arg entries for arity {}",
                    module,
                    name,
                    arity,
                    list.len(),
                    arity
                )));
            }
            let mut args = list;
            args.resize(arity, ArgInfo::default());
            Ok(args)
        }
    }
}
