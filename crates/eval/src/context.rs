//! Evaluation context.
//!
//! `Env` bundles the handles one evaluation needs: the root subject, the
//! argument bag, the rule registry, per-type capabilities, and the loader
//! with its cache. Everything is borrowed; the engine owns nothing and
//! performs no I/O. Bindings are deliberately absent here -- they travel
//! inside results so that one rule's captures can never leak into the
//! next rule attempt.

use maxim_core::{RuleSource, Schema, Value};

use crate::loader::{DataCache, Loader};

#[derive(Clone, Copy)]
pub struct Env<'a> {
    /// The subject at the top of the current rule-matching activation.
    /// `Ref` paths resolve against this.
    pub root: &'a Value,
    /// External argument bag; `ArgRef` paths resolve against this.
    pub args: &'a Value,
    pub rules: &'a dyn RuleSource,
    pub schema: &'a Schema,
    pub loader: &'a dyn Loader,
    pub cache: &'a DataCache,
    /// When set, each rule attempt emits a `tracing` debug line.
    pub debug: bool,
}

impl<'a> Env<'a> {
    pub fn new(
        root: &'a Value,
        args: &'a Value,
        rules: &'a dyn RuleSource,
        schema: &'a Schema,
        loader: &'a dyn Loader,
        cache: &'a DataCache,
    ) -> Env<'a> {
        Env {
            root,
            args,
            rules,
            schema,
            loader,
            cache,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Env<'a> {
        self.debug = debug;
        self
    }

    /// Re-root the context for a nested rule-matching activation. The new
    /// root may be a shorter-lived intermediate value.
    pub fn with_root<'b>(&'b self, root: &'b Value) -> Env<'b> {
        Env {
            root,
            args: self.args,
            rules: self.rules,
            schema: self.schema,
            loader: self.loader,
            cache: self.cache,
            debug: self.debug,
        }
    }
}
