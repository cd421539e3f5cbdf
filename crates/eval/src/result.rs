//! Three-valued evaluation results and their reducers.
//!
//! An [`Outcome`] is determined (`Ok`), blocked on data (`NotLoaded`,
//! carrying the requests that would unblock it), or failed (`Err`).
//! Boolean reduction is carried by [`Match`], which pairs the boolean
//! with the bindings captured while matching, so bindings travel through
//! results rather than shared state.
//!
//! All sequence reducers go through one `combine` step. The subtle rows
//! of its table:
//!
//! - a determined `false` concludes a conjunction even when earlier
//!   elements are pending; the pending requests are dropped because no
//!   load can change the outcome (symmetrically for `any` and `true`);
//! - `find` never skips past a pending element to a later determined
//!   match: an earlier element could still resolve true, so the reduction
//!   halts with the requests accumulated so far.

use std::collections::BTreeMap;

use maxim_core::Value;

use crate::error::EvalError;
use crate::loader::DataReq;

/// Bindings captured by `Bind` conditions, keyed by bind name.
pub type Binds = BTreeMap<String, Value>;

/// Unordered request multiset; concatenation is the only operation the
/// engine performs on it. Deduplication is the loader's concern.
pub type Requests = Vec<DataReq>;

/// A three-valued evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    /// Evaluation cannot finish without these data requests.
    NotLoaded(Requests),
    Err(EvalError),
}

impl<T> Outcome<T> {
    /// Map the determined payload; pending and failed results pass
    /// through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::NotLoaded(reqs) => Outcome::NotLoaded(reqs),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }

    /// Monadic bind on the determined payload.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => f(v),
            Outcome::NotLoaded(reqs) => Outcome::NotLoaded(reqs),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}

/// A boolean match result plus the bindings captured while matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Match {
    pub pass: bool,
    pub binds: Binds,
}

impl Match {
    pub fn of(pass: bool) -> Match {
        Match {
            pass,
            binds: Binds::new(),
        }
    }

    pub fn yes() -> Match {
        Match::of(true)
    }

    pub fn no() -> Match {
        Match::of(false)
    }

    fn absorb(&mut self, other: Match) {
        self.binds.extend(other.binds);
    }
}

impl Outcome<Match> {
    /// A determined boolean with no bindings.
    pub fn truth(pass: bool) -> Outcome<Match> {
        Outcome::Ok(Match::of(pass))
    }

    /// Record `key -> subject` into the bindings when the match passed.
    pub fn bind(self, key: &str, subject: &Value) -> Outcome<Match> {
        match self {
            Outcome::Ok(mut m) if m.pass => {
                m.binds.insert(key.to_string(), subject.clone());
                Outcome::Ok(m)
            }
            other => other,
        }
    }

    /// Negate the boolean, carrying bindings through.
    pub fn negate(self) -> Outcome<Match> {
        self.map(|m| Match {
            pass: !m.pass,
            binds: m.binds,
        })
    }
}

#[derive(Clone, Copy)]
enum Mode {
    All,
    Any,
    First,
}

enum Step {
    Continue(Outcome<Match>),
    Halt(Outcome<Match>),
}

/// One reduction step. `acc` is `Ok` (still determined) or `NotLoaded`
/// (blocked so far); errors halt immediately and never become the
/// accumulator.
fn combine(acc: Outcome<Match>, next: Outcome<Match>, mode: Mode) -> Step {
    match next {
        Outcome::Err(e) => Step::Halt(Outcome::Err(e)),
        Outcome::NotLoaded(next_reqs) => Step::Continue(match acc {
            Outcome::NotLoaded(mut reqs) => {
                reqs.extend(next_reqs);
                Outcome::NotLoaded(reqs)
            }
            _ => Outcome::NotLoaded(next_reqs),
        }),
        Outcome::Ok(m) => match mode {
            Mode::All => {
                if m.pass {
                    Step::Continue(match acc {
                        Outcome::Ok(mut am) => {
                            am.absorb(m);
                            Outcome::Ok(am)
                        }
                        pending => pending,
                    })
                } else {
                    // Determined falsehood concludes the conjunction;
                    // pending requests can no longer change the outcome.
                    Step::Halt(Outcome::truth(false))
                }
            }
            Mode::Any => {
                if m.pass {
                    Step::Halt(Outcome::Ok(m))
                } else {
                    Step::Continue(acc)
                }
            }
            Mode::First => {
                if m.pass {
                    match acc {
                        // A pending earlier element could still resolve
                        // true, so this match is not yet the first one.
                        Outcome::NotLoaded(reqs) => Step::Halt(Outcome::NotLoaded(reqs)),
                        _ => Step::Halt(Outcome::Ok(m)),
                    }
                } else {
                    Step::Continue(acc)
                }
            }
        },
    }
}

/// Conjunction over match results.
pub fn all(results: impl IntoIterator<Item = Outcome<Match>>) -> Outcome<Match> {
    let mut acc = Outcome::truth(true);
    for next in results {
        match combine(acc, next, Mode::All) {
            Step::Halt(result) => return result,
            Step::Continue(a) => acc = a,
        }
    }
    acc
}

/// Disjunction over match results. A determined match returns with its
/// own bindings.
pub fn any(results: impl IntoIterator<Item = Outcome<Match>>) -> Outcome<Match> {
    let mut acc = Outcome::truth(false);
    for next in results {
        match combine(acc, next, Mode::Any) {
            Step::Halt(result) => return result,
            Step::Continue(a) => acc = a,
        }
    }
    acc
}

/// First-match selection with a continuation.
///
/// Applies `cond` to each item in order. On the first determined match,
/// returns `then(item, bindings)`. If a pending element blocks the
/// selection, returns the accumulated `NotLoaded`. On exhaustion with
/// every element determinedly false, returns `default()`.
pub fn find<I, T>(
    items: I,
    mut cond: impl FnMut(&I::Item) -> Outcome<Match>,
    then: impl FnOnce(&I::Item, Binds) -> Outcome<T>,
    default: impl FnOnce() -> Outcome<T>,
) -> Outcome<T>
where
    I: IntoIterator,
{
    let mut acc = Outcome::truth(false);
    for item in items {
        match combine(acc, cond(&item), Mode::First) {
            Step::Halt(Outcome::Ok(m)) => return then(&item, m.binds),
            Step::Halt(Outcome::NotLoaded(reqs)) => return Outcome::NotLoaded(reqs),
            Step::Halt(Outcome::Err(e)) => return Outcome::Err(e),
            Step::Continue(a) => acc = a,
        }
    }
    match acc {
        Outcome::NotLoaded(reqs) => Outcome::NotLoaded(reqs),
        _ => default(),
    }
}

/// First-match selection returning the element itself, `Ok(None)` on
/// exhaustion.
pub fn first<I>(
    items: I,
    cond: impl FnMut(&I::Item) -> Outcome<Match>,
) -> Outcome<Option<I::Item>>
where
    I: IntoIterator,
    I::Item: Clone,
{
    find(
        items,
        cond,
        |item, _binds| Outcome::Ok(Some(item.clone())),
        || Outcome::Ok(None),
    )
}

/// Element-wise mapping. Requests accumulate across all elements (so one
/// pass reports everything the host can batch-load); errors short-circuit
/// immediately.
pub fn map_each<I, U>(
    items: I,
    mut f: impl FnMut(I::Item) -> Outcome<U>,
) -> Outcome<Vec<U>>
where
    I: IntoIterator,
{
    let mut out = Vec::new();
    let mut pending = Requests::new();
    for item in items {
        match f(item) {
            Outcome::Ok(v) => out.push(v),
            Outcome::NotLoaded(reqs) => pending.extend(reqs),
            Outcome::Err(e) => return Outcome::Err(e),
        }
    }
    if pending.is_empty() {
        Outcome::Ok(out)
    } else {
        Outcome::NotLoaded(pending)
    }
}

/// Value-wise mapping over a keyed map, preserving keys. Accumulation
/// follows [`map_each`].
pub fn map_values<K, V, U>(
    map: &BTreeMap<K, V>,
    mut f: impl FnMut(&V) -> Outcome<U>,
) -> Outcome<BTreeMap<K, U>>
where
    K: Ord + Clone,
{
    let mut out = BTreeMap::new();
    let mut pending = Requests::new();
    for (k, v) in map {
        match f(v) {
            Outcome::Ok(v) => {
                out.insert(k.clone(), v);
            }
            Outcome::NotLoaded(reqs) => pending.extend(reqs),
            Outcome::Err(e) => return Outcome::Err(e),
        }
    }
    if pending.is_empty() {
        Outcome::Ok(out)
    } else {
        Outcome::NotLoaded(pending)
    }
}
