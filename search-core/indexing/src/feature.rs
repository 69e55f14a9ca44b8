//! Feature extractors.
//!
//! A feature is a cheap, totally ordered measurement of a term with a small
//! domain. The trie keys one discrimination level per feature; during a
//! query, an edge is descended only when its key is [`compatible`] with the
//! query's value, so most candidate cells are rejected without running the
//! unifier at all.
//!
//! [`compatible`]: Feature::compatible

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use terms::{Env, Kind, TypeId, metrics};

pub trait Feature {
    type Value: Copy + Ord + Debug + Serialize + DeserializeOwned;

    fn compute(env: &Env, ty: TypeId) -> Self::Value;

    /// Whether an entry with feature value `entry` can possibly unify with
    /// a query whose value is `query`. Must never reject a genuinely
    /// unifiable pair reachable through the filtered descent.
    fn compatible(query: Self::Value, entry: Self::Value) -> bool;
}

/// Discriminates by the kind of the outermost node.
///
/// Var-headed entries unify with anything, so they pass against every query
/// except an `Other` token (those only ever match their own hash).
#[derive(Debug)]
pub enum ByHead {}

impl Feature for ByHead {
    type Value = u8;

    fn compute(env: &Env, ty: TypeId) -> u8 {
        metrics::head_kind(env, ty).rank()
    }

    fn compatible(query: u8, entry: u8) -> bool {
        const VAR: u8 = Kind::Var.rank();
        const OTHER: u8 = Kind::Other.rank();
        query == entry || query == VAR || (entry == VAR && query != OTHER)
    }
}

/// Discriminates by the arity of the outer arrow.
///
/// An entry with at least as many arguments as the query can group down onto
/// it via multiset partitioning. Arity zero on either side must pass: a
/// zero-arity query is var-headed or atomic, and a zero-arity entry reaching
/// this level under an arrow query is var-headed (anything else was already
/// pruned by [`ByHead`]). Matches that need the *query* side to group (entry
/// arity strictly between zero and the query arity) are not reachable
/// through the filtered descent; exhaustive mode covers them.
#[derive(Debug)]
pub enum TailLength {}

impl Feature for TailLength {
    type Value = u32;

    fn compute(env: &Env, ty: TypeId) -> u32 {
        metrics::tail_length(env, ty)
    }

    fn compatible(query: u32, entry: u32) -> bool {
        query == 0 || entry == 0 || entry >= query
    }
}
