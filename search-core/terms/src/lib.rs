//! Type terms and the environment that owns them.
//!
//! An [`Env`] groups the fresh-variable registry, the variable name map, and
//! the hash-consing table for [`Ty`] terms. Every term is built through the
//! smart constructors on [`Env`], so every interned term is canonical: arrow
//! arguments form a sorted multiset, tuples are flat, and structurally equal
//! terms share one [`TypeId`]. Equality of canonical terms from the same
//! environment is therefore tag equality.

pub mod metrics;
pub mod pretty;

mod core;
mod path;
mod source;

pub use core::{Kind, Ty, TyInterner, TypeId, VarId};
pub use path::{Path, PathError};
pub use source::SourceType;

use std::cmp::Ordering;
use std::ops;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    names: Vec<SmolStr>,
    types: TyInterner,
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    /// Allocates a fresh variable. Identities are environment-scoped, so two
    /// environments never share a variable by construction.
    pub fn fresh_var(&mut self, name: impl Into<SmolStr>) -> VarId {
        let var = VarId(self.names.len() as u32);
        self.names.push(name.into());
        var
    }

    pub fn var_name(&self, var: VarId) -> &SmolStr {
        &self.names[var.0 as usize]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn var(&mut self, var: VarId) -> TypeId {
        self.types.intern(Ty::Var(var))
    }

    pub fn other(&mut self, hash: u64) -> TypeId {
        self.types.intern(Ty::Other(hash))
    }

    pub fn unit(&mut self) -> TypeId {
        self.tuple(vec![])
    }

    pub fn constr(&mut self, path: Path, arguments: Vec<TypeId>) -> TypeId {
        if path.is_unit() && arguments.is_empty() {
            return self.unit();
        }
        self.types.intern(Ty::Constr(path, arguments.into()))
    }

    /// Builds a tuple: nested tuples flatten into one multiset, a singleton
    /// collapses to its element, and the empty tuple stands for `unit`.
    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(elements.len());
        for element in elements {
            match &self[element] {
                Ty::Tuple(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(element),
            }
        }
        if flat.len() == 1 {
            return flat[0];
        }
        self.sort_multiset(&mut flat);
        self.types.intern(Ty::Tuple(flat.into()))
    }

    /// Builds an arrow from a single (surface) argument; tupled arguments
    /// flatten into the multiset, so `a * b -> c` and `a -> b -> c` intern to
    /// the same term.
    pub fn arrow(&mut self, argument: TypeId, result: TypeId) -> TypeId {
        self.arrow_multiset(vec![argument], result)
    }

    /// Builds an arrow from an argument multiset:
    ///
    /// - tupled arguments splat into the multiset (the empty tuple
    ///   contributes nothing);
    /// - an arrow result is uncurried, its arguments absorbed;
    /// - an empty multiset collapses the arrow to its result.
    pub fn arrow_multiset(&mut self, arguments: Vec<TypeId>, result: TypeId) -> TypeId {
        let mut flat = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match &self[argument] {
                Ty::Tuple(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(argument),
            }
        }
        let result = match &self[result] {
            Ty::Arrow(inner, inner_result) => {
                flat.extend(inner.iter().copied());
                *inner_result
            }
            _ => result,
        };
        if flat.is_empty() {
            return result;
        }
        self.sort_multiset(&mut flat);
        self.types.intern(Ty::Arrow(flat.into(), result))
    }

    fn sort_multiset(&self, items: &mut [TypeId]) {
        items.sort_by(|&a, &b| self.compare(a, b));
    }

    /// The structural total order on canonical terms. Cross-variant ties are
    /// broken by [`Kind`] rank.
    pub fn compare(&self, a: TypeId, b: TypeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (&self[a], &self[b]) {
            (Ty::Var(x), Ty::Var(y)) => x.cmp(y),
            (Ty::Constr(p, xs), Ty::Constr(q, ys)) => {
                p.cmp(q).then_with(|| self.compare_all(xs, ys))
            }
            (Ty::Arrow(xs, x), Ty::Arrow(ys, y)) => {
                self.compare_all(xs, ys).then_with(|| self.compare(*x, *y))
            }
            (Ty::Tuple(xs), Ty::Tuple(ys)) => self.compare_all(xs, ys),
            (Ty::Other(x), Ty::Other(y)) => x.cmp(y),
            (x, y) => x.kind().cmp(&y.kind()),
        }
    }

    fn compare_all(&self, xs: &[TypeId], ys: &[TypeId]) -> Ordering {
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let ordering = self.compare(x, y);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        xs.len().cmp(&ys.len())
    }

    /// Iterates every variable occurrence in a term, duplicates included,
    /// left to right.
    pub fn vars(&self, ty: TypeId) -> Vars<'_> {
        Vars { env: self, stack: vec![ty] }
    }

    pub fn occurs(&self, var: VarId, ty: TypeId) -> bool {
        self.vars(ty).any(|occurrence| occurrence == var)
    }
}

impl ops::Index<TypeId> for Env {
    type Output = Ty;

    fn index(&self, id: TypeId) -> &Ty {
        &self.types[id]
    }
}

pub struct Vars<'env> {
    env: &'env Env,
    stack: Vec<TypeId>,
}

impl Iterator for Vars<'_> {
    type Item = VarId;

    fn next(&mut self) -> Option<VarId> {
        while let Some(id) = self.stack.pop() {
            match &self.env[id] {
                Ty::Var(var) => return Some(*var),
                Ty::Constr(_, arguments) => self.stack.extend(arguments.iter().rev()),
                Ty::Arrow(arguments, result) => {
                    self.stack.push(*result);
                    self.stack.extend(arguments.iter().rev());
                }
                Ty::Tuple(elements) => self.stack.extend(elements.iter().rev()),
                Ty::Other(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Env, Path, Ty};

    fn path(source: &str) -> Path {
        source.parse().unwrap()
    }

    fn int(env: &mut Env) -> super::TypeId {
        env.constr(path("int"), vec![])
    }

    #[test]
    fn test_hash_cons_idempotent() {
        let mut env = Env::new();
        let a = int(&mut env);
        let b = int(&mut env);
        assert_eq!(a, b);
        assert_eq!(env.type_count(), 1);
    }

    #[test]
    fn test_unit_constr_is_empty_tuple() {
        let mut env = Env::new();
        let unit = env.constr(path("unit"), vec![]);
        assert!(matches!(&env[unit], Ty::Tuple(elements) if elements.is_empty()));
        assert_eq!(unit, env.unit());
    }

    #[test]
    fn test_singleton_tuple_collapses() {
        let mut env = Env::new();
        let int = int(&mut env);
        assert_eq!(env.tuple(vec![int]), int);
    }

    #[test]
    fn test_nested_tuples_flatten() {
        let mut env = Env::new();
        let int = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        let inner = env.tuple(vec![int, string]);
        let outer = env.tuple(vec![inner, int]);
        match &env[outer] {
            Ty::Tuple(elements) => assert_eq!(elements.len(), 3),
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn test_multiset_is_order_insensitive() {
        let mut env = Env::new();
        let int = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        assert_eq!(env.tuple(vec![int, string]), env.tuple(vec![string, int]));
    }

    #[test]
    fn test_curried_and_tupled_arrows_coincide() {
        let mut env = Env::new();
        let int = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        let bool_ = env.constr(path("bool"), vec![]);

        let curried_tail = env.arrow(string, bool_);
        let curried = env.arrow(int, curried_tail);

        let pair = env.tuple(vec![int, string]);
        let tupled = env.arrow(pair, bool_);

        assert_eq!(curried, tupled);
        match &env[curried] {
            Ty::Arrow(arguments, result) => {
                assert_eq!(arguments.len(), 2);
                assert_eq!(*result, bool_);
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_argument_order_is_irrelevant() {
        let mut env = Env::new();
        let int = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        let bool_ = env.constr(path("bool"), vec![]);

        let tail_a = env.arrow(string, bool_);
        let a = env.arrow(int, tail_a);
        let tail_b = env.arrow(int, bool_);
        let b = env.arrow(string, tail_b);

        assert_eq!(a, b);
    }

    #[test]
    fn test_nullary_arrow_collapses() {
        let mut env = Env::new();
        let int = int(&mut env);
        let unit = env.unit();
        assert_eq!(env.arrow(unit, int), int);
    }

    #[test]
    fn test_no_arrow_returns_arrow() {
        let mut env = Env::new();
        let int = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        let bool_ = env.constr(path("bool"), vec![]);

        let tail = env.arrow(string, bool_);
        let whole = env.arrow(int, tail);

        match &env[whole] {
            Ty::Arrow(_, result) => assert!(!matches!(&env[*result], Ty::Arrow(_, _))),
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_compare_kind_order() {
        let mut env = Env::new();
        let var = env.fresh_var("a");
        let var = env.var(var);
        let constr = int(&mut env);
        let string = env.constr(path("string"), vec![]);
        let arrow = env.arrow(constr, string);
        let tuple = env.tuple(vec![constr, string]);
        let other = env.other(42);

        let mut ids = vec![other, tuple, arrow, constr, var];
        ids.sort_by(|&a, &b| env.compare(a, b));
        assert_eq!(ids, vec![var, constr, arrow, tuple, other]);
    }

    #[test]
    fn test_vars_with_duplicates() {
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let arrow = env.arrow(a_ty, a_ty);
        let occurrences: Vec<_> = env.vars(arrow).collect();
        assert_eq!(occurrences, vec![a, a]);
    }
}
