//! Substitutions associate type variables with terms.

use std::cmp::Ordering;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use terms::metrics;
use terms::{Env, Ty, TypeId, VarId};

/// A finite map from variables to canonical terms.
///
/// Application is capture-free (variables are globally unique identities)
/// and re-canonicalising: substituting into an arrow can change its argument
/// multiset, so results are rebuilt through the smart constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst {
    bindings: FxHashMap<VarId, TypeId>,
}

impl Subst {
    pub fn empty() -> Subst {
        Subst::default()
    }

    pub fn single(var: VarId, ty: TypeId) -> Subst {
        let mut bindings = FxHashMap::default();
        bindings.insert(var, ty);
        Subst { bindings }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn get(&self, var: VarId) -> Option<TypeId> {
        self.bindings.get(&var).copied()
    }

    /// The bindings in ascending variable order.
    pub fn sorted_bindings(&self) -> Vec<(VarId, TypeId)> {
        self.bindings.iter().map(|(&var, &ty)| (var, ty)).sorted_by_key(|&(var, _)| var).collect()
    }

    pub fn apply(&self, env: &mut Env, ty: TypeId) -> TypeId {
        if self.bindings.is_empty() {
            return ty;
        }
        match env[ty].clone() {
            Ty::Var(var) => self.bindings.get(&var).copied().unwrap_or(ty),
            Ty::Constr(path, arguments) => {
                let arguments =
                    arguments.iter().map(|&argument| self.apply(env, argument)).collect();
                env.constr(path, arguments)
            }
            Ty::Arrow(arguments, result) => {
                let arguments =
                    arguments.iter().map(|&argument| self.apply(env, argument)).collect();
                let result = self.apply(env, result);
                env.arrow_multiset(arguments, result)
            }
            Ty::Tuple(elements) => {
                let elements = elements.iter().map(|&element| self.apply(env, element)).collect();
                env.tuple(elements)
            }
            Ty::Other(_) => ty,
        }
    }

    /// Extends with `var -> ty`, folding the new binding into the terms
    /// already bound so the substitution stays idempotent.
    pub fn extended(&self, env: &mut Env, var: VarId, ty: TypeId) -> Subst {
        let single = Subst::single(var, ty);
        let mut bindings = FxHashMap::default();
        for (&bound, &target) in &self.bindings {
            bindings.insert(bound, single.apply(env, target));
        }
        bindings.insert(var, ty);
        Subst { bindings }
    }

    /// Sequential composition: applying the result is applying `inner`, then
    /// `outer`.
    pub fn compose(env: &mut Env, outer: &Subst, inner: &Subst) -> Subst {
        let mut bindings = FxHashMap::default();
        for (&var, &ty) in &inner.bindings {
            bindings.insert(var, outer.apply(env, ty));
        }
        for (&var, &ty) in &outer.bindings {
            bindings.entry(var).or_insert(ty);
        }
        Subst { bindings }
    }

    /// The total specificity order on unifiers: fewer bindings first, then
    /// smaller bound terms, then the sorted binding lists lexicographically.
    pub fn specificity(env: &Env, a: &Subst, b: &Subst) -> Ordering {
        let complexity = |subst: &Subst| {
            subst.bindings.values().map(|&ty| metrics::node_count(env, ty)).sum::<u32>()
        };
        a.len()
            .cmp(&b.len())
            .then_with(|| complexity(a).cmp(&complexity(b)))
            .then_with(|| {
                let a = a.sorted_bindings();
                let b = b.sorted_bindings();
                for (&(u, s), &(v, t)) in a.iter().zip(b.iter()) {
                    let ordering = u.cmp(&v).then_with(|| env.compare(s, t));
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            })
    }
}
