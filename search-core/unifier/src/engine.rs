//! The unification engine.
//!
//! Unification runs under multiset semantics: arrow arguments and tuple
//! elements are unordered, so two multisets of different cardinality can
//! still unify by grouping elements of the larger side into implicit tuples.
//! The search is therefore non-deterministic and [`unifiers`] exposes it as
//! a lazy, depth-first stream of substitutions; [`unify`] picks the smallest
//! one under the specificity order.
//!
//! Branch failure is not an error: a dead branch is dropped and the search
//! backtracks to the next state on the stack.

use terms::{Env, Ty, TypeId, VarId};

use crate::Subst;

/// Every substitution unifying `left` and `right`, lazily.
///
/// Emission order is deterministic: group assignments are enumerated
/// lexicographically and equations with a variable on either side are
/// reduced first.
pub fn unifiers(env: &mut Env, left: TypeId, right: TypeId) -> Unifiers<'_> {
    let state = State { queue: vec![(left, right)], subst: Subst::empty() };
    Unifiers { env, stack: vec![state] }
}

/// The smallest unifier of `left` and `right` under
/// [`Subst::specificity`], if any.
#[tracing::instrument(skip(env))]
pub fn unify(env: &mut Env, left: TypeId, right: TypeId) -> Option<Subst> {
    let mut stream = unifiers(env, left, right);
    let mut best = stream.next()?;
    while let Some(candidate) = stream.next() {
        if Subst::specificity(stream.env, &candidate, &best) == std::cmp::Ordering::Less {
            best = candidate;
        }
    }
    Some(best)
}

pub fn unifiable(env: &mut Env, left: TypeId, right: TypeId) -> bool {
    unifiers(env, left, right).next().is_some()
}

#[derive(Debug, Clone)]
struct State {
    queue: Vec<(TypeId, TypeId)>,
    subst: Subst,
}

pub struct Unifiers<'env> {
    pub(crate) env: &'env mut Env,
    stack: Vec<State>,
}

impl Iterator for Unifiers<'_> {
    type Item = Subst;

    fn next(&mut self) -> Option<Subst> {
        while let Some(mut state) = self.stack.pop() {
            let Some(index) = pick_equation(self.env, &state.queue) else {
                return Some(state.subst);
            };
            let (left, right) = state.queue.swap_remove(index);
            if left == right {
                self.stack.push(state);
                continue;
            }

            let left_core = self.env[left].clone();
            let right_core = self.env[right].clone();

            match (left_core, right_core) {
                (Ty::Var(var), _) => self.bind(state, var, right),
                (_, Ty::Var(var)) => self.bind(state, var, left),

                (Ty::Other(a), Ty::Other(b)) => {
                    if a == b {
                        self.stack.push(state);
                    }
                }

                (Ty::Constr(p, xs), Ty::Constr(q, ys)) => {
                    if p == q && xs.len() == ys.len() {
                        state.queue.extend(xs.iter().copied().zip(ys.iter().copied()));
                        self.stack.push(state);
                    }
                }

                (Ty::Tuple(xs), Ty::Tuple(ys)) => self.branch_multiset(state, &xs, &ys, None),

                (Ty::Arrow(xs, x), Ty::Arrow(ys, y)) => {
                    self.branch_multiset(state, &xs, &ys, Some((x, y)))
                }

                _ => {}
            }
        }
        None
    }
}

impl Unifiers<'_> {
    fn bind(&mut self, mut state: State, var: VarId, ty: TypeId) {
        if self.env.occurs(var, ty) {
            return;
        }
        let single = Subst::single(var, ty);
        for (left, right) in &mut state.queue {
            *left = single.apply(self.env, *left);
            *right = single.apply(self.env, *right);
        }
        state.subst = state.subst.extended(self.env, var, ty);
        self.stack.push(state);
    }

    /// One branch per surjective assignment of the larger multiset onto the
    /// smaller one; each group of the larger side becomes an implicit tuple.
    fn branch_multiset(
        &mut self,
        state: State,
        xs: &[TypeId],
        ys: &[TypeId],
        extra: Option<(TypeId, TypeId)>,
    ) {
        let (small, large, flipped) =
            if xs.len() <= ys.len() { (xs, ys, false) } else { (ys, xs, true) };

        if small.is_empty() {
            if large.is_empty() {
                let mut state = state;
                state.queue.extend(extra);
                self.stack.push(state);
            }
            return;
        }

        let assignments = surjections(large.len(), small.len());
        for assignment in assignments.iter().rev() {
            let mut branch = state.clone();
            branch.queue.extend(extra);
            for (slot, &target) in small.iter().enumerate() {
                let group: Vec<TypeId> = large
                    .iter()
                    .zip(assignment.iter())
                    .filter(|&(_, &assigned)| assigned == slot)
                    .map(|(&element, _)| element)
                    .collect();
                let grouped =
                    if group.len() == 1 { group[0] } else { self.env.tuple(group) };
                let equation = if flipped { (grouped, target) } else { (target, grouped) };
                branch.queue.push(equation);
            }
            self.stack.push(branch);
        }
    }
}

/// Reduce equations with a variable on either side first; they are
/// deterministic and commit the search to a unifier quickly.
fn pick_equation(env: &Env, queue: &[(TypeId, TypeId)]) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }
    let variable = queue
        .iter()
        .position(|&(left, right)| {
            matches!(env[left], Ty::Var(_)) || matches!(env[right], Ty::Var(_))
        });
    Some(variable.unwrap_or(0))
}

/// All surjective assignments of `elements` positions onto `slots` groups,
/// in lexicographic order.
fn surjections(elements: usize, slots: usize) -> Vec<Vec<usize>> {
    debug_assert!(slots >= 1 && elements >= slots);
    let mut out = Vec::new();
    let mut current = vec![0usize; elements];
    let mut used = vec![0usize; slots];
    assign(0, elements, &mut current, &mut used, &mut out);
    out
}

fn assign(
    position: usize,
    elements: usize,
    current: &mut Vec<usize>,
    used: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if position == elements {
        out.push(current.clone());
        return;
    }
    let remaining = elements - position - 1;
    for slot in 0..used.len() {
        current[position] = slot;
        used[slot] += 1;
        let empty = used.iter().filter(|&&count| count == 0).count();
        if empty <= remaining {
            assign(position + 1, elements, current, used, out);
        }
        used[slot] -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{surjections, unifiable, unifiers, unify};
    use crate::Subst;
    use terms::{Env, TypeId};

    fn constant(env: &mut Env, name: &str) -> TypeId {
        env.constr(name.parse().unwrap(), vec![])
    }

    #[test]
    fn test_surjections_exact() {
        assert_eq!(surjections(1, 1), vec![vec![0]]);
        assert_eq!(surjections(2, 1), vec![vec![0, 0]]);
        assert_eq!(surjections(2, 2), vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(surjections(3, 2).len(), 6);
    }

    #[test]
    fn test_unify_identical_is_empty() {
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let arrow = env.arrow(a_ty, a_ty);

        let subst = unify(&mut env, arrow, arrow).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn test_unify_constants() {
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let subst = unify(&mut env, int, int).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn test_unify_variable_against_arrow() {
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let int_to_int = env.arrow(int, int);

        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let identity = env.arrow(a_ty, a_ty);

        let subst = unify(&mut env, int_to_int, identity).unwrap();
        assert_eq!(subst.len(), 1);
        assert_eq!(subst.get(a), Some(int));
    }

    #[test]
    fn test_unify_groups_arguments() {
        // 'a * 'b -> 'c against int -> int -> int
        let mut env = Env::new();
        let int = constant(&mut env, "int");

        let a = env.fresh_var("a");
        let b = env.fresh_var("b");
        let c = env.fresh_var("c");
        let a_ty = env.var(a);
        let b_ty = env.var(b);
        let c_ty = env.var(c);
        let pair = env.tuple(vec![a_ty, b_ty]);
        let query = env.arrow(pair, c_ty);

        let tail = env.arrow(int, int);
        let entry = env.arrow(int, tail);

        let subst = unify(&mut env, query, entry).unwrap();
        assert_eq!(subst.get(a), Some(int));
        assert_eq!(subst.get(b), Some(int));
        assert_eq!(subst.get(c), Some(int));
    }

    #[test]
    fn test_unify_groups_the_query_side() {
        // 'a -> 'b -> 'c against 'x -> 'y * 'z
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let b = env.fresh_var("b");
        let c = env.fresh_var("c");
        let (a_ty, b_ty, c_ty) = {
            let a = env.var(a);
            let b = env.var(b);
            let c = env.var(c);
            (a, b, c)
        };
        let query_tail = env.arrow(b_ty, c_ty);
        let query = env.arrow(a_ty, query_tail);

        let x = env.fresh_var("x");
        let y = env.fresh_var("y");
        let z = env.fresh_var("z");
        let x_ty = env.var(x);
        let y_ty = env.var(y);
        let z_ty = env.var(z);
        let yz = env.tuple(vec![y_ty, z_ty]);
        let entry = env.arrow(x_ty, yz);

        let subst = unify(&mut env, query, entry).unwrap();
        let left = subst.apply(&mut env, query);
        let right = subst.apply(&mut env, entry);
        assert_eq!(left, right);
    }

    #[test]
    fn test_unify_rejects_arity_mismatch() {
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let arrow = env.arrow(int, int);
        assert!(unify(&mut env, int, arrow).is_none());
    }

    #[test]
    fn test_unify_rejects_distinct_constructors() {
        // 'a list * int against 'x array * int
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let x = env.fresh_var("x");
        let x_ty = env.var(x);

        let list = env.constr("list".parse().unwrap(), vec![a_ty]);
        let array = env.constr("array".parse().unwrap(), vec![x_ty]);
        let left = env.tuple(vec![list, int]);
        let right = env.tuple(vec![array, int]);

        assert!(unify(&mut env, left, right).is_none());
    }

    #[test]
    fn test_occurs_check() {
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let list = env.constr("list".parse().unwrap(), vec![a_ty]);
        assert!(!unifiable(&mut env, a_ty, list));
    }

    #[test]
    fn test_other_matches_by_hash_only() {
        let mut env = Env::new();
        let a = env.other(1);
        let b = env.other(1);
        let c = env.other(2);

        assert!(unifiable(&mut env, a, b));
        assert!(!unifiable(&mut env, a, c));
    }

    #[test]
    fn test_every_emitted_subst_unifies() {
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let string = constant(&mut env, "string");

        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let b = env.fresh_var("b");
        let b_ty = env.var(b);
        let query_tail = env.arrow(b_ty, a_ty);
        let query = env.arrow(a_ty, query_tail);

        let entry_tail = env.arrow(string, int);
        let entry = env.arrow(int, entry_tail);

        let all: Vec<Subst> = {
            let mut collected = Vec::new();
            let mut stream = unifiers(&mut env, query, entry);
            while let Some(subst) = stream.next() {
                collected.push(subst);
            }
            collected
        };
        assert!(!all.is_empty());
        for subst in &all {
            let left = subst.apply(&mut env, query);
            let right = subst.apply(&mut env, entry);
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_unify_is_minimal_among_unifiers() {
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let b = env.fresh_var("b");
        let c = env.fresh_var("c");
        let a_ty = env.var(a);
        let b_ty = env.var(b);
        let c_ty = env.var(c);
        let query_tail = env.arrow(b_ty, c_ty);
        let query = env.arrow(a_ty, query_tail);

        let x = env.fresh_var("x");
        let y = env.fresh_var("y");
        let x_ty = env.var(x);
        let y_ty = env.var(y);
        let entry = env.arrow(x_ty, y_ty);

        let all: Vec<Subst> = {
            let mut collected = Vec::new();
            let mut stream = unifiers(&mut env, query, entry);
            while let Some(subst) = stream.next() {
                collected.push(subst);
            }
            collected
        };
        let best = unify(&mut env, query, entry).unwrap();
        for subst in &all {
            let ordering = Subst::specificity(&env, &best, subst);
            assert_ne!(ordering, std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn test_multiset_commutativity() {
        let mut env = Env::new();
        let int = constant(&mut env, "int");
        let string = constant(&mut env, "string");
        let bool_ = constant(&mut env, "bool");

        let tail_a = env.arrow(string, bool_);
        let one = env.arrow(int, tail_a);
        let tail_b = env.arrow(int, bool_);
        let two = env.arrow(string, tail_b);

        // the canonical forms coincide, so unification is trivially
        // invariant under argument permutation
        assert_eq!(one, two);
        assert!(unifiable(&mut env, one, two));
    }
}
