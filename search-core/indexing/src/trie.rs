//! The feature trie.
//!
//! A right-nested discrimination tree: each [`Branch`] level is keyed by one
//! feature, and [`Leaf`] buckets candidate cells by their exact type. The
//! nesting is expressed in the type system, so the set of levels is fixed at
//! compile time; [`Trie`] is the shape the index uses.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use terms::{Env, TypeId};

use crate::{ByHead, Cell, Feature, Info, TailLength};

pub trait Node: Default {
    fn add(&mut self, env: &Env, ty: TypeId, info: Info);

    /// Collects the cells a query must be unified against. Non-exhaustive
    /// descent only follows edges whose key is feature-compatible with the
    /// query; exhaustive descent visits every leaf.
    fn candidates<'t>(
        &'t self,
        env: &Env,
        query: TypeId,
        exhaustive: bool,
        out: &mut Vec<&'t Cell>,
    );

    fn for_each_cell(&self, f: &mut dyn FnMut(&Cell));
}

/// One discrimination level. Children are kept sorted by feature value, so
/// descent order is deterministic.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize",
    deserialize = "N: Deserialize<'de>"
))]
pub struct Branch<F: Feature, N> {
    children: Vec<(F::Value, N)>,
    #[serde(skip)]
    feature: PhantomData<fn() -> F>,
}

impl<F: Feature, N> Default for Branch<F, N> {
    fn default() -> Branch<F, N> {
        Branch { children: vec![], feature: PhantomData }
    }
}

impl<F: Feature, N: Node> Node for Branch<F, N> {
    fn add(&mut self, env: &Env, ty: TypeId, info: Info) {
        let value = F::compute(env, ty);
        let index = match self.children.binary_search_by(|(key, _)| key.cmp(&value)) {
            Ok(index) => index,
            Err(index) => {
                self.children.insert(index, (value, N::default()));
                index
            }
        };
        self.children[index].1.add(env, ty, info);
    }

    fn candidates<'t>(
        &'t self,
        env: &Env,
        query: TypeId,
        exhaustive: bool,
        out: &mut Vec<&'t Cell>,
    ) {
        let value = F::compute(env, query);
        for (key, child) in &self.children {
            if exhaustive || F::compatible(value, *key) {
                child.candidates(env, query, exhaustive, out);
            }
        }
    }

    fn for_each_cell(&self, f: &mut dyn FnMut(&Cell)) {
        for (_, child) in &self.children {
            child.for_each_cell(f);
        }
    }
}

/// The bottom of the trie: cells sorted by their type tag.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Leaf {
    cells: Vec<Cell>,
}

impl Node for Leaf {
    fn add(&mut self, _env: &Env, ty: TypeId, info: Info) {
        let index = match self.cells.binary_search_by(|cell| cell.ty().cmp(&ty)) {
            Ok(index) => index,
            Err(index) => {
                self.cells.insert(index, Cell::new(ty));
                index
            }
        };
        self.cells[index].add(info);
    }

    fn candidates<'t>(
        &'t self,
        _env: &Env,
        _query: TypeId,
        _exhaustive: bool,
        out: &mut Vec<&'t Cell>,
    ) {
        out.extend(self.cells.iter());
    }

    fn for_each_cell(&self, f: &mut dyn FnMut(&Cell)) {
        for cell in &self.cells {
            f(cell);
        }
    }
}

/// The discrimination order used by the index: head kind, then tail arity.
pub type Trie = Branch<ByHead, Branch<TailLength, Leaf>>;

#[cfg(test)]
mod tests {
    use super::{Node, Trie};
    use crate::Info;
    use terms::{Env, TypeId};

    fn add(trie: &mut Trie, env: &Env, ty: TypeId, path: &str) {
        trie.add(env, ty, Info { path: path.parse().unwrap(), ty });
    }

    #[test]
    fn test_filtered_descent_prunes_heads() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);
        let string = env.constr("string".parse().unwrap(), vec![]);
        let arrow = env.arrow(int, string);

        let mut trie = Trie::default();
        add(&mut trie, &env, int, "Base.zero");
        add(&mut trie, &env, arrow, "Base.show");

        let mut filtered = Vec::new();
        trie.candidates(&env, int, false, &mut filtered);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].ty(), int);

        let mut exhaustive = Vec::new();
        trie.candidates(&env, int, true, &mut exhaustive);
        assert_eq!(exhaustive.len(), 2);
    }

    #[test]
    fn test_var_entries_always_survive_filtering() {
        let mut env = Env::new();
        let a = env.fresh_var("a");
        let a_ty = env.var(a);
        let int = env.constr("int".parse().unwrap(), vec![]);

        let mut trie = Trie::default();
        add(&mut trie, &env, a_ty, "Base.id");

        let mut atomic = Vec::new();
        trie.candidates(&env, int, false, &mut atomic);
        assert_eq!(atomic.len(), 1);

        // an arrow query must still reach the bare-variable entry
        let arrow = env.arrow(int, int);
        let mut arrowed = Vec::new();
        trie.candidates(&env, arrow, false, &mut arrowed);
        assert_eq!(arrowed.len(), 1);
    }

    #[test]
    fn test_longer_tails_survive_filtering() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);
        let one = env.arrow(int, int);
        let two = env.arrow(int, one);

        let mut trie = Trie::default();
        add(&mut trie, &env, two, "Base.add");

        let mut out = Vec::new();
        trie.candidates(&env, one, false, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_cells_group_by_exact_type() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);

        let mut trie = Trie::default();
        add(&mut trie, &env, int, "Base.zero");
        add(&mut trie, &env, int, "Base.one");

        let mut count = 0;
        trie.for_each_cell(&mut |cell| {
            count += 1;
            assert_eq!(cell.entries().len(), 2);
        });
        assert_eq!(count, 1);
    }
}
