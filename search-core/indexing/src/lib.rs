//! Builds and queries the type-directed search index.
//!
//! An index is a snapshot: an environment owning every canonical term plus a
//! feature trie whose leaves bucket entries by exact type. Queries descend
//! the trie to collect candidate cells, unify against each cell's
//! representative type, and rank the survivors by unifier specificity.
//!
//! The environment is owned by the index and queries are lowered through
//! [`SearchIndex::lower_query`], so terms from two environments can never
//! meet.

mod cell;
mod codec;
mod error;
mod feature;
mod harvest;
mod trie;

pub use cell::{Cell, Info};
pub use error::IndexError;
pub use feature::{ByHead, Feature, TailLength};
pub use harvest::{HarvestEntry, read_harvest};
pub use trie::{Branch, Leaf, Node, Trie};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use terms::{Env, Path, SourceType, TypeId};
use unifier::Subst;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    env: Env,
    trie: Trie,
}

#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Visit every leaf instead of descending feature-compatible edges only.
    pub exhaustive: bool,
    /// Emit at most this many results.
    pub limit: Option<usize>,
    /// When non-empty, restrict results to entries whose path starts with
    /// one of these packages. Naming a package the index has never seen is
    /// an [`IndexError::UnknownPackage`].
    pub packages: Vec<SmolStr>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub path: Path,
    pub ty: TypeId,
    pub subst: Subst,
}

impl SearchIndex {
    /// Consumes harvested entries: each external type is imported through
    /// the smart constructors and inserted into the trie.
    #[tracing::instrument(skip_all)]
    pub fn build(entries: impl IntoIterator<Item = (Path, SourceType)>) -> SearchIndex {
        let mut index = SearchIndex::default();
        let mut count = 0usize;
        for (path, source) in entries {
            let ty = index.env.import(&source);
            index.trie.add(&index.env, ty, Info { path, ty });
            count += 1;
        }
        tracing::info!(entries = count, types = index.env.type_count(), "built index");
        index
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Imports a parsed query into the index's own environment.
    pub fn lower_query(&mut self, source: &SourceType) -> TypeId {
        self.env.import(source)
    }

    /// Exhaustive candidate stream: every cell is unified against.
    pub fn find(&mut self, query: TypeId) -> Matches<'_> {
        self.matches(query, true)
    }

    /// Feature-filtered candidate stream.
    pub fn find_with(&mut self, query: TypeId) -> Matches<'_> {
        self.matches(query, false)
    }

    fn matches(&mut self, query: TypeId, exhaustive: bool) -> Matches<'_> {
        let SearchIndex { env, trie } = self;
        let mut cells = Vec::new();
        trie.candidates(env, query, exhaustive, &mut cells);
        Matches { env, query, cells: cells.into_iter() }
    }

    /// Walks every entry in the index.
    pub fn iter(&self, mut f: impl FnMut(&Info)) {
        self.trie.for_each_cell(&mut |cell| {
            for info in cell.entries() {
                f(info);
            }
        });
    }

    /// The sorted query surface: matches ranked by unifier specificity, then
    /// by type order; cells flattened to their visible entries; package
    /// filter and limit applied.
    #[tracing::instrument(skip_all)]
    pub fn query(
        &mut self,
        query: TypeId,
        options: &QueryOptions,
    ) -> Result<Vec<SearchResult>, IndexError> {
        if !options.packages.is_empty() {
            let mut known = FxHashSet::default();
            self.iter(|info| {
                known.insert(info.path.package().clone());
            });
            for package in &options.packages {
                if !known.contains(package) {
                    return Err(IndexError::UnknownPackage(package.clone()));
                }
            }
        }

        let SearchIndex { env, trie } = self;
        let mut cells = Vec::new();
        trie.candidates(env, query, options.exhaustive, &mut cells);

        let mut matches = Vec::new();
        for cell in cells {
            if let Some(subst) = unifier::unify(env, query, cell.ty()) {
                matches.push((cell.ty(), cell, subst));
            }
        }
        tracing::debug!(matches = matches.len(), "query");

        let env: &Env = env;
        matches.sort_by(|(ty_a, _, subst_a), (ty_b, _, subst_b)| {
            Subst::specificity(env, subst_a, subst_b).then_with(|| env.compare(*ty_a, *ty_b))
        });

        let mut results = Vec::new();
        for (ty, cell, subst) in matches {
            for info in cell.visible_entries() {
                if !options.packages.is_empty()
                    && !options.packages.iter().any(|package| package == info.path.package())
                {
                    continue;
                }
                results.push(SearchResult { path: info.path.clone(), ty, subst: subst.clone() });
            }
        }
        if let Some(limit) = options.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), IndexError> {
        codec::save(self, path)
    }

    pub fn load(path: &std::path::Path) -> Result<SearchIndex, IndexError> {
        codec::load(path)
    }
}

/// Lazy match stream: candidate cells are unified one by one as the
/// consumer demands them, each emission carrying the cell's type and the
/// smallest unifier.
pub struct Matches<'index> {
    env: &'index mut Env,
    query: TypeId,
    cells: std::vec::IntoIter<&'index Cell>,
}

impl<'index> Iterator for Matches<'index> {
    type Item = (TypeId, &'index Cell, Subst);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cell = self.cells.next()?;
            if let Some(subst) = unifier::unify(self.env, self.query, cell.ty()) {
                return Some((cell.ty(), cell, subst));
            }
        }
    }
}
