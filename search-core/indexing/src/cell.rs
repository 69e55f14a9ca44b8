use serde::{Deserialize, Serialize};
use terms::{Path, TypeId};

/// A qualified name paired with its canonical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub path: Path,
    pub ty: TypeId,
}

/// A leaf bucket grouping the entries that share one canonical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    ty: TypeId,
    entries: Vec<Info>,
}

impl Cell {
    pub(crate) fn new(ty: TypeId) -> Cell {
        Cell { ty, entries: vec![] }
    }

    pub(crate) fn add(&mut self, info: Info) {
        debug_assert_eq!(info.ty, self.ty);
        if !self.entries.iter().any(|existing| existing.path == info.path) {
            self.entries.push(info);
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn entries(&self) -> &[Info] {
        &self.entries
    }

    /// The entries worth showing, re-exports collapsed onto readable
    /// representatives: internal paths (any segment carrying `__`) are
    /// pruned when a public path exists, and the rest are ordered by the
    /// humanised path comparison.
    pub fn visible_entries(&self) -> Vec<&Info> {
        let any_public = self.entries.iter().any(|info| !info.path.is_internal());
        let mut visible: Vec<&Info> = self
            .entries
            .iter()
            .filter(|info| !any_public || !info.path.is_internal())
            .collect();
        visible.sort_by(|a, b| a.path.humanised_cmp(&b.path));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Info};
    use terms::Env;

    #[test]
    fn test_duplicate_paths_collapse() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);
        let mut cell = Cell::new(int);

        cell.add(Info { path: "Base.succ".parse().unwrap(), ty: int });
        cell.add(Info { path: "Base.succ".parse().unwrap(), ty: int });

        assert_eq!(cell.entries().len(), 1);
    }

    #[test]
    fn test_internal_paths_pruned_when_public_exists() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);
        let mut cell = Cell::new(int);

        cell.add(Info { path: "Base.Base__List.length".parse().unwrap(), ty: int });
        cell.add(Info { path: "Base.List.length".parse().unwrap(), ty: int });

        let visible = cell.visible_entries();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].path.to_string(), "Base.List.length");
    }

    #[test]
    fn test_internal_paths_survive_alone() {
        let mut env = Env::new();
        let int = env.constr("int".parse().unwrap(), vec![]);
        let mut cell = Cell::new(int);

        cell.add(Info { path: "Base.Base__List.length".parse().unwrap(), ty: int });

        assert_eq!(cell.visible_entries().len(), 1);
    }
}
