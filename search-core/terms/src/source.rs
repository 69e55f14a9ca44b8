//! The external type layout and its conversion into canonical terms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{Env, Path, TypeId, VarId};

/// An order-preserving type expression as produced by the query parser and
/// the library harvester.
///
/// Nothing here is canonical: functions are curried, tuples nest, and
/// variables are identified by name. [`Env::import`] runs an expression
/// through the smart constructors, scoping variable names to the expression,
/// and shapes the index cannot express arrive as [`SourceType::Unsupported`]
/// tokens that only ever match themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceType {
    Variable {
        name: SmolStr,
    },
    Constructor {
        path: Path,
        #[serde(default)]
        arguments: Vec<SourceType>,
    },
    Function {
        argument: Box<SourceType>,
        result: Box<SourceType>,
    },
    Tuple {
        elements: Vec<SourceType>,
    },
    Unsupported {
        hash: u64,
    },
}

impl Env {
    /// Imports an external expression, allocating a fresh variable for each
    /// distinct variable name. Names are scoped to this call: two imports of
    /// `'a -> 'a` produce disjoint variables.
    pub fn import(&mut self, source: &SourceType) -> TypeId {
        let mut scope = FxHashMap::default();
        self.import_scoped(&mut scope, source)
    }

    fn import_scoped(
        &mut self,
        scope: &mut FxHashMap<SmolStr, VarId>,
        source: &SourceType,
    ) -> TypeId {
        match source {
            SourceType::Variable { name } => {
                let var = match scope.get(name) {
                    Some(&var) => var,
                    None => {
                        let var = self.fresh_var(name.clone());
                        scope.insert(name.clone(), var);
                        var
                    }
                };
                self.var(var)
            }
            SourceType::Constructor { path, arguments } => {
                let arguments =
                    arguments.iter().map(|argument| self.import_scoped(scope, argument)).collect();
                self.constr(path.clone(), arguments)
            }
            SourceType::Function { argument, result } => {
                let argument = self.import_scoped(scope, argument);
                let result = self.import_scoped(scope, result);
                self.arrow(argument, result)
            }
            SourceType::Tuple { elements } => {
                let elements =
                    elements.iter().map(|element| self.import_scoped(scope, element)).collect();
                self.tuple(elements)
            }
            SourceType::Unsupported { hash } => self.other(*hash),
        }
    }
}

impl SourceType {
    pub fn variable(name: impl Into<SmolStr>) -> SourceType {
        SourceType::Variable { name: name.into() }
    }

    pub fn constructor(path: Path, arguments: Vec<SourceType>) -> SourceType {
        SourceType::Constructor { path, arguments }
    }

    pub fn function(argument: SourceType, result: SourceType) -> SourceType {
        SourceType::Function { argument: Box::new(argument), result: Box::new(result) }
    }

    pub fn tuple(elements: Vec<SourceType>) -> SourceType {
        SourceType::Tuple { elements }
    }
}
