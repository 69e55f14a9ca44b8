//! The canonical term representation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Path;

/// Globally unique identity for a type variable.
///
/// Identity is the generated integer; the display name is metadata kept by
/// the owning [`Env`](crate::Env).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub u32);

/// The shape of a term's outermost node. The derived order is the tie-break
/// used by the structural comparison across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Var,
    Constr,
    Arrow,
    Tuple,
    Other,
}

impl Kind {
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

/// A canonical type term.
///
/// Terms only exist behind [`TypeId`] handles interned by an
/// [`Env`](crate::Env); all construction goes through the smart constructors
/// there, so an interned term always satisfies:
///
/// - arrow arguments and tuple elements are sorted by the structural order;
/// - no arrow returns an arrow, and no arrow argument is a tuple (tupled and
///   curried arguments are flattened into one multiset);
/// - no tuple contains a tuple, and no one-element tuple exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ty {
    Var(VarId),
    Constr(Path, Arc<[TypeId]>),
    Arrow(Arc<[TypeId]>, TypeId),
    Tuple(Arc<[TypeId]>),
    Other(u64),
}

impl Ty {
    pub fn kind(&self) -> Kind {
        match self {
            Ty::Var(_) => Kind::Var,
            Ty::Constr(_, _) => Kind::Constr,
            Ty::Arrow(_, _) => Kind::Arrow,
            Ty::Tuple(_) => Kind::Tuple,
            Ty::Other(_) => Kind::Other,
        }
    }
}

pub type TypeId = interner::Id<Ty>;

pub type TyInterner = interner::Interner<Ty>;
