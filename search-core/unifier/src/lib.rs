//! Multiset-aware unification over canonical terms.
//!
//! The engine treats an arrow's arguments as an unordered multiset, so a
//! query written in curried form matches entries written in tupled form and
//! vice versa. Because grouping choices multiply, a pair of terms can have
//! many unifiers; [`unifiers`] streams all of them and [`unify`] returns the
//! most specific one.

mod engine;
mod subst;

pub use engine::{Unifiers, unifiable, unifiers, unify};
pub use subst::Subst;
