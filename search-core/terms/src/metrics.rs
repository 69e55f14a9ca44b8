//! Cheap size metrics on canonical terms.
//!
//! The feature extractors and the unifier specificity order are built on
//! these; all of them are linear in the size of the term or better.

use rustc_hash::FxHashSet;

use crate::{Env, Kind, Ty, TypeId};

/// The [`Kind`] of the term's outermost node.
pub fn head_kind(env: &Env, ty: TypeId) -> Kind {
    env[ty].kind()
}

/// Arity of the outer arrow; 0 for non-arrows.
pub fn tail_length(env: &Env, ty: TypeId) -> u32 {
    match &env[ty] {
        Ty::Arrow(arguments, _) => arguments.len() as u32,
        _ => 0,
    }
}

pub fn node_count(env: &Env, ty: TypeId) -> u32 {
    let mut count = 0;
    let mut stack = vec![ty];
    while let Some(id) = stack.pop() {
        count += 1;
        match &env[id] {
            Ty::Var(_) | Ty::Other(_) => {}
            Ty::Constr(_, arguments) => stack.extend(arguments.iter()),
            Ty::Arrow(arguments, result) => {
                stack.push(*result);
                stack.extend(arguments.iter());
            }
            Ty::Tuple(elements) => stack.extend(elements.iter()),
        }
    }
    count
}

/// Number of distinct variables.
pub fn var_count(env: &Env, ty: TypeId) -> u32 {
    let distinct: FxHashSet<_> = env.vars(ty).collect();
    distinct.len() as u32
}

/// Variable occurrences at depth one or less: the term itself, or its
/// immediate children.
pub fn root_var_count(env: &Env, ty: TypeId) -> u32 {
    let is_var = |env: &Env, id: TypeId| matches!(&env[id], Ty::Var(_)) as u32;
    match &env[ty] {
        Ty::Var(_) => 1,
        Ty::Other(_) => 0,
        Ty::Constr(_, arguments) | Ty::Tuple(arguments) => {
            arguments.iter().map(|&argument| is_var(env, argument)).sum()
        }
        Ty::Arrow(arguments, result) => {
            let result = is_var(env, *result);
            arguments.iter().map(|&argument| is_var(env, argument)).sum::<u32>() + result
        }
    }
}

/// Bare-variable elements of the outer arrow's argument multiset.
pub fn tail_root_var_count(env: &Env, ty: TypeId) -> u32 {
    match &env[ty] {
        Ty::Arrow(arguments, _) => arguments
            .iter()
            .filter(|&&argument| matches!(&env[argument], Ty::Var(_)))
            .count() as u32,
        _ => 0,
    }
}
