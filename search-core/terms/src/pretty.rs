//! Renders canonical terms back into the surface syntax.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::{Env, Ty, TypeId};

type Doc<'a> = DocBuilder<'a, Arena<'a>, ()>;

pub struct PrettyConfig {
    pub width: usize,
}

impl Default for PrettyConfig {
    fn default() -> PrettyConfig {
        PrettyConfig { width: 100 }
    }
}

/// Precedence climbs from arrows through tuples to constructor application;
/// a child whose own level is below its context is parenthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Top,
    Argument,
    Element,
    Atom,
}

pub fn print_type(env: &Env, id: TypeId) -> String {
    print_type_with_config(env, id, &PrettyConfig::default())
}

pub fn print_type_with_config(env: &Env, id: TypeId, config: &PrettyConfig) -> String {
    let arena = Arena::new();
    let document = traverse(&arena, env, Level::Top, id);

    let mut output = String::default();
    document.render_fmt(config.width, &mut output).unwrap();
    output
}

fn level(env: &Env, id: TypeId) -> Level {
    match &env[id] {
        Ty::Arrow(_, _) => Level::Top,
        Ty::Tuple(elements) if !elements.is_empty() => Level::Argument,
        Ty::Constr(_, arguments) if !arguments.is_empty() => Level::Element,
        _ => Level::Atom,
    }
}

fn traverse<'a>(arena: &'a Arena<'a>, env: &Env, context: Level, id: TypeId) -> Doc<'a> {
    let document = match &env[id] {
        Ty::Var(var) => arena.text(format!("'{}", env.var_name(*var))),
        Ty::Other(hash) => arena.text(format!("<opaque:{hash:x}>")),
        Ty::Tuple(elements) if elements.is_empty() => arena.text("unit"),
        Ty::Tuple(elements) => {
            let elements =
                elements.iter().map(|&element| traverse(arena, env, Level::Element, element));
            arena
                .intersperse(elements, arena.text(" *").append(arena.line()))
                .group()
        }
        Ty::Constr(path, arguments) => match arguments.len() {
            0 => arena.text(path.to_string()),
            1 => traverse(arena, env, Level::Element, arguments[0])
                .append(arena.space())
                .append(arena.text(path.to_string())),
            _ => {
                let arguments =
                    arguments.iter().map(|&argument| traverse(arena, env, Level::Top, argument));
                arena
                    .text("(")
                    .append(arena.intersperse(arguments, arena.text(",").append(arena.line())))
                    .append(arena.text(")"))
                    .group()
                    .append(arena.space())
                    .append(arena.text(path.to_string()))
            }
        },
        Ty::Arrow(arguments, result) => {
            let parts = arguments
                .iter()
                .map(|&argument| traverse(arena, env, Level::Argument, argument))
                .chain(std::iter::once(traverse(arena, env, Level::Argument, *result)));
            arena
                .intersperse(parts, arena.text(" ->").append(arena.line()))
                .group()
        }
    };

    if level(env, id) < context {
        arena.text("(").append(document).append(arena.text(")"))
    } else {
        document
    }
}
