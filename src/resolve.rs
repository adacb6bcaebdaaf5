//! Substitution resolution. Runs once, after the whole tree is built,
//! includes and all. Every registered substitution binds either to a location
//! in the finished tree or, failing that, to an environment variable named by
//! its original path text; a non optional substitution with neither is an
//! error. Binding is by reference, no copies are made, which is what allows
//! resolution chains and the cycles the extraction layer has to detect.

use std::env;

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::{Element, SubId, Tree, ValueId};

pub(crate) fn resolve_substitutions(
    tree: &mut Tree,
    root: ValueId,
    env_lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<()> {
    for index in 0..tree.substitution_count() {
        let sid = SubId(index);
        let path = tree.sub(sid).path.clone();

        match find_node(tree, root, &path)? {
            Some(target) => {
                trace!(path = %path, "substitution bound in tree");
                tree.sub_mut(sid).resolved = Some(target);
            }
            None => {
                let original = tree.sub(sid).original_path.clone();
                if let Some(text) = env_lookup(&original) {
                    trace!(name = %original, "substitution bound to environment variable");
                    let literal = tree.push_value(vec![Element::Literal(text)], None);
                    tree.sub_mut(sid).resolved = Some(literal);
                } else if !tree.sub(sid).optional {
                    return Err(Error::UnresolvedSubstitution(path));
                }
            }
        }
    }
    Ok(())
}

fn find_node(tree: &Tree, root: ValueId, path: &str) -> Result<Option<ValueId>> {
    let mut current = root;
    for key in split_dotted_path(path) {
        match tree.value_child(current, &key)? {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Split a dotted path into keys, honouring quoted segments that may
/// themselves contain dots.
pub(crate) fn split_dotted_path(path: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for (index, part) in path.split('"').enumerate() {
        if index % 2 == 1 {
            // inside quotes, dots are part of the key
            if !part.is_empty() {
                keys.push(part.to_string());
            }
        } else {
            keys.extend(part.split('.').filter(|s| !s.is_empty()).map(str::to_string));
        }
    }
    keys
}

pub(crate) fn default_env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}
