//! The typed facade over a parsed document: dotted path getters and layering
//! of whole documents as ordered fallbacks. Getters return `Ok(None)` when
//! the path is missing everywhere, so a default is a plain `unwrap_or` at the
//! call site. All the algorithmic weight stays in the value tree; this module
//! is path walking and delegation.

use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::resolve::split_dotted_path;
use crate::value::{Root, Tree, ValueRef};

#[derive(Clone, Debug)]
pub struct Config {
    root: Root,
    fallback: Option<Box<Config>>,
}

impl Config {
    pub fn from_root(root: Root) -> Config {
        Config { root, fallback: None }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn value(&self) -> ValueRef<'_> {
        self.root.value()
    }

    pub fn is_empty(&self) -> bool {
        self.root.value().is_empty()
    }

    fn local_node(&self, path: &str) -> Result<Option<ValueRef<'_>>> {
        let mut current = self.root.value();
        for key in split_dotted_path(path) {
            match current.child(&key)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Resolve a dotted path against this document, then against each
    /// fallback in order until one has it.
    pub fn get_node(&self, path: &str) -> Result<Option<ValueRef<'_>>> {
        if let Some(node) = self.local_node(path)? {
            return Ok(Some(node));
        }
        match &self.fallback {
            Some(fallback) => fallback.get_node(path),
            None => Ok(None),
        }
    }

    pub fn has_path(&self, path: &str) -> bool {
        matches!(self.get_node(path), Ok(Some(_)))
    }

    pub fn is_object(&self, path: &str) -> bool {
        matches!(self.get_node(path), Ok(Some(node)) if node.is_object())
    }

    pub fn is_array(&self, path: &str) -> bool {
        matches!(self.get_node(path), Ok(Some(node)) if node.is_array())
    }

    pub fn get_string(&self, path: &str) -> Result<Option<String>> {
        self.get_node(path)?.map(|node| node.get_string()).transpose()
    }

    pub fn get_boolean(&self, path: &str) -> Result<Option<bool>> {
        self.get_node(path)?.map(|node| node.get_boolean()).transpose()
    }

    pub fn get_int32(&self, path: &str) -> Result<Option<i32>> {
        self.get_node(path)?.map(|node| node.get_int32()).transpose()
    }

    pub fn get_int64(&self, path: &str) -> Result<Option<i64>> {
        self.get_node(path)?.map(|node| node.get_int64()).transpose()
    }

    pub fn get_byte(&self, path: &str) -> Result<Option<u8>> {
        self.get_node(path)?.map(|node| node.get_byte()).transpose()
    }

    pub fn get_float32(&self, path: &str) -> Result<Option<f32>> {
        self.get_node(path)?.map(|node| node.get_float32()).transpose()
    }

    pub fn get_float64(&self, path: &str) -> Result<Option<f64>> {
        self.get_node(path)?.map(|node| node.get_float64()).transpose()
    }

    pub fn get_byte_size(&self, path: &str) -> Result<Option<u128>> {
        self.get_node(path)?.map(|node| node.get_byte_size()).transpose()
    }

    pub fn get_time_duration(&self, path: &str) -> Result<Option<Duration>> {
        self.get_node(path)?.map(|node| node.get_time_duration(true)).transpose()
    }

    pub fn get_time_duration_infinite_not_allowed(&self, path: &str) -> Result<Option<Duration>> {
        self.get_node(path)?.map(|node| node.get_time_duration(false)).transpose()
    }

    pub fn get_boolean_list(&self, path: &str) -> Result<Option<Vec<bool>>> {
        self.get_node(path)?.map(|node| node.get_boolean_list()).transpose()
    }

    pub fn get_string_list(&self, path: &str) -> Result<Option<Vec<String>>> {
        self.get_node(path)?.map(|node| node.get_string_list()).transpose()
    }

    pub fn get_int32_list(&self, path: &str) -> Result<Option<Vec<i32>>> {
        self.get_node(path)?.map(|node| node.get_int32_list()).transpose()
    }

    pub fn get_int64_list(&self, path: &str) -> Result<Option<Vec<i64>>> {
        self.get_node(path)?.map(|node| node.get_int64_list()).transpose()
    }

    pub fn get_byte_list(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.get_node(path)?.map(|node| node.get_byte_list()).transpose()
    }

    pub fn get_float32_list(&self, path: &str) -> Result<Option<Vec<f32>>> {
        self.get_node(path)?.map(|node| node.get_float32_list()).transpose()
    }

    pub fn get_float64_list(&self, path: &str) -> Result<Option<Vec<f64>>> {
        self.get_node(path)?.map(|node| node.get_float64_list()).transpose()
    }

    /// Sub-document rooted at `path`, with the matching scope of every
    /// fallback layered underneath.
    pub fn get_config(&self, path: &str) -> Result<Option<Config>> {
        let local = self.local_node(path)?.map(|node| {
            Config::from_root(Root {
                tree: self.root.tree.clone(),
                root: node.id,
            })
        });
        let fallback = match &self.fallback {
            Some(fallback) => fallback.get_config(path)?,
            None => None,
        };
        match (local, fallback) {
            (None, None) => Ok(None),
            (None, Some(fallback)) => Ok(Some(fallback)),
            (Some(local), None) => Ok(Some(local)),
            (Some(local), Some(fallback)) => Ok(Some(local.with_fallback(&fallback)?)),
        }
    }

    /// Layer another document underneath this one. The merged snapshot keeps
    /// this document's value on scalar conflicts and combines nested objects
    /// recursively; neither input is touched.
    pub fn with_fallback(&self, fallback: &Config) -> Result<Config> {
        let mut tree = Tree::default();
        let primary = tree.graft(&self.root.tree, self.root.root, "");
        let secondary = tree.graft(&fallback.root.tree, fallback.root.root, "");
        tree.merge_objects(primary, secondary)?;
        Ok(Config {
            root: Root { tree, root: primary },
            fallback: Some(Box::new(fallback.clone())),
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.value())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::parser::parse;

    fn config(text: &str) -> Config {
        Config::from_root(parse(text, None).expect("parse failed"))
    }

    #[test]
    fn getters_resolve_dotted_paths() {
        let config = config("server { port = 8080, host = localhost, secure = off }");
        assert_eq!(config.get_int32("server.port").unwrap(), Some(8080));
        assert_eq!(config.get_string("server.host").unwrap(), Some("localhost".to_string()));
        assert_eq!(config.get_boolean("server.secure").unwrap(), Some(false));
    }

    #[test]
    fn missing_paths_read_as_none() {
        let config = config("a = 1");
        assert_eq!(config.get_int32("no.such.path").unwrap(), None);
        assert_eq!(config.get_int32("no.such.path").unwrap().unwrap_or(42), 42);
        assert!(!config.has_path("no.such.path"));
        assert!(config.has_path("a"));
    }

    #[test]
    fn typed_unit_getters() {
        let config = config("timeout = 5s\nheap = 128M\nidle = infinite");
        assert_eq!(config.get_time_duration("timeout").unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(config.get_byte_size("heap").unwrap(), Some(128 * 1024 * 1024));
        assert_eq!(config.get_time_duration("idle").unwrap(), Some(Duration::MAX));
        assert!(config.get_time_duration_infinite_not_allowed("idle").is_err());
    }

    #[test]
    fn list_getters() {
        let config = config("ports = [8080, 8081]\nflags = [on, off]");
        assert_eq!(config.get_int32_list("ports").unwrap(), Some(vec![8080, 8081]));
        assert_eq!(config.get_boolean_list("flags").unwrap(), Some(vec![true, false]));
    }

    #[test]
    fn shape_probes() {
        let config = config("o { k = 1 }\na = [1]\ns = x");
        assert!(config.is_object("o"));
        assert!(!config.is_object("s"));
        assert!(config.is_array("a"));
        assert!(!config.is_array("o"));
    }

    #[test]
    fn fallback_layering_prefers_the_primary() {
        let primary = config("a = 1\nnested { x = primary }");
        let fallback = config("a = 2\nb = 3\nnested { x = fallback, y = only }");

        let layered = primary.with_fallback(&fallback).unwrap();
        assert_eq!(layered.get_int32("a").unwrap(), Some(1));
        assert_eq!(layered.get_int32("b").unwrap(), Some(3));
        assert_eq!(layered.get_string("nested.x").unwrap(), Some("primary".to_string()));
        assert_eq!(layered.get_string("nested.y").unwrap(), Some("only".to_string()));
    }

    #[test]
    fn fallback_layering_leaves_inputs_untouched() {
        let primary = config("a = 1");
        let fallback = config("a = 2\nb = 3");
        let primary_before = primary.to_string();
        let fallback_before = fallback.to_string();

        let _ = primary.with_fallback(&fallback).unwrap();

        assert_eq!(primary.to_string(), primary_before);
        assert_eq!(fallback.to_string(), fallback_before);
        assert_eq!(fallback.get_int32("a").unwrap(), Some(2));
    }

    #[test]
    fn sub_configs_scope_paths() {
        let config = config("server { port = 1, tls { enabled = true } }");
        let server = config.get_config("server").unwrap().unwrap();
        assert_eq!(server.get_int32("port").unwrap(), Some(1));
        assert_eq!(server.get_boolean("tls.enabled").unwrap(), Some(true));
        assert!(config.get_config("no.such").unwrap().is_none());
    }

    #[test]
    fn display_renders_the_whole_tree() {
        let config = config("a = 1");
        assert_eq!(config.to_string(), "{\r\n  a : 1\r\n}");
    }
}
