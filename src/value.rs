//! The document model. Every parsed thing is a value node holding an ordered
//! run of elements; nodes live in an arena and refer to each other by index,
//! so substitution targets can legally form cycles without any ownership
//! hazards. Reassigning a key never overwrites a node, it allocates a new one
//! whose `shadowed` link points at the value being replaced, which is how
//! override history survives for the merge-on-reassignment walk.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::duration;
use crate::error::{Error, Result};
use crate::mem;

/// Index of a value node in its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(pub(crate) usize);

/// Index of a substitution in the tree's flat substitution table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SubId(pub(crate) usize);

#[derive(Clone, Debug)]
pub(crate) enum Element {
    Literal(String),
    Array(Vec<ValueId>),
    Object(Object),
    Substitution(SubId),
}

/// Insertion ordered key to value mapping. Reassigning an existing key keeps
/// its position, fresh keys append at the end.
#[derive(Clone, Debug, Default)]
pub(crate) struct Object {
    entries: IndexMap<String, ValueId>,
}

impl Object {
    pub(crate) fn get(&self, key: &str) -> Option<ValueId> {
        self.entries.get(key).copied()
    }

    pub(crate) fn insert(&mut self, key: String, value: ValueId) {
        self.entries.insert(key, value);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn entries_vec(&self) -> Vec<(String, ValueId)> {
        self.entries.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// A deferred reference by dotted path. `resolved` starts empty and is
/// written by the resolution pass, either to a location in the finished tree
/// or to a fresh literal holding an environment variable.
#[derive(Clone, Debug)]
pub struct Substitution {
    pub(crate) path: String,
    pub(crate) original_path: String,
    pub(crate) optional: bool,
    pub(crate) resolved: Option<ValueId>,
}

impl Substitution {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path text as written in the source, before include processing
    /// rewrote it to be absolute. Environment fallback is keyed by this.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ValueNode {
    pub(crate) elements: Vec<Element>,
    pub(crate) shadowed: Option<ValueId>,
}

/// Substitution indirection outcome: either the element itself, or a whole
/// value the element reads through to (the value its key held before the
/// current assignment, which is what makes `a += x` see the previous
/// contents of `a`).
enum View<'a> {
    El(&'a Element),
    Val(ValueId),
}

/// The arena. Owns every value node and the flat substitution table of the
/// document, including nodes grafted in from included documents.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tree {
    values: Vec<ValueNode>,
    substitutions: Vec<Substitution>,
}

impl Tree {
    pub(crate) fn push_value(&mut self, elements: Vec<Element>, shadowed: Option<ValueId>) -> ValueId {
        self.values.push(ValueNode { elements, shadowed });
        ValueId(self.values.len() - 1)
    }

    pub(crate) fn push_substitution(&mut self, path: String, optional: bool) -> SubId {
        self.substitutions.push(Substitution {
            original_path: path.clone(),
            path,
            optional,
            resolved: None,
        });
        SubId(self.substitutions.len() - 1)
    }

    pub(crate) fn node(&self, id: ValueId) -> &ValueNode {
        &self.values[id.0]
    }

    fn node_mut(&mut self, id: ValueId) -> &mut ValueNode {
        &mut self.values[id.0]
    }

    pub(crate) fn sub(&self, id: SubId) -> &Substitution {
        &self.substitutions[id.0]
    }

    pub(crate) fn sub_mut(&mut self, id: SubId) -> &mut Substitution {
        &mut self.substitutions[id.0]
    }

    pub(crate) fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    pub(crate) fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    pub(crate) fn clear(&mut self, id: ValueId) {
        self.node_mut(id).elements.clear();
    }

    pub(crate) fn append(&mut self, id: ValueId, element: Element) {
        self.node_mut(id).elements.push(element);
    }

    /// Replace the node's contents with a single empty object unless it
    /// already holds one directly. The shadow link stays intact, so the
    /// merge-on-reassignment walk still sees the replaced value.
    pub(crate) fn ensure_object(&mut self, id: ValueId) {
        if self.direct_object(id).is_none() {
            self.node_mut(id).elements = vec![Element::Object(Object::default())];
        }
    }

    /// The object held directly as the node's first element, without
    /// substitution indirection. Mutation is only legal on direct objects.
    fn direct_object(&self, id: ValueId) -> Option<&Object> {
        match self.node(id).elements.first() {
            Some(Element::Object(o)) => Some(o),
            _ => None,
        }
    }

    fn direct_object_mut(&mut self, id: ValueId) -> Result<&mut Object> {
        match self.node_mut(id).elements.first_mut() {
            Some(Element::Object(o)) => Ok(o),
            _ => Err(Error::NotAnObject),
        }
    }

    /// Look a key up in the node's direct object, allocating a fresh node for
    /// it. An existing key keeps its position in the order and the fresh node
    /// shadows the value being replaced.
    pub(crate) fn get_or_create_key(&mut self, owner: ValueId, key: &str) -> Result<ValueId> {
        let existing = self.direct_object(owner).and_then(|o| o.get(key));
        let value = self.push_value(Vec::new(), existing);
        self.direct_object_mut(owner)?.insert(key.to_string(), value);
        Ok(value)
    }

    /// A substitution that resolves back to its own key (the wrapped
    /// reference `+=` plants, or `a = ${a}` after `a` was reassigned) reads
    /// the value that key held before the current assignment. The same
    /// applies to a substitution left unresolved, so `a = ${?missing}` keeps
    /// a previous value of `a` alive. Everything else reads its element as
    /// is, the resolved target included.
    fn top_value_of_sub<'a>(&'a self, owner: ValueId, element: &'a Element) -> View<'a> {
        if let Element::Substitution(sid) = element {
            let sub = self.sub(*sid);
            let self_reference = match sub.resolved {
                Some(target) => self.shadow_chain_contains(target, owner),
                None => true,
            };
            if self_reference {
                if let Some(old) = self.node(owner).shadowed {
                    return View::Val(old);
                }
            }
        }
        View::El(element)
    }

    /// Whether `needle` is `id` or one of its shadowed predecessors.
    fn shadow_chain_contains(&self, id: ValueId, needle: ValueId) -> bool {
        let mut current = id;
        loop {
            if current == needle {
                return true;
            }
            match self.node(current).shadowed {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    // ---- classification ---------------------------------------------------

    /// A value is string valued iff it has elements and every one of them,
    /// after substitution indirection, is string valued.
    pub(crate) fn value_is_string(&self, id: ValueId) -> bool {
        let elements = &self.node(id).elements;
        !elements.is_empty() && elements.iter().all(|el| self.element_is_string(id, el))
    }

    fn element_is_string(&self, owner: ValueId, element: &Element) -> bool {
        match self.top_value_of_sub(owner, element) {
            View::Val(value) => self.value_is_string(value),
            View::El(Element::Literal(_)) => true,
            View::El(Element::Array(_)) | View::El(Element::Object(_)) => false,
            View::El(Element::Substitution(sid)) => match self.sub(*sid).resolved {
                None => false,
                Some(target) => !self.has_cycle(*sid) && self.value_is_string(target),
            },
        }
    }

    /// A value is array valued iff at least one element, after substitution
    /// indirection, is array valued.
    pub(crate) fn value_is_array(&self, id: ValueId) -> bool {
        self.node(id).elements.iter().any(|el| self.element_is_array(id, el))
    }

    fn element_is_array(&self, owner: ValueId, element: &Element) -> bool {
        match self.top_value_of_sub(owner, element) {
            View::Val(value) => self.value_is_array(value),
            View::El(Element::Array(_)) => true,
            View::El(Element::Literal(_)) | View::El(Element::Object(_)) => false,
            View::El(Element::Substitution(sid)) => match self.sub(*sid).resolved {
                None => false,
                Some(target) => !self.has_cycle(*sid) && self.value_is_array(target),
            },
        }
    }

    pub(crate) fn value_is_object(&self, id: ValueId) -> bool {
        matches!(self.value_object(id), Ok(Some(_)))
    }

    /// The object a value reads as: its first element, following substitution
    /// indirection. `Ok(None)` means "not an object", a cycle on the way is a
    /// hard error for the caller to swallow or surface.
    pub(crate) fn value_object(&self, id: ValueId) -> Result<Option<&Object>> {
        let Some(first) = self.node(id).elements.first() else {
            return Ok(None);
        };
        match self.top_value_of_sub(id, first) {
            View::Val(value) => self.value_object(value),
            View::El(Element::Object(object)) => Ok(Some(object)),
            View::El(Element::Substitution(sid)) => match self.sub(*sid).resolved {
                None => Ok(None),
                Some(target) => {
                    self.check_cycle(*sid)?;
                    self.value_object(target)
                }
            },
            View::El(_) => Ok(None),
        }
    }

    pub(crate) fn value_is_empty(&self, id: ValueId) -> bool {
        let elements = &self.node(id).elements;
        match elements.first() {
            None => true,
            Some(Element::Object(o)) => o.is_empty(),
            Some(_) => false,
        }
    }

    fn kind_name(&self, id: ValueId) -> &'static str {
        if self.node(id).elements.is_empty() {
            "empty"
        } else if self.value_is_string(id) {
            "string"
        } else if self.value_is_object(id) {
            "object"
        } else if self.value_is_array(id) {
            "array"
        } else {
            "unresolved"
        }
    }

    // ---- cycle detection --------------------------------------------------

    fn check_cycle(&self, sid: SubId) -> Result<()> {
        if self.has_cycle(sid) {
            Err(Error::CycleDetected(self.sub(sid).path.clone()))
        } else {
            Ok(())
        }
    }

    /// Walk the resolved target chain carrying the depth each value was first
    /// seen at. Revisiting a value at a different depth means the chain loops
    /// through itself; revisiting at the same depth is harmless sharing.
    fn has_cycle(&self, sid: SubId) -> bool {
        self.walk_cycle(sid, &mut HashMap::new(), 1)
    }

    fn walk_cycle(&self, sid: SubId, seen: &mut HashMap<ValueId, usize>, level: usize) -> bool {
        let Some(target) = self.sub(sid).resolved else {
            return false;
        };
        if let Some(&first_seen) = seen.get(&target) {
            if first_seen != level {
                return true;
            }
        }
        seen.insert(target, level);
        for element in &self.node(target).elements {
            if let Element::Substitution(next) = element {
                if self.sub(*next).resolved.is_some() {
                    return self.walk_cycle(*next, seen, level + 1);
                }
            }
        }
        false
    }

    // ---- extraction -------------------------------------------------------

    /// Concatenate the string forms of all elements, collapse a literal
    /// `null` to the empty string and trim the result.
    pub(crate) fn value_get_string(&self, id: ValueId) -> Result<String> {
        let mut concat = String::new();
        for element in &self.node(id).elements {
            concat.push_str(&self.element_get_string(id, element)?);
        }
        if concat == "null" {
            concat.clear();
        }
        Ok(concat.trim().to_string())
    }

    fn element_get_string(&self, owner: ValueId, element: &Element) -> Result<String> {
        match self.top_value_of_sub(owner, element) {
            View::Val(value) => self.value_get_string(value),
            View::El(Element::Literal(text)) => Ok(text.clone()),
            View::El(Element::Array(_)) => Err(Error::TypeMismatch {
                expected: "string",
                actual: "array",
            }),
            View::El(Element::Object(_)) => Err(Error::TypeMismatch {
                expected: "string",
                actual: "object",
            }),
            View::El(Element::Substitution(sid)) => match self.sub(*sid).resolved {
                None => Ok(String::new()),
                Some(target) => {
                    self.check_cycle(*sid)?;
                    self.value_get_string(target)
                }
            },
        }
    }

    /// All array valued elements concatenated in order; this is how repeated
    /// `+=` appends compose into one array.
    pub(crate) fn value_get_array(&self, id: ValueId) -> Result<Vec<ValueId>> {
        if !self.value_is_array(id) {
            return Err(Error::TypeMismatch {
                expected: "array",
                actual: self.kind_name(id),
            });
        }
        let mut items = Vec::new();
        for element in &self.node(id).elements {
            self.element_collect_array(id, element, &mut items)?;
        }
        Ok(items)
    }

    fn element_collect_array(&self, owner: ValueId, element: &Element, out: &mut Vec<ValueId>) -> Result<()> {
        match self.top_value_of_sub(owner, element) {
            View::Val(value) => {
                if self.value_is_array(value) {
                    out.extend(self.value_get_array(value)?);
                }
            }
            View::El(Element::Array(items)) => out.extend(items.iter().copied()),
            View::El(Element::Substitution(sid)) => {
                if let Some(target) = self.sub(*sid).resolved {
                    self.check_cycle(*sid)?;
                    if self.value_is_array(target) {
                        out.extend(self.value_get_array(target)?);
                    }
                }
            }
            View::El(_) => {}
        }
        Ok(())
    }

    pub(crate) fn value_child(&self, id: ValueId, key: &str) -> Result<Option<ValueId>> {
        Ok(self.value_object(id)?.and_then(|o| o.get(key)))
    }

    // ---- merge engine -----------------------------------------------------

    /// `value_object` with cycle errors swallowed; the merge engine is
    /// cycle oblivious and leaves cycle errors to extraction time.
    fn object_for_merge(&self, id: ValueId) -> Option<&Object> {
        self.value_object(id).ok().flatten()
    }

    /// Splice `src`'s keys into `dst` in place. Keys absent from `dst` are
    /// appended in `src`'s relative order, keys present in both recurse when
    /// both sides are object valued and otherwise keep `dst`'s value:
    /// first-writer-wins on scalar conflicts, recursive combination on object
    /// conflicts. A `src` that is not object valued is a no-op. The recursion
    /// only descends into objects `dst` holds directly, a value that is
    /// object valued through a substitution is kept as is rather than
    /// mutating the referenced target.
    pub(crate) fn merge_objects(&mut self, dst: ValueId, src: ValueId) -> Result<()> {
        let src_entries = match self.object_for_merge(src) {
            Some(object) => object.entries_vec(),
            None => return Ok(()),
        };
        if self.direct_object(dst).is_none() {
            return Err(Error::NotAnObject);
        }
        for (key, src_value) in src_entries {
            let existing = self.direct_object(dst).and_then(|o| o.get(&key));
            match existing {
                None => {
                    self.direct_object_mut(dst)?.insert(key, src_value);
                }
                Some(dst_value) => {
                    if self.direct_object(dst_value).is_some() && self.object_for_merge(src_value).is_some() {
                        self.merge_objects(dst_value, src_value)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Same splice, but building fresh nodes instead of touching either
    /// input. Returns the object valued node holding the merge result.
    pub(crate) fn merge_objects_immutable(&mut self, dst: ValueId, src: ValueId) -> Result<ValueId> {
        let mut entries = match self.object_for_merge(dst) {
            Some(object) => object.entries.clone(),
            None => IndexMap::new(),
        };
        let src_entries = self.object_for_merge(src).map(|o| o.entries_vec());
        if let Some(src_entries) = src_entries {
            for (key, src_value) in src_entries {
                match entries.get(&key).copied() {
                    None => {
                        entries.insert(key, src_value);
                    }
                    Some(dst_value) => {
                        if self.object_for_merge(dst_value).is_some() && self.object_for_merge(src_value).is_some() {
                            let merged = self.merge_objects_immutable(dst_value, src_value)?;
                            entries.insert(key, merged);
                        }
                    }
                }
            }
        }
        Ok(self.push_value(vec![Element::Object(Object { entries })], None))
    }

    /// Copy another tree's nodes into this arena, remapping every index and
    /// prefixing substitution paths so they stay absolute from this
    /// document's root. Returns the remapped id of `other_root`.
    pub(crate) fn graft(&mut self, other: &Tree, other_root: ValueId, path_prefix: &str) -> ValueId {
        let value_base = self.values.len();
        let sub_base = self.substitutions.len();

        for node in &other.values {
            let mut node = node.clone();
            node.shadowed = node.shadowed.map(|v| ValueId(v.0 + value_base));
            for element in &mut node.elements {
                match element {
                    Element::Array(items) => {
                        for item in items {
                            item.0 += value_base;
                        }
                    }
                    Element::Object(object) => {
                        for (_, value) in object.entries.iter_mut() {
                            value.0 += value_base;
                        }
                    }
                    Element::Substitution(sid) => sid.0 += sub_base,
                    Element::Literal(_) => {}
                }
            }
            self.values.push(node);
        }

        for sub in &other.substitutions {
            let mut sub = sub.clone();
            if !path_prefix.is_empty() {
                sub.path = format!("{}.{}", path_prefix, sub.path);
            }
            sub.resolved = sub.resolved.map(|v| ValueId(v.0 + value_base));
            self.substitutions.push(sub);
        }

        ValueId(other_root.0 + value_base)
    }

    // ---- rendering --------------------------------------------------------

    pub(crate) fn render_value(&self, id: ValueId, indent: usize) -> Result<String> {
        if self.value_is_string(id) {
            return Ok(quote_if_needed(&self.value_get_string(id)?));
        }
        if self.value_is_object(id) {
            let inner = self.render_object_entries(id, indent + 1)?;
            return Ok(format!("{{\r\n{}{}}}", inner, "  ".repeat(indent)));
        }
        if self.value_is_array(id) {
            let rendered: Vec<String> = self
                .value_get_array(id)?
                .into_iter()
                .map(|item| self.render_value(item, indent + 1))
                .collect::<Result<_>>()?;
            return Ok(format!("[{}]", rendered.join(",")));
        }
        if self.value_is_empty(id) {
            return Ok(String::new());
        }
        Ok("<<unknown value>>".to_string())
    }

    fn render_object_entries(&self, id: ValueId, indent: usize) -> Result<String> {
        let entries = match self.value_object(id)? {
            Some(object) => object.entries_vec(),
            None => return Ok(String::new()),
        };
        let pad = "  ".repeat(indent);
        let mut buf = String::new();
        for (key, value) in entries {
            buf.push_str(&pad);
            buf.push_str(&quote_key_if_needed(&key));
            buf.push_str(" : ");
            buf.push_str(&self.render_value(value, indent)?);
            buf.push_str("\r\n");
        }
        Ok(buf)
    }
}

fn quote_if_needed(text: &str) -> String {
    if text.is_empty() {
        return "\"\"".to_string();
    }
    quote_key_if_needed(text)
}

fn quote_key_if_needed(text: &str) -> String {
    if text.contains(' ') || text.contains('\t') {
        format!("\"{}\"", text)
    } else {
        text.to_string()
    }
}

/// The finished document: the arena plus the root node, carrying the flat
/// substitution list collected during the parse.
#[derive(Clone, Debug)]
pub struct Root {
    pub(crate) tree: Tree,
    pub(crate) root: ValueId,
}

impl Root {
    pub fn value(&self) -> ValueRef<'_> {
        ValueRef {
            tree: &self.tree,
            id: self.root,
        }
    }

    /// Every substitution encountered anywhere in the parse, nested includes
    /// included, with paths rewritten to be absolute from the document root.
    pub fn substitutions(&self) -> &[Substitution] {
        self.tree.substitutions()
    }

    /// Splice `other`'s keys into this document's root object in place.
    /// Existing keys win on scalar conflicts, nested objects combine
    /// recursively; `other` is left untouched.
    pub fn merge(&mut self, other: &Root) -> Result<()> {
        let imported = self.tree.graft(&other.tree, other.root, "");
        self.tree.merge_objects(self.root, imported)
    }

    /// The same combination built as a fresh document, leaving both inputs
    /// untouched.
    pub fn merge_immutable(&self, other: &Root) -> Result<Root> {
        let mut tree = Tree::default();
        let dst = tree.graft(&self.tree, self.root, "");
        let src = tree.graft(&other.tree, other.root, "");
        let root = tree.merge_objects_immutable(dst, src)?;
        Ok(Root { tree, root })
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Read handle on one value node. Type predicates never fail (a cycle on the
/// way reads as `false`), value extraction surfaces cycle and type errors.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) id: ValueId,
}

impl<'a> ValueRef<'a> {
    pub fn is_empty(&self) -> bool {
        self.tree.value_is_empty(self.id)
    }

    pub fn is_string(&self) -> bool {
        self.tree.value_is_string(self.id)
    }

    pub fn is_array(&self) -> bool {
        self.tree.value_is_array(self.id)
    }

    pub fn is_object(&self) -> bool {
        self.tree.value_is_object(self.id)
    }

    pub fn get_string(&self) -> Result<String> {
        self.tree.value_get_string(self.id)
    }

    pub fn get_array(&self) -> Result<Vec<ValueRef<'a>>> {
        let tree = self.tree;
        Ok(tree
            .value_get_array(self.id)?
            .into_iter()
            .map(|id| ValueRef { tree, id })
            .collect())
    }

    pub fn get_object(&self) -> Result<ObjectRef<'a>> {
        match self.tree.value_object(self.id)? {
            Some(_) => Ok(ObjectRef {
                tree: self.tree,
                id: self.id,
            }),
            None => Err(Error::TypeMismatch {
                expected: "object",
                actual: self.tree.kind_name(self.id),
            }),
        }
    }

    /// Child lookup through the value's object form.
    pub fn child(&self, key: &str) -> Result<Option<ValueRef<'a>>> {
        let tree = self.tree;
        Ok(tree.value_child(self.id, key)?.map(|id| ValueRef { tree, id }))
    }

    pub fn get_boolean(&self) -> Result<bool> {
        let text = self.get_string()?;
        match text.to_lowercase().as_str() {
            "on" | "true" | "yes" => Ok(true),
            "off" | "false" | "no" => Ok(false),
            _ => Err(Error::BadBoolean(text)),
        }
    }

    pub fn get_int32(&self) -> Result<i32> {
        Ok(self.get_string()?.parse::<i32>()?)
    }

    pub fn get_int64(&self) -> Result<i64> {
        Ok(self.get_string()?.parse::<i64>()?)
    }

    pub fn get_byte(&self) -> Result<u8> {
        Ok(self.get_string()?.parse::<u8>()?)
    }

    pub fn get_float32(&self) -> Result<f32> {
        Ok(self.get_string()?.parse::<f32>()?)
    }

    pub fn get_float64(&self) -> Result<f64> {
        Ok(self.get_string()?.parse::<f64>()?)
    }

    /// Byte count of a size literal like `128M` or `1kB`; decimal units are
    /// powers of 1000, binary units powers of 1024.
    pub fn get_byte_size(&self) -> Result<u128> {
        mem::parse_byte_size(&self.get_string()?)
    }

    /// Duration of a literal like `5s` or `300ms`; a bare number counts as
    /// milliseconds. `infinite` is only accepted when the caller allows it
    /// and reads as the `Duration::MAX` sentinel.
    pub fn get_time_duration(&self, allow_infinite: bool) -> Result<std::time::Duration> {
        duration::parse_duration(&self.get_string()?, allow_infinite)
    }

    pub fn get_boolean_list(&self) -> Result<Vec<bool>> {
        self.get_array()?.iter().map(|v| v.get_boolean()).collect()
    }

    pub fn get_string_list(&self) -> Result<Vec<String>> {
        self.get_array()?.iter().map(|v| v.get_string()).collect()
    }

    pub fn get_int32_list(&self) -> Result<Vec<i32>> {
        self.get_array()?.iter().map(|v| v.get_int32()).collect()
    }

    pub fn get_int64_list(&self) -> Result<Vec<i64>> {
        self.get_array()?.iter().map(|v| v.get_int64()).collect()
    }

    pub fn get_byte_list(&self) -> Result<Vec<u8>> {
        self.get_array()?.iter().map(|v| v.get_byte()).collect()
    }

    pub fn get_float32_list(&self) -> Result<Vec<f32>> {
        self.get_array()?.iter().map(|v| v.get_float32()).collect()
    }

    pub fn get_float64_list(&self) -> Result<Vec<f64>> {
        self.get_array()?.iter().map(|v| v.get_float64()).collect()
    }

    /// Render back to configuration text: two space indentation per nesting
    /// level, CRLF line endings, keys containing space or tab quoted.
    pub fn render(&self, indent: usize) -> Result<String> {
        self.tree.render_value(self.id, indent)
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render(0) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "cannot render value: {}", err),
        }
    }
}

/// Read handle on an object valued node.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    tree: &'a Tree,
    id: ValueId,
}

impl<'a> ObjectRef<'a> {
    fn object(&self) -> Option<&'a Object> {
        let tree: &'a Tree = self.tree;
        tree.value_object(self.id).ok().flatten()
    }

    /// Keys in insertion order.
    pub fn ordered_keys(&self) -> Vec<String> {
        self.object().map(|o| o.keys().map(str::to_string).collect()).unwrap_or_default()
    }

    pub fn get_key(&self, key: &str) -> Option<ValueRef<'a>> {
        let tree: &'a Tree = self.tree;
        self.object().and_then(|o| o.get(key)).map(|id| ValueRef { tree, id })
    }

    pub fn len(&self) -> usize {
        self.object().map(|o| o.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
