//! Recursive descent over the tokenizer, building the value tree. The parser
//! keeps the in-progress root and registers every substitution it creates in
//! the tree's flat list; `include` directives invoke the caller supplied
//! loader, graft the loaded document into the arena and merge it into the
//! current object scope with the already parsed content winning.

use tracing::debug;

use crate::error::{Error, Result};
use crate::resolve;
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{Element, Root, Tree, ValueId};

/// Loader invoked once per `include` directive, keyed by the quoted path.
/// It may itself recursively invoke [`parse`].
pub type IncludeLoader = dyn Fn(&str) -> Result<Root>;

/// Parse a configuration document. Any error aborts the whole parse; a
/// failed include loader call fails the enclosing parse with it.
pub fn parse(text: &str, loader: Option<&IncludeLoader>) -> Result<Root> {
    parse_with_env(text, loader, &resolve::default_env_lookup)
}

pub(crate) fn parse_with_env(
    text: &str,
    loader: Option<&IncludeLoader>,
    env_lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Root> {
    let mut parser = Parser {
        tokenizer: Tokenizer::new(text),
        tree: Tree::default(),
        loader,
    };
    let root = parser.tree.push_value(Vec::new(), None);

    parser.tokenizer.pull_whitespace_and_comments();
    parser.parse_object(root, true, "")?;
    parser.tokenizer.pull_whitespace_and_comments();
    if !parser.tokenizer.eof() {
        return Err(Error::UnexpectedToken {
            token: "trailing input",
            context: "document root",
        });
    }

    let mut tree = parser.tree;
    resolve::resolve_substitutions(&mut tree, root, env_lookup)?;

    Ok(Root { tree, root })
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    tree: Tree,
    loader: Option<&'a IncludeLoader>,
}

impl<'a> Parser<'a> {
    /// Object body: `key (. key)* (= | : | +=) value` entries, includes, and
    /// the closing brace. With `root` set the loop reads entries until the
    /// scope closes; without it a single key is read (the dotted-key case).
    fn parse_object(&mut self, owner: ValueId, root: bool, current_path: &str) -> Result<()> {
        self.tree.ensure_object(owner);

        // A reassigned key absorbs every key its shadowed predecessors
        // defined and it does not, transitively up the chain. A non object
        // predecessor ends the walk, a scalar assignment resets the history.
        let mut shadowed = self.tree.node(owner).shadowed;
        while let Some(old) = shadowed {
            if !self.tree.value_is_object(old) {
                break;
            }
            self.tree.merge_objects(owner, old)?;
            shadowed = self.tree.node(old).shadowed;
        }

        while !self.tokenizer.eof() {
            let token = self.tokenizer.pull_next()?;
            match token {
                Token::Include(path) => self.parse_include(owner, current_path, &path)?,
                Token::Key(key) => {
                    let value = self.tree.get_or_create_key(owner, &key)?;
                    let next_path = if current_path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", current_path, key)
                    };
                    self.parse_key_content(value, &next_path)?;
                    if !root {
                        return Ok(());
                    }
                }
                Token::ObjectEnd => return Ok(()),
                Token::Eof => return Ok(()),
                // a brace opening the scope we are already in, or a stray
                // separator between entries
                Token::ObjectStart | Token::Comma => {}
                other => {
                    return Err(Error::UnexpectedToken {
                        token: other.name(),
                        context: "object",
                    })
                }
            }
        }
        Ok(())
    }

    fn parse_include(&mut self, owner: ValueId, current_path: &str, path: &str) -> Result<()> {
        debug!(path = %path, "processing include");
        let loader = self.loader.ok_or_else(|| Error::NoIncludeLoader(path.to_string()))?;
        let included = loader(path)?;
        let imported = self.tree.graft(&included.tree, included.root, current_path);
        self.tree.merge_objects(owner, imported)
    }

    fn parse_key_content(&mut self, value: ValueId, current_path: &str) -> Result<()> {
        let token = self.tokenizer.pull_next()?;
        match token {
            Token::Dot => self.parse_object(value, false, current_path),
            Token::Assign => {
                // nested object keys merge on reassignment, everything else
                // starts from a clean value
                if !self.tree.value_is_object(value) {
                    self.tree.clear(value);
                }
                self.parse_value(value, false, current_path)
            }
            Token::PlusAssign => {
                if !self.tree.value_is_object(value) {
                    self.tree.clear(value);
                }
                self.parse_value(value, true, current_path)
            }
            Token::ObjectStart => self.parse_object(value, true, current_path),
            Token::Eof => Ok(()),
            other => Err(Error::UnexpectedToken {
                token: other.name(),
                context: "key content",
            }),
        }
    }

    /// Pull value chunks until the lexer no longer signals a value start,
    /// then consume one trailing comma and newline. An append assignment
    /// first wraps a substitution pointing at the current path, so the final
    /// value reads as "whatever this path already equals, then the rest".
    fn parse_value(&mut self, owner: ValueId, is_append: bool, current_path: &str) -> Result<()> {
        self.tokenizer.pull_whitespace_and_comments();
        if self.tokenizer.eof() {
            return Err(Error::UnexpectedEof);
        }

        if is_append {
            let sid = self.tree.push_substitution(current_path.to_string(), false);
            self.tree.append(owner, Element::Substitution(sid));
        }

        while self.tokenizer.is_value_start() {
            let token = self.tokenizer.pull_value()?;
            match token {
                Token::Literal(text) => {
                    // plain scalars overwrite object content, they never
                    // merge into it
                    if self.tree.value_is_object(owner) {
                        self.tree.clear(owner);
                    }
                    self.tree.append(owner, Element::Literal(text));
                }
                Token::ObjectStart => self.parse_object(owner, true, current_path)?,
                Token::ArrayStart => {
                    let items = self.parse_array(current_path)?;
                    self.tree.append(owner, Element::Array(items));
                }
                Token::Substitution { path, optional } => {
                    let sid = self.tree.push_substitution(path, optional);
                    self.tree.append(owner, Element::Substitution(sid));
                }
                other => {
                    return Err(Error::UnexpectedToken {
                        token: other.name(),
                        context: "value",
                    })
                }
            }

            if self.tokenizer.is_space_or_tab() {
                self.parse_trailing_whitespace(owner);
            }
        }

        self.ignore_comma();
        self.ignore_newline();
        Ok(())
    }

    /// Whitespace between chunks is part of a concatenated string value;
    /// trailing runs are trimmed away again by extraction.
    fn parse_trailing_whitespace(&mut self, owner: ValueId) {
        if let Token::Literal(ws) = self.tokenizer.pull_space_or_tab() {
            if !ws.is_empty() {
                self.tree.append(owner, Element::Literal(ws));
            }
        }
    }

    /// One value per slot until the closing bracket; a slot is a whole value,
    /// so a single element can be a concatenation.
    fn parse_array(&mut self, current_path: &str) -> Result<Vec<ValueId>> {
        let mut items = Vec::new();
        loop {
            self.tokenizer.pull_whitespace_and_comments();
            if self.tokenizer.is_array_end() {
                break;
            }
            if self.tokenizer.eof() {
                return Err(Error::UnterminatedArray);
            }
            let value = self.tree.push_value(Vec::new(), None);
            self.parse_value(value, false, current_path)?;
            items.push(value);
        }
        self.tokenizer.pull_array_end();
        Ok(items)
    }

    fn ignore_comma(&mut self) {
        if self.tokenizer.is_comma() {
            self.tokenizer.pull_comma();
        }
    }

    fn ignore_newline(&mut self) {
        if self.tokenizer.is_newline() {
            self.tokenizer.pull_newline();
        }
    }
}
