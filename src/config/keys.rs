//! Key forms.
//!
//! Keys are plain strings in the tree. A [`Symbol`] is the same key text typed as a
//! symbol rather than a string, so `db_host`, `dbHost` and `Content-Type` stay
//! three distinct keys in either form and no two keys can ever collide.
//!
//! [`Key`] carries either form into a lookup, and [`Indifferent`] is a read-only
//! view that accepts both while leaving the underlying keys untouched.

use std::fmt;

/// A key in symbol form. Holds the key text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A tree node that can be walked by key.
pub trait Node {
    /// Child under exactly `key`, if this node is a mapping.
    fn child(&self, key: &str) -> Option<&Self>;
}

impl Node for serde_json::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }
}

/// A lookup key in string or symbol form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'k> {
    Str(&'k str),
    Sym(&'k Symbol),
}

impl<'k> Key<'k> {
    /// The key text, identical in both forms.
    pub fn text(&self) -> &'k str {
        match self {
            Key::Str(key) => key,
            Key::Sym(symbol) => symbol.as_str(),
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Key::Sym(_))
    }
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(key: &'k str) -> Self {
        Key::Str(key)
    }
}

impl<'k> From<&'k String> for Key<'k> {
    fn from(key: &'k String) -> Self {
        Key::Str(key)
    }
}

impl<'k> From<&'k Symbol> for Key<'k> {
    fn from(key: &'k Symbol) -> Self {
        Key::Sym(key)
    }
}

/// View over a tree where the string and symbol form of a key are interchangeable.
#[derive(Debug)]
pub struct Indifferent<'a, N> {
    node: &'a N,
}

impl<N> Clone for Indifferent<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Indifferent<'_, N> {}

impl<'a, N: Node> Indifferent<'a, N> {
    pub fn new(node: &'a N) -> Self {
        Self { node }
    }

    /// The underlying node.
    pub fn node(&self) -> &'a N {
        self.node
    }

    /// Look up a child by string or symbol. Both forms reach the same key.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Option<Indifferent<'a, N>> {
        self.node.child(key.into().text()).map(Indifferent::new)
    }

    /// Walk a path of keys.
    pub fn path<'k, K>(&self, keys: &[K]) -> Option<Indifferent<'a, N>>
    where
        K: Copy + Into<Key<'k>>,
    {
        keys.iter().try_fold(*self, |view, key| view.get(*key))
    }
}
