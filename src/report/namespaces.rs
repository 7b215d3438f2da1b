//! Prefix bindings for compact name rendering.
//!
//! Each [`ValidationGraph`](super::graph::ValidationGraph) owns its own table,
//! so independent parses never see each other's bindings.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamespaceTable {
    bindings: IndexMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `namespace`, replacing any earlier binding of the prefix.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        // Re-binding moves the prefix to the end so it wins ties in `compact`.
        self.bindings.shift_remove(&prefix);
        self.bindings.insert(prefix, namespace.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(prefix, ns)| (prefix.as_str(), ns.as_str()))
    }

    /// Renders `iri` as `prefix:local` using the longest matching namespace.
    ///
    /// Returns the IRI unchanged when no binding yields a usable local name.
    /// A binding for the empty prefix renders the bare local name.
    pub fn compact(&self, iri: &str) -> String {
        let mut best: Option<(&str, &str, usize)> = None;
        for (prefix, namespace) in &self.bindings {
            if namespace.is_empty() {
                continue;
            }
            let Some(local) = iri.strip_prefix(namespace.as_str()) else {
                continue;
            };
            if !is_local_name(local) {
                continue;
            }
            if best.is_none_or(|(_, _, len)| namespace.len() >= len) {
                best = Some((prefix.as_str(), local, namespace.len()));
            }
        }

        match best {
            Some(("", local, _)) => local.to_string(),
            Some((prefix, local, _)) => format!("{prefix}:{local}"),
            None => iri.to_string(),
        }
    }
}

fn is_local_name(local: &str) -> bool {
    !local.is_empty()
        && !local
            .chars()
            .any(|c| matches!(c, '/' | '#' | ':' | '?') || c.is_whitespace())
}
