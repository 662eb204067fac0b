// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nodes owning named plugs, and their textual serialisation.

use crate::any::AnyPlug;
use crate::flags::PlugFlag;
use crate::parse::{ParseError, PlugParser};
use crate::plug::{CompoundNumericPlug, PlugId};
use crate::repr::{LiteralRenderer, ReprError, ReprGenerator};
use crate::value::CompoundValue;
use indexmap::IndexMap;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A graph node and the plugs it owns
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Plugs by name, in creation order
    plugs: IndexMap<String, AnyPlug>,
}

impl Node {
    /// Create a node with no plugs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            plugs: IndexMap::new(),
        }
    }

    /// Add a plug. Names must be unique among siblings.
    pub fn add_plug(&mut self, plug: impl Into<AnyPlug>) -> Result<PlugId, NodeError> {
        let plug = plug.into();
        if self.plugs.contains_key(plug.name()) {
            return Err(NodeError::DuplicatePlug(plug.name().to_string()));
        }
        let id = plug.id();
        tracing::debug!(node = %self.name, plug = plug.name(), kind = ?plug.kind(), "added plug");
        self.plugs.insert(plug.name().to_string(), plug);
        Ok(id)
    }

    /// Remove a plug, keeping the order of the others
    pub fn remove_plug(&mut self, name: &str) -> Option<AnyPlug> {
        let plug = self.plugs.shift_remove(name)?;
        tracing::debug!(node = %self.name, plug = name, "removed plug");
        Some(plug)
    }

    /// Rename a plug in place.
    ///
    /// This is the only way to rename a plug a node owns; mutable access
    /// through [`Node::get_mut`] cannot change the name:
    ///
    /// ```compile_fail
    /// use ordoplay_editor_plug::{Node, V3fPlug};
    ///
    /// let mut node = Node::new("n");
    /// node.add_plug(V3fPlug::named("a")).unwrap();
    /// node.get_mut("a").unwrap().set_name("b");
    /// ```
    pub fn rename_plug(&mut self, old: &str, new: impl Into<String>) -> Result<(), NodeError> {
        let new = new.into();
        if old == new {
            return Ok(());
        }
        if self.plugs.contains_key(&new) {
            return Err(NodeError::DuplicatePlug(new));
        }
        let (index, _, mut plug) = self
            .plugs
            .shift_remove_full(old)
            .ok_or_else(|| NodeError::PlugNotFound(old.to_string()))?;
        plug.set_name(new.clone());
        self.plugs.shift_insert(index, new, plug);
        Ok(())
    }

    /// Get a plug by name
    pub fn get(&self, name: &str) -> Option<&AnyPlug> {
        self.plugs.get(name)
    }

    /// Get a mutable plug by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnyPlug> {
        self.plugs.get_mut(name)
    }

    /// Get a typed plug by name
    pub fn plug<V: CompoundValue>(&self, name: &str) -> Option<&CompoundNumericPlug<V>> {
        self.get(name)?.downcast_ref()
    }

    /// Get a mutable typed plug by name
    pub fn plug_mut<V: CompoundValue>(
        &mut self,
        name: &str,
    ) -> Option<&mut CompoundNumericPlug<V>> {
        self.get_mut(name)?.downcast_mut()
    }

    /// Get all plugs
    pub fn plugs(&self) -> impl Iterator<Item = &AnyPlug> {
        self.plugs.values()
    }

    /// Get the number of plugs
    pub fn plug_count(&self) -> usize {
        self.plugs.len()
    }

    /// Write one constructor expression per line for every serialisable plug.
    ///
    /// Plugs flagged [`PlugFlag::NonSerialisable`] are skipped. Current
    /// values are not written.
    pub fn serialise<R: LiteralRenderer>(
        &self,
        generator: &ReprGenerator<R>,
    ) -> Result<String, ReprError> {
        let mut script = String::new();
        for plug in self.plugs.values() {
            if plug.flags().contains(PlugFlag::NonSerialisable) {
                tracing::trace!(
                    node = %self.name,
                    plug = plug.name(),
                    "skipping non-serialisable plug"
                );
                continue;
            }
            script.push_str(&generator.repr_any(plug)?);
            script.push('\n');
        }
        tracing::debug!(node = %self.name, plugs = self.plugs.len(), "serialised node");
        Ok(script)
    }

    /// Rebuild a node from text written by [`Node::serialise`].
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_script(
        name: impl Into<String>,
        script: &str,
        parser: &PlugParser,
    ) -> Result<Self, NodeError> {
        let mut node = Self::new(name);
        for (index, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let plug = parser.parse(line).map_err(|source| NodeError::Script {
                line: index + 1,
                source,
            })?;
            node.add_plug(plug)?;
        }
        Ok(node)
    }
}

/// Error when editing a node's plugs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeError {
    /// A sibling already has this name
    #[error("Plug already exists: {0:?}")]
    DuplicatePlug(String),

    /// No plug with this name
    #[error("Plug not found: {0:?}")]
    PlugNotFound(String),

    /// A script line failed to parse
    #[error("Script line {line}: {source}")]
    Script {
        /// 1-based line number
        line: usize,
        /// Parse failure
        source: ParseError,
    },
}
