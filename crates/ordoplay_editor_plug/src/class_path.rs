// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plug variants and the class paths used to reconstruct them.

use serde::{Deserialize, Serialize};

/// Concrete plug variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlugKind {
    /// 2D float vector plug
    V2f,
    /// 3D float vector plug
    V3f,
    /// 2D integer vector plug
    V2i,
    /// 3D integer vector plug
    V3i,
    /// RGB color plug
    Color3f,
    /// RGBA color plug
    Color4f,
}

impl PlugKind {
    /// Get all plug variants
    pub fn all() -> &'static [PlugKind] {
        &[
            PlugKind::V2f,
            PlugKind::V3f,
            PlugKind::V2i,
            PlugKind::V3i,
            PlugKind::Color3f,
            PlugKind::Color4f,
        ]
    }

    /// Unqualified plug type name, also the default plug name
    pub fn plug_type_name(&self) -> &'static str {
        match self {
            PlugKind::V2f => "V2fPlug",
            PlugKind::V3f => "V3fPlug",
            PlugKind::V2i => "V2iPlug",
            PlugKind::V3i => "V3iPlug",
            PlugKind::Color3f => "Color3fPlug",
            PlugKind::Color4f => "Color4fPlug",
        }
    }

    /// Unqualified name of the value literal for this variant
    pub fn value_type_name(&self) -> &'static str {
        match self {
            PlugKind::V2f => "V2f",
            PlugKind::V3f => "V3f",
            PlugKind::V2i => "V2i",
            PlugKind::V3i => "V3i",
            PlugKind::Color3f => "Color3f",
            PlugKind::Color4f => "Color4f",
        }
    }
}

/// Maps plug variants to dotted class paths and back.
///
/// With no module configured the class path is the bare type name
/// (`V3fPlug`); otherwise it is qualified (`Gaffer.V3fPlug`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPathResolver {
    module: Option<String>,
}

impl ClassPathResolver {
    /// Create a resolver emitting bare type names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver qualifying type names with `module`
    pub fn with_module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
        }
    }

    /// The configured module prefix
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Class path for a plug variant
    pub fn class_path(&self, kind: PlugKind) -> String {
        qualify(self.module.as_deref(), kind.plug_type_name())
    }

    /// Find the plug variant named by `path`.
    ///
    /// Accepts the bare type name, or the name qualified with exactly the
    /// configured module.
    pub fn resolve(&self, path: &str) -> Option<PlugKind> {
        let name = strip_module(self.module.as_deref(), path)?;
        PlugKind::all()
            .iter()
            .copied()
            .find(|kind| kind.plug_type_name() == name)
    }
}

pub(crate) fn qualify(module: Option<&str>, name: &str) -> String {
    match module {
        Some(module) => format!("{module}.{name}"),
        None => name.to_string(),
    }
}

pub(crate) fn strip_module<'a>(module: Option<&str>, path: &'a str) -> Option<&'a str> {
    if !path.contains('.') {
        return Some(path);
    }
    path.strip_prefix(module?)?.strip_prefix('.')
}
