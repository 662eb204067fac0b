// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical constructor expressions for plugs.
//!
//! A plug renders as a single line such as
//!
//! ```text
//! V2iPlug( "tile", direction = Out, defaultValue = V2i( 1, 1 ), minValue = V2i( 0, 0 ), maxValue = V2i( 64, 64 ), )
//! ```
//!
//! Only attributes that differ from the constructor defaults are written,
//! always in the same order. A plug with every attribute at its default
//! renders as just its class path and name: `V3fPlug( "translate", )`.

use crate::any::AnyPlug;
use crate::class_path::{qualify, ClassPathResolver};
use crate::config::SerialisationConfig;
use crate::plug::CompoundNumericPlug;
use crate::serialiser::PlugSerialiser;
use crate::value::{Component, CompoundValue};
use std::fmt::Write;

/// Renders a compound value as a literal the parser can read back
pub trait LiteralRenderer {
    /// Render `value`
    fn render<V: CompoundValue>(&self, value: &V) -> Result<String, ReprError>;
}

/// Default renderer: `V3f( 1, 0.5, -2 )`, optionally module-qualified.
///
/// Floats use the shortest text that parses back to the same bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentLiteralRenderer {
    module: Option<String>,
}

impl ComponentLiteralRenderer {
    /// Create a renderer emitting bare literal names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer qualifying literal names with `module`
    pub fn with_module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
        }
    }

    /// The configured module prefix
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}

impl LiteralRenderer for ComponentLiteralRenderer {
    fn render<V: CompoundValue>(&self, value: &V) -> Result<String, ReprError> {
        let mut out = qualify(self.module.as_deref(), V::KIND.value_type_name());
        out.push_str("( ");
        for (index, component) in value.components().iter().enumerate() {
            if !component.is_finite() {
                return Err(ReprError::NonFinite {
                    index,
                    value: component.to_string(),
                });
            }
            if index > 0 {
                out.push_str(", ");
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{component}");
        }
        out.push_str(" )");
        Ok(out)
    }
}

/// Builds the repr of a plug from its non-default attributes
#[derive(Debug, Clone, Default)]
pub struct ReprGenerator<R = ComponentLiteralRenderer> {
    resolver: ClassPathResolver,
    renderer: R,
}

impl ReprGenerator {
    /// Generator emitting bare class paths and literal names
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator using the module prefixes from `config`
    pub fn from_config(config: &SerialisationConfig) -> Self {
        Self {
            resolver: config.class_path_resolver(),
            renderer: config.literal_renderer(),
        }
    }
}

impl<R: LiteralRenderer> ReprGenerator<R> {
    /// Generator with a custom class path resolver and value renderer
    pub fn with_renderer(resolver: ClassPathResolver, renderer: R) -> Self {
        Self { resolver, renderer }
    }

    /// Class path resolver in use
    pub fn resolver(&self) -> &ClassPathResolver {
        &self.resolver
    }

    /// Render the constructor expression for `plug`.
    ///
    /// A renderer failure abandons the whole expression.
    pub fn repr<V: CompoundValue>(
        &self,
        plug: &CompoundNumericPlug<V>,
    ) -> Result<String, ReprError> {
        let mut result = String::new();
        // Writing to a String cannot fail
        let _ = write!(
            result,
            "{}( {}, ",
            self.resolver.class_path(V::KIND),
            quote(plug.name())
        );

        if let Some(direction) = PlugSerialiser::direction_repr(plug.direction()) {
            let _ = write!(result, "direction = {direction}, ");
        }

        if plug.default_value() != V::zero() {
            let literal = self.renderer.render(&plug.default_value())?;
            let _ = write!(result, "defaultValue = {literal}, ");
        }

        if plug.has_min_value() {
            let literal = self.renderer.render(&plug.min_value())?;
            let _ = write!(result, "minValue = {literal}, ");
        }

        if plug.has_max_value() {
            let literal = self.renderer.render(&plug.max_value())?;
            let _ = write!(result, "maxValue = {literal}, ");
        }

        if let Some(flags) = PlugSerialiser::flags_repr(plug.flags()) {
            let _ = write!(result, "flags = {flags}, ");
        }

        result.push(')');

        tracing::trace!(plug = plug.name(), repr = %result, "rendered plug");
        Ok(result)
    }

    /// Render the constructor expression for a plug of any kind
    pub fn repr_any(&self, plug: &AnyPlug) -> Result<String, ReprError> {
        match plug {
            AnyPlug::V2f(p) => self.repr(p),
            AnyPlug::V3f(p) => self.repr(p),
            AnyPlug::V2i(p) => self.repr(p),
            AnyPlug::V3i(p) => self.repr(p),
            AnyPlug::Color3f(p) => self.repr(p),
            AnyPlug::Color4f(p) => self.repr(p),
        }
    }
}

/// Quote a plug name as a string literal
fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Error while rendering a plug
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReprError {
    /// A component has no finite literal form
    #[error("Component {index} is not finite: {value}")]
    NonFinite {
        /// Component index
        index: usize,
        /// Offending component
        value: String,
    },

    /// Custom renderer failure
    #[error("{0}")]
    Custom(String),
}
