// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compound numeric plugs for `OrdoPlay` Editor graphs.
//!
//! This crate models the typed value slots ("plugs") on graph nodes that
//! hold vectors and colors:
//! - 2D/3D float and integer vectors
//! - RGB and RGBA colors
//!
//! ## Architecture
//!
//! - Values are fixed-arity compound numbers compared component-wise
//! - Plugs carry a direction, default, optional bounds and behaviour flags
//! - Each plug renders to a minimal constructor expression (its repr), e.g.
//!   `V3fPlug( "translate", )`, which the parser turns back into an
//!   identically configured plug
//! - Nodes own their plugs and serialise them one expression per line

pub mod any;
pub mod class_path;
pub mod config;
pub mod flags;
pub mod node;
pub mod parse;
pub mod plug;
pub mod repr;
pub mod serialiser;
pub mod value;

pub use any::AnyPlug;
pub use class_path::{ClassPathResolver, PlugKind};
pub use config::{ConfigError, SerialisationConfig};
pub use flags::{PlugFlag, PlugFlags};
pub use node::{Node, NodeError, NodeId};
pub use parse::{ParseError, PlugParser};
pub use plug::{
    Color3fPlug, Color4fPlug, CompoundNumericPlug, Direction, PlugError, PlugId, PlugOptions,
    V2fPlug, V2iPlug, V3fPlug, V3iPlug,
};
pub use repr::{ComponentLiteralRenderer, LiteralRenderer, ReprError, ReprGenerator};
pub use serialiser::PlugSerialiser;
pub use value::{Color3f, Color4f, Component, CompoundValue, V2f, V2i, V3f, V3i};
