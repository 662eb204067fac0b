// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compound numeric plugs: named, directional, bounded value slots on a node.

use crate::flags::PlugFlags;
use crate::value::{Color3f, Color4f, CompoundValue, V2f, V2i, V3f, V3i};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a plug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlugId(pub Uuid);

impl PlugId {
    /// Create a new random plug ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlugId {
    fn default() -> Self {
        Self::new()
    }
}

/// Plug direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Input plug
    #[default]
    In,
    /// Output plug
    Out,
    /// Both input and output
    InOut,
}

/// Construction arguments for a [`CompoundNumericPlug`].
///
/// Every field has a documented default, so callers only set what differs:
///
/// | field           | default                         |
/// |-----------------|---------------------------------|
/// | `name`          | the plug type name, e.g. `V3fPlug` |
/// | `direction`     | [`Direction::In`]               |
/// | `default_value` | zero                            |
/// | `min_value`     | base type minimum, broadcast    |
/// | `max_value`     | base type maximum, broadcast    |
/// | `flags`         | [`PlugFlags::DEFAULT`]          |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlugOptions<V> {
    /// Plug name
    pub name: Option<String>,
    /// Plug direction
    pub direction: Direction,
    /// Default (and initial) value
    pub default_value: V,
    /// Lower bound
    pub min_value: V,
    /// Upper bound
    pub max_value: V,
    /// Behaviour flags
    pub flags: PlugFlags,
}

impl<V: CompoundValue> Default for PlugOptions<V> {
    fn default() -> Self {
        Self {
            name: None,
            direction: Direction::In,
            default_value: V::zero(),
            min_value: V::lowest(),
            max_value: V::highest(),
            flags: PlugFlags::DEFAULT,
        }
    }
}

impl<V: CompoundValue> PlugOptions<V> {
    /// Options for a plug called `name`, everything else defaulted
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the default value
    pub fn default_value(mut self, value: impl Into<V>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Set the lower bound
    pub fn min_value(mut self, value: impl Into<V>) -> Self {
        self.min_value = value.into();
        self
    }

    /// Set the upper bound
    pub fn max_value(mut self, value: impl Into<V>) -> Self {
        self.max_value = value.into();
        self
    }

    /// Set the flags
    pub fn flags(mut self, flags: impl Into<PlugFlags>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Build the plug
    pub fn build(self) -> Result<CompoundNumericPlug<V>, PlugError> {
        CompoundNumericPlug::new(self)
    }
}

/// A typed plug holding a compound numeric value
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundNumericPlug<V> {
    id: PlugId,
    name: String,
    direction: Direction,
    default_value: V,
    min_value: V,
    max_value: V,
    flags: PlugFlags,
    value: V,
}

/// 2D float vector plug
pub type V2fPlug = CompoundNumericPlug<V2f>;
/// 3D float vector plug
pub type V3fPlug = CompoundNumericPlug<V3f>;
/// 2D integer vector plug
pub type V2iPlug = CompoundNumericPlug<V2i>;
/// 3D integer vector plug
pub type V3iPlug = CompoundNumericPlug<V3i>;
/// RGB color plug
pub type Color3fPlug = CompoundNumericPlug<Color3f>;
/// RGBA color plug
pub type Color4fPlug = CompoundNumericPlug<Color4f>;

impl<V: CompoundValue> CompoundNumericPlug<V> {
    /// Create a plug, validating its bounds.
    ///
    /// Fails with [`PlugError::InvalidBounds`] if `min_value > max_value` in
    /// any component, or if `default_value` lies outside the bounds.
    pub fn new(options: PlugOptions<V>) -> Result<Self, PlugError> {
        let name = options
            .name
            .unwrap_or_else(|| V::KIND.plug_type_name().to_string());

        if !options.min_value.all_le(&options.max_value) {
            return Err(PlugError::InvalidBounds {
                plug: name,
                reason: format!(
                    "minValue {:?} exceeds maxValue {:?}",
                    options.min_value, options.max_value
                ),
            });
        }
        if !options.default_value.within(&options.min_value, &options.max_value) {
            return Err(PlugError::InvalidBounds {
                plug: name,
                reason: format!(
                    "defaultValue {:?} outside [{:?}, {:?}]",
                    options.default_value, options.min_value, options.max_value
                ),
            });
        }

        tracing::trace!(plug = %name, kind = ?V::KIND, "created plug");

        Ok(Self {
            id: PlugId::new(),
            name,
            direction: options.direction,
            default_value: options.default_value,
            min_value: options.min_value,
            max_value: options.max_value,
            flags: options.flags,
            value: options.default_value,
        })
    }

    /// Create a plug called `name` with every other option defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: PlugId::new(),
            name: name.into(),
            direction: Direction::In,
            default_value: V::zero(),
            min_value: V::lowest(),
            max_value: V::highest(),
            flags: PlugFlags::DEFAULT,
            value: V::zero(),
        }
    }

    /// Unique plug ID
    pub fn id(&self) -> PlugId {
        self.id
    }

    /// Plug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the plug. Public renames go through [`crate::Node::rename_plug`],
    /// which keeps sibling names unique.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Plug direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Default value
    pub fn default_value(&self) -> V {
        self.default_value
    }

    /// Whether a lower bound narrower than the base type's minimum is set.
    ///
    /// A lower bound equal to the natural minimum reads as "no bound".
    pub fn has_min_value(&self) -> bool {
        self.min_value != V::lowest()
    }

    /// Whether an upper bound narrower than the base type's maximum is set.
    ///
    /// An upper bound equal to the natural maximum reads as "no bound".
    pub fn has_max_value(&self) -> bool {
        self.max_value != V::highest()
    }

    /// Lower bound; meaningful only when [`Self::has_min_value`] is true
    pub fn min_value(&self) -> V {
        self.min_value
    }

    /// Upper bound; meaningful only when [`Self::has_max_value`] is true
    pub fn max_value(&self) -> V {
        self.max_value
    }

    /// Behaviour flags
    pub fn flags(&self) -> PlugFlags {
        self.flags
    }

    /// Current value
    pub fn value(&self) -> V {
        self.value
    }

    /// Replace the current value.
    ///
    /// Fails with [`PlugError::OutOfRange`] if any component lies outside an
    /// active bound; the current value is left untouched. A side with no
    /// bound set accepts anything, including non-finite floats.
    pub fn set_value(&mut self, value: impl Into<V>) -> Result<(), PlugError> {
        let value = value.into();
        let above_min = !self.has_min_value() || self.min_value.all_le(&value);
        let below_max = !self.has_max_value() || value.all_le(&self.max_value);
        if !(above_min && below_max) {
            return Err(PlugError::OutOfRange {
                plug: self.name.clone(),
                value: format!("{value:?}"),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Restore the current value to the default
    pub fn set_to_default(&mut self) {
        self.value = self.default_value;
    }

    /// Snapshot of the persisted configuration (current value excluded)
    pub fn options(&self) -> PlugOptions<V> {
        PlugOptions {
            name: Some(self.name.clone()),
            direction: self.direction,
            default_value: self.default_value,
            min_value: self.min_value,
            max_value: self.max_value,
            flags: self.flags,
        }
    }
}

impl<V: CompoundValue> Default for CompoundNumericPlug<V> {
    fn default() -> Self {
        Self::named(V::KIND.plug_type_name())
    }
}

/// Error raised by plug construction or value assignment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlugError {
    /// Bounds are inverted, or the default lies outside them
    #[error("Invalid bounds on plug {plug:?}: {reason}")]
    InvalidBounds {
        /// Plug name
        plug: String,
        /// Which constraint failed
        reason: String,
    },

    /// Value lies outside the plug's bounds
    #[error("Value {value} out of range for plug {plug:?}")]
    OutOfRange {
        /// Plug name
        plug: String,
        /// Rejected value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PlugFlag;

    #[test]
    fn test_defaults() {
        let plug = V3fPlug::new(PlugOptions::default()).unwrap();
        assert_eq!(plug.name(), "V3fPlug");
        assert_eq!(plug.direction(), Direction::In);
        assert_eq!(plug.default_value(), V3f::zero());
        assert_eq!(plug.value(), V3f::zero());
        assert!(!plug.has_min_value());
        assert!(!plug.has_max_value());
        assert!(plug.flags().is_default());
        assert_eq!(plug, V3fPlug { id: plug.id(), ..V3fPlug::default() });
    }

    #[test]
    fn test_builder() {
        let plug = PlugOptions::<V2i>::new("tile")
            .direction(Direction::Out)
            .default_value([1, 1])
            .min_value([0, 0])
            .max_value([64, 64])
            .flags(PlugFlag::Dynamic)
            .build()
            .unwrap();

        assert_eq!(plug.name(), "tile");
        assert_eq!(plug.direction(), Direction::Out);
        assert_eq!(plug.value(), V2i::new([1, 1]));
        assert!(plug.has_min_value());
        assert!(plug.has_max_value());
        assert_eq!(plug.min_value(), V2i::new([0, 0]));
        assert_eq!(plug.max_value(), V2i::new([64, 64]));
        assert!(plug.flags().contains(PlugFlag::Dynamic));
    }

    #[test]
    fn test_min_above_max_in_one_component_is_rejected() {
        let err = PlugOptions::<V3i>::new("p")
            .min_value([0, 5, 0])
            .max_value([10, 4, 10])
            .default_value([1, 4, 1])
            .build()
            .unwrap_err();
        assert!(matches!(err, PlugError::InvalidBounds { ref plug, .. } if plug == "p"));
    }

    #[test]
    fn test_default_outside_bounds_is_rejected() {
        let err = PlugOptions::<V2f>::new("p")
            .min_value([1.0, 1.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, PlugError::InvalidBounds { .. }));

        let err = PlugOptions::<Color3f>::new("c")
            .max_value([1.0, 1.0, 1.0])
            .default_value([0.5, 2.0, 0.5])
            .build()
            .unwrap_err();
        assert!(matches!(err, PlugError::InvalidBounds { .. }));
    }

    #[test]
    fn test_explicit_natural_minimum_reads_as_unbounded() {
        // A bound passed at exactly the natural extreme cannot be told apart
        // from no bound at all.
        let plug = PlugOptions::<V2f>::new("p")
            .min_value([f32::MIN, f32::MIN])
            .max_value([i16::MAX as f32, f32::MAX])
            .build()
            .unwrap();
        assert!(!plug.has_min_value());
        assert!(plug.has_max_value());

        let plug = PlugOptions::<V3i>::new("q")
            .min_value([i32::MIN; 3])
            .max_value([i32::MAX; 3])
            .build()
            .unwrap();
        assert!(!plug.has_min_value());
        assert!(!plug.has_max_value());
    }

    #[test]
    fn test_partially_narrowed_bound_is_a_bound() {
        let plug = PlugOptions::<V2i>::new("p")
            .min_value([i32::MIN, 0])
            .build()
            .unwrap();
        assert!(plug.has_min_value());
    }

    #[test]
    fn test_set_value_within_bounds() {
        let mut plug = PlugOptions::<V2i>::new("tile")
            .min_value([0, 0])
            .max_value([64, 64])
            .build()
            .unwrap();

        plug.set_value([64, 0]).unwrap();
        assert_eq!(plug.value(), V2i::new([64, 0]));
    }

    #[test]
    fn test_set_value_out_of_range_leaves_value_unchanged() {
        let mut plug = PlugOptions::<V2i>::new("tile")
            .min_value([0, 0])
            .max_value([64, 64])
            .default_value([1, 1])
            .build()
            .unwrap();
        plug.set_value([8, 8]).unwrap();

        let err = plug.set_value([8, 65]).unwrap_err();
        assert!(matches!(err, PlugError::OutOfRange { .. }));
        assert_eq!(plug.value(), V2i::new([8, 8]));

        assert!(plug.set_value([-1, 8]).is_err());
        assert_eq!(plug.value(), V2i::new([8, 8]));
    }

    #[test]
    fn test_unbounded_plug_accepts_finite_values() {
        let mut plug = Color4fPlug::named("color");
        plug.set_value([1e30, -1e30, 0.5, f32::MAX]).unwrap();
        assert_eq!(plug.value(), Color4f::new([1e30, -1e30, 0.5, f32::MAX]));
    }

    #[test]
    fn test_unbounded_sides_accept_non_finite_values() {
        let mut plug = V3fPlug::named("p");
        plug.set_value([f32::INFINITY, f32::NEG_INFINITY, 0.0]).unwrap();
        assert_eq!(plug.value().0[0], f32::INFINITY);
        plug.set_value([f32::NAN, 0.0, 0.0]).unwrap();
        assert!(plug.value().0[0].is_nan());

        // Only the upper side is bounded
        let mut plug = PlugOptions::<V2f>::new("q").max_value([1.0, 1.0]).build().unwrap();
        plug.set_value([f32::NEG_INFINITY, 0.5]).unwrap();
        assert!(matches!(
            plug.set_value([f32::INFINITY, 0.5]),
            Err(PlugError::OutOfRange { .. })
        ));
        assert!(plug.set_value([f32::NAN, 0.5]).is_err());
        assert_eq!(plug.value(), V2f::new([f32::NEG_INFINITY, 0.5]));
    }

    #[test]
    fn test_set_to_default() {
        let mut plug = PlugOptions::<V3f>::new("scale")
            .default_value([1.0, 1.0, 1.0])
            .build()
            .unwrap();
        plug.set_value([2.0, 3.0, 4.0]).unwrap();
        plug.set_to_default();
        assert_eq!(plug.value(), V3f::new([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_options_excludes_current_value() {
        let options = PlugOptions::<V3f>::new("translate").default_value([1.0, 2.0, 3.0]);
        let mut plug = options.clone().build().unwrap();
        plug.set_value([9.0, 9.0, 9.0]).unwrap();
        assert_eq!(plug.options(), options);
    }

    #[test]
    fn test_options_serialization() {
        let options = PlugOptions::<V2i>::new("tile")
            .direction(Direction::InOut)
            .flags(PlugFlag::ReadOnly | PlugFlag::Dynamic);
        let ron_str =
            ron::ser::to_string_pretty(&options, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: PlugOptions<V2i> = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, options);
    }
}
