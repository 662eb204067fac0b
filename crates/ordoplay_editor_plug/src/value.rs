// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compound numeric values held by plugs.
//!
//! Every value is a fixed number of components of a single base type.
//! Comparisons are component-wise: `a.all_le(&b)` holds only when every
//! component of `a` is less than or equal to the matching one in `b`.

use crate::any::AnyPlug;
use crate::class_path::PlugKind;
use crate::plug::CompoundNumericPlug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base numeric type of a compound value
pub trait Component:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
    /// Additive identity
    const ZERO: Self;
    /// Natural infimum, used as the "no minimum" sentinel
    const LOWEST: Self;
    /// Natural supremum, used as the "no maximum" sentinel
    const HIGHEST: Self;

    /// Whether the component can be written as a plain numeric literal
    fn is_finite(self) -> bool;
}

impl Component for f32 {
    const ZERO: Self = 0.0;
    const LOWEST: Self = f32::MIN;
    const HIGHEST: Self = f32::MAX;

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Component for i32 {
    const ZERO: Self = 0;
    const LOWEST: Self = i32::MIN;
    const HIGHEST: Self = i32::MAX;

    fn is_finite(self) -> bool {
        true
    }
}

/// A fixed-arity vector or color of numeric components
pub trait CompoundValue: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Component type
    type Base: Component;

    /// Which plug variant holds this value
    const KIND: PlugKind;

    /// Number of components
    const ARITY: usize;

    /// Components in order
    fn components(&self) -> &[Self::Base];

    /// Build a value from exactly `ARITY` components
    fn from_components(components: &[Self::Base]) -> Option<Self>;

    /// Broadcast one component to every slot
    fn splat(component: Self::Base) -> Self;

    /// Wrap a plug holding this value type
    fn into_any(plug: CompoundNumericPlug<Self>) -> AnyPlug;

    /// Borrow the typed plug out of an [`AnyPlug`], if the kinds match
    fn from_any(plug: &AnyPlug) -> Option<&CompoundNumericPlug<Self>>;

    /// Mutably borrow the typed plug out of an [`AnyPlug`], if the kinds match
    fn from_any_mut(plug: &mut AnyPlug) -> Option<&mut CompoundNumericPlug<Self>>;

    /// The zero value
    fn zero() -> Self {
        Self::splat(Self::Base::ZERO)
    }

    /// The base type's minimum broadcast to all components
    fn lowest() -> Self {
        Self::splat(Self::Base::LOWEST)
    }

    /// The base type's maximum broadcast to all components
    fn highest() -> Self {
        Self::splat(Self::Base::HIGHEST)
    }

    /// Component-wise `<=`
    fn all_le(&self, other: &Self) -> bool {
        self.components()
            .iter()
            .zip(other.components())
            .all(|(a, b)| a <= b)
    }

    /// Whether every component lies in `[min, max]`
    fn within(&self, min: &Self, max: &Self) -> bool {
        min.all_le(self) && self.all_le(max)
    }
}

macro_rules! compound_value {
    ($(#[$meta:meta])* $name:ident, $base:ty, $arity:literal, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name(pub [$base; $arity]);

        impl $name {
            /// Create a value from its components
            pub const fn new(components: [$base; $arity]) -> Self {
                Self(components)
            }
        }

        impl From<[$base; $arity]> for $name {
            fn from(components: [$base; $arity]) -> Self {
                Self(components)
            }
        }

        impl CompoundValue for $name {
            type Base = $base;
            const KIND: PlugKind = PlugKind::$kind;
            const ARITY: usize = $arity;

            fn components(&self) -> &[$base] {
                &self.0
            }

            fn from_components(components: &[$base]) -> Option<Self> {
                <[$base; $arity]>::try_from(components).ok().map(Self)
            }

            fn splat(component: $base) -> Self {
                Self([component; $arity])
            }

            fn into_any(plug: CompoundNumericPlug<Self>) -> AnyPlug {
                AnyPlug::$kind(plug)
            }

            fn from_any(plug: &AnyPlug) -> Option<&CompoundNumericPlug<Self>> {
                match plug {
                    AnyPlug::$kind(p) => Some(p),
                    _ => None,
                }
            }

            fn from_any_mut(plug: &mut AnyPlug) -> Option<&mut CompoundNumericPlug<Self>> {
                match plug {
                    AnyPlug::$kind(p) => Some(p),
                    _ => None,
                }
            }
        }
    };
}

compound_value!(
    /// 2D float vector
    V2f, f32, 2, V2f
);
compound_value!(
    /// 3D float vector
    V3f, f32, 3, V3f
);
compound_value!(
    /// 2D integer vector
    V2i, i32, 2, V2i
);
compound_value!(
    /// 3D integer vector
    V3i, i32, 3, V3i
);
compound_value!(
    /// RGB color
    Color3f, f32, 3, Color3f
);
compound_value!(
    /// RGBA color
    Color4f, f32, 4, Color4f
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(V3f::zero(), V3f::new([0.0, 0.0, 0.0]));
        assert_eq!(V2i::lowest(), V2i::new([i32::MIN, i32::MIN]));
        assert_eq!(Color4f::highest().0, [f32::MAX; 4]);
        assert_eq!(V3f::lowest().0[0], -f32::MAX);
    }

    #[test]
    fn test_component_wise_ordering() {
        let a = V2i::new([0, 5]);
        let b = V2i::new([1, 5]);
        assert!(a.all_le(&b));
        assert!(!b.all_le(&a));

        // Mixed ordering is neither <= nor >=
        let c = V2i::new([2, 0]);
        assert!(!a.all_le(&c));
        assert!(!c.all_le(&a));
    }

    #[test]
    fn test_within() {
        let min = V3f::new([0.0, 0.0, 0.0]);
        let max = V3f::new([1.0, 1.0, 1.0]);
        assert!(V3f::new([0.0, 0.5, 1.0]).within(&min, &max));
        assert!(!V3f::new([0.0, 1.5, 1.0]).within(&min, &max));
        assert!(!V3f::new([f32::NAN, 0.5, 0.5]).within(&min, &max));
    }

    #[test]
    fn test_from_components_checks_arity() {
        assert_eq!(
            Color3f::from_components(&[1.0, 0.5, 0.25]),
            Some(Color3f::new([1.0, 0.5, 0.25]))
        );
        assert_eq!(Color3f::from_components(&[1.0, 0.5]), None);
        assert_eq!(V2i::from_components(&[1, 2, 3]), None);
    }
}
