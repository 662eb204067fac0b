// SPDX-License-Identifier: MIT OR Apache-2.0
//! Kind-erased plug storage.

use crate::class_path::PlugKind;
use crate::flags::PlugFlags;
use crate::plug::{
    Color3fPlug, Color4fPlug, CompoundNumericPlug, Direction, PlugId, V2fPlug, V2iPlug, V3fPlug,
    V3iPlug,
};
use crate::value::CompoundValue;

/// A plug of any compound numeric kind
#[derive(Debug, Clone, PartialEq)]
pub enum AnyPlug {
    /// 2D float vector plug
    V2f(V2fPlug),
    /// 3D float vector plug
    V3f(V3fPlug),
    /// 2D integer vector plug
    V2i(V2iPlug),
    /// 3D integer vector plug
    V3i(V3iPlug),
    /// RGB color plug
    Color3f(Color3fPlug),
    /// RGBA color plug
    Color4f(Color4fPlug),
}

macro_rules! with_plug {
    ($any:expr, $p:ident => $body:expr) => {
        match $any {
            AnyPlug::V2f($p) => $body,
            AnyPlug::V3f($p) => $body,
            AnyPlug::V2i($p) => $body,
            AnyPlug::V3i($p) => $body,
            AnyPlug::Color3f($p) => $body,
            AnyPlug::Color4f($p) => $body,
        }
    };
}

impl AnyPlug {
    /// Which variant this is
    pub fn kind(&self) -> PlugKind {
        match self {
            AnyPlug::V2f(_) => PlugKind::V2f,
            AnyPlug::V3f(_) => PlugKind::V3f,
            AnyPlug::V2i(_) => PlugKind::V2i,
            AnyPlug::V3i(_) => PlugKind::V3i,
            AnyPlug::Color3f(_) => PlugKind::Color3f,
            AnyPlug::Color4f(_) => PlugKind::Color4f,
        }
    }

    /// Unique plug ID
    pub fn id(&self) -> PlugId {
        with_plug!(self, p => p.id())
    }

    /// Plug name
    pub fn name(&self) -> &str {
        with_plug!(self, p => p.name())
    }

    /// Rename the plug
    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        with_plug!(self, p => p.set_name(name));
    }

    /// Plug direction
    pub fn direction(&self) -> Direction {
        with_plug!(self, p => p.direction())
    }

    /// Behaviour flags
    pub fn flags(&self) -> PlugFlags {
        with_plug!(self, p => p.flags())
    }

    /// Restore the current value to the default
    pub fn set_to_default(&mut self) {
        with_plug!(self, p => p.set_to_default());
    }

    /// Borrow as a typed plug
    pub fn downcast_ref<V: CompoundValue>(&self) -> Option<&CompoundNumericPlug<V>> {
        V::from_any(self)
    }

    /// Mutably borrow as a typed plug
    pub fn downcast_mut<V: CompoundValue>(&mut self) -> Option<&mut CompoundNumericPlug<V>> {
        V::from_any_mut(self)
    }
}

impl<V: CompoundValue> From<CompoundNumericPlug<V>> for AnyPlug {
    fn from(plug: CompoundNumericPlug<V>) -> Self {
        V::into_any(plug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PlugFlag;
    use crate::plug::PlugOptions;
    use crate::value::{Color3f, V3f, V3i};

    #[test]
    fn test_kind_and_accessors() {
        let plug: AnyPlug = PlugOptions::<Color3f>::new("tint")
            .direction(Direction::Out)
            .flags(PlugFlag::Dynamic)
            .build()
            .unwrap()
            .into();

        assert_eq!(plug.kind(), PlugKind::Color3f);
        assert_eq!(plug.name(), "tint");
        assert_eq!(plug.direction(), Direction::Out);
        assert!(plug.flags().contains(PlugFlag::Dynamic));
    }

    #[test]
    fn test_downcast() {
        let mut plug = AnyPlug::from(V3fPlug::named("translate"));
        assert!(plug.downcast_ref::<V3i>().is_none());

        plug.downcast_mut::<V3f>().unwrap().set_value([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            plug.downcast_ref::<V3f>().unwrap().value(),
            V3f::new([1.0, 2.0, 3.0])
        );

        plug.set_to_default();
        assert_eq!(plug.downcast_ref::<V3f>().unwrap().value(), V3f::zero());
    }

    #[test]
    fn test_rename() {
        let mut plug = AnyPlug::from(V3iPlug::named("a"));
        plug.set_name("b");
        assert_eq!(plug.name(), "b");
    }
}
