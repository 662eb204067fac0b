// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plug behaviour flags.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// A single behaviour toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlugFlag {
    /// Plug was added after node construction and is rebuilt from its repr
    Dynamic,
    /// Value may not be edited from the UI
    ReadOnly,
    /// Plug is skipped when its node is serialised
    NonSerialisable,
    /// Plug refuses incoming connections
    AcceptsNoInputs,
    /// Computed values are never cached
    Uncacheable,
}

impl PlugFlag {
    /// Get all flags, in bit order
    pub fn all() -> &'static [PlugFlag] {
        &[
            PlugFlag::Dynamic,
            PlugFlag::ReadOnly,
            PlugFlag::NonSerialisable,
            PlugFlag::AcceptsNoInputs,
            PlugFlag::Uncacheable,
        ]
    }

    /// Bit value of this flag
    pub fn bit(&self) -> u32 {
        match self {
            PlugFlag::Dynamic => 1 << 0,
            PlugFlag::ReadOnly => 1 << 1,
            PlugFlag::NonSerialisable => 1 << 2,
            PlugFlag::AcceptsNoInputs => 1 << 3,
            PlugFlag::Uncacheable => 1 << 4,
        }
    }

    /// Token used in serialised flag expressions
    pub fn name(&self) -> &'static str {
        match self {
            PlugFlag::Dynamic => "Dynamic",
            PlugFlag::ReadOnly => "ReadOnly",
            PlugFlag::NonSerialisable => "NonSerialisable",
            PlugFlag::AcceptsNoInputs => "AcceptsNoInputs",
            PlugFlag::Uncacheable => "Uncacheable",
        }
    }

    /// Look a flag up by its token
    pub fn from_name(name: &str) -> Option<PlugFlag> {
        Self::all().iter().copied().find(|flag| flag.name() == name)
    }
}

/// Set of [`PlugFlag`]s.
///
/// [`PlugFlags::DEFAULT`] has every bit unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlugFlags(u32);

impl PlugFlags {
    /// The well-known default flag set
    pub const DEFAULT: PlugFlags = PlugFlags(0);

    /// Every known flag
    pub fn all() -> Self {
        PlugFlag::all().iter().fold(Self::DEFAULT, |acc, flag| acc.with(*flag))
    }

    /// Build a set from raw bits, rejecting unknown bits
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::all().0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether this is the default set
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Check whether a flag is set
    pub fn contains(&self, flag: PlugFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Set a flag
    pub fn insert(&mut self, flag: PlugFlag) {
        self.0 |= flag.bit();
    }

    /// Clear a flag
    pub fn remove(&mut self, flag: PlugFlag) {
        self.0 &= !flag.bit();
    }

    /// Return a copy with `flag` set
    pub fn with(mut self, flag: PlugFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Set flags in bit order
    pub fn iter(&self) -> impl Iterator<Item = PlugFlag> + '_ {
        PlugFlag::all().iter().copied().filter(move |flag| self.contains(*flag))
    }
}

impl From<PlugFlag> for PlugFlags {
    fn from(flag: PlugFlag) -> Self {
        Self(flag.bit())
    }
}

impl FromIterator<PlugFlag> for PlugFlags {
    fn from_iter<I: IntoIterator<Item = PlugFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::DEFAULT, PlugFlags::with)
    }
}

impl BitOr for PlugFlags {
    type Output = PlugFlags;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<PlugFlag> for PlugFlags {
    type Output = PlugFlags;

    fn bitor(self, rhs: PlugFlag) -> Self {
        self.with(rhs)
    }
}

impl BitOr for PlugFlag {
    type Output = PlugFlags;

    fn bitor(self, rhs: Self) -> PlugFlags {
        PlugFlags::from(self).with(rhs)
    }
}
