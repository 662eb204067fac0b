// SPDX-License-Identifier: MIT OR Apache-2.0
//! Textual codecs for plug directions and flags.

use crate::flags::{PlugFlag, PlugFlags};
use crate::plug::Direction;

/// Token standing for the empty flag set
pub const DEFAULT_FLAGS_TOKEN: &str = "Default";

/// Stateless direction and flags codec
pub struct PlugSerialiser;

impl PlugSerialiser {
    /// Token for a direction, or `None` for the implicit [`Direction::In`]
    pub fn direction_repr(direction: Direction) -> Option<&'static str> {
        match direction {
            Direction::In => None,
            Direction::Out => Some("Out"),
            Direction::InOut => Some("InOut"),
        }
    }

    /// Parse a direction token. `In` is accepted although never emitted.
    pub fn parse_direction(token: &str) -> Option<Direction> {
        match token {
            "In" => Some(Direction::In),
            "Out" => Some(Direction::Out),
            "InOut" => Some(Direction::InOut),
            _ => None,
        }
    }

    /// Flag expression for `flags`, or `None` when they equal the default.
    ///
    /// Any set bit produces the whole combined expression, e.g.
    /// `Dynamic | ReadOnly`.
    pub fn flags_repr(flags: PlugFlags) -> Option<String> {
        if flags.is_default() {
            return None;
        }
        let names: Vec<&str> = flags.iter().map(|flag| flag.name()).collect();
        Some(names.join(" | "))
    }

    /// Fold the operands of a flag expression back into a set.
    ///
    /// Returns the first unknown token on failure.
    pub fn parse_flags<'a>(tokens: &[&'a str]) -> Result<PlugFlags, &'a str> {
        tokens.iter().try_fold(PlugFlags::DEFAULT, |flags, token| {
            if *token == DEFAULT_FLAGS_TOKEN {
                return Ok(flags);
            }
            PlugFlag::from_name(token)
                .map(|flag| flags.with(flag))
                .ok_or(*token)
        })
    }
}
