//! DIO value types: levels, directions, channel and port identifiers, channel groups.

use crate::consts;
use std::fmt;

/// Pin direction as read back from the port's direction register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Physical level of a single channel.
///
/// `Low` is the default so that `unwrap_or_default()` on a failed read yields
/// the sentinel value the DIO services return on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Level of every pin of a port, or of a channel group shifted down to bit 0.
pub type PortLevel = u8;

/// A GPIO port (A..F on the Tiva C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub(crate) u8);

impl PortId {
    pub const A: PortId = PortId(0);
    pub const B: PortId = PortId(1);
    pub const C: PortId = PortId(2);
    pub const D: PortId = PortId(3);
    pub const E: PortId = PortId(4);
    pub const F: PortId = PortId(5);

    /// Wraps a raw port ID without range checking; the DIO services validate it.
    #[inline]
    pub const fn from_raw(id: u8) -> Self {
        PortId(id)
    }

    /// Returns the raw port number.
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= consts::dio::MAX_PORT_ID {
            write!(f, "{}", (b'A' + self.0) as char)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A single DIO channel, encoded as `(port << 4) | pin`.
///
/// The port half of the encoding is informational only: the owning port is
/// always taken from the configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub(crate) u8);

impl ChannelId {
    /// Builds the channel ID of `pin` on `port`.
    #[inline]
    pub const fn new(port: PortId, pin: u8) -> Self {
        ChannelId((port.0 << 4) | (pin & 0x0F))
    }

    /// Wraps a raw channel ID without validation; the DIO services validate it.
    #[inline]
    pub const fn from_raw(id: u8) -> Self {
        ChannelId(id)
    }

    /// Returns the raw channel ID.
    #[inline]
    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Returns the bit position (0-7) within the port's data register.
    #[inline]
    pub fn pin(&self) -> u8 {
        self.0 & 0x0F
    }
}

impl fmt::UpperHex for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// One entry of the channel-to-port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortChannel {
    pub channel: ChannelId,
    pub port: PortId,
}

impl PortChannel {
    pub const fn new(channel: ChannelId, port: PortId) -> Self {
        PortChannel { channel, port }
    }
}

/// An adjoining subset of a port's pins, read and written as one value.
///
/// Groups are identified by reference: the DIO services only accept a
/// `&ChannelGroup` that points into the configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelGroup {
    /// Pins belonging to the group.
    pub mask: u8,
    /// Position of the lowest group pin; values are shifted by this amount.
    pub offset: u8,
    /// Port the group is defined on.
    pub port: PortId,
}

impl ChannelGroup {
    pub const fn new(mask: u8, offset: u8, port: PortId) -> Self {
        ChannelGroup { mask, offset, port }
    }

    /// Mask of the group once aligned to bit 0.
    #[inline]
    pub fn width_mask(&self) -> u8 {
        self.mask >> self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_id_encoding() {
        let led1 = ChannelId::new(PortId::B, 4);
        assert_eq!(led1.raw(), 0x14);
        assert_eq!(led1.pin(), 4);
        assert_eq!(ChannelId::new(PortId::F, 3).raw(), consts::dio::MAX_CHANNEL_ID);
    }

    #[test]
    fn port_id_range() {
        assert_eq!(PortId::from_raw(5), PortId::F);
        assert_eq!(PortId::F.number(), consts::dio::MAX_PORT_ID);
        assert_eq!(PortId::B.to_string(), "B");
        assert_eq!(PortId::from_raw(9).to_string(), "#9");
    }

    #[test]
    fn level_helpers() {
        assert_eq!(Level::default(), Level::Low);
        assert_eq!(Level::from(true), Level::High);
    }

    #[test]
    fn group_width_mask() {
        let group = ChannelGroup::new(0xCE, 1, PortId::B);
        assert_eq!(group.width_mask(), 0x67);
    }
}
