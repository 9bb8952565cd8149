//! Digital I/O driver.
//!
//! Channel, port and channel-group level access on top of [`PortRegisters`].
//! Writes never change the level of a pin configured as input: the direction
//! register decides which bits a write may touch, not the caller. Port and
//! group writes reach the data register as one masked store.

use crate::channel::{ChannelGroup, ChannelId, Direction, Level, PortId, PortLevel};
use crate::config::DioConfig;
use crate::consts::{self, dio::sid};
use crate::det::{DetReport, ErrorReporter};
use crate::error::{Error, Result};
use crate::port::{PortRegisters, Register};
use crate::types::VersionInfo;
use log::{debug, trace};

/// A DIO driver instance owning the port register handles.
///
/// Every service validates its arguments against the configuration table. On
/// failure the error is reported to the DET (if enabled), no register is
/// written, and `Err` is returned. `unwrap_or_default()` turns a failed read
/// into the AUTOSAR sentinel (`Level::Low` / `0`).
pub struct Dio<'a, P: PortRegisters> {
    config: &'a DioConfig,
    ports: [P; consts::dio::PORT_COUNT],
    det: &'a dyn ErrorReporter,
}

impl<'a, P: PortRegisters> Dio<'a, P> {
    pub fn new(
        config: &'a DioConfig,
        ports: [P; consts::dio::PORT_COUNT],
        det: &'a dyn ErrorReporter,
    ) -> Self {
        debug!(
            "DIO driver ready: {} channels, {} groups",
            config.channels().len(),
            config.groups().len()
        );
        Dio { config, ports, det }
    }

    pub fn config(&self) -> &'a DioConfig {
        self.config
    }

    /// The register handle of a port.
    pub fn port(&self, id: PortId) -> Option<&P> {
        self.ports.get(id.index())
    }

    /// The configured channel groups. Only references obtained here (or from
    /// [`DioConfig::group`]) are accepted by the group services.
    pub fn channel_groups(&self) -> &'a [ChannelGroup] {
        self.config.groups()
    }

    // --- Single channel ---

    /// Returns the level of a channel.
    pub fn read_channel(&self, channel: ChannelId) -> Result<Level> {
        let (port, pin) = self.resolve_channel(sid::READ_CHANNEL, channel)?;
        let level = Level::from(port.get_bit(Register::Data, pin));
        trace!("Read channel 0x{:02X}: {:?}", channel, level);
        Ok(level)
    }

    /// Sets the level of a channel. A write to an input channel is accepted and
    /// has no effect.
    pub fn write_channel(&self, channel: ChannelId, level: Level) -> Result<()> {
        let (port, pin) = self.resolve_channel(sid::WRITE_CHANNEL, channel)?;
        if Self::direction(port, pin) == Direction::Input {
            trace!("Channel 0x{:02X} is an input, write ignored", channel);
            return Ok(());
        }
        trace!("Write channel 0x{:02X}: {:?}", channel, level);
        match level {
            Level::High => port.set_bit(pin),
            Level::Low => port.clear_bit(pin),
        }
        Ok(())
    }

    /// Inverts an output channel and returns its new level. For an input channel
    /// nothing is written and the current level is returned.
    pub fn flip_channel(&self, channel: ChannelId) -> Result<Level> {
        self.require(self.config.features().flip_channel_api, sid::FLIP_CHANNEL)?;
        let (port, pin) = self.resolve_channel(sid::FLIP_CHANNEL, channel)?;
        if Self::direction(port, pin) == Direction::Output {
            port.toggle_bit(pin);
        }
        let level = Level::from(port.get_bit(Register::Data, pin));
        trace!("Flip channel 0x{:02X}: now {:?}", channel, level);
        Ok(level)
    }

    // --- Whole port ---

    /// Returns the level of all pins of a port.
    pub fn read_port(&self, port_id: PortId) -> Result<PortLevel> {
        let port = self.resolve_port(sid::READ_PORT, port_id)?;
        let level = port.get_port();
        trace!("Read port {}: 0x{:02X}", port_id, level);
        Ok(level)
    }

    /// Sets all output pins of a port at once; input pins keep their value.
    ///
    /// `new = (!dir & old) | (level & dir)`
    pub fn write_port(&self, port_id: PortId, level: PortLevel) -> Result<()> {
        let port = self.resolve_port(sid::WRITE_PORT, port_id)?;
        let outputs = port.read(Register::Direction);
        trace!(
            "Write port {}: level=0x{:02X}, outputs=0x{:02X}",
            port_id,
            level,
            outputs
        );
        port.write_masked(outputs, level);
        Ok(())
    }

    // --- Channel groups ---

    /// Returns the level of a channel group, aligned to bit 0.
    pub fn read_channel_group(&self, group: &ChannelGroup) -> Result<PortLevel> {
        let port = self.resolve_group(sid::READ_CHANNEL_GROUP, group)?;
        let level = (port.get_port() >> group.offset) & group.width_mask();
        trace!(
            "Read group 0x{:02X}@{} on port {}: 0x{:02X}",
            group.mask,
            group.offset,
            group.port,
            level
        );
        Ok(level)
    }

    /// Sets the output pins of a channel group at once. Pins outside the group
    /// and input pins keep their value.
    ///
    /// `new = (!dir & old) | (!mask & old) | (dir & mask & (level << offset))`
    pub fn write_channel_group(&self, group: &ChannelGroup, level: PortLevel) -> Result<()> {
        let port = self.resolve_group(sid::WRITE_CHANNEL_GROUP, group)?;
        let writable = port.read(Register::Direction) & group.mask;
        let shifted = level << group.offset;
        trace!(
            "Write group 0x{:02X}@{} on port {}: level=0x{:02X}, writable=0x{:02X}",
            group.mask,
            group.offset,
            group.port,
            level,
            writable
        );
        port.write_masked(writable, shifted);
        Ok(())
    }

    // --- Version ---

    /// Fills `out` with the module's version information.
    pub fn get_version_info(&self, out: Option<&mut VersionInfo>) -> Result<()> {
        self.require(self.config.features().version_info_api, sid::GET_VERSION_INFO)?;
        let Some(out) = out else {
            return self.fail(sid::GET_VERSION_INFO, Error::ParamPointer);
        };
        *out = version_info();
        Ok(())
    }

    // --- Validation helpers ---

    fn resolve_channel(&self, service_id: u8, channel: ChannelId) -> Result<(&P, u8)> {
        let entry = if channel.raw() > consts::dio::MAX_CHANNEL_ID {
            None
        } else {
            self.config.channel(channel)
        };
        match entry.and_then(|entry| self.ports.get(entry.port.index())) {
            Some(port) => Ok((port, channel.pin())),
            None => self.fail(service_id, Error::InvalidChannelId(channel)),
        }
    }

    fn resolve_port(&self, service_id: u8, port_id: PortId) -> Result<&P> {
        if port_id.number() > consts::dio::MAX_PORT_ID || !self.config.uses_port(port_id) {
            return self.fail(service_id, Error::InvalidPortId(port_id));
        }
        match self.ports.get(port_id.index()) {
            Some(port) => Ok(port),
            None => self.fail(service_id, Error::InvalidPortId(port_id)),
        }
    }

    fn resolve_group(&self, service_id: u8, group: &ChannelGroup) -> Result<&P> {
        let port = if self.config.contains_group(group) {
            self.ports.get(group.port.index())
        } else {
            None
        };
        match port {
            Some(port) => Ok(port),
            None => self.fail(
                service_id,
                Error::InvalidGroup {
                    mask: group.mask,
                    offset: group.offset,
                },
            ),
        }
    }

    #[inline]
    fn direction(port: &P, pin: u8) -> Direction {
        if port.get_bit(Register::Direction, pin) {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    fn require(&self, enabled: bool, service_id: u8) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(Error::ServiceDisabled {
                module_id: consts::dio::MODULE_ID,
                service_id,
            })
        }
    }

    // Reports `error` to the DET once (if enabled) and returns it.
    fn fail<T>(&self, service_id: u8, error: Error) -> Result<T> {
        if self.config.features().dev_error_detect {
            if let Some(error_id) = det_code(&error) {
                self.det.report_error(DetReport::new(
                    consts::dio::MODULE_ID,
                    consts::dio::INSTANCE_ID,
                    service_id,
                    error_id,
                ));
            }
        }
        Err(error)
    }
}

/// The DIO module's version information.
pub fn version_info() -> VersionInfo {
    VersionInfo {
        vendor_id: consts::VENDOR_ID,
        module_id: consts::dio::MODULE_ID,
        sw_major_version: consts::dio::SW_MAJOR_VERSION,
        sw_minor_version: consts::dio::SW_MINOR_VERSION,
        sw_patch_version: consts::dio::SW_PATCH_VERSION,
    }
}

fn det_code(error: &Error) -> Option<u8> {
    use consts::dio::det;
    match error {
        Error::InvalidChannelId(_) => Some(det::E_PARAM_INVALID_CHANNEL_ID),
        Error::InvalidPortId(_) => Some(det::E_PARAM_INVALID_PORT_ID),
        Error::InvalidGroup { .. } => Some(det::E_PARAM_INVALID_GROUP),
        Error::ParamPointer => Some(det::E_PARAM_POINTER),
        _ => None,
    }
}
