//! Configuration tables and feature switches for the DIO and CanIf modules.
//!
//! Tables are validated once when they are built and are read-only afterwards;
//! the drivers only ever borrow them.

use crate::canif::{CanId, PduId};
use crate::channel::{ChannelGroup, ChannelId, PortChannel, PortId};
use crate::consts;
use crate::error::{Error, Result};
use log::debug;
use std::collections::HashSet;

// --- DIO ---

/// Optional DIO services and development error detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DioFeatures {
    /// Report development errors to the DET.
    pub dev_error_detect: bool,
    /// Provide `flip_channel`.
    pub flip_channel_api: bool,
    /// Provide `get_version_info`.
    pub version_info_api: bool,
}

impl Default for DioFeatures {
    fn default() -> Self {
        DioFeatures {
            dev_error_detect: true,
            flip_channel_api: true,
            version_info_api: true,
        }
    }
}

impl DioFeatures {
    /// Production build: no DET reporting and none of the optional services.
    pub fn minimal() -> Self {
        DioFeatures {
            dev_error_detect: false,
            flip_channel_api: false,
            version_info_api: false,
        }
    }
}

/// The DIO channel-to-port table and channel group definitions.
#[derive(Debug, Clone)]
pub struct DioConfig {
    channels: Vec<PortChannel>,
    groups: Vec<ChannelGroup>,
    features: DioFeatures,
}

impl DioConfig {
    /// Builds and validates a configuration.
    ///
    /// Fails if a channel is listed twice, names a pin or port the device does
    /// not have, or if a group is empty or not aligned to its offset.
    pub fn new(
        channels: Vec<PortChannel>,
        groups: Vec<ChannelGroup>,
        features: DioFeatures,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &channels {
            if entry.channel.raw() > consts::dio::MAX_CHANNEL_ID
                || entry.channel.pin() >= consts::dio::PORT_WIDTH
            {
                return Err(Error::Config(format!(
                    "channel 0x{:02X} does not exist on this device",
                    entry.channel
                )));
            }
            if entry.port.number() > consts::dio::MAX_PORT_ID {
                return Err(Error::Config(format!(
                    "channel 0x{:02X} mapped to unknown port {}",
                    entry.channel, entry.port
                )));
            }
            if !seen.insert(entry.channel) {
                return Err(Error::Config(format!(
                    "channel 0x{:02X} is configured more than once",
                    entry.channel
                )));
            }
        }

        for (index, group) in groups.iter().enumerate() {
            if group.mask == 0 {
                return Err(Error::Config(format!("channel group {} is empty", index)));
            }
            if u32::from(group.offset) != group.mask.trailing_zeros() {
                return Err(Error::Config(format!(
                    "channel group {} offset {} does not match mask 0x{:02X}",
                    index, group.offset, group.mask
                )));
            }
            if group.port.number() > consts::dio::MAX_PORT_ID {
                return Err(Error::Config(format!(
                    "channel group {} defined on unknown port {}",
                    index, group.port
                )));
            }
        }

        debug!(
            "DIO configuration: {} channels, {} groups, {:?}",
            channels.len(),
            groups.len(),
            features
        );
        Ok(DioConfig {
            channels,
            groups,
            features,
        })
    }

    pub fn channels(&self) -> &[PortChannel] {
        &self.channels
    }

    pub fn groups(&self) -> &[ChannelGroup] {
        &self.groups
    }

    /// Returns the group at `index` of the table.
    pub fn group(&self, index: usize) -> Option<&ChannelGroup> {
        self.groups.get(index)
    }

    pub fn features(&self) -> DioFeatures {
        self.features
    }

    /// Looks a channel up in the table.
    pub fn channel(&self, id: ChannelId) -> Option<&PortChannel> {
        self.channels.iter().find(|entry| entry.channel == id)
    }

    /// True if at least one configured channel lives on `port`.
    pub fn uses_port(&self, port: PortId) -> bool {
        self.channels.iter().any(|entry| entry.port == port)
    }

    /// True if `group` refers to an entry of this table (by identity, not value).
    pub fn contains_group(&self, group: &ChannelGroup) -> bool {
        self.groups.iter().any(|entry| std::ptr::eq(entry, group))
    }
}

// --- CanIf ---

/// Optional CanIf services and development error detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanIfFeatures {
    /// Report development errors to the DET.
    pub dev_error_detect: bool,
    /// Provide `read_tx_notif_status`.
    pub read_tx_notify_status_api: bool,
    /// Provide `read_rx_notif_status`.
    pub read_rx_notify_status_api: bool,
    /// Provide `set_dynamic_tx_id`.
    pub set_dynamic_tx_id_api: bool,
    /// Provide `get_version_info`.
    pub version_info_api: bool,
}

impl Default for CanIfFeatures {
    fn default() -> Self {
        CanIfFeatures {
            dev_error_detect: true,
            read_tx_notify_status_api: true,
            read_rx_notify_status_api: true,
            set_dynamic_tx_id_api: true,
            version_info_api: true,
        }
    }
}

impl CanIfFeatures {
    /// Production build: no DET reporting and none of the optional services.
    pub fn minimal() -> Self {
        CanIfFeatures {
            dev_error_detect: false,
            read_tx_notify_status_api: false,
            read_rx_notify_status_api: false,
            set_dynamic_tx_id_api: false,
            version_info_api: false,
        }
    }
}

/// Static configuration of one transmit L-PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxPduConfig {
    /// CAN identifier used until `set_dynamic_tx_id` replaces it.
    pub can_id: CanId,
    /// Keep a notification status readable via `read_tx_notif_status`.
    pub read_notify_status: bool,
}

/// Static configuration of one receive L-PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxPduConfig {
    pub can_id: CanId,
    /// Keep a notification status readable via `read_rx_notif_status`.
    pub read_notify_status: bool,
}

/// The CanIf PDU tables. A PDU's ID is its index in its table.
#[derive(Debug, Clone)]
pub struct CanIfConfig {
    tx_pdus: Vec<TxPduConfig>,
    rx_pdus: Vec<RxPduConfig>,
}

impl CanIfConfig {
    /// Builds a configuration. Fails if a table is too large to be indexed by a PDU ID.
    pub fn new(tx_pdus: Vec<TxPduConfig>, rx_pdus: Vec<RxPduConfig>) -> Result<Self> {
        let max = usize::from(PduId::MAX) + 1;
        if tx_pdus.len() > max || rx_pdus.len() > max {
            return Err(Error::Config(format!(
                "PDU tables exceed {} entries (tx {}, rx {})",
                max,
                tx_pdus.len(),
                rx_pdus.len()
            )));
        }
        debug!(
            "CanIf configuration: {} Tx PDUs, {} Rx PDUs",
            tx_pdus.len(),
            rx_pdus.len()
        );
        Ok(CanIfConfig { tx_pdus, rx_pdus })
    }

    pub fn tx_pdus(&self) -> &[TxPduConfig] {
        &self.tx_pdus
    }

    pub fn rx_pdus(&self) -> &[RxPduConfig] {
        &self.rx_pdus
    }
}
