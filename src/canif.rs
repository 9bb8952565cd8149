//! CAN Interface: L-PDU notification status and dynamic Tx CAN identifiers.
//!
//! The notification flags are set from the lower layer's confirmation and
//! indication callbacks, which run in interrupt context, and are read-and-reset
//! by the application. The Tx CAN identifiers can be replaced at runtime while a
//! transmit request may be reading them. Both kinds of state are only touched
//! inside `critical_section::with`, which restores the previous interrupt state
//! on every exit path.

use crate::config::{CanIfConfig, CanIfFeatures};
use crate::consts::{self, canif::sid};
use crate::det::{DetReport, ErrorReporter};
use crate::error::{Error, Result};
use crate::types::VersionInfo;
use critical_section::Mutex;
use log::{debug, trace};
use std::cell::Cell;
use std::fmt;

/// Index of an L-PDU in its CanIf table.
pub type PduId = u16;

/// A CAN identifier as used on the CanIf/Can interface.
///
/// Bit 31 selects a 29-bit extended identifier, bit 30 marks a CAN FD frame.
/// The bits between the flags and the identifier must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanId(u32);

impl CanId {
    /// Validates a raw identifier.
    pub fn new(raw: u32) -> Result<Self> {
        if Self::is_valid(raw) {
            Ok(CanId(raw))
        } else {
            Err(Error::InvalidCanId(raw))
        }
    }

    /// An 11-bit standard identifier; bits above bit 10 are dropped.
    pub const fn standard(id: u16) -> Self {
        CanId(id as u32 & 0x7FF)
    }

    /// A 29-bit extended identifier; bits above bit 28 are dropped.
    pub const fn extended(id: u32) -> Self {
        CanId((id & 0x1FFF_FFFF) | consts::canif::can_id::TYPE_MASK)
    }

    /// True if `raw` leaves clear the reserved bits of its identifier type.
    pub fn is_valid(raw: u32) -> bool {
        use consts::canif::can_id::*;
        if raw & TYPE_MASK == 0 {
            raw & STANDARD_RESERVED_MASK == 0
        } else {
            raw & EXTENDED_RESERVED_MASK == 0
        }
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.0 & consts::canif::can_id::TYPE_MASK != 0
    }

    #[inline]
    pub fn is_fd(&self) -> bool {
        self.0 & consts::canif::can_id::FD_FLAG != 0
    }

    /// The identifier without the format flags.
    pub fn identifier(&self) -> u32 {
        if self.is_extended() {
            self.0 & 0x1FFF_FFFF
        } else {
            self.0 & 0x7FF
        }
    }
}

impl fmt::Display for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extended() {
            write!(f, "0x{:08X} (ext)", self.identifier())?;
        } else {
            write!(f, "0x{:03X}", self.identifier())?;
        }
        if self.is_fd() {
            write!(f, " (FD)")?;
        }
        Ok(())
    }
}

/// Notification status of an L-PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifStatus {
    #[default]
    NoNotification,
    TxRxNotification,
}

/// Initialization state of a CanIf instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanIfState {
    Uninit,
    Init,
}

/// A CanIf instance.
///
/// Created uninitialized; every service except [`CanIf::init`] and
/// [`CanIf::get_version_info`] fails with [`Error::Uninit`] until `init` has run.
/// After `init` all services take `&self`, so the instance can be shared with
/// the interrupt handlers that deliver confirmations.
pub struct CanIf<'a> {
    features: CanIfFeatures,
    det: &'a dyn ErrorReporter,
    config: Option<&'a CanIfConfig>,
    tx_can_ids: Vec<Mutex<Cell<CanId>>>,
    tx_notif: Vec<Mutex<Cell<NotifStatus>>>,
    rx_notif: Vec<Mutex<Cell<NotifStatus>>>,
}

impl<'a> CanIf<'a> {
    pub fn new(features: CanIfFeatures, det: &'a dyn ErrorReporter) -> Self {
        CanIf {
            features,
            det,
            config: None,
            tx_can_ids: Vec::new(),
            tx_notif: Vec::new(),
            rx_notif: Vec::new(),
        }
    }

    pub fn features(&self) -> CanIfFeatures {
        self.features
    }

    pub fn state(&self) -> CanIfState {
        if self.config.is_some() {
            CanIfState::Init
        } else {
            CanIfState::Uninit
        }
    }

    /// Loads the configured CAN identifiers, clears every notification status
    /// and moves the module to the initialized state. Calling it again resets
    /// any identifier changed with `set_dynamic_tx_id`.
    pub fn init(&mut self, config: &'a CanIfConfig) {
        self.tx_can_ids = config
            .tx_pdus()
            .iter()
            .map(|pdu| Mutex::new(Cell::new(pdu.can_id)))
            .collect();
        self.tx_notif = config
            .tx_pdus()
            .iter()
            .map(|_| Mutex::new(Cell::new(NotifStatus::NoNotification)))
            .collect();
        self.rx_notif = config
            .rx_pdus()
            .iter()
            .map(|_| Mutex::new(Cell::new(NotifStatus::NoNotification)))
            .collect();
        self.config = Some(config);
        debug!(
            "CanIf initialized: {} Tx PDUs, {} Rx PDUs",
            self.tx_notif.len(),
            self.rx_notif.len()
        );
    }

    // --- Notification status ---

    /// Returns the notification status of a Tx L-PDU and resets it.
    ///
    /// A confirmation is reported by at most one call; the next call without a
    /// new confirmation returns `NoNotification`.
    pub fn read_tx_notif_status(&self, pdu: PduId) -> Result<NotifStatus> {
        self.require(
            self.features.read_tx_notify_status_api,
            sid::READ_TX_NOTIF_STATUS,
        )?;
        let config = self.initialized(sid::READ_TX_NOTIF_STATUS)?;
        let flag = match config.tx_pdus().get(usize::from(pdu)) {
            Some(cfg) if cfg.read_notify_status => &self.tx_notif[usize::from(pdu)],
            _ => return self.fail(sid::READ_TX_NOTIF_STATUS, Error::InvalidTxPduId(pdu)),
        };
        let status =
            critical_section::with(|cs| flag.borrow(cs).replace(NotifStatus::NoNotification));
        trace!("Tx PDU {} notification status: {:?}", pdu, status);
        Ok(status)
    }

    /// Returns the notification status of an Rx L-PDU and resets it.
    pub fn read_rx_notif_status(&self, pdu: PduId) -> Result<NotifStatus> {
        self.require(
            self.features.read_rx_notify_status_api,
            sid::READ_RX_NOTIF_STATUS,
        )?;
        let config = self.initialized(sid::READ_RX_NOTIF_STATUS)?;
        let flag = match config.rx_pdus().get(usize::from(pdu)) {
            Some(cfg) if cfg.read_notify_status => &self.rx_notif[usize::from(pdu)],
            _ => return self.fail(sid::READ_RX_NOTIF_STATUS, Error::InvalidRxPduId(pdu)),
        };
        let status =
            critical_section::with(|cs| flag.borrow(cs).replace(NotifStatus::NoNotification));
        trace!("Rx PDU {} notification status: {:?}", pdu, status);
        Ok(status)
    }

    /// Transmit confirmation callback: marks a Tx L-PDU as sent.
    ///
    /// Only PDUs configured with `read_notify_status` keep a status.
    pub fn tx_confirmation(&self, pdu: PduId) -> Result<()> {
        let config = self.initialized(sid::TX_CONFIRMATION)?;
        let Some(cfg) = config.tx_pdus().get(usize::from(pdu)) else {
            return self.fail(sid::TX_CONFIRMATION, Error::InvalidTxPduId(pdu));
        };
        if cfg.read_notify_status {
            let flag = &self.tx_notif[usize::from(pdu)];
            critical_section::with(|cs| flag.borrow(cs).set(NotifStatus::TxRxNotification));
            trace!("Tx PDU {} confirmed", pdu);
        }
        Ok(())
    }

    /// Receive indication callback: marks an Rx L-PDU as received.
    pub fn rx_indication(&self, pdu: PduId) -> Result<()> {
        let config = self.initialized(sid::RX_INDICATION)?;
        let Some(cfg) = config.rx_pdus().get(usize::from(pdu)) else {
            return self.fail(sid::RX_INDICATION, Error::InvalidRxPduId(pdu));
        };
        if cfg.read_notify_status {
            let flag = &self.rx_notif[usize::from(pdu)];
            critical_section::with(|cs| flag.borrow(cs).set(NotifStatus::TxRxNotification));
            trace!("Rx PDU {} indicated", pdu);
        }
        Ok(())
    }

    // --- Dynamic Tx identifiers ---

    /// Replaces the CAN identifier used by subsequent transmissions of a Tx L-PDU.
    pub fn set_dynamic_tx_id(&self, pdu: PduId, can_id: u32) -> Result<()> {
        self.require(self.features.set_dynamic_tx_id_api, sid::SET_DYNAMIC_TX_ID)?;
        self.initialized(sid::SET_DYNAMIC_TX_ID)?;
        let Some(slot) = self.tx_can_ids.get(usize::from(pdu)) else {
            return self.fail(sid::SET_DYNAMIC_TX_ID, Error::InvalidTxPduId(pdu));
        };
        let can_id = match CanId::new(can_id) {
            Ok(id) => id,
            Err(e) => return self.fail(sid::SET_DYNAMIC_TX_ID, e),
        };
        critical_section::with(|cs| slot.borrow(cs).set(can_id));
        debug!("Tx PDU {} CAN ID set to {}", pdu, can_id);
        Ok(())
    }

    /// The CAN identifier a transmit request for `pdu` uses right now.
    ///
    /// This is a query for the transmit path, not a CanIf service, so failures
    /// are returned but not reported to the DET.
    pub fn tx_pdu_can_id(&self, pdu: PduId) -> Result<CanId> {
        if self.config.is_none() {
            return Err(Error::Uninit);
        }
        let slot = self
            .tx_can_ids
            .get(usize::from(pdu))
            .ok_or(Error::InvalidTxPduId(pdu))?;
        Ok(critical_section::with(|cs| slot.borrow(cs).get()))
    }

    // --- Version ---

    /// Fills `out` with the module's version information. Allowed before `init`.
    pub fn get_version_info(&self, out: Option<&mut VersionInfo>) -> Result<()> {
        self.require(self.features.version_info_api, sid::GET_VERSION_INFO)?;
        let Some(out) = out else {
            return self.fail(sid::GET_VERSION_INFO, Error::ParamPointer);
        };
        *out = version_info();
        Ok(())
    }

    // --- Helpers ---

    fn initialized(&self, service_id: u8) -> Result<&'a CanIfConfig> {
        match self.config {
            Some(config) => Ok(config),
            None => self.fail(service_id, Error::Uninit),
        }
    }

    fn require(&self, enabled: bool, service_id: u8) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(Error::ServiceDisabled {
                module_id: consts::canif::MODULE_ID,
                service_id,
            })
        }
    }

    // Reports `error` to the DET once (if enabled) and returns it.
    fn fail<T>(&self, service_id: u8, error: Error) -> Result<T> {
        if self.features.dev_error_detect {
            if let Some(error_id) = det_code(&error) {
                self.det.report_error(DetReport::new(
                    consts::canif::MODULE_ID,
                    consts::canif::INSTANCE_ID,
                    service_id,
                    error_id,
                ));
            }
        }
        Err(error)
    }
}

/// The CanIf module's version information.
pub fn version_info() -> VersionInfo {
    VersionInfo {
        vendor_id: consts::VENDOR_ID,
        module_id: consts::canif::MODULE_ID,
        sw_major_version: consts::canif::SW_MAJOR_VERSION,
        sw_minor_version: consts::canif::SW_MINOR_VERSION,
        sw_patch_version: consts::canif::SW_PATCH_VERSION,
    }
}

fn det_code(error: &Error) -> Option<u8> {
    use consts::canif::det;
    match error {
        Error::InvalidCanId(_) => Some(det::E_PARAM_CANID),
        Error::ParamPointer => Some(det::E_PARAM_POINTER),
        Error::Uninit => Some(det::E_UNINIT),
        Error::InvalidTxPduId(_) => Some(det::E_INVALID_TXPDUID),
        Error::InvalidRxPduId(_) => Some(det::E_INVALID_RXPDUID),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_id_legality() {
        assert!(CanId::is_valid(0x7FF));
        assert!(!CanId::is_valid(0x800));
        assert!(CanId::is_valid(0x4000_0123)); // FD flag
        assert!(!CanId::is_valid(0x3000_0000));
    }

    #[test]
    fn extended_id_legality() {
        assert!(CanId::is_valid(0x9FFF_FFFF));
        assert!(!CanId::is_valid(0xA000_0000));
        assert!(CanId::is_valid(0xC000_0001)); // FD flag
    }

    #[test]
    fn can_id_constructors() {
        let std_id = CanId::standard(0x123);
        assert!(!std_id.is_extended());
        assert_eq!(std_id.identifier(), 0x123);
        assert_eq!(std_id.to_string(), "0x123");

        let ext_id = CanId::extended(0x18DA_F110);
        assert!(ext_id.is_extended());
        assert_eq!(ext_id.raw(), 0x98DA_F110);
        assert_eq!(ext_id.identifier(), 0x18DA_F110);
        assert!(CanId::is_valid(ext_id.raw()));

        assert_eq!(CanId::new(0x800), Err(Error::InvalidCanId(0x800)));
    }

    #[test]
    fn det_code_mapping() {
        assert_eq!(det_code(&Error::InvalidCanId(0)), Some(10));
        assert_eq!(det_code(&Error::ParamPointer), Some(20));
        assert_eq!(det_code(&Error::Uninit), Some(30));
        assert_eq!(det_code(&Error::InvalidTxPduId(0)), Some(50));
        assert_eq!(det_code(&Error::InvalidRxPduId(0)), Some(60));
        assert_eq!(det_code(&Error::InvalidPortId(crate::channel::PortId::A)), None);
    }

    #[test]
    fn version_info_values() {
        let info = version_info();
        assert_eq!(info.vendor_id, 0x40);
        assert_eq!(info.module_id, 60);
        assert_eq!(
            (info.sw_major_version, info.sw_minor_version, info.sw_patch_version),
            (1, 0, 0)
        );
    }
}
