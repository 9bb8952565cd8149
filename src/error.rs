use crate::canif::PduId;
use crate::channel::{ChannelId, PortId};
use thiserror::Error;

/// Errors that can occur when calling the DIO and CanIf services.
///
/// All of these are development errors: a bad ID, a bad reference or a call
/// made in the wrong module state. None of them leaves a module unusable, and
/// a failed write never touches the hardware.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Channel ID is above the device maximum or not present in the configuration.
    #[error("Invalid DIO channel ID 0x{0:02X}")]
    InvalidChannelId(ChannelId),
    /// Port ID is above the device maximum or not used by the configuration.
    #[error("Invalid DIO port ID {0}")]
    InvalidPortId(PortId),
    /// Channel group reference is not an entry of the configuration table.
    #[error("Channel group (mask 0x{mask:02X}, offset {offset}) is not part of the configuration")]
    InvalidGroup {
        /// Mask of the rejected group.
        mask: u8,
        /// Offset of the rejected group.
        offset: u8,
    },
    /// A required output reference was missing.
    #[error("Null pointer passed for an output parameter")]
    ParamPointer,
    /// The module was used before its init service ran.
    #[error("Module used before initialization")]
    Uninit,
    /// Tx PDU ID is out of range or has no notification status configured.
    #[error("Invalid Tx PDU ID {0}")]
    InvalidTxPduId(PduId),
    /// Rx PDU ID is out of range or has no notification status configured.
    #[error("Invalid Rx PDU ID {0}")]
    InvalidRxPduId(PduId),
    /// CAN identifier sets bits reserved for its identifier type.
    #[error("Invalid CAN ID 0x{0:08X}")]
    InvalidCanId(u32),
    /// The service is switched off in the module's feature configuration.
    #[error("Service 0x{service_id:02X} of module {module_id} is disabled")]
    ServiceDisabled {
        /// Module the service belongs to.
        module_id: u16,
        /// Service (API) ID.
        service_id: u8,
    },
    /// The configuration table violates a structural invariant.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for DIO and CanIf operations.
///
/// This is a convenience alias for `std::result::Result<T, Error>` used
/// throughout the crate to reduce boilerplate.
pub type Result<T> = std::result::Result<T, Error>;
