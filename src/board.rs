//! Link-time configuration of the LED evaluation board.
//!
//! Three LEDs on port B pins 4-6, and two channel groups on port B.

use crate::canif::{CanId, PduId};
use crate::channel::{ChannelGroup, ChannelId, PortChannel, PortId};
use crate::config::{CanIfConfig, DioConfig, DioFeatures, RxPduConfig, TxPduConfig};
use crate::error::Result;

pub const LED1: ChannelId = ChannelId::new(PortId::B, 4);
pub const LED2: ChannelId = ChannelId::new(PortId::B, 5);
pub const LED3: ChannelId = ChannelId::new(PortId::B, 6);

pub const LED1_PORT: PortId = PortId::B;
pub const LED2_PORT: PortId = PortId::B;
pub const LED3_PORT: PortId = PortId::B;

/// Index of group 0 (mask 0xCE) in the DIO table.
pub const GROUP_0: usize = 0;
/// Index of group 1 (mask 0x8E) in the DIO table.
pub const GROUP_1: usize = 1;

pub const CHANNELS: [PortChannel; 3] = [
    PortChannel::new(LED1, LED1_PORT),
    PortChannel::new(LED2, LED2_PORT),
    PortChannel::new(LED3, LED3_PORT),
];

pub const CHANNEL_GROUPS: [ChannelGroup; 2] = [
    ChannelGroup::new(0xCE, 1, LED1_PORT),
    ChannelGroup::new(0x8E, 1, LED1_PORT),
];

/// Direction register value the port driver programs on port B: pins 0-6 output.
pub const PORT_B_DIRECTION: u8 = 0x7F;

/// The board's DIO configuration.
pub fn dio_config(features: DioFeatures) -> Result<DioConfig> {
    DioConfig::new(CHANNELS.to_vec(), CHANNEL_GROUPS.to_vec(), features)
}

/// Tx PDU of the periodic LED status frame.
pub const TX_LED_STATUS: PduId = 0;
/// Tx PDU of the diagnostic response, without notification status.
pub const TX_DIAG_RESPONSE: PduId = 1;
/// Rx PDU of the LED command frame.
pub const RX_LED_COMMAND: PduId = 0;

/// The board's CanIf configuration.
pub fn canif_config() -> Result<CanIfConfig> {
    CanIfConfig::new(
        vec![
            TxPduConfig {
                can_id: CanId::standard(0x120),
                read_notify_status: true,
            },
            TxPduConfig {
                can_id: CanId::extended(0x18DA_F110),
                read_notify_status: false,
            },
        ],
        vec![RxPduConfig {
            can_id: CanId::standard(0x121),
            read_notify_status: true,
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_tables_are_valid() {
        let dio = dio_config(DioFeatures::default()).unwrap();
        assert_eq!(dio.channels().len(), 3);
        assert_eq!(dio.group(GROUP_0).unwrap().mask, 0xCE);
        assert_eq!(dio.group(GROUP_1).unwrap().mask, 0x8E);

        let canif = canif_config().unwrap();
        assert_eq!(canif.tx_pdus().len(), 2);
        assert_eq!(canif.rx_pdus().len(), 1);
    }
}
