//! # autosar-bsw
//!
//! An AUTOSAR 4.3.1 style Basic Software subset for the TI Tiva C: the Digital
//! I/O (DIO) driver and the notification / dynamic-identifier part of the CAN
//! Interface (CanIf).
//!
//! ## Features
//!
//! *   DIO driver ([`Dio`]):
//!     *   Channel access (`read_channel`, `write_channel`, `flip_channel`).
//!     *   Port access (`read_port`, `write_port`).
//!     *   Channel group access (`read_channel_group`, `write_channel_group`),
//!         masked and shifted to bit 0.
//!     *   Writes never change pins configured as input.
//!     *   Port and group writes are a single masked store.
//! *   CanIf ([`CanIf`]):
//!     *   Read-and-reset notification status for Tx and Rx L-PDUs.
//!     *   Runtime replacement of Tx CAN identifiers (`set_dynamic_tx_id`).
//!     *   Confirmation/indication callbacks safe to call from interrupt context.
//! *   Development error reporting through a pluggable DET ([`det::ErrorReporter`]).
//! *   Typed register access ([`port::PortRegisters`]) with a memory-mapped
//!     implementation for the target and a simulated one for the host.
//!
//! ## Error Handling
//!
//! Every service returns [`Result`]. A failed call has already been reported to
//! the DET (when `dev_error_detect` is on) and has not touched the hardware.
//! Use `unwrap_or_default()` to get the AUTOSAR sentinel of a read service
//! (`Level::Low`, `0` or `NotifStatus::NoNotification`).
//!
//! ## Critical Sections
//!
//! CanIf uses the [`critical-section`](https://docs.rs/critical-section) crate.
//! On the target, link a critical-section implementation for your core (e.g.
//! `cortex-m` with the `critical-section-single-core` feature). On a host, enable
//! the `std` feature of `critical-section`.
//!
//! ## Basic Usage
//!
//! ```
//! use autosar_bsw::{
//!     board,
//!     det::LogReporter,
//!     port::SimPort,
//!     ChannelId, Dio, DioFeatures, Level, PortId, Result,
//! };
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let config = board::dio_config(DioFeatures::default())?;
//!     let ports = SimPort::bank();
//!     ports[1].set_direction(board::PORT_B_DIRECTION);
//!
//!     let det = LogReporter;
//!     let dio = Dio::new(&config, ports, &det);
//!
//!     dio.write_channel(board::LED1, Level::High)?;
//!     assert_eq!(dio.read_channel(board::LED1)?, Level::High);
//!
//!     let group = &dio.channel_groups()[board::GROUP_0];
//!     dio.write_channel_group(group, 0b0100_0111)?;
//!     println!("Port B: 0x{:02X}", dio.read_port(PortId::B)?);
//!
//!     // Unknown channels are reported and read back as LOW
//!     let level = dio.read_channel(ChannelId::from_raw(0xFF)).unwrap_or_default();
//!     assert_eq!(level, Level::Low);
//!     Ok(())
//! }
//! ```
//!
//! ## Channel Encoding
//!
//! *   A channel ID is `(port << 4) | pin`, e.g. PB4 = `0x14`.
//! *   The highest channel on the Tiva C is PF3 (`0x53`), the highest port is F (`5`).
//! *   The pin is always taken from the low nibble; the port from the configuration table.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

pub mod board;
pub mod canif;
pub mod channel;
pub mod config;
pub mod consts;
pub mod det;
pub mod dio;
mod error;
pub mod port;
pub mod types;

pub use canif::{CanId, CanIf, CanIfState, NotifStatus, PduId};
pub use channel::{ChannelGroup, ChannelId, Direction, Level, PortChannel, PortId, PortLevel};
pub use config::{CanIfConfig, CanIfFeatures, DioConfig, DioFeatures, RxPduConfig, TxPduConfig};
pub use dio::Dio;
pub use error::{Error, Result};
pub use types::VersionInfo;
