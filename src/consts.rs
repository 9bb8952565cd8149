//! Internal constants: module identifiers, service IDs, DET error codes and register layout.

// Shared vendor ID for every module in this stack
pub const VENDOR_ID: u16 = 0x40;

// --- DIO Driver ---
pub mod dio {
    pub const MODULE_ID: u16 = 120;
    pub const INSTANCE_ID: u8 = 0x00;

    pub const SW_MAJOR_VERSION: u8 = 0x01;
    pub const SW_MINOR_VERSION: u8 = 0x00;
    pub const SW_PATCH_VERSION: u8 = 0x00;

    /// Highest channel ID on the Tiva C (port F, pin 3).
    pub const MAX_CHANNEL_ID: u8 = 0x53;
    /// Highest port ID on the Tiva C (port F).
    pub const MAX_PORT_ID: u8 = 5;
    /// Number of GPIO ports (A..F).
    pub const PORT_COUNT: usize = MAX_PORT_ID as usize + 1;
    /// Pins per port data register.
    pub const PORT_WIDTH: u8 = 8;

    // Service IDs
    pub mod sid {
        pub const READ_CHANNEL: u8 = 0x00;
        pub const WRITE_CHANNEL: u8 = 0x01;
        pub const READ_PORT: u8 = 0x02;
        pub const WRITE_PORT: u8 = 0x03;
        pub const READ_CHANNEL_GROUP: u8 = 0x04;
        pub const WRITE_CHANNEL_GROUP: u8 = 0x05;
        pub const FLIP_CHANNEL: u8 = 0x11;
        pub const GET_VERSION_INFO: u8 = 0x12;
    }

    // DET error codes
    pub mod det {
        pub const E_PARAM_INVALID_CHANNEL_ID: u8 = 0x0A;
        pub const E_PARAM_INVALID_PORT_ID: u8 = 0x14;
        pub const E_PARAM_INVALID_GROUP: u8 = 0x1F;
        pub const E_PARAM_POINTER: u8 = 0x20;
    }
}

// --- CAN Interface ---
pub mod canif {
    pub const MODULE_ID: u16 = 60;
    pub const INSTANCE_ID: u8 = 0x00;

    pub const SW_MAJOR_VERSION: u8 = 0x01;
    pub const SW_MINOR_VERSION: u8 = 0x00;
    pub const SW_PATCH_VERSION: u8 = 0x00;

    // Service IDs
    pub mod sid {
        pub const READ_TX_NOTIF_STATUS: u8 = 0x07;
        pub const READ_RX_NOTIF_STATUS: u8 = 0x08;
        pub const GET_VERSION_INFO: u8 = 0x0B;
        pub const SET_DYNAMIC_TX_ID: u8 = 0x0C;
        pub const TX_CONFIRMATION: u8 = 0x13;
        pub const RX_INDICATION: u8 = 0x14;
    }

    // DET error codes
    pub mod det {
        pub const E_PARAM_CANID: u8 = 10;
        pub const E_PARAM_POINTER: u8 = 20;
        pub const E_UNINIT: u8 = 30;
        pub const E_INVALID_TXPDUID: u8 = 50;
        pub const E_INVALID_RXPDUID: u8 = 60;
    }

    // CAN identifier layout
    pub mod can_id {
        /// Set for a 29-bit extended identifier.
        pub const TYPE_MASK: u32 = 0x8000_0000;
        /// CAN FD frame format flag, legal for both identifier types.
        pub const FD_FLAG: u32 = 0x4000_0000;
        /// Bits a standard identifier must leave clear.
        pub const STANDARD_RESERVED_MASK: u32 = 0x3FFF_F800;
        /// Bit an extended identifier must leave clear.
        pub const EXTENDED_RESERVED_MASK: u32 = 0x2000_0000;
    }
}

// --- Tiva C GPIO register layout ---
pub mod gpio {
    // APB aperture base addresses, indexed by port ID
    pub const PORT_BASE_ADDRESSES: [usize; super::dio::PORT_COUNT] = [
        0x4000_4000, // A
        0x4000_5000, // B
        0x4000_6000, // C
        0x4000_7000, // D
        0x4002_4000, // E
        0x4002_5000, // F
    ];

    /// DATA register; address bits [9:2] mask which pins an access touches.
    pub const REG_DATA: usize = 0x000;
    /// DATA alias with every pin unmasked.
    pub const REG_DATA_ALL: usize = REG_DATA + 0x3FC;
    /// Direction register, 1 = output.
    pub const REG_DIR: usize = 0x400;
}
