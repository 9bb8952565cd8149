//! Register access layer for 8-bit GPIO ports.
//!
//! Every register access of the DIO driver goes through [`PortRegisters`].
//! Two implementations are provided:
//!
//! *   [`MmioPort`] talks to the memory-mapped GPIO block of the Tiva C. This is
//!     the only place in the crate that computes register addresses or uses
//!     `unsafe`.
//! *   [`SimPort`] keeps the registers in atomics so the driver can run on a host,
//!     and lets tests drive the level of input pins from "outside".
//!
//! Port-wide updates must reach the data register as a single store, so the
//! masked write is part of the trait rather than a read-modify-write done by the
//! caller.

use crate::channel::PortLevel;
use crate::consts;
use log::trace;
use std::sync::atomic::{AtomicU8, Ordering};

/// The registers of a GPIO port the DIO driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Pin levels.
    Data,
    /// Pin directions, 1 = output.
    Direction,
}

/// Typed access to one GPIO port.
///
/// Implementations must make `write`, `write_masked` and `toggle_bit` appear as
/// one indivisible update to any other context (including interrupts).
pub trait PortRegisters {
    /// Reads a whole register.
    fn read(&self, reg: Register) -> u8;

    /// Writes a whole register in one store.
    fn write(&self, reg: Register, value: u8);

    /// Updates only the data bits selected by `mask` to the matching bits of
    /// `value`: `new = (old & !mask) | (value & mask)`.
    fn write_masked(&self, mask: u8, value: u8);

    /// Inverts the data bit at `bit` in one indivisible update.
    fn toggle_bit(&self, bit: u8);

    /// Reads a single bit of a register.
    #[inline]
    fn get_bit(&self, reg: Register, bit: u8) -> bool {
        self.read(reg) & (1 << bit) != 0
    }

    /// Sets a single data bit.
    #[inline]
    fn set_bit(&self, bit: u8) {
        self.write_masked(1 << bit, 0xFF);
    }

    /// Clears a single data bit.
    #[inline]
    fn clear_bit(&self, bit: u8) {
        self.write_masked(1 << bit, 0x00);
    }

    /// Reads the data register.
    #[inline]
    fn get_port(&self) -> PortLevel {
        self.read(Register::Data)
    }

    /// Writes the data register.
    #[inline]
    fn set_port(&self, value: PortLevel) {
        self.write(Register::Data, value);
    }
}

// --- Memory-mapped port ---

/// A Tiva C GPIO port accessed through its memory-mapped registers.
#[derive(Debug)]
pub struct MmioPort {
    base: usize,
}

impl MmioPort {
    /// Creates a port handle for the GPIO block at `base`.
    ///
    /// # Safety
    /// `base` must be the base address of a GPIO block whose clock is enabled,
    /// and no other code may create a second handle to the same block.
    pub const unsafe fn new(base: usize) -> Self {
        MmioPort { base }
    }

    /// Creates handles for ports A..F at their APB addresses.
    ///
    /// # Safety
    /// All six GPIO blocks must be clocked and not owned elsewhere.
    pub unsafe fn tiva_ports() -> [MmioPort; consts::dio::PORT_COUNT] {
        consts::gpio::PORT_BASE_ADDRESSES.map(|base| MmioPort { base })
    }

    /// Base address of the GPIO block.
    pub fn base(&self) -> usize {
        self.base
    }

    #[inline]
    fn reg_addr(&self, reg: Register) -> usize {
        match reg {
            Register::Data => self.base + consts::gpio::REG_DATA_ALL,
            Register::Direction => self.base + consts::gpio::REG_DIR,
        }
    }

    // Address bits [9:2] select which pins a store to DATA affects.
    #[inline]
    fn masked_data_addr(&self, mask: u8) -> usize {
        self.base + consts::gpio::REG_DATA + ((mask as usize) << 2)
    }
}

impl PortRegisters for MmioPort {
    fn read(&self, reg: Register) -> u8 {
        let addr = self.reg_addr(reg);
        // SAFETY: `addr` lies inside the GPIO block guaranteed by `MmioPort::new`.
        let value = unsafe { core::ptr::read_volatile(addr as *const u32) } as u8;
        trace!("Read {:?} @0x{:08X} = 0x{:02X}", reg, addr, value);
        value
    }

    fn write(&self, reg: Register, value: u8) {
        let addr = self.reg_addr(reg);
        trace!("Write {:?} @0x{:08X} = 0x{:02X}", reg, addr, value);
        // SAFETY: see `read`.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value as u32) };
    }

    fn write_masked(&self, mask: u8, value: u8) {
        if mask == 0 {
            return;
        }
        let addr = self.masked_data_addr(mask);
        trace!(
            "Write DATA @0x{:08X}: mask=0x{:02X}, value=0x{:02X}",
            addr,
            mask,
            value
        );
        // SAFETY: see `read`; pins outside `mask` are ignored by the hardware.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value as u32) };
    }

    fn toggle_bit(&self, bit: u8) {
        let mask = 1u8 << bit;
        critical_section::with(|_| {
            let current = self.read(Register::Data);
            self.write_masked(mask, !current);
        });
    }
}

// --- Simulated port ---

/// A GPIO port simulated in memory.
///
/// Writes to input pins are ignored, like on the real hardware; the level of an
/// input pin is driven with [`SimPort::drive_input`].
#[derive(Debug, Default)]
pub struct SimPort {
    data: AtomicU8,
    direction: AtomicU8,
}

impl SimPort {
    /// Creates a port with all pins input and low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a port with the given direction register and data register.
    pub fn with_state(direction: u8, data: u8) -> Self {
        SimPort {
            data: AtomicU8::new(data),
            direction: AtomicU8::new(direction),
        }
    }

    /// Creates six simulated ports, A..F.
    pub fn bank() -> [SimPort; consts::dio::PORT_COUNT] {
        std::array::from_fn(|_| SimPort::new())
    }

    /// Configures pin directions (1 = output), as the port driver would at startup.
    pub fn set_direction(&self, direction: u8) {
        self.direction.store(direction, Ordering::SeqCst);
    }

    /// Applies external levels to input pins; bits of output pins in `mask` are ignored.
    pub fn drive_input(&self, mask: u8, levels: u8) {
        let inputs = mask & !self.direction.load(Ordering::SeqCst);
        self.update_data(inputs, levels);
    }

    fn update_data(&self, mask: u8, value: u8) {
        // The closure never returns None, so the update cannot fail.
        self.data
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |old| {
                Some((old & !mask) | (value & mask))
            })
            .ok();
    }
}

impl PortRegisters for SimPort {
    fn read(&self, reg: Register) -> u8 {
        let value = match reg {
            Register::Data => self.data.load(Ordering::SeqCst),
            Register::Direction => self.direction.load(Ordering::SeqCst),
        };
        trace!("Sim read {:?} = 0x{:02X}", reg, value);
        value
    }

    fn write(&self, reg: Register, value: u8) {
        trace!("Sim write {:?} = 0x{:02X}", reg, value);
        match reg {
            Register::Data => {
                let outputs = self.direction.load(Ordering::SeqCst);
                self.update_data(outputs, value);
            }
            Register::Direction => self.direction.store(value, Ordering::SeqCst),
        }
    }

    fn write_masked(&self, mask: u8, value: u8) {
        let outputs = mask & self.direction.load(Ordering::SeqCst);
        trace!(
            "Sim write DATA: mask=0x{:02X}, value=0x{:02X}",
            mask,
            value
        );
        self.update_data(outputs, value);
    }

    fn toggle_bit(&self, bit: u8) {
        let mask = (1u8 << bit) & self.direction.load(Ordering::SeqCst);
        self.data.fetch_xor(mask, Ordering::SeqCst);
    }
}
