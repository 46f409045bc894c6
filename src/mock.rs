//! In-memory IQS7211E used by the unit tests.
//!
//! Models the register file as little-endian words, the reset/acknowledge
//! handshake through the reset flag, ATI as a countdown of control-word reads,
//! an optional RDY busy period after each write, and a virtual clock shared by
//! the delay provider and the millisecond clock.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

use crate::{Clock, Iqs7211e, Reg, I2C_ADDR, PRODUCT_NUMBER};

const SYS_CONTROL: usize = Reg::SysControl as usize;
const INFO_FLAGS: usize = Reg::InfoFlags as usize;
const SHOW_RESET: u16 = 1 << 7;
const TP_RE_ATI: u16 = 1 << 5;
const ACK_RESET: u16 = 1 << 7;
const SW_RESET: u16 = 1 << 9;

pub(crate) type Chip = Rc<RefCell<ChipState>>;

pub(crate) struct ChipState {
  pub regs: [u16; 0x100],
  pub now_ns: u64,
  /// Register pointer of every read, in order.
  pub reads: Vec<u8>,
  /// Register and payload of every acknowledged write.
  pub writes: Vec<(u8, Vec<u8>)>,
  /// Virtual time in ms of every acknowledged write, parallel to `writes`.
  pub write_times: Vec<u32>,
  /// Level of the RDY window (true = open).
  pub ready: bool,
  /// How long RDY stays closed after each acknowledged write.
  pub busy_after_write_ms: u32,
  reopen_at_ns: u64,
  pub fail_all: bool,
  /// Register whose transfers are NACKed.
  pub nack: Option<u8>,
  /// Whether a software reset raises the reset flag.
  pub reports_reset: bool,
  /// Control-word reads that still see TP_RE_ATI set after it is requested.
  pub ati_polls: u32,
  ati_remaining: Option<u32>,
  pointer: u8,
}

impl ChipState {
  fn new() -> Self {
    let mut regs = [0u16; 0x100];
    regs[Reg::AppVersion as usize] = PRODUCT_NUMBER;
    Self {
      regs,
      now_ns: 0,
      reads: Vec::new(),
      writes: Vec::new(),
      write_times: Vec::new(),
      ready: true,
      busy_after_write_ms: 0,
      reopen_at_ns: 0,
      fail_all: false,
      nack: None,
      reports_reset: true,
      ati_polls: 2,
      ati_remaining: None,
      pointer: 0,
    }
  }

  pub fn now_ms(&self) -> u32 {
    (self.now_ns / 1_000_000) as u32
  }

  pub fn advance_ms(&mut self, ms: u32) {
    self.now_ns += ms as u64 * 1_000_000;
  }

  fn window_open(&self) -> bool {
    self.ready && self.now_ns >= self.reopen_at_ns
  }

  fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
    if self.fail_all {
      return Err(ErrorKind::Other);
    }
    if address != I2C_ADDR {
      return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    for op in operations.iter_mut() {
      match op {
        Operation::Write(bytes) => {
          let Some((&reg, data)) = bytes.split_first() else {
            continue;
          };
          if self.nack == Some(reg) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
          }
          self.pointer = reg;
          if !data.is_empty() {
            self.store(reg, data);
            self.writes.push((reg, data.to_vec()));
            self.write_times.push(self.now_ms());
            self.reopen_at_ns = self.now_ns + self.busy_after_write_ms as u64 * 1_000_000;
          }
        }
        Operation::Read(buf) => {
          if self.nack == Some(self.pointer) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
          }
          self.reads.push(self.pointer);
          self.load(self.pointer, buf);
        }
      }
    }
    Ok(())
  }

  fn covers(reg: u8, len: usize, target: usize) -> bool {
    let start = reg as usize;
    (start..start + (len + 1) / 2).contains(&target)
  }

  fn store(&mut self, reg: u8, data: &[u8]) {
    for (i, byte) in data.iter().enumerate() {
      let word = &mut self.regs[(reg as usize + i / 2) % 0x100];
      if i % 2 == 0 {
        *word = (*word & 0xFF00) | *byte as u16;
      } else {
        *word = (*word & 0x00FF) | ((*byte as u16) << 8);
      }
    }

    if Self::covers(reg, data.len(), SYS_CONTROL) {
      self.control_written();
    }
  }

  fn control_written(&mut self) {
    let control = self.regs[SYS_CONTROL];
    if control & SW_RESET != 0 {
      self.regs[SYS_CONTROL] &= !SW_RESET;
      if self.reports_reset {
        self.regs[INFO_FLAGS] |= SHOW_RESET;
      }
    }
    if control & ACK_RESET != 0 {
      self.regs[SYS_CONTROL] &= !ACK_RESET;
      self.regs[INFO_FLAGS] &= !SHOW_RESET;
    }
    if control & TP_RE_ATI != 0 && self.ati_remaining.is_none() {
      self.ati_remaining = Some(self.ati_polls);
    }
  }

  fn load(&mut self, reg: u8, buf: &mut [u8]) {
    if Self::covers(reg, buf.len(), SYS_CONTROL) {
      match self.ati_remaining {
        Some(0) => {
          self.regs[SYS_CONTROL] &= !TP_RE_ATI;
          self.ati_remaining = None;
        }
        Some(n) => self.ati_remaining = Some(n - 1),
        None => {}
      }
    }

    for (i, byte) in buf.iter_mut().enumerate() {
      let word = self.regs[(reg as usize + i / 2) % 0x100];
      *byte = if i % 2 == 0 { word as u8 } else { (word >> 8) as u8 };
    }
  }
}

pub(crate) struct FakeI2c {
  chip: Chip,
}

impl ErrorType for FakeI2c {
  type Error = ErrorKind;
}

impl I2c for FakeI2c {
  async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    self.chip.borrow_mut().transaction(address, operations)
  }
}

pub(crate) struct FakeDelay {
  chip: Chip,
}

impl DelayNs for FakeDelay {
  async fn delay_ns(&mut self, ns: u32) {
    self.chip.borrow_mut().now_ns += ns as u64;
  }
}

/// Active-low RDY line following [`ChipState::ready`], held closed for
/// [`ChipState::busy_after_write_ms`] after every write.
pub(crate) struct FakePin {
  chip: Chip,
}

impl digital::ErrorType for FakePin {
  type Error = Infallible;
}

impl digital::InputPin for FakePin {
  fn is_high(&mut self) -> Result<bool, Self::Error> {
    Ok(!self.chip.borrow().window_open())
  }

  fn is_low(&mut self) -> Result<bool, Self::Error> {
    Ok(self.chip.borrow().window_open())
  }
}

pub(crate) struct FakeClock {
  chip: Chip,
}

impl Clock for FakeClock {
  fn now_ms(&mut self) -> u32 {
    self.chip.borrow().now_ms()
  }
}

pub(crate) type Device = Iqs7211e<FakeI2c, FakeDelay, FakePin, FakeClock>;

/// A fresh chip and a driver wired to it, with or without the RDY line.
pub(crate) fn harness(with_pin: bool) -> (Chip, Device) {
  let chip: Chip = Rc::new(RefCell::new(ChipState::new()));
  let rdy = with_pin.then(|| FakePin { chip: chip.clone() });
  let dev = Iqs7211e::new(
    FakeI2c { chip: chip.clone() },
    FakeDelay { chip: chip.clone() },
    rdy,
    FakeClock { chip: chip.clone() },
  );
  (chip, dev)
}
