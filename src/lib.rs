#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` pointing-device driver for the Azoteq IQS7211E capacitive
//! trackpad controller.
//!
//! The driver brings the controller from power-on to event-driven reporting
//! and turns the raw finger coordinates it streams into mouse-style motion
//! reports:
//!
//! - Software reset, product verification and reset confirmation
//! - Bulk push of a [`MemoryMap`] (ATI targets, report rates, thresholds,
//!   filter betas, Rx/Tx allocation) followed by the ATI calibration routine
//! - One-finger pointer motion, two-finger scrolling, tap to click,
//!   two-finger tap to right click and double-tap-drag
//! - An optional RDY line used as a liveness gate for every bus transaction
//!
//! ```no_run
//! use embedded_hal::digital::InputPin;
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use iqs7211e_pointing::{Clock, Iqs7211e};
//!
//! async fn example<I2C, D, RDY, C, E>(i2c: I2C, delay: D, rdy: RDY, clock: C)
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//!   RDY: InputPin,
//!   C: Clock,
//! {
//!   let mut trackpad = Iqs7211e::new(i2c, delay, Some(rdy), clock);
//!   _ = trackpad.initialize().await;
//!
//!   loop {
//!     let report = trackpad.poll().await;
//!     // forward `report` to the host's mouse endpoint
//!     # let _ = report;
//!   }
//! }
//! ```

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

mod config;
mod control;
mod event;
mod init;
#[cfg(test)]
mod mock;
mod reg;
mod rw;
mod time;
pub mod timing;
mod touchpad;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use config::*;
pub use control::*;
pub use event::*;
pub use init::{InitFailure, InitStatus, Session};
pub use reg::{I2C_ADDR, PRODUCT_NUMBER};
pub use time::*;
pub use touchpad::*;

use reg::Reg;

/// Errors that can occur while interacting with the controller.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// The RDY line did not open a communication window in time.
  NotReady,
  /// The device reported an unexpected product number during bring-up.
  InvalidProductNumber(u16),
  /// The device did not report a fresh reset after the software reset.
  MissingReset,
  /// The ATI calibration routine did not finish within its poll budget.
  AutoTuneTimeout,
  /// An operation attempted to write a buffer larger than the protocol allows.
  BufferOverflow,
}

/// Driver for the Azoteq IQS7211E in pointing-device mode.
///
/// The driver owns the I²C peripheral, a delay provider, the optional RDY
/// input and a millisecond [`Clock`]. It also owns the [`Session`] recorded by
/// [`Iqs7211e::initialize`] and the gesture [`Touchpad`] state consumed by
/// [`Iqs7211e::poll`], so a single instance is everything the host needs.
pub struct Iqs7211e<I, D, RDY, C> {
  i2c: I,
  delay: D,
  rdy: Option<RDY>,
  clock: C,
  memory_map: &'static MemoryMap,
  session: Session,
  touchpad: Touchpad,
}

impl<I, D, RDY, C> Iqs7211e<I, D, RDY, C> {
  /// Create a new driver instance with the provided peripherals.
  ///
  /// Pass `None` for `rdy` when the RDY line is not wired; every ready wait
  /// then reports ready immediately. Nothing is sent to the device until
  /// [`Iqs7211e::initialize`] is called.
  pub fn new(i2c: I, delay: D, rdy: Option<RDY>, clock: C) -> Self {
    Self {
      i2c,
      delay,
      rdy,
      clock,
      memory_map: &MemoryMap::DEFAULT,
      session: Session::new(),
      touchpad: Touchpad::new(),
    }
  }

  /// Replace the configuration block pushed during bring-up.
  pub fn with_memory_map(mut self, memory_map: &'static MemoryMap) -> Self {
    self.memory_map = memory_map;
    self
  }

  /// Device session recorded by the last bring-up attempt.
  pub fn session(&self) -> &Session {
    &self.session
  }

  /// Gesture decoder state carried between polls.
  pub fn touchpad(&self) -> &Touchpad {
    &self.touchpad
  }

  /// Consume the driver and return the owned peripherals.
  pub fn release(self) -> (I, D, Option<RDY>, C) {
    (self.i2c, self.delay, self.rdy, self.clock)
  }
}

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Produce the motion report for this poll cycle.
  ///
  /// Never fails: before a successful bring-up, while the RDY line is
  /// deasserted, or when the bus misbehaves the report is all zero and the
  /// decoder state is left untouched, so the next good sample picks up where
  /// the last one left off.
  ///
  /// In event mode the device only opens a RDY window when it has something
  /// to report, so with the line wired an idle pad yields zero reports. That
  /// includes a double-tap drag held still: the decoder keeps the drag, but
  /// `buttons` lacks LEFT until the next sample arrives. Hosts that forward
  /// button state should latch it between non-empty reports (see
  /// [`Touchpad::is_dragging`]).
  pub async fn poll(&mut self) -> MotionReport {
    if !self.session.is_ready() {
      return MotionReport::default();
    }

    if self.session.has_ready_pin() && !self.is_ready() {
      return MotionReport::default();
    }

    let contacts = match self.contacts().await {
      Ok(contacts) => contacts,
      Err(Error::NotReady) => {
        debug!("IQS7211E: device not ready for data read");
        return MotionReport::default();
      }
      Err(_) => {
        warn!("IQS7211E: sample read failed");
        return MotionReport::default();
      }
    };

    let now = self.clock.now_ms();
    self.touchpad.update(contacts, now)
  }

  /// Fetch one raw sample and resolve the active contacts.
  async fn contacts(&mut self) -> Result<Contacts, Error<E>> {
    let sample = self.sample().await?;
    if let Some(gesture) = sample.gesture() {
      trace!("IQS7211E: chip gesture {:?}", gesture);
    }

    match sample.info.num_fingers() {
      1 => Ok(Contacts::One(sample.primary)),
      2 => {
        let secondary = self.secondary_finger().await?;
        Ok(Contacts::Two(sample.primary, secondary))
      }
      _ => Ok(Contacts::None),
    }
  }
}
