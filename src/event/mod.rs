use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{timing, Clock, Error, Iqs7211e, Reg};

mod gesture;
mod info;
mod sample;

pub use gesture::*;
pub use info::*;
pub use sample::*;

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Read one raw sample (relative motion, gesture, info flags and finger 1)
  /// in a single RDY window.
  pub async fn sample(&mut self) -> Result<Sample, Error<E>> {
    self.require_ready(timing::SHORT_READY_TIMEOUT_MS).await?;
    self.read::<18, Sample>(Reg::RelativeX).await
  }

  /// Read the info flags word on its own.
  pub async fn info(&mut self) -> Result<InfoFlags, Error<E>> {
    self.read_u16(Reg::InfoFlags).await.map(InfoFlags::from_bits)
  }

  /// Read the absolute position of the second finger.
  ///
  /// The bulk sample ends with finger 1's strength, so finger 2 always needs
  /// its own transfer. Only meaningful while two fingers are down.
  pub async fn secondary_finger(&mut self) -> Result<Point, Error<E>> {
    self.read::<4, Point>(Reg::Finger2X).await
  }
}

/// Absolute trackpad coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
  pub x: u16,
  pub y: u16,
}

impl Point {
  pub const fn new(x: u16, y: u16) -> Self {
    Self { x, y }
  }
}

impl From<[u8; 4]> for Point {
  fn from(b: [u8; 4]) -> Self {
    Self::new(u16::from_le_bytes([b[0], b[1]]), u16::from_le_bytes([b[2], b[3]]))
  }
}

impl core::fmt::Debug for Point {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}
