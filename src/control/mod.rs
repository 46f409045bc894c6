use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Clock, Error, Iqs7211e, Reg};

mod config_settings;
mod system_control;

pub use config_settings::*;
pub use system_control::*;

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Fetch the product number and firmware revision as reported by the device.
  pub async fn app_version(&mut self) -> Result<Version, Error<E>> {
    self.read::<10, Version>(Reg::AppVersion).await
  }
}

/// Application version block (0x00..0x04).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
  pub number: u16,
  pub major: u8,
  pub minor: u8,
  pub commit: u32,
}

impl From<[u8; 10]> for Version {
  fn from(b: [u8; 10]) -> Self {
    // major and minor each occupy the low byte of their own word
    Self {
      number: u16::from_le_bytes([b[0], b[1]]),
      major: b[2],
      minor: b[4],
      commit: u32::from_le_bytes([b[6], b[7], b[8], b[9]]),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn version_block_decode() {
    let v = Version::from([0x58, 0x04, 0x01, 0x00, 0x02, 0x00, 0x78, 0x56, 0x34, 0x12]);
    assert_eq!(v.number, crate::PRODUCT_NUMBER);
    assert_eq!(v.major, 1);
    assert_eq!(v.minor, 2);
    assert_eq!(v.commit, 0x1234_5678);
  }
}
