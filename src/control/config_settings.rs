use bitfield_struct::bitfield;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Clock, Error, Iqs7211e, Reg};

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Update the interrupt delivery mode (Event or Stream).
  pub async fn set_interrupt_mode(&mut self, mode: InterruptMode) -> Result<(), Error<E>> {
    self.modify_config_settings(|cfg| cfg.set_interrupt_mode(mode)).await
  }

  /// Fetch the current config settings word from the device.
  pub async fn config_settings(&mut self) -> Result<ConfigSettings, Error<E>> {
    self.read_u16(Reg::ConfigSettings).await.map(ConfigSettings::from_bits)
  }

  async fn modify_config_settings<F: FnOnce(&mut ConfigSettings)>(&mut self, f: F) -> Result<(), Error<E>> {
    let mut settings = self.config_settings().await?;
    f(&mut settings);
    self.write_u16(Reg::ConfigSettings, settings.into_bits()).await
  }
}

/// Config settings word (0x34).
#[bitfield(u16, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub struct ConfigSettings {
  #[bits(2)]
  __: u8,
  pub tp_re_ati_enable: bool,
  pub alp_re_ati_enable: bool,
  pub comms_request_enable: bool,
  pub watchdog: bool,
  pub comms_end_cmd: bool,
  pub manual_control: bool,
  #[bits(1)]
  pub interrupt_mode: InterruptMode,
  pub gesture_event: bool,
  pub tp_event: bool,
  pub re_ati_event: bool,
  ___: bool,
  pub alp_event: bool,
  pub tp_touch_event: bool,
  ____: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
  /// I2C is presented each cycle (except auto-prox cycles)
  Stream,
  /// I2C is only initiated when an enabled event occurs
  Event,
}

impl InterruptMode {
  pub const fn into_bits(self) -> u8 {
    match self {
      Self::Stream => 0b0,
      Self::Event => 0b1,
    }
  }

  pub const fn from_bits(bits: u8) -> Self {
    match bits & 0b1 {
      0b0 => Self::Stream,
      _ => Self::Event,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn event_mode_is_bit_eight() {
    let settings = ConfigSettings::new().with_interrupt_mode(InterruptMode::Event);
    assert_eq!(settings.into_bits(), 1 << 8);
  }

  #[test]
  fn reference_settings_decode() {
    // Azoteq reference value: re-ATI enables, watchdog, TP and gesture events
    let settings = ConfigSettings::from_bits(0x062C);
    assert!(settings.tp_re_ati_enable());
    assert!(settings.watchdog());
    assert!(settings.gesture_event());
    assert!(settings.tp_event());
    assert_eq!(settings.interrupt_mode(), InterruptMode::Stream);
  }
}
