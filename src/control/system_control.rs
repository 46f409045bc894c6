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
  /// Issue a software reset (SW_RESET bit) to the controller.
  pub(crate) async fn software_reset(&mut self) -> Result<(), Error<E>> {
    self.modify_sys_control(|sys| sys.set_sw_reset(true)).await
  }

  /// Trigger a fresh trackpad ATI routine.
  pub(crate) async fn trigger_auto_tune(&mut self) -> Result<(), Error<E>> {
    self.modify_sys_control(|sys| sys.set_tp_re_ati(true)).await
  }

  /// Whether the trackpad ATI routine requested through
  /// [`Self::trigger_auto_tune`] is still running. The device clears the
  /// TP_RE_ATI bit once calibration is done.
  pub(crate) async fn auto_tune_active(&mut self) -> Result<bool, Error<E>> {
    Ok(self.sys_control().await?.tp_re_ati())
  }

  pub(crate) async fn sys_control(&mut self) -> Result<SysControl, Error<E>> {
    self.read_u16(Reg::SysControl).await.map(SysControl::from_bits)
  }

  pub(crate) async fn write_sys_control(&mut self, control: SysControl) -> Result<(), Error<E>> {
    self.write_u16(Reg::SysControl, control.into_bits()).await
  }

  async fn modify_sys_control<F: FnOnce(&mut SysControl)>(&mut self, f: F) -> Result<(), Error<E>> {
    let mut control = self.sys_control().await?;
    f(&mut control);
    self.write_sys_control(control).await
  }
}

/// System control word (0x33).
#[bitfield(u16, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub struct SysControl {
  #[bits(3)]
  pub charge_mode: ChargeMode,
  pub tp_reseed: bool,
  pub alp_reseed: bool,
  pub tp_re_ati: bool,
  pub alp_re_ati: bool,
  pub ack_reset: bool,
  __: bool,
  pub sw_reset: bool,
  ___: bool,
  pub suspend: bool,
  #[bits(3)]
  ____: u8,
  pub tx_test: bool,
}

/// Power mode the controller is sensing in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeMode {
  Active,
  IdleTouch,
  Idle,
  LowPower1,
  LowPower2,
  /// Encodings 0b101..=0b111 are reserved by the datasheet.
  Reserved,
}

impl ChargeMode {
  pub const fn into_bits(self) -> u8 {
    match self {
      Self::Active => 0b000,
      Self::IdleTouch => 0b001,
      Self::Idle => 0b010,
      Self::LowPower1 => 0b011,
      Self::LowPower2 => 0b100,
      Self::Reserved => 0b111,
    }
  }

  pub const fn from_bits(bits: u8) -> Self {
    match bits & 0b111 {
      0b000 => Self::Active,
      0b001 => Self::IdleTouch,
      0b010 => Self::Idle,
      0b011 => Self::LowPower1,
      0b100 => Self::LowPower2,
      _ => Self::Reserved,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn control_bits_match_register_layout() {
    assert_eq!(SysControl::new().with_sw_reset(true).into_bits(), 1 << 9);
    assert_eq!(SysControl::new().with_ack_reset(true).into_bits(), 1 << 7);
    assert_eq!(SysControl::new().with_tp_re_ati(true).into_bits(), 1 << 5);
  }

  #[test]
  fn charge_mode_occupies_low_bits() {
    let control = SysControl::from_bits(0x0203);
    assert_eq!(control.charge_mode(), ChargeMode::LowPower1);
    assert!(control.sw_reset());
    assert_eq!(ChargeMode::from_bits(0b110), ChargeMode::Reserved);
  }
}
