use bitfield_struct::bitfield;

use crate::ChargeMode;

/// Info flags word (0x0F).
#[bitfield(u16, defmt = cfg(feature = "defmt"))]
#[derive(PartialEq, Eq)]
pub struct InfoFlags {
  #[bits(3)]
  pub charge_mode: ChargeMode,
  pub ati_error: bool,
  pub re_ati_occurred: bool,
  pub alp_ati_error: bool,
  pub alp_re_ati_occurred: bool,
  /// Set after any reset until the host acknowledges it.
  pub show_reset: bool,
  #[bits(2)]
  pub num_fingers: u8,
  pub tp_movement: bool,
  __: bool,
  pub too_many_fingers: bool,
  ___: bool,
  pub alp_output: bool,
  ____: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finger_count_and_reset_flag_positions() {
    let info = InfoFlags::from_bits(0b0000_0110_1000_0000);
    assert!(info.show_reset());
    assert_eq!(info.num_fingers(), 2);
    assert!(info.tp_movement());
    assert_eq!(info.charge_mode(), ChargeMode::Active);
  }
}
