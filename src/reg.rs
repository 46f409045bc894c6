/******************************************************************************
 * Refer to IQS7211E datasheet for more information, available here:          *
 * - https://www.azoteq.com/design/datasheets/                                *
 * ========================================================================== *
 *                       IQS7211E - Registers & Memory Map                    *
*******************************************************************************/

/// 7-bit I²C address of the IQS7211E.
pub const I2C_ADDR: u8 = 0x56;

/// Value of the product number register for an IQS7211E.
pub const PRODUCT_NUMBER: u16 = 0x0458;

/// Word registers touched by the driver. Every register is 16 bits wide and
/// little-endian; consecutive registers can be read or written in one burst.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Reg {
  // Version block (0x00..0x04)
  AppVersion = 0x00,

  // Touch data (0x0A..0x17)
  RelativeX = 0x0A,
  InfoFlags = 0x0F,
  Finger2X = 0x14,

  // ATI compensation & settings (0x1F..0x27)
  AlpCompensationA = 0x1F,
  TpAtiMultipliers = 0x21,

  // Report rates and timings (0x28..0x32)
  ActiveModeReportRate = 0x28,

  // System settings (0x33..0x35)
  SysControl = 0x33,
  ConfigSettings = 0x34,

  // ALP setup (0x36..0x37)
  AlpSetup = 0x36,

  // Thresholds (0x38..0x3A)
  TouchSetClearThreshold = 0x38,

  // Filter betas (0x3B..0x3C)
  Lp1Filters = 0x3B,

  // Hardware (0x3D..0x40)
  TpConvFreq = 0x3D,

  // Trackpad setup (0x41..0x49)
  TpRxSettings = 0x41,

  // Settings version (0x4A)
  SettingsVersion = 0x4A,

  // Gesture settings (0x4B..0x55)
  GestureEnable = 0x4B,

  // Rx/Tx mapping (0x56..0x5C)
  RxTxMapping0_1 = 0x56,

  // Cycle allocation (0x5D..0x7C)
  ProxACycle0 = 0x5D,
  ProxACycle10 = 0x6C,
  ProxACycle20 = 0x7B,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}
