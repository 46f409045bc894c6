use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{timing, Clock, Error, Iqs7211e, Reg};

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Push every window of `map` to the device.
  ///
  /// Each window is written in its own RDY window. A failing window does not
  /// stop the push; the first failure is returned once all windows have been
  /// attempted.
  pub(crate) async fn write_config(&mut self, map: &MemoryMap) -> Result<(), Error<E>> {
    let mut status = PushStatus::new();

    for (step, (reg, bytes)) in map.windows().into_iter().enumerate() {
      self.wait_for_ready(timing::READY_TIMEOUT_MS).await;
      let result = self.write_bytes(reg, bytes).await;
      if result.is_err() {
        warn!("IQS7211E: memory map window {} ({:?}) failed", step + 1, reg);
      } else {
        trace!("IQS7211E: memory map window {} ({:?}) written", step + 1, reg);
      }
      status.record(result);
    }

    if status.failures() > 0 {
      warn!("IQS7211E: memory map push had {} failed windows", status.failures());
    }
    status.finish()
  }
}

/// Outcome of a best-effort sequence of writes: remembers the first failure
/// while later writes keep going.
pub(crate) struct PushStatus<E> {
  first_error: Option<Error<E>>,
  failures: usize,
}

impl<E> PushStatus<E> {
  pub(crate) const fn new() -> Self {
    Self { first_error: None, failures: 0 }
  }

  pub(crate) fn record(&mut self, result: Result<(), Error<E>>) {
    if let Err(e) = result {
      self.failures += 1;
      if self.first_error.is_none() {
        self.first_error = Some(e);
      }
    }
  }

  pub(crate) fn failures(&self) -> usize {
    self.failures
  }

  pub(crate) fn finish(self) -> Result<(), Error<E>> {
    match self.first_error {
      Some(e) => Err(e),
      None => Ok(()),
    }
  }
}

/// Configuration block written to the device during bring-up.
///
/// Each field mirrors one contiguous window of the IQS7211E memory map, in
/// on-wire (little-endian) byte order, exactly as exported by the Azoteq GUI.
/// The block is only ever written; the device never reads it back.
///
/// # Example
/// ```no_run
/// use iqs7211e_pointing::MemoryMap;
///
/// static MAP: MemoryMap = MemoryMap {
///   // 20 ms active-mode report rate
///   timing: [
///     0x14, 0x00, 0x3C, 0x00, 0x1E, 0x00, 0x5A, 0x00, 0xB4, 0x00, 0x0A, 0x00,
///     0x3C, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x05, 0x08, 0x64, 0x00,
///   ],
///   ..MemoryMap::DEFAULT
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
  /// ALP ATI compensation A/B (0x1F..0x20).
  pub alp_compensation: [u8; 4],
  /// Trackpad and ALP ATI multipliers, dividers, drift limits and targets (0x21..0x27).
  pub ati: [u8; 14],
  /// Report rates, mode timeouts, re-ATI retry / reference update time and I²C timeout (0x28..0x32).
  pub timing: [u8; 22],
  /// System control, config settings and other settings (0x33..0x35).
  pub system: [u8; 6],
  /// ALP setup and ALP Tx enable (0x36..0x37).
  pub alp_setup: [u8; 4],
  /// Touch set/clear thresholds, ALP threshold and debounce (0x38..0x3A).
  pub thresholds: [u8; 6],
  /// ALP count and LTA betas for LP1/LP2 (0x3B..0x3C).
  pub filter_betas: [u8; 4],
  /// Conversion frequencies and hardware settings (0x3D..0x40).
  pub hardware: [u8; 8],
  /// Trackpad settings, resolution, XY filters, split factor and trims (0x41..0x49).
  pub trackpad: [u8; 18],
  /// Settings version (0x4A).
  pub settings_version: [u8; 2],
  /// Gesture enables, tap/hold/swipe timings and distances, palm threshold (0x4B..0x55).
  pub gestures: [u8; 22],
  /// Rx/Tx pin mapping (0x56..0x5C).
  pub rx_tx_mapping: [u8; 14],
  /// Channel allocation for cycles 0..=20 (0x5D..0x7C).
  pub cycles: [u8; 63],
}

impl MemoryMap {
  /// Azoteq reference settings for the IQS7211E evaluation trackpad.
  pub const DEFAULT: Self = Self {
    alp_compensation: [0x7C, 0x03, 0xC4, 0x03],
    ati: [0x81, 0x0A, 0x05, 0x32, 0x2C, 0x01, 0x32, 0x00, 0x23, 0x02, 0x02, 0x14, 0xC8, 0x00],
    timing: [
      0x0F, 0x00, 0x3C, 0x00, 0x1E, 0x00, 0x5A, 0x00, 0xB4, 0x00, 0x0A, 0x00, 0x3C, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x05,
      0x08, 0x64, 0x00,
    ],
    system: [0x00, 0x00, 0x2C, 0x06, 0x00, 0x00],
    alp_setup: [0x7E, 0x03, 0x81, 0x1F],
    thresholds: [0x14, 0x0E, 0x08, 0x00, 0x04, 0x04],
    filter_betas: [0xDC, 0x08, 0xF0, 0x10],
    hardware: [0x02, 0x1A, 0x02, 0x1A, 0x03, 0x8C, 0x67, 0x9C],
    trackpad: [
      0x28, 0x06, 0x07, 0x02, 0xE8, 0x03, 0xE8, 0x03, 0x06, 0x00, 0x7C, 0x00, 0x07, 0x80, 0x14, 0x03, 0x14, 0x14,
    ],
    settings_version: [0x00, 0x00],
    gestures: [
      0x1F, 0xFF, 0x96, 0x00, 0x96, 0x00, 0x32, 0x00, 0x2C, 0x01, 0x96, 0x00, 0xC8, 0x00, 0xC8, 0x00, 0x64, 0x00,
      0x64, 0x00, 0x17, 0x1E,
    ],
    rx_tx_mapping: [0x06, 0x05, 0x04, 0x01, 0x02, 0x03, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x00, 0x00],
    cycles: [
      // cycles 0..=9
      0x05, 0x03, 0xFF, 0x05, 0x04, 0x01, 0x05, 0xFF, 0x02, 0x05, 0x09, 0x06, 0x05, 0x0A, 0x07, //
      0x05, 0x0B, 0x08, 0x05, 0x0F, 0x0C, 0x05, 0x10, 0x0D, 0x05, 0x11, 0x0E, 0x05, 0x15, 0x12, //
      // cycles 10..=19
      0x05, 0x16, 0x13, 0x05, 0x17, 0x14, 0x05, 0x1B, 0x18, 0x05, 0x1C, 0x19, 0x05, 0x1D, 0x1A, //
      0x05, 0x21, 0x1E, 0x05, 0x22, 0x1F, 0x05, 0x23, 0x20, 0x05, 0x27, 0xFF, 0x05, 0x28, 0x25, //
      // cycle 20
      0x05, 0xFF, 0x26,
    ],
  };

  /// Active-mode report interval in milliseconds.
  pub const fn active_report_rate_ms(&self) -> u16 {
    u16::from_le_bytes([self.timing[0], self.timing[1]])
  }

  /// The register windows in the order they are pushed.
  pub(crate) fn windows(&self) -> [(Reg, &[u8]); 15] {
    [
      (Reg::AlpCompensationA, &self.alp_compensation[..]),
      (Reg::TpAtiMultipliers, &self.ati[..]),
      (Reg::ActiveModeReportRate, &self.timing[..]),
      (Reg::SysControl, &self.system[..]),
      (Reg::AlpSetup, &self.alp_setup[..]),
      (Reg::TouchSetClearThreshold, &self.thresholds[..]),
      (Reg::Lp1Filters, &self.filter_betas[..]),
      (Reg::TpConvFreq, &self.hardware[..]),
      (Reg::TpRxSettings, &self.trackpad[..]),
      (Reg::SettingsVersion, &self.settings_version[..]),
      (Reg::GestureEnable, &self.gestures[..]),
      (Reg::RxTxMapping0_1, &self.rx_tx_mapping[..]),
      (Reg::ProxACycle0, &self.cycles[..30]),
      (Reg::ProxACycle10, &self.cycles[30..60]),
      (Reg::ProxACycle20, &self.cycles[60..]),
    ]
  }
}

impl Default for MemoryMap {
  fn default() -> Self {
    Self::DEFAULT
  }
}
