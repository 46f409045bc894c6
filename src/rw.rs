use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Clock, Error, Iqs7211e, Reg, I2C_ADDR};

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Level check of the active-low RDY line.
  ///
  /// Without a wired RDY line the device is always considered ready. A pin
  /// that cannot be read counts as not ready.
  pub(crate) fn is_ready(&mut self) -> bool {
    match self.rdy.as_mut() {
      Some(pin) => pin.is_low().unwrap_or(false),
      None => true,
    }
  }

  /// Busy-wait in 1 ms steps until the IQS7211E opens a communication window.
  ///
  /// Returns whether the window is open. Multiple register transactions can be
  /// issued inside one window, so call this once before a group of accesses
  /// rather than before every transfer.
  pub(crate) async fn wait_for_ready(&mut self, timeout_ms: u32) -> bool {
    if self.rdy.is_none() {
      return true;
    }

    let mut elapsed = 0;
    while !self.is_ready() && elapsed < timeout_ms {
      self.delay.delay_ms(1).await;
      elapsed += 1;
    }

    if elapsed >= timeout_ms {
      debug!("IQS7211E: RDY timeout after {}ms", timeout_ms);
      return self.is_ready();
    }
    true
  }

  /// Like [`Self::wait_for_ready`], but a closed window is an error.
  pub(crate) async fn require_ready(&mut self, timeout_ms: u32) -> Result<(), Error<E>> {
    if self.wait_for_ready(timeout_ms).await {
      Ok(())
    } else {
      Err(Error::NotReady)
    }
  }

  // Typed helpers
  pub(crate) async fn read<const N: usize, T: From<[u8; N]>>(&mut self, reg: Reg) -> Result<T, Error<E>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b).await?;
    Ok(T::from(b))
  }

  pub(crate) async fn read_u16(&mut self, reg: Reg) -> Result<u16, Error<E>> {
    let buf = self.read::<2, [u8; 2]>(reg).await?;
    Ok(u16::from_le_bytes(buf))
  }

  pub(crate) async fn write_u16(&mut self, reg: Reg, value: u16) -> Result<(), Error<E>> {
    self.write_bytes(reg, &value.to_le_bytes()).await
  }

  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let addr = [u8::from(reg)];
    self.i2c.write_read(I2C_ADDR, &addr, buf).await.map_err(Error::I2c)
  }

  pub(crate) async fn write_bytes(&mut self, reg: Reg, data: &[u8]) -> Result<(), Error<E>> {
    let len = data.len();
    if len > 31 {
      return Err(Error::BufferOverflow);
    }
    let mut buf = [0u8; 32];
    buf[0] = reg.into();
    buf[1..=len].copy_from_slice(data);
    self.i2c.write(I2C_ADDR, &buf[..=len]).await.map_err(Error::I2c)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mock::*;
  use embassy_futures::block_on;

  #[test]
  fn wait_for_ready_without_pin_returns_immediately() {
    let (chip, mut dev) = harness(false);
    chip.borrow_mut().ready = false;

    assert!(block_on(dev.wait_for_ready(100)));
    assert_eq!(chip.borrow().now_ms(), 0);
  }

  #[test]
  fn wait_for_ready_times_out_in_millisecond_steps() {
    let (chip, mut dev) = harness(true);
    chip.borrow_mut().ready = false;

    assert!(!block_on(dev.wait_for_ready(50)));
    assert_eq!(chip.borrow().now_ms(), 50);
    assert!(matches!(block_on(dev.require_ready(5)), Err(Error::NotReady)));
  }

  #[test]
  fn write_bytes_rejects_oversized_payloads() {
    let (chip, mut dev) = harness(true);
    let data = [0u8; 32];

    assert!(matches!(block_on(dev.write_bytes(Reg::ProxACycle0, &data)), Err(Error::BufferOverflow)));
    assert!(chip.borrow().writes.is_empty());
  }

  #[test]
  fn words_are_little_endian() {
    let (chip, mut dev) = harness(true);
    block_on(dev.write_u16(Reg::ConfigSettings, 0x0102)).unwrap();

    assert_eq!(chip.borrow().writes[0], (Reg::ConfigSettings as u8, std::vec![0x02, 0x01]));
    assert_eq!(block_on(dev.read_u16(Reg::ConfigSettings)).unwrap(), 0x0102);
  }
}
