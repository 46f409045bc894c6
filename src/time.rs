/// Free-running millisecond counter.
///
/// The counter is allowed to wrap; the driver only ever looks at differences
/// computed with [`elapsed_ms`].
pub trait Clock {
  fn now_ms(&mut self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &mut T {
  fn now_ms(&mut self) -> u32 {
    T::now_ms(self)
  }
}

/// Milliseconds from `since` to `now`, correct across one counter wrap.
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
  now.wrapping_sub(since)
}

/// [`Clock`] backed by the `embassy-time` driver.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
  fn now_ms(&mut self) -> u32 {
    embassy_time::Instant::now().as_millis() as u32
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn elapsed_survives_wraparound() {
    assert_eq!(elapsed_ms(10, u32::MAX - 9), 20);
    assert_eq!(elapsed_ms(250, 100), 150);
  }
}
