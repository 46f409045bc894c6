//! Bring-up followed by the per-cycle poll loop, with drag latching.
#![allow(unused)]
use embedded_hal::digital::InputPin;
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use iqs7211e_pointing::{Buttons, Clock, InitStatus, Iqs7211e, MotionReport};

#[allow(dead_code)]
async fn main_async<I2C, D, RDY, C, E>(i2c: I2C, mut delay: D, rdy: RDY, clock: C) -> Result<(), iqs7211e_pointing::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs + Clone,
  RDY: InputPin,
  C: Clock,
{
  let mut dev = Iqs7211e::new(i2c, delay.clone(), Some(rdy), clock);
  dev.initialize().await?;
  debug_assert_eq!(dev.session().status(), InitStatus::Ready);

  loop {
    let mut report: MotionReport = dev.poll().await;

    // idle polls come back empty while RDY stays high; keep a held drag
    if dev.touchpad().is_dragging() {
      report.buttons |= Buttons::LEFT;
    }

    let _ = (report.x, report.y, report.wheel, report.pan, report.buttons);
    // forward the report to the host's mouse endpoint

    delay.delay_ms(1).await;
  }
}

fn main() {}
