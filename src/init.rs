use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{timing, Clock, Error, InterruptMode, Iqs7211e, Touchpad, PRODUCT_NUMBER};

/// Bring-up steps, run strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum InitState {
  ConfigureReady,
  Reset,
  Identify,
  ConfirmReset,
  PushConfig,
  AckReset,
  AutoTune,
  AwaitAutoTune,
  EnterEventMode,
}

/// Outcome of the last [`Iqs7211e::initialize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStatus {
  #[default]
  NotStarted,
  Ready,
  Failed(InitFailure),
}

/// Why bring-up stopped. A storable copy of [`Error`] without the bus error
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitFailure {
  Bus,
  NotReady,
  ProductMismatch(u16),
  MissingReset,
  AutoTuneTimeout,
}

impl<E> From<&Error<E>> for InitFailure {
  fn from(e: &Error<E>) -> Self {
    match e {
      Error::I2c(_) | Error::BufferOverflow => Self::Bus,
      Error::NotReady => Self::NotReady,
      Error::InvalidProductNumber(n) => Self::ProductMismatch(*n),
      Error::MissingReset => Self::MissingReset,
      Error::AutoTuneTimeout => Self::AutoTuneTimeout,
    }
  }
}

/// What the driver learned about the device during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
  status: InitStatus,
  product_number: Option<u16>,
  ready_pin: bool,
}

impl Session {
  pub const fn new() -> Self {
    Self { status: InitStatus::NotStarted, product_number: None, ready_pin: false }
  }

  pub fn status(&self) -> InitStatus {
    self.status
  }

  /// True once bring-up has completed; polling is a no-op otherwise.
  pub fn is_ready(&self) -> bool {
    self.status == InitStatus::Ready
  }

  /// Product number read during identification, if that step was reached.
  pub fn product_number(&self) -> Option<u16> {
    self.product_number
  }

  /// Whether the RDY line gates bus access.
  pub fn has_ready_pin(&self) -> bool {
    self.ready_pin
  }
}

impl<I, E, D, RDY, C> Iqs7211e<I, D, RDY, C>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  RDY: InputPin,
  C: Clock,
{
  /// Bring the controller from power-on to event-mode reporting.
  ///
  /// The outcome is recorded in [`Iqs7211e::session`] as well as returned;
  /// after a failure [`Iqs7211e::poll`] stays a no-op. Calling this again
  /// starts over from a fresh session and decoder state and re-runs every
  /// step.
  pub async fn initialize(&mut self) -> Result<(), Error<E>> {
    self.session = Session::new();
    self.touchpad = Touchpad::new();

    match self.bring_up().await {
      Ok(()) => {
        info!("IQS7211E: initialization complete");
        self.session.status = InitStatus::Ready;
        Ok(())
      }
      Err(e) => {
        let failure = InitFailure::from(&e);
        error!("IQS7211E: initialization failed: {:?}", failure);
        self.session.status = InitStatus::Failed(failure);
        Err(e)
      }
    }
  }

  async fn bring_up(&mut self) -> Result<(), Error<E>> {
    let mut state = InitState::ConfigureReady;

    loop {
      debug!("IQS7211E: init step {:?}", state);

      match state {
        InitState::ConfigureReady => {
          self.session.ready_pin = self.rdy.is_some();
          if self.session.ready_pin {
            info!("IQS7211E: RDY line wired");
          } else {
            info!("IQS7211E: no RDY line, polling every cycle");
          }
          state = InitState::Reset;
        }

        InitState::Reset => {
          self.wait_for_ready(timing::READY_TIMEOUT_MS).await;
          self.software_reset().await?;
          self.delay.delay_ms(timing::RESET_SETTLE_MS).await;
          state = InitState::Identify;
        }

        InitState::Identify => {
          self.require_ready(timing::READY_TIMEOUT_MS).await?;
          let version = self.app_version().await?;
          self.session.product_number = Some(version.number);
          if version.number != PRODUCT_NUMBER {
            return Err(Error::InvalidProductNumber(version.number));
          }
          info!("IQS7211E: device found, firmware {}.{}", version.major, version.minor);
          state = InitState::ConfirmReset;
        }

        InitState::ConfirmReset => {
          // The reset flag tells us the device is waiting for settings. If it
          // is missing the device is wedged or already configured by someone
          // else.
          self.require_ready(timing::SHORT_READY_TIMEOUT_MS).await?;
          if !self.info().await?.show_reset() {
            return Err(Error::MissingReset);
          }
          info!("IQS7211E: reset event confirmed");
          state = InitState::PushConfig;
        }

        InitState::PushConfig => {
          self.write_config(self.memory_map).await?;
          state = InitState::AckReset;
        }

        InitState::AckReset => {
          self.wait_for_ready(timing::SHORT_READY_TIMEOUT_MS).await;
          let control = self.sys_control().await?;
          self.wait_for_ready(timing::SHORT_READY_TIMEOUT_MS).await;
          self.write_sys_control(control.with_ack_reset(true)).await?;
          self.delay.delay_ms(timing::ACK_SETTLE_MS).await;
          state = InitState::AutoTune;
        }

        InitState::AutoTune => {
          self.wait_for_ready(timing::READY_TIMEOUT_MS).await;
          self.trigger_auto_tune().await?;
          state = InitState::AwaitAutoTune;
        }

        InitState::AwaitAutoTune => {
          // If the ATI routine is active the channel states (NONE, PROX, TOUCH)
          // might exhibit unwanted behaviour, so wait for it to finish.
          let mut attempts = 0;
          while self.auto_tune_running().await {
            attempts += 1;
            if attempts >= timing::AUTO_TUNE_POLL_ATTEMPTS {
              return Err(Error::AutoTuneTimeout);
            }
            self.delay.delay_ms(timing::AUTO_TUNE_POLL_MS).await;
          }
          info!("IQS7211E: ATI completed after {} checks", attempts + 1);
          state = InitState::EnterEventMode;
        }

        InitState::EnterEventMode => {
          self.wait_for_ready(timing::LONG_READY_TIMEOUT_MS).await;
          self.set_interrupt_mode(InterruptMode::Event).await?;
          let interval = self.memory_map.active_report_rate_ms() as u32;
          self.delay.delay_ms(interval + 1).await;
          return Ok(());
        }
      }
    }
  }

  /// ATI counts as still running whenever its status cannot be read.
  async fn auto_tune_running(&mut self) -> bool {
    if !self.wait_for_ready(timing::READY_TIMEOUT_MS).await {
      debug!("IQS7211E: device not ready for ATI check");
      return true;
    }
    match self.auto_tune_active().await {
      Ok(active) => active,
      Err(_) => true,
    }
  }
}
