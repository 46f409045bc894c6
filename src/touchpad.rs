//! Pointer gesture decoder turning successive finger samples into
//! mouse-style motion reports.
//!
//! The decoder is pure state: it is fed the contacts seen in each poll
//! together with a millisecond timestamp and never touches the bus, so it can
//! be driven directly in tests or by hosts that fetch samples themselves.
//!
//! - One finger moving: relative pointer motion
//! - Two fingers moving: scroll from the motion of their midpoint
//! - Quick one-finger tap: left click, released after
//!   [`CLICK_RELEASE_MS`](crate::timing::CLICK_RELEASE_MS)
//! - Quick two-finger tap: right click
//! - Tap, then tap again within
//!   [`DOUBLE_TAP_WINDOW_MS`](crate::timing::DOUBLE_TAP_WINDOW_MS): left button
//!   held until the next lift that is not itself a tap

use bitflags::bitflags;

use crate::time::elapsed_ms;
use crate::{timing, Point};

bitflags! {
  /// Mouse buttons carried in a [`MotionReport`].
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
  pub struct Buttons: u8 {
    const LEFT = 1 << 0;
    const RIGHT = 1 << 1;
  }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Buttons {
  fn format(&self, f: defmt::Formatter) {
    self.iter_names().for_each(|(name, _)| {
      defmt::write!(f, "{=str} ", name);
    });
  }
}

/// One poll's worth of pointer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionReport {
  pub x: i8,
  pub y: i8,
  /// Vertical scroll, positive away from the user.
  pub wheel: i8,
  /// Horizontal scroll.
  pub pan: i8,
  pub buttons: Buttons,
}

/// Fingers on the pad in one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Contacts {
  #[default]
  None,
  One(Point),
  Two(Point, Point),
}

/// A click waiting for its automatic release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PendingRelease {
  button: Buttons,
  since: u32,
}

/// Gesture decoder state carried between polls.
#[derive(Debug, Clone)]
pub struct Touchpad {
  /// Contacts from the previous sample; also the "previous position valid"
  /// record for both fingers.
  contacts: Contacts,
  anchor: Point,
  touch_start: u32,
  last_tap: u32,
  taps: u8,
  drag: bool,
  held: Buttons,
  release: Option<PendingRelease>,
}

impl Default for Touchpad {
  fn default() -> Self {
    Self::new()
  }
}

impl Touchpad {
  pub const fn new() -> Self {
    Self {
      contacts: Contacts::None,
      anchor: Point::new(0, 0),
      touch_start: 0,
      last_tap: 0,
      taps: 0,
      drag: false,
      held: Buttons::empty(),
      release: None,
    }
  }

  /// Contacts seen in the previous sample.
  pub fn contacts(&self) -> Contacts {
    self.contacts
  }

  /// Whether a double-tap drag currently holds the left button.
  pub fn is_dragging(&self) -> bool {
    self.drag
  }

  /// Feed one sample taken at `now` (milliseconds, free-running) and get the
  /// report for this poll.
  pub fn update(&mut self, contacts: Contacts, now: u32) -> MotionReport {
    self.expire_release(now);

    let mut report = MotionReport::default();
    let previous = self.contacts;

    match (previous, contacts) {
      (Contacts::None, Contacts::None) => {}

      (Contacts::None, Contacts::One(point)) => self.anchor_at(point, now),

      (Contacts::Two(..), Contacts::One(point)) => {
        // the lift of the second finger must not read as a one-finger gesture
        self.anchor_at(point, now);
        self.taps = 0;
        self.drag = false;
      }

      (Contacts::One(last), Contacts::One(point)) => {
        report.x = clamp_axis(point.x as i32 - last.x as i32);
        report.y = clamp_axis(point.y as i32 - last.y as i32);
      }

      (Contacts::Two(last_a, last_b), Contacts::Two(a, b)) => {
        let (last_x, last_y) = midpoint(last_a, last_b);
        let (x, y) = midpoint(a, b);
        report.wheel = clamp_axis(-(y - last_y));
        report.pan = clamp_axis(x - last_x);
      }

      (_, Contacts::Two(a, _)) => {
        self.anchor_at(a, now);
        self.taps = 0;
        self.drag = false;
        self.release_now(Buttons::LEFT);
      }

      (Contacts::One(last), Contacts::None) => self.lift_one(last, now),

      (Contacts::Two(..), Contacts::None) => {
        if elapsed_ms(now, self.touch_start) < timing::TAP_MAX_DURATION_MS {
          debug!("touchpad: two-finger tap");
          self.click(Buttons::RIGHT, now);
        }
      }
    }

    self.contacts = contacts;

    report.buttons = self.held;
    if self.drag {
      report.buttons |= Buttons::LEFT;
    }
    report
  }

  fn lift_one(&mut self, last: Point, now: u32) {
    let duration = elapsed_ms(now, self.touch_start);
    let travel = self.anchor.x.abs_diff(last.x) as u32 + self.anchor.y.abs_diff(last.y) as u32;

    if duration < timing::TAP_MAX_DURATION_MS && travel < timing::TAP_MAX_TRAVEL {
      if elapsed_ms(now, self.last_tap) < timing::DOUBLE_TAP_WINDOW_MS && self.taps == 1 {
        debug!("touchpad: double tap, drag started");
        self.release_now(Buttons::LEFT);
        self.drag = true;
        self.taps = 0;
      } else {
        if !self.drag {
          self.click(Buttons::LEFT, now);
        }
        self.taps = 1;
      }
      self.last_tap = now;
    } else if self.drag {
      debug!("touchpad: drag released");
      self.drag = false;
    }

    if elapsed_ms(now, self.last_tap) > timing::TAP_EXPIRY_MS {
      self.taps = 0;
    }
  }

  fn anchor_at(&mut self, point: Point, now: u32) {
    self.anchor = point;
    self.touch_start = now;
  }

  /// Press `button` and schedule its release. A click still waiting for its
  /// own release is let go first.
  fn click(&mut self, button: Buttons, now: u32) {
    if let Some(pending) = self.release.take() {
      self.held.remove(pending.button);
    }
    self.held.insert(button);
    self.release = Some(PendingRelease { button, since: now });
  }

  fn release_now(&mut self, button: Buttons) {
    self.held.remove(button);
    if self.release.is_some_and(|pending| pending.button == button) {
      self.release = None;
    }
  }

  fn expire_release(&mut self, now: u32) {
    if let Some(pending) = self.release {
      if elapsed_ms(now, pending.since) > timing::CLICK_RELEASE_MS {
        self.held.remove(pending.button);
        self.release = None;
      }
    }
  }
}

fn midpoint(a: Point, b: Point) -> (i32, i32) {
  ((a.x as i32 + b.x as i32) / 2, (a.y as i32 + b.y as i32) / 2)
}

fn clamp_axis(delta: i32) -> i8 {
  delta.clamp(-127, 127) as i8
}
