use crate::Point;

/// Gesture recognised by the controller's own gesture engine.
///
/// The pointer decoder does not act on these; they are surfaced for hosts that
/// want the chip's interpretation alongside the motion report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
  Tap(TapCount, Point),
  PressHold(Point),
  Palm,
  Swipe(SwipeDirection, Vector),
  SwipeHold(SwipeDirection, Vector),
}

impl Gesture {
  /// Decode the gesture word together with the gesture X/Y words that
  /// precede it. Returns `None` when no single gesture bit is set.
  pub fn decode(bits: u16, x: u16, y: u16) -> Option<Self> {
    let point = Point::new(x, y);
    let vector = Vector::new(x as i16, y as i16);
    match bits {
      0b0000_0000_0000_0001 => Some(Self::Tap(TapCount::One, point)),
      0b0000_0000_0000_0010 => Some(Self::Tap(TapCount::Two, point)),
      0b0000_0000_0000_0100 => Some(Self::Tap(TapCount::Three, point)),
      0b0000_0000_0000_1000 => Some(Self::PressHold(point)),
      0b0000_0000_0001_0000 => Some(Self::Palm),
      0b0000_0001_0000_0000 => Some(Self::Swipe(SwipeDirection::XPositive, vector)),
      0b0000_0010_0000_0000 => Some(Self::Swipe(SwipeDirection::XNegative, vector)),
      0b0000_0100_0000_0000 => Some(Self::Swipe(SwipeDirection::YPositive, vector)),
      0b0000_1000_0000_0000 => Some(Self::Swipe(SwipeDirection::YNegative, vector)),
      0b0001_0000_0000_0000 => Some(Self::SwipeHold(SwipeDirection::XPositive, vector)),
      0b0010_0000_0000_0000 => Some(Self::SwipeHold(SwipeDirection::XNegative, vector)),
      0b0100_0000_0000_0000 => Some(Self::SwipeHold(SwipeDirection::YPositive, vector)),
      0b1000_0000_0000_0000 => Some(Self::SwipeHold(SwipeDirection::YNegative, vector)),
      _ => None,
    }
  }

  pub fn is_swipe(&self) -> bool {
    matches!(self, Gesture::Swipe(_, _) | Gesture::SwipeHold(_, _))
  }

  pub fn is_tap(&self) -> bool {
    matches!(self, Gesture::Tap(_, _))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector {
  pub dx: i16,
  pub dy: i16,
}

impl Vector {
  pub const fn new(dx: i16, dy: i16) -> Self {
    Self { dx, dy }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapCount {
  One = 1,
  Two = 2,
  Three = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwipeDirection {
  XPositive,
  XNegative,
  YPositive,
  YNegative,
}

impl SwipeDirection {
  pub fn is_horizontal(&self) -> bool {
    matches!(self, SwipeDirection::XPositive | SwipeDirection::XNegative)
  }

  pub fn is_vertical(&self) -> bool {
    matches!(self, SwipeDirection::YPositive | SwipeDirection::YNegative)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_requires_a_single_gesture_bit() {
    assert_eq!(Gesture::decode(0b1, 10, 20), Some(Gesture::Tap(TapCount::One, Point::new(10, 20))));
    assert_eq!(Gesture::decode(0, 10, 20), None);
    assert_eq!(Gesture::decode(0b11, 10, 20), None);
  }

  #[test]
  fn swipe_carries_signed_vector() {
    let gesture = Gesture::decode(1 << 9, (-40i16) as u16, 3).unwrap();
    assert_eq!(gesture, Gesture::Swipe(SwipeDirection::XNegative, Vector::new(-40, 3)));
    assert!(gesture.is_swipe());
    assert!(!gesture.is_tap());
  }
}
