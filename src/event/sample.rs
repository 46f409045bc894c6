use crate::{Gesture, InfoFlags, Point};

/// One bulk read of the output block (0x0A..0x12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
  /// Relative motion computed by the chip since the previous cycle.
  pub relative_x: i16,
  pub relative_y: i16,
  /// Raw gesture X/Y words; a coordinate for taps, a vector for swipes.
  pub gesture_x: u16,
  pub gesture_y: u16,
  pub gestures: u16,
  pub info: InfoFlags,
  /// Absolute position of finger 1.
  pub primary: Point,
  pub primary_strength: u16,
}

impl Sample {
  /// The chip's own gesture interpretation for this cycle, if any.
  pub fn gesture(&self) -> Option<Gesture> {
    Gesture::decode(self.gestures, self.gesture_x, self.gesture_y)
  }
}

impl From<[u8; 18]> for Sample {
  fn from(b: [u8; 18]) -> Self {
    let word = |i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
    Self {
      relative_x: word(0) as i16,
      relative_y: word(2) as i16,
      gesture_x: word(4),
      gesture_y: word(6),
      gestures: word(8),
      info: InfoFlags::from_bits(word(10)),
      primary: Point::new(word(12), word(14)),
      primary_strength: word(16),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn layout_is_little_endian_words() {
    let sample = Sample::from([
      0xFE, 0xFF, // relative x = -2
      0x03, 0x00, // relative y = 3
      0x10, 0x00, 0x20, 0x00, // gesture x/y
      0x01, 0x00, // single tap
      0x00, 0x01, // one finger
      0xE8, 0x03, 0xD0, 0x07, // finger 1 at (1000, 2000)
      0x64, 0x00, // strength
    ]);

    assert_eq!(sample.relative_x, -2);
    assert_eq!(sample.relative_y, 3);
    assert_eq!(sample.info.num_fingers(), 1);
    assert_eq!(sample.primary, Point::new(1000, 2000));
    assert_eq!(sample.primary_strength, 100);
    assert!(sample.gesture().is_some_and(|g| g.is_tap()));
  }
}
