// Math utilities and helper functions

/// Clamp a value between min and max
///
/// Unlike `f32::clamp` this never panics when `max < min`; the lower bound wins.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        if max < min {
            min
        } else {
            max
        }
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_inverted_range_prefers_min() {
        assert_eq!(clamp(5.0, 0.0, -3.0), 0.0);
        assert_eq!(clamp(-5.0, 0.0, -3.0), 0.0);
    }
}
