//! Continuous fall of the active block along its sector.

/// Result of one fall step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallStep {
    /// New ring position, never past the floor.
    pub ring_pos: f32,
    /// The unclamped position reached the floor.
    pub landed: bool,
}

/// Advance `ring_pos` by `velocity * dt` on a board of `ring_count` rings.
/// Lands on the outermost ring.
#[inline]
pub fn step_fall(ring_pos: f32, velocity: f32, dt: f32, ring_count: usize) -> FallStep {
    step_fall_to(ring_pos, velocity, dt, ring_count.saturating_sub(1) as f32)
}

/// Same as [`step_fall`] with an explicit floor: the last ring the block may
/// occupy in its sector (top of the sector's stack).
#[inline]
pub fn step_fall_to(ring_pos: f32, velocity: f32, dt: f32, floor: f32) -> FallStep {
    let next = ring_pos + velocity * dt;
    FallStep {
        ring_pos: next.min(floor),
        landed: next >= floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_advances() {
        let step = step_fall(0.0, 2.0, 1.0, 12);
        assert!((step.ring_pos - 2.0).abs() < f32::EPSILON);
        assert!(!step.landed);
    }

    #[test]
    fn test_step_lands_and_clamps() {
        let step = step_fall(10.0, 2.0, 1.0, 12);
        assert!(step.landed);
        assert!((step.ring_pos - 11.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_exact_floor_lands() {
        let step = step_fall(10.0, 1.0, 1.0, 12);
        assert!(step.landed);
        assert!((step.ring_pos - 11.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_velocity_holds() {
        let step = step_fall(3.25, 0.0, 5.0, 12);
        assert!(!step.landed);
        assert!((step.ring_pos - 3.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_explicit_floor() {
        let step = step_fall_to(6.5, 4.0, 0.5, 7.0);
        assert!(step.landed);
        assert!((step.ring_pos - 7.0).abs() < f32::EPSILON);
        assert!(!step_fall_to(6.5, 0.5, 0.5, 7.0).landed);
    }
}
