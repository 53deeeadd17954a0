/// Minimum wall-clock gap between two point-cloud regenerations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegenerationSchedule {
    interval: f32,
    last: Option<f32>,
}

impl RegenerationSchedule {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            last: None,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(0.0);
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }

    /// True once more than `interval` seconds have passed since the last
    /// regeneration, or when none has happened yet.
    pub fn is_due(&self, now: f32) -> bool {
        self.last.is_none_or(|last| now - last > self.interval)
    }

    /// Records a regeneration at `now` if one is due.
    pub fn poll(&mut self, now: f32) -> bool {
        if self.is_due(now) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Makes the next poll fire regardless of elapsed time.
    pub fn force(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_always_fires() {
        let mut schedule = RegenerationSchedule::new(0.5);
        assert!(schedule.poll(0.0));
        assert_eq!(schedule.last(), Some(0.0));
    }

    #[test]
    fn waits_for_interval() {
        let mut schedule = RegenerationSchedule::new(0.5);
        assert!(schedule.poll(1.0));
        assert!(!schedule.poll(1.2));
        assert!(!schedule.poll(1.5));
        assert!(schedule.poll(1.51));
        assert!(!schedule.poll(1.6));
    }

    #[test]
    fn force_resets_gate() {
        let mut schedule = RegenerationSchedule::new(10.0);
        assert!(schedule.poll(3.0));
        assert!(!schedule.is_due(4.0));
        schedule.force();
        assert!(schedule.poll(4.0));
    }

    #[test]
    fn negative_interval_is_clamped() {
        let mut schedule = RegenerationSchedule::new(-1.0);
        assert_eq!(schedule.interval(), 0.0);
        schedule.set_interval(0.25);
        assert_eq!(schedule.interval(), 0.25);
    }
}
