/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// The instant `secs` seconds after `self`.
    pub fn after(self, secs: f64) -> Self {
        Time(self.0 + secs)
    }

    pub fn has_reached(self, deadline: Time) -> bool {
        self.0 >= deadline.0
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn deadline_is_inclusive() {
        let start = Time(1.0);
        let deadline = start.after(2.0);
        assert!(!Time(2.999).has_reached(deadline));
        assert!(Time(3.0).has_reached(deadline));
    }
}
