use std::time::Duration;

/// Gates match reports so that at most one per `interval` of input time gets
/// surfaced. The first report always passes; suppressed ones are dropped,
/// not queued.
#[derive(Debug)]
pub struct ReportThrottle {
    interval: Duration,
    last: Option<Duration>,
}

impl ReportThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True iff a match at `at` (input-relative) should be surfaced. Only
    /// then does `at` become the new reference point.
    pub fn should_report(&mut self, at: Duration) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => at.checked_sub(last).is_some_and(|gap| gap >= self.interval),
        };

        if due {
            self.last = Some(at);
        }
        due
    }
}
