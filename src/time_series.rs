use crate::session::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<(f64, f64)> for TimeSeriesPoint {
    fn from(v: (f64, f64)) -> Self {
        TimeSeriesPoint { t: v.0, wpm: v.1 }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// Wpm sampled once per elapsed second, for the results chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmHistory {
    points: Vec<TimeSeriesPoint>,
}

impl WpmHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most one sample per second; repeated snapshots of the same
    /// second are ignored.
    pub fn record(&mut self, snapshot: &Snapshot) {
        if snapshot.elapsed_seconds == 0 {
            return;
        }
        let t = snapshot.elapsed_seconds as f64;
        if self.points.last().is_some_and(|p| p.t >= t) {
            return;
        }
        self.points
            .push(TimeSeriesPoint::new(t, snapshot.words_per_minute as f64));
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn as_tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|&p| p.into()).collect()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::session::{Mode, Session};

    #[test]
    fn records_one_point_per_second() {
        let mut session = Session::new("hello there", Mode::Words { target_length: 2 });
        let mut history = WpmHistory::new();

        history.record(&session.apply_key(Key::Char('h')));
        assert!(history.points().is_empty());

        let snap = session.tick();
        history.record(&snap);
        history.record(&snap);
        history.record(&session.apply_key(Key::Char('e')));
        assert_eq!(history.points().len(), 1);

        history.record(&session.tick());
        assert_eq!(history.as_tuples(), vec![(1.0, 12.0), (2.0, 12.0)]);
    }

    #[test]
    fn clear_empties() {
        let mut history = WpmHistory::new();
        history.points.push(TimeSeriesPoint::new(1.0, 10.0));
        history.clear();
        assert_eq!(history, WpmHistory::default());
    }

    #[test]
    fn tuple_conversions() {
        let p: TimeSeriesPoint = (2.0, 30.0).into();
        assert_eq!(p, TimeSeriesPoint::new(2.0, 30.0));
        assert_eq!(<(f64, f64)>::from(p), (2.0, 30.0));
    }
}
