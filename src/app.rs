use std::collections::VecDeque;
use std::time::Instant;

use chrono::Utc;

use crate::fetch::{Fetcher, Reading};

/// One retained data point: wall-clock seconds plus both wheel speeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: f64,
    pub left_rpm: f64,
    pub right_rpm: f64,
}

impl Sample {
    fn from_reading(timestamp: f64, reading: &Reading) -> Self {
        Self {
            timestamp,
            left_rpm: reading.left_rpm,
            right_rpm: reading.right_rpm,
        }
    }
}

// Bounded FIFO of recent samples
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the tail, evicting from the head once over capacity.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current contents in time order, timestamps re-based so the oldest
    /// retained sample reads 0.0. Recomputed on every call, never stored.
    pub fn snapshot(&self) -> Vec<Sample> {
        let t0 = match self.samples.front() {
            Some(first) => first.timestamp,
            None => return Vec::new(),
        };
        self.samples
            .iter()
            .map(|s| Sample {
                timestamp: s.timestamp - t0,
                ..*s
            })
            .collect()
    }
}

// Main application state
pub struct App {
    pub window: SampleWindow,
    pub last_tick: Instant,
}

impl App {
    pub fn new(window_size: usize) -> App {
        App {
            window: SampleWindow::new(window_size),
            last_tick: Instant::now(),
        }
    }

    /// One scheduled step: fetch, fold a success into the window.
    ///
    /// Returns whether the chart has new data to show. A failed fetch leaves
    /// the window untouched and the previous frame on screen; the failure
    /// itself was already logged inside the fetcher.
    pub fn on_tick(&mut self, fetcher: &Fetcher) -> bool {
        match fetcher.fetch() {
            Ok(reading) => {
                let now = Utc::now().timestamp_millis() as f64 / 1000.0;
                self.window.push(Sample::from_reading(now, &reading));
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;
    use crate::fetch::Fetcher;

    fn sample(timestamp: f64, rpm: f64) -> Sample {
        Sample {
            timestamp,
            left_rpm: rpm,
            right_rpm: -rpm,
        }
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut window = SampleWindow::new(5);
        for i in 0..20 {
            window.push(sample(i as f64, i as f64));
            assert!(window.len() <= 5);
        }
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn fills_in_order_until_capacity() {
        let mut window = SampleWindow::new(8);
        for i in 0..4 {
            window.push(sample(100.0 + i as f64, 10.0 * i as f64));
        }
        let snap = window.snapshot();
        assert_eq!(snap.len(), 4);
        let lefts: Vec<f64> = snap.iter().map(|s| s.left_rpm).collect();
        assert_eq!(lefts, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut window = SampleWindow::new(3);
        for (i, rpm) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
            window.push(sample(i as f64, rpm));
        }
        let lefts: Vec<f64> = window.snapshot().iter().map(|s| s.left_rpm).collect();
        assert_eq!(lefts, vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn snapshot_rebases_to_zero_after_evictions() {
        let mut window = SampleWindow::new(2);
        window.push(sample(50.0, 1.0));
        window.push(sample(51.0, 2.0));
        window.push(sample(52.5, 3.0));
        let snap = window.snapshot();
        assert_eq!(snap[0].timestamp, 0.0);
        assert_eq!(snap[1].timestamp, 1.5);
    }

    #[test]
    fn empty_snapshot_is_empty() {
        assert!(SampleWindow::new(4).snapshot().is_empty());
    }

    #[test]
    fn failed_fetch_leaves_window_unchanged() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let port = listener.local_addr().unwrap().port();
        drop(listener); // nothing listens here any more

        let mut app = App::new(4);
        app.window.push(sample(1.0, 7.0));
        let before = app.window.snapshot();

        let fetcher = Fetcher::new(format!("http://127.0.0.1:{}/get_data_from_B", port));
        assert!(!app.on_tick(&fetcher));
        assert_eq!(app.window.len(), 1);
        assert_eq!(app.window.snapshot(), before);
    }
}
