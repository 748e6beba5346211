//! Ball-speed telemetry
//!
//! Speed samples are collected while the tracked body moves faster than a
//! threshold (one "motion episode"), then handed to a chart collaborator as
//! one chronologically ordered batch once the body slows back down.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A single speed reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub speed: f32,
    /// Simulation time of the reading (seconds)
    pub time: f64,
}

/// Receives one batch of samples per motion episode
pub trait ChartSink {
    fn update_chart_data(&mut self, records: &[Sample]);
}

/// Keeps every flushed episode, newest last
impl ChartSink for Vec<Vec<Sample>> {
    fn update_chart_data(&mut self, records: &[Sample]) {
        self.push(records.to_vec());
    }
}

/// Lets the owner of a chart keep reading it after handing it to a session
impl<T: ChartSink> ChartSink for Rc<RefCell<T>> {
    fn update_chart_data(&mut self, records: &[Sample]) {
        self.borrow_mut().update_chart_data(records);
    }
}

/// Writes each episode to the log as a JSON array
#[derive(Debug, Default)]
pub struct LogChart {
    pub episodes: usize,
}

impl ChartSink for LogChart {
    fn update_chart_data(&mut self, records: &[Sample]) {
        self.episodes += 1;
        match serde_json::to_string(records) {
            Ok(json) => log::info!("Motion episode {} ({} samples): {}", self.episodes, records.len(), json),
            Err(e) => log::warn!("Failed to encode motion episode: {}", e),
        }
    }
}

/// Accumulates samples for the current motion episode
#[derive(Debug, Clone)]
pub struct MotionSampler {
    threshold: f32,
    samples: Vec<Sample>,
}

impl MotionSampler {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            samples: Vec::new(),
        }
    }

    /// Samples of the episode in progress
    pub fn pending(&self) -> &[Sample] {
        &self.samples
    }

    /// Feed one reading.
    ///
    /// Above the threshold the reading is buffered. At or below it, a
    /// non-empty buffer is returned as the finished episode and cleared.
    pub fn observe(&mut self, speed: f32, time: f64) -> Option<Vec<Sample>> {
        if speed > self.threshold {
            self.samples.push(Sample { speed, time });
            None
        } else if self.samples.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.samples))
        }
    }

    /// [`observe`](Self::observe), forwarding a finished episode to `chart`
    pub fn record(&mut self, speed: f32, time: f64, chart: &mut dyn ChartSink) -> bool {
        match self.observe(speed, time) {
            Some(episode) => {
                chart.update_chart_data(&episode);
                true
            }
            None => false,
        }
    }
}
