//! Per-type sample streams.
//!
//! Events are split by variant in file order. Nothing is sorted here; the
//! merge engine orders the location stream itself.

use crate::parser::schema::{
    Altitude, BeatSample, HeartRate, LocationFix, PaceSample, SpeedSample, StrideSample,
    TypedEvent,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// The seven ordered streams of a log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStreams {
    pub locations: Vec<LocationFix>,
    pub heart_rates: Vec<HeartRate>,
    pub altitudes: Vec<Altitude>,
    pub speeds: Vec<SpeedSample>,
    pub paces: Vec<PaceSample>,
    pub beats: Vec<BeatSample>,
    pub strides: Vec<StrideSample>,
}

/// Sample count of every stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounts {
    pub locations: usize,
    pub heart_rates: usize,
    pub altitudes: usize,
    pub speeds: usize,
    pub paces: usize,
    pub beats: usize,
    pub strides: usize,
}

impl SampleStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition events, keeping relative order within each variant
    ///
    /// **Public** - main entry point for stream collection
    pub fn collect(events: impl IntoIterator<Item = TypedEvent>) -> Self {
        let mut streams = Self::new();
        for event in events {
            streams.push(event);
        }

        debug!("Collected streams: {:?}", streams.counts());
        streams
    }

    /// Append one event to its stream
    pub fn push(&mut self, event: TypedEvent) {
        match event {
            TypedEvent::LocationFix(fix) => self.locations.push(fix),
            TypedEvent::HeartRate(hr) => self.heart_rates.push(hr),
            TypedEvent::Altitude(alt) => self.altitudes.push(alt),
            TypedEvent::SpeedSample(speed) => self.speeds.push(speed),
            TypedEvent::PaceSample(pace) => self.paces.push(pace),
            TypedEvent::BeatSample(beat) => self.beats.push(beat),
            TypedEvent::StrideSample(stride) => self.strides.push(stride),
        }
    }

    pub fn counts(&self) -> StreamCounts {
        StreamCounts {
            locations: self.locations.len(),
            heart_rates: self.heart_rates.len(),
            altitudes: self.altitudes.len(),
            speeds: self.speeds.len(),
            paces: self.paces.len(),
            beats: self.beats.len(),
            strides: self.strides.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

impl StreamCounts {
    pub fn total(&self) -> usize {
        self.locations
            + self.heart_rates
            + self.altitudes
            + self.speeds
            + self.paces
            + self.beats
            + self.strides
    }
}

impl FromIterator<TypedEvent> for SampleStreams {
    fn from_iter<I: IntoIterator<Item = TypedEvent>>(iter: I) -> Self {
        Self::collect(iter)
    }
}
