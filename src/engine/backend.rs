//! `rodio`-backed implementation of [`AudioEngine`].
//!
//! Seeking is done by rebuilding the sink with `Source::skip_duration`, so
//! every `play(start_at)` call gets a fresh decoder. Elapsed time is kept
//! with an `Instant` plus an accumulator that absorbs paused stretches.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::{AudioEngine, EngineError};

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    volume: f32,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            loaded: None,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
        })
    }

    /// Open and decode `path`, returning a paused sink skipped to
    /// `start_at`. Even `Duration::ZERO` is fine for `skip_duration`.
    fn build_sink(&self, path: &Path, start_at: Duration) -> Result<Sink, EngineError> {
        let file = File::open(path).map_err(|source| EngineError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| EngineError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = self.build_sink(path, Duration::ZERO)?;
        self.sink = Some(sink);
        self.loaded = Some(path.to_path_buf());
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self, start_at: Duration) -> Result<(), EngineError> {
        let Some(path) = self.loaded.clone() else {
            return Err(EngineError::NothingLoaded);
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = self.build_sink(&path, start_at)?;
        sink.play();
        self.sink = Some(sink);
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            if self.started_at.is_none() {
                self.started_at = Some(Instant::now());
            }
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn elapsed_since_play(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}
