// TremorPipeline - per-session analysis pipeline
//
// Wires the stages together for one recording session:
//
//   ingest(Sample) -> band-pass filter -> sample buffer
//                       -> window cut -> feature extraction
//                       -> classification -> session aggregation
//
// Data flows strictly leaf to root and each session owns an independent
// pipeline instance, so sessions never share mutable state. The pipeline
// itself is synchronous; the session worker thread drives it from the
// ingestion queue.

use crate::analysis::buffer::SampleBuffer;
use crate::analysis::classifier::Classifier;
use crate::analysis::features::FeatureExtractor;
use crate::analysis::filter::TremorBandFilter;
use crate::analysis::WindowResult;
use crate::config::AppConfig;
use crate::error::{log_analysis_error, AnalysisError, SessionError};
use crate::sample::Sample;
use crate::session::{SessionAggregator, SessionState, SessionSummary};
use uuid::Uuid;

/// One session's analysis pipeline
pub struct TremorPipeline {
    filter: TremorBandFilter,
    buffer: SampleBuffer,
    extractor: FeatureExtractor,
    classifier: Classifier,
    aggregator: SessionAggregator,

    /// Window duration in microseconds
    window_us: u64,
    /// Stride between window ends in microseconds
    stride_us: u64,
    /// Gap tolerance in microseconds
    max_gap_us: u64,
    /// End timestamp of the next window to cut; set on first accepted sample
    next_window_end_us: Option<u64>,
    /// Timestamp of the last accepted sample, for gap logging
    last_timestamp_us: Option<u64>,
}

impl TremorPipeline {
    /// Build a pipeline from configuration
    ///
    /// # Returns
    /// * `Err(AnalysisError::InvalidConfig)` - Filter or windowing
    ///   parameters out of range
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let sample_rate = config.sampling.sample_rate_hz;
        if sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidConfig {
                reason: format!("sample_rate_hz must be positive (got {})", sample_rate),
            });
        }
        if config.windowing.stride_s <= 0.0 || config.windowing.duration_s <= 0.0 {
            return Err(AnalysisError::InvalidConfig {
                reason: "window duration and stride must be positive".to_string(),
            });
        }

        let nominal_interval_us = (1_000_000.0 / sample_rate).round() as u64;
        let max_gap_us =
            (nominal_interval_us as f32 * config.windowing.max_gap_factor).round() as u64;

        let filter = TremorBandFilter::new(sample_rate, &config.filter)?;
        let buffer = SampleBuffer::new(config.buffer_capacity(), nominal_interval_us, max_gap_us);
        let extractor = FeatureExtractor::new(
            sample_rate,
            config.window_len(),
            config.filter.band_low_hz,
            config.filter.band_high_hz,
        );
        let classifier = Classifier::new(
            config.classifier.clone(),
            config.filter.band_low_hz,
            config.filter.band_high_hz,
        );

        Ok(Self {
            filter,
            buffer,
            extractor,
            classifier,
            aggregator: SessionAggregator::new(),
            window_us: (config.windowing.duration_s * 1_000_000.0).round() as u64,
            stride_us: (config.windowing.stride_s * 1_000_000.0).round() as u64,
            max_gap_us,
            next_window_end_us: None,
            last_timestamp_us: None,
        })
    }

    /// Session id of the underlying aggregator
    pub fn session_id(&self) -> Uuid {
        self.aggregator.id()
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.aggregator.state()
    }

    /// Begin the recording session
    pub fn start_session(&mut self) -> Result<(), SessionError> {
        self.aggregator.start()?;
        self.filter.reset();
        self.buffer.clear();
        self.next_window_end_us = None;
        self.last_timestamp_us = None;
        Ok(())
    }

    /// Ingest one raw sample
    ///
    /// Filters the sample, buffers it, and cuts any analysis windows that
    /// became due. Non-monotonic samples are dropped with a warning; windows
    /// that cannot be filled (after a stream gap) are skipped, both without
    /// failing the session.
    ///
    /// # Returns
    /// * `Ok(results)` - Zero or more newly classified windows
    /// * `Err(SessionError)` - Session is not recording
    pub fn ingest(&mut self, sample: Sample) -> Result<Vec<WindowResult>, SessionError> {
        match self.aggregator.state() {
            SessionState::Idle => return Err(SessionError::NotRecording),
            SessionState::Finalized => return Err(SessionError::SessionClosed),
            SessionState::Recording => {}
        }

        if let Some(last) = self.last_timestamp_us {
            let gap = sample.timestamp_us.saturating_sub(last);
            if gap > self.max_gap_us {
                tracing::warn!(
                    "[Pipeline {}] Sample gap of {} us exceeds {} us; windows spanning it will be flagged",
                    self.session_id(),
                    gap,
                    self.max_gap_us
                );
            }
        }

        let filtered = self.filter.process(sample);
        if !self.buffer.push(filtered) {
            // Non-monotonic input; already logged by the buffer
            return Ok(Vec::new());
        }
        self.last_timestamp_us = Some(sample.timestamp_us);

        let next_end = *self
            .next_window_end_us
            .get_or_insert(sample.timestamp_us + self.window_us);

        let mut results = Vec::new();
        let mut window_end = next_end;
        while sample.timestamp_us >= window_end {
            if let Some(result) = self.cut_window(self.window_us, window_end) {
                self.aggregator.record(&result)?;
                results.push(result);
            }
            window_end += self.stride_us;
        }
        self.next_window_end_us = Some(window_end);

        Ok(results)
    }

    /// Stop the session, flushing any partial window, and return the summary
    ///
    /// # Returns
    /// * `Err(SessionError::SessionClosed)` - Called a second time
    /// * `Err(SessionError::NotRecording)` - Session never started
    pub fn stop_session(&mut self) -> Result<SessionSummary, SessionError> {
        if self.aggregator.state() == SessionState::Recording {
            self.flush_partial_window()?;
        }
        self.aggregator.finalize()
    }

    /// Classify the tail of the stream that has not reached a full window yet
    fn flush_partial_window(&mut self) -> Result<(), SessionError> {
        let latest = match self.buffer.latest_timestamp_us() {
            Some(ts) => ts,
            None => return Ok(()),
        };
        let next_end = match self.next_window_end_us {
            Some(end) => end,
            None => return Ok(()),
        };
        if latest >= next_end {
            return Ok(());
        }

        // Samples newer than the last full window's coverage
        let covered_until = next_end.saturating_sub(self.window_us);
        let partial_us = latest.saturating_sub(covered_until);
        if partial_us == 0 {
            return Ok(());
        }

        if let Some(result) = self.cut_window(partial_us, latest) {
            tracing::info!(
                "[Pipeline {}] Flushed partial window of {:.2} s on stop",
                self.session_id(),
                partial_us as f64 / 1_000_000.0
            );
            self.aggregator.record(&result)?;
        }
        Ok(())
    }

    /// Cut, extract, and classify one window; data-quality failures are
    /// logged and skipped rather than propagated
    fn cut_window(&mut self, duration_us: u64, end_us: u64) -> Option<WindowResult> {
        let window = match self.buffer.window(duration_us, end_us) {
            Ok(window) => window,
            Err(err @ AnalysisError::InsufficientData { .. }) => {
                tracing::debug!(
                    "[Pipeline {}] Skipping window ending at {} us: {}",
                    self.session_id(),
                    end_us,
                    err
                );
                return None;
            }
            Err(err) => {
                log_analysis_error(&err, "cut_window");
                return None;
            }
        };

        let discontinuity = window.has_discontinuity();
        let window_start_us = window.start_timestamp_us()?;
        let window_end_us = window.end_timestamp_us()?;

        let features = match self.extractor.extract(&window) {
            Ok(features) => features,
            Err(err) => {
                tracing::debug!(
                    "[Pipeline {}] Feature extraction skipped: {}",
                    self.session_id(),
                    err
                );
                return None;
            }
        };
        let classification = self.classifier.classify(&features);

        Some(WindowResult {
            features,
            classification,
            window_start_us,
            window_end_us,
            discontinuity,
        })
    }
}
