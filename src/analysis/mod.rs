// Analysis module - DSP pipeline for tremor detection
//
// This module holds the per-window DSP stages and the worker thread that
// drives a session pipeline from its ingestion queue.
//
// Architecture:
// - SessionWorker: Main loop that consumes samples from the session's
//   SPSC queue and feeds the pipeline
// - Pipeline stages: SampleBuffer -> TremorBandFilter -> FeatureExtractor
//   -> Classifier -> SessionAggregator
// - Output: WindowResult sent via tokio broadcast channel to subscribers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rtrb::{Consumer, PopError};

use crate::error::SessionError;
use crate::pipeline::TremorPipeline;
use crate::sample::Sample;
use crate::session::SessionSummary;

pub mod buffer;
pub mod classifier;
pub mod features;
pub mod filter;
pub mod window;

use classifier::Classification;
use features::FeatureVector;

/// Classification result for one analysis window
///
/// Sent to subscribers over the session's broadcast channel for real-time
/// display, and folded into the session summary by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WindowResult {
    /// Features extracted from the filtered window
    pub features: FeatureVector,
    /// Tremor presence and severity verdict
    pub classification: Classification,
    /// Timestamp of the first sample in the window (microseconds)
    pub window_start_us: u64,
    /// Timestamp of the last sample in the window (microseconds)
    pub window_end_us: u64,
    /// True if the window spans a gap in the sample stream
    pub discontinuity: bool,
}

struct SessionWorker {
    sample_consumer: Consumer<Sample>,
    pipeline: TremorPipeline,
    result_sender: tokio::sync::broadcast::Sender<WindowResult>,
    shutdown_flag: Arc<AtomicBool>,
}

impl SessionWorker {
    fn new(
        sample_consumer: Consumer<Sample>,
        pipeline: TremorPipeline,
        result_sender: tokio::sync::broadcast::Sender<WindowResult>,
        shutdown_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            sample_consumer,
            pipeline,
            result_sender,
            shutdown_flag,
        }
    }

    fn run(mut self) -> Result<SessionSummary, SessionError> {
        let session_id = self.pipeline.session_id();
        tracing::info!("[SessionWorker {}] Starting analysis loop", session_id);
        self.pipeline.start_session()?;

        loop {
            let sample = match self.sample_consumer.pop() {
                Ok(sample) => sample,
                Err(PopError::Empty) => {
                    // Check shutdown flag only when the queue is empty, so the
                    // queue fully drains before the session finalizes
                    if self.shutdown_flag.load(Ordering::SeqCst) {
                        tracing::info!(
                            "[SessionWorker {}] Shutdown flag set and queue empty, exiting",
                            session_id
                        );
                        break;
                    }
                    // Small sleep to avoid busy loop when empty
                    thread::sleep(std::time::Duration::from_millis(1));
                    continue;
                }
            };

            match self.pipeline.ingest(sample) {
                Ok(results) => {
                    for result in results {
                        tracing::debug!(
                            "[SessionWorker {}] Window {}..{} us: present={} severity={:?}",
                            session_id,
                            result.window_start_us,
                            result.window_end_us,
                            result.classification.present,
                            result.classification.severity
                        );
                        // Send failures just mean no subscriber is listening
                        let _ = self.result_sender.send(result);
                    }
                }
                Err(err) => {
                    tracing::warn!("[SessionWorker {}] Ingest failed: {}", session_id, err);
                    return Err(err);
                }
            }
        }

        let summary = self.pipeline.stop_session()?;
        tracing::info!(
            "[SessionWorker {}] Session finalized: {} windows, {} tremor, peak {:?}",
            session_id,
            summary.windows_analyzed,
            summary.tremor_windows,
            summary.peak_severity
        );
        Ok(summary)
    }
}

/// Spawn the analysis thread for one session
///
/// The thread consumes samples from `sample_consumer`, broadcasts each
/// classified window on `result_sender`, and returns the session summary
/// once `shutdown_flag` is set and the queue has drained.
pub fn spawn_session_worker(
    sample_consumer: Consumer<Sample>,
    pipeline: TremorPipeline,
    result_sender: tokio::sync::broadcast::Sender<WindowResult>,
    shutdown_flag: Arc<AtomicBool>,
) -> JoinHandle<Result<SessionSummary, SessionError>> {
    thread::spawn(move || {
        let worker = SessionWorker::new(sample_consumer, pipeline, result_sender, shutdown_flag);
        worker.run()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn tremor_sample(i: u64, amplitude: f32) -> Sample {
        let ts = i * 10_000;
        let t = ts as f32 / 1_000_000.0;
        let x = amplitude * (2.0 * std::f32::consts::PI * 6.0 * t).sin();
        Sample::new(ts, x, 0.0, 9.81)
    }

    #[test]
    fn test_worker_drains_queue_and_finalizes() {
        let (mut producer, consumer) = rtrb::RingBuffer::new(2048);
        let pipeline = TremorPipeline::new(&AppConfig::default()).unwrap();
        let (result_tx, mut result_rx) = tokio::sync::broadcast::channel(256);
        let shutdown = Arc::new(AtomicBool::new(false));

        // 5 s of tremor queued before the worker starts
        for i in 0..500 {
            producer.push(tremor_sample(i, 1.0)).unwrap();
        }

        let handle = spawn_session_worker(consumer, pipeline, result_tx, Arc::clone(&shutdown));
        shutdown.store(true, Ordering::SeqCst);

        let summary = handle.join().unwrap().unwrap();
        assert!(summary.windows_analyzed > 0);
        assert!(summary.tremor_windows > 0);

        // Broadcast carried every classified window
        let mut broadcast_count = 0;
        while result_rx.try_recv().is_ok() {
            broadcast_count += 1;
        }
        assert!(broadcast_count > 0);
    }

    #[test]
    fn test_worker_with_empty_queue_returns_empty_summary() {
        let (_producer, consumer) = rtrb::RingBuffer::<Sample>::new(16);
        let pipeline = TremorPipeline::new(&AppConfig::default()).unwrap();
        let (result_tx, _result_rx) = tokio::sync::broadcast::channel(16);
        let shutdown = Arc::new(AtomicBool::new(true));

        let handle = spawn_session_worker(consumer, pipeline, result_tx, shutdown);
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.windows_analyzed, 0);
        assert_eq!(summary.tremor_windows, 0);
    }
}
