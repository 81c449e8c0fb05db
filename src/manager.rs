// SessionManager - owns the lifecycle of concurrent recording sessions
//
// Each session gets its own SPSC ingestion queue, worker thread, pipeline,
// and broadcast channel. Sessions share nothing mutable; the manager only
// maps ids to handles. A stopped session's slot is kept so that repeated
// stop calls report SessionClosed rather than UnknownSession.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use rtrb::Producer;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::analysis::{spawn_session_worker, WindowResult};
use crate::config::AppConfig;
use crate::error::{log_session_error, AnalysisError, SessionError};
use crate::pipeline::TremorPipeline;
use crate::sample::Sample;
use crate::session::SessionSummary;

/// Ingestion queue capacity per session, in samples
///
/// ~40 s of headroom at the default 100 Hz rate; the worker normally drains
/// the queue within a millisecond of samples arriving.
const INGEST_QUEUE_CAPACITY: usize = 4096;

/// Broadcast channel capacity for window results
const RESULT_CHANNEL_CAPACITY: usize = 256;

struct SessionHandle {
    sample_producer: Producer<Sample>,
    shutdown_flag: Arc<AtomicBool>,
    worker: JoinHandle<Result<SessionSummary, SessionError>>,
    result_tx: broadcast::Sender<WindowResult>,
    /// Samples dropped because the ingestion queue was full
    dropped_samples: u64,
}

enum SessionSlot {
    Running(SessionHandle),
    Closed,
}

/// Registry and lifecycle owner for recording sessions
pub struct SessionManager {
    config: AppConfig,
    sessions: HashMap<Uuid, SessionSlot>,
}

impl SessionManager {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    /// Start a new recording session and return its id
    ///
    /// Builds an independent pipeline and spawns its worker thread.
    ///
    /// # Returns
    /// * `Err(AnalysisError::InvalidConfig)` - Configuration rejected by
    ///   the pipeline
    pub fn start_session(&mut self) -> Result<Uuid, AnalysisError> {
        let pipeline = TremorPipeline::new(&self.config)?;
        let session_id = pipeline.session_id();

        let (sample_producer, sample_consumer) = rtrb::RingBuffer::new(INGEST_QUEUE_CAPACITY);
        let (result_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        let shutdown_flag = Arc::new(AtomicBool::new(false));

        let worker = spawn_session_worker(
            sample_consumer,
            pipeline,
            result_tx.clone(),
            Arc::clone(&shutdown_flag),
        );

        self.sessions.insert(
            session_id,
            SessionSlot::Running(SessionHandle {
                sample_producer,
                shutdown_flag,
                worker,
                result_tx,
                dropped_samples: 0,
            }),
        );

        log::info!("[SessionManager] Session {} started", session_id);
        Ok(session_id)
    }

    /// Push one raw sample into a session's ingestion queue
    ///
    /// A full queue drops the sample with a warning rather than blocking
    /// the caller; the drop count is reported when the session stops.
    pub fn ingest(&mut self, session_id: Uuid, sample: Sample) -> Result<(), SessionError> {
        let handle = self.running_handle_mut(session_id)?;
        if handle.sample_producer.push(sample).is_err() {
            handle.dropped_samples += 1;
            log::warn!(
                "[SessionManager] Ingest queue full for session {}, dropping sample at {} us",
                session_id,
                sample.timestamp_us
            );
        }
        Ok(())
    }

    /// Subscribe to a session's classified windows
    pub fn subscribe(
        &mut self,
        session_id: Uuid,
    ) -> Result<broadcast::Receiver<WindowResult>, SessionError> {
        let handle = self.running_handle_mut(session_id)?;
        Ok(handle.result_tx.subscribe())
    }

    /// Stop a session and return its summary
    ///
    /// Signals the worker, waits for the queue to drain and the partial
    /// window to flush, and joins the thread.
    ///
    /// # Returns
    /// * `Err(SessionError::SessionClosed)` - Session already stopped
    /// * `Err(SessionError::UnknownSession)` - Id never existed
    pub fn stop_session(&mut self, session_id: Uuid) -> Result<SessionSummary, SessionError> {
        let slot = self
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| SessionError::UnknownSession {
                id: session_id.to_string(),
            })?;

        let handle = match std::mem::replace(slot, SessionSlot::Closed) {
            SessionSlot::Running(handle) => handle,
            SessionSlot::Closed => return Err(SessionError::SessionClosed),
        };

        handle.shutdown_flag.store(true, Ordering::SeqCst);
        let summary = match handle.worker.join() {
            Ok(Ok(summary)) => summary,
            Ok(Err(err)) => {
                log_session_error(&err, "stop_session");
                return Err(err);
            }
            Err(_) => {
                let err = SessionError::WorkerFailed {
                    id: session_id.to_string(),
                };
                log_session_error(&err, "stop_session");
                return Err(err);
            }
        };

        if handle.dropped_samples > 0 {
            log::warn!(
                "[SessionManager] Session {} dropped {} samples at ingest",
                session_id,
                handle.dropped_samples
            );
        }
        log::info!(
            "[SessionManager] Session {} stopped after {:.1} s",
            session_id,
            summary.duration_s
        );
        Ok(summary)
    }

    /// Number of sessions currently recording
    pub fn active_sessions(&self) -> usize {
        self.sessions
            .values()
            .filter(|slot| matches!(slot, SessionSlot::Running(_)))
            .count()
    }

    fn running_handle_mut(&mut self, session_id: Uuid) -> Result<&mut SessionHandle, SessionError> {
        match self.sessions.get_mut(&session_id) {
            Some(SessionSlot::Running(handle)) => Ok(handle),
            Some(SessionSlot::Closed) => Err(SessionError::SessionClosed),
            None => Err(SessionError::UnknownSession {
                id: session_id.to_string(),
            }),
        }
    }
}
