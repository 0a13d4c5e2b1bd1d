use crate::engine::{ReloadOutcome, SubstitutionEngine};
use crate::error::WorkerGone;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::debug;

pub const SAMPLE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Corrupt(String),
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Corrupted(String),
    Reloaded {
        outcome: ReloadOutcome,
        samples: Vec<(String, String)>,
    },
}

/// Runs the engine on its own thread so a slow backend never stalls the
/// event loop. Requests are handled one at a time, in order.
pub struct Worker {
    requests: Option<Sender<Request>>,
    replies: Receiver<Reply>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Returns the worker along with the engine's initial samples.
    pub fn spawn(mut engine: SubstitutionEngine) -> (Self, Vec<(String, String)>) {
        let samples = engine.samples(SAMPLE_COUNT);
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        let handle = thread::spawn(move || {
            for request in request_rx {
                let reply = match request {
                    Request::Corrupt(text) => Reply::Corrupted(engine.corrupt(&text)),
                    Request::Reload => Reply::Reloaded {
                        outcome: engine.reload(),
                        samples: engine.samples(SAMPLE_COUNT),
                    },
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            debug!("substitution worker stopped");
        });

        let worker = Self {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
        };
        (worker, samples)
    }

    /// Returns false if the worker thread is gone.
    pub fn send(&self, request: Request) -> bool {
        match &self.requests {
            Some(tx) => tx.send(request).is_ok(),
            None => false,
        }
    }

    /// `Ok(None)` while nothing is ready. Once the thread has exited every
    /// call returns `WorkerGone`.
    pub fn try_recv(&self) -> Result<Option<Reply>, WorkerGone> {
        match self.replies.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerGone),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dictionary::VariantPicker;
    use crate::engine::generative::{Generation, Generator, PersonaPrompt, RetryPolicy};
    use crate::engine::word_map::JsonFileStore;
    use crate::error::GenerationError;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct FirstPicker;

    impl VariantPicker for FirstPicker {
        fn pick<'a>(&mut self, variants: &'a [String]) -> Option<&'a str> {
            variants.first().map(String::as_str)
        }
    }

    struct Crashing;

    impl Generator for Crashing {
        fn generate(&self, _prompt: &str) -> Result<Generation, GenerationError> {
            panic!("backend crashed");
        }
    }

    fn wait_for(worker: &Worker) -> Result<Reply, WorkerGone> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(reply) = worker.try_recv()? {
                return Ok(reply);
            }
            assert!(Instant::now() < deadline, "worker did not reply");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_requests_are_answered_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("word_mapping.json");
        std::fs::write(&path, r#"{"错误": ["错悟"]}"#).unwrap();
        let engine =
            SubstitutionEngine::dictionary(Box::new(JsonFileStore::new(&path)), Box::new(FirstPicker));

        let (worker, samples) = Worker::spawn(engine);
        assert_eq!(samples, vec![("错误".to_string(), "错悟".to_string())]);

        assert!(worker.send(Request::Corrupt("错误一".to_string())));
        assert!(worker.send(Request::Reload));
        assert_eq!(wait_for(&worker), Ok(Reply::Corrupted("错悟一".to_string())));
        assert_eq!(
            wait_for(&worker),
            Ok(Reply::Reloaded {
                outcome: ReloadOutcome::Reloaded { entries: 1 },
                samples: vec![("错误".to_string(), "错悟".to_string())],
            })
        );
        assert_eq!(worker.try_recv(), Ok(None));
    }

    #[test]
    fn test_dead_worker_is_reported() {
        let engine = SubstitutionEngine::generative(
            Box::new(Crashing),
            PersonaPrompt::default(),
            RetryPolicy::new(1),
        );
        let (worker, _) = Worker::spawn(engine);

        assert!(worker.send(Request::Corrupt("测试".to_string())));
        assert_eq!(wait_for(&worker), Err(WorkerGone));
        assert_eq!(worker.try_recv(), Err(WorkerGone));
        assert!(!worker.send(Request::Reload));
    }
}
