use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use seal_types::{CaptureEvent, MediaSource};

use crate::config::EngineConfig;
use crate::engine::{process_source, EngineInner, ProofEngine};

/// Tasks owned by a running intake subscription.
pub(crate) struct IntakeHandles {
    intake: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl IntakeHandles {
    fn abort(&self) {
        self.intake.abort();
        self.worker.abort();
    }
}

impl ProofEngine {
    /// Wire the intake pipeline to an event source.
    ///
    /// Events flow: filter noise → wait out the quiescence delay → verify
    /// the path still exists → enqueue on the single-worker queue, which
    /// serializes all baseline processing. Calling `start` again replaces
    /// the previous subscription.
    pub fn start(&self, events: mpsc::Receiver<CaptureEvent>) {
        let (work_tx, work_rx) = mpsc::channel(self.inner.config.channel_capacity);
        let worker = tokio::spawn(run_worker(Arc::clone(&self.inner), work_rx));
        let intake = tokio::spawn(run_intake(Arc::clone(&self.inner), events, work_tx));

        let mut slot = self.intake.lock().expect("intake slot poisoned");
        if let Some(previous) = slot.replace(IntakeHandles { intake, worker }) {
            previous.abort();
        }
        info!("engine intake started");
    }

    /// Release the event-intake subscription. Idempotent: calling `stop`
    /// without a running subscription does nothing.
    pub fn stop(&self) {
        if let Some(handles) = self.intake.lock().expect("intake slot poisoned").take() {
            handles.abort();
            info!("engine intake stopped");
        }
    }
}

/// Consume raw capture events and schedule delayed dispatches.
///
/// Each qualifying event schedules its own dispatch. Repeated events for
/// the same path are not coalesced: the idempotency check makes duplicate
/// dispatches a no-op once the first completes.
async fn run_intake(
    inner: Arc<EngineInner>,
    mut events: mpsc::Receiver<CaptureEvent>,
    work_tx: mpsc::Sender<MediaSource>,
) {
    while let Some(event) = events.recv().await {
        if is_noise(&inner.config, &event) {
            debug!(path = %event.path.display(), "ignoring noise event");
            continue;
        }
        debug!(path = %event.path.display(), kind = %event.kind, "dispatch scheduled");

        let delay = inner.config.quiescence_delay;
        let tx = work_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !event.path.exists() {
                debug!(path = %event.path.display(), "path vanished before dispatch");
                return;
            }
            if tx.send(MediaSource::new(event.path)).await.is_err() {
                debug!("worker queue closed, dropping dispatch");
            }
        });
    }
    debug!("event source closed");
}

/// Single worker: baseline processing for all triggers runs through here,
/// one at a time.
async fn run_worker(inner: Arc<EngineInner>, mut work_rx: mpsc::Receiver<MediaSource>) {
    while let Some(source) = work_rx.recv().await {
        let _ = process_source(Arc::clone(&inner), source, None).await;
    }
}

fn is_noise(config: &EngineConfig, event: &CaptureEvent) -> bool {
    match event.path.file_name().and_then(|n| n.to_str()) {
        Some(name) => config.ignore_names.iter().any(|ignored| ignored == name),
        // No file name means nothing processable.
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use seal_crypto::Ed25519Signer;
    use seal_notary::{AlwaysOnline, Notarizer};
    use seal_record::{NoDeviceInfo, NoLocation, NoNetworkInfo, RecordBuilder};
    use seal_store::ProvenanceStore;
    use seal_types::CaptureEventKind;

    use crate::source::FsStreams;

    use super::*;

    fn test_engine(dir: &tempfile::TempDir) -> ProofEngine {
        let config = EngineConfig {
            quiescence_delay: Duration::from_millis(30),
            ..Default::default()
        };
        ProofEngine::new(
            ProvenanceStore::new(dir.path().join("proofs")),
            Arc::new(Ed25519Signer::from_seed([3; 32])),
            RecordBuilder::new(
                Arc::new(NoDeviceInfo),
                Arc::new(NoNetworkInfo),
                Arc::new(NoLocation),
            ),
            Notarizer::new(vec![], Arc::new(AlwaysOnline)),
            Arc::new(FsStreams),
            config,
        )
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met within timeout");
    }

    fn any_proof_written(engine: &ProofEngine) -> bool {
        engine
            .store()
            .root()
            .read_dir()
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn event_flows_through_to_proof() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("img.jpg");
        fs::write(&media, b"captured bytes").unwrap();

        let engine = test_engine(&dir);
        let (tx, rx) = mpsc::channel(16);
        engine.start(rx);

        tx.send(CaptureEvent::new(&media, CaptureEventKind::CloseWrite))
            .await
            .unwrap();

        wait_until(|| any_proof_written(&engine)).await;
        engine.stop();
    }

    #[tokio::test]
    async fn sentinel_name_is_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let probe = dir.path().join(".probe");
        fs::write(&probe, b"noise").unwrap();

        let engine = test_engine(&dir);
        let (tx, rx) = mpsc::channel(16);
        engine.start(rx);

        tx.send(CaptureEvent::new(&probe, CaptureEventKind::CloseWrite))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!any_proof_written(&engine));
        engine.stop();
    }

    #[tokio::test]
    async fn vanished_path_is_not_dispatched() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("fleeting.jpg");
        fs::write(&media, b"short-lived").unwrap();

        let engine = test_engine(&dir);
        let (tx, rx) = mpsc::channel(16);
        engine.start(rx);

        tx.send(CaptureEvent::new(&media, CaptureEventKind::MovedTo))
            .await
            .unwrap();
        // Remove the file before the quiescence delay elapses.
        fs::remove_file(&media).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!any_proof_written(&engine));
        engine.stop();
    }

    #[tokio::test]
    async fn duplicate_events_are_idempotent_downstream() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("img.jpg");
        fs::write(&media, b"same bytes").unwrap();

        let engine = test_engine(&dir);
        let (tx, rx) = mpsc::channel(16);
        engine.start(rx);

        for _ in 0..3 {
            tx.send(CaptureEvent::new(&media, CaptureEventKind::CloseWrite))
                .await
                .unwrap();
        }

        wait_until(|| any_proof_written(&engine)).await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        // All three dispatches resolved to the same digest: one proof
        // directory, one header plus one row.
        let digests: Vec<_> = engine.store().root().read_dir().unwrap().collect();
        assert_eq!(digests.len(), 1);

        let digest_dir = digests[0].as_ref().unwrap().path();
        let proof = fs::read_dir(&digest_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.path().extension().is_some_and(|ext| ext == "proof"))
            .unwrap();
        let contents = fs::read_to_string(proof.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
        engine.stop();
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_detaches_intake() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("late.jpg");
        fs::write(&media, b"too late").unwrap();

        let engine = test_engine(&dir);
        let (tx, rx) = mpsc::channel(16);
        engine.start(rx);
        engine.stop();
        engine.stop();

        // Events after stop are not consumed.
        let _ = tx
            .send(CaptureEvent::new(&media, CaptureEventKind::CloseWrite))
            .await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!any_proof_written(&engine));
    }
}
