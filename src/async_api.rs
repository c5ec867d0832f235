use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;

use crate::{
    bootstrap, BackendKind, Error, LayoutConfig, LayoutEngine, LotteryResult, RenderBackend,
    RenderedDocument, Result,
};

type Reply = oneshot::Sender<Result<RenderedDocument>>;

struct Job {
    result: LotteryResult,
    reply: Reply,
}

#[derive(Default)]
struct Slot {
    pending: Option<Job>,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An async render facade backed by a dedicated worker thread.
///
/// The worker owns the backend and renders one bulletin at a time. At most
/// one request waits behind the one in flight; a newer request replaces it
/// and the replaced caller gets `Error::Superseded`.
///
/// A panicking render fails only its own request; the worker keeps serving.
pub struct Printer {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Printer {
    /// Start a printer around an already acquired backend.
    pub fn with_backend(backend: Box<dyn RenderBackend>, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let shared = Arc::new(Shared::default());
        let worker_shared = shared.clone();
        let worker = thread::Builder::new()
            .name("klbulletin-printer".into())
            .spawn(move || worker_loop(&worker_shared, backend.as_ref(), &config))?;
        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Acquire a backend (preferring `kind`) on the worker thread and start.
    pub async fn start(kind: BackendKind, config: LayoutConfig) -> Result<Self> {
        let (init_tx, init_rx) = oneshot::channel();
        thread::spawn(move || {
            let _ = init_tx.send(bootstrap::acquire_backend(kind));
        });
        let backend = init_rx
            .await
            .map_err(|e| Error::Other(format!("Backend init canceled: {}", e)))??;
        Self::with_backend(backend, config)
    }

    /// Queue `result` and return the receiver for its document.
    ///
    /// Any request still waiting in the queue resolves with `Superseded`.
    pub fn submit(&self, result: LotteryResult) -> Result<oneshot::Receiver<Result<RenderedDocument>>> {
        let (reply, rx) = oneshot::channel();
        if self.worker.as_ref().map_or(true, JoinHandle::is_finished) {
            return Err(Error::Other("printer worker is not running".into()));
        }
        let replaced = {
            let mut slot = self.shared.lock();
            if slot.closed {
                return Err(Error::Other("printer is shut down".into()));
            }
            slot.pending.replace(Job { result, reply })
        };
        self.shared.ready.notify_one();
        if let Some(old) = replaced {
            log::debug!("superseding queued render of {:?}", old.result.draw_number);
            let _ = old.reply.send(Err(Error::Superseded));
        }
        Ok(rx)
    }

    /// Render `result` on the worker thread.
    pub async fn print(&self, result: LotteryResult) -> Result<RenderedDocument> {
        let rx = self.submit(result)?;
        rx.await
            .map_err(|e| Error::Other(format!("Print canceled: {}", e)))?
    }

    /// Stop the worker after the in-flight render, if any.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let dropped = {
            let mut slot = self.shared.lock();
            slot.closed = true;
            slot.pending.take()
        };
        self.shared.ready.notify_all();
        if let Some(job) = dropped {
            let _ = job.reply.send(Err(Error::Other("printer shut down".into())));
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("printer worker panicked");
            }
        }
    }
}

impl Drop for Printer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: &Shared, backend: &dyn RenderBackend, config: &LayoutConfig) {
    loop {
        let job = {
            let mut slot = shared.lock();
            loop {
                if let Some(job) = slot.pending.take() {
                    break job;
                }
                if slot.closed {
                    return;
                }
                slot = shared
                    .ready
                    .wait(slot)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        let res = panic::catch_unwind(AssertUnwindSafe(|| {
            LayoutEngine::new(config)
                .and_then(|engine| engine.layout(&job.result))
                .and_then(|doc| backend.render(&doc))
        }))
        .unwrap_or_else(|payload| {
            Err(Error::RenderError(format!(
                "render panicked: {}",
                panic_message(payload.as_ref())
            )))
        });
        if let Err(e) = &res {
            log::warn!("render of {:?} failed: {}", job.result.draw_number, e);
        }
        let _ = job.reply.send(res);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
