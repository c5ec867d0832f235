//! Render backend acquisition.
//!
//! Sources are tried in order, each for at most `attempts_per_source`
//! attempts. An attempt succeeds when the source hands out a backend that
//! also survives a smoke render of an empty bulletin. When every source is
//! exhausted the caller gets `Error::BackendUnavailable` naming them all.

use crate::model::{DrawDate, LotteryResult};
use crate::{BackendKind, Error, LayoutConfig, LayoutEngine, RenderBackend, Result};

/// Somewhere a render backend can be obtained from.
pub trait BackendSource: Send + Sync {
    fn name(&self) -> String;

    fn acquire(&self) -> Result<Box<dyn RenderBackend>>;
}

/// The backends compiled into this crate.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource(pub BackendKind);

impl BackendSource for BuiltinSource {
    fn name(&self) -> String {
        format!("builtin:{}", self.0)
    }

    fn acquire(&self) -> Result<Box<dyn RenderBackend>> {
        crate::new_backend(self.0)
    }
}

pub struct BackendChain {
    sources: Vec<Box<dyn BackendSource>>,
    attempts_per_source: u32,
    smoke_test: bool,
}

impl Default for BackendChain {
    fn default() -> Self {
        Self::preferring(BackendKind::Pdf)
    }
}

impl BackendChain {
    pub fn new(attempts_per_source: u32) -> Self {
        Self {
            sources: Vec::new(),
            attempts_per_source: attempts_per_source.max(1),
            smoke_test: true,
        }
    }

    /// `kind` first, the other builtin backend as the fallback.
    pub fn preferring(kind: BackendKind) -> Self {
        let other = match kind {
            BackendKind::Pdf => BackendKind::Html,
            BackendKind::Html => BackendKind::Pdf,
        };
        Self::new(2)
            .with_source(BuiltinSource(kind))
            .with_source(BuiltinSource(other))
    }

    pub fn with_source(mut self, source: impl BackendSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Skip the smoke render; a handed-out backend is accepted as is.
    pub fn without_smoke_test(mut self) -> Self {
        self.smoke_test = false;
        self
    }

    pub fn acquire(&self) -> Result<Box<dyn RenderBackend>> {
        let mut tried = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let name = source.name();
            for attempt in 1..=self.attempts_per_source {
                match source.acquire().and_then(|b| self.check(b)) {
                    Ok(backend) => {
                        log::info!(
                            "acquired {} backend from {} (attempt {})",
                            backend.kind(),
                            name,
                            attempt
                        );
                        return Ok(backend);
                    }
                    Err(e) => log::debug!(
                        "backend source {} attempt {}/{} failed: {}",
                        name,
                        attempt,
                        self.attempts_per_source,
                        e
                    ),
                }
            }
            log::warn!("backend source {} exhausted", name);
            tried.push(name);
        }
        Err(Error::BackendUnavailable { tried })
    }

    fn check(&self, backend: Box<dyn RenderBackend>) -> Result<Box<dyn RenderBackend>> {
        if self.smoke_test {
            let config = LayoutConfig::default();
            let empty = LotteryResult {
                lottery_name: None,
                draw_number: None,
                date: DrawDate::Missing,
                is_bumper: false,
                prizes: Vec::new(),
            };
            let doc = LayoutEngine::new(&config)?.layout(&empty)?;
            let rendered = backend.render(&doc)?;
            if rendered.bytes.is_empty() {
                return Err(Error::RenderError(format!(
                    "{} backend produced an empty smoke-test document",
                    backend.kind()
                )));
            }
        }
        Ok(backend)
    }
}

/// Acquire a backend through the default chain.
pub fn acquire_backend(preferred: BackendKind) -> Result<Box<dyn RenderBackend>> {
    BackendChain::preferring(preferred).acquire()
}
