use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::generation::domain::capability_registry::CapabilityRegistry;
use crate::generation::domain::frame_source::FrameSource;
use crate::generation::domain::narration_source::NarrationSource;

pub type FrameSourceLoader =
    Box<dyn Fn() -> Result<Arc<dyn FrameSource>, Box<dyn std::error::Error>> + Send + Sync>;
pub type NarrationSourceLoader =
    Box<dyn Fn() -> Result<Arc<dyn NarrationSource>, Box<dyn std::error::Error>> + Send + Sync>;

/// Registry that runs each loader at most once per successful load.
///
/// The slot lock is held while loading, so concurrent first callers wait for
/// the one load in progress instead of starting their own. A failed load
/// leaves the slot empty and the next caller retries.
pub struct LazyCapabilityRegistry {
    frame_loader: FrameSourceLoader,
    narration_loader: NarrationSourceLoader,
    frame_source: Mutex<Option<Arc<dyn FrameSource>>>,
    narration_source: Mutex<Option<Arc<dyn NarrationSource>>>,
}

impl LazyCapabilityRegistry {
    pub fn new(frame_loader: FrameSourceLoader, narration_loader: NarrationSourceLoader) -> Self {
        Self {
            frame_loader,
            narration_loader,
            frame_source: Mutex::new(None),
            narration_source: Mutex::new(None),
        }
    }
}

impl CapabilityRegistry for LazyCapabilityRegistry {
    fn frame_source(&self) -> Result<Arc<dyn FrameSource>, Box<dyn std::error::Error>> {
        load_once(&self.frame_source, &*self.frame_loader, "frame source")
    }

    fn narration_source(&self) -> Result<Arc<dyn NarrationSource>, Box<dyn std::error::Error>> {
        load_once(&self.narration_source, &*self.narration_loader, "narration source")
    }
}

fn load_once<T: ?Sized>(
    slot: &Mutex<Option<Arc<T>>>,
    loader: &dyn Fn() -> Result<Arc<T>, Box<dyn std::error::Error>>,
    name: &str,
) -> Result<Arc<T>, Box<dyn std::error::Error>> {
    // Slots are written only after a successful load; a poisoned slot is empty.
    let mut guard = slot.lock().unwrap_or_else(|poisoned| {
        log::warn!("Previous {name} load panicked, retrying");
        slot.clear_poison();
        poisoned.into_inner()
    });
    if let Some(loaded) = guard.as_ref() {
        return Ok(Arc::clone(loaded));
    }

    log::info!("Loading {name}...");
    let start = Instant::now();
    let loaded = loader()?;
    log::info!("Loaded {name} in {:.1}s", start.elapsed().as_secs_f64());
    *guard = Some(Arc::clone(&loaded));
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::domain::frame_prompt::FramePrompt;
    use crate::shared::frame::Frame;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFrameSource;

    impl FrameSource for StubFrameSource {
        fn generate(&self, prompt: &FramePrompt) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(Frame::black(prompt.width, prompt.height, 0))
        }
    }

    struct StubNarration;

    impl NarrationSource for StubNarration {
        fn synthesize(&self, _text: &str, _output: &Path) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn file_extension(&self) -> &'static str {
            "wav"
        }
    }

    fn counting_registry(
        frame_loads: Arc<AtomicUsize>,
        narration_loads: Arc<AtomicUsize>,
    ) -> LazyCapabilityRegistry {
        LazyCapabilityRegistry::new(
            Box::new(move || {
                frame_loads.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(StubFrameSource) as Arc<dyn FrameSource>)
            }),
            Box::new(move || {
                narration_loads.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(StubNarration) as Arc<dyn NarrationSource>)
            }),
        )
    }

    #[test]
    fn test_capabilities_load_lazily_and_once() {
        let frame_loads = Arc::new(AtomicUsize::new(0));
        let narration_loads = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(frame_loads.clone(), narration_loads.clone());

        assert_eq!(frame_loads.load(Ordering::SeqCst), 0);
        let first = registry.frame_source().unwrap();
        let second = registry.frame_source().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(frame_loads.load(Ordering::SeqCst), 1);
        assert_eq!(narration_loads.load(Ordering::SeqCst), 0);

        registry.narration_source().unwrap();
        registry.narration_source().unwrap();
        assert_eq!(narration_loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let registry = LazyCapabilityRegistry::new(
            Box::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("backend not ready".into())
                } else {
                    Ok(Arc::new(StubFrameSource) as Arc<dyn FrameSource>)
                }
            }),
            Box::new(|| Ok(Arc::new(StubNarration) as Arc<dyn NarrationSource>)),
        );

        assert!(registry.frame_source().is_err());
        assert!(registry.frame_source().is_ok());
        assert!(registry.frame_source().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_calls_share_one_load() {
        let frame_loads = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(counting_registry(
            frame_loads.clone(),
            Arc::new(AtomicUsize::new(0)),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.frame_source().map(|_| ()).map_err(|e| e.to_string())
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(frame_loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_loader_does_not_wedge_the_slot() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let registry = Arc::new(LazyCapabilityRegistry::new(
            Box::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("loader crashed");
                }
                Ok(Arc::new(StubFrameSource) as Arc<dyn FrameSource>)
            }),
            Box::new(|| Ok(Arc::new(StubNarration) as Arc<dyn NarrationSource>)),
        ));

        let crashing = registry.clone();
        let joined = std::thread::spawn(move || {
            let _ = crashing.frame_source();
        })
        .join();
        assert!(joined.is_err());

        assert!(registry.frame_source().is_ok());
        assert!(registry.frame_source().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
