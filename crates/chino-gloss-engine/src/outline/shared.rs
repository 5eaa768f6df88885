use std::sync::{Arc, PoisonError, RwLock};

use super::{OutlineError, ParticleOutline, parse_outline};

/// Current outline, replaced wholesale on reload.
///
/// Readers take an `Arc` snapshot and keep using it even if a reload swaps
/// in a new outline meanwhile; a reader never observes half of each.
#[derive(Debug, Default)]
pub struct SharedOutline {
    current: RwLock<Arc<ParticleOutline>>,
}

impl SharedOutline {
    pub fn new(outline: ParticleOutline) -> Self {
        Self {
            current: RwLock::new(Arc::new(outline)),
        }
    }

    pub fn parse(text: &str) -> Result<Self, OutlineError> {
        parse_outline(text).map(Self::new)
    }

    pub fn snapshot(&self) -> Arc<ParticleOutline> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swaps in `outline`, returning the one it replaced.
    pub fn replace(&self, outline: ParticleOutline) -> Arc<ParticleOutline> {
        self.swap(Arc::new(outline))
    }

    /// Parses `text` and swaps it in, returning the outline just parsed.
    /// On error the current outline is kept.
    pub fn reload(&self, text: &str) -> Result<Arc<ParticleOutline>, OutlineError> {
        let outline = Arc::new(parse_outline(text)?);
        self.swap(Arc::clone(&outline));
        Ok(outline)
    }

    fn swap(&self, outline: Arc<ParticleOutline>) -> Arc<ParticleOutline> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, outline)
    }
}
