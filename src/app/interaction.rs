use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::app::LookupOrchestrator;
use crate::domain::config::InteractionConfig;
use crate::domain::{CandidateFilter, CandidateImage, HoverEvent, HoverState, TooltipPayload, WeakImageSet};
use crate::ports::{Anchor, TooltipRenderer};

/// Hover session for the one image currently under the pointer.
struct Session {
    id: u64,
    image: Arc<CandidateImage>,
    state: HoverState,
    pointer: Anchor,
    /// Pending debounce timer, present only while Debouncing.
    timer: Option<JoinHandle<()>>,
}

impl Session {
    fn is_for(&self, image: &Arc<CandidateImage>) -> bool {
        Arc::ptr_eq(&self.image, image)
    }
}

/// Binds pointer events on registered candidate images to lookups and the
/// tooltip renderer.
///
/// The renderer is called with the session lock held and must not call back
/// into the controller.
pub struct InteractionController {
    orchestrator: Arc<LookupOrchestrator>,
    renderer: Arc<dyn TooltipRenderer>,
    filter: CandidateFilter,
    debounce: Duration,
    tooltip_offset: f64,
    registered: Mutex<WeakImageSet>,
    session: Mutex<Option<Session>>,
    next_session: AtomicU64,
}

impl InteractionController {
    pub fn new(
        orchestrator: Arc<LookupOrchestrator>,
        renderer: Arc<dyn TooltipRenderer>,
        filter: CandidateFilter,
        config: &InteractionConfig,
    ) -> Self {
        Self {
            orchestrator,
            renderer,
            filter,
            debounce: Duration::from_millis(config.debounce_ms),
            tooltip_offset: config.tooltip_offset,
            registered: Mutex::new(WeakImageSet::new()),
            session: Mutex::new(None),
            next_session: AtomicU64::new(0),
        }
    }

    /// Start listening to an image. Returns true only the first time a
    /// candidate image is registered.
    pub fn register(&self, image: &Arc<CandidateImage>) -> bool {
        if !self.filter.is_candidate(image) {
            return false;
        }
        let added = self.registered.lock().insert(image);
        if added {
            debug!(src = %image.src, "Candidate image registered");
        }
        added
    }

    /// Register every candidate in a page snapshot; returns how many were new.
    pub fn scan(&self, images: &[Arc<CandidateImage>]) -> usize {
        let added = images.iter().filter(|image| self.register(image)).count();
        if added > 0 {
            debug!(added = added, total = images.len(), "Page scan complete");
        }
        added
    }

    pub fn is_registered(&self, image: &Arc<CandidateImage>) -> bool {
        self.registered.lock().contains(image)
    }

    /// Current hover state of an image. Anything but the active image is Idle.
    pub fn state_of(&self, image: &Arc<CandidateImage>) -> HoverState {
        match self.session.lock().as_ref() {
            Some(session) if session.is_for(image) => session.state,
            _ => HoverState::Idle,
        }
    }

    /// Start (or keep) hovering `image`. Spawns the debounce timer, so this
    /// must run inside a Tokio runtime.
    pub fn pointer_enter(self: &Arc<Self>, image: &Arc<CandidateImage>, pointer: Anchor) {
        if !self.is_registered(image) {
            trace!(src = %image.src, "Ignoring pointer-enter on unregistered image");
            return;
        }

        let mut slot = self.session.lock();
        if let Some(current) = slot.as_mut() {
            if current.is_for(image) && current.state.is_engaged() {
                current.pointer = pointer;
                return;
            }
        }
        if let Some(previous) = slot.take() {
            self.teardown(previous);
        }

        let id = self.next_session.fetch_add(1, Ordering::Relaxed) + 1;
        let timer = tokio::spawn(Arc::clone(self).debounce_elapsed(id));
        debug!(src = %image.src, session = id, "Hover debounce started");

        *slot = Some(Session {
            id,
            image: Arc::clone(image),
            state: HoverState::Idle.next(HoverEvent::PointerEnter),
            pointer,
            timer: Some(timer),
        });
    }

    pub fn pointer_move(&self, image: &Arc<CandidateImage>, pointer: Anchor) {
        let mut slot = self.session.lock();
        let Some(session) = slot.as_mut().filter(|s| s.is_for(image)) else {
            return;
        };
        session.pointer = pointer;
        session.state = session.state.next(HoverEvent::PointerMove);
        if session.state == HoverState::Showing {
            self.renderer.reposition(pointer.offset(self.tooltip_offset));
        }
    }

    pub fn pointer_leave(&self, image: &Arc<CandidateImage>) {
        let mut slot = self.session.lock();
        if slot.as_ref().is_some_and(|s| s.is_for(image)) {
            if let Some(session) = slot.take() {
                self.teardown_with(session, HoverEvent::PointerLeave);
            }
        }
    }

    /// Page scrolled: whatever is pending or shown goes away.
    pub fn scroll(&self) {
        if let Some(session) = self.session.lock().take() {
            self.teardown_with(session, HoverEvent::Scroll);
        }
    }

    fn teardown(&self, session: Session) {
        self.teardown_with(session, HoverEvent::PointerLeave);
    }

    fn teardown_with(&self, mut session: Session, event: HoverEvent) {
        if let Some(timer) = session.timer.take() {
            timer.abort();
        }
        if session.state == HoverState::Showing {
            self.renderer.hide();
            self.orchestrator.cancel();
        }
        let next = session.state.next(event);
        debug!(
            src = %session.image.src,
            session = session.id,
            from = ?session.state,
            to = ?next,
            "Hover session ended"
        );
    }

    async fn debounce_elapsed(self: Arc<Self>, id: u64) {
        tokio::time::sleep(self.debounce).await;

        let image = {
            let mut slot = self.session.lock();
            let Some(session) = slot.as_mut().filter(|s| s.id == id) else {
                return;
            };
            if session.state != HoverState::Debouncing {
                return;
            }
            session.state = session.state.next(HoverEvent::TimerFired);
            session.timer = None;
            self.renderer
                .show(TooltipPayload::Loading, session.pointer.offset(self.tooltip_offset));
            Arc::clone(&session.image)
        };

        let Some(info) = self.orchestrator.lookup(&image).await else {
            debug!(session = id, "Lookup produced nothing to render");
            return;
        };

        let slot = self.session.lock();
        match slot.as_ref() {
            Some(session) if session.id == id && session.state == HoverState::Showing => {
                self.renderer.show(
                    TooltipPayload::Company(info),
                    session.pointer.offset(self.tooltip_offset),
                );
            }
            _ => debug!(session = id, "Dropping result for inactive hover session"),
        }
    }
}
