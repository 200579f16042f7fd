//! In-memory hover tooltip widget.
//!
//! Drives the per-element tooltip state machine:
//!
//! ```text
//!            hover_start              delay elapsed
//!   Armed ───────────────▶ Pending ───────────────▶ Showing
//!     ▲                       │                        │
//!     └───────────────────────┴────────────────────────┘
//!                         hover_end
//! ```
//!
//! Delays run on tokio timers. Every transition bumps a generation counter, so
//! a timer that fires after the pointer left (or after the element was
//! detached) finds a stale generation and does nothing. Content is produced
//! by the attached callback at the moment the tooltip shows, every time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::element::{Element, ElementId};

use super::options::TooltipOptions;
use super::widget::{ContentFn, ImageContent, TooltipWidget};

/// Where an armed tooltip is in its show/hide cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipPhase {
    /// Attached, pointer elsewhere
    Armed,

    /// Pointer over the element, waiting for the delay
    Pending,

    /// Overlay visible
    Showing,
}

struct Slot {
    options: TooltipOptions,
    content: ContentFn,
    phase: TooltipPhase,
    generation: u64,
    visible: Option<ImageContent>,
    cursor: Option<(i32, i32)>,
}

/// Reference [`TooltipWidget`] keeping all tooltip state in memory.
///
/// Cloning is cheap; clones share state.
#[derive(Clone, Default)]
pub struct HoverTooltips {
    slots: Arc<Mutex<HashMap<ElementId, Slot>>>,
}

impl HoverTooltips {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ElementId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Ids of all elements with an armed tooltip, in ascending order.
    pub fn attached(&self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn options(&self, id: ElementId) -> Option<TooltipOptions> {
        self.lock().get(&id).map(|s| s.options.clone())
    }

    pub fn phase(&self, id: ElementId) -> Option<TooltipPhase> {
        self.lock().get(&id).map(|s| s.phase)
    }

    /// Content currently on screen for an element.
    pub fn visible(&self, id: ElementId) -> Option<ImageContent> {
        self.lock().get(&id).and_then(|s| s.visible.clone())
    }

    /// Overlay position while tracking the cursor.
    pub fn cursor(&self, id: ElementId) -> Option<(i32, i32)> {
        self.lock().get(&id).and_then(|s| s.cursor)
    }

    /// Pointer entered the element. Schedules the show after the delay.
    ///
    /// Returns the timer task, or `None` if the element has no armed tooltip
    /// or no tokio runtime is available to run the timer.
    pub fn hover_start(&self, id: ElementId) -> Option<JoinHandle<bool>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(element = %id, error = %e, "hover ignored outside a tokio runtime");
                return None;
            }
        };
        let (delay, generation) = {
            let mut slots = self.lock();
            let slot = slots.get_mut(&id)?;
            if slot.phase != TooltipPhase::Armed {
                return None;
            }
            slot.generation += 1;
            slot.phase = TooltipPhase::Pending;
            (slot.options.delay, slot.generation)
        };

        trace!(element = %id, delay_ms = delay.as_millis() as u64, "hover started");
        let this = self.clone();
        Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            this.show(id, generation)
        }))
    }

    /// Pointer left the element. Hides the overlay or cancels a pending show.
    pub fn hover_end(&self, id: ElementId) {
        if let Some(slot) = self.lock().get_mut(&id) {
            slot.generation += 1;
            slot.phase = TooltipPhase::Armed;
            slot.visible = None;
            slot.cursor = None;
            trace!(element = %id, "hover ended");
        }
    }

    /// Pointer moved to `(x, y)` while over the element.
    pub fn pointer_move(&self, id: ElementId, x: i32, y: i32) {
        if let Some(slot) = self.lock().get_mut(&id) {
            if slot.options.track && slot.phase != TooltipPhase::Armed {
                let (dx, dy) = slot.options.position.offset();
                slot.cursor = Some((x + dx, y + dy));
            }
        }
    }

    /// Show the tooltip immediately, skipping hover and delay.
    pub fn show_now(&self, id: ElementId) -> Option<ImageContent> {
        let generation = {
            let mut slots = self.lock();
            let slot = slots.get_mut(&id)?;
            slot.generation += 1;
            slot.phase = TooltipPhase::Pending;
            slot.generation
        };
        if self.show(id, generation) {
            self.visible(id)
        } else {
            None
        }
    }

    fn show(&self, id: ElementId, generation: u64) -> bool {
        let content = {
            let slots = self.lock();
            match slots.get(&id) {
                Some(slot) if slot.generation == generation && slot.phase == TooltipPhase::Pending => {
                    Arc::clone(&slot.content)
                }
                _ => return false,
            }
        };

        // Produced outside the lock; the callback may be arbitrarily slow
        let image = content();

        let mut slots = self.lock();
        match slots.get_mut(&id) {
            Some(slot) if slot.generation == generation && slot.phase == TooltipPhase::Pending => {
                debug!(element = %id, src = %image.src, "tooltip shown");
                slot.phase = TooltipPhase::Showing;
                slot.visible = Some(image);
                true
            }
            _ => false,
        }
    }
}

impl TooltipWidget for HoverTooltips {
    fn check_support(&self) -> Result<(), String> {
        Handle::try_current()
            .map(|_| ())
            .map_err(|e| format!("hover delays need a tokio runtime: {}", e))
    }

    fn attach(&self, element: &Element, options: TooltipOptions, content: ContentFn) {
        self.lock().insert(
            element.id(),
            Slot {
                options,
                content,
                phase: TooltipPhase::Armed,
                generation: 0,
                visible: None,
                cursor: None,
            },
        );
    }

    fn detach(&self, id: ElementId) {
        if self.lock().remove(&id).is_some() {
            trace!(element = %id, "tooltip detached");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
