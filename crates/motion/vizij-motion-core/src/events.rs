//! Per-instance start/end notifications.
//!
//! Every stateful unit (animation, parallel group, item) owns an [`Emitter`]
//! with its own listener list; there is no global dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ListenerId;
use crate::Tick;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Start,
    End,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionEvent {
    /// Unit (or item) was anchored; `start` is the tick it becomes active.
    Started { start: Tick },
    /// Unit (or item) finished. `aborted` units were not snapped to their end.
    Ended { aborted: bool },
}

impl MotionEvent {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            MotionEvent::Started { .. } => EventKind::Start,
            MotionEvent::Ended { .. } => EventKind::End,
        }
    }
}

pub type Listener = Box<dyn FnMut(&MotionEvent)>;

#[derive(Default)]
pub struct Emitter {
    next_id: u32,
    listeners: Vec<(ListenerId, EventKind, Listener)>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one event kind.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MotionEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Unsubscribe. Returns false if the id was not registered here.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        before != self.listeners.len()
    }

    /// Notify listeners of `event.kind()` in subscription order.
    pub fn emit(&mut self, event: &MotionEvent) {
        let kind = event.kind();
        for (_, k, listener) in self.listeners.iter_mut() {
            if *k == kind {
                listener(event);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn on_off_emit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut em = Emitter::new();
        let s = seen.clone();
        let start_id = em.on(EventKind::Start, move |e| s.borrow_mut().push(*e));
        let s = seen.clone();
        em.on(EventKind::End, move |e| s.borrow_mut().push(*e));

        em.emit(&MotionEvent::Started { start: 10.0 });
        em.emit(&MotionEvent::Ended { aborted: false });
        assert!(em.off(start_id));
        assert!(!em.off(start_id));
        em.emit(&MotionEvent::Started { start: 20.0 });

        assert_eq!(
            *seen.borrow(),
            vec![
                MotionEvent::Started { start: 10.0 },
                MotionEvent::Ended { aborted: false }
            ]
        );
        assert_eq!(em.len(), 1);
    }
}
