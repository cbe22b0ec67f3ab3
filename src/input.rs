//! Input events and their way into the menu.
//!
//! The controller runs in one context only. Interrupt handlers enqueue
//! events on the producer side of an `EventQueue`, the main loop feeds the
//! consumer side to `Controller::process`.

use heapless::spsc::{Producer, Queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Up,
    Down,
    Select,
    Reset,
}

/// Holds at most `N - 1` events.
pub type EventQueue<const N: usize> = Queue<Event, N>;

/// Enqueues `event`, drops it if the queue is full.
pub fn post<const N: usize>(producer: &mut Producer<'_, Event, N>, event: Event) -> bool {
    match producer.enqueue(event) {
        Ok(()) => true,
        Err(event) => {
            log::warn!("input queue full, {:?} dropped", event);
            false
        }
    }
}
