//! Presentation sink for round events.

use arcade_types::casino::Event;

/// Receives one event per round boundary.
pub trait Sink {
    fn publish(&mut self, event: Event);
}

/// Collects events in order.
impl Sink for Vec<Event> {
    fn publish(&mut self, event: Event) {
        self.push(event);
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn publish(&mut self, event: Event) {
        (**self).publish(event);
    }
}
