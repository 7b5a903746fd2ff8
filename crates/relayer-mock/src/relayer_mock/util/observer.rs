use std::sync::Mutex;

use ibc_relay_strategy::relay::observer::{RelayEvent, RelayObserver};

/// Keeps every event it observes, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RelayEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RelayEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => vec![],
        }
    }

    pub fn count(&self, predicate: impl Fn(&RelayEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

impl RelayObserver for RecordingObserver {
    fn on_event(&self, event: RelayEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
