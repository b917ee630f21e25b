//! Replay-latest change signal.
//!
//! An explicit publish/subscribe primitive standing in for the original's
//! stateful subjects: a listener list plus notify-on-change, where every new
//! subscriber immediately receives the current value. Single-threaded by
//! design, matching the cooperative execution model of the rest of the core.
//! Callbacks must not re-enter the component that owns the signal.

/// Handle returned by [`Signal::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// Holds the latest value of type `T` and pushes every change to all
/// registered listeners.
pub struct Signal<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register a listener. It is invoked immediately with the current value
    /// ("replay latest"), then on every subsequent change.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        listener(&self.value);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Replace the value and push it to every listener.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
