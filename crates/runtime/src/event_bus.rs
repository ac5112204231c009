use std::collections::BTreeMap;

type Callback<P> = Box<dyn FnMut(&P)>;

/// In-process publish/subscribe registry keyed by event name.
///
/// Callbacks run synchronously in registration order. There is no
/// unregistration; listeners live as long as the bus.
pub struct EventBus<P> {
    listeners: BTreeMap<String, Vec<Callback<P>>>,
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self {
            listeners: BTreeMap::new(),
        }
    }
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: impl Into<String>, callback: impl FnMut(&P) + 'static) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(callback));
    }

    /// Invokes every listener of `event` with `data`. Unknown events are a no-op.
    pub fn emit(&mut self, event: &str, data: &P) {
        let Some(callbacks) = self.listeners.get_mut(event) else {
            tracing::trace!(event, "emit without listeners");
            return;
        };
        tracing::trace!(event, listeners = callbacks.len(), "emit");
        for cb in callbacks.iter_mut() {
            cb(data);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_without_listeners_is_noop() {
        let mut bus: EventBus<i32> = EventBus::new();
        bus.emit("nobody-listens", &1);
        assert_eq!(bus.listener_count("nobody-listens"), 0);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let l = log.clone();
        bus.on("play", move |v: &i32| l.borrow_mut().push(("first", *v)));
        let l = log.clone();
        bus.on("play", move |v: &i32| l.borrow_mut().push(("second", *v)));

        bus.emit("play", &7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
        assert_eq!(bus.listener_count("play"), 2);
    }

    #[test]
    fn events_are_isolated_by_name() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let h = hits.clone();
        bus.on("stop", move |_: &()| *h.borrow_mut() += 1);

        bus.emit("play", &());
        assert_eq!(*hits.borrow(), 0);
        bus.emit("stop", &());
        bus.emit("stop", &());
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn same_callback_may_be_registered_twice() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let h = hits.clone();
            bus.on("tick", move |_: &()| *h.borrow_mut() += 1);
        }
        bus.emit("tick", &());
        assert_eq!(*hits.borrow(), 2);
    }
}
