//! Ordered callback lists and subscription tokens
//!
//! Each surface owns one [`CallbackList`] per notification kind. Callbacks
//! run in registration order, the same closure may be registered twice,
//! and a [`Subscription`] removes exactly the registration it came from.

use crate::input::InputEvent;
use crate::surface::SurfaceId;
use std::fmt;

/// The four independent notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Initialise,
    Resize,
    Expose,
    Input,
}

/// Token returned by registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    surface: SurfaceId,
    kind: CallbackKind,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(surface: SurfaceId, kind: CallbackKind, id: u64) -> Self {
        Self { surface, kind, id }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn kind(&self) -> CallbackKind {
        self.kind
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

/// Payload of initialise, resize and expose notifications.
///
/// Expose always covers the full surface; partial regions are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub surface: SurfaceId,
    pub width: u32,
    pub height: u32,
}

/// Payload of input notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputNotification {
    pub surface: SurfaceId,
    pub input: InputEvent,
}

type Callback<E> = Box<dyn FnMut(&E) + Send>;

/// Registration-ordered list of callbacks for one notification kind.
pub struct CallbackList<E> {
    entries: Vec<(u64, Callback<E>)>,
    next_id: u64,
}

impl<E> Default for CallbackList<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E> fmt::Debug for CallbackList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<E> CallbackList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback`; returns its registration id.
    pub fn add<F>(&mut self, callback: F) -> u64
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove one registration. Returns false if it was already gone.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Call every callback in registration order; returns how many ran.
    pub fn dispatch(&mut self, event: &E) -> usize {
        for (_, callback) in self.entries.iter_mut() {
            callback(event);
        }
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut list = CallbackList::<u32>::new();
        for tag in ["a", "b", "c"] {
            let log = log.clone();
            list.add(move |value: &u32| log.lock().unwrap().push(format!("{}{}", tag, value)));
        }

        assert_eq!(list.dispatch(&7), 3);
        assert_eq!(*log.lock().unwrap(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn test_no_deduplication() {
        let count = Arc::new(Mutex::new(0));
        let mut list = CallbackList::<()>::new();
        let make = || {
            let count = count.clone();
            move |_: &()| *count.lock().unwrap() += 1
        };
        list.add(make());
        list.add(make());
        list.dispatch(&());
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_remove_only_that_registration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut list = CallbackList::<u8>::new();
        let ids: Vec<u64> = (0..3)
            .map(|n| {
                let log = log.clone();
                list.add(move |_: &u8| log.lock().unwrap().push(n))
            })
            .collect();

        assert!(list.remove(ids[1]));
        assert!(!list.remove(ids[1]));
        list.dispatch(&0);
        assert_eq!(*log.lock().unwrap(), vec![0, 2]);
        assert_eq!(list.len(), 2);
    }
}
