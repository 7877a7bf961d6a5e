//! Observable holder for the logged-in user.
//!
//! # Design
//! `AuthStore` is a cheap-to-clone handle to one shared `Option<User>` plus
//! its subscribers. It is constructed explicitly and handed to `ApiClient` and
//! to whatever UI layer needs it; there is no global instance.
//!
//! Everything runs on one thread, so the shared state lives in an
//! `Rc<RefCell<_>>`. Subscribers are notified synchronously, in the order the
//! mutations were invoked, after the borrow is released, which lets a
//! callback read or even mutate the store. A mutation made from inside a
//! callback is queued behind the deliveries already pending and drained by
//! the outermost call, so every subscriber sees values in invocation order
//! and ends on the stored value.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::User;

type Subscriber = Rc<dyn Fn(Option<&User>)>;

/// The two states of the auth store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn(User),
}

impl From<Option<User>> for AuthState {
    fn from(value: Option<User>) -> Self {
        match value {
            Some(user) => AuthState::LoggedIn(user),
            None => AuthState::LoggedOut,
        }
    }
}

#[derive(Default)]
struct Inner {
    value: Option<User>,
    subscribers: Vec<(u64, Subscriber)>,
    next_id: u64,
    pending: VecDeque<(Subscriber, Option<User>)>,
    notifying: bool,
}

/// Shared, observable session state. Starts logged out.
#[derive(Clone, Default)]
pub struct AuthStore {
    inner: Rc<RefCell<Inner>>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current user.
    pub fn get(&self) -> Option<User> {
        self.inner.borrow().value.clone()
    }

    pub fn state(&self) -> AuthState {
        self.get().into()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Replaces the value and notifies every current subscriber.
    pub fn set(&self, user: Option<User>) {
        {
            let mut inner = self.inner.borrow_mut();
            let Inner {
                value,
                subscribers,
                pending,
                ..
            } = &mut *inner;
            *value = user;
            for (_, subscriber) in subscribers.iter() {
                pending.push_back((Rc::clone(subscriber), value.clone()));
            }
        }
        self.drain();
    }

    /// Applies `f` to the current value and stores the result.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(Option<User>) -> Option<User>,
    {
        let current = self.get();
        self.set(f(current));
    }

    /// Forces the logged-out state.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Registers `subscriber` and immediately calls it with the current value.
    ///
    /// Delivery continues until the returned `Subscription` is unsubscribed.
    /// Dropping the handle without unsubscribing keeps the subscriber alive
    /// for as long as the store.
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(Option<&User>) + 'static,
    {
        let subscriber: Subscriber = Rc::new(subscriber);
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::clone(&subscriber)));
            let current = inner.value.clone();
            inner.pending.push_back((subscriber, current));
            id
        };
        self.drain();
        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Delivers queued notifications in FIFO order. A nested call returns
    /// at once and leaves its deliveries to the outermost one.
    fn drain(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }
        let _reset = NotifyingReset(&self.inner);
        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            let Some((subscriber, value)) = next else {
                break;
            };
            subscriber(value.as_ref());
        }
    }
}

/// Clears the `notifying` flag and drops undelivered values when a drain
/// ends, including by a panicking subscriber.
struct NotifyingReset<'a>(&'a RefCell<Inner>);

impl Drop for NotifyingReset<'_> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.notifying = false;
            inner.pending.clear();
        }
    }
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AuthStore")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Handle returned by `AuthStore::subscribe`.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<RefCell<Inner>>,
}

impl Subscription {
    /// Stops delivery to this subscriber. A no-op if the store is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}
