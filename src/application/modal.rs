// src/application/modal.rs
//
// Modal lifecycle. Opening a modal hides the screen's scroll and registers a
// global key listener; both are held by a guard and released in `Drop`, so every
// way out (escape, backdrop, successful create, cancel, teardown) cleans up.
use crate::application::note_form::NoteForm;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overflow {
    Auto,
    Hidden,
    /// Any other behavior a host set before the modal opened; restored verbatim.
    Custom(String),
}

pub type ListenerId = u64;

/// Screen-wide state shared by the list view and whatever overlays it.
#[derive(Debug)]
pub struct Screen {
    overflow: Overflow,
    key_listeners: BTreeSet<ListenerId>,
    next_listener: ListenerId,
}

pub type SharedScreen = Rc<RefCell<Screen>>;

impl Screen {
    pub fn new() -> Self {
        Self::with_overflow(Overflow::Auto)
    }

    pub fn with_overflow(overflow: Overflow) -> Self {
        Self {
            overflow,
            key_listeners: BTreeSet::new(),
            next_listener: 1,
        }
    }

    pub fn shared(self) -> SharedScreen {
        Rc::new(RefCell::new(self))
    }

    #[cfg(test)]
    pub fn overflow(&self) -> &Overflow {
        &self.overflow
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.overflow == Overflow::Hidden
    }

    #[cfg(test)]
    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }

    fn add_key_listener(&mut self) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.key_listeners.insert(id);
        id
    }

    fn remove_key_listener(&mut self, id: ListenerId) {
        self.key_listeners.remove(&id);
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the scroll lock and key listener for one open modal.
#[derive(Debug)]
pub struct ModalGuard {
    screen: SharedScreen,
    saved_overflow: Overflow,
    listener: ListenerId,
}

impl ModalGuard {
    pub fn acquire(screen: &SharedScreen) -> Self {
        let mut inner = screen.borrow_mut();
        let saved_overflow = std::mem::replace(&mut inner.overflow, Overflow::Hidden);
        let listener = inner.add_key_listener();
        trace!(listener, ?saved_overflow, "Modal acquired screen");
        Self {
            screen: Rc::clone(screen),
            saved_overflow,
            listener,
        }
    }
}

impl Drop for ModalGuard {
    fn drop(&mut self) {
        let mut inner = self.screen.borrow_mut();
        inner.overflow = self.saved_overflow.clone();
        inner.remove_key_listener(self.listener);
        trace!(listener = self.listener, "Modal released screen");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Key(Key),
    Click(ClickTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Stay,
    Close,
}

/// The create-note dialog: a form plus the screen resources it holds while open.
#[derive(Debug)]
pub struct NoteModal {
    form: NoteForm,
    _guard: ModalGuard,
}

impl NoteModal {
    pub fn open(screen: &SharedScreen) -> Self {
        Self {
            form: NoteForm::new(),
            _guard: ModalGuard::acquire(screen),
        }
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NoteForm {
        &mut self.form
    }

    /// Escape or a click on the backdrop closes; clicks inside the panel do not.
    pub fn handle(&self, event: ModalEvent) -> ModalAction {
        match event {
            ModalEvent::Key(Key::Escape) => ModalAction::Close,
            ModalEvent::Click(ClickTarget::Backdrop) => ModalAction::Close,
            ModalEvent::Key(_) | ModalEvent::Click(ClickTarget::Panel) => ModalAction::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_open_modal_when_dropped_then_restores_overflow_and_listener() {
        let screen = Screen::with_overflow(Overflow::Custom("scroll".into())).shared();

        let modal = NoteModal::open(&screen);
        assert!(screen.borrow().is_scroll_locked());
        assert_eq!(screen.borrow().key_listener_count(), 1);

        drop(modal);

        assert_eq!(screen.borrow().overflow(), &Overflow::Custom("scroll".into()));
        assert_eq!(screen.borrow().key_listener_count(), 0);
    }

    #[test]
    fn given_nested_guards_when_released_in_order_then_original_restored() {
        let screen = Screen::new().shared();

        let outer = ModalGuard::acquire(&screen);
        let inner = ModalGuard::acquire(&screen);
        drop(inner);
        assert!(screen.borrow().is_scroll_locked());
        drop(outer);

        assert_eq!(screen.borrow().overflow(), &Overflow::Auto);
        assert_eq!(screen.borrow().key_listener_count(), 0);
    }

    #[test]
    fn given_modal_when_escape_or_backdrop_then_close() {
        let screen = Screen::new().shared();
        let modal = NoteModal::open(&screen);

        assert_eq!(modal.handle(ModalEvent::Key(Key::Escape)), ModalAction::Close);
        assert_eq!(
            modal.handle(ModalEvent::Click(ClickTarget::Backdrop)),
            ModalAction::Close
        );
        assert_eq!(
            modal.handle(ModalEvent::Click(ClickTarget::Panel)),
            ModalAction::Stay
        );
        assert_eq!(modal.handle(ModalEvent::Key(Key::Enter)), ModalAction::Stay);
    }
}
