//! Settle and tap notification.
//!
//! The host registers at most one settle callback and one tap callback;
//! registering again replaces the previous one.  A settle is reported once
//! per change of the centered item, optionally with a haptic pulse.

use std::fmt;

use super::error::HapticsError;

/// A device able to fire a short confirmation pulse.
pub trait Haptics {
    fn click(&mut self) -> Result<(), HapticsError>;
}

pub type SnapCallback = Box<dyn FnMut(&str)>;
pub type TapCallback = Box<dyn FnMut()>;

#[derive(Default)]
pub struct SnapNotifier {
    on_snap: Option<SnapCallback>,
    on_tap: Option<TapCallback>,
    haptics: Option<Box<dyn Haptics>>,
    haptic_feedback: bool,
    /// Item index reported by the last notification.
    last_notified: Option<usize>,
}

impl fmt::Debug for SnapNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapNotifier")
            .field("on_snap", &self.on_snap.is_some())
            .field("on_tap", &self.on_tap.is_some())
            .field("haptics", &self.haptics.is_some())
            .field("haptic_feedback", &self.haptic_feedback)
            .field("last_notified", &self.last_notified)
            .finish()
    }
}

impl SnapNotifier {
    pub fn new(haptic_feedback: bool) -> Self {
        Self {
            haptic_feedback,
            ..Self::default()
        }
    }

    pub fn set_on_snap(&mut self, callback: SnapCallback) {
        self.on_snap = Some(callback);
    }

    pub fn set_on_tap(&mut self, callback: TapCallback) {
        self.on_tap = Some(callback);
    }

    pub fn set_haptics(&mut self, haptics: Box<dyn Haptics>) {
        self.haptics = Some(haptics);
    }

    pub fn set_haptic_feedback(&mut self, enabled: bool) {
        self.haptic_feedback = enabled;
    }

    pub fn haptic_feedback(&self) -> bool {
        self.haptic_feedback
    }

    /// Forget what was reported so the next settle fires unconditionally.
    pub fn reset(&mut self) {
        self.last_notified = None;
    }

    /// Report `item` (at list `index`) unless it was the last one reported.
    /// Returns whether the callback fired.
    pub fn notify(&mut self, index: usize, item: &str) -> bool {
        if self.last_notified == Some(index) {
            return false;
        }
        self.last_notified = Some(index);
        tracing::debug!(index, item, "dial settled");

        if self.haptic_feedback {
            if let Some(haptics) = self.haptics.as_mut() {
                if let Err(err) = haptics.click() {
                    tracing::debug!("haptic pulse failed: {err}");
                }
            }
        }
        if let Some(callback) = self.on_snap.as_mut() {
            callback(item);
        }
        true
    }

    pub fn tap(&mut self) {
        if let Some(callback) = self.on_tap.as_mut() {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CountingHaptics(Rc<RefCell<usize>>);

    impl Haptics for CountingHaptics {
        fn click(&mut self) -> Result<(), HapticsError> {
            *self.0.borrow_mut() += 1;
            Ok(())
        }
    }

    struct BrokenHaptics;

    impl Haptics for BrokenHaptics {
        fn click(&mut self) -> Result<(), HapticsError> {
            Err(HapticsError::Unavailable)
        }
    }

    #[test]
    fn test_same_item_is_reported_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = SnapNotifier::new(false);
        let sink = Rc::clone(&seen);
        notifier.set_on_snap(Box::new(move |item| sink.borrow_mut().push(item.to_string())));

        assert!(notifier.notify(1, "b"));
        assert!(!notifier.notify(1, "b"));
        assert!(notifier.notify(2, "c"));
        notifier.reset();
        assert!(notifier.notify(2, "c"));
        assert_eq!(*seen.borrow(), vec!["b", "c", "c"]);
    }

    #[test]
    fn test_haptics_follow_the_toggle() {
        let pulses = Rc::new(RefCell::new(0));
        let mut notifier = SnapNotifier::new(true);
        notifier.set_haptics(Box::new(CountingHaptics(Rc::clone(&pulses))));

        notifier.notify(0, "a");
        notifier.set_haptic_feedback(false);
        notifier.notify(1, "b");
        assert_eq!(*pulses.borrow(), 1);
    }

    #[test]
    fn test_haptic_failure_is_swallowed() {
        let fired = Rc::new(RefCell::new(false));
        let mut notifier = SnapNotifier::new(true);
        notifier.set_haptics(Box::new(BrokenHaptics));
        let flag = Rc::clone(&fired);
        notifier.set_on_snap(Box::new(move |_| *flag.borrow_mut() = true));

        assert!(notifier.notify(3, "d"));
        assert!(*fired.borrow());
    }

    #[test]
    fn test_replacing_callback_drops_the_old_one() {
        let count = Rc::new(RefCell::new((0, 0)));
        let mut notifier = SnapNotifier::new(false);
        let first = Rc::clone(&count);
        notifier.set_on_tap(Box::new(move || first.borrow_mut().0 += 1));
        notifier.tap();
        let second = Rc::clone(&count);
        notifier.set_on_tap(Box::new(move || second.borrow_mut().1 += 1));
        notifier.tap();
        assert_eq!(*count.borrow(), (1, 1));
    }
}
