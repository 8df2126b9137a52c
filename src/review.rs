//! Human-in-the-loop review of a method's output.
//!
//! The UI renders both sides of a [`DiffResult`], keeps the [`Finisher`] it
//! is handed, and blocks in [`ReviewUi::wait`] until the reviewer is done.
//! Whatever value is passed to [`Finisher::finish`] is returned to the caller
//! unchanged. The pipeline never looks inside it.

use crate::diff::{DiffResult, Span};
use crate::errors::{CorefError, CorefResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Label of the action that completes a review.
pub const FINISH_LABEL: &str = "Finish";

/// Interactive comparison surface.
pub trait ReviewUi {
    /// What the reviewer hands back, usually the edited text.
    type Edited;

    /// Show the two aligned sides.
    fn render_comparison(&mut self, title: &str, original: &[Span], produced: &[Span]);

    /// Attach the action that completes the review.
    fn add_finish_action(&mut self, label: &str, finisher: Finisher<Self::Edited>);

    /// Block until the reviewer finishes or closes the UI.
    fn wait(&mut self);
}

/// Completion handle given to the UI.
pub struct Finisher<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Finisher<T> {
    /// Deliver the reviewed result.
    pub fn finish(self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }
}

/// Run one review round. A UI that returns from `wait` without finishing
/// counts as a cancellation.
pub(crate) fn review<U: ReviewUi>(
    ui: &mut U,
    title: &str,
    diff: &DiffResult,
) -> CorefResult<U::Edited> {
    let slot = Rc::new(RefCell::new(None));

    ui.render_comparison(title, &diff.original, &diff.produced);
    ui.add_finish_action(
        FINISH_LABEL,
        Finisher {
            slot: Rc::clone(&slot),
        },
    );
    ui.wait();

    let edited = slot.borrow_mut().take();
    edited.ok_or(CorefError::UserCancelled { stage: "review" })
}
