//! Quiz progress bar: `.quiz_progress` with `.quiz_progress__fill` and
//! `.quiz_progress__percentage`.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use vitrine_core::{Clock, Deadline, Easing, Event, Handled, Markup, MarkupError, Query, Tween, Widget};

/// Progress timings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressTimings {
    /// Length of the percentage animation
    pub animation_ms: f64,
}

impl Default for ProgressTimings {
    fn default() -> Self {
        Self { animation_ms: 500.0 }
    }
}

/// Round half up, the way the page rounds percentages.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Percentage for `current` out of `total`, rounded.
#[must_use]
pub fn percentage(current: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    round_half_up(current / total * 100.0).clamp(0.0, 100.0) as u32
}

/// Render snapshot: fill width and label share the same percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgressView {
    /// Displayed percentage, `width: {percent}%` and `"{percent}%"`
    pub percent: u32,
    /// `quiz_progress--completed` class
    pub completed: bool,
}

/// Animated progress bar.
pub struct QuizProgress {
    clock: Rc<dyn Clock>,
    timings: ProgressTimings,
    inactive: Option<MarkupError>,
    current: u32,
    target: u32,
    tween: Option<Tween>,
}

impl std::fmt::Debug for QuizProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizProgress")
            .field("current", &self.current)
            .field("target", &self.target)
            .field("tween", &self.tween)
            .finish_non_exhaustive()
    }
}

impl QuizProgress {
    /// Bar at 0%.
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            timings: ProgressTimings::default(),
            inactive: None,
            current: 0,
            target: 0,
            tween: None,
        }
    }

    /// Build from the `.quiz_progress` container. Without the fill or the
    /// percentage label the bar is an inert stub.
    pub fn from_markup<M: Markup>(container: Option<&M>, clock: Rc<dyn Clock>) -> Self {
        let mut bar = Self::new(clock);
        let anchor = |class| container.and_then(|c| c.find(&Query::Class(class)));
        bar.inactive = if container.is_none() {
            Some(MarkupError::MissingRoot {
                widget: "quiz-progress",
            })
        } else if anchor("quiz_progress__fill").is_none() {
            Some(MarkupError::MissingAnchor {
                widget: "quiz-progress",
                anchor: "quiz_progress__fill",
            })
        } else if anchor("quiz_progress__percentage").is_none() {
            Some(MarkupError::MissingAnchor {
                widget: "quiz-progress",
                anchor: "quiz_progress__percentage",
            })
        } else {
            None
        };
        if let Some(err) = &bar.inactive {
            tracing::debug!(%err, "quiz progress stubbed");
        }
        bar
    }

    /// Override timings.
    #[must_use]
    pub const fn with_timings(mut self, timings: ProgressTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Animate towards `current / total`, restarting from the displayed value.
    pub fn update(&mut self, current: f64, total: f64) {
        if self.inactive.is_some() {
            return;
        }
        self.target = percentage(current, total);
        let now = self.clock.now_ms();
        self.tween = Some(
            Tween::new(
                f64::from(self.current),
                f64::from(self.target),
                now,
                self.timings.animation_ms,
            )
            .with_easing(Easing::CubicOut),
        );
        self.tick();
    }

    /// Displayed percentage.
    #[must_use]
    pub const fn current_value(&self) -> u32 {
        self.current
    }

    /// Whether the displayed percentage reached 100.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.current == 100
    }

    /// Displayed share of `total` steps.
    #[must_use]
    pub fn progress_of(&self, total: u32) -> u32 {
        round_half_up(f64::from(self.current) / 100.0 * f64::from(total)) as u32
    }

    /// Back to 0%.
    pub fn reset(&mut self) {
        self.update(0.0, 1.0);
    }
}

impl Widget for QuizProgress {
    type View = QuizProgressView;
    type Message = std::convert::Infallible;

    fn kind(&self) -> &'static str {
        "quiz-progress"
    }

    fn is_active(&self) -> bool {
        self.inactive.is_none()
    }

    fn event(&mut self, _event: &Event) -> Handled {
        Handled::No
    }

    fn tick(&mut self) {
        let Some(tween) = self.tween else {
            return;
        };
        let now = self.clock.now_ms();
        if tween.is_complete(now) {
            self.current = self.target;
            self.tween = None;
        } else {
            self.current = round_half_up(tween.value_at(now)).clamp(0.0, 100.0) as u32;
        }
    }

    /// Animation frames are due as soon as possible while a tween runs.
    fn next_deadline(&self) -> Option<Deadline> {
        self.tween.map(|_| Deadline::after(self.clock.now_ms(), 0.0))
    }

    fn view(&self) -> QuizProgressView {
        QuizProgressView {
            percent: self.current,
            completed: self.target == 100,
        }
    }

    fn take_messages(&mut self) -> Vec<Self::Message> {
        Vec::new()
    }
}
