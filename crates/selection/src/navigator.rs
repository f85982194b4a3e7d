use std::time::{Duration, Instant};

use galleryconfig::Navigation;
use tracing::{debug, trace};

use crate::cooldown::Cooldown;
use crate::state::GallerySelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Char(char),
    Other,
}

/// User input, already stripped of windowing-system detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavInput {
    Key(NavKey),
    /// Vertical wheel travel; positive scrolls towards the next artwork.
    Wheel { delta_y: f32 },
    TouchStart { y: f32 },
    TouchEnd { y: f32 },
    PointerMoved,
    PreviousButton,
    NextButton,
    MenuToggle,
    MenuDismiss,
    MenuSelect(usize),
}

/// What a handled input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Nothing,
    Selected { target: usize },
    Throttled,
    MenuOpened,
    MenuClosed,
}

/// Visibility of the navigation overlay and its side menu.
#[derive(Debug, Clone)]
pub struct Chrome {
    visible: bool,
    menu_open: bool,
    last_activity: Instant,
    inactivity: Duration,
}

impl Chrome {
    pub fn new(inactivity: Duration, now: Instant) -> Self {
        Self {
            visible: true,
            menu_open: false,
            last_activity: now,
            inactivity,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn note_activity(&mut self, now: Instant) {
        self.last_activity = now;
        self.visible = true;
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu_open, false)
    }

    /// Hides the chrome (and closes the menu) after the inactivity window.
    /// Returns `true` when visibility changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.visible && now.saturating_duration_since(self.last_activity) > self.inactivity {
            self.visible = false;
            self.menu_open = false;
            debug!("navigation hidden after inactivity");
            return true;
        }
        false
    }

    /// Instant at which the chrome will hide if nothing happens.
    pub fn hide_deadline(&self) -> Option<Instant> {
        if !self.visible {
            return None;
        }
        self.inactivity
            .checked_add(Duration::from_millis(1))
            .and_then(|wait| self.last_activity.checked_add(wait))
    }
}

/// Translates inputs into selection requests.
///
/// Keyboard, buttons and menu picks act immediately; wheel and swipe
/// gestures share one cooldown so a single flick cannot skip several
/// artworks.
#[derive(Debug, Clone)]
pub struct Navigator {
    cooldown: Cooldown,
    swipe_threshold: f32,
    touch_start: Option<f32>,
    chrome: Chrome,
}

impl Navigator {
    pub fn new(cooldown: Duration, swipe_threshold: f32, inactivity: Duration, now: Instant) -> Self {
        Self {
            cooldown: Cooldown::new(cooldown),
            swipe_threshold,
            touch_start: None,
            chrome: Chrome::new(inactivity, now),
        }
    }

    pub fn from_config(config: &Navigation, now: Instant) -> Self {
        Self::new(
            config.cooldown,
            config.swipe_threshold,
            config.inactivity,
            now,
        )
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.chrome.tick(now)
    }

    pub fn handle(
        &mut self,
        input: NavInput,
        selection: &mut GallerySelection,
        now: Instant,
    ) -> NavAction {
        if input != NavInput::MenuDismiss {
            self.chrome.note_activity(now);
        }

        let action = match input {
            NavInput::Key(key) => match key {
                NavKey::ArrowLeft | NavKey::Char('a') | NavKey::Char('A') => {
                    step(selection, now, false)
                }
                NavKey::ArrowRight | NavKey::Char('d') | NavKey::Char('D') => {
                    step(selection, now, true)
                }
                NavKey::Escape => self.close_menu(),
                _ => NavAction::Nothing,
            },
            NavInput::Wheel { delta_y } => {
                if delta_y == 0.0 || !delta_y.is_finite() {
                    NavAction::Nothing
                } else if !self.cooldown.try_fire(now) {
                    NavAction::Throttled
                } else {
                    step(selection, now, delta_y > 0.0)
                }
            }
            NavInput::TouchStart { y } => {
                self.touch_start = Some(y);
                NavAction::Nothing
            }
            NavInput::TouchEnd { y } => match self.touch_start.take() {
                None => NavAction::Nothing,
                Some(start) => {
                    let diff = start - y;
                    if diff.abs() <= self.swipe_threshold {
                        NavAction::Nothing
                    } else if !self.cooldown.try_fire(now) {
                        NavAction::Throttled
                    } else {
                        step(selection, now, diff > 0.0)
                    }
                }
            },
            NavInput::PointerMoved => NavAction::Nothing,
            NavInput::PreviousButton => step(selection, now, false),
            NavInput::NextButton => step(selection, now, true),
            NavInput::MenuToggle => {
                if self.chrome.is_menu_open() {
                    self.close_menu()
                } else {
                    self.chrome.open_menu();
                    NavAction::MenuOpened
                }
            }
            NavInput::MenuDismiss => self.close_menu(),
            NavInput::MenuSelect(index) => {
                self.chrome.close_menu();
                let target = i64::try_from(index).unwrap_or(i64::MAX);
                if selection.request(target, now) {
                    selected(selection)
                } else {
                    NavAction::MenuClosed
                }
            }
        };

        if action != NavAction::Nothing {
            trace!(?input, ?action, "navigation input handled");
        }
        action
    }

    fn close_menu(&mut self) -> NavAction {
        if self.chrome.close_menu() {
            NavAction::MenuClosed
        } else {
            NavAction::Nothing
        }
    }
}

fn step(selection: &mut GallerySelection, now: Instant, forward: bool) -> NavAction {
    let changed = if forward {
        selection.next(now)
    } else {
        selection.previous(now)
    };
    if changed {
        selected(selection)
    } else {
        NavAction::Nothing
    }
}

fn selected(selection: &GallerySelection) -> NavAction {
    NavAction::Selected {
        target: selection.pending_target().unwrap_or(selection.current()),
    }
}
