//! UI state management

use bevy::prelude::*;
use chrono::SecondsFormat;
use std::time::Duration;

use crate::tracker::TrackerContext;

#[derive(Resource, Clone, Debug)]
pub struct PopupConfig {
    pub auto_hide: Duration,
    pub title: String,
    pub description: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            auto_hide: Duration::from_millis(3000),
            title: "ISS Information".to_string(),
            description: "The International Space Station (ISS) is a habitable research \
                laboratory and observatory orbiting Earth at approximately 400 km altitude. \
                Jointly operated by NASA, Roscosmos, ESA, JAXA, and CSA, it travels at about \
                28 000 km/h, completing an orbit every 90 minutes.\n\n\
                Since its first module launch in 1998, the ISS has hosted hundreds of \
                astronauts conducting experiments in biology, physics, and Earth observation \
                under microgravity conditions. It serves as a platform for testing \
                technologies for future deep-space missions."
                .to_string(),
        }
    }
}

/// Dynamic part of the popup, captured when it is opened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopupContent {
    pub coordinates: String,
    pub updated: Option<String>,
}

impl PopupContent {
    pub fn from_context(ctx: &TrackerContext) -> Self {
        Self {
            coordinates: ctx.position.format_lat_lon(),
            updated: ctx
                .last_update
                .map(|t| format!("Updated {}", t.to_rfc3339_opts(SecondsFormat::Secs, true))),
        }
    }
}

/// Info popup: Hidden or Visible, with an auto-hide timer while visible.
#[derive(Resource, Debug, Default)]
pub struct PopupState {
    visible: bool,
    dismiss_timer: Option<Timer>,
    content: PopupContent,
}

impl PopupState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PopupContent {
        &self.content
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.dismiss_timer.is_some()
    }

    /// Show (or refresh) the popup and restart the auto-hide timer.
    pub fn open(&mut self, content: PopupContent, auto_hide: Duration) {
        self.visible = true;
        self.content = content;
        self.dismiss_timer = Some(Timer::new(auto_hide, TimerMode::Once));
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.dismiss_timer = None;
    }

    /// Advance the auto-hide timer. Returns true if this tick hid the popup.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.dismiss_timer.as_mut() else {
            return false;
        };
        timer.tick(delta);
        if timer.is_finished() {
            self.close();
            return true;
        }
        false
    }
}
