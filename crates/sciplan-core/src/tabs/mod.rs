//! Tab controllers: experiment design, student template, video recommendation.
//!
//! Tabs are a closed set behind a statically registered capability interface.
//! Each controller owns only its local loading/error flags; all shared state
//! lives in the store. Subscription wiring happens once, at application
//! construction, instead of per-activation.

use std::sync::{Arc, Mutex};

pub mod experiment;
pub mod template;
pub mod video;

pub use experiment::ExperimentTab;
pub use template::TemplateTab;
pub use video::VideoTab;

/// The closed set of tabs sharing the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKind {
    Experiment,
    Template,
    Video,
}

impl TabKind {
    pub const ALL: [TabKind; 3] = [TabKind::Experiment, TabKind::Template, TabKind::Video];

    pub fn name(self) -> &'static str {
        match self {
            TabKind::Experiment => "experiment",
            TabKind::Template => "template",
            TabKind::Video => "video",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Capability interface implemented by every tab controller.
pub trait TabController: Send + Sync {
    fn kind(&self) -> TabKind;

    /// Current content snapshot as display HTML, when the tab has anything to
    /// restore into the content region.
    fn render(&self) -> Option<String>;

    /// Called when the tab loses the content region. Controllers cancel
    /// pending timers here.
    fn on_deactivate(&self) {}
}

/// Scoped loading indicator. `begin` returns a guard that clears the
/// indicator when dropped, so every exit path (success or error) releases it.
#[derive(Clone, Default)]
pub struct LoadingGate {
    message: Arc<Mutex<Option<String>>>,
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, message: impl Into<String>) -> LoadingGuard {
        let slot = Arc::clone(&self.message);
        if let Ok(mut current) = slot.lock() {
            *current = Some(message.into());
        }
        LoadingGuard { message: slot }
    }

    pub fn is_loading(&self) -> bool {
        self.message.lock().map(|m| m.is_some()).unwrap_or(false)
    }

    pub fn message(&self) -> Option<String> {
        self.message.lock().ok().and_then(|m| m.clone())
    }
}

pub struct LoadingGuard {
    message: Arc<Mutex<Option<String>>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Ok(mut current) = self.message.lock() {
            *current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_round_trip() {
        for kind in TabKind::ALL {
            assert_eq!(TabKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TabKind::from_name("settings"), None);
    }

    #[test]
    fn loading_gate_clears_on_drop() {
        let gate = LoadingGate::new();
        {
            let _guard = gate.begin("처리 중입니다...");
            assert!(gate.is_loading());
            assert_eq!(gate.message().as_deref(), Some("처리 중입니다..."));
        }
        assert!(!gate.is_loading());
        assert_eq!(gate.message(), None);
    }
}
