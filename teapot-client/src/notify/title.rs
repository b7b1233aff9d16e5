/// Events that mean the user has seen the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTrigger {
    Focus,
    Blur,
    KeyDown,
    MouseDown,
    Navigation,
}

/// Window title decorated with the number of unseen new messages
#[derive(Debug, Clone)]
pub struct UnreadTitle {
    base: String,
    unread: u32,
}

impl UnreadTitle {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            unread: 0,
        }
    }

    pub fn add(&mut self, count: u32) {
        self.unread = self.unread.saturating_add(count);
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    /// `(3) TeapotNet`, or the bare base title when nothing is unseen
    pub fn title(&self) -> String {
        if self.unread == 0 {
            self.base.clone()
        } else {
            format!("({}) {}", self.unread, self.base)
        }
    }

    pub fn reset(&mut self) {
        self.unread = 0;
    }

    /// Every trigger resets; the parameter names the subscription
    pub fn handle(&mut self, trigger: ResetTrigger) {
        tracing::trace!(?trigger, "Resetting unread title");
        self.reset();
    }
}
