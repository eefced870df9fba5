#![allow(dead_code)]

//! Flow router — the single top-level state selecting the active full-screen
//! view. The auth gate is a modal over the generator, not a screen of its
//! own. Invalid transitions are silently ignored and logged, never surfaced.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Generator,
    Plans,
    Generating,
    Editor,
    Preview,
}

#[derive(Debug, Clone)]
pub struct FlowRouter {
    screen: Screen,
    auth_modal_open: bool,
    /// Where a cancelled generation returns to.
    return_screen: Screen,
}

impl Default for FlowRouter {
    fn default() -> Self {
        FlowRouter {
            screen: Screen::Generator,
            auth_modal_open: false,
            return_screen: Screen::Generator,
        }
    }
}

impl FlowRouter {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_auth_modal_open(&self) -> bool {
        self.auth_modal_open
    }

    /// The generate action raises the auth gate over the generator.
    pub fn open_auth_modal(&mut self) -> bool {
        if self.screen != Screen::Generator {
            debug!("auth modal only opens over the generator");
            return false;
        }
        self.auth_modal_open = true;
        true
    }

    pub fn close_auth_modal(&mut self) {
        self.auth_modal_open = false;
    }

    /// Auth success closes the modal and moves on to plan selection.
    pub fn auth_succeeded(&mut self) -> bool {
        if !self.auth_modal_open {
            debug!("auth success without an open modal ignored");
            return false;
        }
        self.auth_modal_open = false;
        self.screen = Screen::Plans;
        true
    }

    /// Plan confirmation enters the generating screen, remembering where a
    /// cancel should land.
    pub fn plan_confirmed(&mut self) -> bool {
        if self.screen != Screen::Plans {
            debug!("plan confirmation outside the plans screen ignored");
            return false;
        }
        self.return_screen = Screen::Generator;
        self.screen = Screen::Generating;
        true
    }

    /// Entering the editor requires a document in memory; the guard is
    /// mandatory, not cosmetic.
    pub fn generation_succeeded(&mut self, has_generated_cv: bool) -> bool {
        if self.screen != Screen::Generating || !has_generated_cv {
            debug!("editor entry refused (screen {:?})", self.screen);
            return false;
        }
        self.screen = Screen::Editor;
        true
    }

    pub fn cancel_generating(&mut self) -> bool {
        if self.screen != Screen::Generating {
            return false;
        }
        self.screen = self.return_screen;
        true
    }

    pub fn to_preview(&mut self, has_generated_cv: bool) -> bool {
        if self.screen != Screen::Editor || !has_generated_cv {
            debug!("preview entry refused (screen {:?})", self.screen);
            return false;
        }
        self.screen = Screen::Preview;
        true
    }

    pub fn back_to_editor(&mut self) -> bool {
        if self.screen != Screen::Preview {
            return false;
        }
        self.screen = Screen::Editor;
        true
    }

    /// "Back" from the editor returns to the generator; the document stays in
    /// memory for the history sidebar.
    pub fn back_to_generator(&mut self) -> bool {
        if self.screen != Screen::Editor {
            return false;
        }
        self.screen = Screen::Generator;
        true
    }
}
