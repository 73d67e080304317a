use crate::actions::Action;
use crate::assistant::AssistantBackend;
use crate::clipboard::Clipboard;
use crate::geolocation::LocationProvider;
use eframe::egui;
use std::sync::mpsc::{self, Receiver, Sender};

/// Handle background work uses to report back to the UI thread.
#[derive(Clone)]
pub struct Inbox {
    sender: Sender<Action>,
    ctx: egui::Context,
}

impl Inbox {
    pub fn channel(ctx: egui::Context) -> (Self, Receiver<Action>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender, ctx }, receiver)
    }

    /// Queue an action for the next frame and wake the UI.
    pub fn send(&self, action: Action) {
        if self.sender.send(action).is_err() {
            log::debug!("ui closed, dropping background result");
            return;
        }
        self.ctx.request_repaint();
    }
}

/// External collaborators the effects talk to.
pub struct Services {
    ctx: egui::Context,
    pub location: Box<dyn LocationProvider>,
    pub clipboard: Box<dyn Clipboard>,
    pub assistant: Box<dyn AssistantBackend>,
}

impl Services {
    pub fn new(
        ctx: egui::Context,
        location: Box<dyn LocationProvider>,
        clipboard: Box<dyn Clipboard>,
        assistant: Box<dyn AssistantBackend>,
    ) -> Self {
        Self {
            ctx,
            location,
            clipboard,
            assistant,
        }
    }

    pub fn open_url(&self, url: &str) {
        self.ctx.open_url(egui::OpenUrl::new_tab(url));
    }
}
