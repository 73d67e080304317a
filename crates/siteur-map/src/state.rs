use crate::actions::{self, Action};
use crate::cache::Cache;
use crate::effects::{self, Effect};
use crate::services::Services;
use crate::store::Store;
use std::sync::mpsc::Receiver;

pub struct State {
    pub store: Store,
    pub cache: Cache,
    services: Services,
    inbox: Receiver<Action>,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(
        store: Store,
        services: Services,
        inbox: Receiver<Action>,
    ) -> Self {
        Self {
            store,
            cache: Cache::new(),
            services,
            inbox,
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    /// Queue results reported by background work since the last frame.
    pub fn poll_inbox(&mut self) {
        self.action_queue.extend(self.inbox.try_iter());
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
        self.store.flush_pending_drag();
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            effects::run(&mut self.store, &mut self.services, effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::AssistantBackend;
    use crate::clipboard::{Clipboard, ClipboardError};
    use crate::geolocation::LocationProvider;
    use crate::services::Inbox;
    use crate::settings::Settings;
    use eframe::egui;
    use siteur::{ChatRequest, Reply};

    struct Idle;

    impl LocationProvider for Idle {
        fn watch(&mut self, _generation: u64) {}
        fn cancel(&mut self) {}
        fn current_position(&mut self, _generation: u64) {}
    }

    impl Clipboard for Idle {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    impl AssistantBackend for Idle {
        fn request(&mut self, _request: ChatRequest) {}
    }

    #[test]
    fn test_background_replies_arrive_through_inbox() {
        let ctx = egui::Context::default();
        let (inbox, receiver) = Inbox::channel(ctx.clone());
        let services =
            Services::new(ctx, Box::new(Idle), Box::new(Idle), Box::new(Idle));
        let mut state =
            State::new(Store::new(Settings::default()), services, receiver);

        state.dispatch(Action::SetChatInput {
            text: "hola".to_string(),
        });
        state.dispatch(Action::SendChat);
        state.flush_actions();
        state.flush_effects();
        assert!(state.store.chat.is_busy());

        inbox.send(Action::ChatReply {
            session: 0,
            reply: Reply::Text("¡Hola!".to_string()),
        });
        state.poll_inbox();
        state.flush_actions();
        assert!(!state.store.chat.is_busy());
        assert_eq!(state.store.chat.messages().len(), 3);
    }
}
