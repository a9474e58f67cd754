#[cfg(test)]
mod tests {
    use crate::state::*;
    use fulcrum_types::conversation::ConversationSummary;
    use fulcrum_types::event::ChatEvent;
    use fulcrum_types::message::{ChatMessage, Role};
    use fulcrum_types::route::Route;
    use fulcrum_types::user::User;

    fn summary(id: &str, title: &str) -> ConversationSummary {
        ConversationSummary {
            id: id.to_string(),
            title: title.to_string(),
            updated_at: 0,
            message_count: 2,
        }
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.messages.is_empty());
        assert!(state.conversations.is_empty());
        assert!(state.active_id.is_none());
        assert!(state.input_text.is_empty());
        assert!(!state.is_sending);
        assert!(state.show_sidebar);
        assert_eq!(state.status_text, STATUS_READY);
        assert!(state.shows_greeting());
        assert!(state.needs_refresh());
    }

    #[test]
    fn test_ui_state_send_lifecycle() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::SendStarted]);
        assert!(state.is_sending);
        assert_eq!(state.status_text, STATUS_SENDING);

        state.process_events(vec![ChatEvent::SendFinished]);
        assert_eq!(state.status_text, STATUS_READY);
    }

    #[test]
    fn test_ui_state_failure_status_sticks() {
        let mut state = UiState::new();
        state.process_events(vec![
            ChatEvent::SendStarted,
            ChatEvent::SendFailed { message: "rate limited".to_string() },
            ChatEvent::SendFinished,
        ]);
        assert_eq!(state.status_text, "Error: rate limited");

        state.process_events(vec![ChatEvent::SendStarted]);
        assert_eq!(state.status_text, STATUS_SENDING);
    }

    #[test]
    fn test_ui_state_navigation_resets_status() {
        let mut state = UiState::new();
        state.status_text = "Error: boom".to_string();
        state.process_events(vec![ChatEvent::Navigated { path: "/".to_string() }]);
        assert_eq!(state.status_text, STATUS_READY);
    }

    #[test]
    fn test_ui_state_events_mark_stale() {
        let mut state = UiState::new();
        state.apply(Snapshot::default());
        assert!(!state.needs_refresh());

        state.process_events(vec![]);
        assert!(!state.needs_refresh());

        state.process_events(vec![ChatEvent::ConversationsCleared]);
        assert!(state.needs_refresh());
    }

    #[test]
    fn test_ui_state_apply_snapshot() {
        let mut state = UiState::new();
        state.apply(Snapshot {
            transcript: vec![ChatMessage::user("hi"), ChatMessage::error("rate limited")],
            conversations: vec![summary("b", "Second"), summary("a", "First")],
            route: Route::chat("b"),
            is_sending: true,
            user: Some(User::guest()),
        });

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].role, Role::User);
        assert!(!state.messages[0].is_error);
        assert!(state.messages[1].is_error);
        assert_eq!(state.conversations[0].title, "Second");
        assert_eq!(state.active_id.as_deref(), Some("b"));
        assert!(state.is_sending);
        assert_eq!(state.user_name.as_deref(), Some("Guest"));
        assert!(!state.shows_greeting());
    }

    #[test]
    fn test_ui_state_placeholder_route_has_no_active_id() {
        let mut state = UiState::new();
        state.apply(Snapshot {
            route: Route::new_chat(),
            ..Snapshot::default()
        });
        assert!(state.active_id.is_none());
    }

    #[test]
    fn test_take_input_trims_and_clears() {
        let mut state = UiState::new();
        state.input_text = "  hello  ".to_string();
        assert_eq!(state.take_input().as_deref(), Some("hello"));
        assert!(state.input_text.is_empty());
    }

    #[test]
    fn test_take_input_rejects_blank() {
        let mut state = UiState::new();
        state.input_text = "   ".to_string();
        assert!(state.take_input().is_none());
    }

    #[test]
    fn test_take_input_blocked_while_sending() {
        let mut state = UiState::new();
        state.input_text = "queued".to_string();
        state.is_sending = true;
        assert!(state.take_input().is_none());
        assert_eq!(state.input_text, "queued");
    }

    #[test]
    fn test_chat_entry_from_message() {
        let entry = ChatEntry::from(ChatMessage::assistant("Error: nope"));
        assert_eq!(entry.role, Role::Assistant);
        assert!(entry.is_error);

        let entry = ChatEntry::from(ChatMessage::user("Error: typed by user"));
        assert!(!entry.is_error);
    }
}
