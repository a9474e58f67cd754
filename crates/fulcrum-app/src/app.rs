//! Main egui application — composes the panels and drives the chat session.

use std::rc::Rc;

use egui::{self, CentralPanel, SidePanel};

use fulcrum_core::auth::AuthSession;
use fulcrum_core::event_bus::EventBus;
use fulcrum_core::ports::{Clock, SystemClock};
use fulcrum_core::session::ChatSession;
use fulcrum_core::store::ChatStore;
use fulcrum_platform::api::ApiClient;
use fulcrum_platform::router::{current_route, HistoryNavigator, RouteWatcher};
use fulcrum_platform::storage::open_storage;
use fulcrum_types::config::ClientConfig;
use fulcrum_types::route::Route;
use fulcrum_ui::panels::{chat_panel, sidebar_panel, SidebarAction};
use fulcrum_ui::state::UiState;
use fulcrum_ui::theme;

/// Wired-up core services, built once per page load
pub struct Services {
    pub session: ChatSession,
    pub auth: AuthSession,
    pub event_bus: EventBus,
}

impl Services {
    /// Restore auth and fetch a fresh token, hydrate the store, then open
    /// a session on whatever the address bar points at.
    pub async fn bootstrap(config: &ClientConfig) -> Self {
        let event_bus = EventBus::new();
        let storage = open_storage(&config.storage.backend);
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let api = Rc::new(ApiClient::new(config.api.clone()));

        let auth = AuthSession::restore(
            storage.clone(),
            clock.clone(),
            &config.storage.token_key,
            event_bus.clone(),
        )
        .await;
        auth.bootstrap(api.as_ref()).await;

        let store = ChatStore::load(storage, clock, &config.storage.chats_key, event_bus.clone()).await;

        let route = current_route();
        log::info!("Opening {} (api: {:?})", route.path(), api.base_url());
        let session = ChatSession::new(
            route,
            store,
            auth.clone(),
            api,
            Rc::new(HistoryNavigator),
            event_bus.clone(),
        );

        Self {
            session,
            auth,
            event_bus,
        }
    }
}

/// The main application state
pub struct FulcrumApp {
    ui_state: UiState,
    services: Services,
    route_watcher: RouteWatcher,
    first_frame: bool,
}

impl FulcrumApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, services: Services) -> Self {
        Self {
            ui_state: UiState::new(),
            services,
            route_watcher: RouteWatcher::from_location(),
            first_frame: true,
        }
    }
}

impl eframe::App for FulcrumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        // Back/forward and manual address-bar edits
        if let Some(route) = self.route_watcher.poll() {
            self.services.session.set_route(route);
        }

        // Drain events from the session, store and auth
        let events = self.services.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.ui_state.sync(&self.services.session, &self.services.auth);

        // Keep the spinner moving and catch the reply promptly
        if self.ui_state.is_sending {
            ctx.request_repaint();
        }

        // ── Sidebar ──────────────────────────────────────────
        let mut sidebar_action = None;
        if self.ui_state.show_sidebar {
            SidePanel::left("sidebar")
                .resizable(false)
                .exact_width(theme::SIDEBAR_WIDTH)
                .show(ctx, |ui| {
                    sidebar_action = sidebar_panel(ui, &self.ui_state);
                });
        }
        if let Some(action) = sidebar_action {
            self.handle_sidebar(action, ctx);
        }

        // ── Main content ─────────────────────────────────────
        let submitted = CentralPanel::default()
            .show(ctx, |ui| chat_panel(ui, &mut self.ui_state))
            .inner;
        if let Some(user_msg) = submitted {
            self.dispatch_message(user_msg, ctx);
        }
    }
}

impl FulcrumApp {
    fn handle_sidebar(&self, action: SidebarAction, ctx: &egui::Context) {
        let session = self.services.session.clone();
        match action {
            SidebarAction::NewChat => session.new_chat(),
            SidebarAction::Open(id) => session.navigate(Route::chat(id)),
            SidebarAction::Delete(id) => {
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    session.delete_conversation(&id).await;
                    ctx.request_repaint();
                });
            }
            SidebarAction::DeleteAll => {
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    session.delete_all().await;
                    ctx.request_repaint();
                });
            }
        }
    }

    /// Hand a composed message to the session (async)
    fn dispatch_message(&self, text: String, ctx: &egui::Context) {
        let session = self.services.session.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = session.send(&text).await;
            log::debug!("Send settled: {:?}", outcome);
            ctx.request_repaint();
        });
    }
}
