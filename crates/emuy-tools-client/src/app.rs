use std::sync::Arc;

use anyhow::Context as _;
use egui::ScrollArea;
use emuy_client_core::{get_configuration, Client, UiCallBack};
use emuy_shared::{
    const_config::client::{CLIENT_IDLE_REPAINT, GITHUB_TOKEN_STORAGE_KEY},
    internal_error,
    routes::Route,
    uac::Session,
};
use emuy_time::Timestamp;
use futures::channel::oneshot;
use secrecy::{ExposeSecret as _, SecretString};
use strum::IntoEnumIterator as _;
use tracing::{debug, info, warn};

use crate::pages::{is_route_accessible, route_title, UiPage};
use crate::shortcuts::{shortcut_button, Shortcuts};

/// Only the page layout is persisted, the session is always loaded fresh
pub struct EmuyApp {
    layout: AppLayout,
    data_shared: DataShared,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct AppLayout {
    active_pages: Vec<UiPage>,
    shortcuts: Shortcuts,
}

#[derive(Debug)]
pub struct DataShared {
    pub client: Client,
    /// Kept here as well so it can be written back to storage
    github_token: Option<SecretString>,
    session_update: Option<oneshot::Receiver<Arc<Session>>>,
    navigation: Option<Route>,
    /// Browser page to come back to after login, `None` natively
    page_url: Option<String>,
}

impl DataShared {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            github_token: None,
            session_update: None,
            navigation: None,
            page_url: None,
        }
    }

    /// Snapshot used for this frame
    pub fn session(&self) -> Arc<Session> {
        self.client.session()
    }

    /// The page for `route` is opened (or created) after this frame's pages
    /// are shown
    pub fn navigate_to(&mut self, route: Route) {
        debug!(%route, "navigation requested");
        self.navigation = Some(route);
    }

    fn take_navigation(&mut self) -> Option<Route> {
        self.navigation.take()
    }

    fn start_session_load(&mut self, ctx: &egui::Context) {
        self.session_update = Some(self.client.initialize(wake_fn(ctx.clone())));
    }

    pub fn refresh_session(&mut self, ctx: &egui::Context) {
        if self.is_session_refreshing() {
            debug!("session refresh already in progress");
            return;
        }
        self.session_update = Some(self.client.refresh(wake_fn(ctx.clone())));
    }

    pub fn is_session_refreshing(&self) -> bool {
        self.session_update.is_some()
    }

    fn poll_session_update(&mut self) {
        let Some(rx) = self.session_update.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(Some(session)) => {
                info!(logged_in = session.is_logged_in(), "session resolved");
                self.session_update = None;
            }
            Ok(None) => {}
            Err(oneshot::Canceled) => {
                warn!("session load ended without a result");
                self.session_update = None;
            }
        }
    }

    /// Hands the login url to the browser. Nothing local changes until the
    /// auth service sends the user back and the session is loaded again.
    pub fn login(&self, ctx: &egui::Context) {
        let return_to = self.login_return_target();
        match self.client.login_url(&return_to) {
            Ok(url) => ctx.open_url(egui::OpenUrl::same_tab(url)),
            Err(e) => {
                internal_error!(format!("unable to build login url: {e:?}"));
            }
        }
    }

    fn login_return_target(&self) -> String {
        self.page_url
            .clone()
            .unwrap_or_else(|| self.client.config().services.app_origin.clone())
    }

    #[cfg(target_arch = "wasm32")]
    fn track_location(&mut self, location: &eframe::Location) {
        self.page_url = Some(page_url_with_fragment(&location.url, &location.hash));
    }

    pub fn logout(&self, ctx: &egui::Context) {
        match self.client.logout_url() {
            Ok(url) => ctx.open_url(egui::OpenUrl::same_tab(url)),
            Err(e) => {
                internal_error!(format!("unable to build logout url: {e:?}"));
                return;
            }
        }
        // Natively the app keeps running after handing the url to the browser
        #[cfg(not(target_arch = "wasm32"))]
        self.client.clear_session();
    }

    pub fn has_github_token(&self) -> bool {
        self.github_token.is_some()
    }

    pub fn set_github_token(&mut self, token: Option<SecretString>) {
        let token = token.filter(|t| !t.expose_secret().trim().is_empty());
        info!(is_set = token.is_some(), "GitHub token changed");
        self.client.set_github_token(
            token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_owned())),
        );
        self.github_token = token;
    }

    fn load_github_token(&mut self, storage: &dyn eframe::Storage) {
        let token = storage
            .get_string(GITHUB_TOKEN_STORAGE_KEY)
            .map(SecretString::from);
        self.set_github_token(token);
    }

    fn save_github_token(&self, storage: &mut dyn eframe::Storage) {
        let value = self
            .github_token
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
            .unwrap_or_default();
        storage.set_string(GITHUB_TOKEN_STORAGE_KEY, value);
    }
}

impl eframe::App for EmuyApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        info!("Saving with key: {}", eframe::APP_KEY);
        eframe::set_value(storage, eframe::APP_KEY, &self.layout);
        self.data_shared.save_github_token(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per
    /// second. Put your widgets into a `SidePanel`, `TopPanel`,
    /// `CentralPanel`, `Window` or `Area`.
    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))]
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Only the fragment is kept current by eframe after startup
        #[cfg(target_arch = "wasm32")]
        self.data_shared.track_location(&frame.info().web_info.location);
        self.data_shared.poll_session_update();
        self.top_panel(ctx);
        self.bottom_panel(ctx);
        self.ui_active_pages_panel(ctx);
        self.show_pages(ctx);
        if let Some(route) = self.data_shared.take_navigation() {
            self.open_route(route);
        }

        ctx.request_repaint_after(CLIENT_IDLE_REPAINT.into());
    }
}

impl EmuyApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = get_configuration().context("failed to load configuration")?;
        let client = Client::new(config).context("failed to create client")?;
        let mut data_shared = DataShared::new(client);

        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let layout = if let Some(storage) = cc.storage {
            info!("Storage found. Loading...");
            data_shared.load_github_token(storage);
            match eframe::get_value(storage, eframe::APP_KEY) {
                Some(value) => {
                    info!("Loaded succeeded");
                    value
                }
                None => {
                    warn!("Load failed");
                    AppLayout::default()
                }
            }
        } else {
            info!("No storage found");
            AppLayout::default()
        };

        data_shared.start_session_load(&cc.egui_ctx);
        let mut result = Self {
            layout,
            data_shared,
        };
        if result.layout.active_pages.is_empty() {
            result.open_route(Route::Landing);
        }

        #[cfg(target_arch = "wasm32")]
        {
            // Deep links use the fragment so the static host only needs index.html
            let hash = &cc.integration_info.web_info.location.hash;
            if let Some(route) = Route::from_path(hash.trim_start_matches('#')) {
                result.open_route(route);
            }
        }

        Ok(result)
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
        self.ui_menu_file(ui, ctx);
        self.ui_menu_pages(ui);
    }

    fn ui_menu_pages(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Pages", |ui| {
            let session = self.data_shared.session();
            for route in Route::iter().filter(|r| is_route_accessible(*r, &session)) {
                self.ui_menu_page_btn(ui, route);
            }

            ui.separator();
            if ui.button("Open All Pages").clicked() {
                self.open_all_pages();
                ui.close_menu();
            }
            if ui.button("Close All Pages").clicked() {
                self.close_all_pages();
                ui.close_menu();
            }
            if ui.button("Deactivate All Pages").clicked() {
                self.deactivate_all_pages();
                ui.close_menu();
            }
            if ui.button("Sort Pages By Name").clicked() {
                self.sort_pages_by_name();
                ui.close_menu();
            }
            if ui
                .add(egui::Button::new("Organize Pages").shortcut_text(
                    ui.ctx().format_shortcut(&self.layout.shortcuts.organize_pages),
                ))
                .clicked()
            {
                do_organize_pages(ui);
                ui.close_menu();
            }
        });
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();
                self.menu(ui, ctx);
            });
        });
    }

    fn bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::BOTTOM), |ui| {
                ui.label(self.current_time());
                let session = self.data_shared.session();
                if session.loading {
                    ui.spinner();
                    ui.label("Loading session...");
                } else if let Some(user) = &session.user {
                    if ui.button("Logout").clicked() {
                        self.data_shared.logout(ctx);
                    }
                    ui.label(format!("Logged in as {}", user.name_to_show()));
                } else {
                    if ui.button("Login").clicked() {
                        self.data_shared.login(ctx);
                    }
                    ui.label("Not logged in");
                }
                if self.data_shared.is_session_refreshing() && !session.loading {
                    ui.spinner();
                }
                egui::warn_if_debug_build(ui);
            });
        });
    }

    fn show_pages(&mut self, ctx: &egui::Context) {
        for page in self.layout.active_pages.iter_mut() {
            page.display_page(ctx, &mut self.data_shared);
        }
    }

    fn current_time(&self) -> String {
        Timestamp::now().display_as_locale_datetime()
    }

    /// Opens the first page for the route or adds one if there is none
    fn open_route(&mut self, route: Route) {
        if let Some(page) = self
            .layout
            .active_pages
            .iter_mut()
            .find(|p| p.route() == route)
        {
            if !page.is_page_open() {
                page.open_page();
            }
            return;
        }
        self.add_page(route);
    }

    fn add_page(&mut self, route: Route) {
        let max_id_found = self
            .layout
            .active_pages
            .iter()
            .filter(|page| page.route() == route)
            .map(|page| page.page_unique_number())
            .max();
        let new_num = max_id_found.map_or(0, |val| val + 1);
        self.layout
            .active_pages
            .push(UiPage::new_page_with_unique_number(route, new_num));
    }

    fn ui_menu_page_btn(&mut self, ui: &mut egui::Ui, route: Route) {
        if ui.button(route_title(route)).clicked() {
            self.add_page(route);
            ui.close_menu();
        }
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn ui_menu_file(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            // On the web the browser controls the zoom
            #[cfg(not(target_arch = "wasm32"))]
            {
                egui::gui_zoom::zoom_menu_buttons(ui);
                ui.weak(format!(
                    "Current zoom: {:.0}%",
                    100.0 * ui.ctx().zoom_factor()
                ))
                .on_hover_text("The UI zoom level, on top of the operating system's default value");
                ui.separator();
            }

            if shortcut_button(
                ui,
                "Refresh Session",
                "Reload permissions from the auth service",
                &self.layout.shortcuts.refresh_session,
            ) {
                self.data_shared.refresh_session(ctx);
                ui.close_menu();
            }

            let session = self.data_shared.session();
            if session.is_logged_in() {
                if ui.button("Logout").clicked() {
                    self.data_shared.logout(ctx);
                    ui.close_menu();
                }
            } else if !session.loading && ui.button("Login").clicked() {
                self.data_shared.login(ctx);
                ui.close_menu();
            }

            #[cfg(not(target_arch = "wasm32"))] // no File->Quit on web pages!
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn ui_active_pages_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                self.process_shortcuts(ui);

                ui.vertical_centered(|ui| {
                    ui.heading("Active Pages");
                });

                ui.separator();

                self.ui_pages_list(ui);
            });
    }

    fn ui_pages_list(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical().show(ui, |ui| {
            ui.with_layout(egui::Layout::top_down_justified(egui::Align::LEFT), |ui| {
                if self.layout.active_pages.is_empty() {
                    ui.label("NO PAGES ARE ACTIVE.\nUse top menu to activate a page");
                }
                let mut to_deactivate = Vec::new();
                for (i, page) in self.layout.active_pages.iter_mut().enumerate() {
                    let mut is_open = page.is_page_open();
                    ui.horizontal(|ui| {
                        let is_open_before = is_open;
                        if ui.button("x").clicked() {
                            to_deactivate.push(i); // Mark page for removal
                        }
                        if ui.toggle_value(&mut is_open, page.title()).middle_clicked() {
                            to_deactivate.push(i); // Mark page for removal
                        };
                        if is_open != is_open_before {
                            if is_open {
                                page.open_page();
                            } else {
                                page.close_page();
                            }
                        }
                    });
                }

                // Deactivate marked pages
                to_deactivate.sort_unstable();
                to_deactivate.dedup();
                while let Some(marked_index) = to_deactivate.pop() {
                    self.layout.active_pages.remove(marked_index);
                }

                ui.separator();

                if ui.button("Open All Pages").clicked() {
                    self.open_all_pages();
                }
                if ui.button("Close All Pages").clicked() {
                    self.close_all_pages();
                }
                if ui.button("Deactivate All Pages").clicked() {
                    self.deactivate_all_pages();
                }
                if ui.button("Sort Pages by Name").clicked() {
                    self.sort_pages_by_name();
                }
                if ui
                    .add(egui::Button::new("Organize Pages").shortcut_text(
                        ui.ctx().format_shortcut(&self.layout.shortcuts.organize_pages),
                    ))
                    .clicked()
                {
                    do_organize_pages(ui);
                }
            });
        });
    }

    fn deactivate_all_pages(&mut self) {
        self.layout.active_pages.clear();
    }

    fn close_all_pages(&mut self) {
        self.layout
            .active_pages
            .iter_mut()
            .for_each(|page| page.close_page())
    }

    fn open_all_pages(&mut self) {
        self.layout
            .active_pages
            .iter_mut()
            .for_each(|page| page.open_page())
    }

    fn sort_pages_by_name(&mut self) {
        self.layout.active_pages.sort_by_key(|x| x.title());
    }

    fn process_shortcuts(&mut self, ui: &mut egui::Ui) {
        if ui.input_mut(|i| i.consume_shortcut(&self.layout.shortcuts.organize_pages)) {
            do_organize_pages(ui);
        }
        if ui.input_mut(|i| i.consume_shortcut(&self.layout.shortcuts.refresh_session)) {
            let ctx = ui.ctx().clone();
            self.data_shared.refresh_session(&ctx);
        }
    }
}

fn do_organize_pages(ui: &mut egui::Ui) {
    ui.ctx().memory_mut(|mem| mem.reset_areas());
}

/// `url` as first loaded with its fragment replaced by `hash`
fn page_url_with_fragment(url: &str, hash: &str) -> String {
    let base = url.split_once('#').map_or(url, |(base, _)| base);
    match hash.trim_start_matches('#') {
        "" => base.to_owned(),
        fragment => format!("{base}#{fragment}"),
    }
}

#[inline]
pub fn wake_fn(ctx: egui::Context) -> impl UiCallBack {
    move || ctx.request_repaint()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::fragment_kept(
        "https://tools.example.com/app/",
        "#/devops",
        "https://tools.example.com/app/#/devops"
    )]
    #[case::fragment_replaced(
        "https://tools.example.com/#/cruddy",
        "#/devops",
        "https://tools.example.com/#/devops"
    )]
    #[case::query_kept(
        "https://tools.example.com/?lang=en",
        "#/profile",
        "https://tools.example.com/?lang=en#/profile"
    )]
    #[case::no_fragment("https://tools.example.com/#/old", "", "https://tools.example.com/")]
    #[case::bare_hash("https://tools.example.com/", "#", "https://tools.example.com/")]
    fn page_url_follows_current_fragment(
        #[case] url: &str,
        #[case] hash: &str,
        #[case] expected: &str,
    ) {
        // Act
        let actual = page_url_with_fragment(url, hash);

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn login_returns_to_current_page_when_known() {
        // Arrange
        let config = get_configuration().unwrap();
        let mut data_shared = DataShared::new(Client::new(config).unwrap());
        data_shared.page_url = Some(page_url_with_fragment(
            "https://tools.example.com/",
            "#/devops",
        ));

        // Act
        let actual = data_shared.login_return_target();

        // Assert
        assert_eq!(actual, "https://tools.example.com/#/devops");
    }

    #[test]
    fn login_falls_back_to_app_origin() {
        // Arrange
        let config = get_configuration().unwrap();
        let expected = config.services.app_origin.clone();
        let data_shared = DataShared::new(Client::new(config).unwrap());

        // Act
        let actual = data_shared.login_return_target();

        // Assert
        assert_eq!(actual, expected);
    }
}
