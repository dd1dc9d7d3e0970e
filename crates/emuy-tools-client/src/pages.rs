use crate::DataShared;

pub mod admin;
pub mod architecture;
pub mod cruddy_panel;
pub mod dashboard;
pub mod devops;
pub mod landing;
mod macros;
pub mod profile;
pub mod resource;

mod private {
    /// Used to make some trait methods private
    pub struct Token;
}

use admin::UiAdmin;
use architecture::UiArchitecture;
use cruddy_panel::UiCruddyPanel;
use dashboard::UiDashboard;
use devops::UiDevOps;
use emuy_shared::{
    routes::Route,
    uac::{evaluate_guard, GuardOutcome, Session},
};
use landing::UiLanding;
use profile::UiProfile;
use tracing::info;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub enum UiPage {
    Landing(UiLanding),
    Dashboard(UiDashboard),
    Admin(UiAdmin),
    DevOps(UiDevOps),
    CruddyPanel(UiCruddyPanel),
    Profile(UiProfile),
    Architecture(UiArchitecture),
}

/// Trait for types that can be treated as pages to display
///
/// It uses Default and serde Traits as super traits to ensure all these types
/// implement these traits
pub trait DisplayablePage: Default + serde::Serialize + serde::de::DeserializeOwned {
    /// Reset the state of the screen
    fn reset_to_default(&mut self, _: private::Token);

    /// Displays the page. Only called once the route guard allowed it.
    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut DataShared);

    /// Base of the page's title (numbers get appended to duplicates)
    ///
    /// ASSUMPTION: THIS IS UNIQUE PER TYPE
    fn title_base() -> &'static str;

    /// Convenance function for working with instances inside of the enum
    fn title_base_from_instance(&self) -> &'static str {
        Self::title_base()
    }

    /// Page number to make title unique
    ///
    /// Assumed that the caller will ensure this number is unique across pages
    /// with the same base title
    fn page_unique_number(&self) -> usize;

    /// Creates a page with the unique number passed
    fn new_page(page_unique_number: usize) -> Self;

    /// Pages display title (includes page number if not first)
    fn title(&self) -> String {
        if self.page_unique_number() == 0 {
            Self::title_base().to_string()
        } else {
            format!("{} ({})", Self::title_base(), self.page_unique_number())
        }
    }

    fn is_page_open(&self) -> bool;

    fn open_page(&mut self) {
        info!("Open Page {}", self.title());
        self.internal_do_open_page(private::Token {});
    }

    fn close_page(&mut self) {
        info!("Close Page {}", self.title());
        self.internal_do_close_page(private::Token {});
    }

    fn internal_do_open_page(&mut self, _: private::Token);

    /// Drops everything loaded while open, including requests still in flight
    fn internal_do_close_page(&mut self, _: private::Token);

    /// Convenance method for chaining
    #[must_use]
    fn and_open_page(mut self) -> Self {
        self.open_page();
        self
    }

    /// Provides an opportunity for the page to change settings on the window
    /// before display
    fn adjust_window_settings<'open>(&self, window: egui::Window<'open>) -> egui::Window<'open> {
        // Provide identity default impl
        window
    }

    /// The route this page is shown for, it decides who may see it
    fn route() -> Route;

    /// Used to decide which pages to offer. Showing still goes through the
    /// guard.
    fn is_accessible(session: &Session) -> bool {
        is_route_accessible(Self::route(), session)
    }
}

macro_rules! do_on_ui_page {
    ($on:ident, $page:ident, $body:tt) => {
        match $on {
            UiPage::Landing($page) => $body,
            UiPage::Dashboard($page) => $body,
            UiPage::Admin($page) => $body,
            UiPage::DevOps($page) => $body,
            UiPage::CruddyPanel($page) => $body,
            UiPage::Profile($page) => $body,
            UiPage::Architecture($page) => $body,
        }
    };
}

impl UiPage {
    #[tracing::instrument(ret)]
    pub fn new_page_with_unique_number(route: Route, page_unique_number: usize) -> UiPage {
        let n = page_unique_number;
        match route {
            Route::Landing => Self::Landing(UiLanding::new_page(n).and_open_page()),
            Route::Dashboard => Self::Dashboard(UiDashboard::new_page(n).and_open_page()),
            Route::Admin => Self::Admin(UiAdmin::new_page(n).and_open_page()),
            Route::DevOps => Self::DevOps(UiDevOps::new_page(n).and_open_page()),
            Route::CruddyPanel => Self::CruddyPanel(UiCruddyPanel::new_page(n).and_open_page()),
            Route::Profile => Self::Profile(UiProfile::new_page(n).and_open_page()),
            Route::Architecture => {
                Self::Architecture(UiArchitecture::new_page(n).and_open_page())
            }
        }
    }

    pub fn display_page(&mut self, ctx: &egui::Context, data_shared: &mut DataShared) {
        do_on_ui_page!(self, page, { show_page(page, ctx, data_shared) })
    }

    pub fn route(&self) -> Route {
        fn route_of<P: DisplayablePage>(_: &P) -> Route {
            P::route()
        }
        do_on_ui_page!(self, page, { route_of(page) })
    }

    pub fn title_base(&self) -> &'static str {
        do_on_ui_page!(self, page, { page.title_base_from_instance() })
    }

    pub fn page_unique_number(&self) -> usize {
        do_on_ui_page!(self, page, { page.page_unique_number() })
    }

    pub fn is_page_open(&self) -> bool {
        do_on_ui_page!(self, page, { page.is_page_open() })
    }

    pub fn title(&self) -> String {
        do_on_ui_page!(self, page, { page.title() })
    }

    pub fn open_page(&mut self) {
        do_on_ui_page!(self, page, { page.open_page() })
    }

    pub fn close_page(&mut self) {
        do_on_ui_page!(self, page, { page.close_page() })
    }
}

/// Title used for a route in menus, matches the page's window title
pub fn route_title(route: Route) -> &'static str {
    match route {
        Route::Landing => UiLanding::title_base(),
        Route::Dashboard => UiDashboard::title_base(),
        Route::Admin => UiAdmin::title_base(),
        Route::DevOps => UiDevOps::title_base(),
        Route::CruddyPanel => UiCruddyPanel::title_base(),
        Route::Profile => UiProfile::title_base(),
        Route::Architecture => UiArchitecture::title_base(),
    }
}

/// Whether the page for this route may be offered to the session
pub fn is_route_accessible(route: Route, session: &Session) -> bool {
    !session.loading && evaluate_guard(session, &route.access()).is_allowed()
}

/// What the window does with the guard's decision
#[derive(Debug, PartialEq, Eq)]
enum PageAction {
    ShowSpinner,
    CloseAndGoTo(Route),
    Render,
}

impl From<GuardOutcome> for PageAction {
    fn from(value: GuardOutcome) -> Self {
        match value {
            GuardOutcome::Loading => Self::ShowSpinner,
            GuardOutcome::Denied { redirect } => Self::CloseAndGoTo(redirect),
            GuardOutcome::Allowed => Self::Render,
        }
    }
}

fn show_page<P: DisplayablePage>(page: &mut P, ctx: &egui::Context, data_shared: &mut DataShared) {
    let mut is_open = page.is_page_open();
    if !is_open {
        return;
    }
    let session = data_shared.session();
    let action = PageAction::from(evaluate_guard(&session, &P::route().access()));
    if let PageAction::CloseAndGoTo(redirect) = action {
        info!(page = page.title(), %redirect, "access denied");
        page.close_page();
        data_shared.navigate_to(redirect);
        return;
    }
    let mut window = egui::Window::new(page.title()).vscroll(true).hscroll(true);
    window = page.adjust_window_settings(window);
    window.open(&mut is_open).show(ctx, |ui| {
        if action == PageAction::ShowSpinner {
            crate::ui_helpers::ui_loading(ui, "Checking session...");
        } else {
            page.show(ui, data_shared);
        }
    });
    if !is_open {
        page.close_page();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emuy_shared::uac::{Permissions, UserIdentity};
    use rstest::rstest;
    use strum::IntoEnumIterator as _;

    fn logged_in(permissions: &[&str]) -> Session {
        Session {
            user: Some(UserIdentity {
                id: "1".into(),
                username: "tester".try_into().unwrap(),
                display_name: None,
                avatar: None,
            }),
            roles: vec![],
            permissions: permissions.iter().copied().collect::<Permissions>(),
            is_super_admin: false,
            loading: false,
        }
    }

    #[test]
    fn every_route_builds_a_matching_open_page() {
        for route in Route::iter() {
            let page = UiPage::new_page_with_unique_number(route, 2);
            assert_eq!(page.route(), route);
            assert!(page.is_page_open());
            assert_eq!(page.title_base(), route_title(route));
            assert_eq!(page.title(), format!("{} (2)", route_title(route)));
        }
    }

    #[test]
    fn closing_a_page_keeps_its_identity() {
        let mut page = UiPage::new_page_with_unique_number(Route::Admin, 0);
        page.close_page();
        assert!(!page.is_page_open());
        assert_eq!(page.title(), "Admin");
    }

    #[rstest]
    #[case::loading(GuardOutcome::Loading, PageAction::ShowSpinner)]
    #[case::denied(GuardOutcome::Denied { redirect: Route::Landing }, PageAction::CloseAndGoTo(Route::Landing))]
    #[case::allowed(GuardOutcome::Allowed, PageAction::Render)]
    fn guard_outcome_to_page_action(#[case] outcome: GuardOutcome, #[case] expected: PageAction) {
        assert_eq!(PageAction::from(outcome), expected);
    }

    #[test]
    fn nothing_is_offered_while_loading() {
        let session = Session::loading();
        assert!(Route::iter().all(|route| !is_route_accessible(route, &session)));
        assert!(!UiLanding::is_accessible(&session));
    }

    #[test]
    fn logged_out_only_gets_landing() {
        let session = Session::logged_out();
        let actual: Vec<Route> = Route::iter()
            .filter(|r| is_route_accessible(*r, &session))
            .collect();
        assert_eq!(actual, [Route::Landing]);
    }

    #[test]
    fn cruddy_permission_offers_cruddy_panel_but_not_admin() {
        let session = logged_in(&["view_cruddy"]);
        assert!(UiCruddyPanel::is_accessible(&session));
        assert!(!UiAdmin::is_accessible(&session));
        assert!(!UiDevOps::is_accessible(&session));
        assert!(UiProfile::is_accessible(&session));
    }
}
