mod pages;
mod widgets;

use iced::widget::{button, column, container, pick_list, row, scrollable, stack, text, Column, Space};
use iced::alignment::{Horizontal, Vertical};
use iced::{Alignment, Background, Border, Color, Element, Length, Shadow, Subscription, Task, Theme, Vector};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::api::transport::HttpTransport;
use crate::api::ApiClient;
use crate::config::{AppConfig, UserBackend};
use crate::error::ApiResult;
use crate::fetch::{Dataset, FetchTicket, ViewScope};
use crate::guard::{self, Gate, Route};
use crate::i18n::{Language, Translator};
use crate::models::*;
use crate::notify::{Notice, Notifier, ToastCenter, ToastKind};
use crate::preferences::Preferences;
use crate::samples;
use crate::session::SessionController;
use crate::store::{FileStore, LocalStore, MemoryStore};
use crate::theme::{build_palette, Palette, ThemeMode};
use crate::users::{HttpUserService, MockUserService, UserDirectory, UserService};
use widgets::{action_button, panel_bg, sidebar_item};

/// Simulated round trip of the in-memory user service.
const MOCK_LATENCY: Duration = Duration::from_millis(500);
const TOAST_TICK: Duration = Duration::from_millis(500);

// ─── MESSAGE & ENUMS ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyTab {
    #[default]
    Solar,
    Temperature,
    RbCells,
    Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityTab {
    #[default]
    RfidUsers,
    Attempts,
    Stats,
}

/// Result of one page dataset request.
#[derive(Debug, Clone)]
pub enum Fetched {
    MonthlyEnergy(ApiResult<Vec<MonthlyEnergy>>),
    DailyTemperature(ApiResult<Vec<TemperatureReading>>),
    WeeklyAlerts(ApiResult<Vec<DailyAlerts>>),
    Solar(ApiResult<Vec<SolarReading>>),
    PanelTemperature(ApiResult<Vec<TemperatureReading>>),
    RbCells(ApiResult<Vec<CellCharge>>),
    Frequency(ApiResult<Vec<FrequencyReading>>),
    RfidUsers(ApiResult<Vec<RfidUser>>),
    Alerts(ApiResult<Vec<SecurityAlert>>),
    AccessStats(ApiResult<Vec<AccessStats>>),
    Maintenance(ApiResult<Vec<MaintenanceItem>>),
    Inventory(ApiResult<Vec<InventoryItem>>),
    Users(ApiResult<Vec<User>>),
}

#[derive(Debug, Clone)]
pub enum Message {
    // Session
    SessionChecked(ApiResult<AccessToken>),
    LoginEmailChanged(String),
    LoginPasswordChanged(String),
    LoginRoleSelected(Role),
    LoginRememberToggled(bool),
    LoginSubmit,
    LoginFinished { email: String, role: Role, result: ApiResult<TokenPair> },
    Logout,
    // Navigation
    Navigate(Route),
    EnergyTabSelected(EnergyTab),
    SecurityTabSelected(SecurityTab),
    Fetched(FetchTicket, Fetched),
    // Users
    NewUserEmailChanged(String),
    NewUserFirstNameChanged(String),
    NewUserLastNameChanged(String),
    NewUserSuperuserToggled(bool),
    CreateUser,
    UserCreated(ApiResult<User>),
    ToggleUserActive(u64),
    UserUpdated(ApiResult<User>),
    DeleteUser(u64),
    UserDeleted(u64, ApiResult<()>),
    ViewUser(u64),
    UserLoaded(ApiResult<User>),
    CloseUserDetail,
    // Security
    RfidIdChanged(String),
    RfidNameChanged(String),
    RfidRoleChanged(String),
    AddRfidUser,
    RfidUserAdded(ApiResult<RfidUser>),
    ToggleRfidUser(String),
    RfidUserUpdated(ApiResult<RfidUser>),
    DeleteRfidUser(String),
    RfidUserDeleted(String, ApiResult<()>),
    // Material
    ServiceEquipment(String),
    MaintenanceUpdated(ApiResult<MaintenanceItem>),
    RestockItem(String),
    InventoryUpdated(ApiResult<InventoryItem>),
    // Chrome
    ToggleTheme,
    LanguageSelected(Language),
    ToggleSidebar,
    ToggleNotificationPanel,
    DesktopNotificationsToggled(bool),
    DismissToast(u64),
    ClearNotifications,
    Tick,
}

#[derive(Debug, Clone, Default)]
struct LoginForm {
    email: String,
    password: String,
    role: Role,
    remember: bool,
    submitting: bool,
}

#[derive(Debug, Clone, Default)]
struct NewUserForm {
    email: String,
    first_name: String,
    last_name: String,
    is_superuser: bool,
}

impl NewUserForm {
    fn payload(&self) -> Option<NewUser> {
        let email = self.email.trim();
        if email.is_empty() {
            return None;
        }
        Some(NewUser {
            email: email.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            is_active: true,
            is_superuser: self.is_superuser,
        })
    }
}

#[derive(Debug, Clone, Default)]
struct RfidForm {
    id: String,
    name: String,
    role: String,
}

impl RfidForm {
    /// New badges start active and have never been used.
    fn payload(&self) -> Option<RfidUser> {
        let (id, name) = (self.id.trim(), self.name.trim());
        if id.is_empty() || name.is_empty() {
            return None;
        }
        Some(RfidUser {
            id: id.to_string(),
            name: name.to_string(),
            role: self.role.trim().to_string(),
            last_access: "-".to_string(),
            status: "active".to_string(),
        })
    }
}

/// Replace the row whose id matches `item`. False when the dataset no longer lists it.
fn replace_row<T>(dataset: &mut Dataset<Vec<T>>, item: T, id: impl Fn(&T) -> &str) -> bool {
    let Some(slot) = dataset
        .data_mut()
        .and_then(|rows| rows.iter_mut().find(|row| id(row) == id(&item)))
    else {
        return false;
    };
    *slot = item;
    true
}

fn find_row<T: Clone>(dataset: &Dataset<Vec<T>>, wanted: &str, id: impl Fn(&T) -> &str) -> Option<T> {
    dataset.data()?.iter().find(|row| id(row) == wanted).cloned()
}

/// Every dataset a page can show.
#[derive(Default)]
struct PageData {
    monthly_energy: Dataset<Vec<MonthlyEnergy>>,
    daily_temperature: Dataset<Vec<TemperatureReading>>,
    weekly_alerts: Dataset<Vec<DailyAlerts>>,
    solar: Dataset<Vec<SolarReading>>,
    panel_temperature: Dataset<Vec<TemperatureReading>>,
    rb_cells: Dataset<Vec<CellCharge>>,
    frequency: Dataset<Vec<FrequencyReading>>,
    rfid_users: Dataset<Vec<RfidUser>>,
    alerts: Dataset<Vec<SecurityAlert>>,
    access_stats: Dataset<Vec<AccessStats>>,
    maintenance: Dataset<Vec<MaintenanceItem>>,
    inventory: Dataset<Vec<InventoryItem>>,
}

// ─── APP ────────────────────────────────────────────────────────

pub struct Mobilis {
    client: ApiClient,
    session: SessionController,
    toasts: ToastCenter,
    user_service: Arc<dyn UserService>,

    translator: Translator,
    theme_mode: ThemeMode,
    pal: Palette,
    sidebar_collapsed: bool,
    desktop_notifications: bool,
    show_notifications: bool,
    remembered_email: Option<String>,
    prefs_path: PathBuf,

    /// Route the operator asked for; the guard decides what is shown.
    route: Route,
    scope: ViewScope,
    data: PageData,
    users: UserDirectory,
    energy_tab: EnergyTab,
    security_tab: SecurityTab,
    security_failure_reported: bool,

    login: LoginForm,
    new_user: NewUserForm,
    rfid_form: RfidForm,
    selected_user: Option<User>,
    now: Instant,
}

impl Mobilis {
    /// Wire configuration, persisted state and the network stack together.
    pub fn new(config: AppConfig, start: Route) -> Result<Self, String> {
        let prefs_path = Preferences::config_path();
        let mut prefs = Preferences::load_from(&prefs_path);
        prefs.language.get_or_insert(config.default_language);
        let store: Arc<dyn LocalStore> = match FileStore::open(FileStore::default_path()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "session store unavailable, credentials will not persist");
                Arc::new(MemoryStore::new())
            }
        };

        let toasts = ToastCenter::new();
        let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
        let transport = HttpTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        let client = ApiClient::new(&config.api_base_url, Arc::new(transport), notifier, store.clone());

        let user_service: Arc<dyn UserService> = match config.user_backend {
            UserBackend::Http => Arc::new(HttpUserService::new(client.clone(), &config.users_path)),
            UserBackend::Mock => Arc::new(MockUserService::new(samples::users(), MOCK_LATENCY)),
        };
        info!(
            api = %client.base_url(),
            users = ?config.user_backend,
            "Mobilis dashboard starting"
        );

        Ok(Self::with_services(client, toasts, store, user_service, prefs, prefs_path, start))
    }

    /// Assemble the dashboard around already built services.
    ///
    /// `toasts` should be the notifier `client` reports to; preferences are saved to `prefs_path`.
    pub fn with_services(
        client: ApiClient,
        toasts: ToastCenter,
        store: Arc<dyn LocalStore>,
        user_service: Arc<dyn UserService>,
        prefs: Preferences,
        prefs_path: PathBuf,
        start: Route,
    ) -> Self {
        toasts.set_desktop_mirror(prefs.desktop_notifications);
        Self {
            client,
            session: SessionController::new(store),
            user_service,
            translator: Translator::new(prefs.language.unwrap_or_default()),
            theme_mode: prefs.theme,
            pal: build_palette(prefs.theme),
            sidebar_collapsed: prefs.sidebar_collapsed,
            desktop_notifications: prefs.desktop_notifications,
            show_notifications: false,
            login: LoginForm {
                email: prefs.remembered_email.clone().unwrap_or_default(),
                remember: prefs.remembered_email.is_some(),
                ..Default::default()
            },
            remembered_email: prefs.remembered_email,
            prefs_path,
            route: start,
            scope: ViewScope::new(),
            data: PageData::default(),
            users: UserDirectory::new(Arc::new(toasts.clone())),
            energy_tab: EnergyTab::default(),
            security_tab: SecurityTab::default(),
            security_failure_reported: false,
            new_user: NewUserForm::default(),
            rfid_form: RfidForm::default(),
            selected_user: None,
            now: Instant::now(),
            toasts,
        }
    }

    /// Initial task: the one startup session check, if a refresh credential exists.
    pub fn start(mut self) -> (Self, Task<Message>) {
        let task = match self.session.begin() {
            Some(refresh) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.refresh_access(&refresh).await },
                    Message::SessionChecked,
                )
            }
            None => self.enter(self.route),
        };
        (self, task)
    }

    fn t<'k>(&self, key: &'k str) -> &'k str {
        self.translator.t(key)
    }

    pub fn title(&self) -> String {
        format!("Mobilis · {}", self.t(self.shown_route().unwrap_or(self.route).title_key()))
    }

    pub fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.toasts.visible(self.now).is_empty() {
            Subscription::none()
        } else {
            iced::time::every(TOAST_TICK).map(|_| Message::Tick)
        }
    }

    fn shown_route(&self) -> Option<Route> {
        guard::resolve(self.route, self.session.state())
    }

    fn save_prefs(&self) {
        let prefs = Preferences {
            theme: self.theme_mode,
            language: Some(self.translator.language()),
            sidebar_collapsed: self.sidebar_collapsed,
            desktop_notifications: self.desktop_notifications,
            remembered_email: self.remembered_email.clone(),
        };
        prefs.save_to(&self.prefs_path);
    }

    fn notify(&self, notice: Notice) {
        self.toasts.notify(notice);
    }

    // ─── NAVIGATION & FETCHING ──────────────────────────────────

    /// Open a new visit of whatever the guard lets through for `route`.
    fn enter(&mut self, route: Route) -> Task<Message> {
        self.route = route;
        let shown = match guard::guard(route, self.session.state()) {
            Gate::Placeholder => return Task::none(),
            Gate::Render(r) => r,
            Gate::Redirect(target) => {
                debug!(from = ?route, to = ?target, "route redirected");
                self.route = target;
                target
            }
        };
        let ticket = self.scope.enter(shown);
        debug!(path = shown.path(), generation = ticket.generation, "page entered");
        self.fetch_page(ticket)
    }

    fn fetch_page(&mut self, ticket: FetchTicket) -> Task<Message> {
        let d = &mut self.data;
        match ticket.route {
            Route::Dashboard => {
                d.monthly_energy = Dataset::Loading;
                d.daily_temperature = Dataset::Loading;
                d.weekly_alerts = Dataset::Loading;
                Task::batch([
                    self.fetch(ticket, |c| async move { c.dashboard_energy().await }, Fetched::MonthlyEnergy),
                    self.fetch(ticket, |c| async move { c.dashboard_temperature().await }, Fetched::DailyTemperature),
                    self.fetch(ticket, |c| async move { c.dashboard_security().await }, Fetched::WeeklyAlerts),
                ])
            }
            Route::Energy => {
                d.solar = Dataset::Loading;
                d.panel_temperature = Dataset::Loading;
                d.rb_cells = Dataset::Loading;
                d.frequency = Dataset::Loading;
                Task::batch([
                    self.fetch(ticket, |c| async move { c.solar_output().await }, Fetched::Solar),
                    self.fetch(ticket, |c| async move { c.panel_temperature().await }, Fetched::PanelTemperature),
                    self.fetch(ticket, |c| async move { c.rb_cells().await }, Fetched::RbCells),
                    self.fetch(ticket, |c| async move { c.grid_frequency().await }, Fetched::Frequency),
                ])
            }
            Route::Security => {
                d.rfid_users = Dataset::Loading;
                d.alerts = Dataset::Loading;
                d.access_stats = Dataset::Loading;
                self.security_failure_reported = false;
                Task::batch([
                    self.fetch(ticket, |c| async move { c.rfid_users().await }, Fetched::RfidUsers),
                    self.fetch(ticket, |c| async move { c.security_alerts().await }, Fetched::Alerts),
                    self.fetch(ticket, |c| async move { c.access_stats().await }, Fetched::AccessStats),
                ])
            }
            Route::Material => {
                d.maintenance = Dataset::Loading;
                d.inventory = Dataset::Loading;
                Task::batch([
                    self.fetch(ticket, |c| async move { c.maintenance().await }, Fetched::Maintenance),
                    self.fetch(ticket, |c| async move { c.inventory().await }, Fetched::Inventory),
                ])
            }
            Route::Users => {
                self.users.set_loading();
                let service = self.user_service.clone();
                Task::perform(async move { service.list().await }, move |r| {
                    Message::Fetched(ticket, Fetched::Users(r))
                })
            }
            Route::Login | Route::NotFound => Task::none(),
        }
    }

    fn fetch<T, F, Fut>(&self, ticket: FetchTicket, call: F, wrap: fn(ApiResult<T>) -> Fetched) -> Task<Message>
    where
        T: Send + 'static,
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        Task::perform(call(self.client.clone()), move |result| {
            Message::Fetched(ticket, wrap(result))
        })
    }

    fn apply_fetched(&mut self, ticket: FetchTicket, fetched: Fetched) {
        if !self.scope.is_current(ticket) {
            debug!(route = ?ticket.route, generation = ticket.generation, "stale page result discarded");
            return;
        }
        let d = &mut self.data;
        let mut security_failed = false;
        match fetched {
            Fetched::MonthlyEnergy(r) => d.monthly_energy = Dataset::resolve(r, samples::monthly_energy),
            Fetched::DailyTemperature(r) => d.daily_temperature = Dataset::resolve(r, samples::daily_temperature),
            Fetched::WeeklyAlerts(r) => d.weekly_alerts = Dataset::resolve(r, samples::weekly_alerts),
            Fetched::Solar(r) => d.solar = Dataset::resolve(r, samples::solar),
            Fetched::PanelTemperature(r) => d.panel_temperature = Dataset::resolve(r, samples::panel_temperature),
            Fetched::RbCells(r) => d.rb_cells = Dataset::resolve(r, samples::rb_cells),
            Fetched::Frequency(r) => d.frequency = Dataset::resolve(r, samples::frequency),
            Fetched::RfidUsers(r) => {
                security_failed = r.is_err();
                d.rfid_users = Dataset::resolve(r, samples::rfid_users);
            }
            Fetched::Alerts(r) => {
                security_failed = r.is_err();
                d.alerts = Dataset::resolve(r, samples::security_alerts);
            }
            Fetched::AccessStats(r) => {
                security_failed = r.is_err();
                d.access_stats = Dataset::resolve(r, samples::access_stats);
            }
            Fetched::Maintenance(r) => d.maintenance = Dataset::resolve(r, samples::maintenance),
            Fetched::Inventory(r) => d.inventory = Dataset::resolve(r, samples::inventory),
            Fetched::Users(r) => self.users.load(r, samples::users),
        }
        if security_failed && !self.security_failure_reported {
            self.security_failure_reported = true;
            self.notify(Notice::error(self.t("error"), self.t("failed_to_load_data")));
        }
    }

    // ─── UPDATE ─────────────────────────────────────────────────

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.now = Instant::now();
        let task = self.handle(message);
        // Toasts raised here or by finished requests reach the desktop from the UI thread.
        self.toasts.mirror_pending();
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SessionChecked(result) => {
                self.session.complete(result);
                return self.enter(self.route);
            }
            Message::LoginEmailChanged(v) => self.login.email = v,
            Message::LoginPasswordChanged(v) => self.login.password = v,
            Message::LoginRoleSelected(role) => self.login.role = role,
            Message::LoginRememberToggled(v) => self.login.remember = v,
            Message::LoginSubmit => return self.submit_login(),
            Message::LoginFinished { email, role, result } => {
                self.login.submitting = false;
                match self.session.complete_login(&email, role, result) {
                    Ok(()) => {
                        self.login.password.clear();
                        self.remembered_email = self.login.remember.then_some(email);
                        self.save_prefs();
                        self.notify(Notice::success(self.t("success"), self.t("logged_in")));
                        return self.enter(Route::Dashboard);
                    }
                    Err(err) => {
                        debug!(error = %err, "login rejected");
                        self.notify(Notice::error(self.t("error"), self.t("invalid_credentials")));
                    }
                }
            }
            Message::Logout => {
                if let Some(visit) = self.scope.current() {
                    debug!(path = visit.route.path(), "visit retired on logout");
                }
                self.scope.retire();
                self.session.logout();
                self.data = PageData::default();
                self.users.set_loading();
                self.selected_user = None;
                self.rfid_form = RfidForm::default();
                self.show_notifications = false;
                self.notify(Notice::info(self.t("logout"), self.t("logged_out")));
                return self.enter(Route::Login);
            }

            Message::Navigate(route) => {
                self.show_notifications = false;
                return self.enter(route);
            }
            Message::EnergyTabSelected(tab) => self.energy_tab = tab,
            Message::SecurityTabSelected(tab) => self.security_tab = tab,
            Message::Fetched(ticket, fetched) => self.apply_fetched(ticket, fetched),

            Message::NewUserEmailChanged(v) => self.new_user.email = v,
            Message::NewUserFirstNameChanged(v) => self.new_user.first_name = v,
            Message::NewUserLastNameChanged(v) => self.new_user.last_name = v,
            Message::NewUserSuperuserToggled(v) => self.new_user.is_superuser = v,
            Message::CreateUser => {
                let Some(payload) = self.new_user.payload() else {
                    self.notify(Notice::error(self.t("error"), self.t("fill_required")));
                    return Task::none();
                };
                let service = self.user_service.clone();
                return Task::perform(async move { service.create(payload).await }, Message::UserCreated);
            }
            Message::UserCreated(result) => {
                if result.is_ok() {
                    self.new_user = NewUserForm::default();
                }
                self.users.created(result, &self.translator);
            }
            Message::ToggleUserActive(id) => {
                let Some(user) = self.users.users().iter().find(|u| u.id == id) else {
                    return Task::none();
                };
                let patch = UserPatch { is_active: Some(!user.is_active), ..Default::default() };
                let service = self.user_service.clone();
                return Task::perform(async move { service.update(id, patch).await }, Message::UserUpdated);
            }
            Message::UserUpdated(result) => self.users.updated(result, &self.translator),
            Message::DeleteUser(id) => {
                let service = self.user_service.clone();
                return Task::perform(async move { service.delete(id).await }, move |r| {
                    Message::UserDeleted(id, r)
                });
            }
            Message::UserDeleted(id, result) => {
                if self.selected_user.as_ref().is_some_and(|u| u.id == id) && result.is_ok() {
                    self.selected_user = None;
                }
                self.users.deleted(id, result, &self.translator);
            }
            Message::ViewUser(id) => {
                let service = self.user_service.clone();
                return Task::perform(async move { service.get(id).await }, Message::UserLoaded);
            }
            Message::UserLoaded(result) => match result {
                Ok(user) => self.selected_user = Some(user),
                Err(err) => {
                    warn!(error = %err, "user details unavailable");
                    self.notify(Notice::error(self.t("error"), err.to_string()));
                }
            },
            Message::CloseUserDetail => self.selected_user = None,

            Message::RfidIdChanged(v) => self.rfid_form.id = v,
            Message::RfidNameChanged(v) => self.rfid_form.name = v,
            Message::RfidRoleChanged(v) => self.rfid_form.role = v,
            Message::AddRfidUser => {
                let Some(badge) = self.rfid_form.payload() else {
                    self.notify(Notice::error(self.t("error"), self.t("fill_required")));
                    return Task::none();
                };
                let client = self.client.clone();
                return Task::perform(async move { client.add_rfid_user(&badge).await }, Message::RfidUserAdded);
            }
            Message::RfidUserAdded(result) => match result {
                Ok(badge) => {
                    info!(id = %badge.id, "rfid badge added");
                    if let Some(rows) = self.data.rfid_users.data_mut() {
                        rows.push(badge);
                    }
                    self.rfid_form = RfidForm::default();
                    self.notify(Notice::success(self.t("success"), self.t("rfid_added")));
                }
                Err(err) => warn!(error = %err, "rfid badge not added"),
            },
            Message::ToggleRfidUser(id) => {
                let Some(mut badge) = find_row(&self.data.rfid_users, &id, |u| &u.id) else {
                    return Task::none();
                };
                badge.status = if badge.is_active() { "inactive" } else { "active" }.to_string();
                let client = self.client.clone();
                return Task::perform(async move { client.update_rfid_user(&badge).await }, Message::RfidUserUpdated);
            }
            Message::RfidUserUpdated(result) => match result {
                Ok(badge) => {
                    let id = badge.id.clone();
                    if replace_row(&mut self.data.rfid_users, badge, |u| &u.id) {
                        self.notify(Notice::success(self.t("success"), self.t("rfid_updated")));
                    } else {
                        debug!(id = %id, "updated rfid badge no longer listed, ignored");
                    }
                }
                Err(err) => warn!(error = %err, "rfid badge not updated"),
            },
            Message::DeleteRfidUser(id) => {
                let client = self.client.clone();
                return Task::perform(
                    {
                        let id = id.clone();
                        async move { client.delete_rfid_user(&id).await }
                    },
                    move |result| Message::RfidUserDeleted(id.clone(), result),
                );
            }
            Message::RfidUserDeleted(id, result) => match result {
                Ok(()) => {
                    if let Some(rows) = self.data.rfid_users.data_mut() {
                        rows.retain(|u| u.id != id);
                    }
                    self.notify(Notice::success(self.t("success"), self.t("rfid_deleted")));
                }
                Err(err) => warn!(id = %id, error = %err, "rfid badge not deleted"),
            },

            Message::ServiceEquipment(id) => {
                let Some(item) = find_row(&self.data.maintenance, &id, |m| &m.id) else {
                    return Task::none();
                };
                let item = item.serviced(&chrono::Local::now().format("%d %b %Y").to_string());
                let client = self.client.clone();
                return Task::perform(async move { client.update_maintenance(&item).await }, Message::MaintenanceUpdated);
            }
            Message::MaintenanceUpdated(result) => match result {
                Ok(item) => {
                    if replace_row(&mut self.data.maintenance, item, |m| &m.id) {
                        self.notify(Notice::success(self.t("success"), self.t("maintenance_updated")));
                    }
                }
                Err(err) => warn!(error = %err, "maintenance not recorded"),
            },
            Message::RestockItem(id) => {
                let Some(item) = find_row(&self.data.inventory, &id, |i| &i.id) else {
                    return Task::none();
                };
                let item = item.restocked();
                let client = self.client.clone();
                return Task::perform(async move { client.update_inventory(&item).await }, Message::InventoryUpdated);
            }
            Message::InventoryUpdated(result) => match result {
                Ok(item) => {
                    if replace_row(&mut self.data.inventory, item, |i| &i.id) {
                        self.notify(Notice::success(self.t("success"), self.t("inventory_updated")));
                    }
                }
                Err(err) => warn!(error = %err, "stock not updated"),
            },

            Message::ToggleTheme => {
                self.theme_mode = self.theme_mode.toggled();
                self.pal = build_palette(self.theme_mode);
                self.save_prefs();
            }
            Message::LanguageSelected(lang) => {
                self.translator.set_language(lang);
                self.save_prefs();
            }
            Message::ToggleSidebar => {
                self.sidebar_collapsed = !self.sidebar_collapsed;
                self.save_prefs();
            }
            Message::ToggleNotificationPanel => self.show_notifications = !self.show_notifications,
            Message::DesktopNotificationsToggled(enabled) => {
                self.desktop_notifications = enabled;
                self.toasts.set_desktop_mirror(enabled);
                self.save_prefs();
            }
            Message::DismissToast(id) => self.toasts.dismiss(id),
            Message::ClearNotifications => self.toasts.clear(),
            Message::Tick => {}
        }
        Task::none()
    }

    fn submit_login(&mut self) -> Task<Message> {
        if self.login.submitting {
            return Task::none();
        }
        let email = self.login.email.trim().to_string();
        if email.is_empty() || self.login.password.is_empty() {
            self.notify(Notice::error(self.t("error"), self.t("fill_required")));
            return Task::none();
        }
        self.login.submitting = true;
        let credentials = Credentials { email: email.clone(), password: self.login.password.clone() };
        let role = self.login.role;
        let client = self.client.clone();
        Task::perform(
            async move { client.obtain_tokens(&credentials).await },
            move |result| Message::LoginFinished { email: email.clone(), role, result },
        )
    }

    // ─── MAIN VIEW ──────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let content: Element<Message> = match self.shown_route() {
            None => self.view_placeholder(),
            Some(Route::Login) => self.view_login(),
            Some(Route::NotFound) => self.view_not_found(),
            Some(route) => self.view_layout(route),
        };

        let bg = p.bg;
        let base = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(bg)),
                ..Default::default()
            });

        stack![base, self.view_toasts()].into()
    }

    fn view_placeholder(&self) -> Element<'_, Message> {
        container(text(self.t("session_checking")).size(14).color(self.pal.label))
            .center(Length::Fill)
            .into()
    }

    /// Sidebar + header around a protected page.
    fn view_layout(&self, route: Route) -> Element<'_, Message> {
        let p = &self.pal;
        let collapsed = self.sidebar_collapsed;

        let mut nav = Column::new().spacing(4).padding(10);
        let brand = if collapsed { "M" } else { "Mobilis" };
        nav = nav
            .push(
                button(text(brand).size(18).color(p.accent))
                    .on_press(Message::ToggleSidebar)
                    .style(button::text)
                    .padding([6, 6]),
            )
            .push(Space::with_height(12));
        for item in Route::SIDEBAR {
            nav = nav.push(sidebar_item(
                self.t(item.title_key()),
                Message::Navigate(*item),
                *item == route,
                collapsed,
                p,
            ));
        }
        nav = nav
            .push(Space::with_height(Length::Fill))
            .push(sidebar_item(self.t("logout"), Message::Logout, false, collapsed, p));
        let sidebar_bg = p.sidebar_bg;
        let border_c = p.border;
        let sidebar = container(nav)
            .width(if collapsed { 64 } else { 220 })
            .height(Length::Fill)
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(sidebar_bg)),
                border: Border { color: border_c, width: 1.0, radius: 0.0.into() },
                ..Default::default()
            });

        let page: Element<Message> = match route {
            Route::Dashboard => self.view_dashboard(),
            Route::Energy => self.view_energy(),
            Route::Security => self.view_security(),
            Route::Material => self.view_material(),
            Route::Users => self.view_users(),
            Route::Login | Route::NotFound => Space::new(0, 0).into(),
        };

        let mut body = Column::new().width(Length::Fill).push(self.view_header(route));
        if self.show_notifications {
            body = body.push(self.view_notification_history());
        }
        let body = body.push(scrollable(container(page).padding(20).width(Length::Fill)).height(Length::Fill));

        let main = if self.translator.language().is_rtl() {
            row![body, sidebar]
        } else {
            row![sidebar, body]
        };
        main.height(Length::Fill).into()
    }

    fn view_header(&self, route: Route) -> Element<'_, Message> {
        let p = &self.pal;
        let who: Element<Message> = match self.session.user() {
            Some(user) => column![
                text(user.name.clone()).size(12).color(p.text),
                text(self.t(user.role.key())).size(10).color(p.label),
            ]
            .spacing(0)
            .into(),
            None => text(self.t("user")).size(12).color(p.label).into(),
        };

        let bell_label = format!("{} ({})", self.t("notifications"), self.toasts.len());
        let bar = row![
            text(self.t(route.title_key())).size(15).color(p.text),
            Space::with_width(Length::Fill),
            button(text(bell_label).size(12).color(p.label))
                .on_press(Message::ToggleNotificationPanel)
                .style(button::text),
            button(text(self.t(self.theme_mode.toggle_key())).size(12).color(p.label))
                .on_press(Message::ToggleTheme)
                .style(button::text),
            pick_list(Language::ALL, Some(self.translator.language()), Message::LanguageSelected)
                .text_size(12)
                .padding([4, 8]),
            Space::with_width(8),
            who,
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .padding([10, 20]);

        panel_bg(bar.into(), p.panel_bg, p.border)
    }

    fn view_notification_history(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let history = self.toasts.history();
        let mut list = Column::new().spacing(6);
        if history.is_empty() {
            list = list.push(text(self.t("no_data")).size(12).color(p.label));
        }
        for toast in history {
            let color = toast_color(toast.notice.kind, p);
            list = list.push(
                row![
                    text(toast.time_label).size(11).font(iced::Font::MONOSPACE).color(p.label).width(70),
                    text(toast.notice.title).size(12).color(color).width(120),
                    text(toast.notice.body).size(12).color(p.text),
                ]
                .spacing(8),
            );
        }
        let controls = row![
            iced::widget::checkbox(self.t("notifications"), self.desktop_notifications)
                .on_toggle(Message::DesktopNotificationsToggled)
                .text_size(12),
            Space::with_width(Length::Fill),
            action_button(self.t("delete"), Some(Message::ClearNotifications), p.red),
        ]
        .align_y(Alignment::Center);

        container(widgets::panel(
            column![controls, scrollable(list).height(Length::Fixed(160.0))].spacing(8).into(),
            p,
        ))
        .padding([8, 20])
        .into()
    }

    fn view_toasts(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let panel_bg = p.panel_bg;
        let mut list = Column::new().spacing(8).width(340);
        for toast in self.toasts.visible(self.now) {
            let accent = toast_color(toast.notice.kind, p);
            let card = button(
                column![
                    text(toast.notice.title).size(13).color(accent),
                    text(toast.notice.body).size(12).color(p.text),
                ]
                .spacing(2),
            )
            .on_press(Message::DismissToast(toast.id))
            .width(Length::Fill)
            .padding([8, 12])
            .style(move |_: &Theme, _status| button::Style {
                background: Some(Background::Color(panel_bg)),
                text_color: accent,
                border: Border { color: accent, width: 1.0, radius: 8.0.into() },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
                    offset: Vector::new(0.0, 2.0),
                    blur_radius: 8.0,
                },
            });
            list = list.push(card);
        }
        container(list)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom)
            .into()
    }
}

fn toast_color(kind: ToastKind, p: &Palette) -> Color {
    match kind {
        ToastKind::Success => p.green,
        ToastKind::Error => p.red,
        ToastKind::Info => p.blue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client_with;
    use crate::api::transport::fake::FakeTransport;
    use crate::error::ApiError;
    use tempfile::TempDir;

    const EMAIL: &str = "jean.dupont@mobilis.com";

    fn app(start: Route) -> (Mobilis, ToastCenter, TempDir) {
        let (client, _, toasts, store) = client_with(FakeTransport::new(), MemoryStore::new());
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences { language: Some(Language::En), ..Default::default() };
        let app = Mobilis::with_services(
            client,
            toasts.clone(),
            store,
            Arc::new(MockUserService::new(samples::users(), Duration::ZERO)),
            prefs,
            dir.path().join("preferences.json"),
            start,
        );
        (app, toasts, dir)
    }

    fn logged_in() -> (Mobilis, ToastCenter, TempDir) {
        let (mut app, toasts, dir) = app(Route::Login);
        let _ = app.update(Message::LoginFinished {
            email: EMAIL.into(),
            role: Role::Manager,
            result: Ok(TokenPair { access: "access-1".into(), refresh: "refresh-1".into() }),
        });
        (app, toasts, dir)
    }

    fn ticket(app: &Mobilis) -> FetchTicket {
        app.scope.current().unwrap()
    }

    fn bodies(toasts: &ToastCenter, body: &str) -> usize {
        toasts.history().iter().filter(|t| t.notice.body == body).count()
    }

    fn offline() -> ApiError {
        ApiError::Network("connection refused".into())
    }

    #[test]
    fn test_login_enters_dashboard_and_saves_email() {
        let (mut app, toasts, dir) = app(Route::Login);
        app.login.remember = true;
        let _ = app.update(Message::LoginFinished {
            email: EMAIL.into(),
            role: Role::Admin,
            result: Ok(TokenPair { access: "a".into(), refresh: "r".into() }),
        });
        assert!(app.session.state().is_authenticated);
        assert_eq!(app.shown_route(), Some(Route::Dashboard));
        assert_eq!(ticket(&app).route, Route::Dashboard);
        assert!(app.data.monthly_energy.is_loading());
        assert_eq!(bodies(&toasts, "Logged in successfully"), 1);

        let saved = Preferences::load_from(&dir.path().join("preferences.json"));
        assert_eq!(saved.remembered_email.as_deref(), Some(EMAIL));
        assert_eq!(saved.language, Some(Language::En));
    }

    #[test]
    fn test_failed_login_raises_invalid_credentials() {
        let (mut app, toasts, _dir) = app(Route::Login);
        app.login.submitting = true;
        let _ = app.update(Message::LoginFinished {
            email: EMAIL.into(),
            role: Role::Manager,
            result: Err(ApiError::Http { status: 401, message: "No active account".into() }),
        });
        assert!(!app.session.state().is_authenticated);
        assert!(!app.login.submitting);
        assert_eq!(app.route, Route::Login);
        assert_eq!(toasts.count_of(ToastKind::Error), 1);
        assert_eq!(bodies(&toasts, "Invalid credentials"), 1);
    }

    #[test]
    fn test_stale_results_dropped_after_navigation() {
        let (mut app, _toasts, _dir) = logged_in();
        let dashboard = ticket(&app);
        let _ = app.update(Message::Navigate(Route::Energy));
        let energy = ticket(&app);

        let _ = app.update(Message::Fetched(dashboard, Fetched::MonthlyEnergy(Ok(samples::monthly_energy()))));
        assert!(app.data.monthly_energy.is_loading());

        let _ = app.update(Message::Fetched(energy, Fetched::RbCells(Ok(samples::rb_cells()))));
        assert_eq!(app.data.rb_cells.data().map(Vec::len), Some(samples::rb_cells().len()));
        assert!(!app.data.rb_cells.is_fallback());
    }

    #[test]
    fn test_stale_results_dropped_after_logout() {
        let (mut app, toasts, _dir) = logged_in();
        let dashboard = ticket(&app);
        let _ = app.update(Message::Logout);

        let _ = app.update(Message::Fetched(dashboard, Fetched::MonthlyEnergy(Err(offline()))));
        let _ = app.update(Message::Fetched(dashboard, Fetched::WeeklyAlerts(Ok(samples::weekly_alerts()))));
        assert!(app.data.monthly_energy.is_loading());
        assert!(app.data.weekly_alerts.is_loading());
        assert!(!app.session.state().is_authenticated);
        assert_eq!(app.route, Route::Login);
        assert_eq!(toasts.count_of(ToastKind::Info), 1);
        assert_eq!(bodies(&toasts, "Logged out"), 1);
    }

    #[test]
    fn test_logout_resets_page_data() {
        let (mut app, _toasts, _dir) = logged_in();
        let dashboard = ticket(&app);
        let _ = app.update(Message::Fetched(dashboard, Fetched::MonthlyEnergy(Ok(samples::monthly_energy()))));
        let _ = app.update(Message::Fetched(dashboard, Fetched::DailyTemperature(Err(offline()))));
        assert!(app.data.daily_temperature.is_fallback());
        app.selected_user = samples::users().into_iter().next();
        app.rfid_form.name = "Half typed".into();

        let _ = app.update(Message::Logout);
        assert!(app.data.monthly_energy.is_loading());
        assert!(app.data.daily_temperature.is_loading());
        assert!(app.users.dataset().is_loading());
        assert!(app.selected_user.is_none());
        assert!(app.rfid_form.name.is_empty());
    }

    #[test]
    fn test_security_failure_reported_once_per_visit() {
        let (mut app, toasts, _dir) = logged_in();
        let failed = Translator::new(Language::En).t("failed_to_load_data");

        let _ = app.update(Message::Navigate(Route::Security));
        let first = ticket(&app);
        let _ = app.update(Message::Fetched(first, Fetched::RfidUsers(Err(offline()))));
        let _ = app.update(Message::Fetched(first, Fetched::Alerts(Err(offline()))));
        let _ = app.update(Message::Fetched(first, Fetched::AccessStats(Ok(samples::access_stats()))));
        assert_eq!(bodies(&toasts, failed), 1);
        assert!(app.data.rfid_users.is_fallback());
        assert!(app.data.alerts.is_fallback());

        let _ = app.update(Message::Navigate(Route::Dashboard));
        let _ = app.update(Message::Navigate(Route::Security));
        let _ = app.update(Message::Fetched(first, Fetched::AccessStats(Err(offline()))));
        assert_eq!(bodies(&toasts, failed), 1);

        let second = ticket(&app);
        let _ = app.update(Message::Fetched(second, Fetched::AccessStats(Err(offline()))));
        assert_eq!(bodies(&toasts, failed), 2);
    }

    #[test]
    fn test_rfid_mutations_touch_only_listed_rows() {
        let (mut app, toasts, _dir) = logged_in();
        let _ = app.update(Message::Navigate(Route::Security));
        let visit = ticket(&app);
        let _ = app.update(Message::Fetched(visit, Fetched::RfidUsers(Ok(samples::rfid_users()))));

        let mut badge = samples::rfid_users().remove(0);
        badge.status = "inactive".into();
        let _ = app.update(Message::RfidUserUpdated(Ok(badge)));
        let rows = app.data.rfid_users.data().unwrap();
        assert!(!rows[0].is_active());
        assert_eq!(rows.len(), 5);

        let _ = app.update(Message::RfidUserDeleted("RFID-002".into(), Ok(())));
        let _ = app.update(Message::RfidUserDeleted("RFID-003".into(), Err(offline())));
        let ids: Vec<&str> = app.data.rfid_users.data().unwrap().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["RFID-001", "RFID-003", "RFID-004", "RFID-005"]);

        let mut gone = samples::rfid_users().remove(1);
        gone.status = "inactive".into();
        let _ = app.update(Message::RfidUserUpdated(Ok(gone)));
        assert_eq!(app.data.rfid_users.data().unwrap().len(), 4);
        assert_eq!(toasts.count_of(ToastKind::Success), 3);
    }

    #[test]
    fn test_rfid_form_requires_id_and_name() {
        let (mut app, toasts, _dir) = logged_in();
        app.rfid_form.id = "RFID-006".into();
        let _ = app.update(Message::AddRfidUser);
        let required = Translator::new(Language::En).t("fill_required");
        assert_eq!(bodies(&toasts, required), 1);
        assert_eq!(toasts.count_of(ToastKind::Error), 1);

        let form = RfidForm { id: " RFID-006 ".into(), name: "Nadia".into(), role: "Security".into() };
        let badge = form.payload().unwrap();
        assert_eq!(badge.id, "RFID-006");
        assert!(badge.is_active());
    }

    #[test]
    fn test_material_updates_replace_rows() {
        let (mut app, _toasts, _dir) = logged_in();
        let _ = app.update(Message::Navigate(Route::Material));
        let visit = ticket(&app);
        let _ = app.update(Message::Fetched(visit, Fetched::Maintenance(Ok(samples::maintenance()))));
        let _ = app.update(Message::Fetched(visit, Fetched::Inventory(Ok(samples::inventory()))));

        let serviced = samples::maintenance()[4].serviced("18 Oct 2026");
        let _ = app.update(Message::MaintenanceUpdated(Ok(serviced)));
        let item = &app.data.maintenance.data().unwrap()[4];
        assert_eq!((item.progress, item.status.as_str()), (100, "good"));

        let restocked = samples::inventory()[1].restocked();
        let _ = app.update(Message::InventoryUpdated(Ok(restocked)));
        let low = app.data.inventory.data().unwrap().iter().filter(|i| i.is_low()).count();
        assert_eq!(low, 1);
    }

    #[test]
    fn test_row_replacement_needs_loaded_dataset() {
        let mut loading: Dataset<Vec<InventoryItem>> = Dataset::Loading;
        assert!(!replace_row(&mut loading, samples::inventory().remove(0), |i| &i.id));
        assert!(find_row(&loading, "INV-001", |i| &i.id).is_none());
    }

    #[tokio::test]
    async fn test_user_details_follow_directory() {
        let (mut app, _toasts, _dir) = logged_in();
        let service = MockUserService::new(samples::users(), Duration::ZERO);
        let _ = app.update(Message::UserLoaded(service.get(2).await));
        assert_eq!(app.selected_user.as_ref().map(|u| u.id), Some(2));

        let _ = app.update(Message::UserDeleted(3, Ok(())));
        assert!(app.selected_user.is_some());
        let _ = app.update(Message::UserDeleted(2, service.delete(2).await));
        assert!(app.selected_user.is_none());

        let _ = app.update(Message::UserLoaded(service.get(2).await));
        assert!(app.selected_user.is_none());
    }

    #[test]
    fn test_new_user_form_requires_email() {
        let form = NewUserForm { email: "   ".into(), ..Default::default() };
        assert!(form.payload().is_none());

        let form = NewUserForm {
            email: " nadia@mobilis.com ".into(),
            first_name: "Nadia".into(),
            is_superuser: true,
            ..Default::default()
        };
        let payload = form.payload().unwrap();
        assert_eq!(payload.email, "nadia@mobilis.com");
        assert!(payload.is_active);
        assert!(payload.is_superuser);
    }
}
