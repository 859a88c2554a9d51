//! In-memory adapters and app assembly shared by the HTTP contract tests.
//!
//! The domain services run unchanged on top of these adapters, so the tests
//! cover validation, workflow and envelope shape without a database or a
//! mail relay.

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use landing_backend::domain::ports::{
    AdminRepository, AdminRepositoryError, CredentialHasher, DeliveryReceipt,
    RegistrationRepository, RegistrationRepositoryError, UserDirectoryRepository,
    UserDirectoryRepositoryError, WelcomeMailer, WelcomeMailerError,
};
use landing_backend::domain::{
    Admin, AdminId, AdminSessionService, AdminStatsOverview, DailyRegistrations, EmailAddress,
    NewAdmin, PublicStats, RegisteredUser, Registration, RegistrationService, SUPER_ADMIN_ROLE,
    StatsWindows, StatusFilter, SubscriptionStatus, UserDirectoryService, UserId, UserListFilter,
    UserName, UserStatus, UserSummary,
};
use landing_backend::inbound::http::admin::{admin_stats, list_users, login};
use landing_backend::inbound::http::fallback::{json_config, not_found, query_config};
use landing_backend::inbound::http::state::HttpState;
use landing_backend::inbound::http::users::{public_stats, register};
use landing_backend::middleware::{ErrorDisclosure, RateLimit};
use landing_backend::outbound::security::{Argon2CredentialHasher, JwtSessionTokens};
use landing_backend::Trace;
use mockable::Clock;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const JWT_SECRET: &[u8] = b"contract-test-secret";

/// Frozen "now" used by every service.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0)
        .single()
        .expect("fixture timestamp is valid")
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// User table shared by the registration and directory adapters.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUsers {
    rows: Arc<Mutex<Vec<UserSummary>>>,
    now: Option<DateTime<Utc>>,
}

impl InMemoryUsers {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            rows: Arc::default(),
            now: Some(now),
        }
    }

    /// Insert a user created `age` before the fixture time.
    pub fn seed(&self, name: &str, email: &str, status: UserStatus, age: Duration) {
        let created_at = self.now() - age;
        self.rows.lock().expect("users lock").push(UserSummary {
            id: UserId::random(),
            name: name.to_owned(),
            email: email.to_owned(),
            status,
            created_at,
            updated_at: created_at,
            subscription_status: Some(SubscriptionStatus::Confirmed),
            confirmed_at: Some(created_at),
        });
    }

    pub fn snapshot(&self) -> Vec<UserSummary> {
        self.rows.lock().expect("users lock").clone()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(fixture_now)
    }

    fn matching(&self, filter: &UserListFilter) -> Vec<UserSummary> {
        let needle = filter
            .search
            .as_ref()
            .map(|term| term.as_str().to_lowercase());
        let mut rows: Vec<UserSummary> = self
            .snapshot()
            .into_iter()
            .filter(|user| match filter.status {
                StatusFilter::All => true,
                StatusFilter::Only(status) => user.status == status,
            })
            .filter(|user| {
                needle.as_deref().is_none_or(|needle| {
                    user.name.to_lowercase().contains(needle)
                        || user.email.to_lowercase().contains(needle)
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn count_since(&self, since: DateTime<Utc>) -> u64 {
        self.snapshot()
            .iter()
            .filter(|user| user.created_at >= since)
            .count() as u64
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryUsers {
    async fn email_exists(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, RegistrationRepositoryError> {
        Ok(self
            .snapshot()
            .iter()
            .any(|user| user.email == email.as_ref()))
    }

    async fn create_registration(
        &self,
        registration: &Registration,
    ) -> Result<RegisteredUser, RegistrationRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        if rows
            .iter()
            .any(|user| user.email == registration.email.as_ref())
        {
            return Err(RegistrationRepositoryError::duplicate_email(
                registration.email.as_ref(),
            ));
        }
        let now = self.now();
        let id = UserId::random();
        rows.push(UserSummary {
            id,
            name: registration.name.as_ref().to_owned(),
            email: registration.email.as_ref().to_owned(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
            subscription_status: Some(SubscriptionStatus::Pending),
            confirmed_at: None,
        });
        Ok(RegisteredUser {
            id,
            name: registration.name.as_ref().to_owned(),
            email: registration.email.as_ref().to_owned(),
            registered_at: now,
        })
    }

    async fn confirm_subscription(
        &self,
        user_id: &UserId,
        confirmed_at: DateTime<Utc>,
    ) -> Result<(), RegistrationRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        if let Some(user) = rows.iter_mut().find(|user| user.id == *user_id) {
            user.subscription_status = Some(SubscriptionStatus::Confirmed);
            user.confirmed_at = Some(confirmed_at);
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectoryRepository for InMemoryUsers {
    async fn list_users(
        &self,
        filter: &UserListFilter,
    ) -> Result<Vec<UserSummary>, UserDirectoryRepositoryError> {
        let offset = usize::try_from(filter.page.offset()).unwrap_or(usize::MAX);
        let limit = filter.page.limit() as usize;
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count_users(
        &self,
        filter: &UserListFilter,
    ) -> Result<u64, UserDirectoryRepositoryError> {
        Ok(self.matching(filter).len() as u64)
    }

    async fn admin_overview(
        &self,
        windows: &StatsWindows,
    ) -> Result<AdminStatsOverview, UserDirectoryRepositoryError> {
        let rows = self.snapshot();
        let with_status = |status| rows.iter().filter(|user| user.status == status).count() as u64;
        Ok(AdminStatsOverview {
            total_users: rows.len() as u64,
            users_this_period: self.count_since(windows.period_start),
            users_this_week: self.count_since(windows.week_start),
            users_today: self.count_since(windows.today_start),
            active_users: with_status(UserStatus::Active),
            inactive_users: with_status(UserStatus::Inactive),
            banned_users: with_status(UserStatus::Banned),
        })
    }

    async fn daily_registrations(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyRegistrations>, UserDirectoryRepositoryError> {
        let mut days: Vec<DailyRegistrations> = Vec::new();
        let mut created: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|user| user.created_at >= since)
            .map(|user| user.created_at.date_naive())
            .collect();
        created.sort();
        for date in created {
            match days.last_mut() {
                Some(day) if day.date == date => day.count += 1,
                _ => days.push(DailyRegistrations { date, count: 1 }),
            }
        }
        Ok(days)
    }

    async fn public_stats(
        &self,
        windows: &StatsWindows,
    ) -> Result<PublicStats, UserDirectoryRepositoryError> {
        let active: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|user| user.status == UserStatus::Active)
            .collect();
        let since = |start| active.iter().filter(|user| user.created_at >= start).count() as u64;
        Ok(PublicStats {
            total_users: active.len() as u64,
            users_this_week: since(windows.week_start),
            users_today: since(windows.today_start),
        })
    }
}

/// Driver text a real PostgreSQL outage would carry.
pub const DRIVER_OUTAGE: &str =
    "could not connect to server: Connection refused. Is the server running on host \"db.internal\" (10.0.0.5)?";

/// User store whose every call fails as if the database were down.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedUsers;

#[async_trait]
impl RegistrationRepository for DisconnectedUsers {
    async fn email_exists(
        &self,
        _email: &EmailAddress,
    ) -> Result<bool, RegistrationRepositoryError> {
        Err(RegistrationRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn create_registration(
        &self,
        _registration: &Registration,
    ) -> Result<RegisteredUser, RegistrationRepositoryError> {
        Err(RegistrationRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn confirm_subscription(
        &self,
        _user_id: &UserId,
        _confirmed_at: DateTime<Utc>,
    ) -> Result<(), RegistrationRepositoryError> {
        Err(RegistrationRepositoryError::connection(DRIVER_OUTAGE))
    }
}

#[async_trait]
impl UserDirectoryRepository for DisconnectedUsers {
    async fn list_users(
        &self,
        _filter: &UserListFilter,
    ) -> Result<Vec<UserSummary>, UserDirectoryRepositoryError> {
        Err(UserDirectoryRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn count_users(
        &self,
        _filter: &UserListFilter,
    ) -> Result<u64, UserDirectoryRepositoryError> {
        Err(UserDirectoryRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn admin_overview(
        &self,
        _windows: &StatsWindows,
    ) -> Result<AdminStatsOverview, UserDirectoryRepositoryError> {
        Err(UserDirectoryRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn daily_registrations(
        &self,
        _since: DateTime<Utc>,
    ) -> Result<Vec<DailyRegistrations>, UserDirectoryRepositoryError> {
        Err(UserDirectoryRepositoryError::connection(DRIVER_OUTAGE))
    }

    async fn public_stats(
        &self,
        _windows: &StatsWindows,
    ) -> Result<PublicStats, UserDirectoryRepositoryError> {
        Err(UserDirectoryRepositoryError::connection(DRIVER_OUTAGE))
    }
}

/// Admin table holding a single seeded account.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAdmins {
    rows: Arc<Mutex<Vec<Admin>>>,
}

impl InMemoryAdmins {
    pub fn with_admin(username: &str, password: &str) -> Self {
        let hash = Argon2CredentialHasher::new()
            .hash(password)
            .expect("hash fixture password");
        Self {
            rows: Arc::new(Mutex::new(vec![Admin {
                id: AdminId::random(),
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                password_hash: hash,
                role: SUPER_ADMIN_ROLE.to_owned(),
                last_login: None,
                created_at: fixture_now() - Duration::days(90),
            }])),
        }
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdmins {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AdminRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("admins lock")
            .iter()
            .find(|admin| admin.username == username)
            .cloned())
    }

    async fn record_login(&self, id: &AdminId, at: DateTime<Utc>) -> Result<(), AdminRepositoryError> {
        let mut rows = self.rows.lock().expect("admins lock");
        if let Some(admin) = rows.iter_mut().find(|admin| admin.id == *id) {
            admin.last_login = Some(at);
        }
        Ok(())
    }

    async fn create_if_absent(&self, admin: &NewAdmin) -> Result<bool, AdminRepositoryError> {
        let mut rows = self.rows.lock().expect("admins lock");
        if rows.iter().any(|row| row.username == admin.username) {
            return Ok(false);
        }
        rows.push(Admin {
            id: AdminId::random(),
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
            role: admin.role.clone(),
            last_login: None,
            created_at: fixture_now(),
        });
        Ok(true)
    }
}

/// Mailer recording every recipient; fails when `failing` is set.
#[derive(Debug, Default, Clone)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl WelcomeMailer for RecordingMailer {
    async fn send_welcome(
        &self,
        email: &EmailAddress,
        _name: &UserName,
    ) -> Result<DeliveryReceipt, WelcomeMailerError> {
        if self.failing {
            return Err(WelcomeMailerError::delivery("relay refused connection"));
        }
        let mut sent = self.sent.lock().expect("mailer lock");
        sent.push(email.as_ref().to_owned());
        Ok(DeliveryReceipt {
            message_id: format!("<{}@test>", sent.len()),
        })
    }
}

/// Adapters behind one test app.
#[derive(Clone)]
pub struct Harness {
    pub users: InMemoryUsers,
    pub mailer: RecordingMailer,
    pub rate_limit: RateLimit,
    store_offline: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self {
            users: InMemoryUsers::at(fixture_now()),
            mailer,
            rate_limit: RateLimit::new(std::time::Duration::from_secs(900), 100),
            store_offline: false,
        }
    }

    /// Same app, but the user store fails every call with [`DRIVER_OUTAGE`].
    pub fn with_store_offline() -> Self {
        Self {
            store_offline: true,
            ..Self::new()
        }
    }

    pub fn with_rate_limit(mut self, max_requests: u32) -> Self {
        self.rate_limit = RateLimit::new(std::time::Duration::from_secs(900), max_requests);
        self
    }

    fn http_state(&self) -> web::Data<HttpState> {
        if self.store_offline {
            self.http_state_over(Arc::new(DisconnectedUsers))
        } else {
            self.http_state_over(Arc::new(self.users.clone()))
        }
    }

    fn http_state_over<U>(&self, users: Arc<U>) -> web::Data<HttpState>
    where
        U: RegistrationRepository + UserDirectoryRepository + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixture_now()));
        let registration = RegistrationService::new(
            Arc::clone(&users),
            Arc::new(self.mailer.clone()),
            Arc::clone(&clock),
        );
        let admin_session = AdminSessionService::new(
            Arc::new(InMemoryAdmins::with_admin(ADMIN_USERNAME, ADMIN_PASSWORD)),
            Arc::new(Argon2CredentialHasher::new()),
            Arc::new(JwtSessionTokens::new(JWT_SECRET)),
            Arc::clone(&clock),
            Duration::hours(24),
        );
        let directory = Arc::new(UserDirectoryService::new(users, clock));
        web::Data::new(HttpState::new(
            Arc::new(registration),
            Arc::new(admin_session),
            directory.clone(),
            directory,
        ))
    }

    /// App wired like the server: same routes, extractors and middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(json_config())
            .app_data(query_config())
            .app_data(self.http_state())
            .wrap(ErrorDisclosure::new(false))
            .wrap(self.rate_limit.clone())
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(register)
                    .service(public_stats)
                    .service(login)
                    .service(list_users)
                    .service(admin_stats),
            )
            .default_service(web::to(not_found))
    }
}
