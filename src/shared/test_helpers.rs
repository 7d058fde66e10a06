use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Duration, DurationRound, Utc};
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use serde_json::{json, Map, Value};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::features::admins::models::{Admin, AdminRole};
use crate::features::auth::model::SessionState;
use crate::features::auth::provider::{
    AuthError, AuthEvent, AuthProvider, AuthSession, AuthUser, UserDirectory,
};
use crate::modules::store::{Filter, Query, StoreError, TableStore};
use crate::shared::constants::{TABLE_ADMINS, TABLE_CATEGORIES, TABLE_PLACES, TABLE_REPORTS};

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Child rows removed together with their parent
struct Cascade {
    parent: &'static str,
    child: &'static str,
    foreign_key: &'static str,
}

/// In-memory [`TableStore`] honoring filters, ordering, limit, embeds,
/// upsert-on-conflict and delete cascades
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    defaults: HashMap<&'static str, Value>,
    cascades: Vec<Cascade>,
    failures: Mutex<HashMap<String, String>>,
    writes: Mutex<HashMap<String, usize>>,
    clock: Mutex<DateTime<Utc>>,
}

impl MemoryStore {
    /// Store with the dashboard schema: column defaults and the
    /// places→reports cascade
    pub fn dashboard() -> Self {
        let defaults = HashMap::from([
            (
                TABLE_CATEGORIES,
                json!({ "icon": null, "is_active": true, "display_order": 0 }),
            ),
            (
                TABLE_PLACES,
                json!({
                    "address": null,
                    "is_active": true,
                    "avg_wait_minutes": 0.0,
                    "report_count": 0,
                    "last_report_at": null,
                    "confidence_score": 0.0,
                }),
            ),
            (
                TABLE_REPORTS,
                json!({
                    "served_time": null,
                    "source_hash": "",
                    "is_flagged": false,
                    "is_verified": false,
                }),
            ),
            (TABLE_ADMINS, json!({ "role": "admin" })),
        ]);

        // Whole seconds keep every generated timestamp in one format
        let start = (Utc::now() - Duration::hours(1))
            .duration_trunc(Duration::seconds(1))
            .unwrap_or_else(|_| Utc::now() - Duration::hours(1));

        Self {
            tables: Mutex::new(HashMap::new()),
            defaults,
            cascades: vec![Cascade {
                parent: TABLE_PLACES,
                child: TABLE_REPORTS,
                foreign_key: "place_id",
            }],
            failures: Mutex::new(HashMap::new()),
            writes: Mutex::new(HashMap::new()),
            clock: Mutex::new(start),
        }
    }

    /// Make every call on `table` fail with a backend rejection
    pub fn fail_table(&self, table: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(table.to_string(), message.to_string());
    }

    /// Number of insert/update/upsert/delete calls issued against `table`
    pub fn write_count(&self, table: &str) -> usize {
        self.writes.lock().unwrap().get(table).copied().unwrap_or(0)
    }

    /// Insert a row directly, bypassing failure injection and write counting
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let row = self.with_defaults(table, row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn tick(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::seconds(1);
        *clock
    }

    fn with_defaults(&self, table: &str, row: Value) -> Value {
        let mut merged = match self.defaults.get(table) {
            Some(Value::Object(defaults)) => defaults.clone(),
            _ => Map::new(),
        };
        if let Value::Object(fields) = row {
            merged.extend(fields);
        }

        let now = json!(self.tick());
        merged
            .entry("id")
            .or_insert_with(|| json!(Uuid::new_v4()));
        merged.entry("created_at").or_insert_with(|| now.clone());
        if table != TABLE_REPORTS && table != TABLE_ADMINS {
            merged.entry("updated_at").or_insert(now);
        }

        Value::Object(merged)
    }

    fn check(&self, table: &str) -> Result<(), StoreError> {
        match self.failures.lock().unwrap().get(table) {
            Some(message) => Err(StoreError::Backend {
                status: 403,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record_write(&self, table: &str) {
        *self
            .writes
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default() += 1;
    }

    fn project(row: &Value, columns: &[String]) -> Value {
        if columns.iter().any(|c| c == "*") {
            return row.clone();
        }
        let projected: Map<String, Value> = columns
            .iter()
            .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
            .collect();
        Value::Object(projected)
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| match row.get(&f.column) {
        Some(Value::String(s)) => *s == f.value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == f.value,
    })
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.check(table)?;
        let tables = self.tables.lock().unwrap();

        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        for embed in &query.embeds {
            let foreign = tables.get(&embed.table);
            for row in rows.iter_mut() {
                let embedded = row
                    .get(&embed.foreign_key)
                    .and_then(|key| {
                        foreign?
                            .iter()
                            .find(|candidate| candidate.get("id") == Some(key))
                    })
                    .map(|found| Self::project(found, &embed.columns))
                    .unwrap_or(Value::Null);
                row[embed.alias.as_str()] = embedded;
            }
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
        self.check(table)?;
        self.record_write(table);
        Ok(vec![self.seed(table, row)])
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        self.check(table)?;
        self.record_write(table);

        let Value::Object(patch) = patch else {
            return Err(StoreError::Request("patch must be an object".to_string()));
        };

        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        for row in tables.entry(table.to_string()).or_default().iter_mut() {
            if !matches_all(row, filters) {
                continue;
            }
            if let Value::Object(fields) = row {
                fields.extend(patch.clone());
            }
            updated.push(row.clone());
        }

        Ok(updated)
    }

    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, StoreError> {
        self.check(table)?;
        self.record_write(table);

        let key = row.get(on_conflict).cloned();
        {
            let mut tables = self.tables.lock().unwrap();
            let existing = tables
                .entry(table.to_string())
                .or_default()
                .iter_mut()
                .find(|candidate| key.is_some() && candidate.get(on_conflict) == key.as_ref());

            if let Some(existing) = existing {
                if let (Value::Object(fields), Value::Object(incoming)) = (existing, row.clone()) {
                    fields.extend(incoming);
                    return Ok(vec![Value::Object(fields.clone())]);
                }
            }
        }

        Ok(vec![self.seed(table, row)])
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        self.check(table)?;
        self.record_write(table);

        let mut tables = self.tables.lock().unwrap();
        let mut removed_ids = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| {
                if matches_all(row, filters) {
                    removed_ids.extend(row.get("id").cloned());
                    false
                } else {
                    true
                }
            });
        }

        for cascade in self.cascades.iter().filter(|c| c.parent == table) {
            if let Some(children) = tables.get_mut(cascade.child) {
                children.retain(|child| {
                    child
                        .get(cascade.foreign_key)
                        .map_or(true, |fk| !removed_ids.contains(fk))
                });
            }
        }

        Ok(())
    }
}

// =============================================================================
// SEED DATA
// =============================================================================

pub fn seed_category(store: &MemoryStore, name: &str, display_order: i32) -> Uuid {
    let row = store.seed(
        TABLE_CATEGORIES,
        json!({
            "name": name,
            "name_ar": format!("{} (ar)", name),
            "display_order": display_order,
        }),
    );
    row_id(&row)
}

/// Seed a place with backend-maintained aggregates already set
pub fn seed_place(
    store: &MemoryStore,
    category_id: Uuid,
    name: &str,
    avg_wait_minutes: f64,
    report_count: i64,
) -> Uuid {
    let city: String = CityName().fake();
    let row = store.seed(
        TABLE_PLACES,
        json!({
            "name": name,
            "city": city,
            "category_id": category_id,
            "avg_wait_minutes": avg_wait_minutes,
            "report_count": report_count,
        }),
    );
    row_id(&row)
}

/// Seed a place with a generated name
pub fn seed_any_place(store: &MemoryStore, category_id: Uuid) -> Uuid {
    let name: String = CompanyName().fake();
    seed_place(store, category_id, &name, 0.0, 0)
}

pub fn seed_report(store: &MemoryStore, place_id: Uuid, wait_minutes: i32) -> Uuid {
    let arrival = Utc::now() - Duration::minutes(i64::from(wait_minutes));
    let row = store.seed(
        TABLE_REPORTS,
        json!({
            "place_id": place_id,
            "arrival_time": arrival,
            "served_time": Utc::now(),
            "wait_minutes": wait_minutes,
            "source_hash": format!("{:x}", Uuid::new_v4().as_u128()),
        }),
    );
    row_id(&row)
}

pub fn seed_admin(store: &MemoryStore, role: AdminRole) -> Admin {
    seed_admin_for(store, Uuid::new_v4(), role)
}

pub fn seed_admin_for(store: &MemoryStore, user_id: Uuid, role: AdminRole) -> Admin {
    let row = store.seed(TABLE_ADMINS, json!({ "user_id": user_id, "role": role }));
    serde_json::from_value(row).unwrap()
}

fn row_id(row: &Value) -> Uuid {
    row["id"].as_str().unwrap().parse().unwrap()
}

// =============================================================================
// AUTH PROVIDER
// =============================================================================

/// Auth provider holding users and sessions in memory
pub struct FakeAuthProvider {
    users: Mutex<Vec<(AuthUser, String)>>,
    sessions: Mutex<Vec<AuthSession>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for FakeAuthProvider {
    fn default() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            users: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            events,
        }
    }
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.users
            .lock()
            .unwrap()
            .push((user.clone(), password.to_string()));
        user
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Open a session without a password check or notification
    pub fn issue_session(&self, user: &AuthUser) -> AuthSession {
        let session = AuthSession {
            access_token: format!("access-{}", Uuid::new_v4()),
            refresh_token: format!("refresh-{}", Uuid::new_v4()),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            user: user.clone(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        session
    }

    pub fn issue_token(&self, user: &AuthUser) -> String {
        self.issue_session(user).access_token
    }

    pub fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, p)| u.email.as_deref() == Some(email) && p == password)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid login credentials".to_string()))?;

        let session = self.issue_session(&user);
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.access_token != access_token);
        self.emit(AuthEvent::SignedOut {
            access_token: access_token.to_string(),
        });
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.access_token == access_token)
            .map(|s| s.user.clone()))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let user = {
            let mut sessions = self.sessions.lock().unwrap();
            let index = sessions
                .iter()
                .position(|s| s.refresh_token == refresh_token)
                .ok_or_else(|| {
                    AuthError::InvalidCredentials("Invalid Refresh Token".to_string())
                })?;
            sessions.remove(index).user
        };

        let session = self.issue_session(&user);
        self.emit(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl UserDirectory for FakeAuthProvider {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email.as_deref() == Some(email))
            .map(|(u, _)| u.clone()))
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::Backend {
                status: 422,
                message: "A user with this email address has already been registered"
                    .to_string(),
            });
        }
        Ok(self.add_user(email, password))
    }
}

// =============================================================================
// ROUTER AUTH INJECTION
// =============================================================================

pub fn create_admin_session() -> SessionState {
    let user_id = Uuid::new_v4();
    SessionState::AuthenticatedAdmin {
        user: AuthUser {
            id: user_id,
            email: Some("admin@nobti.app".to_string()),
        },
        admin: Admin {
            id: Uuid::new_v4(),
            user_id,
            role: AdminRole::Admin,
            created_at: Utc::now(),
        },
    }
}

pub fn create_non_admin_session() -> SessionState {
    SessionState::AuthenticatedNonAdmin {
        user: AuthUser {
            id: Uuid::new_v4(),
            email: Some("viewer@nobti.app".to_string()),
        },
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_session());
    next.run(request).await
}

async fn inject_non_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_non_admin_session());
    next.run(request).await
}

pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub fn with_non_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_non_admin_middleware))
}
