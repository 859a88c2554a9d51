//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used by
//! Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Landing page sign-ups. Rows are never deleted.
    users (id) {
        /// Primary key, generated by the database.
        id -> Uuid,
        /// Trimmed display name (2 to 100 characters).
        name -> Varchar,
        /// Lower-cased email address, unique.
        email -> Varchar,
        /// One of `active`, `inactive`, `banned`.
        status -> Varchar,
        /// Acquisition channel, `landing_page` for public sign-ups.
        source -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Offer subscriptions created alongside each user.
    subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        subscription_type -> Varchar,
        /// One of `pending`, `confirmed`.
        status -> Varchar,
        confirmed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail.
    system_logs (id) {
        id -> Uuid,
        action -> Varchar,
        user_id -> Nullable<Uuid>,
        details -> Jsonb,
        ip_address -> Nullable<Text>,
        user_agent -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Admin panel accounts.
    admins (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// PHC-formatted argon2 hash.
        password_hash -> Text,
        role -> Varchar,
        last_login -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(subscriptions -> users (user_id));
diesel::joinable!(system_logs -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, subscriptions, system_logs, admins);
