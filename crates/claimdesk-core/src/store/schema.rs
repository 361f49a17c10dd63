//! Canonical SQLite schema for the claimdesk store.
//!
//! One database holds both logical areas:
//! - entity tables (`users`, `areas`, `area_sub_areas`, `projects`,
//!   `claims`, `feedback_messages`) — the "main" store
//! - `claim_events` — the append-only "audit" store
//!
//! Keeping them in one database lets the lifecycle engine wrap the snapshot
//! update and the event append in a single transaction.

/// Migration v1: entity tables plus the append-only audit log.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE CHECK (length(trim(email)) > 0),
    full_name TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL CHECK (role IN ('admin', 'employee', 'client')),
    area_id INTEGER REFERENCES areas(id),
    company_name TEXT,
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS areas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    description TEXT NOT NULL DEFAULT '',
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS area_sub_areas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area_id INTEGER NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    name TEXT NOT NULL COLLATE NOCASE CHECK (length(trim(name)) > 0),
    position INTEGER NOT NULL,
    UNIQUE (area_id, name)
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    project_type TEXT NOT NULL DEFAULT '',
    client_id INTEGER NOT NULL REFERENCES users(id),
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS claims (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES projects(id),
    claim_type TEXT NOT NULL DEFAULT '',
    priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
    severity TEXT CHECK (severity IS NULL OR severity IN ('s1_critical', 's2_high', 's3_medium', 's4_low')),
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'intake' CHECK (status IN ('intake', 'in_progress', 'resolved')),
    area_id INTEGER REFERENCES areas(id),
    sub_area TEXT,
    resolution_description TEXT,
    client_rating INTEGER CHECK (client_rating IS NULL OR client_rating BETWEEN 1 AND 5),
    client_feedback TEXT,
    attachment_path TEXT,
    attachment_name TEXT,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL,
    resolved_at_us INTEGER
);

CREATE TABLE IF NOT EXISTS feedback_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id INTEGER NOT NULL REFERENCES claims(id),
    client_id INTEGER NOT NULL REFERENCES users(id),
    message TEXT,
    rating INTEGER CHECK (rating IS NULL OR rating BETWEEN 1 AND 5),
    kind TEXT NOT NULL CHECK (kind IN ('progress', 'final')),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS claim_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id INTEGER NOT NULL REFERENCES claims(id),
    actor_id INTEGER REFERENCES users(id),
    actor_role TEXT NOT NULL CHECK (actor_role IN ('admin', 'employee', 'client')),
    action TEXT NOT NULL CHECK (action IN (
        'created', 'status_changed', 'priority_changed', 'area_changed',
        'sub_area_changed', 'comment', 'action_logged'
    )),
    visibility TEXT NOT NULL CHECK (visibility IN ('internal', 'public')),
    details TEXT NOT NULL,
    created_at_us INTEGER NOT NULL
);
"#;

/// Migration v2: read-path indexes.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_users_role_active
    ON users(role, is_active);

CREATE INDEX IF NOT EXISTS idx_users_area_role_active
    ON users(area_id, role, is_active);

CREATE INDEX IF NOT EXISTS idx_projects_client
    ON projects(client_id, is_active);

CREATE INDEX IF NOT EXISTS idx_claims_created_by_created
    ON claims(created_by, created_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_claims_status
    ON claims(status);

CREATE INDEX IF NOT EXISTS idx_feedback_claim_created
    ON feedback_messages(claim_id, created_at_us);

CREATE INDEX IF NOT EXISTS idx_feedback_claim_kind
    ON feedback_messages(claim_id, kind);

CREATE INDEX IF NOT EXISTS idx_claim_events_claim_created
    ON claim_events(claim_id, created_at_us, id);

CREATE INDEX IF NOT EXISTS idx_area_sub_areas_area_position
    ON area_sub_areas(area_id, position);
"#;
