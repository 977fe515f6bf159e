//! Canonical SQLite schema for the ticket store.
//!
//! - `tickets` holds the current aggregate fields of every ticket
//! - `ticket_tags` models the multi-valued tag set
//! - `follow_ups` is the append-only comment/event log
//! - `user_vote_log` records one row per (ticket, voter); the unique key is
//!   what makes vote casting idempotent under concurrent requests
//! - `store_meta` mirrors the schema version

/// Migration v1: core tables.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY CHECK (length(trim(username)) > 0),
    is_admin INTEGER NOT NULL DEFAULT 0 CHECK (is_admin IN (0, 1)),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tickets (
    ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
    status TEXT NOT NULL DEFAULT 'new' CHECK (
        status IN ('new', 'accepted', 'assigned', 'reopened', 'closed', 'duplicate', 'split')
    ),
    ticket_type TEXT NOT NULL CHECK (ticket_type IN ('bug', 'feature', 'task')),
    priority TEXT NOT NULL DEFAULT 'normal' CHECK (
        priority IN ('critical', 'high', 'normal', 'low', 'minor')
    ),
    application TEXT NOT NULL CHECK (length(trim(application)) > 0),
    description TEXT NOT NULL,
    submitted_by TEXT NOT NULL REFERENCES users(username),
    assigned_to TEXT REFERENCES users(username),
    vote_count INTEGER NOT NULL DEFAULT 0 CHECK (vote_count >= 0),
    parent_id INTEGER REFERENCES tickets(ticket_id),
    duplicate_of INTEGER REFERENCES tickets(ticket_id),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL,
    CHECK (duplicate_of IS NULL OR duplicate_of <> ticket_id)
);

CREATE TABLE IF NOT EXISTS ticket_tags (
    ticket_id INTEGER NOT NULL REFERENCES tickets(ticket_id) ON DELETE CASCADE,
    tag TEXT NOT NULL CHECK (length(trim(tag)) > 0),
    PRIMARY KEY (ticket_id, tag)
);

CREATE TABLE IF NOT EXISTS follow_ups (
    follow_up_id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(ticket_id) ON DELETE CASCADE,
    author TEXT NOT NULL REFERENCES users(username),
    body TEXT NOT NULL,
    visibility TEXT NOT NULL CHECK (visibility IN ('public', 'internal')),
    action TEXT NOT NULL CHECK (
        action IN ('none', 'closed', 'reopened', 'accepted', 'assigned', 'comment', 'split')
    ),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS user_vote_log (
    vote_id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(ticket_id) ON DELETE CASCADE,
    username TEXT NOT NULL REFERENCES users(username),
    created_at_us INTEGER NOT NULL,
    UNIQUE (ticket_id, username)
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us) VALUES (1, 1, 0);
";

/// Migration v2: read-path indexes for listing and filter aggregation.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_tickets_status_created
    ON tickets(status, created_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_tickets_type_created
    ON tickets(ticket_type, created_at_us DESC);

CREATE INDEX IF NOT EXISTS idx_tickets_submitted_by
    ON tickets(submitted_by);

CREATE INDEX IF NOT EXISTS idx_tickets_assigned_to
    ON tickets(assigned_to);

CREATE INDEX IF NOT EXISTS idx_tickets_parent
    ON tickets(parent_id);

CREATE INDEX IF NOT EXISTS idx_ticket_tags_tag
    ON ticket_tags(tag, ticket_id);

CREATE INDEX IF NOT EXISTS idx_follow_ups_ticket_created
    ON follow_ups(ticket_id, created_at_us DESC, follow_up_id DESC);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
";

/// Indexes expected by list/filter query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_tickets_status_created",
    "idx_tickets_type_created",
    "idx_tickets_submitted_by",
    "idx_tickets_assigned_to",
    "idx_tickets_parent",
    "idx_ticket_tags_tag",
    "idx_follow_ups_ticket_created",
];
