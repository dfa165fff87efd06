//! Literal SQL change-sets applied to the hosted `public.events` table.
//! Postgres dialect; every statement is guarded with `IF NOT EXISTS`.

/// A named block of schema-altering SQL applied as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSet {
    pub name: &'static str,
    pub statement: &'static str,
}

/// `is_freebie` flag for events created by the master account, plus an
/// index and a check that freebie events are also free.
pub const ADD_FREEBIE_COLUMN: ChangeSet = ChangeSet {
    name: "Add Freebie Column",
    statement: r#"
ALTER TABLE public.events
  ADD COLUMN IF NOT EXISTS is_freebie boolean NOT NULL DEFAULT false;

CREATE INDEX IF NOT EXISTS idx_events_is_freebie ON public.events(is_freebie);

ALTER TABLE public.events
  ADD CONSTRAINT IF NOT EXISTS check_freebie_is_free CHECK (NOT is_freebie OR is_free = true);
"#,
};

/// Per-event storage limit (bytes) and owner display name.
pub const ADD_STORAGE_AND_OWNER_COLUMNS: ChangeSet = ChangeSet {
    name: "Add Storage and Owner Columns",
    statement: r#"
ALTER TABLE public.events
  ADD COLUMN IF NOT EXISTS max_storage_bytes bigint DEFAULT 999999999;

ALTER TABLE public.events
  ADD COLUMN IF NOT EXISTS owner_name text DEFAULT 'SnapWorxx Team';

CREATE INDEX IF NOT EXISTS idx_events_max_storage_bytes ON public.events(max_storage_bytes);
"#,
};

/// Application order.
pub const CHANGESETS: &[ChangeSet] = &[ADD_FREEBIE_COLUMN, ADD_STORAGE_AND_OWNER_COLUMNS];

/// Read-only query to run in the SQL editor after a manual apply.
/// Expect three rows.
pub const VERIFY_COLUMNS_QUERY: &str = r#"SELECT column_name, data_type
FROM information_schema.columns
WHERE table_name = 'events'
  AND column_name IN ('is_freebie', 'max_storage_bytes', 'owner_name')
ORDER BY column_name;"#;
