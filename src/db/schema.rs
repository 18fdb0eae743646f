//! SQL DDL for the receipt store.

/// SQLite schema:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids only grow and are never reused
/// - organization fields are copied into every row
/// - `created_at` TEXT, RFC3339
/// - `age` nullable INTEGER, amounts REAL
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS receipts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    org_name TEXT NOT NULL,
    org_address TEXT NULL,
    org_phone TEXT NULL,
    org_email TEXT NULL,
    reg_no TEXT NULL,
    patient_name TEXT NOT NULL,
    guardian_name TEXT NULL,
    address TEXT NULL,
    age INTEGER NULL,
    gender TEXT NULL,
    phone TEXT NULL,
    consultant TEXT NULL,
    item_desc TEXT NOT NULL DEFAULT 'Consultation Fees',
    amount REAL NOT NULL DEFAULT 0,
    paid_amount REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL -- RFC3339
);
"#;
