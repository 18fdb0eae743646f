use crate::db::models::{NewReceipt, OrgDetails, Receipt};
use crate::db::schema::SQLITE_INIT;
use crate::error::ReceiptError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const SELECT_BY_ID: &str = r#"SELECT id, org_name, org_address, org_phone, org_email,
    reg_no, patient_name, guardian_name, address, age, gender, phone, consultant,
    item_desc, amount, paid_amount, created_at
    FROM receipts WHERE id = ?"#;

const SELECT_RECENT: &str = r#"SELECT id, org_name, org_address, org_phone, org_email,
    reg_no, patient_name, guardian_name, address, age, gender, phone, consultant,
    item_desc, amount, paid_amount, created_at
    FROM receipts ORDER BY created_at DESC, id DESC LIMIT ?"#;

/// Open (creating if missing) the SQLite database at `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ReceiptError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct ReceiptStorage {
    pool: SqlitePool,
}

impl ReceiptStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ReceiptError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a receipt stamped with the current time. Returns the new row id.
    pub async fn create(&self, new: NewReceipt) -> Result<i64, ReceiptError> {
        self.create_at(new, Utc::now()).await
    }

    /// Insert a receipt with an explicit creation time (stored at microsecond precision).
    pub async fn create_at(
        &self,
        new: NewReceipt,
        created_at: DateTime<Utc>,
    ) -> Result<i64, ReceiptError> {
        let created_at = created_at
            .trunc_subsecs(6)
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let result = sqlx::query(
            r#"
            INSERT INTO receipts (
                org_name, org_address, org_phone, org_email,
                reg_no, patient_name, guardian_name, address, age, gender, phone, consultant,
                item_desc, amount, paid_amount, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.org.org_name)
        .bind(new.org.org_address)
        .bind(new.org.org_phone)
        .bind(new.org.org_email)
        .bind(new.reg_no)
        .bind(new.patient_name)
        .bind(new.guardian_name)
        .bind(new.address)
        .bind(new.age.map(i64::from))
        .bind(new.gender)
        .bind(new.phone)
        .bind(new.consultant)
        .bind(new.item_desc)
        .bind(new.amount)
        .bind(new.paid_amount)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Receipt>, ReceiptError> {
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Newest receipts first.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Receipt>, ReceiptError> {
        let rows = sqlx::query(SELECT_RECENT)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: SqliteRow) -> Result<Receipt, ReceiptError> {
        let age: Option<i64> = row.try_get("age")?;
        let age = age
            .map(u32::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at_str: String = row.try_get("created_at")?;
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Receipt {
            id: row.try_get("id")?,
            org: OrgDetails {
                org_name: row.try_get("org_name")?,
                org_address: row.try_get("org_address")?,
                org_phone: row.try_get("org_phone")?,
                org_email: row.try_get("org_email")?,
            },
            reg_no: row.try_get("reg_no")?,
            patient_name: row.try_get("patient_name")?,
            guardian_name: row.try_get("guardian_name")?,
            address: row.try_get("address")?,
            age,
            gender: row.try_get("gender")?,
            phone: row.try_get("phone")?,
            consultant: row.try_get("consultant")?,
            item_desc: row.try_get("item_desc")?,
            amount: row.try_get("amount")?,
            paid_amount: row.try_get("paid_amount")?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DEFAULT_ITEM_DESC;
    use chrono::TimeZone;
    use tempfile::TempDir;

    async fn storage() -> (TempDir, ReceiptStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite:{}", dir.path().join("receipts.db").display());
        let storage = ReceiptStorage::new(connect(&url).await.expect("connect"));
        storage.init_schema().await.expect("schema");
        (dir, storage)
    }

    fn jane() -> NewReceipt {
        NewReceipt {
            org: OrgDetails {
                org_name: "Acme Clinic".to_string(),
                org_address: Some("12 Main Road\nSpringfield".to_string()),
                org_phone: Some("555-0100".to_string()),
                org_email: None,
            },
            reg_no: Some("R-42".to_string()),
            patient_name: "Jane Doe".to_string(),
            guardian_name: Some("John Doe".to_string()),
            address: None,
            age: Some(30),
            gender: Some("F".to_string()),
            phone: None,
            consultant: Some("Dr. Rao".to_string()),
            item_desc: DEFAULT_ITEM_DESC.to_string(),
            amount: 1250.5,
            paid_amount: 1000.0,
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_submitted_values() {
        let (_dir, storage) = storage().await;
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();

        let id = storage.create_at(jane(), at).await.unwrap();
        let fetched = storage.get_by_id(id).await.unwrap().expect("row exists");

        assert_eq!(fetched, Receipt::from_new(id, jane(), at));
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let (_dir, storage) = storage().await;
        assert!(storage.get_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_strictly_increase() {
        let (_dir, storage) = storage().await;
        let mut last = 0;
        for _ in 0..5 {
            let id = storage.create(jane()).await.unwrap();
            assert!(id > last, "{id} should be greater than {last}");
            last = id;
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_row_removal() {
        let (_dir, storage) = storage().await;
        let first = storage.create(jane()).await.unwrap();
        let second = storage.create(jane()).await.unwrap();

        // The app has no delete path; simulate an out-of-band removal.
        sqlx::query("DELETE FROM receipts WHERE id = ?")
            .bind(second)
            .execute(storage.pool())
            .await
            .unwrap();

        let third = storage.create(jane()).await.unwrap();
        assert!(third > second && second > first);
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let (_dir, storage) = storage().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        for day in 0..4 {
            let mut r = jane();
            r.patient_name = format!("Patient {day}");
            storage
                .create_at(r, base + chrono::Duration::days(day))
                .await
                .unwrap();
        }

        let recent = storage.list_recent(3).await.unwrap();
        let names: Vec<&str> = recent.iter().map(|r| r.patient_name.as_str()).collect();
        assert_eq!(names, vec!["Patient 3", "Patient 2", "Patient 1"]);
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let (_dir, storage) = storage().await;
        storage.init_schema().await.unwrap();
        storage.create(jane()).await.unwrap();
        storage.init_schema().await.unwrap();
        assert_eq!(storage.list_recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn primary_key_is_the_only_index() {
        let (_dir, storage) = storage().await;
        let explicit: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM sqlite_master WHERE type = 'index' AND tbl_name = 'receipts' AND sql IS NOT NULL",
        )
        .fetch_one(storage.pool())
        .await
        .unwrap();
        assert_eq!(explicit, 0);
    }
}
