use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Bill, BillKind, BillStatus, Category, Reminder, Transaction, TransactionKind, UserProfile,
};
use crate::errors::{FinanceError, Result};
use crate::utils::{ensure_dir, PathResolver};

use super::{DataSet, FinanceStore};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// File-backed store persisting the whole dataset as pretty-printed JSON
/// with atomic tmp-then-rename writes and timestamped backups.
pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    data: Mutex<DataSet>,
}

impl JsonStore {
    pub fn open(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        ensure_dir(&base)?;
        let backups_dir = PathResolver::backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        let path = PathResolver::data_file_in(&base);
        let data = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            DataSet::default()
        };
        Ok(Self {
            path,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
            data: Mutex::new(data),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(None, None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> DataSet {
        self.data().clone()
    }

    /// Writes a timestamped copy of the current dataset, pruning old
    /// backups beyond the retention limit. Returns the backup file name.
    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut name = format!("workspace_{timestamp}");
        if let Some(label) = sanitize_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{BACKUP_EXTENSION}"));
        let json = serde_json::to_string_pretty(&*self.data())?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        self.prune_backups()?;
        Ok(name)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    pub fn restore(&self, backup_name: &str) -> Result<()> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(FinanceError::Storage(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let restored: DataSet = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let mut data = self.data();
        *data = restored;
        self.persist(&data)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(entry));
        }
        Ok(())
    }

    fn persist(&self, data: &DataSet) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn data(&self) -> MutexGuard<'_, DataSet> {
        self.data.lock().expect("finance store mutex poisoned")
    }
}

impl FinanceStore for JsonStore {
    fn upsert_user(&self, user: UserProfile) -> Result<UserProfile> {
        let mut data = self.data();
        let user = data.upsert_user(user);
        self.persist(&data)?;
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        Ok(self.data().find_user_by_email(email))
    }

    fn user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.data().user(id))
    }

    fn insert_bills(&self, bills: &[Bill]) -> Result<()> {
        let mut data = self.data();
        data.insert_bills(bills);
        self.persist(&data)
    }

    fn list_bills(&self, user_id: Uuid, kind: BillKind) -> Result<Vec<Bill>> {
        Ok(self.data().list_bills(user_id, kind))
    }

    fn update_bill_status(&self, id: Uuid, status: BillStatus) -> Result<()> {
        let mut data = self.data();
        data.update_bill_status(id, status)?;
        self.persist(&data)
    }

    fn remove_bill(&self, id: Uuid) -> Result<Option<Bill>> {
        let mut data = self.data();
        let removed = data.remove_bill(id);
        if removed.is_some() {
            self.persist(&data)?;
        }
        Ok(removed)
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<Uuid> {
        let mut data = self.data();
        let id = data.insert_transaction(transaction);
        self.persist(&data)?;
        Ok(id)
    }

    fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        Ok(self.data().list_transactions(user_id))
    }

    fn get_or_create_category(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
    ) -> Result<Option<Uuid>> {
        let mut data = self.data();
        let id = data.get_or_create_category(user_id, name, kind);
        if id.is_some() {
            self.persist(&data)?;
        }
        Ok(id)
    }

    fn category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.data().category(id))
    }

    fn insert_reminder(&self, reminder: Reminder) -> Result<Uuid> {
        let mut data = self.data();
        let id = data.insert_reminder(reminder);
        self.persist(&data)?;
        Ok(id)
    }

    fn reminders_due(&self, date: NaiveDate) -> Result<Vec<Reminder>> {
        Ok(self.data().reminders_due(date))
    }

    fn mark_reminder_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        let mut data = self.data();
        data.mark_reminder_sent(id, sent_at)?;
        self.persist(&data)
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    let mut parts = stem.splitn(2, '_');
    let _prefix = parts.next()?;
    let rest = parts.next()?;
    let raw = rest.get(..15)?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store =
            JsonStore::open(Some(temp.path().to_path_buf()), Some(3)).expect("json store");
        (store, temp)
    }

    #[test]
    fn data_survives_reopen() {
        let (store, guard) = store_with_temp_dir();
        let user = store
            .upsert_user(UserProfile::new("Ana", "ana@example.com"))
            .expect("upsert user");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store
            .insert_transaction(Transaction::new(
                user.id,
                TransactionKind::Expense,
                75.0,
                date,
            ))
            .expect("insert transaction");
        drop(store);

        let reopened =
            JsonStore::open(Some(guard.path().to_path_buf()), Some(3)).expect("reopen store");
        let found = reopened
            .find_user_by_email("ana@example.com")
            .expect("lookup")
            .expect("user present");
        assert_eq!(found.id, user.id);
        assert_eq!(reopened.list_transactions(user.id).unwrap().len(), 1);
    }

    #[test]
    fn backup_writes_timestamped_files() {
        let (store, _guard) = store_with_temp_dir();
        store
            .upsert_user(UserProfile::new("Ana", "ana@example.com"))
            .expect("upsert user");
        let name = store.backup(Some("nightly run")).expect("create backup");
        assert!(name.starts_with("workspace_"));
        assert!(name.ends_with("_nightly-run.json"));
        let backups = store.list_backups().expect("list backups");
        assert!(!backups.is_empty());
    }

    #[test]
    fn restore_replaces_current_dataset() {
        let (store, _guard) = store_with_temp_dir();
        store
            .upsert_user(UserProfile::new("Ana", "ana@example.com"))
            .expect("upsert user");
        let name = store.backup(None).expect("create backup");
        store
            .upsert_user(UserProfile::new("Bruno", "bruno@example.com"))
            .expect("second user");
        assert_eq!(store.snapshot().users.len(), 2);

        store.restore(&name).expect("restore backup");
        assert_eq!(store.snapshot().users.len(), 1);
    }
}
