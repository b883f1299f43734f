use crate::db::db::{date_from_sql, date_to_sql, Db};
use crate::libs::error::StoreError;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const UPSERT_USER: &str = "INSERT INTO users (id, organization_id, name, email, hourly_rate, last_paid_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET organization_id = ?2, name = ?3, email = ?4, hourly_rate = ?5";
const SELECT_USER: &str = "SELECT id, organization_id, name, email, hourly_rate, last_paid_date FROM users";
const UPDATE_RATE: &str = "UPDATE users SET hourly_rate = ?1 WHERE id = ?2";
const UPDATE_LAST_PAID: &str = "UPDATE users SET last_paid_date = ?1 WHERE id = ?2";

/// An employee the time clock acts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub email: Option<String>,
    pub hourly_rate: f64,
    pub last_paid_date: Option<NaiveDate>,
}

impl User {
    pub fn new(id: &str, organization_id: &str, name: &str, hourly_rate: f64) -> Self {
        User {
            id: id.to_string(),
            organization_id: organization_id.to_string(),
            name: name.to_string(),
            email: None,
            hourly_rate,
            last_paid_date: None,
        }
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        hourly_rate: row.get(4)?,
        last_paid_date: row
            .get::<_, Option<String>>(5)?
            .map(|d| date_from_sql(5, &d))
            .transpose()?,
    })
}

/// Employee directory.
#[derive(Clone)]
pub struct Users {
    db: Db,
}

impl Users {
    pub fn new(db: Db) -> Self {
        Users { db }
    }

    /// Inserts or updates a user. The last paid date is left untouched.
    pub fn save(&self, user: &User) -> Result<(), StoreError> {
        self.db.conn().execute(
            UPSERT_USER,
            params![
                user.id,
                user.organization_id,
                user.name,
                user.email,
                user.hourly_rate,
                user.last_paid_date.as_ref().map(date_to_sql),
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .db
            .conn()
            .query_row(&format!("{} WHERE id = ?1", SELECT_USER), params![id], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn list(&self, organization_id: Option<&str>) -> Result<Vec<User>, StoreError> {
        let conn = self.db.conn();
        let users = match organization_id {
            Some(org) => {
                let mut stmt = conn.prepare(&format!("{} WHERE organization_id = ?1 ORDER BY name", SELECT_USER))?;
                let rows = stmt.query_map(params![org], user_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!("{} ORDER BY organization_id, name", SELECT_USER))?;
                let rows = stmt.query_map([], user_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(users)
    }

    pub fn set_rate(&self, id: &str, hourly_rate: f64) -> Result<(), StoreError> {
        let changed = self.db.conn().execute(UPDATE_RATE, params![hourly_rate, id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn mark_paid(&self, id: &str, date: NaiveDate) -> Result<(), StoreError> {
        let changed = self.db.conn().execute(UPDATE_LAST_PAID, params![date_to_sql(&date), id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
