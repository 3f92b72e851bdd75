//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `clients` and `phone_numbers` tables.
//! - Keep SQL details inside the core persistence boundary.
//! - Classify raw SQLite errors into the semantic error taxonomy.
//!
//! # Invariants
//! - Write paths must validate model inputs before SQL mutations.
//! - Multi-statement mutations run inside one immediate transaction, so a
//!   partial failure never leaves an orphaned or half-written row.
//! - Lookups signal "not found" with an empty result, never with an error.

use crate::db::DbError;
use crate::model::client::{
    validate_phone_number, Client, ClientFilter, ClientId, ClientPatch, ClientValidationError,
    NewClient, PhoneNumber, PhoneNumberId,
};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    /// Unique, not-null or check constraint breached (e.g. duplicate email).
    Constraint { detail: String },
    /// Foreign-key target missing (phone number aimed at a ghost client).
    ForeignKey { detail: String },
    NotFound(ClientId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Constraint { detail } => write!(f, "constraint violation: {detail}"),
            Self::ForeignKey { detail } => write!(f, "reference violation: {detail}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Constraint { .. } => None,
            Self::ForeignKey { .. } => None,
            Self::NotFound(_) => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref cause, ref message) = value {
            let detail = message.clone().unwrap_or_else(|| cause.to_string());
            match cause.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ForeignKey { detail },
                ffi::SQLITE_CONSTRAINT_UNIQUE
                | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                | ffi::SQLITE_CONSTRAINT_NOTNULL
                | ffi::SQLITE_CONSTRAINT_CHECK => return Self::Constraint { detail },
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Creates one client, plus its initial phone row when supplied, in a
    /// single transaction; returns the generated client id.
    fn add_client(&mut self, new_client: &NewClient) -> RepoResult<ClientId>;
    /// Creates one phone row for an existing client.
    fn add_phone_number(&self, client_id: ClientId, phone_number: &str)
        -> RepoResult<PhoneNumberId>;
    /// Sets exactly the fields named by the patch; absent fields are untouched.
    fn update_info(&self, client_id: ClientId, patch: &ClientPatch) -> RepoResult<()>;
    /// Deletes every phone row matching the value; returns how many.
    fn delete_phone_number(&self, phone_number: &str) -> RepoResult<usize>;
    /// Deletes one client and all its phone rows in a single transaction.
    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()>;
    /// Returns the first matching client id, lowest id wins.
    fn find_client(&self, filter: &ClientFilter) -> RepoResult<Option<ClientId>>;
    /// Returns every matching client id in ascending order.
    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientId>>;
    /// Gets one client record by id.
    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<Client>>;
    /// Lists phone rows owned by the client in ascending id order.
    fn list_phone_numbers(&self, client_id: ClientId) -> RepoResult<Vec<PhoneNumber>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn client_exists(&self, client_id: ClientId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE client_id = ?1);",
            [client_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn add_client(&mut self, new_client: &NewClient) -> RepoResult<ClientId> {
        new_client.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let client_id: ClientId = tx.query_row(
            "INSERT INTO clients (name, last_name, email)
             VALUES (?1, ?2, ?3)
             RETURNING client_id;",
            params![
                new_client.name.as_str(),
                new_client.last_name.as_str(),
                new_client.email.as_str(),
            ],
            |row| row.get(0),
        )?;

        if let Some(number) = new_client.phone_number.as_deref() {
            tx.execute(
                "INSERT INTO phone_numbers (client_id, phone_number)
                 VALUES (?1, ?2);",
                params![client_id, number],
            )?;
        }

        tx.commit()?;
        Ok(client_id)
    }

    fn add_phone_number(
        &self,
        client_id: ClientId,
        phone_number: &str,
    ) -> RepoResult<PhoneNumberId> {
        validate_phone_number(phone_number)?;

        let phone_number_id: PhoneNumberId = self.conn.query_row(
            "INSERT INTO phone_numbers (client_id, phone_number)
             VALUES (?1, ?2)
             RETURNING phone_number_id;",
            params![client_id, phone_number],
            |row| row.get(0),
        )?;

        Ok(phone_number_id)
    }

    fn update_info(&self, client_id: ClientId, patch: &ClientPatch) -> RepoResult<()> {
        patch.validate()?;

        if patch.is_empty() {
            // Nothing to set, but a missing target is still reported.
            if !self.client_exists(client_id)? {
                return Err(RepoError::NotFound(client_id));
            }
            return Ok(());
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = patch.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }
        if let Some(last_name) = patch.last_name.as_deref() {
            assignments.push("last_name = ?");
            bind_values.push(Value::Text(last_name.to_string()));
        }
        if let Some(email) = patch.email.as_deref() {
            assignments.push("email = ?");
            bind_values.push(Value::Text(email.to_string()));
        }

        let sql = format!(
            "UPDATE clients SET {} WHERE client_id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(client_id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(client_id));
        }

        Ok(())
    }

    fn delete_phone_number(&self, phone_number: &str) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM phone_numbers WHERE phone_number = ?1;",
            [phone_number],
        )?;
        Ok(deleted)
    }

    fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The schema cascades on delete; the explicit phone delete keeps the
        // operation readable and independent of the pragma state.
        tx.execute(
            "DELETE FROM phone_numbers WHERE client_id = ?1;",
            [client_id],
        )?;
        let changed = tx.execute("DELETE FROM clients WHERE client_id = ?1;", [client_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(client_id));
        }

        tx.commit()?;
        Ok(())
    }

    fn find_client(&self, filter: &ClientFilter) -> RepoResult<Option<ClientId>> {
        Ok(self.find_clients(filter)?.into_iter().next())
    }

    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientId>> {
        if let Some(number) = filter.phone_number.as_deref() {
            let mut stmt = self.conn.prepare(
                "SELECT DISTINCT c.client_id
                 FROM clients c
                 JOIN phone_numbers p ON p.client_id = c.client_id
                 WHERE p.phone_number = ?1
                 ORDER BY c.client_id ASC;",
            )?;
            let mut rows = stmt.query([number])?;
            let mut ids = Vec::new();
            while let Some(row) = rows.next()? {
                ids.push(row.get::<_, ClientId>(0)?);
            }
            return Ok(ids);
        }

        let mut sql = String::from("SELECT client_id FROM clients WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = filter.name.as_deref() {
            sql.push_str(" AND name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }
        if let Some(last_name) = filter.last_name.as_deref() {
            sql.push_str(" AND last_name = ?");
            bind_values.push(Value::Text(last_name.to_string()));
        }
        if let Some(email) = filter.email.as_deref() {
            sql.push_str(" AND email = ?");
            bind_values.push(Value::Text(email.to_string()));
        }

        sql.push_str(" ORDER BY client_id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get::<_, ClientId>(0)?);
        }

        Ok(ids)
    }

    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self.conn.prepare(
            "SELECT client_id, name, last_name, email
             FROM clients
             WHERE client_id = ?1;",
        )?;

        let mut rows = stmt.query([client_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Client {
                client_id: row.get("client_id")?,
                name: row.get("name")?,
                last_name: row.get("last_name")?,
                email: row.get("email")?,
            }));
        }

        Ok(None)
    }

    fn list_phone_numbers(&self, client_id: ClientId) -> RepoResult<Vec<PhoneNumber>> {
        let mut stmt = self.conn.prepare(
            "SELECT phone_number_id, phone_number, client_id
             FROM phone_numbers
             WHERE client_id = ?1
             ORDER BY phone_number_id ASC;",
        )?;

        let mut rows = stmt.query([client_id])?;
        let mut numbers = Vec::new();
        while let Some(row) = rows.next()? {
            numbers.push(PhoneNumber {
                phone_number_id: row.get("phone_number_id")?,
                phone_number: row.get("phone_number")?,
                client_id: row.get("client_id")?,
            });
        }

        Ok(numbers)
    }
}
