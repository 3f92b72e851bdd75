//! Single-owner contact store over one SQLite connection.
//!
//! # Responsibility
//! - Hold the connection for the store's lifetime and release it on `close`.
//! - Delegate persistence to the contact repository.
//! - Present callers one semantic error taxonomy, never driver types.
//!
//! # Invariants
//! - The store is either open or closed; every operation on a closed store
//!   fails with `StoreError::Closed`, including a second `close`.
//! - Each public mutation is its own atomic unit of work; multi-statement
//!   mutations commit only after every constituent statement succeeds.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::client::{
    Client, ClientFilter, ClientId, ClientPatch, ClientValidationError, NewClient, PhoneNumber,
    PhoneNumberId,
};
use crate::repo::contact_repo::{ContactRepository, RepoError, SqliteContactRepository};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Component-boundary error taxonomy for contact operations.
#[derive(Debug)]
pub enum StoreError {
    /// Field contract breached before any SQL was issued.
    Validation(ClientValidationError),
    /// The connection could not be established, bootstrapped, or used.
    Connection(DbError),
    /// Unique, not-null or check constraint breached (e.g. duplicate email).
    Constraint { detail: String },
    /// Foreign-key target missing.
    ForeignKey { detail: String },
    /// Mutation aimed at a client id that does not exist.
    NotFound(ClientId),
    /// Operation attempted after `close`.
    Closed,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Connection(err) => write!(f, "{err}"),
            Self::Constraint { detail } => write!(f, "constraint violation: {detail}"),
            Self::ForeignKey { detail } => write!(f, "reference violation: {detail}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::Closed => write!(f, "contact store is closed"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Connection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Connection(err),
            RepoError::Constraint { detail } => Self::Constraint { detail },
            RepoError::ForeignKey { detail } => Self::ForeignKey { detail },
            RepoError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Contact store owning one live connection for its whole lifetime.
///
/// Construction ensures the schema exists (idempotently) before returning.
/// Dropping the store releases the connection as well, so `close` is for
/// callers that want the release to be explicit and checked.
pub struct ContactStore {
    conn: Option<Connection>,
}

impl ContactStore {
    /// Opens a file-backed store, creating the schema when absent.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Ok(Self { conn: Some(conn) })
    }

    /// Opens an in-memory store; the data lives as long as the store does.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn: Some(conn) })
    }

    /// Creates a client, plus one linked phone row when the input carries a
    /// number, in a single transaction.
    ///
    /// # Contract
    /// - Returns the generated stable client id.
    /// - Duplicate email fails with `StoreError::Constraint` and leaves the
    ///   prior client record unchanged.
    /// - On any failure no client row and no phone row is persisted.
    pub fn add_client(&mut self, new_client: &NewClient) -> StoreResult<ClientId> {
        let mut repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.add_client(new_client)?)
    }

    /// Adds one phone number to an existing client.
    ///
    /// # Contract
    /// - Returns the generated phone row id.
    /// - A missing client id fails with `StoreError::ForeignKey` and creates
    ///   no row.
    pub fn add_phone_number(
        &mut self,
        client_id: ClientId,
        phone_number: &str,
    ) -> StoreResult<PhoneNumberId> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.add_phone_number(client_id, phone_number)?)
    }

    /// Updates exactly the client fields named by the patch.
    ///
    /// # Contract
    /// - Absent patch fields are left untouched.
    /// - A missing client id fails with `StoreError::NotFound`, also for an
    ///   empty patch.
    pub fn update_info(&mut self, client_id: ClientId, patch: &ClientPatch) -> StoreResult<()> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.update_info(client_id, patch)?)
    }

    /// Deletes every phone row whose number equals the given value exactly.
    ///
    /// # Contract
    /// - Returns how many rows were removed; zero matches is a success.
    pub fn delete_phone_number(&mut self, phone_number: &str) -> StoreResult<usize> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.delete_phone_number(phone_number)?)
    }

    /// Deletes a client and all phone rows it owns in a single transaction.
    ///
    /// # Contract
    /// - A missing client id fails with `StoreError::NotFound`; no phone row
    ///   is removed in that case either.
    pub fn delete_client(&mut self, client_id: ClientId) -> StoreResult<()> {
        let mut repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.delete_client(client_id)?)
    }

    /// Finds the first client matching the filter, lowest id first.
    ///
    /// # Contract
    /// - A supplied `phone_number` resolves ownership via the phone table and
    ///   the remaining filter fields are ignored.
    /// - Otherwise supplied fields are matched by equality; absent fields do
    ///   not filter.
    /// - `Ok(None)` is the only not-found signal.
    pub fn find_client(&mut self, filter: &ClientFilter) -> StoreResult<Option<ClientId>> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.find_client(filter)?)
    }

    /// Finds every client matching the filter in ascending id order.
    pub fn find_clients(&mut self, filter: &ClientFilter) -> StoreResult<Vec<ClientId>> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.find_clients(filter)?)
    }

    /// Gets one client record by id. `Ok(None)` means no such client.
    pub fn get_client(&mut self, client_id: ClientId) -> StoreResult<Option<Client>> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.get_client(client_id)?)
    }

    /// Lists the phone rows owned by a client in ascending id order.
    pub fn phone_numbers(&mut self, client_id: ClientId) -> StoreResult<Vec<PhoneNumber>> {
        let repo = SqliteContactRepository::new(self.conn_mut()?);
        Ok(repo.list_phone_numbers(client_id)?)
    }

    /// Releases the connection.
    ///
    /// # Contract
    /// - Calling `close` twice, or any operation after `close`, fails with
    ///   `StoreError::Closed`.
    /// - When the engine refuses to close, the store stays open and usable.
    pub fn close(&mut self) -> StoreResult<()> {
        let conn = self.conn.take().ok_or(StoreError::Closed)?;
        match conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
            Err((conn, err)) => {
                self.conn = Some(conn);
                Err(StoreError::Connection(DbError::Sqlite(err)))
            }
        }
    }

    /// Returns whether the store still owns its connection.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn_mut(&mut self) -> StoreResult<&mut Connection> {
        self.conn.as_mut().ok_or(StoreError::Closed)
    }
}
