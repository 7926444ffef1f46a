//! Explicit connection context

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// What [`Database::open_with`] does when a connection is already open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionIfOpen {
    /// Keep the open connection when it is for the same file, fail otherwise
    #[default]
    SkipIfSameFile,
    /// Close the open connection and open the requested file
    CloseBeforeOpen,
    /// Keep whatever connection is open
    IgnoreOpenRequest,
    /// Always fail
    Fail,
}

/// Expand `${NAME}` and `%NAME%` environment variable references.
///
/// Unknown variables are left in place.
pub fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(['$', '%']) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (name, consumed) = if let Some(braced) = tail.strip_prefix("${") {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 3),
                None => ("", 0),
            }
        } else if let Some(pct) = tail.strip_prefix('%') {
            match pct.find('%') {
                Some(end) => (&pct[..end], end + 2),
                None => ("", 0),
            }
        } else {
            ("", 0)
        };

        match std::env::var(name) {
            Ok(value) if !name.is_empty() => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            _ => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// A connection with an explicit open/close lifecycle.
///
/// At most one connection is open per context. Opening again while open is
/// governed by [`ActionIfOpen`]; using the context while closed yields
/// [`Error::NotOpen`].
#[derive(Debug, Default)]
pub struct Database {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// A closed context
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path`, which must exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut db = Self::new();
        db.open_with(path, ActionIfOpen::Fail)?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        let path = conn.path().filter(|p| !p.is_empty()).map(PathBuf::from);
        Self {
            conn: Some(conn),
            path,
        }
    }

    pub fn open_with(&mut self, path: impl AsRef<Path>, action: ActionIfOpen) -> Result<()> {
        let requested = PathBuf::from(expand_env_vars(&path.as_ref().to_string_lossy()));

        if self.conn.is_some() {
            let same_file = self.path.as_deref() == Some(requested.as_path());
            match action {
                ActionIfOpen::IgnoreOpenRequest => return Ok(()),
                ActionIfOpen::SkipIfSameFile if same_file => return Ok(()),
                ActionIfOpen::CloseBeforeOpen => self.close()?,
                ActionIfOpen::SkipIfSameFile | ActionIfOpen::Fail => {
                    return Err(Error::AlreadyOpen {
                        open: self.path.clone().unwrap_or_default(),
                        requested,
                    });
                }
            }
        }

        if !requested.exists() {
            return Err(Error::MissingDatabase(requested));
        }

        debug!("Opening database {:?}", requested);
        self.conn = Some(Connection::open(&requested)?);
        self.path = Some(requested);
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Err(Error::NotOpen);
        };
        debug!("Closing database {:?}", self.path);
        self.path = None;
        conn.close().map_err(|(_, e)| Error::Sqlite(e))
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Path of the open database file, if it has one
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    /// Execute one or more statements that return no rows
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }

    /// Attach another database file under `alias`
    pub fn attach(&self, file: impl AsRef<Path>, alias: &str) -> Result<()> {
        let file = expand_env_vars(&file.as_ref().to_string_lossy());
        self.connection()?
            .execute("ATTACH DATABASE ?1 AS ?2", [file.as_str(), alias])?;
        info!("Attached {} as {}", file, alias);
        Ok(())
    }

    pub fn detach(&self, alias: &str) -> Result<()> {
        self.connection()?.execute("DETACH DATABASE ?1", [alias])?;
        Ok(())
    }
}
