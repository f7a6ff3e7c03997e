use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

type Cause = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug)]
pub enum ErrorKind {
    Io(PathBuf),
    InvalidLocation(String),
    Direction(String),
    Transfer(String),
    Usage,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    cause: Option<Cause>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn invalid_location<S>(location: S) -> Error
    where
        S: Into<String>,
    {
        Error {
            kind: ErrorKind::InvalidLocation(location.into()),
            cause: None,
        }
    }

    pub fn direction<S>(message: S) -> Error
    where
        S: Into<String>,
    {
        Error {
            kind: ErrorKind::Direction(message.into()),
            cause: None,
        }
    }

    pub fn usage<E>(err: E) -> Error
    where
        E: Into<Cause>,
    {
        Error {
            kind: ErrorKind::Usage,
            cause: Some(err.into()),
        }
    }

    pub fn io<T, E>(path: T) -> impl FnOnce(E) -> Error
    where
        T: AsRef<Path>,
        E: Into<Cause>,
    {
        let path = path.as_ref().to_path_buf();
        |err: E| Error {
            kind: ErrorKind::Io(path),
            cause: Some(err.into()),
        }
    }

    pub fn transfer<T, E>(message: T) -> impl FnOnce(E) -> Error
    where
        T: Into<String>,
        E: Into<Cause>,
    {
        |err: E| Error {
            kind: ErrorKind::Transfer(message.into()),
            cause: Some(err.into()),
        }
    }

    pub fn transfer_err<T, R, E>(message: T, err: E) -> Result<R, Error>
    where
        T: Into<String>,
        E: Into<Cause>,
    {
        Err(Error {
            kind: ErrorKind::Transfer(message.into()),
            cause: Some(err.into()),
        })
    }

    fn describe(&self) -> &str {
        match &self.kind {
            ErrorKind::Io(_) => "I/O error",
            ErrorKind::InvalidLocation(_) => "Invalid storage path",
            ErrorKind::Direction(_) => "Unsupported copy direction",
            ErrorKind::Transfer(_) => "Transfer failed",
            ErrorKind::Usage => "Invalid arguments",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match &self.kind {
            ErrorKind::Io(path) => write!(f, "{} at {:?}", self.describe(), path.as_os_str())?,
            ErrorKind::InvalidLocation(location) => write!(
                f,
                "{} '{}', must be in the form s3:bucket:/path/to/object",
                self.describe(),
                location
            )?,
            ErrorKind::Direction(message) => write!(f, "{}; {}", self.describe(), message)?,
            ErrorKind::Transfer(message) => write!(f, "{}; {}", self.describe(), message)?,
            ErrorKind::Usage => write!(f, "{}", self.describe())?,
        };

        let mut cause = self.source();
        while let Some(err) = cause {
            // SDK errors may carry a multi-line body, keep the report on one line
            let text = err.to_string();
            write!(f, "; {}", text.split_whitespace().collect::<Vec<_>>().join(" "))?;
            cause = err.source()
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(ref err) = self.cause {
            return Some(err.as_ref());
        }
        None
    }
}

pub trait ResultExt<T, E> {
    fn io_err<P>(self, path: P) -> Result<T, Error>
    where
        P: AsRef<Path>;

    fn transfer_err<S>(self, message: S) -> Result<T, Error>
    where
        S: Into<String>;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: Into<Cause>,
{
    fn io_err<P>(self, path: P) -> Result<T, Error>
    where
        P: AsRef<Path>,
    {
        self.map_err(Error::io(path))
    }

    fn transfer_err<S>(self, message: S) -> Result<T, Error>
    where
        S: Into<String>,
    {
        self.map_err(Error::transfer(message))
    }
}
