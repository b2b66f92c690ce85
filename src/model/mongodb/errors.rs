//! For some reason, the mongodb crate doesn't provide error code constants.
//! This module fills in the gaps.

use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};

pub const DUPLICATE_KEY: i32 = 11000;

/// Return true if the given error is a duplicate key write error.
pub fn is_duplicate_key_error(err: &DbError) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref e)) => e.code == DUPLICATE_KEY,
        // Inside a transaction the server can also report the violation as a
        // command error rather than a write error.
        ErrorKind::Command(ref e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}
