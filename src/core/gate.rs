//! Daily Session Gate: one PIN entry per local calendar day.
//!
//! Keeps casual hands off a shared device; it is not an authentication
//! system. No lockout, no attempt counting.

use crate::core::clock::LocalClock;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Keypad input is capped at this many digits.
pub const MAX_PIN_LEN: usize = 4;

pub struct SessionGate<'a> {
    conn: &'a Connection,
    clock: LocalClock,
}

impl<'a> SessionGate<'a> {
    pub fn new(conn: &'a Connection, clock: LocalClock) -> Self {
        Self { conn, clock }
    }

    /// Date of the last successful login; unreadable storage counts as never.
    pub fn last_login(&self) -> Option<NaiveDate> {
        queries::load_last_login(self.conn).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "login marker unavailable, treating as never");
            None
        })
    }

    pub fn is_authorized_today(&self) -> bool {
        self.last_login() == Some(self.clock.today())
    }

    pub fn record_login_today(&self) -> AppResult<()> {
        queries::save_login_date(self.conn, &self.clock.today())?;
        Ok(())
    }

    /// Match the candidate against the secret and record today's login.
    pub fn login(&self, candidate: &str, secret: &str) -> AppResult<()> {
        if !check_pin(candidate, secret) {
            return Err(AppError::WrongPin);
        }
        self.record_login_today()
    }

    pub fn require_authorized(&self) -> AppResult<()> {
        if self.is_authorized_today() {
            Ok(())
        } else {
            Err(AppError::NotAuthorized)
        }
    }
}

/// Keypad input: 1..=4 ASCII digits.
pub fn is_keypad_pin(pin: &str) -> bool {
    !pin.is_empty() && pin.len() <= MAX_PIN_LEN && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Candidate must look like keypad input and equal the secret. Every byte is
/// visited regardless of where a mismatch occurs.
pub fn check_pin(candidate: &str, secret: &str) -> bool {
    if !is_keypad_pin(candidate) || candidate.len() != secret.len() {
        return false;
    }

    candidate
        .bytes()
        .zip(secret.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
