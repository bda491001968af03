// ABOUTME: Transaction management with RAII guards and retry on SQLite lock contention
// ABOUTME: Rolls back uncommitted work on drop and backs off exponentially on busy errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Transaction management with RAII guards and retry patterns
//!
//! Every multi-statement unit of work (one onboarding step, one workout
//! save) runs inside a [`TransactionGuard`] wrapped by [`retry_transaction`].
//! Transactions open with `BEGIN IMMEDIATE` so the write lock is held from
//! the first statement.
//!
//! ```text
//! retry_transaction(|| async move {
//!     let mut guard = begin_immediate(pool).await?;
//!     UserManager::apply_profile_patch(guard.executor()?, user_id, patch).await?;
//!     BodyStateManager::merge_goal_measurements(guard.executor()?, user_id, goals).await?;
//!     guard.commit().await
//! }, TRANSACTION_MAX_RETRIES).await
//! ```

use std::future::Future;
use std::time::Duration;

use sqlx::{Database, Sqlite, SqlitePool, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::errors::{AppError, AppResult, ErrorCode};

/// Retry a transaction that failed on lock contention
///
/// Only `SQLite` busy/locked errors and timeouts are retried. After failed
/// attempt `n` the backoff is `10ms * 2^n`. Validation, not-found, and
/// constraint errors are returned on the first failure.
///
/// # Errors
///
/// Returns the last error once `max_retries` attempts have failed, or the
/// first non-retryable error
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_retries: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_retryable(&e) {
                    debug!(attempts, error = %e, "Transaction failed with non-retryable error");
                    return Err(e);
                }
                if attempts >= max_retries {
                    error!(
                        attempts,
                        max_retries,
                        error = %e,
                        "Transaction failed after max retries"
                    );
                    return Err(e);
                }

                let backoff_ms = 10 * (1_u64 << attempts);
                warn!(
                    attempt = attempts,
                    max_retries,
                    backoff_ms,
                    error = %e,
                    "Transaction hit lock contention, retrying after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Only persistence failures are candidates for retry
fn is_retryable(error: &AppError) -> bool {
    error.code == ErrorCode::DatabaseError && is_retryable_error(&error.message)
}

/// Check if a database error message describes a transient failure
fn is_retryable_error(error_msg: &str) -> bool {
    let error_lower = error_msg.to_lowercase();

    if error_lower.contains("constraint") {
        return false;
    }

    error_lower.contains("database is locked")
        || error_lower.contains("locked")
        || error_lower.contains("busy")
        || error_lower.contains("timeout")
        || error_lower.contains("timed out")
}

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// `sqlx` rolls back a dropped `Transaction`; the guard adds an explicit
/// consuming `commit()` and logs when work is discarded.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap an open transaction
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("TransactionGuard committed successfully");
        Ok(())
    }

    /// Connection for executing queries inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("TransactionGuard dropped without commit - rolling back");
        }
    }
}

/// Open a write transaction on a pooled connection
///
/// `BEGIN IMMEDIATE` waits on the connection's busy timeout for the write
/// lock instead of failing once a read has been made.
///
/// # Errors
///
/// Returns a database error if no connection is available or the lock
/// cannot be taken
pub async fn begin_immediate(pool: &SqlitePool) -> AppResult<TransactionGuard<'static, Sqlite>> {
    let transaction = pool
        .begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
    Ok(TransactionGuard::new(transaction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable_error("database is locked"));
        assert!(is_retryable_error("SQLITE_BUSY: database table is locked"));
        assert!(!is_retryable_error(
            "UNIQUE constraint failed: progress_entries.user_id"
        ));
        assert!(!is_retryable_error("no such table: users"));
        assert!(!is_retryable(&AppError::invalid_input("database is locked")));
    }

    #[tokio::test]
    async fn test_retries_lock_errors_then_succeeds() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_transaction(
            || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::database("database is locked"))
                } else {
                    Ok(7)
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_validation_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: AppResult<()> = retry_transaction(
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::missing_field("date"))
            },
            3,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
