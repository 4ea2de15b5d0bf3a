// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Bounded waits.
//!
//! Races a future against a timer. If the timer wins, the future is dropped
//! and its result, should it ever arrive, is discarded. Nothing is sent to
//! the remote side to cancel the request.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::error::NavigatorError;

/// Await `fut` for at most `limit`.
///
/// `what` names the operation in the timeout error.
pub async fn bounded<F, T>(what: &'static str, limit: Duration, fut: F) -> Result<T, NavigatorError>
where
    F: Future<Output = T>,
{
    match timeout(limit, fut).await {
        Ok(value) => Ok(value),
        Err(_) => {
            warn!(what, limit_ms = limit.as_millis() as u64, "bounded wait expired");
            Err(NavigatorError::Timeout {
                what,
                waited: limit,
            })
        }
    }
}
