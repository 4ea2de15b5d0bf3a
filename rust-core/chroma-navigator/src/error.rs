// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Navigation errors. Never surfaced to callers of `expand`; they become
//! error placeholder nodes.

use std::time::Duration;

use chroma_client::ChromaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("{what} timed out after {}s", .waited.as_secs_f32())]
    Timeout { what: &'static str, waited: Duration },

    #[error("{what} failed: {source}")]
    Source {
        what: &'static str,
        #[source]
        source: ChromaError,
    },
}
