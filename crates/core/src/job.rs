// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity

crate::define_id! {
    /// Unique identifier for a scheduled job.
    ///
    /// Assigned when the job is added to the scheduler and stable for the
    /// lifetime of its executor. A reload assigns fresh IDs.
    pub struct JobId;
}
