// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared outcome/reason-code vocabulary (`spec.md` §7: "All operations
//! return structured outcomes with `{success, ...}` and, on failure, a
//! reason code and human message. Nothing is raised across component
//! boundaries.").

use serde::{Deserialize, Serialize};

/// A machine-readable reason code for a failed operation, independent of
/// the human-facing message. Consumers match on this, not on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Unreachable,
    BadStatus,
    DecodeError,
    ProbeFailed,
    Timeout,
    ValidationFailed,
    PreconditionFailed,
    CircuitBreakerOpen,
    CooldownActive,
    DiskFull,
    PermissionDenied,
    ResourceUnavailable,
    Cancelled,
}

crate::simple_display! {
    ReasonCode {
        Unreachable => "unreachable",
        BadStatus => "bad_status",
        DecodeError => "decode_error",
        ProbeFailed => "probe_failed",
        Timeout => "timeout",
        ValidationFailed => "validation_failed",
        PreconditionFailed => "precondition_failed",
        CircuitBreakerOpen => "circuit_breaker_open",
        CooldownActive => "cooldown_active",
        DiskFull => "disk_full",
        PermissionDenied => "permission_denied",
        ResourceUnavailable => "resource_unavailable",
        Cancelled => "cancelled",
    }
}

/// A structured, non-throwing outcome for an operation that must not
/// abort unrelated work on failure (`spec.md` §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub reason: Option<ReasonCode>,
    pub message: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self { success: true, reason: None, message: None }
    }

    pub fn failed(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self { success: false, reason: Some(reason), message: Some(message.into()) }
    }
}
