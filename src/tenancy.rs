//! # Tenant Scoping
//!
//! Every core operation receives a mandatory [`TenantContext`] identifying
//! the calling political office and the caller's role. Read paths return only
//! rows belonging to the context tenant unless the caller holds the
//! cross-tenant `super_admin` role; cross-tenant probes surface as not-found,
//! never as a permission detail.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    /// Regular office staff: work tasks, decide approvals
    Staff,
    /// Office administrator: additionally manages categories, templates and
    /// soft deletion
    Admin,
    /// Cross-tenant operator; bypasses tenant scoping on reads
    SuperAdmin,
}

impl fmt::Display for TenantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl std::str::FromStr for TenantRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(format!("Invalid tenant role: {s}")),
        }
    }
}

/// Caller identity threaded through every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_uuid: Uuid,
    pub role: TenantRole,
}

impl TenantContext {
    pub fn new(tenant_uuid: Uuid, role: TenantRole) -> Self {
        Self { tenant_uuid, role }
    }

    /// Whether reads may span tenants.
    pub fn cross_tenant(&self) -> bool {
        self.role == TenantRole::SuperAdmin
    }

    /// Whether a row owned by `row_tenant` is visible to this caller.
    pub fn can_view(&self, row_tenant: Uuid) -> bool {
        self.cross_tenant() || self.tenant_uuid == row_tenant
    }

    /// Gate for admin-only operations (category/template management, soft
    /// deletion).
    pub fn require_admin(&self) -> Result<()> {
        match self.role {
            TenantRole::Admin | TenantRole::SuperAdmin => Ok(()),
            TenantRole::Staff => Err(CoreError::PermissionDenied(
                "operation requires the admin role".to_string(),
            )),
        }
    }
}
