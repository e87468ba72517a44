//! Tenant resolution.
//!
//! Every public operation resolves exactly one company id from the
//! request context before touching the store. The context is threaded
//! explicitly through each call — there is no ambient "current
//! company" state — so tenant scoping is visible at every call site.

use uuid::Uuid;

use crate::error::{AgendoError, AgendoResult};
use crate::models::user::UserRole;

/// The authenticated actor behind a request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: UserRole,
}

/// Per-request context: an optional explicit company id and/or the
/// authenticated actor. Re-evaluated on every call, never cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    /// Explicit tenant requested on behalf of (admin tooling).
    pub company_id: Option<Uuid>,
    pub actor: Option<Actor>,
}

impl RequestContext {
    /// Context for a regular authenticated request.
    pub fn for_actor(actor: Actor) -> Self {
        Self {
            company_id: None,
            actor: Some(actor),
        }
    }

    /// Context acting on behalf of an explicit company.
    pub fn on_behalf_of(actor: Actor, company_id: Uuid) -> Self {
        Self {
            company_id: Some(company_id),
            actor: Some(actor),
        }
    }
}

/// Resolve the single tenant a request operates on.
///
/// An explicit company id wins when the actor is authorized for it
/// (admins may act on any company, everyone else only on their own);
/// otherwise the actor's own company is used. Fails with
/// [`AgendoError::TenantContext`] when no tenant can be determined,
/// in which case the operation must not reach the store.
pub fn resolve_tenant(ctx: &RequestContext) -> AgendoResult<Uuid> {
    match (ctx.company_id, &ctx.actor) {
        (Some(explicit), Some(actor)) => {
            if actor.role == UserRole::Admin || actor.company_id == explicit {
                Ok(explicit)
            } else {
                Err(AgendoError::TenantContext)
            }
        }
        (None, Some(actor)) => Ok(actor.company_id),
        // An explicit id without an authenticated actor cannot be
        // authorized, and with neither there is nothing to resolve.
        (_, None) => Err(AgendoError::TenantContext),
    }
}
