//! Locating the one record a run may update.
//!
//! Zones and records are both found by walking a paginated listing from the
//! first cursor until an item matches. The walk stops at the first match, at
//! a page without continuation, or with an error when the provider hands back
//! a cursor that does not move forward.

use std::future::Future;

use log::debug;

use crate::api::{Cursor, DnsApiClient, DnsRecord, Page, Zone, RECORD_TYPE};
use crate::error::{DdnsError, Result};

/// `domain` for the apex, `subdomain.domain` otherwise.
pub fn target_name(domain: &str, subdomain: &str) -> String {
    if subdomain.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", subdomain, domain)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub zone: Zone,
    pub record: DnsRecord,
}

pub async fn resolve(client: &dyn DnsApiClient, domain: &str, subdomain: &str) -> Result<Resolved> {
    let zone = find_zone(client, domain).await?;
    let record = find_record(client, &zone, domain, subdomain).await?;
    Ok(Resolved { zone, record })
}

pub async fn find_zone(client: &dyn DnsApiClient, domain: &str) -> Result<Zone> {
    find_first(
        client.first_page(),
        |cursor| client.list_zones(cursor),
        |zone: &Zone| zone.name == domain,
    )
    .await?
    .ok_or_else(|| DdnsError::ZoneNotFound(domain.to_string()))
}

pub async fn find_record(
    client: &dyn DnsApiClient,
    zone: &Zone,
    domain: &str,
    subdomain: &str,
) -> Result<DnsRecord> {
    let target = target_name(domain, subdomain);
    let accept_bare = client.accepts_bare_subdomain();

    let found = find_first(
        client.first_page(),
        |cursor| client.list_records(zone, cursor),
        |record: &DnsRecord| record_matches(record, &target, subdomain, accept_bare),
    )
    .await?;

    found.ok_or(DdnsError::RecordNotFound(target))
}

/// Exact, case-sensitive comparison only. With `accept_bare`, a record named
/// just `subdomain` also matches; that can select a record outside the
/// intended name if the provider ever returns one.
pub fn record_matches(record: &DnsRecord, target: &str, subdomain: &str, accept_bare: bool) -> bool {
    if record.r#type != RECORD_TYPE {
        return false;
    }
    record.name == target || (accept_bare && !subdomain.is_empty() && record.name == subdomain)
}

async fn find_first<T, F, Fut, P>(start: Cursor, mut fetch: F, mut accept: P) -> Result<Option<T>>
where
    F: FnMut(Cursor) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: FnMut(&T) -> bool,
{
    let mut cursor = Some(start);

    while let Some(current) = cursor {
        debug!("fetching {:?}", current);
        let page = fetch(current).await?;

        if let Some(found) = page.items.into_iter().find(|item| accept(item)) {
            return Ok(Some(found));
        }

        cursor = match page.next {
            Some(next) if !next.advances_past(&current) => {
                return Err(DdnsError::Provider(format!(
                    "pagination did not advance: {:?} followed {:?}",
                    next, current
                )));
            }
            next => next,
        };
    }

    Ok(None)
}
