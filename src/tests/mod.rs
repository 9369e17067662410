mod legacy;

use crate::api::{DnsRecord, Zone};
use serde_json::Map;

pub(crate) fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        r#type: "A".to_string(),
        name: name.to_string(),
        content: content.to_string(),
        ttl: Some(1),
        proxied: Some(false),
        extra: Map::new(),
    }
}

pub(crate) fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
    }
}
