pub mod client;
pub mod cloudflare;
pub mod legacy;
pub mod models;

pub(crate) use client::read_success_body;
pub use client::{Cursor, DnsApiClient, Page};
pub use cloudflare::CloudflareClient;
pub use legacy::LegacyClient;
pub use models::{DnsRecord, Zone, RECORD_TYPE};
