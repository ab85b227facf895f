//! Upstream provider clients and feed decoders.

pub mod alert_feed;
pub mod go_transit;
pub mod grt;
pub mod gtfs_static;
