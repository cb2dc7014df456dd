//! Adaptive delivery layer.
//!
//! Serves byte-budgeted progressive JPEG responses scaled to the
//! requesting device's display class.
//!
//! # Architecture
//!
//! The delivery service sits between the caller (an HTTP boundary, not
//! part of this crate) and the catalog:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Caller (HTTP boundary, etc.)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            DeliveryService              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │DeliveryCache │  │ classify +      │  │
//! │  │ (truncated   │  │ prefix truncate │  │
//! │  │  responses)  │  │                 │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └──────────┬─────────────────┬────────────┘
//!            │                 │
//!            ▼                 ▼
//! ┌──────────────────┐ ┌──────────────────┐
//! │     Catalog      │ │   ImageSource    │
//! └──────────────────┘ └──────────────────┘
//! ```
//!
//! # Truncation
//!
//! Responses are plain byte prefixes of the stored progressive JPEG
//! (`floor(len * scale)` bytes). No attempt is made to cut at a JPEG
//! scan boundary, so strict decoders may reject heavily truncated
//! output; progressive viewers render the scans that fit.

mod cache;
mod selector;
mod service;

pub use cache::{DeliveryCache, DeliveryCacheKey, DEFAULT_DELIVERY_CACHE_CAPACITY};
pub use selector::truncate_for_scale;
pub use service::{DeliveryRequest, DeliveryResponse, DeliveryService};
