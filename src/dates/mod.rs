//! Calendar date ranges driving a crawl
//!
//! A crawl covers one page per day. [`DateRange`] yields those days lazily
//! and validates its bounds before anything touches the network.

mod range;

pub use range::DateRange;
