//! Retailer adapters: one bespoke extraction pipeline per URL family.
//!
//! Every adapter follows the same shape — fetch through the transport
//! variant the retailer tolerates, reject bot-challenge bodies, then run
//! ordered per-field fallback chains over structured data and the DOM.
//! A missing title fails the whole attempt; any other missing field is
//! reported as `None`.

pub(crate) mod ajio;
pub(crate) mod amazon;
pub(crate) mod croma;
pub(crate) mod flipkart;
pub(crate) mod meesho;
pub(crate) mod myntra;
pub(crate) mod nykaa;
