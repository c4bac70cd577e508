//! Wire codecs used by the resolver probes.

pub mod dns;
