//! End-to-end delivery tests: a real gateway, real brokers with their own
//! stores, failover over loopback HTTP.
