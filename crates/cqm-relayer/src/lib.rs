//! CQM relayer — submits EIP-712 signed pay-back authorizations on-chain.
//!
//! Browsers POST `{from, amount, deadline, v, r, s}` to `/backend.php`. The
//! relayer checks that every field is present, answers immediately, then
//! calls the token's `metaTransfer` with its own key and pays the gas.
//!
//! # Modules
//!
//! - [`routes`] — HTTP endpoints (relay, health, metrics)
//! - [`relayer`] — [`MetaTransferRelayer`](relayer::MetaTransferRelayer), the submission path
//! - [`state`] — Shared [`AppState`](state::AppState)
//! - [`config`] — Environment configuration, loaded once at startup
//! - [`metrics`] — Prometheus metrics for relay requests and submissions

pub mod config;
pub mod cors;
pub mod metrics;
pub mod relayer;
pub mod routes;
pub mod state;
