//! API Module
//!
//! HTTP handlers and routing for the card service.
//!
//! # Endpoints
//! - `GET /` - Landing page
//! - `GET /api` - Route documentation
//! - `GET /api/perfil` - Profile card
//! - `GET /api/rank` - Leaderboard podium
//! - `GET /api/atm` - ATM receipt
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
mod pages;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
