//! # API Route Modules
//!
//! | Route                       | Module         |
//! |-----------------------------|----------------|
//! | `POST /api/checkCompliance` | [`compliance`] |
//! | `POST /api/askBylaw`        | [`bylaw`]      |
//! | `GET /api/health`           | [`health`]     |

pub mod bylaw;
pub mod compliance;
pub mod health;
