//! Routing decision engine
//!
//! Restriction detection diverts compliance-sensitive orders to the keying
//! specialist; everything else goes to the least-loaded order entry
//! generalist. Each decision carries a human-readable trail of how it was
//! reached.

pub mod balancer;
pub mod decision;
pub mod detector;
pub mod engine;
pub mod error;
pub mod flags;
pub mod normalize;
pub mod updater;

pub use balancer::*;
pub use decision::*;
pub use detector::*;
pub use engine::*;
pub use error::*;
pub use flags::*;
pub use normalize::*;
pub use updater::*;
