// strider-core: Types, config, and errors for procedural foot placement.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FootConfig, GaitConfig, SwingProfile, TurnTaking};
pub use error::{ConfigError, StriderError};
pub use types::{BodyPose, Corner, Side};
