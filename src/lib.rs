pub mod constants;
pub mod handlers;
pub mod models;
pub mod services;
pub mod skill;
pub mod utils;

pub use models::{RequestEnvelope, SessionAttributes, SkillResponse};
pub use skill::Skill;
pub use utils::error::{Result, SkillError};
