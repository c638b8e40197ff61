// ============================================================================
// MODELS - Структуры, общие с бекендом
// ============================================================================

pub mod auth;
pub mod post;
pub mod user;

pub use auth::*;
pub use post::*;
pub use user::*;
