//! Authentication and session management

pub mod claims;
pub mod guard;
pub mod jwt;
pub mod models;
pub mod session;
pub mod storage;

pub use claims::{Claims, ClaimsEvaluator};
pub use guard::{Navigator, RecordingNavigator, Route, RouteGuard};
pub use jwt::{decode_claims, try_decode, TokenError};
pub use models::{LoginRequest, LoginResponse, Role};
pub use session::{SessionStore, TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
