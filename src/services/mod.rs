pub mod auth;
pub mod cloud;
pub mod token;

pub use auth::AuthService;
pub use cloud::CloudService;
pub use token::TokenService;
