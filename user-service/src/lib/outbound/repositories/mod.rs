pub mod memory;
pub mod one_time_token;
pub mod user;

pub use memory::InMemoryOneTimeTokenRepository;
pub use memory::InMemoryUserRepository;
pub use one_time_token::PostgresOneTimeTokenRepository;
pub use user::PostgresUserRepository;
