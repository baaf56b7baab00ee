// User use cases

pub mod create_username;
pub mod register_user;
pub mod search_users;

pub use create_username::create_username;
pub use register_user::register_user;
pub use search_users::search_users;
