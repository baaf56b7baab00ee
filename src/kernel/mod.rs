// Infrastructure shared by all domains

pub mod pubsub;

pub use pubsub::PubSub;
