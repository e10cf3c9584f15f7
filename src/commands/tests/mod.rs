mod builder;
mod pubsub;
