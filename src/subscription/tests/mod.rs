mod events;
mod session;
