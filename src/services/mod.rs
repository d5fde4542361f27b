pub mod assistants;
pub mod backend;
pub mod notifications;
pub mod schedule;
pub mod session;
pub mod slots;
pub mod theme;
pub mod view;
