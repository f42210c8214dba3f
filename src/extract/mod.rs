pub mod mapper;
pub mod sanitize;

pub use mapper::{ map_events, map_flights };
pub use sanitize::sanitize_completion;
