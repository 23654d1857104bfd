pub mod seatgeek;
pub mod ticketmaster;
pub mod traits;
pub mod types;

pub use seatgeek::SeatGeekSource;
pub use ticketmaster::TicketmasterSource;
pub use traits::EventSource;
