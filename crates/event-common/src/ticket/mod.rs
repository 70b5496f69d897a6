//! Signed reservation tickets

mod codec;

pub use codec::{IssuedTicket, TicketClaims, TicketCodec, TicketError};
