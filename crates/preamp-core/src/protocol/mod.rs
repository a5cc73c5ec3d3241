//! Protocol module containing message types and the JSON codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_command, decode_state, encode_command, encode_state, ProtocolError};
pub use messages::*;
