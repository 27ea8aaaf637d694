mod array;
mod bytes;
mod channel;
mod charset;
mod compression;
mod element;
mod error;
mod fixp;
mod kind;
mod message;
mod topic;
mod value;
/// Frame format for arrays, messages, and streams.
pub mod wire;

/// Tag-indexed value collection and its iterator.
pub use array::{Array, ArrayIter};
/// Host hand-off channel.
pub use channel::{Channel, ChannelReceiver, DEFAULT_CHANNEL_CAPACITY, SendFailure, channel};
/// Supported text encodings.
pub use charset::Charset;
/// Stream compression detection.
pub use compression::{Compression, ZSTD_MAGIC, decode_bytes, encode_bytes};
/// Decoded element type and conversions.
pub use element::Element;
/// Error and result aliases.
pub use error::{RecordError, Result};
/// Fixed-point number type.
pub use fixp::{FIXP_FRACTION_BITS, Fixp};
/// Value kinds and element widths.
pub use kind::ValueKind;
/// Message envelope and metadata types.
pub use message::{Message, MessageClass, MessageType, Protocol};
/// Topic validation and filter matching.
pub use topic::{MAX_TOPIC_LEN, topic_matches, validate_topic_name};
/// Tagged multi-element value.
pub use value::Value;
