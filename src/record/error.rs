use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Errors produced while mutating values, encoding frames, and driving hooks.
#[derive(Debug, Error)]
pub enum RecordError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Element index was past the end of a value.
	#[error("element index {index} out of range (count={count})")]
	IndexOutOfRange {
		/// Requested element index.
		index: usize,
		/// Elements currently stored.
		count: usize,
	},
	/// No value carried the requested tag.
	#[error("tag not found: {tag}")]
	TagNotFound {
		/// Requested tag.
		tag: String,
	},
	/// Stored bytes cannot be reinterpreted as the requested kind.
	#[error("size mismatch converting to {kind}: {byte_len} bytes is not a multiple of width {width}")]
	SizeMismatch {
		/// Target kind label.
		kind: &'static str,
		/// Current stored byte length.
		byte_len: usize,
		/// Element width of the target kind.
		width: usize,
	},
	/// New element width differs from the width shared by the other elements.
	#[error("element width mismatch in {kind} value: elements are {width} bytes, got {got}")]
	ElementWidthMismatch {
		/// Kind label of the value.
		kind: &'static str,
		/// Width shared by the stored elements.
		width: usize,
		/// Width of the rejected element.
		got: usize,
	},
	/// Element cannot be converted to the requested kind.
	#[error("type mismatch: cannot convert {from} to {to}")]
	TypeMismatch {
		/// Source kind label.
		from: &'static str,
		/// Target kind label.
		to: &'static str,
	},
	/// Numeric conversion would overflow or the text was not a number.
	#[error("value {value:?} out of range for {kind}")]
	NumericRange {
		/// Rendered source value.
		value: String,
		/// Target kind label.
		kind: &'static str,
	},
	/// Bytes were not valid for the requested charset.
	#[error("invalid {charset} data at byte {at}")]
	Encoding {
		/// Charset label.
		charset: &'static str,
		/// Offset of the first offending byte or character.
		at: usize,
	},
	/// Charset label is not supported.
	#[error("unknown charset: {label}")]
	UnknownCharset {
		/// User-provided label.
		label: String,
	},
	/// Hook rejected its configuration.
	#[error("configuration of instance {instance} failed")]
	Configuration {
		/// Instance name.
		instance: String,
	},
	/// Configuration text could not be parsed.
	#[error("config syntax error on line {line}: {text}")]
	ConfigSyntax {
		/// One-based line number.
		line: usize,
		/// Offending line content.
		text: String,
	},
	/// Setting value did not match the expected format.
	#[error("setting {key}={value:?} is not a valid {expected}")]
	ConfigValue {
		/// Setting name.
		key: String,
		/// Raw setting value.
		value: String,
		/// Expected format description.
		expected: &'static str,
	},
	/// A hook was invoked before a successful `configure`.
	#[error("hook instance is not configured")]
	NotConfigured,
	/// `configure` was called on an instance that is already configured.
	#[error("instance {instance} is already configured")]
	AlreadyConfigured {
		/// Instance name.
		instance: String,
	},
	/// A hook returned failure; the instance is torn down.
	#[error("{hook} hook failed; instance torn down")]
	HookFailed {
		/// Hook name.
		hook: &'static str,
	},
	/// Topic is not a valid topic name.
	#[error("invalid topic {topic:?}: {reason}")]
	InvalidTopic {
		/// Rejected topic.
		topic: String,
		/// Validation failure.
		reason: &'static str,
	},
	/// Address could not be parsed.
	#[error("invalid address {addr:?}")]
	InvalidAddress {
		/// Rejected address text.
		addr: String,
	},
	/// Transport protocol label was not `udp`, `tcp`, or empty.
	#[error("invalid protocol {label:?} (expected udp, tcp or empty)")]
	InvalidProtocol {
		/// Rejected label.
		label: String,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Unknown leading stream magic.
	#[error("unsupported compression or not a message stream (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Stream version byte is not supported.
	#[error("unsupported stream version {version} (expected 1)")]
	UnsupportedWireVersion {
		/// Parsed version byte.
		version: u8,
	},
	/// Unknown kind, message type, protocol, or address family id.
	#[error("unknown {what} id {id}")]
	UnknownId {
		/// Which table the id belongs to.
		what: &'static str,
		/// Offending id.
		id: u8,
	},
	/// Nested arrays exceeded the decode depth limit.
	#[error("nested array depth exceeded (max={max_depth})")]
	WireDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Declared count exceeded the decode limit.
	#[error("too many {what}: count={count}, max={max}")]
	WireTooManyValues {
		/// What was being counted.
		what: &'static str,
		/// Declared count.
		count: usize,
		/// Maximum permitted.
		max: usize,
	},
	/// Encoded payload had bytes after the last decoded item.
	#[error("trailing bytes after {what}: leftover={leftover}")]
	WireTrailingBytes {
		/// Item that was decoded.
		what: &'static str,
		/// Unconsumed bytes.
		leftover: usize,
	},
	/// Field is too long for its length prefix.
	#[error("{what} too long to encode: {len} bytes")]
	WireTooLong {
		/// Field name.
		what: &'static str,
		/// Field length.
		len: usize,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Decompressed data did not start with the stream magic.
	#[error("decompressed data does not start with stream magic")]
	NotStreamAfterDecompress,
	/// CLI value specification was malformed.
	#[error("invalid value spec: {spec}")]
	InvalidValueSpec {
		/// User-provided spec text.
		spec: String,
	},
}
