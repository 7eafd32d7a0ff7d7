use crate::symbol::Symbol;
use crate::token::Token;

// Written into `addr` for any record whose `addr_label` is pending
// resolution, so an unresolved field is visibly distinct from a real
// zero value. Kept separate from the deferred-resolution marker
// (`addr_label`), which is its own explicit `Option` rather than folded
// into this sentinel.
pub const UNRESOLVED_ADDR: u16 = 0xFFFF;

// The central unit of output: one encoded instruction word (plus an
// optional second word). Appended by the parser in source order,
// extended by macro expansion and the literal pool pass, and mutated
// only by label resolution (and then only the `addr` field of records
// carrying a deferred label).
#[derive(Debug, Clone)]
pub struct OpcodeRecord
{
	pub code: u16,
	pub op: u8,
	pub addr: u16,
	pub addr_label: Option<String>,
	pub length: u16,
	pub label: Option<Symbol>,
	pub token: Token,
}

impl OpcodeRecord
{
	pub fn new(token: Token) -> OpcodeRecord
	{
		OpcodeRecord
		{
			code: 0,
			op: 0,
			addr: 0,
			addr_label: None,
			length: 1,
			label: None,
			token,
		}
	}

	pub fn with_code(mut self, op: u8, code: u16) -> OpcodeRecord
	{
		self.op = op;
		self.code = code;
		self
	}

	pub fn with_addr(mut self, addr: u16) -> OpcodeRecord
	{
		self.addr = addr;
		self
	}

	pub fn with_addr_label(mut self, name: impl Into<String>) -> OpcodeRecord
	{
		self.addr_label = Some(name.into());
		self
	}

	pub fn with_length(mut self, length: u16) -> OpcodeRecord
	{
		self.length = length;
		self
	}

	pub fn with_label(mut self, label: Symbol) -> OpcodeRecord
	{
		self.label = Some(label);
		self
	}
}
