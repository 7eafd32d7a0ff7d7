use std::fmt;

// The closed set of token kinds the lexer can produce.
// Mirrors the keyword table below one-for-one, plus the handful of
// structural kinds (ILLEGAL, EOF, REGISTER, LABEL, ...) that aren't keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind
{
	Illegal,
	Eof,

	Register,
	Label,
	Int,
	Hex,
	EqInt,
	EqHex,
	String,
	EqString,
	Comma,

	Start,
	End,
	Ds,
	Dc,
	In,
	Out,
	Rpush,
	Rpop,
	Ld,
	St,
	Lad,
	Adda,
	Addl,
	Suba,
	Subl,
	And,
	Or,
	Xor,
	Cpa,
	Cpl,
	Sla,
	Sra,
	Sll,
	Srl,
	Jpl,
	Jmi,
	Jnz,
	Jze,
	Jov,
	Jump,
	Push,
	Pop,
	Call,
	Ret,
	Svc,
	Nop,
}

impl fmt::Display for TokenKind
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		write!(f, "{:?}", self)
	}
}

// A token is ephemeral: the lexer hands it to the parser, which either
// discards it immediately or embeds a copy in an opcode record for later
// diagnostics. Records outlive the parse call that produced them and are
// mutated by independent later passes, so the literal is owned rather
// than borrowed from the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token
{
	pub kind: TokenKind,
	pub literal: String,
	pub line: usize,
}

impl Token
{
	pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize) -> Token
	{
		Token
		{
			kind,
			literal: literal.into(),
			line,
		}
	}
}

impl fmt::Display for Token
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		write!(f, "{}", self.literal)
	}
}

// Registers are always spelled GR0..GR7; recognized separately from the
// general keyword table since they carry a numeric payload.
pub fn lookup_register(ident: &str) -> Option<u8>
{
	match ident
	{
		"GR0" => Some(0),
		"GR1" => Some(1),
		"GR2" => Some(2),
		"GR3" => Some(3),
		"GR4" => Some(4),
		"GR5" => Some(5),
		"GR6" => Some(6),
		"GR7" => Some(7),
		_ => None,
	}
}

// Keyword table: an all-uppercase identifier that isn't a register name
// is looked up here. A miss means it's a user label.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind>
{
	use TokenKind::*;

	Some(match ident
	{
		"START" => Start,
		"END" => End,
		"DS" => Ds,
		"DC" => Dc,
		"IN" => In,
		"OUT" => Out,
		"RPUSH" => Rpush,
		"RPOP" => Rpop,
		"LD" => Ld,
		"ST" => St,
		"LAD" => Lad,
		"ADDA" => Adda,
		"ADDL" => Addl,
		"SUBA" => Suba,
		"SUBL" => Subl,
		"AND" => And,
		"OR" => Or,
		"XOR" => Xor,
		"CPA" => Cpa,
		"CPL" => Cpl,
		"SLA" => Sla,
		"SRA" => Sra,
		"SLL" => Sll,
		"SRL" => Srl,
		"JPL" => Jpl,
		"JMI" => Jmi,
		"JNZ" => Jnz,
		"JZE" => Jze,
		"JOV" => Jov,
		"JUMP" => Jump,
		"PUSH" => Push,
		"POP" => Pop,
		"CALL" => Call,
		"RET" => Ret,
		"SVC" => Svc,
		"NOP" => Nop,
		_ => return None,
	})
}

// An identifier is either a register, a keyword, or a user label,
// resolved in that priority order once the lexer has confirmed it is
// all-uppercase letters-or-digits.
pub fn lookup_ident(ident: &str) -> TokenKind
{
	if lookup_register(ident).is_some()
	{
		TokenKind::Register
	}
	else if let Some(kind) = lookup_keyword(ident)
	{
		kind
	}
	else
	{
		TokenKind::Label
	}
}

// The CASL character table: printable ASCII 0x20..=0x7E maps one-to-one
// to its own byte value. Nothing else is printable.
pub fn is_casl_printable(byte: u8) -> bool
{
	(0x20..=0x7E).contains(&byte)
}

pub fn is_letter(byte: u8) -> bool
{
	byte.is_ascii_alphabetic()
}

pub fn is_digit(byte: u8) -> bool
{
	byte.is_ascii_digit()
}

pub fn is_hex_digit(byte: u8) -> bool
{
	byte.is_ascii_hexdigit()
}
