use std::error::Error;
use std::fmt;

// Diagnostics are non-fatal: they describe otherwise-correct code that the
// parser thinks is worth flagging (today, only the GR0-as-destination
// lint on ST). A diagnostic never halts a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic
{
	pub line: usize,
	pub message: String,
}

impl Diagnostic
{
	pub fn new(line: usize, message: impl Into<String>) -> Diagnostic
	{
		Diagnostic { line, message: message.into() }
	}
}

impl fmt::Display for Diagnostic
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		write!(f, "[Line {}] Warning: {}", self.line, self.message)
	}
}

// The closed set of ways a pass can fail. Each variant carries just
// enough context to render a message at the operand level; the
// containing pass stops as soon as one of these is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblerErrorKind
{
	UnexpectedToken { expected: String, found: String },
	UnresolvedMnemonic(String),
	InvalidNumericLiteral(String),
	MalformedHexLiteral(String),
	EmptyLiteralPool(String),
	DuplicateLabel(String),
	StartNotAtZero,
	StartMissingLabel,
	UnresolvedLabel(String),
}

impl fmt::Display for AssemblerErrorKind
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
			AssemblerErrorKind::UnexpectedToken { expected, found } =>
				write!(f, "expected {}, found {}", expected, found),
			AssemblerErrorKind::UnresolvedMnemonic(mnemonic) =>
				write!(f, "cannot resolve mnemonic \"{}\"", mnemonic),
			AssemblerErrorKind::InvalidNumericLiteral(literal) =>
				write!(f, "\"{}\" is not a valid numeric literal", literal),
			AssemblerErrorKind::MalformedHexLiteral(literal) =>
				write!(f, "\"{}\" is not a valid four-digit hex literal", literal),
			AssemblerErrorKind::EmptyLiteralPool(literal) =>
				write!(f, "literal \"{}\" cannot be resolved to a value", literal),
			AssemblerErrorKind::DuplicateLabel(label) =>
				write!(f, "duplicate definition of label \"{}\"", label),
			AssemblerErrorKind::StartNotAtZero =>
				write!(f, "START must be the first statement in the program"),
			AssemblerErrorKind::StartMissingLabel =>
				write!(f, "START requires a label"),
			AssemblerErrorKind::UnresolvedLabel(label) =>
				write!(f, "cannot resolve label \"{}\"", label),
		}
	}
}

// The one error type the whole pipeline speaks. Carries the 1-based line
// of the offending token, matching every diagnostic's line attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerError
{
	pub line: usize,
	pub kind: AssemblerErrorKind,
}

impl AssemblerError
{
	pub fn new(line: usize, kind: AssemblerErrorKind) -> AssemblerError
	{
		AssemblerError { line, kind }
	}
}

impl fmt::Display for AssemblerError
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
	{
		write!(f, "[Line {}] Error: {}", self.line, self.kind)
	}
}

impl Error for AssemblerError {}
