use crate::diagnostics::{AssemblerError, AssemblerErrorKind, Diagnostic};
use crate::lexer::Lexer;
use crate::record::{OpcodeRecord, UNRESOLVED_ADDR};
use crate::symbol::SymbolTable;
use crate::token::{Token, TokenKind};

// An address-position operand, before it has been folded into a record's
// `addr`/`addr_label` fields. Kept as its own type so the reg/mem
// encoders and the macro builders in `encode.rs` can share one notion of
// "what did the operand turn out to be" without repeating the
// immediate-vs-label-vs-literal match everywhere.
#[derive(Debug, Clone)]
pub(super) enum AddrOperand
{
	Immediate(u16),
	Label(String),
	Literal(String),
}

pub(super) fn resolve_addr_field(operand: AddrOperand) -> (u16, Option<String>)
{
	match operand
	{
		AddrOperand::Immediate(v) => (v, None),
		AddrOperand::Label(name) => (UNRESOLVED_ADDR, Some(name)),
		AddrOperand::Literal(name) => (UNRESOLVED_ADDR, Some(name)),
	}
}

// Drives a `Lexer` to `EOF`, emitting opcode records and accumulating
// diagnostics. One `Parser` is good for exactly one assembly run; all
// three passes described in the component design live on it so that the
// symbol table and pending-literal list stay in scope across them.
pub struct Parser
{
	lexer: Lexer,
	pub(super) cur_token: Token,
	pub(super) peek_token: Token,
	pub(super) symbols: SymbolTable,
	pub(super) pending_literals: Vec<Token>,
	pub(super) errors: Vec<AssemblerError>,
	pub(super) warnings: Vec<Diagnostic>,
	pub(super) address: u16,
}

impl Parser
{
	pub fn new(input: &str) -> Parser
	{
		let mut lexer = Lexer::new(input);
		let cur_token = lexer.next_token();
		let peek_token = lexer.next_token();

		Parser
		{
			lexer,
			cur_token,
			peek_token,
			symbols: SymbolTable::new(),
			pending_literals: vec![],
			errors: vec![],
			warnings: vec![],
			address: 0,
		}
	}

	pub(super) fn next_token(&mut self)
	{
		std::mem::swap(&mut self.cur_token, &mut self.peek_token);
		self.peek_token = self.lexer.next_token();
	}

	pub(super) fn expect_peek(&mut self, kind: TokenKind) -> Result<Token, ()>
	{
		if self.peek_token.kind == kind
		{
			self.next_token();
			Ok(self.cur_token.clone())
		}
		else
		{
			let line = self.peek_token.line;
			let found = self.peek_token.kind.to_string();
			let expected = kind.to_string();
			self.error(line, AssemblerErrorKind::UnexpectedToken { expected, found });
			Err(())
		}
	}

	pub(super) fn error(&mut self, line: usize, kind: AssemblerErrorKind)
	{
		let err = AssemblerError::new(line, kind);
		log::debug!("{}", err);
		self.errors.push(err);
	}

	pub(super) fn warn(&mut self, line: usize, message: impl Into<String>)
	{
		let diag = Diagnostic::new(line, message);
		log::warn!("{}", diag);
		self.warnings.push(diag);
	}

	pub fn errors(&self) -> &[AssemblerError]
	{
		&self.errors
	}

	pub fn warnings(&self) -> &[Diagnostic]
	{
		&self.warnings
	}

	// Parses a decimal integer at 16-bit width. Negative values wrap
	// modulo 2^16; anything outside the signed/unsigned 16-bit union is
	// out of range.
	pub(super) fn parse_int_literal(&mut self, text: &str, line: usize) -> Result<u16, ()>
	{
		match text.parse::<i64>()
		{
			Ok(v) if (-32768..=65535).contains(&v) => Ok(if v < 0 { (v + 65536) as u16 } else { v as u16 }),
			_ =>
			{
				self.error(line, AssemblerErrorKind::InvalidNumericLiteral(text.to_string()));
				Err(())
			},
		}
	}

	// Parses a `#HHHH` literal: exactly four hex digits after the `#`.
	pub(super) fn parse_hex_literal(&mut self, text: &str, line: usize) -> Result<u16, ()>
	{
		let malformed = !text.starts_with('#') || text.len() != 5;

		if malformed
		{
			self.error(line, AssemblerErrorKind::MalformedHexLiteral(text.to_string()));
			return Err(());
		}

		match u16::from_str_radix(&text[1..], 16)
		{
			Ok(v) => Ok(v),
			Err(_) =>
			{
				self.error(line, AssemblerErrorKind::MalformedHexLiteral(text.to_string()));
				Err(())
			},
		}
	}

	pub(super) fn is_addr_token_kind(kind: TokenKind) -> bool
	{
		matches!(kind, TokenKind::Int | TokenKind::Hex | TokenKind::Label | TokenKind::EqInt | TokenKind::EqHex)
	}

	// Moves onto the next address-shaped operand (INT, HEX, LABEL, or a
	// `=`-literal) and resolves it as far as it can be resolved right
	// now. A `LABEL` or a fresh literal defers to a later pass; an
	// already-seen literal just shares the pending entry.
	pub(super) fn advance_to_addr_operand(&mut self) -> Result<AddrOperand, ()>
	{
		if !Parser::is_addr_token_kind(self.peek_token.kind)
		{
			let line = self.peek_token.line;
			let found = self.peek_token.kind.to_string();
			self.next_token();
			self.error(line, AssemblerErrorKind::UnexpectedToken { expected: "an address operand".to_string(), found });
			return Err(());
		}

		self.next_token();
		let line = self.cur_token.line;

		match self.cur_token.kind
		{
			TokenKind::Int =>
			{
				let text = self.cur_token.literal.clone();
				Ok(AddrOperand::Immediate(self.parse_int_literal(&text, line)?))
			},

			TokenKind::Hex =>
			{
				let text = self.cur_token.literal.clone();
				Ok(AddrOperand::Immediate(self.parse_hex_literal(&text, line)?))
			},

			TokenKind::Label => Ok(AddrOperand::Label(self.cur_token.literal.clone())),

			TokenKind::EqInt | TokenKind::EqHex =>
			{
				let name = self.cur_token.literal.clone();

				if self.symbols.literal_define(&name, UNRESOLVED_ADDR)
				{
					self.pending_literals.push(self.cur_token.clone());
				}

				Ok(AddrOperand::Literal(name))
			},

			_ => unreachable!("is_addr_token_kind already filtered the token kind"),
		}
	}

	// An optional `, x` index register tail. Unlike the reference
	// source, this is validated uniformly on every call site: a comma
	// not followed by a register is always an error here, never a
	// silently-skipped pair of tokens.
	pub(super) fn parse_optional_index(&mut self) -> Result<u8, ()>
	{
		if self.peek_token.kind == TokenKind::Comma
		{
			self.next_token();
			let tok = self.expect_peek(TokenKind::Register)?;
			Ok(crate::token::lookup_register(&tok.literal).expect("Register token always has a register literal"))
		}
		else
		{
			Ok(0)
		}
	}

	pub fn parse_program(&mut self) -> Result<Vec<OpcodeRecord>, ()>
	{
		log::debug!("parse_program: starting");
		let mut records = vec![];

		while self.cur_token.kind != TokenKind::Eof
		{
			let stmt_records = self.parse_statement()?;

			for record in &stmt_records
			{
				log::trace!("record at 0x{:04X}: {:?}", self.address, record.code);
				self.address += record.length;
			}

			records.extend(stmt_records);
		}

		log::debug!("parse_program: {} records, {} errors", records.len(), self.errors.len());

		if self.errors.is_empty() { Ok(records) } else { Err(()) }
	}

	fn parse_statement(&mut self) -> Result<Vec<OpcodeRecord>, ()>
	{
		let mut label_symbol = None;

		if self.cur_token.kind == TokenKind::Label
		{
			let name = self.cur_token.literal.clone();
			let line = self.cur_token.line;
			let (symbol, inserted) = self.symbols.define(&name, self.address);

			if !inserted
			{
				self.error(line, AssemblerErrorKind::DuplicateLabel(name));
				return Err(());
			}

			label_symbol = Some(symbol);
			self.next_token();
		}

		let mnemonic_token = self.cur_token.clone();
		let mut records = self.dispatch_mnemonic(&mnemonic_token, &label_symbol)?;

		if let Some(first) = records.first_mut()
		{
			first.label = label_symbol;
		}

		self.next_token();
		Ok(records)
	}

	pub fn literal_to_memory(&mut self, mut records: Vec<OpcodeRecord>) -> Vec<OpcodeRecord>
	{
		log::debug!("literal_to_memory: {} pending literals", self.pending_literals.len());

		for literal_token in self.pending_literals.clone()
		{
			let value = match self.parse_literal_value(&literal_token)
			{
				Ok(v) => v,
				Err(()) => continue,
			};

			let addr = self.address;
			self.symbols.literal_address_set(&literal_token.literal, addr);
			records.push(OpcodeRecord::new(literal_token).with_code(0, 0).with_addr(value).with_length(1));
			self.address += 1;
		}

		records
	}

	fn parse_literal_value(&mut self, token: &Token) -> Result<u16, ()>
	{
		match token.kind
		{
			TokenKind::EqInt => self.parse_int_literal(&token.literal[1..], token.line),
			TokenKind::EqHex =>
			{
				let hex_text = format!("#{}", &token.literal[2..]);
				self.parse_hex_literal(&hex_text, token.line)
			},
			_ => unreachable!("only EqInt/EqHex tokens are ever queued as pending literals"),
		}
	}

	pub fn label_to_address(&mut self, mut records: Vec<OpcodeRecord>) -> Result<Vec<OpcodeRecord>, ()>
	{
		log::debug!("label_to_address: starting");

		for record in records.iter_mut()
		{
			if let Some(name) = record.addr_label.clone()
			{
				match self.symbols.resolve(&name)
				{
					Some(symbol) => record.addr = symbol.address,
					None =>
					{
						let line = record.token.line;
						self.error(line, AssemblerErrorKind::UnresolvedLabel(name));
						return Err(());
					},
				}
			}
		}

		Ok(records)
	}
}
