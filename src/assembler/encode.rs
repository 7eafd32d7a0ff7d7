use crate::assembler::parser::{resolve_addr_field, AddrOperand, Parser};
use crate::diagnostics::AssemblerErrorKind;
use crate::record::OpcodeRecord;
use crate::symbol::Symbol;
use crate::token::{lookup_register, Token, TokenKind};

// Per-operand-shape helpers and the mnemonic dispatch table. Grounded in
// the encoding table: the high byte of `code` is always the opcode, the
// next nibble is r1 (destination/source), and the low nibble is r2 in
// register-register form or the index register x in memory form.
impl Parser
{
	pub(super) fn dispatch_mnemonic(&mut self, mnemonic: &Token, label_symbol: &Option<Symbol>) -> Result<Vec<OpcodeRecord>, ()>
	{
		use TokenKind::*;

		match mnemonic.kind
		{
			Start => self.encode_start(mnemonic, label_symbol),
			End => self.encode_no_operand(mnemonic, 0x00),
			Ret => self.encode_no_operand(mnemonic, 0x81),

			Dc => self.encode_dc(mnemonic),
			Ds => self.encode_ds(mnemonic),

			Ld => self.encode_reg_reg_or_mem(mnemonic, 0x14, 0x10),
			Adda => self.encode_reg_reg_or_mem(mnemonic, 0x24, 0x20),
			Suba => self.encode_reg_reg_or_mem(mnemonic, 0x25, 0x21),
			Addl => self.encode_reg_reg_or_mem(mnemonic, 0x26, 0x22),
			Subl => self.encode_reg_reg_or_mem(mnemonic, 0x27, 0x23),
			And => self.encode_reg_reg_or_mem(mnemonic, 0x34, 0x30),
			Or => self.encode_reg_reg_or_mem(mnemonic, 0x35, 0x31),
			Xor => self.encode_reg_reg_or_mem(mnemonic, 0x36, 0x32),
			Cpa => self.encode_reg_reg_or_mem(mnemonic, 0x44, 0x40),
			Cpl => self.encode_reg_reg_or_mem(mnemonic, 0x45, 0x41),

			St => self.encode_reg_mem_only(mnemonic, 0x11, true),
			Lad => self.encode_reg_mem_only(mnemonic, 0x12, false),
			Sla => self.encode_reg_mem_only(mnemonic, 0x50, false),
			Sra => self.encode_reg_mem_only(mnemonic, 0x51, false),
			Sll => self.encode_reg_mem_only(mnemonic, 0x52, false),
			Srl => self.encode_reg_mem_only(mnemonic, 0x53, false),

			Jmi => self.encode_addr_with_index(mnemonic, 0x61),
			Jnz => self.encode_addr_with_index(mnemonic, 0x62),
			Jze => self.encode_addr_with_index(mnemonic, 0x63),
			Jump => self.encode_addr_with_index(mnemonic, 0x64),
			Jpl => self.encode_addr_with_index(mnemonic, 0x65),
			Jov => self.encode_addr_with_index(mnemonic, 0x66),
			Push => self.encode_addr_with_index(mnemonic, 0x70),
			Call => self.encode_addr_with_index(mnemonic, 0x80),
			Svc => self.encode_addr_with_index(mnemonic, 0xF0),

			Pop => self.encode_pop(mnemonic),

			In => self.encode_in_out(mnemonic, 0x703A),
			Out => self.encode_in_out(mnemonic, 0x02AB),
			Rpush => Ok((1..=7).map(|r| self.synthetic_push(mnemonic, 0, r)).collect()),
			Rpop => Ok((1..=7).rev().map(|r| self.synthetic_pop(mnemonic, r)).collect()),

			_ =>
			{
				self.error(mnemonic.line, AssemblerErrorKind::UnresolvedMnemonic(mnemonic.literal.clone()));
				Err(())
			},
		}
	}

	fn encode_start(&mut self, mnemonic: &Token, label_symbol: &Option<Symbol>) -> Result<Vec<OpcodeRecord>, ()>
	{
		if self.address != 0
		{
			self.error(mnemonic.line, AssemblerErrorKind::StartNotAtZero);
			return Err(());
		}

		if label_symbol.is_none()
		{
			self.error(mnemonic.line, AssemblerErrorKind::StartMissingLabel);
			return Err(());
		}

		self.encode_no_operand(mnemonic, 0x00)
	}

	fn encode_no_operand(&mut self, mnemonic: &Token, op: u8) -> Result<Vec<OpcodeRecord>, ()>
	{
		let code = (op as u16) << 8;
		Ok(vec![OpcodeRecord::new(mnemonic.clone()).with_code(op, code).with_length(1)])
	}

	fn register_operand(&mut self) -> Result<u8, ()>
	{
		let tok = self.expect_peek(TokenKind::Register)?;
		Ok(lookup_register(&tok.literal).expect("Register token always has a register literal"))
	}

	// `r1, r2` or `r1, addr [, x]`, the two shapes shared by LD, ADDA,
	// SUBA, ADDL, SUBL, AND, OR, XOR, CPA, CPL.
	fn encode_reg_reg_or_mem(&mut self, mnemonic: &Token, reg_reg_op: u8, mem_op: u8) -> Result<Vec<OpcodeRecord>, ()>
	{
		let r1 = self.register_operand()?;
		self.expect_peek(TokenKind::Comma)?;

		if self.peek_token.kind == TokenKind::Register
		{
			let r2 = self.register_operand()?;
			let code = ((reg_reg_op as u16) << 8) | ((r1 as u16) << 4) | (r2 as u16);
			Ok(vec![OpcodeRecord::new(mnemonic.clone()).with_code(reg_reg_op, code).with_length(1)])
		}
		else
		{
			let operand = self.advance_to_addr_operand()?;
			let x = self.parse_optional_index()?;
			let (addr, addr_label) = resolve_addr_field(operand);
			let code = ((mem_op as u16) << 8) | ((r1 as u16) << 4) | (x as u16);
			Ok(vec![self.finish_mem_record(mnemonic, mem_op, code, addr, addr_label)])
		}
	}

	// `r, addr [, x]` only -- ST, LAD, SLA, SRA, SLL, SRL.
	fn encode_reg_mem_only(&mut self, mnemonic: &Token, mem_op: u8, warn_gr0: bool) -> Result<Vec<OpcodeRecord>, ()>
	{
		let r1_line = self.peek_token.line;
		let r1 = self.register_operand()?;

		if warn_gr0 && r1 == 0
		{
			self.warn(r1_line, format!("{} uses GR0 as its destination register", mnemonic.literal));
		}

		self.expect_peek(TokenKind::Comma)?;
		let operand = self.advance_to_addr_operand()?;
		let x = self.parse_optional_index()?;
		let (addr, addr_label) = resolve_addr_field(operand);
		let code = ((mem_op as u16) << 8) | ((r1 as u16) << 4) | (x as u16);
		Ok(vec![self.finish_mem_record(mnemonic, mem_op, code, addr, addr_label)])
	}

	// `addr [, x]` only, r1 slot always 0 -- the jump family, PUSH, CALL, SVC.
	fn encode_addr_with_index(&mut self, mnemonic: &Token, op: u8) -> Result<Vec<OpcodeRecord>, ()>
	{
		let operand = self.advance_to_addr_operand()?;
		let x = self.parse_optional_index()?;
		let (addr, addr_label) = resolve_addr_field(operand);
		let code = ((op as u16) << 8) | (x as u16);
		Ok(vec![self.finish_mem_record(mnemonic, op, code, addr, addr_label)])
	}

	fn finish_mem_record(&self, mnemonic: &Token, op: u8, code: u16, addr: u16, addr_label: Option<String>) -> OpcodeRecord
	{
		let mut record = OpcodeRecord::new(mnemonic.clone()).with_code(op, code).with_addr(addr).with_length(2);

		if let Some(name) = addr_label
		{
			record = record.with_addr_label(name);
		}

		record
	}

	fn encode_pop(&mut self, mnemonic: &Token) -> Result<Vec<OpcodeRecord>, ()>
	{
		let r = self.register_operand()?;
		Ok(vec![self.synthetic_pop(mnemonic, r)])
	}

	// `DC` is a comma-separated list of INT | HEX | STRING data. Each
	// INT/HEX datum is one word; a STRING expands one record per
	// character, per the CASL character table.
	fn encode_dc(&mut self, mnemonic: &Token) -> Result<Vec<OpcodeRecord>, ()>
	{
		let mut records = vec![];
		self.parse_dc_datum(mnemonic, &mut records)?;

		while self.peek_token.kind == TokenKind::Comma
		{
			self.next_token();
			self.parse_dc_datum(mnemonic, &mut records)?;
		}

		Ok(records)
	}

	fn parse_dc_datum(&mut self, mnemonic: &Token, records: &mut Vec<OpcodeRecord>) -> Result<(), ()>
	{
		if !matches!(self.peek_token.kind, TokenKind::Int | TokenKind::Hex | TokenKind::String)
		{
			let line = self.peek_token.line;
			let found = self.peek_token.kind.to_string();
			self.next_token();
			self.error(line, AssemblerErrorKind::UnexpectedToken { expected: "a DC datum (INT, HEX, or STRING)".to_string(), found });
			return Err(());
		}

		self.next_token();
		let line = self.cur_token.line;

		match self.cur_token.kind
		{
			TokenKind::Int =>
			{
				let text = self.cur_token.literal.clone();
				let value = self.parse_int_literal(&text, line)?;
				records.push(OpcodeRecord::new(mnemonic.clone()).with_code(0, 0).with_addr(value).with_length(1));
			},

			TokenKind::Hex =>
			{
				let text = self.cur_token.literal.clone();
				let value = self.parse_hex_literal(&text, line)?;
				records.push(OpcodeRecord::new(mnemonic.clone()).with_code(0, 0).with_addr(value).with_length(1));
			},

			TokenKind::String =>
			{
				// Literal is stored as a leading quote plus body (no trailing quote).
				let body: String = self.cur_token.literal.chars().skip(1).collect();

				if body.is_empty()
				{
					self.error(line, AssemblerErrorKind::EmptyLiteralPool(self.cur_token.literal.clone()));
					return Err(());
				}

				for ch in body.chars()
				{
					records.push(OpcodeRecord::new(mnemonic.clone()).with_code(0, 0).with_addr(ch as u16).with_length(1));
				}
			},

			_ => unreachable!("already validated the peeked kind above"),
		}

		Ok(())
	}

	fn encode_ds(&mut self, mnemonic: &Token) -> Result<Vec<OpcodeRecord>, ()>
	{
		let tok = self.expect_peek(TokenKind::Int)?;
		let line = tok.line;
		let n = self.parse_int_literal(&tok.literal, line)?;
		Ok(vec![OpcodeRecord::new(mnemonic.clone()).with_code(0, 0).with_addr(0).with_length(n)])
	}

	// `IN buf, len` / `OUT buf, len`: a register-save bracket around an
	// SVC with a fixed sub-function code, expanded to seven records.
	fn encode_in_out(&mut self, mnemonic: &Token, svc_sub_function: u16) -> Result<Vec<OpcodeRecord>, ()>
	{
		let buf = self.advance_to_addr_operand()?;
		self.expect_peek(TokenKind::Comma)?;
		let len = self.advance_to_addr_operand()?;

		Ok(vec![
			self.synthetic_push(mnemonic, 0, 1),
			self.synthetic_push(mnemonic, 0, 2),
			self.synthetic_lad(mnemonic, 1, buf),
			self.synthetic_lad(mnemonic, 2, len),
			self.synthetic_svc(mnemonic, svc_sub_function),
			self.synthetic_pop(mnemonic, 2),
			self.synthetic_pop(mnemonic, 1),
		])
	}

	fn synthetic_push(&self, mnemonic: &Token, disp: u16, index_reg: u8) -> OpcodeRecord
	{
		let code = (0x70u16 << 8) | (index_reg as u16);
		OpcodeRecord::new(mnemonic.clone()).with_code(0x70, code).with_addr(disp).with_length(2)
	}

	fn synthetic_pop(&self, mnemonic: &Token, reg: u8) -> OpcodeRecord
	{
		let code = (0x71u16 << 8) | ((reg as u16) << 4);
		OpcodeRecord::new(mnemonic.clone()).with_code(0x71, code).with_length(1)
	}

	fn synthetic_lad(&self, mnemonic: &Token, dest_reg: u8, operand: AddrOperand) -> OpcodeRecord
	{
		let (addr, addr_label) = resolve_addr_field(operand);
		let code = (0x12u16 << 8) | ((dest_reg as u16) << 4);
		self.finish_mem_record(mnemonic, 0x12, code, addr, addr_label)
	}

	fn synthetic_svc(&self, mnemonic: &Token, sub_function: u16) -> OpcodeRecord
	{
		let code = 0xF0u16 << 8;
		OpcodeRecord::new(mnemonic.clone()).with_code(0xF0, code).with_addr(sub_function).with_length(2)
	}
}
