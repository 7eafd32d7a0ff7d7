use crate::token::{is_digit, is_hex_digit, is_letter, lookup_ident, Token, TokenKind};

// Byte-stream lexer: single-pass, single-byte lookahead, not restartable.
// `next_token` is the only operation a caller needs; everything else is
// private bookkeeping mirroring a classic read_char/peek_char scanner.
pub struct Lexer
{
	input: Vec<u8>,
	position: usize,
	read_position: usize,
	ch: u8,
	line: usize,
}

impl Lexer
{
	pub fn new(input: &str) -> Lexer
	{
		let mut lexer = Lexer
		{
			input: input.as_bytes().to_vec(),
			position: 0,
			read_position: 0,
			ch: 0,
			line: 1,
		};

		lexer.read_char();
		lexer
	}

	fn read_char(&mut self)
	{
		self.ch = if self.read_position >= self.input.len() { 0 } else { self.input[self.read_position] };
		self.position = self.read_position;
		self.read_position += 1;
	}

	fn peek_char(&self) -> u8
	{
		if self.read_position >= self.input.len() { 0 } else { self.input[self.read_position] }
	}

	fn skip_whitespace(&mut self)
	{
		while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r')
		{
			if self.ch == b'\n'
			{
				self.line += 1;
			}

			self.read_char();
		}
	}

	// Consumes a ';' comment up to (not including) the next tab, CR or LF.
	// A tab terminates a comment just like a newline does -- unusual, but
	// that is how CASL2 source in the wild is laid out (mnemonics start
	// after a tab column, so a trailing comment is cut off there too).
	fn skip_comment(&mut self)
	{
		while self.ch != 0 && self.ch != b'\t' && self.ch != b'\n' && self.ch != b'\r'
		{
			self.read_char();
		}
	}

	fn read_run(&mut self, pred: fn(u8) -> bool) -> String
	{
		let start = self.position;

		while pred(self.ch)
		{
			self.read_char();
		}

		String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
	}

	fn read_identifier(&mut self) -> (TokenKind, String)
	{
		let ident = self.read_run(|b| is_letter(b) || is_digit(b));

		if ident.bytes().any(|b| b.is_ascii_lowercase())
		{
			(TokenKind::Illegal, ident)
		}
		else
		{
			(lookup_ident(&ident), ident)
		}
	}

	// Reads a CASL string body starting at the opening quote (self.ch == '\'').
	// A doubled quote '' is an escaped literal quote and does not terminate;
	// a lone quote closes the string. Consumes the closing quote but does
	// not include it in the returned content. An immediate '' is simply an
	// empty body -- no special-casing needed since the loop just finds the
	// closing quote on its first look.
	fn read_casl_string_body(&mut self) -> String
	{
		let mut content = String::new();
		self.read_char(); // consume opening quote

		loop
		{
			if self.ch == 0
			{
				break;
			}

			if self.ch == b'\''
			{
				if self.peek_char() == b'\''
				{
					content.push('\'');
					self.read_char();
					self.read_char();
					continue;
				}
				else
				{
					self.read_char(); // consume closing quote
					break;
				}
			}

			content.push(self.ch as char);
			self.read_char();
		}

		content
	}

	pub fn next_token(&mut self) -> Token
	{
		loop
		{
			self.skip_whitespace();
			let line = self.line;

			if self.ch == b';'
			{
				self.skip_comment();
				continue;
			}

			return match self.ch
			{
				b',' =>
				{
					self.read_char();
					Token::new(TokenKind::Comma, ",", line)
				},

				b'-' if is_digit(self.peek_char()) =>
				{
					self.read_char();
					let digits = self.read_run(is_digit);
					Token::new(TokenKind::Int, format!("-{}", digits), line)
				},

				b'#' if is_hex_digit(self.peek_char()) =>
				{
					self.read_char();
					let digits = self.read_run(is_hex_digit);
					Token::new(TokenKind::Hex, format!("#{}", digits), line)
				},

				b'=' if is_digit(self.peek_char()) =>
				{
					self.read_char();
					let digits = self.read_run(is_digit);
					Token::new(TokenKind::EqInt, format!("={}", digits), line)
				},

				b'=' if self.peek_char() == b'#' =>
				{
					self.read_char(); // consume '='
					self.read_char(); // consume '#'

					if is_hex_digit(self.ch)
					{
						let digits = self.read_run(is_hex_digit);
						Token::new(TokenKind::EqHex, format!("=#{}", digits), line)
					}
					else
					{
						Token::new(TokenKind::Illegal, "=#", line)
					}
				},

				b'=' if self.peek_char() == b'\'' =>
				{
					self.read_char(); // consume '='
					let body = self.read_casl_string_body();
					Token::new(TokenKind::EqString, format!("='{}", body), line)
				},

				b'\'' =>
				{
					let body = self.read_casl_string_body();
					Token::new(TokenKind::String, format!("'{}", body), line)
				},

				0 => Token::new(TokenKind::Eof, "", line),

				b if is_letter(b) =>
				{
					let (kind, literal) = self.read_identifier();
					Token::new(kind, literal, line)
				},

				b if is_digit(b) =>
				{
					let digits = self.read_run(is_digit);
					Token::new(TokenKind::Int, digits, line)
				},

				b =>
				{
					self.read_char();
					Token::new(TokenKind::Illegal, (b as char).to_string(), line)
				},
			};
		}
	}
}
