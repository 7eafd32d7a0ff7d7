use std::collections::HashMap;

// A symbol is a flat, case-sensitive name bound to a 16-bit address.
// `index` records insertion order; it has no behavioral effect today but
// is kept because diagnostics and tooling built on top of the table may
// want a stable enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol
{
	pub label: String,
	pub index: usize,
	pub address: u16,
}

// One flat namespace shared by user labels and literal labels (`=N`,
// `=#HHHH`). User labels are defined once via `define`; literal labels
// self-deduplicate via `literal_define` so that repeated uses of the
// same literal text share one pool entry.
#[derive(Debug, Default)]
pub struct SymbolTable
{
	store: HashMap<String, Symbol>,
	next_index: usize,
}

impl SymbolTable
{
	pub fn new() -> SymbolTable
	{
		SymbolTable::default()
	}

	// Inserts a user label if absent. Returns the symbol and whether the
	// insertion was new; a `false` return signals a redefinition attempt
	// that the caller (the parser) must treat as a fatal error.
	pub fn define(&mut self, name: &str, address: u16) -> (Symbol, bool)
	{
		if let Some(existing) = self.store.get(name)
		{
			return (existing.clone(), false);
		}

		let symbol = Symbol
		{
			label: name.to_string(),
			index: self.next_index,
			address,
		};

		self.next_index += 1;
		self.store.insert(name.to_string(), symbol.clone());
		(symbol, true)
	}

	// Idempotent insertion for literal labels (`=N`, `=#HHHH`). Returns
	// true only when the literal is genuinely new and must be queued for
	// the literal pool pass.
	pub fn literal_define(&mut self, name: &str, address: u16) -> bool
	{
		if self.store.contains_key(name)
		{
			return false;
		}

		let symbol = Symbol
		{
			label: name.to_string(),
			index: self.next_index,
			address,
		};

		self.next_index += 1;
		self.store.insert(name.to_string(), symbol);
		true
	}

	// Back-patches an existing literal's address once it has been placed
	// in the literal pool. A no-op if the name is absent.
	pub fn literal_address_set(&mut self, name: &str, address: u16)
	{
		if let Some(symbol) = self.store.get_mut(name)
		{
			symbol.address = address;
		}
	}

	pub fn resolve(&self, name: &str) -> Option<&Symbol>
	{
		self.store.get(name)
	}
}
