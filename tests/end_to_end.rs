use casl2asm::assemble;

fn codes(output: &casl2asm::AssembleOutput) -> Vec<u16>
{
	output.records.iter().map(|r| r.code).collect()
}

#[test]
fn minimal_program()
{
	let output = assemble("MAIN\tSTART\n\tRET\n\tEND\n").unwrap();
	assert_eq!(codes(&output), vec![0x0000, 0x8100, 0x0000]);
	assert_eq!(output.records.iter().map(|r| r.addr).collect::<Vec<_>>(), vec![0, 1, 2]);
	assert!(output.warnings.is_empty());
}

#[test]
fn ld_immediate_via_label()
{
	let output = assemble("MAIN\tSTART\n\tLD\tGR1,X\nX\tDC\t5\n\tEND\n").unwrap();
	assert_eq!(output.records[0].code, 0x0000);
	assert_eq!(output.records[1].code, 0x1010);
	assert_eq!(output.records[1].op, 0x10);
	assert_eq!(output.records[2].addr, 5);
	assert_eq!(output.records[3].code, 0x0000);

	// Word-address continuity: START(1) + LD(2) places X at word 3.
	assert_eq!(output.records[1].addr, 3);
}

#[test]
fn literal_pool_single_entry_shared_by_both_uses()
{
	let output = assemble("MAIN\tSTART\n\tLD\tGR1,=5\n\tLD\tGR2,=5\n\tRET\n\tEND\n").unwrap();

	let literal_record = output.records.last().unwrap();
	assert_eq!(literal_record.addr, 5);
	assert_eq!(output.records[1].addr, literal_record.addr + 2);
	assert_eq!(output.records[2].addr, literal_record.addr + 2);
}

#[test]
fn duplicate_label_reports_the_second_definitions_line()
{
	let err = assemble("FOO\tSTART\n\tRET\nFOO\tDC\t1\n\tEND\n").unwrap_err();
	assert_eq!(err.len(), 1);
	assert_eq!(err[0].line, 3);
	assert!(matches!(err[0].kind, casl2asm::AssemblerErrorKind::DuplicateLabel(ref name) if name == "FOO"));
}

#[test]
fn unresolved_label_fails_only_at_label_resolution()
{
	let err = assemble("MAIN\tSTART\n\tLD\tGR1,UNDEF\n\tEND\n").unwrap_err();
	assert_eq!(err.len(), 1);
	assert!(matches!(err[0].kind, casl2asm::AssemblerErrorKind::UnresolvedLabel(ref name) if name == "UNDEF"));
}

#[test]
fn rpush_expands_to_seven_records()
{
	let output = assemble("MAIN\tSTART\n\tRPUSH\n\tEND\n").unwrap();
	let rpush = &output.records[1..8];
	let expected: Vec<u16> = (1..=7u16).map(|r| 0x7000 | r).collect();
	assert_eq!(rpush.iter().map(|r| r.code).collect::<Vec<_>>(), expected);
}

#[test]
fn hex_literal_round_trips_across_the_full_range()
{
	let low = assemble("MAIN\tSTART\n\tDC\t#0000\n\tEND\n").unwrap();
	let high = assemble("MAIN\tSTART\n\tDC\t#FFFF\n\tEND\n").unwrap();
	assert_eq!(low.records[1].addr, 0x0000);
	assert_eq!(high.records[1].addr, 0xFFFF);

	let malformed = assemble("MAIN\tSTART\n\tDC\t#FFFF1\n\tEND\n");
	assert!(malformed.is_err());
}

#[test]
fn negative_int_encodes_as_twos_complement()
{
	let output = assemble("MAIN\tSTART\n\tDC\t-1\n\tEND\n").unwrap();
	assert_eq!(output.records[1].addr, 0xFFFF);
}

#[test]
fn comment_terminated_by_a_tab_is_legal()
{
	let output = assemble("MAIN\tSTART\t; trailing remark\n\tRET\n\tEND\n").unwrap();
	assert_eq!(codes(&output), vec![0x0000, 0x8100, 0x0000]);
}

#[test]
fn escaped_quote_string_encodes_a_single_record()
{
	let output = assemble("MAIN\tSTART\n\tDC\t''''\n\tEND\n").unwrap();
	assert_eq!(output.records[1].addr, 0x27);
	assert_eq!(output.records[1].length, 1);
}

#[test]
fn gr0_destination_on_st_warns_but_does_not_change_the_record_sequence()
{
	let with_gr0 = assemble("MAIN\tSTART\nX\tDC\t1\n\tST\tGR0,X\n\tEND\n").unwrap();
	let without_gr0 = assemble("MAIN\tSTART\nX\tDC\t1\n\tST\tGR1,X\n\tEND\n").unwrap();

	assert_eq!(codes(&with_gr0).len(), codes(&without_gr0).len());
	assert_eq!(with_gr0.warnings.len(), 1);
	assert!(without_gr0.warnings.is_empty());
}
