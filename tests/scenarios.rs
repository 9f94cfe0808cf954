//! End-to-end compilation scenarios exercising the full pipeline from
//! source text to a linked byte stream.

use vasm::diagnostics::Reporter;
use vasm::driver::compile_source;
use vasm::options::CompileOptions;

fn compile(source: &str, format: &str) -> Vec<u8> {
    let mut options = CompileOptions::default();
    options.format = Some(format.to_string());
    options.format_set_by_cli = true;
    options.stylist_enabled = false;
    let reporter = Reporter::new("in.lrasm", source);
    compile_source(source, &mut options, &reporter).expect("compile should succeed")
}

#[test]
fn openlud_single_echo() {
    let bytes = compile("_start: echo 'A'\n", "openlud");
    assert_eq!(bytes, vec![40, 65, 0, 12]);
}

#[test]
fn nexfuse_single_echo() {
    let bytes = compile("_start: echo 'A'\n", "nexfuse");
    assert_eq!(bytes, vec![40, 65, 0, 22]);
}

#[test]
fn nexfuse_two_instructions_in_sequence() {
    let bytes = compile("_start:\n echo '\\n'\n echo 'B'\n", "nexfuse");
    assert_eq!(bytes, vec![40, 10, 0, 40, 66, 0, 22]);
}

#[test]
fn nexfuse_mov_then_each_folds_into_entry() {
    let bytes = compile("_start: mov R1, 0x0a\n each R1\n", "nexfuse");
    assert_eq!(bytes, vec![41, 1, 10, 0, 42, 1, 0, 22]);
}

#[test]
fn procedure_folding_inlines_callee_bytes_contiguously() {
    // P-FOLD: a's bytes appear as a contiguous subsequence of _start's.
    let bytes = compile("a: echo 'X'\n_start: a\n", "nexfuse");
    assert_eq!(bytes, vec![40, b'X', 0, 22]);
}

#[test]
fn peephole_drops_procedures_unreachable_from_entry() {
    // P-OPT, spec.md scenario 6 (grounded on real opcodes, not the
    // placeholder "one" instruction used only in prose).
    let mut options = CompileOptions::default();
    options.format = Some("nexfuse".to_string());
    options.format_set_by_cli = true;
    options.stylist_enabled = false;
    options.optimization_level = 1;
    let source = "a: echo 'A'\nb: echo 'B'\n_start: a\n";
    let reporter = Reporter::new("in.lrasm", source);
    let bytes = compile_source(source, &mut options, &reporter).unwrap();
    // b's 'B' byte must not appear anywhere in the linked output.
    assert!(!bytes.contains(&b'B'));
    assert_eq!(bytes, vec![40, b'A', 0, 22]);
}

#[test]
fn register_number_too_large_is_rejected_before_missing_instruction_check() {
    // P-REG / spec.md scenario 7, using "mov" (a real opcode) rather than
    // the prose placeholder "one": register bound is checked before
    // instruction dispatch, so this fails with RegisterNumberTooLarge
    // even though "mov" itself is a defined OpenLUD instruction.
    let mut options = CompileOptions::default();
    options.format = Some("openlud".to_string());
    options.format_set_by_cli = true;
    options.stylist_enabled = false;
    let source = "_start: mov R200, 1\n";
    let reporter = Reporter::new("in.lrasm", source);
    let err = compile_source(source, &mut options, &reporter).unwrap_err();
    assert!(matches!(err, vasm::error::CompileError::Codegen(vasm::vendor::CodegenError::RegisterNumberTooLarge { .. })));
}

#[test]
fn missing_entry_is_fatal_for_a_compiling_invocation() {
    let mut options = CompileOptions::default();
    options.format = Some("nexfuse".to_string());
    options.format_set_by_cli = true;
    options.stylist_enabled = false;
    let source = "a: echo 'A'\n";
    let reporter = Reporter::new("in.lrasm", source);
    // Default entry "_start" is never defined in this source.
    let err = compile_source(source, &mut options, &reporter).unwrap_err();
    assert!(matches!(
        err,
        vasm::error::CompileError::Link(vasm::linker::LinkError::MissingStart { .. })
    ));
}

#[test]
fn unknown_instruction_is_rejected() {
    let mut options = CompileOptions::default();
    options.format = Some("nexfuse".to_string());
    options.format_set_by_cli = true;
    options.stylist_enabled = false;
    let source = "_start: frobnicate R1\n";
    let reporter = Reporter::new("in.lrasm", source);
    let err = compile_source(source, &mut options, &reporter).unwrap_err();
    assert!(matches!(
        err,
        vasm::error::CompileError::Codegen(vasm::vendor::CodegenError::InstructionDoesntExist { .. })
    ));
}

#[test]
fn strict_stylist_aborts_before_codegen_runs() {
    let mut options = CompileOptions::default();
    options.format = Some("nexfuse".to_string());
    options.format_set_by_cli = true;
    options.strict_stylist = true;
    let source = "_start: mov R1,2\n"; // comma with no following space
    let reporter = Reporter::new("in.lrasm", source);
    let err = compile_source(source, &mut options, &reporter).unwrap_err();
    assert!(matches!(err, vasm::error::CompileError::StylistAborted));
}

#[test]
fn compat_directive_selects_format_for_cli_free_invocations() {
    let bytes = compile_with_default_options("[compat mercury]\n_start: echo 'A'\n");
    // MercuryPIC's end byte is the documented 0xAF terminator.
    assert_eq!(*bytes.last().unwrap(), 0xaf);
}

fn compile_with_default_options(source: &str) -> Vec<u8> {
    let mut options = CompileOptions::default();
    options.stylist_enabled = false;
    let reporter = Reporter::new("in.lrasm", source);
    compile_source(source, &mut options, &reporter).expect("compile should succeed")
}
