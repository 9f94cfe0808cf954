//! Orchestrates the full pipeline from source text to a byte stream
//! (spec.md §4.9).

use crate::diagnostics::Reporter;
use crate::error::CompileError;
use crate::hybrid;
use crate::lexer::Lexer;
use crate::linker::{self, LinkContext};
use crate::options::{CompileOptions, Format};
use crate::parser::Parser;
use crate::preprocess;
use crate::stylist;
use crate::vendor::targets;
use crate::vendor::Vendor;
use crate::width::ByteWidth;

/// Read `path`, run the full pipeline, and write the resulting bytes to
/// `options.output`. Installs a `Reporter` over the source text so every
/// stage's errors print with a source excerpt before propagating.
pub fn run(path: &str, options: &mut CompileOptions) -> Result<(), CompileError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_string(),
        source,
    })?;
    let reporter = Reporter::new(path, &source);

    let bytes = match compile_source(&source, options, &reporter) {
        Ok(bytes) => bytes,
        Err(err) => {
            reporter.error(&err);
            return Err(err);
        }
    };

    std::fs::write(&options.output, &bytes).map_err(|source| CompileError::Io {
        path: options.output.clone(),
        source,
    })?;
    log::info!("driver: wrote {} bytes to \"{}\"", bytes.len(), options.output);
    Ok(())
}

/// The pipeline itself, target-format dispatch aside, kept separate from
/// `run` so tests can exercise it without touching the filesystem.
pub fn compile_source(source: &str, options: &mut CompileOptions, reporter: &Reporter) -> Result<Vec<u8>, CompileError> {
    if options.stylist_enabled {
        let diagnostics = stylist::run(source);
        for diag in &diagnostics {
            reporter.stylist(diag);
        }
        if options.strict_stylist && !diagnostics.is_empty() {
            return Err(CompileError::StylistAborted);
        }
    }

    // `format` may still be unset here if only a `[compat ...]` directive
    // will choose it; max_number_size falls back to the widest bound so
    // the lexer doesn't reject anything before preprocessing runs.
    let max_number_size = options.format.as_deref().and_then(Format::parse).map(width_bound).unwrap_or(i64::MAX);
    let tokens = Lexer::new(source, max_number_size, !options.allow_big_numbers).tokenize()?;
    let root = Parser::new(tokens).parse()?;
    preprocess::run(&root, options)?;

    let format = resolve_format(options)?;

    match format {
        Format::OpenLud => compile_with_vendor(targets::openlud(), targets::openlud_link_context(), &root, options),
        Format::NexFuse => compile_with_vendor(targets::nexfuse(), targets::nexfuse_link_context(), &root, options),
        Format::Mercury => compile_with_vendor(targets::mercury(), targets::mercury_link_context(), &root, options),
        Format::Siax => compile_with_vendor(targets::siax(), targets::siax_link_context(), &root, options),
        Format::Jade => compile_with_vendor(targets::jade(), targets::jade_link_context(), &root, options),
        Format::SolarisVm => compile_with_vendor(targets::solarisvm(), targets::solarisvm_link_context(), &root, options),
    }
}

fn width_bound(format: Format) -> i64 {
    match format {
        Format::OpenLud => i8::MAX as i64,
        Format::NexFuse | Format::Mercury => u8::MAX as i64,
        Format::Siax | Format::Jade => i32::MAX as i64,
        Format::SolarisVm => u32::MAX as i64,
    }
}

fn resolve_format(options: &CompileOptions) -> Result<Format, CompileError> {
    let name = options
        .format
        .as_deref()
        .ok_or_else(|| CompileError::UnknownFormat { name: "<none given>".to_string() })?;
    Format::parse(name).ok_or_else(|| CompileError::UnknownFormat { name: name.to_string() })
}

fn compile_with_vendor<W: ByteWidth>(
    mut vendor: Vendor<W>,
    context: LinkContext<W>,
    root: &crate::ast::Node,
    options: &CompileOptions,
) -> Result<Vec<u8>, CompileError> {
    vendor.generate(root)?;
    let words = if options.optimization_level > 0 {
        linker::optimized_link(&mut vendor, &options.entry, &context)?
    } else {
        linker::link(&vendor, &options.entry, &context)?
    };
    Ok(linker::persist(&words, options.endian, options.vasm_header))
}

/// Construct the "standard graph" vendor shared by every 8-bit target
/// (spec.md §4.8), useful for source meant to assemble for either of them.
pub fn eight_bit_hybrid() -> Vendor<u8> {
    let nexfuse = targets::nexfuse();
    let mercury = targets::mercury();
    hybrid::intersect("hybrid8", &[&nexfuse, &mercury], false, 0)
}
