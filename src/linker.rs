//! Assembles a vendor's procedure map into the final byte stream with
//! per-target framing (spec.md §4.7).

use crate::options::Endian;
use crate::peephole;
use crate::vendor::Vendor;
use crate::width::ByteWidth;
use thiserror::Error;

/// Per-target framing parameters, fixed at vendor-construction time in
/// `vendor::targets` and threaded through to `link`/`optimized_link`.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<W: ByteWidth> {
    pub fold_procedures: bool,
    pub procedure_heading_byte: W,
    pub procedure_closing_byte: W,
    pub proc_end_byte: bool,
    pub end_byte: W,
    pub use_end_byte: bool,
    /// If false, a missing entry procedure is fatal. If true (library
    /// output), a missing entry is permitted.
    pub compile: bool,
    pub vasm_header: bool,
}

impl<W: ByteWidth> LinkContext<W> {
    /// The framing-free default: fold everything, no procedure headers,
    /// no end byte, compiling (not library) output.
    pub fn simple() -> LinkContext<W> {
        LinkContext {
            fold_procedures: true,
            procedure_heading_byte: W::zero(),
            procedure_closing_byte: W::zero(),
            proc_end_byte: false,
            end_byte: W::zero(),
            use_end_byte: false,
            compile: true,
            vasm_header: false,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinkError {
    #[error("entry procedure \"{entry}\" is not present in the procedure map")]
    MissingStart { entry: String },
}

/// Link `vendor`'s procedure map per `context`, producing the final byte
/// sequence. Does not run peephole; see `optimized_link` for that.
pub fn link<W: ByteWidth>(vendor: &Vendor<W>, entry: &str, context: &LinkContext<W>) -> Result<Vec<W>, LinkError> {
    let mut out = Vec::new();

    if !context.fold_procedures {
        for (name, body) in &vendor.procedures {
            if name == entry {
                continue;
            }
            out.push(context.procedure_heading_byte);
            let first_byte = name.bytes().next().unwrap_or(b'?');
            out.push(W::from_byte(first_byte));
            out.extend(body.iter().copied());
            if context.proc_end_byte {
                out.push(context.end_byte);
            }
            out.push(context.procedure_closing_byte);
        }
    }

    match vendor.procedures.get(entry) {
        Some(body) => out.extend(body.iter().copied()),
        None if !context.compile => return Err(LinkError::MissingStart { entry: entry.to_string() }),
        None => {}
    }

    if context.use_end_byte {
        out.push(context.end_byte);
    }

    Ok(out)
}

/// Seed peephole with `entry`, prune the procedure map, then link with
/// the same context (spec.md §4.7 "Optimized link").
pub fn optimized_link<W: ByteWidth>(
    vendor: &mut Vendor<W>,
    entry: &str,
    context: &LinkContext<W>,
) -> Result<Vec<W>, LinkError> {
    peephole::prune(vendor, entry);
    link(vendor, entry, context)
}

const VASM_HEADER: &str = "compiled using volt assembler(VASM)";

/// Serialize `bytes` with `W`'s native width and the requested endian,
/// optionally prefixed by the VASM header string (spec.md §4.7 "Persist").
pub fn persist<W: ByteWidth>(bytes: &[W], endian: Endian, vasm_header: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if vasm_header {
        out.extend(VASM_HEADER.as_bytes());
    }
    for &word in bytes {
        match endian {
            Endian::Little => out.extend(word.to_le_bytes()),
            Endian::Big => out.extend(word.to_be_bytes()),
        }
    }
    out
}
