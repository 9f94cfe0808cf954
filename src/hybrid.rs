//! Builds a "standard graph" vendor: the instruction-name intersection of
//! several vendors, useful for source that must assemble against every
//! listed target (spec.md §4.8).

use crate::vendor::Vendor;
use crate::width::ByteWidth;
use indexmap::IndexMap;

/// Intersect the instruction sets of `vendors`. A key survives only if
/// every vendor has it; when it does, the handler is taken from the
/// first vendor in the slice that defines it.
pub fn intersect<W: ByteWidth>(name: &'static str, vendors: &[&Vendor<W>], nul_after_sequence: bool, nul_byte: W) -> Vendor<W> {
    let mut handlers = IndexMap::new();
    if let Some(first) = vendors.first() {
        for (key, handler) in &first.handlers {
            if vendors.iter().all(|v| v.handlers.contains_key(key)) {
                handlers.insert(*key, *handler);
            }
        }
    }
    log::debug!("hybrid({}): {} shared instructions across {} vendors", name, handlers.len(), vendors.len());
    Vendor::new(name, handlers, nul_after_sequence, nul_byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::targets::{mercury, nexfuse};

    #[test]
    fn intersection_keeps_shared_instructions() {
        let a = nexfuse();
        let b = mercury();
        let h = intersect("hybrid", &[&a, &b], false, 0);
        assert!(h.handlers.contains_key("echo"));
        assert_eq!(h.handlers.len(), a.handlers.len());
    }

    #[test]
    fn intersection_drops_instructions_missing_from_any_vendor() {
        let mut a = nexfuse();
        a.handlers.shift_remove("jmp");
        let b = mercury();
        let h = intersect("hybrid", &[&a, &b], false, 0);
        assert!(!h.handlers.contains_key("jmp"));
        assert!(h.handlers.contains_key("echo"));
    }
}
