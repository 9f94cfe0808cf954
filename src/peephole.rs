//! Dead-procedure elimination over a vendor's procedure map (spec.md §4.6).

use crate::vendor::Vendor;
use crate::width::ByteWidth;

/// Seed reachability with the entry procedure before folding ran and
/// prune everything the entry never reaches, directly or transitively.
///
/// Folding already records every callee a procedure inlined into
/// `vendor.reachable` during codegen; this only needs to add the entry
/// itself and then drop whatever the reachable set excludes.
pub fn prune<W: ByteWidth>(vendor: &mut Vendor<W>, entry: &str) {
    vendor.reachable.insert(entry.to_string());
    let before = vendor.procedures.len();
    vendor.procedures.retain(|name, _| vendor.reachable.contains(name));
    log::debug!(
        "peephole({}): {} of {} procedures reachable from \"{}\"",
        vendor.name,
        vendor.procedures.len(),
        before,
        entry
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::span::Span;
    use crate::value::Value;
    use crate::vendor::targets::nexfuse;

    fn chained_procedures() -> Node {
        Node::Root {
            children: vec![
                Node::Procedure {
                    header: "a".to_string(),
                    children: vec![Node::InstructionCall {
                        name: "nop".to_string(),
                        name_span: Span::zero(),
                        parameters: vec![],
                    }],
                },
                Node::Procedure {
                    header: "b".to_string(),
                    children: vec![Node::InstructionCall {
                        name: "nop".to_string(),
                        name_span: Span::zero(),
                        parameters: vec![],
                    }],
                },
                Node::Procedure {
                    header: "_start".to_string(),
                    children: vec![Node::InstructionCall {
                        name: "a".to_string(),
                        name_span: Span::zero(),
                        parameters: vec![Value::Nil { span: Span::zero() }],
                    }],
                },
            ],
        }
    }

    #[test]
    fn unreachable_procedure_is_removed() {
        let mut vendor = nexfuse();
        vendor.generate(&chained_procedures()).unwrap();
        prune(&mut vendor, "_start");
        assert!(vendor.procedures.contains_key("_start"));
        assert!(vendor.procedures.contains_key("a"));
        assert!(!vendor.procedures.contains_key("b"));
    }
}
