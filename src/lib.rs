//! A multi-target assembler for LR Assembly, compiling source into one of
//! several bytecode formats: OpenLUD, NexFUSE, MercuryPIC, SiAX, JADE,
//! SolarisVM.

pub mod ast;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod hybrid;
pub mod lexer;
pub mod linker;
pub mod logging;
pub mod options;
pub mod parser;
pub mod peephole;
pub mod preprocess;
pub mod span;
pub mod stylist;
pub mod value;
pub mod vendor;
pub mod width;
