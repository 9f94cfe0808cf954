//! Compile options: set by the CLI, then mutated by preprocessor
//! directives (directives never override a value the CLI already set).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub files: Vec<String>,
    pub output: String,
    pub format: Option<String>,
    /// Set once the CLI has already chosen `format`, so the `compat`
    /// directive knows not to override it (spec.md §9 precedence note).
    pub format_set_by_cli: bool,
    pub stylist_enabled: bool,
    pub strict_stylist: bool,
    pub allow_big_numbers: bool,
    pub endian: Endian,
    pub optimization_level: u8,
    /// The entry procedure's name, seeding peephole reachability and
    /// resolved by the linker's `MissingStart` check.
    pub entry: String,
    pub vasm_header: bool,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions {
            files: Vec::new(),
            output: "a.out".to_string(),
            format: None,
            format_set_by_cli: false,
            stylist_enabled: true,
            strict_stylist: false,
            allow_big_numbers: false,
            endian: Endian::Little,
            optimization_level: 0,
            entry: "_start".to_string(),
            vasm_header: false,
        }
    }
}

/// The six bytecode targets named in spec.md §1/§6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    OpenLud,
    NexFuse,
    Mercury,
    SolarisVm,
    Jade,
    Siax,
}

impl Format {
    pub fn parse(name: &str) -> Option<Format> {
        match name.to_ascii_lowercase().as_str() {
            "openlud" => Some(Format::OpenLud),
            "nexfuse" => Some(Format::NexFuse),
            "mercury" => Some(Format::Mercury),
            "solarisvm" => Some(Format::SolarisVm),
            "jade" => Some(Format::Jade),
            "siax" => Some(Format::Siax),
            _ => None,
        }
    }
}
