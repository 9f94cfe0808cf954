use std::env;
use vasm::options::{CompileOptions, Endian};

const HELP: &str = "\
Usage: vasmc FILE [options]

  -f, --format FORMAT          openlud, nexfuse, mercury, solarisvm, jade, siax
  -o, --output PATH            output path (default a.out)
      --no-stylist             disable the style pass
      --strict, --enforce-stylist   any style diagnostic aborts
  -ln, --allow-large-numbers   disable lex-time numeric range check
  -le, -be                     endian selection
  -h, --help                   this page
";

fn parse_args(args: &[String]) -> Result<(String, CompileOptions), String> {
    let mut options = CompileOptions::default();
    let mut file = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--format" => {
                i += 1;
                let value = args.get(i).ok_or("--format expects an argument")?;
                options.format = Some(value.clone());
                options.format_set_by_cli = true;
            }
            "-o" | "--output" => {
                i += 1;
                let value = args.get(i).ok_or("--output expects an argument")?;
                options.output = value.clone();
            }
            "--no-stylist" => options.stylist_enabled = false,
            "--strict" | "--enforce-stylist" => options.strict_stylist = true,
            "-ln" | "--allow-large-numbers" => options.allow_big_numbers = true,
            "-le" => options.endian = Endian::Little,
            "-be" => options.endian = Endian::Big,
            "-h" | "--help" => {
                print!("{}", HELP);
                std::process::exit(0);
            }
            other if file.is_none() => file = Some(other.to_string()),
            other => return Err(format!("unexpected argument \"{}\"", other)),
        }
        i += 1;
    }
    let file = file.ok_or("expected exactly one input file")?;
    Ok((file, options))
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();

    let (file, mut options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            vasm::logging::error(message);
            eprint!("{}", HELP);
            std::process::exit(1);
        }
    };

    if let Err(err) = vasm::driver::run(&file, &mut options) {
        log::debug!("vasmc: compile failed: {:?}", err);
        std::process::exit(1);
    }
}
