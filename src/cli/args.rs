//! CLI argument parsing

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(ScanArgs),
    Size(SizeArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanArgs {
    pub path: String,
    pub basis: String,
    pub top: Option<usize>,
    pub sort: bool,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeArgs {
    pub path: String,
    pub basis: String,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            path: String::new(),
            basis: "logical".to_string(),
            top: None,
            sort: true,
            json: false,
            quiet: false,
        }
    }
}

/// Parse command line arguments
///
/// # Errors
/// Returns a message describing the first unknown or malformed argument.
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "scan" => Command::Scan(parse_scan_args(&args[2..])?),
        "size" => Command::Size(parse_size_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

fn take_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn parse_scan_args(args: &[String]) -> Result<ScanArgs, String> {
    let mut scan_args = ScanArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--basis" => {
                scan_args.basis = take_value(args, &mut i, "a value")?.to_string();
            }
            "--top" => {
                let value = take_value(args, &mut i, "a value")?;
                let top: usize = value
                    .parse()
                    .map_err(|_| "--top must be a number".to_string())?;
                if top == 0 {
                    return Err("--top must be greater than zero".to_string());
                }
                scan_args.top = Some(top);
            }
            "--no-sort" => {
                scan_args.sort = false;
            }
            "--json" => {
                scan_args.json = true;
            }
            "--quiet" => {
                scan_args.quiet = true;
            }
            arg if !arg.starts_with("--") => {
                if scan_args.path.is_empty() {
                    scan_args.path = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if scan_args.path.is_empty() {
        return Err("Missing required argument: PATH".to_string());
    }

    Ok(scan_args)
}

fn parse_size_args(args: &[String]) -> Result<SizeArgs, String> {
    let mut path = String::new();
    let mut basis = "logical".to_string();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--basis" => {
                basis = take_value(args, &mut i, "a value")?.to_string();
            }
            arg if !arg.starts_with("--") => {
                if path.is_empty() {
                    path = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if path.is_empty() {
        return Err("Missing required argument: PATH".to_string());
    }

    Ok(SizeArgs { path, basis })
}
