//! Command-line argument parsing for StorePulse

/// Parsed command line arguments
#[derive(Debug, Default)]
pub struct Args {
    pub validate: bool,
    pub json: bool,
    pub help: bool,
    pub anchor: Option<String>,
    pub out: Option<String>,
}

pub fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    parse_from(&args)
}

/// Parse from an explicit argument vector (for testing)
pub fn parse_from(args: &[String]) -> Args {
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--validate" => result.validate = true,
            "--json" => result.json = true,
            "--help" | "-h" => result.help = true,
            "--anchor" => {
                if i + 1 < args.len() {
                    i += 1;
                    result.anchor = Some(args[i].clone());
                }
            }
            "--out" => {
                if i + 1 < args.len() {
                    i += 1;
                    result.out = Some(args[i].clone());
                }
            }
            _ => {}
        }
        i += 1;
    }

    result
}

pub fn print_help() {
    println!("StorePulse - store uptime/downtime report engine\n");
    println!("USAGE:");
    println!("    storepulse [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --validate        Validate configuration and exit");
    println!("    --anchor TS       Override the anchor instant (RFC 3339, e.g. 2023-06-12T12:00:00Z)");
    println!("    --out PATH        Write the report to PATH instead of REPORT_PATH");
    println!("    --json            Write the report as JSON instead of CSV");
    println!("    --help, -h        Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    POLLS_CSV, BUSINESS_HOURS_CSV, TIMEZONES_CSV, REPORT_PATH, DEFAULT_TIMEZONE");
}
