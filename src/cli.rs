// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help(binary_name: &str) {
    println!(
        "Leavebot v{} - Posts who is out of office and blocks their time in the planner",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--config <file>] [--verbose]", binary_name);
    println!("    {} preview <file.ics> [--date YYYY-MM-DD]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and scratch files.");
    println!("    -c, --config <file>   Read settings from this file instead of config.toml.");
    println!("    -v, --verbose         Log per-entry detail.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("PREVIEW COMMAND:");
    println!(
        "    {} preview timeoff.ics                    Print the messages as of today",
        binary_name
    );
    println!(
        "    {} preview timeoff.ics --date 2024-01-01  Print the messages as of a given day",
        binary_name
    );
    println!();
    println!("    Preview touches no network service. The \"today\" and \"upcoming\" messages");
    println!("    are shown without the planner's role filter.");
    println!();
    println!("ENVIRONMENT:");
    println!("    LEAVEBOT_FORECAST_TOKEN   Overrides forecast.token");
    println!("    LEAVEBOT_MAIL_PASSWORD    Overrides mail.password");
}
