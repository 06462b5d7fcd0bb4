use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::net::{IpAddr, SocketAddr};

use crate::api::{
    AllocationResponse, DEFAULT_AGE, DEFAULT_EXPECTED_RETURN_PERCENT, DEFAULT_MONTHLY_INVESTMENT,
    DEFAULT_RISK_TOLERANCE, DEFAULT_SIP_YEARS, DEFAULT_TIME_HORIZON, SipResponse,
    build_allocation_response, build_sip_response, run_http_server,
};
use crate::core::{InvestorProfile, SipInputs, risk_profile_label, validate_sip_inputs};
use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "allot",
    about = "Portfolio allocation and SIP calculators (CLI + HTTP API)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the calculators and their JSON API over HTTP
    Serve(ServeArgs),
    /// Compute a six-class portfolio allocation
    Allocate(AllocateArgs),
    /// Project a monthly systematic investment plan
    Sip(SipArgs),
    /// Print the risk profile label for a tolerance score
    RiskLabel(RiskLabelArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(env = "ALLOT_PORT", default_value_t = 8080, help = "Port to listen on")]
    pub port: u16,
    #[arg(
        long,
        env = "ALLOT_HOST",
        default_value = "0.0.0.0",
        help = "Interface address to bind"
    )]
    pub host: IpAddr,
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    #[arg(long, default_value_t = DEFAULT_AGE, allow_hyphen_values = true)]
    pub age: i32,
    #[arg(
        long,
        default_value_t = DEFAULT_RISK_TOLERANCE,
        allow_hyphen_values = true,
        help = "Risk tolerance from 1 (conservative) to 5 (aggressive)"
    )]
    pub risk_tolerance: i32,
    #[arg(
        long,
        default_value_t = DEFAULT_TIME_HORIZON,
        allow_hyphen_values = true,
        help = "Investment horizon in years"
    )]
    pub time_horizon: i32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SipArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_MONTHLY_INVESTMENT,
        allow_hyphen_values = true
    )]
    pub monthly_investment: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_EXPECTED_RETURN_PERCENT,
        allow_hyphen_values = true,
        help = "Expected annual return in percent, e.g. 12"
    )]
    pub expected_return: f64,
    #[arg(long, default_value_t = DEFAULT_SIP_YEARS)]
    pub years: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RiskLabelArgs {
    #[arg(allow_hyphen_values = true)]
    pub risk_tolerance: i32,
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve(args) => {
            run_http_server(SocketAddr::new(args.host, args.port)).await?;
        }
        Command::Allocate(args) => {
            let response = build_allocation_response(&InvestorProfile {
                age: args.age,
                risk_tolerance: args.risk_tolerance,
                time_horizon: args.time_horizon,
            });
            match args.format {
                OutputFormat::Table => print!("{}", render_allocation_table(&response)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            }
        }
        Command::Sip(args) => {
            let inputs = validate_sip_inputs(SipInputs {
                monthly_investment: args.monthly_investment,
                annual_return_rate: args.expected_return / 100.0,
                years: args.years,
            })?;
            let response = build_sip_response(&inputs);
            match args.format {
                OutputFormat::Table => print!("{}", render_sip_table(&response)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            }
        }
        Command::RiskLabel(args) => {
            println!("{}", risk_profile_label(args.risk_tolerance));
        }
    }
    Ok(())
}

fn render_allocation_table(response: &AllocationResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Age {} | risk {} ({}) | horizon {} years",
        response.age, response.risk_tolerance, response.risk_profile, response.time_horizon
    );
    for entry in &response.allocation.entries {
        let _ = writeln!(
            out,
            "{:<14}{:>4}%",
            entry.asset_class.label(),
            entry.percentage
        );
    }
    out
}

fn render_sip_table(response: &SipResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Monthly {:.2} at {:.2}% for {} years",
        response.monthly_investment, response.expected_return, response.years
    );
    let _ = writeln!(out, "{:<6}{:>16}{:>16}", "Year", "Invested", "Value");
    for row in &response.result.yearly {
        let _ = writeln!(
            out,
            "{:<6}{:>16.2}{:>16.2}",
            row.year, row.invested_amount, row.total_value
        );
    }
    let _ = writeln!(
        out,
        "Invested {:.2} | returns {:.2} | total {:.2}",
        response.result.invested_amount,
        response.result.estimated_returns,
        response.result.total_value
    );
    out
}
