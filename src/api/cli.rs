use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use super::inputs::{
    FireArgs, ProjectionArgs, SolveArgs, build_fire_inputs, build_projection_input,
    build_solve_request,
};
use super::{PlanResponse, run_http_server};
use crate::core::{run_fire, run_projection, solve_required_investment};
use crate::error::{Result, ValidationError};
use crate::plan::{TemplateId, template_graph};

#[derive(Parser, Debug)]
#[command(
    name = "lifeplan",
    about = "Life-plan graph, net worth projections and FIRE calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
    /// Project portfolio value under a risk profile
    Project(ProjectionArgs),
    /// Compute the FI number and years to reach it
    Fire(FireArgs),
    /// Solve for the monthly investment needed to reach FI in time
    Solve(SolveArgs),
    /// Print a starter plan template with its summary
    Template {
        #[arg(default_value = "default")]
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve(args) => {
            run_http_server(SocketAddr::new(args.host, args.port)).await?;
        }
        Command::Project(args) => {
            let input = build_projection_input(args)?;
            print_json(&run_projection(&input))?;
        }
        Command::Fire(args) => {
            let inputs = build_fire_inputs(args)?;
            print_json(&run_fire(&inputs))?;
        }
        Command::Solve(args) => {
            let (inputs, config) = build_solve_request(args)?;
            let result = solve_required_investment(&inputs, config)
                .map_err(|msg| ValidationError::new("solver", msg))?;
            print_json(&result)?;
        }
        Command::Template { id } => {
            let template: TemplateId = id.parse()?;
            print_json(&PlanResponse::from_graph(template_graph(template)))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
