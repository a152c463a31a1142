//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `governance_core` linkage with deterministic output.
//! - `appointees <db> <role-guid> [epoch-ms]` prints the classified
//!   appointees of one role as JSON.

use governance_core::{
    init_from_config, open_db, ElementId, GovernanceRoleService, ServerConfig, ServiceContext,
    SqliteMetadataRepository, SystemClock,
};
use std::process::ExitCode;
use std::sync::Arc;

const CLI_USER: &str = "governance_cli";
const USAGE: &str = "usage: governance_cli [appointees <db> <role-guid> [epoch-ms]]";

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match args.first().map(String::as_str) {
        None => {
            println!("governance_core ping={}", governance_core::ping());
            println!("governance_core version={}", governance_core::core_version());
            ExitCode::SUCCESS
        }
        Some("appointees") => match print_appointees(&args[1..]) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            eprintln!("unknown command `{other}`; {USAGE}");
            ExitCode::from(2)
        }
    }
}

fn print_appointees(args: &[String]) -> Result<(), String> {
    let (db_path, role_guid) = match args {
        [db_path, role_guid, ..] => (db_path, role_guid),
        _ => return Err(USAGE.to_string()),
    };
    let role_guid = ElementId::parse_str(role_guid)
        .map_err(|err| format!("invalid role guid `{role_guid}`: {err}"))?;
    let effective_time = args
        .get(2)
        .map(|value| {
            value
                .parse::<i64>()
                .map_err(|err| format!("invalid epoch-ms `{value}`: {err}"))
        })
        .transpose()?;

    let config = ServerConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config).map_err(|err| err.to_string())?;

    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let repo = SqliteMetadataRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let context = ServiceContext::new(config.access_policy(), Arc::new(SystemClock));
    let appointees = GovernanceRoleService::new(repo, context)
        .get_appointees(CLI_USER, role_guid, effective_time)
        .map_err(|err| err.to_string())?;

    let json = serde_json::to_string_pretty(&appointees).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}
