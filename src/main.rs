#![deny(warnings)]

use anyhow::{Context, Result, bail};
use kaia_investors::args::{Args, Command, OutputFormat};
use kaia_investors::investor::Investor;
use kaia_investors::{clear_token, get_investor, load_investors, save_token, stored_user};
use log::LevelFilter;
use std::env;
use std::process::exit;

fn init_logger() {
    let has_debug_flag = env::args().any(|s| s.eq("--debug") || s.eq("-d"));

    let mut builder = env_logger::Builder::from_default_env();
    if env::var("RUST_LOG").is_err() && has_debug_flag {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn print_investors(investors: &[Investor], output: &OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(investors)?);
        }
        OutputFormat::Table => {
            for investor in investors {
                let id = investor.id.map(|id| id.to_string()).unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{}",
                    id, investor.name, investor.phone, investor.nuit
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let args = Args::parse().await?;

    match args.command() {
        Command::List => {
            let state = load_investors(&args).await?;

            if let Some(error) = state.error {
                eprintln!("{}", error);
                exit(1);
            }

            print_investors(&state.investors, &args.output())?;
        }
        Command::Get { id } => {
            let investor = get_investor(&args, id).await?;
            print_investors(&[investor], &args.output())?;
        }
        Command::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => rpassword::prompt_password("Token: ")
                    .context("Failed to read the token")?,
            };

            if token.trim().is_empty() {
                bail!("Token can't be empty");
            }

            save_token(&args, token.trim().to_owned()).await?;
            eprintln!("Token stored for {}", args.server());
        }
        Command::Whoami => match stored_user(&args).await? {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => {
                eprintln!("No user stored for {}", args.server());
                exit(1);
            }
        },
        Command::Logout => {
            clear_token(&args).await?;
            eprintln!("Token removed for {}", args.server());
        }
    }

    Ok(())
}
