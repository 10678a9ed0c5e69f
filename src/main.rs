use anyhow::Context;
use chrono::Utc;
use octurdle::cli::{CliInterface, Command, display_stats, format_codes, format_feedback, parse_cli};
use octurdle::{Error, GameService, game_loop, logging};
use std::io::{self, Write};

fn main() {
    let cli = parse_cli();
    logging::init(cli.options.verbose);

    if let Err(e) = run(cli) {
        let status = e.downcast_ref::<Error>().map(Error::status_code);
        match status {
            Some(code) => eprintln!("Error ({code}): {e:#}"),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: octurdle::cli::Cli) -> anyhow::Result<()> {
    let config = cli.options.to_config().context("Invalid configuration")?;
    let service = GameService::from_config(&config).context("Failed to start game service")?;
    let now = Utc::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Register(creds) => {
            let account = service.register(&creds.username, &creds.password, now)?;
            writeln!(out, "Registered {} ({})", account.username, account.id)?;
        }
        Command::Login(creds) => {
            let session = service.login(&creds.username, &creds.password, now)?;
            writeln!(out, "{}", session.token)?;
        }
        Command::SeedUser { username, password } => {
            let (account, created) = service.seed_user(&username, &password, now)?;
            if created {
                writeln!(out, "Created user {} with password {password}", account.username)?;
            } else {
                writeln!(out, "User already exists: {}", account.username)?;
            }
        }
        Command::Guess { word } => {
            let feedback = service.feedback(&word, now)?;
            writeln!(out, "{}  {}", format_feedback(&feedback), format_codes(&feedback))?;
        }
        Command::Record { token, outcome } => {
            let stats = service.record_result(&token.token, outcome.won, now)?;
            display_stats(&mut out, &stats)?;
        }
        Command::Stats { token } => {
            let stats = service.stats(&token.token, now)?;
            display_stats(&mut out, &stats)?;
        }
        Command::Today => {
            let puzzle = service.today(now)?;
            writeln!(out, "{} (seed {}): {}", puzzle.date, puzzle.seed, puzzle.word)?;
        }
        Command::Play { token } => {
            // Check the token up front so a bad one fails before the round starts.
            if let Some(token) = &token {
                service.authenticate(token, now)?;
            }
            let mut interface = CliInterface::new(io::stdin().lock(), &mut out);
            let outcome = game_loop(&service, &mut interface, now)?;
            if let (Some(token), Some(won)) = (token, outcome.result()) {
                match service.record_result(&token, won, now) {
                    Ok(stats) => display_stats(&mut out, &stats)?,
                    Err(Error::AlreadyUpdated) => {
                        writeln!(out, "A result was already recorded today; stats unchanged.")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
    Ok(())
}
