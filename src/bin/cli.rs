use anyhow::anyhow;
use colored::*;
use gse_terminal::{
    core::config::ResearchConfig,
    export::{self, EXPORT_FILE_NAME, NOTHING_TO_EXPORT_MESSAGE},
    init,
    render::{self, LOADING_MESSAGE},
    repl::{self, Command},
    session::Submission,
    utils::terminal,
    ResearchService, Session, Spinner,
};
use rustyline::error::ReadlineError;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "gse-cli",
    about = "AI-powered research on Ghana Stock Exchange listed companies"
)]
struct Opt {
    /// Run a single search and exit instead of starting the interactive shell
    #[structopt(short, long)]
    query: Option<String>,

    /// With --query, also write the financial tables to this CSV file
    #[structopt(short, long, parse(from_os_str))]
    export: Option<PathBuf>,
}

async fn run_search(session: &mut Session, service: &ResearchService, input: &str) {
    let spinner = Spinner::start(LOADING_MESSAGE);
    let submission = session.search(service, input).await;
    spinner.finish();

    if let Some(message) = session.error() {
        eprintln!("{}", message.red());
    }
    if let Ok(Submission::Started(query)) = submission {
        log::debug!("Finished search for {}", query);
        show(session);
    }
}

fn show(session: &Session) {
    let text = render::view(&session.view(), terminal::width());
    if !text.is_empty() {
        println!("\n{}", text);
    }
}

fn export_result(session: &Session, path: &Path) -> anyhow::Result<()> {
    let data = session
        .result()
        .and_then(export::exportable)
        .ok_or_else(|| anyhow!(NOTHING_TO_EXPORT_MESSAGE))?;
    export::write_csv(data, path)?;
    println!("{} {}", "Exported financial data to".green(), path.display());
    Ok(())
}

async fn one_shot(
    service: &ResearchService,
    query: &str,
    export_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    run_search(&mut session, service, query).await;

    if session.result().is_none() {
        return Err(anyhow!(session
            .error()
            .unwrap_or("The search produced no result.")
            .to_string()));
    }
    if let Some(path) = export_path {
        export_result(&session, &path)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C!");
        r.store(false, Ordering::SeqCst);
    })?;
    dotenv::dotenv().ok();
    env_logger::init();
    log::debug!("Logger initialized");

    let opt = Opt::from_args();
    let config = ResearchConfig::from_env()?;
    let service = init::initialize_service(&config)?;

    if let Some(query) = opt.query {
        return one_shot(&service, &query, opt.export).await;
    }
    if opt.export.is_some() {
        return Err(anyhow!("--export requires --query"));
    }

    println!("{}", render::banner());
    let mut session = Session::new();
    show(&session);
    println!("Enter 'quit' to exit, '/help' for commands");

    let mut rl = repl::create_editor()?;

    while running.load(Ordering::SeqCst) {
        match rl.readline(&format!("{} ", "gse>".yellow().bold())) {
            Ok(line) => match Command::parse(&line) {
                Command::Quit => break,
                Command::Search(input) => run_search(&mut session, &service, &input).await,
                Command::Export(path) => {
                    let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
                    if let Err(e) = export_result(&session, &path) {
                        eprintln!("{} {}", "Export failed:".red(), e);
                    }
                }
                Command::Clear => {
                    session.reset();
                    show(&session);
                }
                Command::Help => println!("{}", repl::help()),
                Command::Unknown(cmd) => {
                    eprintln!("{} {}", "Unknown command:".red(), cmd);
                    println!("{}", repl::help());
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("\n{}", render::footer().dimmed());
    println!("Goodbye!");

    log::debug!("Saving REPL history");
    repl::save_history(&mut rl)?;

    terminal::restore()?;
    Ok(())
}
