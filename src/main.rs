use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tododb::db::{init_db, Outcome};
use tododb::view::command::HELP;
use tododb::view::{Command, TodoBoard};
use tododb::{config::Config, Repository};

#[tokio::main]
async fn main() {
    // Initialize tracing; stdout belongs to the list view
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let store = match init_db(config.database_path()).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open todo store: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(store));
    let mut board = TodoBoard::new(repo);

    if let Err(e) = run(&mut board).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(board: &mut TodoBoard) -> anyhow::Result<()> {
    board.refresh().await?;
    print!("{}", board.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        let result = match command {
            Command::Add(title) => board.submit(&title).await.map(|_| ()),
            Command::Toggle(Some(id)) => board.toggle(id).await.map(report),
            Command::Edit(Some(id), title) => board.rename(id, title.as_deref()).await.map(report),
            Command::Remove(Some(id)) => board.remove(id).await.map(report),
            // Ids that do not parse cannot match a todo.
            Command::Toggle(None) | Command::Edit(None, _) | Command::Remove(None) => Ok(()),
            Command::List => board.refresh().await,
            Command::Json => {
                println!("{}", serde_json::to_string_pretty(board.todos())?);
                continue;
            }
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
            Command::Unknown(verb) => {
                println!("Unknown command `{}`; try `help`", verb);
                continue;
            }
        };

        if let Err(e) = result {
            eprintln!("{}", e);
        }
        print!("{}", board.render());
    }

    Ok(())
}

fn report(outcome: Outcome) {
    if outcome == Outcome::NoOp {
        tracing::debug!("Command matched no todo");
    }
}
