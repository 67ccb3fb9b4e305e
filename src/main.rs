use gridsweep::{Action, Cell, Game, GameConfig, GameError, GameStatus, Position, Settings};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

const USAGE: &str = "Commands: r <row> <col>, f <row> <col>, n, c <rows> <cols> <mines> <radius>, q";

#[derive(Debug, PartialEq)]
enum Command {
    Play(Position, Action),
    Restart,
    Configure(GameConfig),
    Quit,
}

fn main() {
    env_logger::init();

    match run_game() {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => eprintln!("Game error: {}", e),
    }
}

fn run_game() -> Result<(), Box<dyn Error>> {
    let settings_path = Settings::default_path();
    let mut settings = load_settings(settings_path.as_deref());

    let mut game = Game::new_or_fallback(settings.board);
    report_warning(&game);

    loop {
        game.tick();
        print_board(&game);

        match game.status() {
            GameStatus::Won => println!("Congratulations! You won! (n: new game, q: quit)"),
            GameStatus::Lost => println!("Game Over! (n: new game, q: quit)"),
            GameStatus::InProgress => {}
        }

        let command = match read_command()? {
            Some(command) => command,
            None => {
                println!("{}", USAGE);
                continue;
            }
        };

        match command {
            Command::Play(pos, action) => {
                if let Some(message) = play(&mut game, pos, action) {
                    println!("{}", message);
                }
            }
            Command::Restart => {
                if game.restart().is_err() {
                    report_warning(&game);
                }
            }
            Command::Configure(config) => {
                if game.reconfigure(config).is_err() {
                    report_warning(&game);
                } else {
                    settings.board = *game.config();
                    if let Some(path) = &settings_path {
                        save_settings(&settings, path);
                    }
                }
            }
            Command::Quit => break,
        }
    }

    Ok(())
}

/// Moves on a finished game are dropped without a message.
fn play(game: &mut Game, pos: Position, action: Action) -> Option<String> {
    match game.perform_action(pos, action) {
        Ok(_) | Err(GameError::InvalidState) => None,
        Err(e) => Some(format!("Error: {}", e)),
    }
}

fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };

    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring settings at {}: {}", path.display(), e);
            println!("Warning: {}. Using default settings.", e);
            Settings::default()
        }
    }
}

fn report_warning(game: &Game) {
    if let Some(e) = game.warning() {
        println!("Warning: {}. Playing on a 1x1 board instead.", e);
    }
}

fn save_settings(settings: &Settings, path: &Path) {
    if let Err(e) = settings.save(path) {
        println!("Warning: could not save settings: {}", e);
    }
}

fn print_board(game: &Game) {
    let (rows, cols) = game.dimensions();

    println!(
        "Mines left: {:03}   Time: {:03}",
        game.mines_left(),
        game.elapsed_secs()
    );

    // Column numbers
    print!("    ");
    for col in 0..cols {
        print!("{:>3}", col);
    }
    println!();

    for row in 0..rows {
        print!("{:>3} ", row);
        for col in 0..cols {
            let cell = &game.grid()[Position::new(row, col)];
            print!("{:>3}", cell_symbol(cell));
        }
        println!();
    }
}

fn cell_symbol(cell: &Cell) -> String {
    if cell.is_flagged() {
        "⚑".to_string()
    } else if !cell.is_revealed() {
        "□".to_string()
    } else if cell.is_clicked_mine() {
        "X".to_string()
    } else if cell.is_mine() {
        "*".to_string()
    } else if cell.adjacent_mines() == 0 {
        " ".to_string()
    } else {
        cell.adjacent_mines().to_string()
    }
}

fn read_command() -> io::Result<Option<Command>> {
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(Some(Command::Quit));
    }

    Ok(parse_command(&input))
}

fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();

    match parts.next()? {
        "r" => parse_position(parts).map(|pos| Command::Play(pos, Action::Reveal)),
        "f" => parse_position(parts).map(|pos| Command::Play(pos, Action::Flag)),
        "n" => Some(Command::Restart),
        "q" => Some(Command::Quit),
        "c" => {
            let fields: Vec<&str> = parts.collect();
            let field = |i: usize| fields.get(i).copied().unwrap_or("");
            Some(Command::Configure(GameConfig::from_inputs(
                field(0),
                field(1),
                field(2),
                field(3),
            )))
        }
        _ => None,
    }
}

fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<Position> {
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    Some(Position::new(row, col))
}
