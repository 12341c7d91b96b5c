use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::chat::{ChatRelay, ChatSession, NoticeLevel, RoomError, SessionError, TurnOutcome};
use crate::core::{AppConfig, Variant};

#[derive(Debug, PartialEq)]
enum Input<'a> {
    Prompt(&'a str),
    NewRoom,
    ListRooms,
    // 1-based position in the room list
    Switch(usize),
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Input::Prompt(line);
    }
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("/new"), None) => Input::NewRoom,
        (Some("/rooms"), None) => Input::ListRooms,
        (Some("/quit"), None) => Input::Quit,
        (Some("/switch"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Switch(n),
            _ => Input::Unknown(line),
        },
        _ => Input::Unknown(line),
    }
}

fn print_rooms(session: &mut ChatSession) -> Result<()> {
    let active = session.active_room_id();
    let store = session.store();
    for (i, id) in store.list_rooms_newest_first().iter().enumerate() {
        let marker = if *id == active { "*" } else { " " };
        println!("{} {}. {}", marker, i + 1, store.title_for(id)?);
    }
    Ok(())
}

fn print_notices(session: &mut ChatSession) {
    for notice in session.take_notices() {
        match notice.level {
            NoticeLevel::Info => println!("[{}]", notice.message),
            NoticeLevel::Error => eprintln!("[{}]", notice.message),
        }
    }
}

pub async fn run(variant: Option<Variant>) -> Result<()> {
    let config = AppConfig::load(variant)?;
    let relay = ChatRelay::from_config(&config);
    let mut session = ChatSession::new(&Uuid::new_v4().to_string(), config.variant);
    let mut rl = DefaultEditor::new()?;

    if config.variant.allows_rooms() {
        println!("Commands: /new, /rooms, /switch <n>, /quit");
    }

    loop {
        let readline = rl.readline(">>> ");
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        match parse_input(&line) {
            Input::Prompt("") => continue,
            Input::Prompt(prompt) => {
                let _ = rl.add_history_entry(prompt);
                match relay.submit_with_notices(&mut session, prompt).await? {
                    TurnOutcome::Replied { reply, .. } => println!("{}", reply),
                    // The error is shown with the other notices
                    TurnOutcome::Failed { .. } => {}
                }
                print_notices(&mut session);
            }
            Input::NewRoom => match session.create_room() {
                Ok(_) => println!("Started a new chat"),
                Err(e) => eprintln!("{}", e),
            },
            Input::ListRooms => print_rooms(&mut session)?,
            Input::Switch(n) => {
                let rooms = session.store().list_rooms_newest_first();
                let result = match rooms.get(n - 1) {
                    Some(id) => session.switch_room(id),
                    None => Err(SessionError::Room(RoomError::NotFound(n.to_string()))),
                };
                match result {
                    Ok(()) => {
                        let id = session.active_room_id();
                        for turn in session.store().turns(&id)? {
                            println!("{}: {}", turn.role(), turn.content());
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            Input::Quit => break,
            Input::Unknown(cmd) => eprintln!("Unknown command: {}", cmd),
        }
    }

    Ok(())
}
