//! Settings Menu entry point
//!
//! Opens the menu from an assets directory and drives it with line commands
//! read from stdin. Engine settings are logged, widget updates are printed.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, bail};

use settings_menu::{
    Channel, Delivery, Language, LogSink, MenuConfig, QualityDomain, SettingsMenu, UiSink, Widget,
};

const HELP: &str = "\
commands:
  volume <master|music|voice|effects> <dB>   set a channel volume (-50..15)
  mute <channel> <on|off>                    mute or unmute a channel
  next|prev <textures|models|effects|gender> cycle a quality tier or gender
  language <ru|en|zh>                        switch language
  subtitles <on|off>                         toggle subtitles
  edit                                       start editing the nickname
  nickname <name>                            commit the nickname
  show                                       print current settings
  help | quit";

/// Prints widget updates to stdout
struct ConsoleUi;

impl UiSink for ConsoleUi {
    fn render(&self, element: &str, widget: &Widget) -> anyhow::Result<()> {
        println!("  {:<28} {}", element, widget);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Quality(QualityDomain),
    Gender,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Volume(Channel, f32),
    Mute(Channel, bool),
    Next(Target),
    Prev(Target),
    Language(Language),
    Subtitles(bool),
    Edit,
    Nickname(String),
    Show,
    Help,
    Quit,
}

fn parse_switch(word: Option<&str>) -> anyhow::Result<bool> {
    match word {
        Some("on" | "true" | "1" | "yes") => Ok(true),
        Some("off" | "false" | "0" | "no") => Ok(false),
        other => bail!("expected on/off, got {:?}", other.unwrap_or("")),
    }
}

fn parse_channel(word: Option<&str>) -> anyhow::Result<Channel> {
    let word = word.context("missing channel")?;
    Channel::from_name(word).with_context(|| format!("unknown channel {:?}", word))
}

fn parse_target(word: Option<&str>) -> anyhow::Result<Target> {
    match word {
        Some("gender") => Ok(Target::Gender),
        Some(name) => QualityDomain::from_name(name)
            .map(Target::Quality)
            .with_context(|| format!("unknown setting {:?}", name)),
        None => bail!("missing setting name"),
    }
}

fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match verb {
        "" => return Ok(None),
        "volume" | "vol" => {
            let channel = parse_channel(args.next())?;
            let volume: f32 = args
                .next()
                .context("missing volume")?
                .parse()
                .context("volume must be a number")?;
            if !volume.is_finite() {
                bail!("volume must be a finite number");
            }
            Command::Volume(channel, volume)
        }
        "mute" => Command::Mute(parse_channel(args.next())?, parse_switch(args.next())?),
        "next" => Command::Next(parse_target(args.next())?),
        "prev" | "previous" => Command::Prev(parse_target(args.next())?),
        "language" | "lang" => {
            let code = args.next().context("missing language code")?;
            Command::Language(
                Language::from_code(code).with_context(|| format!("unknown language {:?}", code))?,
            )
        }
        "subtitles" => Command::Subtitles(parse_switch(args.next())?),
        "edit" => Command::Edit,
        // Nicknames may contain spaces
        "nickname" | "nick" => Command::Nickname(rest.trim().to_string()),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {:?} (try `help`)", other),
    };
    Ok(Some(command))
}

fn report(delivery: &Delivery) {
    for (index, err) in &delivery.failures {
        eprintln!("warning: subscriber #{} failed: {:#}", index, err);
    }
}

fn show(menu: &SettingsMenu) {
    let audio = menu.audio();
    for channel in Channel::ALL {
        let state = audio.state(channel);
        println!(
            "{:<8} {:>6.1} dB{}",
            channel.key(),
            state.volume,
            if state.is_muted { " (muted)" } else { "" }
        );
    }
    for domain in QualityDomain::ALL {
        println!("{:<8} {:?}", domain.key(), menu.graphics().level(domain));
    }
    let language = menu.language();
    println!(
        "Language {:?}, subtitles {}",
        language.language(),
        if language.subtitles_enabled() { "on" } else { "off" }
    );
    let player = menu.player();
    println!("Player   {:?} ({:?})", player.nickname(), player.gender());
}

/// Execute one command; returns false when the session should end
fn execute(menu: &mut SettingsMenu, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Volume(channel, volume) => report(&menu.set_volume(channel, volume)),
        Command::Mute(channel, muted) => report(&menu.set_muted(channel, muted)),
        Command::Next(Target::Quality(domain)) => report(&menu.next_quality(domain)),
        Command::Prev(Target::Quality(domain)) => report(&menu.previous_quality(domain)),
        Command::Next(Target::Gender) => report(&menu.next_gender()),
        Command::Prev(Target::Gender) => report(&menu.previous_gender()),
        Command::Language(language) => report(&menu.select_language(language)?),
        Command::Subtitles(enabled) => report(&menu.set_subtitles(enabled)),
        Command::Edit => menu.begin_nickname_edit()?,
        Command::Nickname(name) => report(&menu.commit_nickname(&name)?),
        Command::Show => show(menu),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let root = MenuConfig::resolve_root(std::env::args().nth(1));
    log::info!("Settings menu starting from {}", root.display());

    let mut menu = SettingsMenu::open(
        &MenuConfig::from_dir(&root),
        Arc::new(LogSink),
        Arc::new(ConsoleUi),
    )
    .with_context(|| format!("cannot open settings under {}", root.display()))?;
    report(menu.startup());

    println!("{}", HELP);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let command = match parse(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {:#}", err);
                continue;
            }
        };
        match execute(&mut menu, command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("error: {:#}", err),
        }
    }

    log::info!("Settings menu closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse("volume music -12.5").unwrap(),
            Some(Command::Volume(Channel::Music, -12.5))
        );
        assert_eq!(
            parse("mute fx on").unwrap(),
            Some(Command::Mute(Channel::Effects, true))
        );
        assert_eq!(
            parse("next textures").unwrap(),
            Some(Command::Next(Target::Quality(QualityDomain::Textures)))
        );
        assert_eq!(parse("prev gender").unwrap(), Some(Command::Prev(Target::Gender)));
        assert_eq!(
            parse("language zh").unwrap(),
            Some(Command::Language(Language::Chinese))
        );
        assert_eq!(
            parse("nickname Big Boss").unwrap(),
            Some(Command::Nickname("Big Boss".into()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse("volume bass 3").is_err());
        assert!(parse("volume music loud").is_err());
        assert!(parse("volume music nan").is_err());
        assert!(parse("volume music inf").is_err());
        assert!(parse("mute master maybe").is_err());
        assert!(parse("next shadows").is_err());
        assert!(parse("language fr").is_err());
        assert!(parse("dance").is_err());
    }
}
