/// The interactive loop: reads commands, drives the ranker, shows items.
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tiersort_core::{parse_snapshot, Direction, ItemKey, Outcome, Prompt, RankError, Ranker, Tier};

use crate::command::{parse_command, Command};
use crate::output;
use crate::prompt::{event_text, item_text, prompt_text, HELP_TEXT};
use crate::source::Source;

/// Whether the loop keeps reading.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    ranker: Ranker,
    source: Source,
    export_dir: PathBuf,
}

impl Shell {
    pub fn new(ranker: Ranker, source: Source, export_dir: PathBuf) -> Self {
        Shell {
            ranker,
            source,
            export_dir,
        }
    }

    /// Read commands from stdin until EOF or `quit`.
    pub async fn run(&mut self) -> io::Result<()> {
        self.help();
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else { break };
            let Some(command) = parse_command(&line?) else { continue };
            if self.execute(command).await == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        tracing::debug!("Command {command:?} at stage {}", self.ranker.stage());
        let result = match command {
            Command::Next => {
                self.next().await;
                Ok(())
            }
            Command::Tier(tier, direction) => self.choose_tier(tier, direction).await,
            Command::Compare(direction) => match self.ranker.compare(direction) {
                Ok(outcome) => {
                    self.apply(outcome).await;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Topic(topic) => match self.ranker.choose_topic(&topic) {
                Ok(outcome) => {
                    if self.apply(outcome).await {
                        self.next().await;
                    }
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::WhoAmI => {
                match self.ranker.current().cloned() {
                    Some(subject) => self.display(subject.number).await,
                    None => println!("Nothing is being ranked. Type \"next\" to start."),
                }
                Ok(())
            }
            Command::List(tier) => {
                output::print_lines(&output::format_list(&self.ranker.stats(), tier));
                Ok(())
            }
            Command::Delete => self.delete(),
            Command::Save => {
                self.save();
                Ok(())
            }
            Command::Restore(path) => self.restore(&path),
            Command::Help => {
                self.help();
                Ok(())
            }
            Command::Quit => return Flow::Quit,
            Command::Unknown(word) => {
                println!("{word}: command not found");
                Ok(())
            }
        };

        if let Err(e) = result {
            if e.is_recoverable() {
                println!("{e}");
            } else {
                tracing::error!("{e}");
                eprintln!("Error: {e}");
            }
        }
        Flow::Continue
    }

    /// Abandon any placement in flight and start a random unranked item.
    async fn next(&mut self) {
        if let Some(subject) = self.ranker.abandon() {
            println!("{}", event_text(&tiersort_core::Event::Skipped { subject }));
        }

        let unranked = self.ranker.stats().unranked();
        if unranked.is_empty() {
            println!("Done!");
            return;
        }
        let number = unranked[rand::rng().random_range(0..unranked.len())];

        match self.source.show(number).await {
            Ok(item) => {
                output::print_lines(&item_text(&item));
                let outcome = self.ranker.begin(ItemKey::new(item.number, item.title));
                self.apply(outcome).await;
            }
            Err(e) => println!("{e}"),
        }
    }

    async fn choose_tier(&mut self, tier: Tier, direction: Direction) -> Result<(), RankError> {
        let outcome = self.ranker.choose_tier(tier, direction)?;
        self.apply(outcome).await;
        Ok(())
    }

    /// Print events, display whatever the prompt refers to, then ask.
    /// Returns true when the subject was placed.
    async fn apply(&mut self, outcome: Outcome) -> bool {
        for event in &outcome.events {
            println!("{}", event_text(event));
        }
        if let Some(number) = outcome.prompt.display_target() {
            self.display(number).await;
        }
        println!("{}", prompt_text(&outcome.prompt));
        matches!(outcome.prompt, Prompt::Placed { .. })
    }

    async fn display(&mut self, number: u32) {
        match self.source.show(number).await {
            Ok(item) => output::print_lines(&item_text(&item)),
            Err(e) => println!("{e}"),
        }
    }

    fn delete(&mut self) -> Result<(), RankError> {
        let stats = self.ranker.clear_all()?;
        println!("I've cleared your data!");
        output::print_lines(&stats.summary());
        Ok(())
    }

    fn save(&mut self) {
        if let Some(subject) = self.ranker.abandon() {
            println!("{}", event_text(&tiersort_core::Event::Skipped { subject }));
        }
        match output::write_snapshot_to_dir(&self.ranker.export_snapshot(), &self.export_dir) {
            Ok(path) => println!("Here is your data: {}", path.display()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    fn restore(&mut self, path: &Path) -> Result<(), RankError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                println!("Failed to read {}: {e}", path.display());
                return Ok(());
            }
        };
        let (snapshot, skipped) = parse_snapshot(&json)?;
        let written = self.ranker.import_snapshot(snapshot)?;
        println!("Restored {written} entries from {}", path.display());
        if skipped > 0 {
            println!("Skipped {skipped} unreadable entries");
        }
        Ok(())
    }

    fn help(&self) {
        output::print_lines(&self.ranker.stats().summary());
        println!();
        println!("{HELP_TEXT}");
    }

    #[cfg(test)]
    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ListSource;
    use tiersort_core::{ItemStore, Stage};

    fn shell(titles: &[&str], dir: &Path) -> Shell {
        let source = Source::List(ListSource::new(titles.iter().map(|t| t.to_string()).collect()));
        let ranker = Ranker::new(ItemStore::in_memory(), titles.len());
        Shell::new(ranker, source, dir.to_path_buf())
    }

    #[tokio::test]
    async fn test_next_tier_topic_places_and_moves_on() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&["Pizza", "Sushi"], dir.path());

        shell.execute(Command::Next).await;
        assert_eq!(shell.ranker().stage(), Stage::SetTier);
        let first = shell.ranker().current().cloned().unwrap();

        shell.execute(Command::Tier(Tier::B, Direction::Equal)).await;
        assert_eq!(shell.ranker().stage(), Stage::SetTopic);

        shell.execute(Command::Topic("Physics".into())).await;
        let stats = shell.ranker().stats();
        assert_eq!(stats.ranked.len(), 1);
        assert_eq!(stats.ranked[0].identity, first);

        // The remaining item was started automatically.
        assert_eq!(shell.ranker().stage(), Stage::SetTier);
        assert_ne!(shell.ranker().current(), Some(&first));
    }

    #[tokio::test]
    async fn test_wrong_stage_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&["Pizza"], dir.path());
        assert_eq!(shell.execute(Command::Compare(Direction::PreferHigher)).await, Flow::Continue);
        assert_eq!(shell.ranker().stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn test_save_then_restore_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&["Pizza"], dir.path());
        shell.execute(Command::Next).await;
        shell.execute(Command::Tier(Tier::A, Direction::Equal)).await;
        shell.execute(Command::Topic("0".into())).await;
        assert_eq!(shell.ranker().stats().ranked.len(), 1);

        shell.execute(Command::Save).await;
        let saved: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(saved.len(), 1);

        shell.execute(Command::Delete).await;
        assert!(shell.ranker().stats().ranked.is_empty());

        shell.execute(Command::Restore(saved[0].clone())).await;
        let stats = shell.ranker().stats();
        assert_eq!(stats.tier(Tier::A).len(), 1);
        assert_eq!(stats.tier(Tier::A)[0].title(), "Pizza");
    }

    #[tokio::test]
    async fn test_quit_stops_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(&["Pizza"], dir.path());
        assert_eq!(shell.execute(Command::Quit).await, Flow::Quit);
    }
}
