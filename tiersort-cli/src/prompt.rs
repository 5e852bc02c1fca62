/// Text for questions, progress messages and help.
use tiersort_core::{Entry, Event, ItemKey, Prompt, Tier, Topic};

use crate::source::Item;

/// Question text for a prompt, or the confirmation for a placement.
pub fn prompt_text(prompt: &Prompt) -> String {
    match prompt {
        Prompt::AskTier { subject } => ask_tier(subject),
        Prompt::AskCompare {
            subject,
            tier,
            candidate,
        } => format!(
            "Is this \"{}\" better (+) or worse (-) than the \"{tier}-tier\" \"{}\"?",
            candidate.title(),
            subject.title,
        ),
        Prompt::AskSort { subject, candidate } => format!(
            "Is this \"{}\" better (+) or worse (-) than \"{}\"?",
            candidate.title(),
            subject.title,
        ),
        Prompt::AskTopic { subject, options } => ask_topic(subject, options),
        Prompt::Placed { entry } => placed(entry),
    }
}

fn ask_tier(subject: &ItemKey) -> String {
    let most: Vec<String> = Tier::ALL[..Tier::ALL.len() - 1]
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect();
    format!(
        "Which tier is \"{}\"? {} or \"{}\"? (append + or - to lean better or worse)",
        subject.title,
        most.join(", "),
        Tier::worst(),
    )
}

fn ask_topic(subject: &ItemKey, options: &[Topic]) -> String {
    let listed: Vec<String> = options
        .iter()
        .map(|t| format!("{}: {t}", t.index()))
        .collect();
    format!("What is the topic of \"{}\"?\n{}", subject.title, listed.join(", "))
}

fn placed(entry: &Entry) -> String {
    format!(
        "Ranked \"{}\" #{} in {}-tier ({})",
        entry.title(),
        entry.rank() + 1,
        entry.tier(),
        entry.topic(),
    )
}

pub fn event_text(event: &Event) -> String {
    match event {
        Event::Skipped { subject } => format!("Skipping {}!", subject.title),
        Event::TierChosen { tier, feeling } => {
            format!("You chose the {feeling} of \"{tier}-tier\"!")
        }
        Event::BoundarySwapped {
            moved,
            subject_tier,
        } => format!(
            "Moved \"{}\" to {}-tier; sorting within \"{subject_tier}-tier\" instead.",
            moved.title(),
            moved.tier(),
        ),
        Event::SortStarted { tier, feeling } => {
            format!("Sorting among the {feeling} of \"{tier}-tier\".")
        }
    }
}

/// Lines describing a displayed item.
pub fn item_text(item: &Item) -> Vec<String> {
    let mut lines = vec![format!("#{}: {}", item.number, item.title)];
    if let Some(image) = &item.image {
        lines.push(format!("  {image}"));
    }
    if let Some(caption) = &item.caption {
        lines.push(format!("  {caption}"));
    }
    lines
}

pub const HELP_TEXT: &str = "\
Commands:
  next, n              rank a random unranked item
  s a b c d f          put the item in a tier; add + or - to lean better or worse
  +, better            the shown item is better than the one being ranked
  -, worse             the shown item is worse than the one being ranked
  <topic>              pick a topic by number or name
  whoami, w            show the item being ranked
  list, ls [tier]      list rankings, optionally for one tier
  save, exit, download write all rankings to a snapshot file
  restore <file>       load rankings from a snapshot file
  delete               delete all rankings
  help, h              show this help
  quit, q              leave without saving a snapshot";

#[cfg(test)]
mod tests {
    use super::*;
    use tiersort_core::{Direction, ItemAttrs};

    fn entry(number: u32, title: &str, rank: usize, tier: Tier) -> Entry {
        let topic = Topic::from_index(23).unwrap();
        Entry::new(ItemKey::new(number, title), ItemAttrs { rank, tier, topic })
    }

    #[test]
    fn test_ask_tier_lists_all_tiers() {
        let text = prompt_text(&Prompt::AskTier {
            subject: ItemKey::new(353, "Python"),
        });
        assert!(text.starts_with("Which tier is \"Python\"?"));
        assert!(text.contains("\"s\", \"a\", \"b\", \"c\", \"d\" or \"f\"?"));
    }

    #[test]
    fn test_compare_questions_name_both_items() {
        let subject = ItemKey::new(1, "Barrel");
        let candidate = entry(2, "Petit Trees", 0, Tier::A);
        let text = prompt_text(&Prompt::AskCompare {
            subject: subject.clone(),
            tier: Tier::B,
            candidate: candidate.clone(),
        });
        assert_eq!(
            text,
            "Is this \"Petit Trees\" better (+) or worse (-) than the \"b-tier\" \"Barrel\"?"
        );
        let text = prompt_text(&Prompt::AskSort { subject, candidate });
        assert_eq!(text, "Is this \"Petit Trees\" better (+) or worse (-) than \"Barrel\"?");
    }

    #[test]
    fn test_topic_question_lists_numbered_options() {
        let options = vec![Topic::from_index(23).unwrap(), Topic::from_index(0).unwrap()];
        let text = prompt_text(&Prompt::AskTopic {
            subject: ItemKey::new(1, "Barrel"),
            options,
        });
        assert_eq!(
            text,
            "What is the topic of \"Barrel\"?\n23: Physics, 0: Anthropology"
        );
    }

    #[test]
    fn test_placed_is_one_based() {
        let text = prompt_text(&Prompt::Placed {
            entry: entry(1, "Barrel", 0, Tier::C),
        });
        assert_eq!(text, "Ranked \"Barrel\" #1 in c-tier (Physics)");
    }

    #[test]
    fn test_event_text() {
        assert_eq!(
            event_text(&Event::Skipped {
                subject: ItemKey::new(4, "Landscape")
            }),
            "Skipping Landscape!"
        );
        assert_eq!(
            event_text(&Event::TierChosen {
                tier: Tier::A,
                feeling: Direction::PreferLower.feeling()
            }),
            "You chose the best of \"a-tier\"!"
        );
    }

    #[test]
    fn test_item_text_skips_missing_parts() {
        let item = Item {
            number: 7,
            title: "Girl sleeping".into(),
            image: None,
            caption: None,
        };
        assert_eq!(item_text(&item), vec!["#7: Girl sleeping"]);
    }
}
