//! Plain-text rendering of the reply forest

use notes_core::{
    build_forest, flatten, resolve_reply_preview, summarize, Message, Sender, ThreadRow,
};

const INDENT: &str = "    ";
const PREVIEW_CHARS: usize = 40;

/// Label on the "send as" toggle
pub fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::Me => "Me →",
        Sender::Other => "← Other",
    }
}

/// Render every thread, viewed as `viewer`
pub fn render_threads(messages: &[Message], viewer: Sender) -> String {
    if messages.is_empty() {
        return "No notes yet.".to_string();
    }

    let forest = build_forest(messages);
    let mut out = String::new();
    for row in flatten(&forest) {
        render_row(&mut out, messages, &row, viewer);
    }
    out
}

fn render_row(out: &mut String, messages: &[Message], row: &ThreadRow<'_>, viewer: Sender) {
    let message = row.message;
    let indent = INDENT.repeat(row.depth);
    let summary = summarize(message, viewer);

    let marker = if row.depth > 0 { "↳ " } else { "" };
    let edited = if summary.is_edited {
        format!(" (edited ×{})", summary.edit_count)
    } else {
        String::new()
    };
    out.push_str(&format!(
        "{}{}#{} [{}] {}{}\n",
        indent,
        marker,
        message.id(),
        message.sender(),
        message.timestamp(),
        edited
    ));

    // Only top-level rows need the quote; nested rows sit under their parent
    if row.depth == 0 {
        if let Some(reply_to) = message.reply_to() {
            out.push_str(&format!(
                "{}  ┆ {}\n",
                indent,
                preview(resolve_reply_preview(messages, reply_to))
            ));
        }
    }

    for line in message.text().lines() {
        out.push_str(&format!("{}  {}\n", indent, line));
    }

    if !summary.reactions.is_empty() {
        let chips: Vec<String> = summary
            .reactions
            .iter()
            .map(|r| {
                let mine = if r.reacted_by_viewer { "*" } else { "" };
                format!("{} {}{}", r.emoji, r.count, mine)
            })
            .collect();
        out.push_str(&format!("{}  {}\n", indent, chips.join("  ")));
    }
}

fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let mut chars = first_line.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() || text.lines().count() > 1 {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::{BlobPersistence, MemoryBlobStore, MessageStore, SystemClock};

    fn store() -> MessageStore<BlobPersistence<MemoryBlobStore>> {
        MessageStore::open(
            BlobPersistence::with_default_key(MemoryBlobStore::new()),
            SystemClock::default(),
        )
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_threads(&[], Sender::Me), "No notes yet.");
    }

    #[test]
    fn test_thread_with_reply_and_reaction() {
        let mut store = store();
        let hello = store.send("Hello", Sender::Me, None).unwrap().id();
        let hi = store.send("Hi!", Sender::Other, Some(hello)).unwrap().id();
        store.toggle_reaction(hi, "❤️", Sender::Me).unwrap();
        store.edit(hello, "Hello there").unwrap();

        let out = render_threads(store.list(), Sender::Me);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with(&format!("#{} [me]", hello)));
        assert!(lines[0].ends_with("(edited ×1)"));
        assert_eq!(lines[1], "  Hello there");
        assert!(lines[2].starts_with(&format!("    ↳ #{} [other]", hi)));
        assert_eq!(lines[3], "      Hi!");
        assert_eq!(lines[4], "      ❤️ 1*");
        assert_eq!(lines.len(), 5);
        assert!(out.ends_with("❤️ 1*\n"));
    }

    #[test]
    fn test_every_row_is_its_own_line() {
        let mut store = store();
        let parent = store.send("gone", Sender::Me, None).unwrap().id();
        let orphan = store
            .send("first\nsecond", Sender::Other, Some(parent))
            .unwrap()
            .id();
        store.delete(parent).unwrap();
        store.toggle_reaction(orphan, "👍", Sender::Other).unwrap();

        let out = render_threads(store.list(), Sender::Me);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            &lines[1..],
            &["  ┆ [message not found]", "  first", "  second", "  👍 1"]
        );
        assert_eq!(out.matches('\n').count(), 5);
    }

    #[test]
    fn test_orphan_shows_placeholder() {
        let mut store = store();
        let parent = store.send("soon gone", Sender::Me, None).unwrap().id();
        store.send("still here", Sender::Other, Some(parent)).unwrap();
        store.delete(parent).unwrap();

        let out = render_threads(store.list(), Sender::Other);
        assert!(out.contains("┆ [message not found]"));
        assert!(out.contains("  still here"));
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("first\nsecond"), "first…");
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("{}…", "x".repeat(40)));
    }

    #[test]
    fn test_sender_labels() {
        assert_eq!(sender_label(Sender::Me), "Me →");
        assert_eq!(sender_label(Sender::Other), "← Other");
    }
}
