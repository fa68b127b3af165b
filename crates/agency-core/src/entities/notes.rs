//! Distribution notes: the trailing section authors append to a brief body.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,6}[ \t]*distribution notes[ \t]*:?[ \t]*$")
        .expect("valid marker regex")
});

static BEST_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:[-*][ \t]*)?(?:\*\*)?best posting time(?:\*\*)?[ \t]*:(?:\*\*)?[ \t]*(.*?)[ \t]*$",
    )
    .expect("valid best time regex")
});

static TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:[-*][ \t]*)?(?:\*\*)?tags(?:\*\*)?[ \t]*:(?:\*\*)?[ \t]*(.*?)[ \t]*$")
        .expect("valid tags regex")
});

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>()\[\]"']+"#).expect("valid url regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionNotes {
    #[serde(default)]
    pub comment_links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_posting_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl DistributionNotes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comment_links.is_empty() && self.best_posting_time.is_none() && self.tags.is_none()
    }
}

/// Split a body into its content and the trailing distribution notes.
///
/// Without a `Distribution Notes` heading the body is returned unchanged.
/// With one, the content is everything above the heading with trailing
/// whitespace removed.
#[must_use]
pub fn extract_notes(body: &str) -> (String, Option<DistributionNotes>) {
    let Some(marker) = MARKER.find(body) else {
        return (body.to_string(), None);
    };

    let content = body[..marker.start()].trim_end().to_string();
    let section = &body[marker.end()..];

    let best_posting_time = capture_label(&BEST_TIME, section);
    let tags = capture_label(&TAGS, section);

    let comment_links = section
        .lines()
        .filter(|line| !BEST_TIME.is_match(line) && !TAGS.is_match(line))
        .flat_map(|line| URL.find_iter(line))
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
        .collect();

    let notes = DistributionNotes {
        comment_links,
        best_posting_time,
        tags,
    };
    (content, (!notes.is_empty()).then_some(notes))
}

/// Append a distribution notes section to `content` in the shape that
/// [`extract_notes`] reads back.
#[must_use]
pub fn render_notes(content: &str, notes: &DistributionNotes) -> String {
    let mut out = content.trim_end().to_string();
    out.push_str("\n\n## Distribution Notes\n");

    if !notes.comment_links.is_empty() {
        out.push_str("\n**Comment links:**\n");
        for link in &notes.comment_links {
            let _ = writeln!(out, "- {link}");
        }
    }
    if let Some(time) = &notes.best_posting_time {
        let _ = write!(out, "\n**Best posting time:** {time}\n");
    }
    if let Some(tags) = &notes.tags {
        let _ = write!(out, "\n**Tags:** {tags}\n");
    }
    out
}

fn capture_label(re: &Regex, section: &str) -> Option<String> {
    re.captures(section)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
