use super::validate::{AgentContentPayload, WelcomeContent};
use crate::utils::text::{ELLIPSIS, char_len, fit_with_ellipsis};

pub const OPT_OUT_FOOTER: &str = "Ingen svar nødvendig. Skriv STOP for at framelde.";
pub const FOLLOW_UP_NOTE: &str = "PS: Om lidt sender jeg mit første forslag 😉";

/// Final SMS body. Only built by the formatters below, so it always respects
/// the character cap it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    body: String,
}

impl OutboundMessage {
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn char_count(&self) -> usize {
        char_len(&self.body)
    }
}

fn head_block(content: &AgentContentPayload) -> String {
    let mut head = String::with_capacity(128);
    head.push_str(&content.intro);
    head.push_str("\n\nVejret:");
    for day in &content.forecast {
        head.push('\n');
        head.push_str(&day.label);
        head.push_str(": ");
        head.push_str(&day.text);
    }
    head
}

fn events_block(events: &[String], cut: bool) -> String {
    if events.is_empty() {
        return String::new();
    }
    let mut block = String::from("\n\nForslag:");
    for event in events {
        block.push_str("\n• ");
        block.push_str(event);
    }
    if cut {
        block.push_str("\n• ");
        block.push(ELLIPSIS);
    }
    block
}

fn tail_block(signoff: &str) -> String {
    format!("\n\n{signoff}\n{OPT_OUT_FOOTER}")
}

/// Render validated weekly content into one SMS of at most `max_chars`.
///
/// Intro and every forecast line are kept intact whenever they fit. When the
/// full text is too long, events are dropped from the end (a `• …` line marks
/// the cut), then the whole events section goes, and only then the signoff
/// and footer are cut with a trailing `…`.
pub fn format_weekly(content: &AgentContentPayload, max_chars: usize) -> OutboundMessage {
    let head = head_block(content);
    let tail = tail_block(&content.signoff);

    let full = format!("{head}{}{tail}", events_block(&content.events, false));
    if char_len(&full) <= max_chars {
        return OutboundMessage { body: full };
    }

    for keep in (1..content.events.len()).rev() {
        let candidate = format!("{head}{}{tail}", events_block(&content.events[..keep], true));
        if char_len(&candidate) <= max_chars {
            tracing::debug!(
                kept = keep,
                dropped = content.events.len() - keep,
                "events truncated to fit sms cap"
            );
            return OutboundMessage { body: candidate };
        }
    }

    let without_events = format!("{head}{tail}");
    if char_len(&without_events) <= max_chars {
        tracing::debug!("events section dropped to fit sms cap");
        return OutboundMessage {
            body: without_events,
        };
    }

    tracing::debug!("signoff truncated to fit sms cap");
    OutboundMessage {
        body: fit_with_ellipsis(&without_events, max_chars),
    }
}

/// Render the one-off welcome message. The welcome text is shortened first
/// so the signoff and opt-out footer survive.
pub fn format_welcome(
    content: &WelcomeContent,
    announce_follow_up: bool,
    max_chars: usize,
) -> OutboundMessage {
    let mut tail = String::new();
    if announce_follow_up {
        tail.push('\n');
        tail.push_str(FOLLOW_UP_NOTE);
    }
    if !content.signoff.is_empty() {
        tail.push('\n');
        tail.push_str(&content.signoff);
    }
    tail.push('\n');
    tail.push_str(OPT_OUT_FOOTER);

    let full = format!("{}{tail}", content.text);
    if char_len(&full) <= max_chars {
        return OutboundMessage { body: full };
    }

    let tail_len = char_len(&tail);
    let body = if tail_len < max_chars {
        format!("{}{tail}", fit_with_ellipsis(&content.text, max_chars - tail_len))
    } else {
        fit_with_ellipsis(&full, max_chars)
    };
    OutboundMessage { body }
}
