use crate::content::DaySlot;
use chrono::NaiveDate;
use std::fmt::Write;

/// Signoff used for the welcome message, which the agent writes as plain text.
pub const WELCOME_SIGNOFF: &str = "— din Københavner-bot ☁️";

/// The agent is asked for one more event than fits, so a dud can be dropped.
pub const REQUESTED_EVENTS: usize = 6;

/// Weekly request: forecast for exactly `days`, events ranked by
/// `event_preferences`, JSON-only answer.
pub fn weekly_prompt(today: NaiveDate, days: &[DaySlot], event_preferences: &str) -> String {
    let labels = days
        .iter()
        .map(DaySlot::dated_label)
        .collect::<Vec<_>>()
        .join(", ");
    let example_label = days.first().map_or_else(|| "Søn".to_string(), DaySlot::dated_label);

    let mut prompt = String::with_capacity(1024);
    let _ = writeln!(
        prompt,
        "Du skriver en kort SMS på dansk til en vennegruppe i København. Dato i dag: {}.",
        today.format("%d/%m/%Y")
    );
    let _ = writeln!(
        prompt,
        "Giv vejrudsigten for præcis disse dage, i denne rækkefølge: {labels}."
    );
    let _ = writeln!(
        prompt,
        "Foreslå {REQUESTED_EVENTS} konkrete begivenheder i København i samme periode."
    );
    let preferences = event_preferences.trim();
    if !preferences.is_empty() {
        let _ = writeln!(prompt, "Prioritér: {preferences}.");
    }
    let _ = writeln!(
        prompt,
        "Svar KUN med JSON, uden forklaring, i dette format:\n\
         {{\"intro\": \"…\", \"forecast\": [{{\"label\": \"{example_label}\", \"icon\": \"☀️\", \"tmax\": 18}}], \
         \"events\": [{{\"title\": \"…\", \"where\": \"…\"}}], \"signoff\": \"…\"}}"
    );
    prompt.push_str(
        "Brug labels præcis som angivet, én pr. dag. tmax er dagens højeste temperatur i hele grader.",
    );
    prompt
}

/// Welcome request: plain text, no JSON.
pub fn welcome_prompt() -> String {
    "Skriv en kort og venlig velkomst-SMS på dansk (højst 320 tegn) til en vennegruppe i \
     København, som fremover får et ugentligt forslag med vejret og ting at lave i byen. \
     Svar kun med selve teksten: ingen JSON, ingen hilsen til sidst."
        .to_string()
}
