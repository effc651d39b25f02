//! Localized report strings.

use nova_entity::release::ReleaseStatus;

/// One locale's report strings.
#[derive(Debug)]
pub struct Messages {
    /// Locale tag, e.g. `en`.
    pub locale: &'static str,
    pub creation_date: &'static str,
    pub notes: &'static str,
    pub history: &'static str,
    pub no_events: &'static str,
    /// `chrono` format for displayed timestamps.
    pub date_format: &'static str,
    verifying: &'static str,
    approved: &'static str,
    alpha: &'static str,
    beta: &'static str,
    latest: &'static str,
}

impl Messages {
    /// Timeline comment for a status, if the status has one.
    pub fn status_comment(&self, status: ReleaseStatus) -> Option<&'static str> {
        match status {
            ReleaseStatus::Verifying => Some(self.verifying),
            ReleaseStatus::Approved => Some(self.approved),
            ReleaseStatus::Alpha => Some(self.alpha),
            ReleaseStatus::Beta => Some(self.beta),
            ReleaseStatus::Latest => Some(self.latest),
            ReleaseStatus::New | ReleaseStatus::Rejected | ReleaseStatus::Finished => None,
        }
    }
}

static EN: Messages = Messages {
    locale: "en",
    creation_date: "Creation date",
    notes: "Release notes",
    history: "History",
    no_events: "No activity yet",
    date_format: "%m/%d/%Y %H:%M",
    verifying: "New assets have been uploaded",
    approved: "The assets have been approved",
    alpha: "The release has been promoted to the Alpha channel",
    beta: "The release has been promoted to the Beta channel",
    latest: "The release is now the latest version",
};

static IT: Messages = Messages {
    locale: "it",
    creation_date: "Data di creazione",
    notes: "Note di rilascio",
    history: "Cronologia",
    no_events: "Nessuna attività",
    date_format: "%d/%m/%Y %H:%M",
    verifying: "Sono stati caricati nuovi asset",
    approved: "Gli asset sono stati approvati",
    alpha: "La release è stata promossa al canale Alpha",
    beta: "La release è stata promossa al canale Beta",
    latest: "La release è ora l'ultima versione",
};

/// Strings for `locale`, falling back to English.
///
/// Region suffixes are ignored, so `it-IT` and `it_CH` resolve to Italian.
pub fn messages_for(locale: &str) -> &'static Messages {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "it" => &IT,
        _ => &EN,
    }
}
