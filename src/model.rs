//! Core record types shared by every pipeline stage.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A file host a comic may be offered on.
///
/// Declaration order is the map order used in the links file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// The aggregator's own main download server.
    Main,
    /// The aggregator's mirror server.
    Mirror,
    /// mega.nz
    Mega,
    /// mediafire.com
    Mediafire,
    /// zippyshare.com
    Zippyshare,
    /// dropapk.to
    Dropapk,
    /// ufile.io
    Ufile,
    /// cloud.mail.ru
    Cloudmail,
    /// userscloud.com
    Userscloud,
}

/// Label keywords in match order. The first keyword found wins.
const LABEL_KEYWORDS: [(&str, HostKind); 11] = [
    ("mainserver", HostKind::Main),
    ("link1", HostKind::Main),
    ("mirror", HostKind::Mirror),
    ("link2", HostKind::Mirror),
    ("mega", HostKind::Mega),
    ("mediafire", HostKind::Mediafire),
    ("zippyshare", HostKind::Zippyshare),
    ("dropapk", HostKind::Dropapk),
    ("ufile", HostKind::Ufile),
    ("cloudmail", HostKind::Cloudmail),
    ("userscloud", HostKind::Userscloud),
];

impl HostKind {
    /// Every host kind, in declaration order.
    pub const ALL: [HostKind; 9] = [
        HostKind::Main,
        HostKind::Mirror,
        HostKind::Mega,
        HostKind::Mediafire,
        HostKind::Zippyshare,
        HostKind::Dropapk,
        HostKind::Ufile,
        HostKind::Cloudmail,
        HostKind::Userscloud,
    ];

    /// Returns the stable lowercase label used in logs and the links file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Mirror => "mirror",
            Self::Mega => "mega",
            Self::Mediafire => "mediafire",
            Self::Zippyshare => "zippyshare",
            Self::Dropapk => "dropapk",
            Self::Ufile => "ufile",
            Self::Cloudmail => "cloudmail",
            Self::Userscloud => "userscloud",
        }
    }

    /// Classifies a button or anchor label.
    ///
    /// The label is lowercased and stripped of all whitespace before a
    /// substring match against the keyword table, so `"MEGA  Link"` and
    /// `"mega"` classify alike. Ambiguous labels resolve by table order.
    #[must_use]
    pub fn classify_label(label: &str) -> Option<Self> {
        let normalized = normalize_label(label);
        if normalized.is_empty() {
            return None;
        }
        LABEL_KEYWORDS
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword))
            .map(|(_, kind)| *kind)
    }

    /// Case-insensitive `title` attribute marker for the single-comic layout.
    ///
    /// `Main` has no marker: it is the page's primary download anchor.
    #[must_use]
    pub fn title_marker(self) -> Option<&'static str> {
        match self {
            Self::Main => None,
            Self::Mirror => Some("mirror download"),
            Self::Mega => Some("mega"),
            Self::Mediafire => Some("mediafire"),
            Self::Zippyshare => Some("zippyshare"),
            Self::Dropapk => Some("dropapk"),
            Self::Ufile => Some("ufile"),
            Self::Cloudmail => Some("cloudmail"),
            Self::Userscloud => Some("userscloud"),
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases and removes all whitespace.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One discovered downloadable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicLink {
    /// Display name parsed from the page; may be empty.
    pub title: String,
    /// Content page the record was extracted from.
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    /// Candidate URL per host. Never empty.
    pub links: BTreeMap<HostKind, String>,
}

impl ComicLink {
    /// Builds a record, dropping blank links.
    ///
    /// Returns `None` when no non-blank link remains, so a stored record
    /// always has at least one candidate host.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        page_url: impl Into<String>,
        links: BTreeMap<HostKind, String>,
    ) -> Option<Self> {
        let links: BTreeMap<HostKind, String> = links
            .into_iter()
            .filter_map(|(kind, url)| {
                let url = url.trim().to_string();
                (!url.is_empty()).then_some((kind, url))
            })
            .collect();
        if links.is_empty() {
            return None;
        }
        Some(Self {
            title: title.into(),
            page_url: page_url.into(),
            links,
        })
    }

    /// Returns the link for `kind`, if the page offered that host.
    #[must_use]
    pub fn link(&self, kind: HostKind) -> Option<&str> {
        self.links.get(&kind).map(String::as_str)
    }
}
