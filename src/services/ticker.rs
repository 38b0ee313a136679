//! Human-readable labels for market tickers.
//!
//! Tickers are hyphen-delimited: a series prefix, an event code and an
//! optional contract code, e.g. `KXNFLGAME-25NOV02DALPHI-DAL`. Game series
//! encode the date and both teams in the event code.

/// Marker most series prefixes start with.
const SERIES_MARKER: &str = "KX";

/// How a known series' event code should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesKind {
    /// `YYMONDD` followed by two 3-letter team codes.
    Game,
    /// Event code shown verbatim after the label.
    Plain,
}

const SERIES: &[(&str, &str, SeriesKind)] = &[
    ("KXNFLGAME", "NFL", SeriesKind::Game),
    ("KXNCAAFGAME", "NCAAF", SeriesKind::Game),
    ("KXNBAGAME", "NBA", SeriesKind::Game),
    ("KXWNBAGAME", "WNBA", SeriesKind::Game),
    ("KXNCAAMBGAME", "NCAAB", SeriesKind::Game),
    ("KXMLBGAME", "MLB", SeriesKind::Game),
    ("KXNHLGAME", "NHL", SeriesKind::Game),
    ("KXMLSGAME", "MLS", SeriesKind::Game),
    ("KXEPLGAME", "EPL", SeriesKind::Game),
    ("KXBTCD", "Bitcoin daily", SeriesKind::Plain),
    ("KXBTC", "Bitcoin", SeriesKind::Plain),
    ("KXETHD", "Ethereum daily", SeriesKind::Plain),
    ("KXETH", "Ethereum", SeriesKind::Plain),
    ("KXHIGHNY", "NYC high temp", SeriesKind::Plain),
    ("KXHIGHCHI", "Chicago high temp", SeriesKind::Plain),
    ("KXHIGHMIA", "Miami high temp", SeriesKind::Plain),
    ("KXFEDDECISION", "Fed decision", SeriesKind::Plain),
    ("KXCPI", "CPI", SeriesKind::Plain),
    ("INXD", "S&P 500 daily", SeriesKind::Plain),
    ("NASDAQ100D", "Nasdaq 100 daily", SeriesKind::Plain),
];

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A decoded game event code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCode {
    pub year: u32,
    /// 1-based month.
    pub month: u32,
    pub day: u32,
    pub away: String,
    pub home: String,
}

impl GameCode {
    /// Decode `YYMONDDAAABBB`, e.g. `25NOV02DALPHI`.
    pub fn parse(code: &str) -> Option<Self> {
        if code.len() != 13 || !code.is_ascii() {
            return None;
        }

        let year: u32 = digits(&code[0..2])?;
        let month_code = code[2..5].to_ascii_uppercase();
        let month = MONTHS.iter().position(|m| *m == month_code)? as u32 + 1;
        let day: u32 = digits(&code[5..7])?;
        if !(1..=31).contains(&day) {
            return None;
        }

        let away = team(&code[7..10])?;
        let home = team(&code[10..13])?;

        Some(Self {
            year: 2000 + year,
            month,
            day,
            away,
            home,
        })
    }

    fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES[(self.month - 1) as usize]
    }
}

fn digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn team(s: &str) -> Option<String> {
    s.bytes()
        .all(|b| b.is_ascii_alphabetic())
        .then(|| s.to_ascii_uppercase())
}

fn lookup(prefix: &str) -> Option<(&'static str, SeriesKind)> {
    SERIES
        .iter()
        .find(|(p, _, _)| p.eq_ignore_ascii_case(prefix))
        .map(|(_, label, kind)| (*label, *kind))
}

/// Format a ticker for display.
///
/// Never fails: unknown series lose their `KX` marker and are otherwise shown
/// verbatim, and anything else is returned unchanged.
pub fn prettify(ticker: &str) -> String {
    let trimmed = ticker.trim();
    let mut parts = trimmed.split('-');
    let prefix = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let Some((label, kind)) = lookup(prefix) else {
        return strip_marker(trimmed).unwrap_or_else(|| ticker.to_string());
    };

    if rest.is_empty() {
        return label.to_string();
    }

    if kind == SeriesKind::Game {
        if let Some(game) = GameCode::parse(rest[0]) {
            let mut out = format!(
                "{}: {} vs {} ({} {}, {})",
                label,
                game.away,
                game.home,
                game.month_name(),
                game.day,
                game.year
            );
            if rest.len() > 1 {
                out.push_str(" · ");
                out.push_str(&rest[1..].join("-"));
            }
            return out;
        }
    }

    format!("{}: {}", label, rest.join("-"))
}

/// Category label used to group P&L by series.
pub fn category(ticker: &str) -> String {
    let prefix = ticker.trim().split('-').next().unwrap_or_default();
    if let Some((label, _)) = lookup(prefix) {
        return label.to_string();
    }
    match strip_marker(prefix) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ if !prefix.is_empty() => prefix.to_string(),
        _ => "Other".to_string(),
    }
}

fn strip_marker(ticker: &str) -> Option<String> {
    let upper_prefix = ticker.get(..SERIES_MARKER.len())?;
    if upper_prefix.eq_ignore_ascii_case(SERIES_MARKER) && ticker.len() > SERIES_MARKER.len() {
        Some(ticker[SERIES_MARKER.len()..].to_string())
    } else {
        None
    }
}
